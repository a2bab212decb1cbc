//! API key, login, health and reference data tests

mod common;

use axum::http::StatusCode;
use plant_scheduling_backend::models::UserProfile;
use plant_scheduling_backend::store::FixtureStore;
use serde_json::json;

use common::*;

const KEY: &str = "clave-de-planta";

#[tokio::test]
async fn test_health_is_public() {
    let app = app_with(FixtureStore::seeded(), Some(KEY));

    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["dbConnected"], false);
    assert_eq!(body["mode"], "fixture");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_protected_routes_need_the_api_key() {
    let app = app_with(FixtureStore::seeded(), Some(KEY));

    let (status, body) = send(&app, "GET", "/api/Categorias/listado", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(body["error"]["message_en"], "Missing x-api-key header");

    let (status, body) = send(&app, "GET", "/api/Categorias/listado", None, Some("otra")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message_en"], "Invalid API key");

    let (status, body) = send(&app, "GET", "/api/Categorias/listado", None, Some(KEY)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (status, _) = send(
        &app,
        "POST",
        "/peso",
        Some(weigh_body(1, "PT-001", 1, 1, 25.0)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unauthorized_write_leaves_data_untouched() {
    let store = FixtureStore::seeded();
    let guarded = app_with(store.clone(), Some(KEY));
    let open = app_with(store, None);

    let (status, _) = send(
        &guarded,
        "POST",
        "/peso",
        Some(weigh_body(1, "PT-001", 1, 1, 25.0)),
        Some("otra"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let detail = batch_detail(&open, 1).await;
    assert!(detail["detalle"][0]["TiempoDePesado"].is_null());
}

#[tokio::test]
async fn test_login_returns_profile() {
    let app = seeded_app();

    let (status, body) = post(&app, "/login", json!({ "Username": "demo", "Password": "demo" })).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["Nombre"], "Usuario Demo");
    assert_eq!(body["Correo"], "demo@planta.local");
    assert_eq!(body["PlanActivo"], true);
    assert!(body.get("PasswordHash").is_none());
}

#[tokio::test]
async fn test_failed_logins_look_the_same() {
    let store = FixtureStore::seeded();
    store
        .add_user(
            "baja",
            "secreto",
            false,
            UserProfile {
                nombre: "Usuario Inactivo".to_string(),
                correo: None,
                plan_activo: false,
            },
        )
        .await
        .unwrap();
    let app = app_with(store, None);

    let attempts = [
        json!({ "Username": "demo", "Password": "incorrecta" }),
        json!({ "Username": "baja", "Password": "secreto" }),
        json!({ "Username": "nadie", "Password": "demo" }),
    ];

    let mut bodies = Vec::new();
    for attempt in attempts {
        let (status, body) = post(&app, "/login", attempt.clone()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", attempt);
        assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
        bodies.push(body);
    }
    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn test_login_without_password_is_bad_request() {
    let app = seeded_app();

    let (status, body) = post(&app, "/login", json!({ "Username": "demo" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_catalog_listings() {
    let store = FixtureStore::seeded();
    store.add_client(2, "Cliente Retirado", false).await;
    store.add_unit(2, "Libra", "lb", false).await;
    let app = app_with(store, None);

    let (status, clients) = get(&app, "/api/Clientes/activos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        clients,
        json!([{ "identificador": 1, "cliente": "Panificadora del Norte" }])
    );

    let (_, categories) = get(&app, "/api/Categorias/listado").await;
    assert_eq!(categories, json!([{ "Id": 1, "Nombre": "Harinas" }]));

    let (_, units) = get(&app, "/api/UnidadesMedida/activas").await;
    let units = units.as_array().unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0]["Abreviatura"], "kg");

    let (_, suppliers) = get(&app, "/api/Proveedores/listado?estado=activo").await;
    assert_eq!(suppliers[0]["Nombre"], "Molinos Unidos");

    let (_, inactive) = get(&app, "/api/Proveedores/listado?estado=inactivo").await;
    assert!(inactive.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_supplier_estado_is_bad_request() {
    let app = seeded_app();

    let (status, body) = get(&app, "/api/Proveedores/listado?estado=quizas").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "estado");
}

#[tokio::test]
async fn test_malformed_query_string_uses_error_envelope() {
    let app = seeded_app();

    let (status, body) = get(&app, "/api/Proveedores/listado?estado=activo&estado=inactivo").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message_en"].is_string());
    assert!(body["error"]["message_es"].is_string());
}
