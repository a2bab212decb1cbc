//! Finished product and recipe tests

mod common;

use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use common::*;

fn product_body(codigo: &str, lines: Vec<Value>) -> Value {
    json!({
        "CodigoProducto": codigo,
        "Nombre": "Mezcla integral",
        "ClienteId": 1,
        "Ingredientes": lines,
    })
}

#[tokio::test]
async fn test_register_product_numbers_recipe_lines() {
    let app = seeded_app();
    let ids = register_product(&app, "PT-100", 3).await;

    let (status, body) = get(&app, "/api/ProductosTerminados/PT-100").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["CodigoProducto"], "PT-100");
    assert_eq!(body["Cliente"], "Panificadora del Norte");
    assert_eq!(body["Activo"], true);

    let lines = body["Ingredientes"].as_array().unwrap();
    assert_eq!(lines.len(), 3);
    for (index, line) in lines.iter().enumerate() {
        assert_eq!(line["Secuencia"].as_i64(), Some(index as i64 + 1));
        assert_eq!(line["IngredienteId"].as_i64(), Some(ids[index]));
    }
    let total: Decimal = lines.iter().map(|l| dec(&l["Porcentaje"])).sum();
    assert_eq!(total, Decimal::from(100));
}

#[tokio::test]
async fn test_register_response_carries_code() {
    let app = seeded_app();

    let (status, body) = post(
        &app,
        "/api/ProductosTerminados/registrar",
        product_body("PT-200", vec![json!({ "IngredienteId": 1, "Porcentaje": 100 })]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["CodigoProducto"], "PT-200");
    assert_eq!(body["mensaje"], "Producto terminado registrado");
}

#[tokio::test]
async fn test_duplicate_product_code_conflicts() {
    let app = seeded_app();

    let (status, body) = post(
        &app,
        "/api/ProductosTerminados/registrar",
        product_body("PT-001", vec![json!({ "IngredienteId": 1, "Porcentaje": 100 })]),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["field"], "CodigoProducto");
}

#[tokio::test]
async fn test_invalid_recipes_are_bad_requests() {
    let app = seeded_app();
    let second = create_ingredient(&app, "Sal").await;

    let recipes = vec![
        // does not add up to 100
        vec![
            json!({ "IngredienteId": 1, "Porcentaje": 60 }),
            json!({ "IngredienteId": second, "Porcentaje": 30 }),
        ],
        // zero share
        vec![
            json!({ "IngredienteId": 1, "Porcentaje": 100 }),
            json!({ "IngredienteId": second, "Porcentaje": 0 }),
        ],
        // repeated ingredient
        vec![
            json!({ "IngredienteId": 1, "Porcentaje": 50 }),
            json!({ "IngredienteId": 1, "Porcentaje": 50 }),
        ],
        // unknown ingredient
        vec![json!({ "IngredienteId": 9999, "Porcentaje": 100 })],
        // line without percentage
        vec![json!({ "IngredienteId": 1 })],
        vec![],
    ];

    for lines in recipes {
        let body = product_body("PT-300", lines);
        let (status, response) = post(&app, "/api/ProductosTerminados/registrar", body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
    }

    let (status, _) = get(&app, "/api/ProductosTerminados/PT-300").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_replaces_recipe() {
    let app = seeded_app();
    let ids = register_product(&app, "PT-400", 3).await;

    let (status, body) = put(
        &app,
        "/api/ProductosTerminados/editar/PT-400",
        json!({
            "Nombre": "Mezcla renovada",
            "ClienteId": 1,
            "Activo": false,
            "Ingredientes": [
                { "IngredienteId": ids[2], "Porcentaje": 70 },
                { "IngredienteId": 1, "Porcentaje": 30 },
            ],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["mensaje"], "Producto terminado actualizado");

    let (_, detail) = get(&app, "/api/ProductosTerminados/PT-400").await;
    assert_eq!(detail["Nombre"], "Mezcla renovada");
    assert_eq!(detail["Activo"], false);

    let lines = detail["Ingredientes"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["Secuencia"].as_i64(), Some(1));
    assert_eq!(lines[0]["IngredienteId"].as_i64(), Some(ids[2]));
    assert_eq!(dec(&lines[0]["Porcentaje"]), Decimal::from(70));
    assert_eq!(lines[1]["Secuencia"].as_i64(), Some(2));
    assert_eq!(lines[1]["IngredienteId"].as_i64(), Some(1));
}

#[tokio::test]
async fn test_edit_unknown_product_is_not_found() {
    let app = seeded_app();

    let (status, _) = put(
        &app,
        "/api/ProductosTerminados/editar/PT-999",
        product_body("PT-999", vec![json!({ "IngredienteId": 1, "Porcentaje": 100 })]),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_unknown_product_is_not_found() {
    let app = seeded_app();

    let (status, body) = get(&app, "/api/ProductosTerminados/NO-EXISTE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_listing_filters_by_client_and_estado() {
    let app = seeded_app();
    register_product(&app, "PT-500", 1).await;

    let (status, _) = post(
        &app,
        "/api/ProductosTerminados/registrar",
        json!({
            "CodigoProducto": "PT-501",
            "Nombre": "Mezcla sin cliente",
            "Activo": false,
            "Ingredientes": [{ "IngredienteId": 1, "Porcentaje": 100 }],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, del_cliente) = get(&app, "/api/ProductosTerminados/listado?clienteId=1").await;
    let codes: Vec<&str> = del_cliente
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["CodigoProducto"].as_str().unwrap())
        .collect();
    assert!(codes.contains(&"PT-001"));
    assert!(codes.contains(&"PT-500"));
    assert!(!codes.contains(&"PT-501"));

    let (_, inactivos) = get(&app, "/api/ProductosTerminados/listado?estado=inactivo").await;
    let inactivos = inactivos.as_array().unwrap();
    assert_eq!(inactivos.len(), 1);
    assert_eq!(inactivos[0]["CodigoProducto"], "PT-501");

    let (status, _) = get(&app, "/api/ProductosTerminados/listado?estado=x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_client_filter_accepts_blank_and_rejects_text() {
    let app = seeded_app();

    let (status, listing) = get(&app, "/api/ProductosTerminados/listado?clienteId=").await;
    assert_eq!(status, StatusCode::OK, "{}", listing);
    assert_eq!(listing.as_array().unwrap().len(), 1);

    let (status, body) = get(&app, "/api/ProductosTerminados/listado?clienteId=uno").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "clienteId");
}
