//! Helpers shared by the integration tests
//!
//! Every test drives the real router over a `FixtureStore`.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;

use plant_scheduling_backend::store::FixtureStore;
use plant_scheduling_backend::{create_app, AppState, Config};

pub const TEST_DATE: &str = "2024-02-01";

/// Router over `store`, optionally protected by `api_key`
pub fn app_with(store: FixtureStore, api_key: Option<&str>) -> Router {
    let config = Config {
        api_key: api_key.map(str::to_string),
        ..Config::default()
    };
    create_app(AppState::new(Arc::new(store), config))
}

/// Router over the seeded fixture data without an API key
pub fn seeded_app() -> Router {
    app_with(FixtureStore::seeded(), None)
}

/// Send a request and return the status with the body as JSON.
/// Non-JSON bodies come back as a JSON string.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    api_key: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body), None).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "PUT", uri, Some(body), None).await
}

/// Decimal from a JSON string or number
pub fn dec(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).unwrap(),
        other => panic!("not a decimal: {}", other),
    }
}

/// Create an ingredient in category 1 and return its id
pub async fn create_ingredient(app: &Router, nombre: &str) -> i64 {
    let (status, body) = post(
        app,
        "/api/Ingredientes/nuevo",
        json!({ "Nombre": nombre, "CategoriaId": 1, "Activo": true }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}

/// Percentages of `count` recipe lines that add up to 100
pub fn recipe_percentages(count: usize) -> Vec<i64> {
    let share = 100 / count as i64;
    let mut percentages = vec![share; count];
    percentages[count - 1] = 100 - share * (count as i64 - 1);
    percentages
}

/// Register `codigo` with a recipe of `count` new ingredients
pub async fn register_product(app: &Router, codigo: &str, count: usize) -> Vec<i64> {
    let mut ids = Vec::with_capacity(count);
    for n in 0..count {
        ids.push(create_ingredient(app, &format!("{} ingrediente {}", codigo, n + 1)).await);
    }

    let lines: Vec<Value> = ids
        .iter()
        .zip(recipe_percentages(count))
        .map(|(id, pct)| json!({ "IngredienteId": id, "Porcentaje": pct }))
        .collect();

    let (status, body) = post(
        app,
        "/api/ProductosTerminados/registrar",
        json!({
            "CodigoProducto": codigo,
            "Nombre": format!("Producto {}", codigo),
            "ClienteId": 1,
            "Ingredientes": lines,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    ids
}

/// Schedule `lotes` batches of `codigo` on `TEST_DATE` with 100 kg per lot
pub async fn schedule(app: &Router, codigo: &str, lotes: i32) {
    let (status, body) = post(
        app,
        "/lotesprogramados/programar",
        json!({
            "CodigoProducto": codigo,
            "FechaProgramada": TEST_DATE,
            "UsuarioProgramo": "planificador",
            "CantidadLotes": lotes,
            "PesoPorLote": 100,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
}

/// Open batches scheduled on `TEST_DATE`
pub async fn pending_on_test_date(app: &Router) -> Vec<Value> {
    let (status, body) = get(app, &format!("/lotesprogramados/pendientes?fecha={}", TEST_DATE)).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().unwrap().clone()
}

/// Register a product with `count` ingredients, schedule one batch and
/// return its id with the ingredient ids in recipe order
pub async fn scheduled_batch(app: &Router, codigo: &str, count: usize) -> (i64, Vec<i64>) {
    let ingredients = register_product(app, codigo, count).await;
    schedule(app, codigo, 1).await;

    let batch = pending_on_test_date(app)
        .await
        .into_iter()
        .find(|b| b["ProductoTerminado"] == codigo)
        .unwrap();
    (batch["Consecutivo"].as_i64().unwrap(), ingredients)
}

/// Weigh-in body for one line
pub fn weigh_body(consecutivo: i64, codigo: &str, secuencia: i64, ingrediente: i64, peso: f64) -> Value {
    json!({
        "Consecutivo": consecutivo,
        "ProductoTerminado": codigo,
        "Secuencia": secuencia,
        "Ingrediente": ingrediente,
        "Tara": 0.5,
        "Peso": peso,
        "Etiqueta": format!("ETQ-{}-{}", consecutivo, secuencia),
    })
}

pub async fn batch_status(app: &Router, consecutivo: i64) -> Value {
    let (status, body) = get(app, &format!("/lotesprogramados/estado?consecutivo={}", consecutivo)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body
}

pub async fn batch_detail(app: &Router, consecutivo: i64) -> Value {
    let (status, body) =
        get(app, &format!("/lotesprogramados/detallelote?consecutivo={}", consecutivo)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body
}
