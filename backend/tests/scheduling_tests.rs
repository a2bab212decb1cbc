//! Batch scheduling, lookup and cancellation tests

mod common;

use axum::http::StatusCode;
use plant_scheduling_backend::store::FixtureStore;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use common::*;

fn schedule_body(codigo: &str) -> Value {
    json!({
        "CodigoProducto": codigo,
        "FechaProgramada": TEST_DATE,
        "UsuarioProgramo": "planificador",
        "CantidadLotes": 2,
        "PesoPorLote": 100,
        "UnidadMedidaId": 1,
    })
}

#[tokio::test]
async fn test_schedule_creates_one_batch_per_lot() {
    let app = seeded_app();
    register_product(&app, "PT-600", 3).await;

    let (status, body) = post(&app, "/lotesprogramados/programar", schedule_body("PT-600")).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["mensaje"], "2 lote(s) programado(s)");

    let batches = pending_on_test_date(&app).await;
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0]["Lote"], "PT-600-240201-01");
    assert_eq!(batches[1]["Lote"], "PT-600-240201-02");
    for batch in &batches {
        assert_eq!(batch["FechaProgramada"], TEST_DATE);
        assert_eq!(batch["LineasPendientes"].as_i64(), Some(3));
        assert_eq!(batch["TotalLineas"].as_i64(), Some(3));
    }
}

#[tokio::test]
async fn test_target_weights_follow_recipe_percentages() {
    let app = seeded_app();
    let (consecutivo, ingredients) = scheduled_batch(&app, "PT-610", 3).await;

    let detail = batch_detail(&app, consecutivo).await;
    assert_eq!(detail["maxSecuencia"].as_i64(), Some(3));

    let lines = detail["detalle"].as_array().unwrap();
    let targets: Vec<Decimal> = lines.iter().map(|l| dec(&l["PesoObjetivo"])).collect();
    assert_eq!(
        targets,
        vec![Decimal::from(33), Decimal::from(33), Decimal::from(34)]
    );
    for (line, id) in lines.iter().zip(&ingredients) {
        assert_eq!(line["IngredienteId"].as_i64(), Some(*id));
        assert!(line["TiempoDePesado"].is_null());
        assert_eq!(line["TieneFoto"], false);
    }
}

#[tokio::test]
async fn test_invalid_schedule_requests_are_bad_requests() {
    let app = seeded_app();

    let mut bodies = Vec::new();
    let mut unknown = schedule_body("PT-001");
    unknown["CodigoProducto"] = json!("NO-EXISTE");
    bodies.push(unknown);
    for (field, value) in [
        ("CantidadLotes", json!(0)),
        ("FechaProgramada", json!("01/02/2024")),
        ("PesoPorLote", json!(0)),
        ("UnidadMedidaId", json!(99)),
        ("UsuarioProgramo", json!("   ")),
    ] {
        let mut body = schedule_body("PT-001");
        body[field] = value;
        bodies.push(body);
    }
    let mut missing = schedule_body("PT-001");
    missing.as_object_mut().unwrap().remove("FechaProgramada");
    bodies.push(missing);

    for body in bodies {
        let (status, response) = post(&app, "/lotesprogramados/programar", body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
    }

    assert!(pending_on_test_date(&app).await.is_empty());
}

#[tokio::test]
async fn test_inactive_unit_is_rejected() {
    let store = FixtureStore::seeded();
    store.add_unit(2, "Libra", "lb", false).await;
    let app = app_with(store, None);

    let mut body = schedule_body("PT-001");
    body["UnidadMedidaId"] = json!(2);

    let (status, response) = post(&app, "/lotesprogramados/programar", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["field"], "UnidadMedidaId");
}

#[tokio::test]
async fn test_pending_without_date_lists_every_open_batch() {
    let app = seeded_app();
    schedule(&app, "PT-001", 1).await;

    let (status, body) = get(&app, "/lotesprogramados/pendientes").await;
    assert_eq!(status, StatusCode::OK);
    let consecutivos: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["Consecutivo"].as_i64().unwrap())
        .collect();
    assert_eq!(consecutivos, vec![1, 2]);

    let (status, _) = get(&app, "/lotesprogramados/pendientes?fecha=ayer").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_batch_lookups_need_a_consecutivo() {
    let app = seeded_app();

    let (status, body) = get(&app, "/lotesprogramados/detallelote").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "consecutivo");

    let (status, _) = get(&app, "/lotesprogramados/estado").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_detail_of_unknown_batch_is_empty() {
    let app = seeded_app();

    let detail = batch_detail(&app, 404).await;
    assert!(detail["detalle"].as_array().unwrap().is_empty());
    assert_eq!(detail["maxSecuencia"].as_i64(), Some(0));
}

#[tokio::test]
async fn test_status_of_unknown_batch_is_not_found() {
    let app = seeded_app();

    let (status, _) = get(&app, "/lotesprogramados/estado?consecutivo=404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_single_batch() {
    let app = seeded_app();
    let (consecutivo, _) = scheduled_batch(&app, "PT-700", 2).await;

    let (status, body) = post(
        &app,
        "/lotesprogramados/cancelar",
        json!({ "Consecutivo": consecutivo }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["cancelados"].as_u64(), Some(1));
    assert_eq!(body["mensaje"], "1 lote(s) cancelado(s)");

    assert!(pending_on_test_date(&app).await.is_empty());
    assert_eq!(batch_status(&app, consecutivo).await["Cancelado"], true);

    let (status, _) = post(
        &app,
        "/lotesprogramados/cancelar",
        json!({ "Consecutivo": consecutivo }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_range_cancel_skips_completed_batches() {
    let app = seeded_app();

    let (status, body) = post(&app, "/peso", weigh_body(1, "PT-001", 1, 1, 25.0)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    schedule(&app, "PT-001", 2).await;

    let (status, body) = post(
        &app,
        "/lotesprogramados/cancelar",
        json!({ "Desde": 1, "Hasta": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["cancelados"].as_u64(), Some(2));

    let completed = batch_status(&app, 1).await;
    assert_eq!(completed["Cancelado"], false);
    assert_eq!(completed["LoteCompletado"], true);
    for consecutivo in [2, 3] {
        assert_eq!(batch_status(&app, consecutivo).await["Cancelado"], true);
    }
}

#[tokio::test]
async fn test_cancel_needs_an_id_or_a_range() {
    let app = seeded_app();

    for body in [
        json!({}),
        json!({ "Desde": 1 }),
        json!({ "Desde": 5, "Hasta": 2 }),
        json!({ "Consecutivo": 1, "Desde": 1, "Hasta": 2 }),
        json!({ "Consecutivo": 0 }),
    ] {
        let (status, _) = post(&app, "/lotesprogramados/cancelar", body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    }

    assert_eq!(batch_status(&app, 1).await["Cancelado"], false);
}

#[tokio::test]
async fn test_malformed_consecutivo_is_reported_in_the_envelope() {
    let app = seeded_app();

    let (status, body) = get(&app, "/lotesprogramados/estado?consecutivo=uno").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "consecutivo");

    let (status, body) = get(&app, "/lotesprogramados/detallelote?consecutivo=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "consecutivo");
    assert!(body["error"]["message_es"].is_string());
}
