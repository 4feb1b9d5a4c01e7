// ============================
// tests/integration/api_tests.rs
// ============================
//! End-to-end requests against the axum router
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use backend_lib::{create_router, model::PredictionGateway};
use serde_json::{json, Value};

use crate::test_utils::{
    admin_token, empty_request, form_request, json_request, send, test_app, test_state_with,
};

fn patient(name: &str, age: i64) -> Value {
    json!({ "name": name, "age": age, "weight": 62.5, "height": 1.64 })
}

fn prediction_input() -> Value {
    json!({
        "age": 30,
        "weight": 70.0,
        "height": 1.75,
        "income_lpa": 12.0,
        "smoker": false,
        "city": " mumbai ",
        "occupation": "Engineer"
    })
}

#[tokio::test]
async fn test_root_and_connection() {
    let app = test_app();

    let (status, body) = send(&app, empty_request(Method::GET, "/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hospital Management System API is Live!");

    let (status, body) = send(&app, empty_request(Method::GET, "/check-connection")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Successfully connected to the database!");
}

#[tokio::test]
async fn test_admin_register_login_and_me() {
    let app = test_app();

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/admin/add",
            &json!({ "username": "doc1", "password": "password123" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Admin user created successfully");
    assert_eq!(body["username"], "doc1");

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/admin/add",
            &json!({ "username": "doc1", "password": "password123" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "AUTH_004");

    let (status, body) = send(
        &app,
        form_request("/admin/token", "username=doc1&password=password123"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().unwrap().to_string();

    let request = Request::builder()
        .uri("/admin/me")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "doc1");
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let app = test_app();
    admin_token(&app, "doc1", "password123").await;

    let (status_a, body_a) = send(
        &app,
        form_request("/admin/token", "username=doc1&password=password999"),
    )
    .await;
    let (status_b, body_b) = send(
        &app,
        form_request("/admin/token", "username=nobody&password=password123"),
    )
    .await;

    assert_eq!(status_a, StatusCode::UNAUTHORIZED);
    assert_eq!(status_a, status_b);
    assert_eq!(body_a, body_b);
    assert_eq!(body_a["error"]["code"], "AUTH_002");
}

#[tokio::test]
async fn test_me_requires_valid_token() {
    let app = test_app();

    let (status, body) = send(&app, empty_request(Method::GET, "/admin/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_003");

    let request = Request::builder()
        .uri("/admin/me")
        .header(header::AUTHORIZATION, "Bearer not.a.token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_validation_errors() {
    let app = test_app();

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/admin/add",
            &json!({ "username": "ab", "password": "password123" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VAL_001");

    // missing field is rejected by the extractor and reported the same way
    let (status, body) = send(
        &app,
        json_request(Method::POST, "/admin/add", &json!({ "username": "doc1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VAL_001");
}

#[tokio::test]
async fn test_patient_crud() {
    let app = test_app();

    let (status, created) = send(
        &app,
        json_request(Method::POST, "/patients/patient/", &patient("Asha", 40)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["id"], 1);
    assert_eq!(created["name"], "Asha");

    send(
        &app,
        json_request(Method::POST, "/patients/patient/", &patient("Ravi", 51)),
    )
    .await;

    let (status, fetched) = send(&app, empty_request(Method::GET, "/patients/patient/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, list) = send(
        &app,
        empty_request(Method::GET, "/patients/patients_list/1"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["patients"].as_array().unwrap().len(), 1);
    assert_eq!(list["patients"][0]["name"], "Asha");

    let (status, updated) = send(
        &app,
        json_request(Method::PUT, "/patients/patient_id/1", &patient("Asha K", 41)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["message"], "Update successful");
    assert_eq!(updated["patient"]["name"], "Asha K");
    assert_eq!(updated["patient"]["age"], 41);

    let (status, deleted) = send(
        &app,
        empty_request(Method::DELETE, "/patients/patient_id/1"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "Deletion successful");
    assert_eq!(deleted["id_deleted"], 1);

    let (status, body) = send(&app, empty_request(Method::GET, "/patients/patient/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NF_001");

    // ids are not reused
    let (_, next) = send(
        &app,
        json_request(Method::POST, "/patients/patient/", &patient("Meera", 29)),
    )
    .await;
    assert_eq!(next["id"], 3);
}

#[tokio::test]
async fn test_patient_delete_name_guard() {
    let app = test_app();
    send(
        &app,
        json_request(Method::POST, "/patients/patient/", &patient("Asha", 40)),
    )
    .await;

    let (status, _) = send(
        &app,
        empty_request(Method::DELETE, "/patients/patient_id/1?name=Ravi"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        empty_request(Method::DELETE, "/patients/patient_id/1?name=Asha"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id_deleted"], 1);
}

#[tokio::test]
async fn test_patient_bad_input() {
    let app = test_app();

    let (status, _) = send(
        &app,
        json_request(Method::POST, "/patients/patient/", &patient("", 40)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, empty_request(Method::GET, "/patients/patient/abc")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        json_request(Method::PUT, "/patients/patient_id/42", &patient("Nobody", 30)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_doctor_crud() {
    let app = test_app();
    let doctor = json!({ "name": "Dr. Rao", "specialty": "Cardiology" });

    let (status, created) = send(
        &app,
        json_request(Method::POST, "/doctors/doctor/", &doctor),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["id"], 1);

    let (status, fetched) = send(&app, empty_request(Method::GET, "/doctors/doctor/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["specialty"], "Cardiology");

    let (status, updated) = send(
        &app,
        json_request(
            Method::PUT,
            "/doctors/doctor_id/1",
            &json!({ "name": "Dr. Rao", "specialty": "Neurology" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["specialty"], "Neurology");
    assert_eq!(updated["id"], 1);

    let (status, body) = send(&app, empty_request(Method::DELETE, "/doctors/doctor_id/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "Doctor deleted successfully");

    let (status, _) = send(&app, empty_request(Method::DELETE, "/doctors/doctor_id/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_insurance_endpoints() {
    let app = test_app();

    let (status, body) = send(&app, empty_request(Method::GET, "/insurance_premium/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Insurance Premium Prediction API");

    let (status, body) = send(&app, empty_request(Method::GET, "/insurance_premium/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["model_loaded"], true);

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/insurance_premium/predict", &prediction_input()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let probabilities = body["class_probabilities"].as_object().unwrap();
    let sum: f64 = probabilities.values().map(|p| p.as_f64().unwrap()).sum();
    assert!((sum - 1.0).abs() < 1e-6);
    let category = body["predicted_category"].as_str().unwrap();
    assert_eq!(probabilities[category], body["confidence"]);
}

#[tokio::test]
async fn test_predict_rejects_bad_input() {
    let app = test_app();

    let mut input = prediction_input();
    input["age"] = json!(0);
    let (status, body) = send(
        &app,
        json_request(Method::POST, "/insurance_premium/predict", &input),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VAL_001");

    let mut input = prediction_input();
    input["occupation"] = json!("Astronaut");
    let (status, _) = send(
        &app,
        json_request(Method::POST, "/insurance_premium/predict", &input),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // each value in range, but the derived BMI is infinite
    let mut input = prediction_input();
    input["weight"] = json!(1e308);
    input["height"] = json!(0.001);
    let (status, body) = send(
        &app,
        json_request(Method::POST, "/insurance_premium/predict", &input),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VAL_001");
}

#[tokio::test]
async fn test_predict_without_model() {
    let app = create_router(test_state_with(PredictionGateway::not_loaded()));

    let (_, health) = send(&app, empty_request(Method::GET, "/insurance_premium/health")).await;
    assert_eq!(health["model_loaded"], false);

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/insurance_premium/predict", &prediction_input()),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "MODEL_001");
}
