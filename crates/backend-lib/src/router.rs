// ============================
// crates/backend-lib/src/router.rs
// ============================
//! Route table and HTTP layers.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{admin, check_connection, doctors, insurance, patients, root};
use crate::storage::Storage;
use crate::AppState;

/// Build the full application router
pub fn create_router<S: Storage>(state: Arc<AppState<S>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/check-connection", get(check_connection::<S>))
        .merge(admin_routes::<S>())
        .merge(patient_routes::<S>())
        .merge(doctor_routes::<S>())
        .merge(insurance_routes::<S>())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn admin_routes<S: Storage>() -> Router<Arc<AppState<S>>> {
    Router::new()
        .route("/admin/add", post(admin::add_admin::<S>))
        .route("/admin/token", post(admin::login::<S>))
        .route("/admin/me", get(admin::me))
}

fn patient_routes<S: Storage>() -> Router<Arc<AppState<S>>> {
    Router::new()
        .route("/patients/patient/", post(patients::create_patient::<S>))
        .route("/patients/patient/{patient_id}", get(patients::get_patient::<S>))
        .route("/patients/patients_list/{limit}", get(patients::list_patients::<S>))
        .route(
            "/patients/patient_id/{id}",
            put(patients::update_patient::<S>).delete(patients::delete_patient::<S>),
        )
}

fn doctor_routes<S: Storage>() -> Router<Arc<AppState<S>>> {
    Router::new()
        .route("/doctors/doctor/", post(doctors::create_doctor::<S>))
        .route("/doctors/doctor/{doctor_id}", get(doctors::get_doctor::<S>))
        .route(
            "/doctors/doctor_id/{id}",
            put(doctors::update_doctor::<S>).delete(doctors::delete_doctor::<S>),
        )
}

fn insurance_routes<S: Storage>() -> Router<Arc<AppState<S>>> {
    Router::new()
        .route("/insurance_premium/", get(insurance::home))
        .route("/insurance_premium/health", get(insurance::health::<S>))
        .route("/insurance_premium/predict", post(insurance::predict::<S>))
}

/// Same body shape as `AppError`; the panic payload is logged, not returned
fn panic_response(payload: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "handler panicked");

    let body = Json(json!({
        "error": {
            "code": "INT_001",
            "message": "An internal server error occurred",
        }
    }));
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}
