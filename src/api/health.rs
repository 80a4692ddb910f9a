use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;

use crate::jobs::JobRegistry;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    jobs_tracked: Option<usize>,
}

/// Health check endpoint
///
/// There is no external dependency to probe (all state is in memory), so
/// this reports liveness plus the size of the job registry.
/// Use for load balancers and uptime monitors.
#[get("/health")]
async fn health_check(registry: web::Data<JobRegistry>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        jobs_tracked: Some(registry.tracked()),
    })
}

/// Liveness check endpoint
///
/// Simple check that the process is alive.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive".to_string(),
        jobs_tracked: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config.service(health_check).service(liveness_check);
}
