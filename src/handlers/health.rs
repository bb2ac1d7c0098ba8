use crate::models::ApiResponse;
use actix_web::{HttpResponse, web};

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::message("Gym API is running"))
}

pub fn health_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
