pub mod attendance;
pub mod auth;
pub mod class;
pub mod exercise;
pub mod health;
pub mod inventory;
pub mod invoice;
pub mod member;
pub mod report;
pub mod routine;

pub use attendance::attendance_config;
pub use auth::auth_config;
pub use class::class_config;
pub use exercise::exercise_config;
pub use health::health_config;
pub use inventory::inventory_config;
pub use invoice::invoice_config;
pub use member::member_config;
pub use report::report_config;
pub use routine::routine_config;

use crate::error::AppError;
use actix_web::{ResponseError, web};

/// Malformed JSON bodies get the same error envelope as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let app_err = AppError::ValidationError(format!("Invalid request body: {err}"));
        actix_web::error::InternalError::from_response(err, app_err.error_response()).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let app_err = AppError::ValidationError(format!("Invalid query string: {err}"));
        actix_web::error::InternalError::from_response(err, app_err.error_response()).into()
    })
}

pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.configure(health_config)
        .configure(auth_config)
        .configure(member_config)
        .configure(attendance_config)
        .configure(invoice_config)
        .configure(inventory_config)
        .configure(class_config)
        .configure(exercise_config)
        .configure(routine_config)
        .configure(report_config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::AuthService;
    use crate::utils::JwtService;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[actix_web::test]
    async fn test_malformed_body_uses_error_envelope() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .app_data(web::Data::new(AuthService::new(
                    pool,
                    JwtService::new("secret", 3600),
                )))
                .configure(api_config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "validation_error");
    }

    #[actix_web::test]
    async fn test_health_is_public() {
        let app = test::init_service(App::new().configure(api_config)).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
