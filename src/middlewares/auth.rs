use crate::error::{AppError, AppResult};
use crate::utils::JwtService;
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use std::future::{Ready, ready};

/// Identity resolved from a verified bearer token.
///
/// Declaring this extractor on a handler is what makes the route protected;
/// handlers without it are public. Extraction never touches the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn bearer_token(req: &HttpRequest) -> AppResult<&str> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AppError::TokenMissing)?;

    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::InvalidToken)
}

fn authenticate(req: &HttpRequest) -> AppResult<AuthenticatedUser> {
    let jwt_service = req.app_data::<web::Data<JwtService>>().ok_or_else(|| {
        AppError::InternalError("JwtService is not registered as app data".to_string())
    })?;

    let result = bearer_token(req).and_then(|token| jwt_service.verify_token(token));
    match result {
        Ok(claims) => Ok(AuthenticatedUser {
            email: claims.email,
        }),
        Err(e) => {
            log::warn!("Rejected {} {}: {}", req.method(), req.path(), e.code());
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use chrono::{Duration, Utc};

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.email)
    }

    async fn call(header: Option<&str>, jwt: &JwtService) -> (StatusCode, serde_json::Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(jwt.clone()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;
        let mut req = test::TestRequest::get().uri("/whoami");
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        let json = serde_json::from_slice(&body)
            .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&body).into()));
        (status, json)
    }

    #[actix_web::test]
    async fn test_valid_token_resolves_email() {
        let jwt = JwtService::new("secret", 3600);
        let token = jwt.issue_token("admin@gym.com").unwrap();
        let (status, body) = call(Some(&format!("Bearer {token}")), &jwt).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "admin@gym.com");
    }

    #[actix_web::test]
    async fn test_missing_header_is_token_missing() {
        let jwt = JwtService::new("secret", 3600);
        let (status, body) = call(None, &jwt).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "token_missing");
    }

    #[actix_web::test]
    async fn test_malformed_headers_are_invalid_token() {
        let jwt = JwtService::new("secret", 3600);
        for header in ["Token abc", "Bearer", "Bearer ", "bearer abc", "abc"] {
            let (status, body) = call(Some(header), &jwt).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "header {header:?}");
            assert_eq!(body["error"]["code"], "invalid_token", "header {header:?}");
        }
    }

    #[actix_web::test]
    async fn test_expired_token_is_token_expired() {
        let jwt = JwtService::new("secret", 3600);
        let token = jwt
            .issue_token_at("admin@gym.com", Utc::now() - Duration::hours(2))
            .unwrap();
        let (status, body) = call(Some(&format!("Bearer {token}")), &jwt).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "token_expired");
    }

    #[actix_web::test]
    async fn test_foreign_signature_is_invalid_token() {
        let jwt = JwtService::new("secret", 3600);
        let other = JwtService::new("other-secret", 3600);
        let token = other.issue_token("admin@gym.com").unwrap();
        let (status, body) = call(Some(&format!("Bearer {token}")), &jwt).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "invalid_token");
    }
}
