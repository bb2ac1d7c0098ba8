use crate::error::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: i64,
}

impl JwtService {
    pub fn new(secret: &str, expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expires_in,
        }
    }

    pub fn issue_token(&self, email: &str) -> AppResult<String> {
        self.issue_token_at(email, Utc::now())
    }

    pub fn issue_token_at(&self, email: &str, now: DateTime<Utc>) -> AppResult<String> {
        let exp = now + Duration::seconds(self.expires_in);
        let claims = Claims {
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AppError::JwtError)
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Self::validation())
            .map(|data| data.claims)
            .map_err(|e| Self::classify(token, e))
    }

    pub fn expires_in(&self) -> i64 {
        self.expires_in
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        validation
    }

    fn classify(token: &str, err: jsonwebtoken::errors::Error) -> AppError {
        match err.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired,
            // expiry is reported even when the signature is also wrong
            ErrorKind::InvalidSignature if Self::is_expired_unverified(token) => {
                AppError::TokenExpired
            }
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidToken
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingRequiredClaim(_)
            | ErrorKind::ImmatureSignature
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => AppError::InvalidToken,
            _ => AppError::JwtError(err),
        }
    }

    fn is_expired_unverified(token: &str) -> bool {
        let mut validation = Self::validation();
        validation.insecure_disable_signature_validation();
        matches!(
            decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, claims: &Claims) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issued_token_carries_email_and_one_hour_expiry() {
        let svc = JwtService::new("secret", 3600);
        let token = svc.issue_token("admin@gym.com").unwrap();
        let claims = svc.verify_token(&token).unwrap();
        assert_eq!(claims.email, "admin@gym.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_rejected_as_expired() {
        let svc = JwtService::new("secret", 3600);
        let past = Utc::now() - Duration::hours(2);
        let token = svc.issue_token_at("a@gym.com", past).unwrap();
        assert!(matches!(svc.verify_token(&token), Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_expired_token_with_bad_signature_still_reported_expired() {
        let svc = JwtService::new("secret", 3600);
        let now = Utc::now().timestamp();
        let token = sign(
            "another-secret",
            &Claims {
                email: "a@gym.com".into(),
                iat: now - 7200,
                exp: now - 3600,
            },
        );
        assert!(matches!(svc.verify_token(&token), Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_wrong_signature_rejected_as_invalid() {
        let svc = JwtService::new("secret", 3600);
        let now = Utc::now().timestamp();
        let token = sign(
            "another-secret",
            &Claims {
                email: "a@gym.com".into(),
                iat: now,
                exp: now + 3600,
            },
        );
        assert!(matches!(svc.verify_token(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_garbage_rejected_as_invalid() {
        let svc = JwtService::new("secret", 3600);
        assert!(matches!(svc.verify_token("not-a-jwt"), Err(AppError::InvalidToken)));
        assert!(matches!(svc.verify_token("a.b.c"), Err(AppError::InvalidToken)));
    }
}
