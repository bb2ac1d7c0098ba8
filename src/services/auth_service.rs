use crate::entities::member_entity as members;
use crate::error::{AppError, AppResult};
use crate::middlewares::AuthenticatedUser;
use crate::models::*;
use crate::utils::*;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let email = normalize_email(&request.email);
        if email.is_empty() || request.password.is_empty() {
            return Err(AppError::ValidationError(
                "Email and password are required".to_string(),
            ));
        }

        // unknown email and wrong password must be indistinguishable
        let member = members::Entity::find()
            .filter(members::Column::Email.eq(email.as_str()))
            .one(&self.pool)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&request.password, &member.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.jwt_service.issue_token(&member.email)?;
        log::info!("Member {} logged in", member.id);

        Ok(LoginResponse {
            message: "Login successful".to_string(),
            token,
            expires_in: self.jwt_service.expires_in(),
            user: MemberResponse::from(member),
        })
    }

    /// Loads the account behind a verified token.
    pub async fn current_member(&self, user: &AuthenticatedUser) -> AppResult<members::Model> {
        members::Entity::find()
            .filter(members::Column::Email.eq(user.email.as_str()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn me(&self, user: &AuthenticatedUser) -> AppResult<CurrentUserResponse> {
        let member = self.current_member(user).await?;
        let role = Role::from_id(member.role_id).unwrap_or(Role::Client);
        Ok(CurrentUserResponse {
            id: member.id,
            email: member.email,
            first_name: member.first_name,
            last_name: member.last_name,
            role_name: role.name().to_string(),
            role,
        })
    }

    /// Resolves the caller and checks that their role is one of `allowed`.
    pub async fn require_role(
        &self,
        user: &AuthenticatedUser,
        allowed: &[Role],
    ) -> AppResult<members::Model> {
        let member = members::Entity::find()
            .filter(members::Column::Email.eq(user.email.as_str()))
            .one(&self.pool)
            .await?
            .ok_or(AppError::InvalidToken)?;

        match Role::from_id(member.role_id) {
            Some(role) if allowed.contains(&role) => Ok(member),
            _ => {
                log::warn!(
                    "Member {} with role {} denied; requires one of {:?}",
                    member.id,
                    member.role_id,
                    allowed
                );
                Err(AppError::Forbidden)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn member(email: &str, password_hash: &str, role: Role) -> members::Model {
        members::Model {
            id: 1,
            first_name: "Admin".into(),
            last_name: "Gym".into(),
            email: email.into(),
            phone: None,
            password_hash: password_hash.into(),
            role_id: role.id(),
            gender: None,
            address: None,
            city: None,
            membership_type: None,
            membership_start: None,
            membership_end: None,
            is_active: true,
            medical_conditions: None,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn service(rows: Vec<members::Model>) -> AuthService {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([rows])
            .into_connection();
        AuthService::new(pool, JwtService::new("test-secret", 3600))
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_login_success_returns_token_without_hash() {
        let hash = bcrypt::hash("admin123", 4).unwrap();
        let svc = service(vec![member("admin@gym.com", &hash, Role::Admin)]);

        let resp = svc.login(login_request(" Admin@Gym.com ", "admin123")).await.unwrap();

        let claims = svc.jwt_service.verify_token(&resp.token).unwrap();
        assert_eq!(claims.email, "admin@gym.com");
        assert_eq!(claims.exp - claims.iat, 3600);
        let body = serde_json::to_string(&resp).unwrap();
        assert!(!body.contains("password_hash"));
        assert!(!body.contains(&hash));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let hash = bcrypt::hash("admin123", 4).unwrap();
        let svc = service(vec![member("admin@gym.com", &hash, Role::Admin)]);
        let wrong = svc.login(login_request("admin@gym.com", "nope")).await.unwrap_err();

        let svc = service(vec![]);
        let unknown = svc.login(login_request("ghost@gym.com", "nope")).await.unwrap_err();

        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_plaintext_stored_password_is_config_error() {
        let svc = service(vec![member("admin@gym.com", "admin123", Role::Admin)]);
        let err = svc.login(login_request("admin@gym.com", "admin123")).await.unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_empty_credentials_rejected_without_query() {
        let svc = service(vec![]);
        let err = svc.login(login_request("  ", "secret")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(svc.pool.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_require_role_forbids_other_roles() {
        let svc = service(vec![member("ana@gym.com", "x", Role::Client)]);
        let user = AuthenticatedUser {
            email: "ana@gym.com".into(),
        };
        let err = svc.require_role(&user, &Role::STAFF).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }
}
