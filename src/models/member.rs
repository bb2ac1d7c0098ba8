use crate::entities::member_entity as members;
use crate::models::Role;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateMemberRequest {
    #[schema(example = "Maria")]
    pub first_name: String,
    #[serde(default)]
    #[schema(example = "Lopez")]
    pub last_name: Option<String>,
    #[schema(example = "maria@gym.com")]
    pub email: String,
    /// Defaults to the local part of the email when omitted.
    pub password: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    #[schema(example = "monthly")]
    pub membership_type: Option<String>,
    pub membership_start: Option<NaiveDate>,
    pub membership_end: Option<NaiveDate>,
    pub is_active: Option<bool>,
    #[schema(value_type = Option<Object>)]
    pub medical_conditions: Option<serde_json::Value>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateMemberRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub membership_type: Option<String>,
    pub membership_start: Option<NaiveDate>,
    pub membership_end: Option<NaiveDate>,
    pub is_active: Option<bool>,
    #[schema(value_type = Option<Object>)]
    pub medical_conditions: Option<serde_json::Value>,
    pub notes: Option<String>,
}

/// Account projection returned by the API; never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role_id: i32,
    pub role_name: String,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub membership_type: Option<String>,
    pub membership_start: Option<NaiveDate>,
    pub membership_end: Option<NaiveDate>,
    pub is_active: bool,
    #[schema(value_type = Option<Object>)]
    pub medical_conditions: Option<serde_json::Value>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<members::Model> for MemberResponse {
    fn from(m: members::Model) -> Self {
        let role_name = Role::from_id(m.role_id)
            .map(|r| r.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        // rows written before the column held JSON are surfaced as plain text
        let medical_conditions = m.medical_conditions.map(|raw| {
            serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw))
        });
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            phone: m.phone,
            role_id: m.role_id,
            role_name,
            gender: m.gender,
            address: m.address,
            city: m.city,
            membership_type: m.membership_type,
            membership_start: m.membership_start,
            membership_end: m.membership_end,
            is_active: m.is_active,
            medical_conditions,
            notes: m.notes,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
pub struct MemberQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// Role name filter, e.g. `client` or `trainer`.
    pub role: Option<String>,
    /// Case-insensitive match on name or email.
    pub q: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
pub struct RoleFilter {
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
pub struct ExpiringQuery {
    /// Window in days, default 7.
    pub days: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleCount {
    pub role: Role,
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub by_role: Vec<RoleCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> members::Model {
        members::Model {
            id: 7,
            first_name: "Ana".into(),
            last_name: "Perez".into(),
            email: "ana@gym.com".into(),
            phone: None,
            password_hash: "$2b$04$abcdefghijklmnopqrstuv".into(),
            role_id: 4,
            gender: None,
            address: None,
            city: None,
            membership_type: Some("monthly".into()),
            membership_start: None,
            membership_end: None,
            is_active: true,
            medical_conditions: Some(r#"{"asthma":true}"#.into()),
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_response_omits_password_hash() {
        let json = serde_json::to_value(MemberResponse::from(model())).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role_name"], "client");
        assert_eq!(json["medical_conditions"]["asthma"], true);
    }

    #[test]
    fn test_legacy_medical_text_kept_as_string() {
        let mut m = model();
        m.medical_conditions = Some("knee injury".into());
        let resp = MemberResponse::from(m);
        assert_eq!(
            resp.medical_conditions,
            Some(serde_json::Value::String("knee injury".into()))
        );
    }
}
