use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Fixed account roles; ids match the rows seeded into `roles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Trainer,
    Receptionist,
    Client,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Trainer, Role::Receptionist, Role::Client];
    pub const STAFF: [Role; 3] = [Role::Admin, Role::Trainer, Role::Receptionist];
    /// Billing, inventory and reports.
    pub const FRONT_DESK: [Role; 2] = [Role::Admin, Role::Receptionist];
    /// Classes, exercises and routines.
    pub const COACHING: [Role; 2] = [Role::Admin, Role::Trainer];

    pub fn id(self) -> i32 {
        match self {
            Role::Admin => 1,
            Role::Trainer => 2,
            Role::Receptionist => 3,
            Role::Client => 4,
        }
    }

    pub fn from_id(id: i32) -> Option<Role> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Trainer),
            3 => Some(Role::Receptionist),
            4 => Some(Role::Client),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Trainer => "trainer",
            Role::Receptionist => "receptionist",
            Role::Client => "client",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Role {
    type Err = String;

    // Spanish names are still sent by older frontends
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" | "administrator" | "administrador" => Ok(Role::Admin),
            "trainer" | "entrenador" => Ok(Role::Trainer),
            "receptionist" | "recepcionista" => Ok(Role::Receptionist),
            "client" | "cliente" => Ok(Role::Client),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from_id(role.id()), Some(role));
        }
        assert_eq!(Role::from_id(9), None);
    }

    #[test]
    fn test_parse_role_names() {
        assert_eq!("Entrenador".parse::<Role>(), Ok(Role::Trainer));
        assert_eq!("client".parse::<Role>(), Ok(Role::Client));
        assert!("janitor".parse::<Role>().is_err());
    }
}
