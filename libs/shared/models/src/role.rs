use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Doctor,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::Doctor];

    /// Header the backend reads this role's token from. Also the key the
    /// token is persisted under.
    pub fn token_key(&self) -> &'static str {
        match self {
            Role::Admin => "aToken",
            Role::Doctor => "dToken",
        }
    }

    pub fn api_prefix(&self) -> &'static str {
        match self {
            Role::Admin => "/api/admin",
            Role::Doctor => "/api/doctor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::Doctor => write!(f, "Doctor"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "doctor" => Ok(Role::Doctor),
            other => Err(format!("unknown role '{}', expected admin or doctor", other)),
        }
    }
}
