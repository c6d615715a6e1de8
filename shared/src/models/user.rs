//! User Model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    #[default]
    Customer,
    Staff,
    SuperAdmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Staff => "staff",
            UserRole::SuperAdmin => "super-admin",
        }
    }

    /// Staff and super-admins may submit products
    pub fn can_manage_catalog(&self) -> bool {
        matches!(self, UserRole::Staff | UserRole::SuperAdmin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(UserRole::Customer),
            "staff" => Ok(UserRole::Staff),
            "super-admin" => Ok(UserRole::SuperAdmin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// User entity. `phone` is the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub phone: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar_url: String,
}

/// Signup form payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub address: String,
}

/// Profile edit payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(
            serde_json::to_string(&UserRole::SuperAdmin).unwrap(),
            "\"super-admin\""
        );
        assert_eq!("staff".parse::<UserRole>().unwrap(), UserRole::Staff);
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_user_defaults_missing_fields() {
        let user: User =
            serde_json::from_str(r#"{"phone":"+254711","name":"Wanjiru","email":"w@x.co"}"#)
                .unwrap();
        assert_eq!(user.role, UserRole::Customer);
        assert!(user.address.is_empty());
    }
}
