//! Token claim structures.
//!
//! A session token asserts `{ id, role?, email | phone }` for one identity.
//! Staff tokens carry `role` and `email`; parent tokens carry `phone` and no
//! role at all, which keeps them out of every role-gated route.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which half of the identity union a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Staff,
    Parent,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Staff => "staff",
            UserType::Parent => "parent",
        }
    }

    /// Landing route for an authenticated session of this type.
    pub fn home_route(self) -> &'static str {
        match self {
            UserType::Staff => "/admin",
            UserType::Parent => "/parent",
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Staff user id, or student id for parent sessions
    pub id: i64,
    /// Staff role name; absent on parent tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub user_type: UserType,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued-at (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    pub fn is_staff(&self) -> bool {
        self.user_type == UserType::Staff
    }

    /// Email for staff, phone for parents.
    pub fn login_identifier(&self) -> Option<&str> {
        self.email.as_deref().or(self.phone.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_claims_omit_role() {
        let claims = Claims {
            id: 42,
            role: None,
            email: None,
            phone: Some("9876543210".to_string()),
            user_type: UserType::Parent,
            exp: 1234567890,
            iat: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(!serialized.contains("role"));
        assert!(!serialized.contains("email"));
        assert!(serialized.contains(r#""user_type":"parent""#));
        assert_eq!(claims.login_identifier(), Some("9876543210"));
    }

    #[test]
    fn test_staff_claims_deserialize() {
        let json = r#"{"id":7,"role":"SuperAdmin","email":"a@b.com","user_type":"staff","exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.id, 7);
        assert_eq!(claims.role.as_deref(), Some("SuperAdmin"));
        assert_eq!(claims.phone, None);
        assert!(claims.is_staff());
    }

    #[test]
    fn test_home_routes() {
        assert_eq!(UserType::Staff.home_route(), "/admin");
        assert_eq!(UserType::Parent.home_route(), "/parent");
    }
}
