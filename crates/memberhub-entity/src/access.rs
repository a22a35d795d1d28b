//! Console users, roles and permissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use memberhub_core::types::{PermissionId, RoleId, UserId};

use crate::validation::validate_phone;

/// A role grouping permissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Role identifier.
    pub id: RoleId,
    /// Role name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Built-in roles cannot be deleted.
    #[serde(default)]
    pub is_system: bool,
    /// Permissions granted by the role.
    #[serde(default)]
    pub permission_ids: Vec<PermissionId>,
    /// Number of users holding the role.
    #[serde(default)]
    pub user_count: u32,
}

/// A single grantable capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    /// Permission identifier.
    pub id: PermissionId,
    /// Permission code, e.g. `members.approve`.
    pub code: String,
    /// Module the permission belongs to.
    pub module: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Compact role reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSummary {
    /// Role identifier.
    pub id: RoleId,
    /// Role name.
    pub name: String,
}

/// A console (staff) user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Full name.
    pub full_name: String,
    /// Assigned role.
    pub role_id: RoleId,
    /// Embedded role when eager-loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleSummary>,
    /// Whether the account can sign in.
    pub is_active: bool,
    /// Last successful sign-in.
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Payload for creating a role.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRole {
    /// Role name.
    #[validate(length(min = 1, max = 60, message = "Role name is required"))]
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 300))]
    pub description: Option<String>,
    /// Initial permissions.
    #[serde(default)]
    pub permission_ids: Vec<PermissionId>,
}

/// Payload replacing a role's permission set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPermissions {
    /// Complete permission set.
    pub permission_ids: Vec<PermissionId>,
}

/// Payload for creating a console user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    /// Login name.
    #[validate(length(min = 3, max = 40, message = "Username must be 3 to 40 characters"))]
    pub username: String,
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Full name.
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    /// Role.
    pub role_id: RoleId,
}

/// Partial update of a console user (PATCH).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    /// New email.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    /// New full name.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 120))]
    pub full_name: Option<String>,
    /// New role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<RoleId>,
    /// Enable or disable sign-in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Full replacement of the signed-in user's own profile (PUT).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    /// Full name.
    #[validate(length(min = 1, max = 120, message = "Full name is required"))]
    pub full_name: String,
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_payload;

    #[test]
    fn test_short_username_rejected() {
        let user = CreateUser {
            username: "ab".to_string(),
            email: "ab@example.org".to_string(),
            full_name: "A B".to_string(),
            role_id: RoleId::new(),
        };
        let err = validate_payload(&user).unwrap_err();
        assert!(err.message.starts_with("username:"));
    }

    #[test]
    fn test_role_defaults() {
        let role: Role = serde_json::from_value(serde_json::json!({
            "id": RoleId::new(),
            "name": "Auditor"
        }))
        .unwrap();
        assert!(!role.is_system);
        assert!(role.permission_ids.is_empty());
    }
}
