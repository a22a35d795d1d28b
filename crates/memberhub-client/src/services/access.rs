//! Roles, permissions, console users, and the signed-in profile.

use async_trait::async_trait;
use tracing::info;

use memberhub_core::error::AppError;
use memberhub_core::traits::SearchSource;
use memberhub_core::types::{PermissionId, RoleId, SearchRequest, SearchResponse, UserId};
use memberhub_entity::access::{
    AssignPermissions, CreateRole, CreateUser, Permission, Role, UpdateProfile, UpdateUser, User,
};
use memberhub_entity::validation::validate_payload;

use crate::http::{HttpService, SearchEndpoint};

/// Role and permission administration.
#[derive(Debug, Clone)]
pub struct RoleService {
    http: HttpService,
}

impl RoleService {
    /// Creates a new role service.
    pub fn new(http: HttpService) -> Self {
        Self { http }
    }

    /// Gets one role.
    pub async fn get(&self, id: RoleId) -> Result<Role, AppError> {
        self.http.get(&format!("roles/{id}")).await
    }

    /// Creates a role.
    pub async fn create(&self, payload: &CreateRole) -> Result<Role, AppError> {
        validate_payload(payload)?;
        let role: Role = self.http.post("roles", payload).await?;
        info!(role_id = %role.id, name = %role.name, "Role created");
        Ok(role)
    }

    /// Replaces a role's name, description and permissions.
    pub async fn update(&self, id: RoleId, payload: &CreateRole) -> Result<Role, AppError> {
        validate_payload(payload)?;
        let role = self.http.put(&format!("roles/{id}"), payload).await?;
        info!(role_id = %id, "Role updated");
        Ok(role)
    }

    /// Deletes a role. System roles cannot be deleted.
    pub async fn delete(&self, id: RoleId) -> Result<(), AppError> {
        self.http.delete(&format!("roles/{id}")).await?;
        info!(role_id = %id, "Role deleted");
        Ok(())
    }

    /// Replaces the set of permissions granted by a role.
    pub async fn assign_permissions(
        &self,
        id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> Result<Role, AppError> {
        let count = permission_ids.len();
        let role = self
            .http
            .put(
                &format!("roles/{id}/permissions"),
                &AssignPermissions { permission_ids },
            )
            .await?;
        info!(role_id = %id, permissions = count, "Role permissions assigned");
        Ok(role)
    }

    /// The permission catalogue. Permissions are read-only.
    pub fn permissions(&self) -> SearchEndpoint<Permission> {
        SearchEndpoint::new(self.http.clone(), "permissions/search")
    }
}

#[async_trait]
impl SearchSource<Role> for RoleService {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse<Role>, AppError> {
        self.http.search("roles/search", request).await
    }
}

/// Console user administration and self-service profile.
#[derive(Debug, Clone)]
pub struct UserService {
    http: HttpService,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(http: HttpService) -> Self {
        Self { http }
    }

    /// Gets one user.
    pub async fn get(&self, id: UserId) -> Result<User, AppError> {
        self.http.get(&format!("users/{id}")).await
    }

    /// Creates a user; the server mails the initial credentials.
    pub async fn create(&self, payload: &CreateUser) -> Result<User, AppError> {
        validate_payload(payload)?;
        let user: User = self.http.post("users", payload).await?;
        info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Applies a partial update.
    pub async fn update(&self, id: UserId, payload: &UpdateUser) -> Result<User, AppError> {
        validate_payload(payload)?;
        let user = self.http.patch(&format!("users/{id}"), payload).await?;
        info!(user_id = %id, "User updated");
        Ok(user)
    }

    /// Deletes a user.
    pub async fn delete(&self, id: UserId) -> Result<(), AppError> {
        self.http.delete(&format!("users/{id}")).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// The signed-in user's profile.
    pub async fn profile(&self) -> Result<User, AppError> {
        self.http.get("profile").await
    }

    /// Replaces the signed-in user's profile.
    pub async fn update_profile(&self, payload: &UpdateProfile) -> Result<User, AppError> {
        validate_payload(payload)?;
        let user: User = self.http.put("profile", payload).await?;
        info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }
}

#[async_trait]
impl SearchSource<User> for UserService {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse<User>, AppError> {
        self.http.search("users/search", request).await
    }
}
