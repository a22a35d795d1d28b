//! Roles, the permission catalogue and console users.

use std::sync::Arc;

use async_trait::async_trait;

use memberhub_client::ApiServices;
use memberhub_core::config::table::TableConfig;
use memberhub_core::result::AppResult;
use memberhub_core::traits::SearchSource;
use memberhub_core::types::SortOrder;
use memberhub_entity::access::{Permission, Role, UpdateUser, User};
use memberhub_table::{
    ActionEvent, ColumnType, DataTableAction, DataTableColumn, DataTableConfig, DataTableFilter,
    FilterType,
};

use super::{ListPage, PageContext, unknown_action};
use crate::output;

/// Roles. System roles cannot be deleted.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolesPage;

#[async_trait]
impl ListPage for RolesPage {
    type Row = Role;

    fn name(&self) -> &'static str {
        "roles"
    }

    fn table(&self, config: &TableConfig) -> DataTableConfig<Role> {
        DataTableConfig::new()
            .with_defaults(config)
            .column(DataTableColumn::new("name", "Name").sortable())
            .column(DataTableColumn::new("description", "Description"))
            .column(
                DataTableColumn::new("permissionIds", "Permissions")
                    .format(|_, role: &Role| role.permission_ids.len().to_string()),
            )
            .column(
                DataTableColumn::new("userCount", "Users")
                    .sortable()
                    .of_type(ColumnType::Number),
            )
            .column(
                DataTableColumn::new("isSystem", "Type")
                    .map_values([("true", "System"), ("false", "Custom")]),
            )
            .filter(
                DataTableFilter::new("isSystem", "System role", FilterType::Select).yes_no(),
            )
            .action(DataTableAction::new("View"))
            .action(DataTableAction::new("Delete").visible_when(|role: &Role| !role.is_system))
            .search_fields(["name", "description"])
            .default_sort("name", SortOrder::Asc)
    }

    fn source(&self, api: &ApiServices) -> Arc<dyn SearchSource<Role>> {
        Arc::new(api.roles.clone())
    }

    async fn handle_action(&self, ctx: &PageContext, event: ActionEvent<Role>) -> AppResult<()> {
        let role = event.row;
        match event.action.as_str() {
            "View" => output::print_item(&role, ctx.format),
            "Delete" => {
                let question = format!(
                    "Delete role {}? {} user(s) hold it.",
                    role.name, role.user_count
                );
                if ctx.ask("Delete role", question).await {
                    ctx.api.roles.delete(role.id).await?;
                    ctx.done(format!("Role {} deleted", role.name)).await;
                }
            }
            other => return Err(unknown_action(other)),
        }
        Ok(())
    }
}

/// The read-only permission catalogue.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionsPage;

#[async_trait]
impl ListPage for PermissionsPage {
    type Row = Permission;

    fn name(&self) -> &'static str {
        "permissions"
    }

    fn table(&self, config: &TableConfig) -> DataTableConfig<Permission> {
        DataTableConfig::new()
            .with_defaults(config)
            .column(DataTableColumn::new("code", "Code").sortable())
            .column(DataTableColumn::new("module", "Module").sortable())
            .column(DataTableColumn::new("description", "Description"))
            .filter(DataTableFilter::new("module", "Module", FilterType::Text))
            .search_fields(["code", "description"])
            .default_sort("module", SortOrder::Asc)
    }

    fn source(&self, api: &ApiServices) -> Arc<dyn SearchSource<Permission>> {
        Arc::new(api.roles.permissions())
    }
}

/// Console users with their role.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsersPage;

#[async_trait]
impl ListPage for UsersPage {
    type Row = User;

    fn name(&self) -> &'static str {
        "users"
    }

    fn table(&self, config: &TableConfig) -> DataTableConfig<User> {
        DataTableConfig::new()
            .with_defaults(config)
            .column(DataTableColumn::new("username", "Username").sortable())
            .column(DataTableColumn::new("fullName", "Name").sortable())
            .column(DataTableColumn::new("email", "Email"))
            .column(DataTableColumn::new("role.name", "Role"))
            .column(DataTableColumn::new("isActive", "Active").of_type(ColumnType::Boolean))
            .column(
                DataTableColumn::new("lastLoginAt", "Last login")
                    .sortable()
                    .of_type(ColumnType::Datetime),
            )
            .filter(DataTableFilter::new("isActive", "Active", FilterType::Select).yes_no())
            .filter(DataTableFilter::new("roleId", "Role", FilterType::Select))
            .action(DataTableAction::new("View"))
            .action(DataTableAction::new("Deactivate").visible_when(|user: &User| user.is_active))
            .action(DataTableAction::new("Activate").visible_when(|user: &User| !user.is_active))
            .action(DataTableAction::new("Delete"))
            .search_fields(["username", "fullName", "email"])
            .eager_load(["role"])
    }

    fn source(&self, api: &ApiServices) -> Arc<dyn SearchSource<User>> {
        Arc::new(api.users.clone())
    }

    async fn handle_action(&self, ctx: &PageContext, event: ActionEvent<User>) -> AppResult<()> {
        let user = event.row;
        match event.action.as_str() {
            "View" => output::print_item(&user, ctx.format),
            "Activate" => {
                let payload = UpdateUser {
                    is_active: Some(true),
                    ..UpdateUser::default()
                };
                ctx.api.users.update(user.id, &payload).await?;
                ctx.done(format!("User {} activated", user.username)).await;
            }
            "Deactivate" => {
                let question = format!("Deactivate user {}? They will be signed out.", user.username);
                if ctx.ask("Deactivate user", question).await {
                    let payload = UpdateUser {
                        is_active: Some(false),
                        ..UpdateUser::default()
                    };
                    ctx.api.users.update(user.id, &payload).await?;
                    ctx.done(format!("User {} deactivated", user.username)).await;
                }
            }
            "Delete" => {
                let question = format!("Delete user {}? This cannot be undone.", user.username);
                if ctx.ask("Delete user", question).await {
                    ctx.api.users.delete(user.id).await?;
                    ctx.done(format!("User {} deleted", user.username)).await;
                }
            }
            other => return Err(unknown_action(other)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use memberhub_core::types::{PermissionId, RoleId, SearchResponse};
    use memberhub_table::SortState;

    use super::*;

    #[test]
    fn test_role_rendering() {
        let table = RolesPage.table(&TableConfig::default());
        let role = Role {
            id: RoleId::new(),
            name: "Administrator".to_string(),
            description: None,
            is_system: true,
            permission_ids: vec![PermissionId::new(), PermissionId::new()],
            user_count: 3,
        };
        let rendered = table.render(&SearchResponse::new(vec![role], 1, 1, 10), &SortState::default());
        let cells = &rendered.rows[0].cells;
        assert_eq!(cells, &["Administrator", "-", "2", "3", "System"]);
        assert_eq!(rendered.rows[0].actions, vec!["View".to_string()]);
    }

    #[test]
    fn test_permissions_are_read_only() {
        let table = PermissionsPage.table(&TableConfig::default());
        assert!(table.actions.is_empty());
    }
}
