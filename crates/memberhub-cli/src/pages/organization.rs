//! Areas, forums and units.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use memberhub_client::ApiServices;
use memberhub_client::services::NodeService;
use memberhub_core::config::table::TableConfig;
use memberhub_core::result::AppResult;
use memberhub_core::traits::SearchSource;
use memberhub_entity::organization::{Area, Forum, Unit, UpdateOrgNode};
use memberhub_table::{
    ActionEvent, ColumnType, DataTableAction, DataTableColumn, DataTableConfig, DataTableFilter,
    FilterType,
};

use super::{ListPage, PageContext, unknown_action};
use crate::output;

/// Fields the shared node actions need.
trait NodeRow {
    fn node_id(&self) -> String;
    fn code(&self) -> &str;
    fn is_active(&self) -> bool;
}

macro_rules! node_row {
    ($($ty:ty),+) => {
        $(impl NodeRow for $ty {
            fn node_id(&self) -> String {
                self.id.to_string()
            }

            fn code(&self) -> &str {
                &self.code
            }

            fn is_active(&self) -> bool {
                self.is_active
            }
        })+
    };
}

node_row!(Area, Forum, Unit);

/// Columns and filters every level shares, around the level-specific ones.
fn node_table<T>(
    config: &TableConfig,
    parent: Option<(&str, &str)>,
    count: (&str, &str),
) -> DataTableConfig<T>
where
    T: NodeRow + 'static,
{
    let mut table = DataTableConfig::new()
        .with_defaults(config)
        .column(DataTableColumn::new("code", "Code").sortable())
        .column(DataTableColumn::new("name", "Name").sortable());
    if let Some((key, label)) = parent {
        table = table.column(DataTableColumn::new(key, label));
    }
    table
        .column(
            DataTableColumn::new(count.0, count.1)
                .sortable()
                .of_type(ColumnType::Number),
        )
        .column(DataTableColumn::new("isActive", "Active").of_type(ColumnType::Boolean))
        .column(
            DataTableColumn::new("createdAt", "Created")
                .sortable()
                .of_type(ColumnType::Datetime),
        )
        .filter(DataTableFilter::new("isActive", "Active", FilterType::Select).yes_no())
        .filter(DataTableFilter::new("createdAt", "Created", FilterType::Daterange))
        .action(DataTableAction::new("View"))
        .action(DataTableAction::new("Deactivate").visible_when(|node: &T| node.is_active()))
        .action(DataTableAction::new("Activate").visible_when(|node: &T| !node.is_active()))
        .action(DataTableAction::new("Delete"))
        .search_fields(["name", "code"])
}

async fn handle_node_action<T>(
    service: &NodeService<T>,
    ctx: &PageContext,
    kind: &str,
    event: ActionEvent<T>,
) -> AppResult<()>
where
    T: NodeRow + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let node = event.row;
    match event.action.as_str() {
        "View" => output::print_item(&node, ctx.format),
        "Activate" | "Deactivate" => {
            let activate = event.action == "Activate";
            let verb = event.action.to_lowercase();
            let question = format!("{} {kind} {}?", event.action, node.code());
            if activate || ctx.ask(&format!("{} {kind}", event.action), question).await {
                let payload = UpdateOrgNode {
                    is_active: Some(activate),
                    ..UpdateOrgNode::default()
                };
                service.update(node.node_id(), &payload).await?;
                ctx.done(format!("{kind} {} {verb}d", node.code())).await;
            }
        }
        "Delete" => {
            let question = format!("Delete {kind} {}? This cannot be undone.", node.code());
            if ctx.ask(&format!("Delete {kind}"), question).await {
                service.delete(node.node_id()).await?;
                ctx.done(format!("{kind} {} deleted", node.code())).await;
            }
        }
        other => return Err(unknown_action(other)),
    }
    Ok(())
}

/// Top-level areas.
#[derive(Debug, Clone, Copy, Default)]
pub struct AreasPage;

#[async_trait]
impl ListPage for AreasPage {
    type Row = Area;

    fn name(&self) -> &'static str {
        "areas"
    }

    fn table(&self, config: &TableConfig) -> DataTableConfig<Area> {
        node_table(config, None, ("forumCount", "Forums"))
    }

    fn source(&self, api: &ApiServices) -> Arc<dyn SearchSource<Area>> {
        Arc::new(api.organization.areas.clone())
    }

    async fn handle_action(&self, ctx: &PageContext, event: ActionEvent<Area>) -> AppResult<()> {
        handle_node_action(&ctx.api.organization.areas, ctx, "Area", event).await
    }
}

/// Forums with their area.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForumsPage;

#[async_trait]
impl ListPage for ForumsPage {
    type Row = Forum;

    fn name(&self) -> &'static str {
        "forums"
    }

    fn table(&self, config: &TableConfig) -> DataTableConfig<Forum> {
        node_table(config, Some(("area.name", "Area")), ("unitCount", "Units"))
            .filter(DataTableFilter::new("areaId", "Area", FilterType::Select))
            .eager_load(["area"])
    }

    fn source(&self, api: &ApiServices) -> Arc<dyn SearchSource<Forum>> {
        Arc::new(api.organization.forums.clone())
    }

    async fn handle_action(&self, ctx: &PageContext, event: ActionEvent<Forum>) -> AppResult<()> {
        handle_node_action(&ctx.api.organization.forums, ctx, "Forum", event).await
    }
}

/// Units with their forum.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitsPage;

#[async_trait]
impl ListPage for UnitsPage {
    type Row = Unit;

    fn name(&self) -> &'static str {
        "units"
    }

    fn table(&self, config: &TableConfig) -> DataTableConfig<Unit> {
        node_table(config, Some(("forum.name", "Forum")), ("memberCount", "Members"))
            .filter(DataTableFilter::new("forumId", "Forum", FilterType::Select))
            .eager_load(["forum"])
    }

    fn source(&self, api: &ApiServices) -> Arc<dyn SearchSource<Unit>> {
        Arc::new(api.organization.units.clone())
    }

    async fn handle_action(&self, ctx: &PageContext, event: ActionEvent<Unit>) -> AppResult<()> {
        handle_node_action(&ctx.api.organization.units, ctx, "Unit", event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forum_table_adds_parent() {
        let table = ForumsPage.table(&TableConfig::default());
        let keys: Vec<&str> = table.visible_columns().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["code", "name", "area.name", "unitCount", "isActive", "createdAt"]);
        assert!(table.find_filter("areaId").is_some());
        assert_eq!(table.eager_load, vec!["area".to_string()]);
    }

    #[test]
    fn test_area_table_has_no_parent() {
        let table = AreasPage.table(&TableConfig::default());
        assert!(table.find_column("area.name").is_none());
        assert_eq!(table.actions.len(), 4);
    }
}
