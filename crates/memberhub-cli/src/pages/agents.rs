//! Agents list.

use std::sync::Arc;

use async_trait::async_trait;

use memberhub_client::ApiServices;
use memberhub_core::config::table::TableConfig;
use memberhub_core::result::AppResult;
use memberhub_core::traits::SearchSource;
use memberhub_core::types::SortOrder;
use memberhub_entity::agent::{Agent, AgentStatus};
use memberhub_table::{
    ActionEvent, ColumnType, DataTableAction, DataTableColumn, DataTableConfig, DataTableFilter,
    FilterType,
};

use super::{ListPage, PageContext, choices, unknown_action};
use crate::output;

/// Agents, newest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentsPage;

#[async_trait]
impl ListPage for AgentsPage {
    type Row = Agent;

    fn name(&self) -> &'static str {
        "agents"
    }

    fn table(&self, config: &TableConfig) -> DataTableConfig<Agent> {
        DataTableConfig::new()
            .with_defaults(config)
            .column(
                DataTableColumn::new("agentCode", "Code")
                    .sortable()
                    .link("/agents/{id}"),
            )
            .column(
                DataTableColumn::new("firstName", "Name")
                    .sortable()
                    .format(|_, agent: &Agent| agent.full_name()),
            )
            .column(DataTableColumn::new("unit.name", "Unit"))
            .column(DataTableColumn::new("phone", "Phone"))
            .column(
                DataTableColumn::new("memberCount", "Members")
                    .sortable()
                    .of_type(ColumnType::Number),
            )
            .column(DataTableColumn::new("status", "Status").of_type(ColumnType::Status))
            .column(
                DataTableColumn::new("createdAt", "Created")
                    .sortable()
                    .of_type(ColumnType::Datetime),
            )
            .filter(
                DataTableFilter::new("status", "Status", FilterType::Multiselect)
                    .with_options(choices(AgentStatus::ALL)),
            )
            .filter(DataTableFilter::new("unitId", "Unit", FilterType::Select))
            .filter(DataTableFilter::new("createdAt", "Created", FilterType::Daterange))
            .action(DataTableAction::new("View"))
            .action(
                DataTableAction::new("Activate")
                    .visible_when(|agent: &Agent| agent.status != AgentStatus::Active),
            )
            .action(
                DataTableAction::new("Deactivate")
                    .visible_when(|agent: &Agent| agent.status == AgentStatus::Active),
            )
            .action(DataTableAction::new("Delete"))
            .search_fields(["agentCode", "firstName", "lastName", "phone", "email"])
            .eager_load(["unit"])
            .default_sort("createdAt", SortOrder::Desc)
    }

    fn source(&self, api: &ApiServices) -> Arc<dyn SearchSource<Agent>> {
        Arc::new(api.agents.clone())
    }

    async fn handle_action(&self, ctx: &PageContext, event: ActionEvent<Agent>) -> AppResult<()> {
        let agent = event.row;
        match event.action.as_str() {
            "View" => output::print_item(&agent, ctx.format),
            "Activate" => {
                let updated = ctx.api.agents.activate(agent.id).await?;
                ctx.done(format!("Agent {} is {}", updated.agent_code, updated.status))
                    .await;
            }
            "Deactivate" => {
                let question = format!("Deactivate agent {} ({})?", agent.full_name(), agent.agent_code);
                if ctx.ask("Deactivate agent", question).await {
                    let updated = ctx.api.agents.deactivate(agent.id).await?;
                    ctx.done(format!("Agent {} is {}", updated.agent_code, updated.status))
                        .await;
                }
            }
            "Delete" => {
                let question = format!("Delete agent {}? This cannot be undone.", agent.agent_code);
                if ctx.ask("Delete agent", question).await {
                    ctx.api.agents.delete(agent.id).await?;
                    ctx.done(format!("Agent {} deleted", agent.agent_code)).await;
                }
            }
            other => return Err(unknown_action(other)),
        }
        Ok(())
    }
}
