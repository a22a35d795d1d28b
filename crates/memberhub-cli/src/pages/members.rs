//! Members list.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tabled::Tabled;

use memberhub_client::ApiServices;
use memberhub_core::config::table::TableConfig;
use memberhub_core::result::AppResult;
use memberhub_core::traits::SearchSource;
use memberhub_core::types::SortOrder;
use memberhub_entity::member::{Gender, Member, MemberStatus, Nominee, SuspendMember};
use memberhub_table::{
    ActionEvent, ColumnType, DataTableAction, DataTableColumn, DataTableConfig, DataTableFilter,
    FilterType, SearchSelect,
};

use super::{ListPage, PageContext, choices, unknown_action};
use crate::output;

/// Reason recorded when a member is suspended from the console.
const CONSOLE_SUSPENSION: &str = "Suspended from the administration console";

/// Members with their agent and unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct MembersPage;

/// Nominee display row
#[derive(Debug, Serialize, Tabled)]
pub struct NomineeRow {
    /// Name
    name: String,
    /// Relationship
    relationship: String,
    /// Phone
    phone: String,
    /// Share
    share: String,
}

impl From<&Nominee> for NomineeRow {
    fn from(nominee: &Nominee) -> Self {
        Self {
            name: nominee.name.clone(),
            relationship: nominee.relationship.clone(),
            phone: nominee.phone.clone().unwrap_or_else(|| "-".to_string()),
            share: format!("{}%", nominee.share_percent),
        }
    }
}

/// Member lookup result row
#[derive(Debug, Serialize, Tabled)]
pub struct MemberMatch {
    /// Code
    code: String,
    /// Name
    name: String,
    /// Phone
    phone: String,
    /// Status
    status: String,
}

impl From<&Member> for MemberMatch {
    fn from(member: &Member) -> Self {
        Self {
            code: member.member_code.clone(),
            name: member.full_name(),
            phone: member.phone.clone(),
            status: member.status.to_string(),
        }
    }
}

/// The member picker used when a form needs a member.
pub fn member_lookup(api: &ApiServices, config: &TableConfig) -> SearchSelect<Member> {
    SearchSelect::from_config(Arc::new(api.members.clone()), config)
        .with_search_fields(["memberCode", "firstName", "lastName", "phone"])
}

#[async_trait]
impl ListPage for MembersPage {
    type Row = Member;

    fn name(&self) -> &'static str {
        "members"
    }

    fn table(&self, config: &TableConfig) -> DataTableConfig<Member> {
        DataTableConfig::new()
            .with_defaults(config)
            .column(
                DataTableColumn::new("memberCode", "Code")
                    .sortable()
                    .link("/members/{id}"),
            )
            .column(
                DataTableColumn::new("firstName", "Name")
                    .sortable()
                    .format(|_, member: &Member| member.full_name()),
            )
            .column(DataTableColumn::new("agent.name", "Agent"))
            .column(DataTableColumn::new("unit.name", "Unit"))
            .column(DataTableColumn::new("phone", "Phone"))
            .column(DataTableColumn::new("gender", "Gender").hidden())
            .column(DataTableColumn::new("status", "Status").of_type(ColumnType::Status))
            .column(
                DataTableColumn::new("registeredAt", "Registered")
                    .sortable()
                    .of_type(ColumnType::Datetime),
            )
            .filter(
                DataTableFilter::new("status", "Status", FilterType::Multiselect)
                    .with_options(choices(MemberStatus::ALL)),
            )
            .filter(
                DataTableFilter::new("gender", "Gender", FilterType::Select)
                    .with_options(choices(Gender::ALL)),
            )
            .filter(DataTableFilter::new("agentId", "Agent", FilterType::Select))
            .filter(DataTableFilter::new("registeredAt", "Registered", FilterType::Daterange))
            .action(DataTableAction::new("View"))
            .action(DataTableAction::new("Nominees"))
            .action(DataTableAction::new("Suspend").visible_when(Member::can_suspend))
            .action(DataTableAction::new("Reactivate").visible_when(Member::can_reactivate))
            .search_fields(["memberCode", "firstName", "lastName", "phone"])
            .eager_load(["agent", "unit"])
            .default_sort("registeredAt", SortOrder::Desc)
    }

    fn source(&self, api: &ApiServices) -> Arc<dyn SearchSource<Member>> {
        Arc::new(api.members.clone())
    }

    async fn handle_action(&self, ctx: &PageContext, event: ActionEvent<Member>) -> AppResult<()> {
        let member = event.row;
        match event.action.as_str() {
            "View" => output::print_item(&member, ctx.format),
            "Nominees" => {
                let nominees = ctx.api.members.nominees(member.id).await?;
                let rows: Vec<NomineeRow> = nominees.iter().map(NomineeRow::from).collect();
                output::print_list(&rows, ctx.format);
            }
            "Suspend" => {
                let question = format!("Suspend {} ({})?", member.full_name(), member.member_code);
                if ctx.ask("Suspend member", question).await {
                    let payload = SuspendMember {
                        reason: CONSOLE_SUSPENSION.to_string(),
                    };
                    let updated = ctx.api.members.suspend(member.id, &payload).await?;
                    ctx.done(format!("Member {} is {}", updated.member_code, updated.status))
                        .await;
                }
            }
            "Reactivate" => {
                let updated = ctx.api.members.reactivate(member.id).await?;
                ctx.done(format!("Member {} is {}", updated.member_code, updated.status))
                    .await;
            }
            other => return Err(unknown_action(other)),
        }
        Ok(())
    }
}
