//! Feature list pages.
//!
//! Each page declares its table (columns, filters, actions) and the search
//! source behind it. Loading, paging and rendering are shared by every
//! page through [`ListStore`](memberhub_table::ListStore) and
//! [`DataTable`](memberhub_table::DataTable).

pub mod access;
pub mod agents;
pub mod approvals;
pub mod claims;
pub mod members;
pub mod organization;
pub mod wallets;

use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use memberhub_client::ApiServices;
use memberhub_core::config::table::TableConfig;
use memberhub_core::error::AppError;
use memberhub_core::result::AppResult;
use memberhub_core::traits::{ConfirmRequest, Confirmation, SearchSource, ToastLevel};
use memberhub_table::{ActionEvent, DataTableConfig, FilterOption};

use crate::output::OutputFormat;

/// Everything a command or action handler needs.
#[derive(Clone)]
pub struct PageContext {
    /// API services.
    pub api: ApiServices,
    /// List view defaults.
    pub table: TableConfig,
    /// Prompts and notifications.
    pub confirm: Arc<dyn Confirmation>,
    /// Output format.
    pub format: OutputFormat,
}

impl PageContext {
    /// Ask before a destructive or outward action.
    pub async fn ask(&self, title: &str, message: impl Into<String>) -> bool {
        let confirmed = self.confirm.confirm(&ConfirmRequest::new(title, message)).await;
        if !confirmed {
            self.confirm.toast(ToastLevel::Info, "Cancelled.").await;
        }
        confirmed
    }

    /// Report a completed action.
    pub async fn done(&self, message: impl AsRef<str>) {
        self.confirm.toast(ToastLevel::Success, message.as_ref()).await;
    }
}

/// A list page: a table declaration bound to a search source.
#[async_trait]
pub trait ListPage: Send + Sync {
    /// Row type.
    type Row: Clone + Serialize + Send + Sync + 'static;

    /// Name used in log lines and prompts.
    fn name(&self) -> &'static str;

    /// Table declaration.
    fn table(&self, config: &TableConfig) -> DataTableConfig<Self::Row>;

    /// Where rows come from.
    fn source(&self, api: &ApiServices) -> Arc<dyn SearchSource<Self::Row>>;

    /// React to an invoked row action.
    async fn handle_action(&self, ctx: &PageContext, event: ActionEvent<Self::Row>) -> AppResult<()> {
        let _ = ctx;
        Err(unknown_action(&event.action))
    }
}

/// Pages reachable from `browse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PageKind {
    /// Agents
    Agents,
    /// Members
    Members,
    /// Areas
    Areas,
    /// Forums
    Forums,
    /// Units
    Units,
    /// Roles
    Roles,
    /// Permission catalogue
    Permissions,
    /// Console users
    Users,
    /// Death claims
    Claims,
    /// All approval requests
    Approvals,
    /// Approval tasks awaiting me
    Tasks,
    /// Requests I submitted
    Submissions,
    /// Approval workflows
    Workflows,
}

/// Run `$body` with `$page` bound to the page for `$kind`.
#[macro_export]
macro_rules! with_page {
    ($kind:expr, |$page:ident| $body:expr) => {{
        use $crate::pages::{access, agents, approvals, claims, members, organization, PageKind};
        match $kind {
            PageKind::Agents => { let $page = agents::AgentsPage; $body }
            PageKind::Members => { let $page = members::MembersPage; $body }
            PageKind::Areas => { let $page = organization::AreasPage; $body }
            PageKind::Forums => { let $page = organization::ForumsPage; $body }
            PageKind::Units => { let $page = organization::UnitsPage; $body }
            PageKind::Roles => { let $page = access::RolesPage; $body }
            PageKind::Permissions => { let $page = access::PermissionsPage; $body }
            PageKind::Users => { let $page = access::UsersPage; $body }
            PageKind::Claims => { let $page = claims::ClaimsPage; $body }
            PageKind::Approvals => { let $page = approvals::RequestsPage; $body }
            PageKind::Tasks => { let $page = approvals::TasksPage; $body }
            PageKind::Submissions => { let $page = approvals::SubmissionsPage; $body }
            PageKind::Workflows => { let $page = approvals::WorkflowsPage; $body }
        }
    }};
}

/// Error for an action label a page does not handle.
pub fn unknown_action(label: &str) -> AppError {
    AppError::validation(format!("Unknown action '{label}'"))
}

/// Filter choices for every value of a status enum.
pub fn choices<E: Display>(values: &[E]) -> Vec<FilterOption> {
    values
        .iter()
        .map(|value| {
            let wire = value.to_string();
            FilterOption::new(humanize(&wire), wire)
        })
        .collect()
}

/// `under_verification` → `Under verification`.
pub fn humanize(wire: &str) -> String {
    let spaced = wire.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use memberhub_entity::claim::ClaimStatus;

    use super::*;

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("under_verification"), "Under verification");
        assert_eq!(humanize("active"), "Active");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn test_choices_keep_wire_values() {
        let options = choices(ClaimStatus::ALL);
        assert_eq!(options.len(), ClaimStatus::ALL.len());
        assert_eq!(options[1].value, "under_verification");
        assert_eq!(options[1].label, "Under verification");
    }
}
