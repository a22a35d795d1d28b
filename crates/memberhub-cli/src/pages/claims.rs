//! Death claims and their documents.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tabled::Tabled;

use memberhub_client::ApiServices;
use memberhub_core::config::table::TableConfig;
use memberhub_core::result::AppResult;
use memberhub_core::traits::SearchSource;
use memberhub_core::types::SortOrder;
use memberhub_entity::claim::{ClaimDocument, ClaimStatus, DeathClaim, UpdateClaimStatus};
use memberhub_table::{
    ActionEvent, ColumnType, DataTableAction, DataTableColumn, DataTableConfig, DataTableFilter,
    FilterType,
};

use super::{ListPage, PageContext, choices, humanize, unknown_action};
use crate::output;

/// Death claims, most recently reported first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimsPage;

/// The forward transition offered by the "Advance" action. Rejection
/// needs remarks and goes through `claims status`.
pub fn advance_target(claim: &DeathClaim) -> Option<ClaimStatus> {
    claim
        .status
        .next()
        .iter()
        .copied()
        .find(|status| *status != ClaimStatus::Rejected)
}

/// Document display row
#[derive(Debug, Serialize, Tabled)]
pub struct DocumentRow {
    /// Type
    #[tabled(rename = "Type")]
    kind: String,
    /// Name
    #[tabled(rename = "Name")]
    name: String,
    /// MIME type
    #[tabled(rename = "MIME")]
    mime: String,
    /// Uploaded at
    #[tabled(rename = "Uploaded")]
    uploaded: String,
    /// Download URL
    #[tabled(rename = "URL")]
    url: String,
}

impl From<&ClaimDocument> for DocumentRow {
    fn from(document: &ClaimDocument) -> Self {
        Self {
            kind: humanize(document.document_type.as_str()),
            name: document.document_name.clone(),
            mime: document.mime_type.clone(),
            uploaded: document.uploaded_at.format("%Y-%m-%d %H:%M").to_string(),
            url: document.url.clone(),
        }
    }
}

#[async_trait]
impl ListPage for ClaimsPage {
    type Row = DeathClaim;

    fn name(&self) -> &'static str {
        "death-claims"
    }

    fn table(&self, config: &TableConfig) -> DataTableConfig<DeathClaim> {
        DataTableConfig::new()
            .with_defaults(config)
            .column(
                DataTableColumn::new("claimNumber", "Claim")
                    .sortable()
                    .link("/death-claims/{id}"),
            )
            .column(DataTableColumn::new("member.name", "Member"))
            .column(
                DataTableColumn::new("dateOfDeath", "Date of death")
                    .sortable()
                    .of_type(ColumnType::Date),
            )
            .column(
                DataTableColumn::new("claimAmount", "Amount")
                    .sortable()
                    .of_type(ColumnType::Currency),
            )
            .column(DataTableColumn::new("status", "Status").of_type(ColumnType::Status))
            .column(
                DataTableColumn::new("reportedAt", "Reported")
                    .sortable()
                    .of_type(ColumnType::Datetime),
            )
            .filter(
                DataTableFilter::new("status", "Status", FilterType::Multiselect)
                    .with_options(choices(ClaimStatus::ALL)),
            )
            .filter(DataTableFilter::new("dateOfDeath", "Date of death", FilterType::Daterange))
            .filter(DataTableFilter::new("claimAmount", "Amount", FilterType::Number))
            .action(DataTableAction::new("View"))
            .action(DataTableAction::new("Documents"))
            .action(
                DataTableAction::new("Advance")
                    .visible_when(|claim: &DeathClaim| advance_target(claim).is_some()),
            )
            .search_fields(["claimNumber", "member.name"])
            .eager_load(["member"])
            .default_sort("reportedAt", SortOrder::Desc)
    }

    fn source(&self, api: &ApiServices) -> Arc<dyn SearchSource<DeathClaim>> {
        Arc::new(api.claims.clone())
    }

    async fn handle_action(
        &self,
        ctx: &PageContext,
        event: ActionEvent<DeathClaim>,
    ) -> AppResult<()> {
        let claim = event.row;
        match event.action.as_str() {
            "View" => output::print_item(&claim, ctx.format),
            "Documents" => {
                let documents = ctx.api.claims.documents(claim.id).await?;
                let rows: Vec<DocumentRow> = documents.iter().map(DocumentRow::from).collect();
                output::print_list(&rows, ctx.format);
            }
            "Advance" => {
                let Some(target) = advance_target(&claim) else {
                    return Err(unknown_action(&event.action));
                };
                let question = format!(
                    "Move claim {} from {} to {}?",
                    claim.claim_number,
                    humanize(claim.status.as_str()),
                    humanize(target.as_str())
                );
                if ctx.ask("Update claim", question).await {
                    let payload = UpdateClaimStatus {
                        status: target,
                        remarks: None,
                    };
                    let updated = ctx
                        .api
                        .claims
                        .update_status(claim.id, Some(&claim), &payload)
                        .await?;
                    ctx.done(format!(
                        "Claim {} is {}",
                        updated.claim_number,
                        humanize(updated.status.as_str())
                    ))
                    .await;
                }
            }
            other => return Err(unknown_action(other)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use memberhub_core::types::{ClaimId, MemberId};

    use super::*;

    fn claim(status: ClaimStatus) -> DeathClaim {
        DeathClaim {
            id: ClaimId::new(),
            claim_number: "DC-0001".to_string(),
            member_id: MemberId::new(),
            member: None,
            date_of_death: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            status,
            claim_amount: Some(50000.0),
            remarks: None,
            reported_at: Utc::now(),
        }
    }

    #[test]
    fn test_advance_skips_rejection() {
        assert_eq!(
            advance_target(&claim(ClaimStatus::Reported)),
            Some(ClaimStatus::UnderVerification)
        );
        assert_eq!(advance_target(&claim(ClaimStatus::Approved)), Some(ClaimStatus::Settled));
        assert_eq!(advance_target(&claim(ClaimStatus::Rejected)), None);
    }

    #[test]
    fn test_advance_hidden_for_final_claims() {
        let table = ClaimsPage.table(&TableConfig::default());
        let settled = claim(ClaimStatus::Settled);
        let labels: Vec<&str> = table.visible_actions(&settled).map(|a| a.label.as_str()).collect();
        assert_eq!(labels, ["View", "Documents"]);
    }
}
