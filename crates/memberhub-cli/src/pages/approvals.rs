//! Approval requests, my task inbox, my submissions and workflow
//! definitions, plus the stage-by-stage pipeline view of one request.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tabled::Tabled;

use memberhub_client::ApiServices;
use memberhub_core::config::table::TableConfig;
use memberhub_core::result::AppResult;
use memberhub_core::traits::SearchSource;
use memberhub_core::types::{ApprovalRequestId, SortOrder};
use memberhub_entity::approval::{
    ApprovalDecision, ApprovalExecution, ApprovalRequest, ApprovalStatus, ApprovalTask, Decision,
    StepStatus, UpdateWorkflow, Workflow,
};
use memberhub_table::{
    ActionEvent, ColumnType, DataTableAction, DataTableColumn, DataTableConfig, DataTableFilter,
    FilterType,
};

use super::{ListPage, PageContext, choices, humanize, unknown_action};
use crate::output::{self, OutputFormat};

/// One line of the pipeline view
#[derive(Debug, Serialize, Tabled)]
pub struct PipelineRow {
    /// Marks the step awaiting a decision
    #[tabled(rename = "")]
    pub current: String,
    /// Stage order
    #[tabled(rename = "#")]
    pub order: u32,
    /// Stage name
    #[tabled(rename = "Stage")]
    pub stage: String,
    /// Status marker and name
    #[tabled(rename = "Status")]
    pub status: String,
    /// Who decided
    #[tabled(rename = "Decided by")]
    pub decided_by: String,
    /// When
    #[tabled(rename = "Decided at")]
    pub decided_at: String,
    /// Approver's comment
    #[tabled(rename = "Comment")]
    pub comment: String,
}

/// Marker shown before a step status.
pub fn step_marker(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Pending => "○",
        StepStatus::Approved => "✓",
        StepStatus::Rejected => "✗",
        StepStatus::Skipped => "↷",
    }
}

/// Steps in stage order; the current step is flagged.
pub fn pipeline_rows(execution: &ApprovalExecution) -> Vec<PipelineRow> {
    let current = execution.current_step().map(|step| step.stage_id);
    execution
        .ordered_steps()
        .into_iter()
        .map(|step| PipelineRow {
            current: (if Some(step.stage_id) == current { "▶" } else { "" }).to_string(),
            order: step.order,
            stage: step.stage_name.clone(),
            status: format!("{} {}", step_marker(step.status), step.status),
            decided_by: step.decided_by.clone().unwrap_or_else(|| "-".to_string()),
            decided_at: step
                .decided_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            comment: step.comment.clone().unwrap_or_default(),
        })
        .collect()
}

/// Print a request's pipeline.
pub fn print_pipeline(execution: &ApprovalExecution, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!(
                "Request {} is {}",
                execution.request_id,
                humanize(execution.status.as_str())
            );
            output::print_list(&pipeline_rows(execution), format);
        }
        OutputFormat::Json => output::print_item(execution, format),
    }
}

async fn show_pipeline(ctx: &PageContext, id: ApprovalRequestId) -> AppResult<()> {
    let execution = ctx.api.approvals.execution(id).await?;
    print_pipeline(&execution, ctx.format);
    Ok(())
}

fn request_table(config: &TableConfig) -> DataTableConfig<ApprovalRequest> {
    DataTableConfig::new()
        .with_defaults(config)
        .column(DataTableColumn::new("entityType", "Type").sortable())
        .column(DataTableColumn::new("entityLabel", "Subject"))
        .column(DataTableColumn::new("status", "Status").of_type(ColumnType::Status))
        .column(
            DataTableColumn::new("currentStageOrder", "Stage")
                .of_type(ColumnType::Number),
        )
        .column(
            DataTableColumn::new("submittedAt", "Submitted")
                .sortable()
                .of_type(ColumnType::Datetime),
        )
        .filter(
            DataTableFilter::new("status", "Status", FilterType::Multiselect)
                .with_options(choices(ApprovalStatus::ALL)),
        )
        .filter(DataTableFilter::new("entityType", "Type", FilterType::Select))
        .filter(DataTableFilter::new("submittedAt", "Submitted", FilterType::Daterange))
        .action(DataTableAction::new("Pipeline"))
        .search_fields(["entityLabel", "entityType"])
        .default_sort("submittedAt", SortOrder::Desc)
}

/// Every approval request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestsPage;

#[async_trait]
impl ListPage for RequestsPage {
    type Row = ApprovalRequest;

    fn name(&self) -> &'static str {
        "approval-requests"
    }

    fn table(&self, config: &TableConfig) -> DataTableConfig<ApprovalRequest> {
        request_table(config)
    }

    fn source(&self, api: &ApiServices) -> Arc<dyn SearchSource<ApprovalRequest>> {
        Arc::new(api.approvals.clone())
    }

    async fn handle_action(
        &self,
        ctx: &PageContext,
        event: ActionEvent<ApprovalRequest>,
    ) -> AppResult<()> {
        match event.action.as_str() {
            "Pipeline" => show_pipeline(ctx, event.row.id).await,
            other => Err(unknown_action(other)),
        }
    }
}

/// Requests submitted by the signed-in user.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmissionsPage;

#[async_trait]
impl ListPage for SubmissionsPage {
    type Row = ApprovalRequest;

    fn name(&self) -> &'static str {
        "my-submissions"
    }

    fn table(&self, config: &TableConfig) -> DataTableConfig<ApprovalRequest> {
        request_table(config)
    }

    fn source(&self, api: &ApiServices) -> Arc<dyn SearchSource<ApprovalRequest>> {
        Arc::new(api.approvals.my_submissions())
    }

    async fn handle_action(
        &self,
        ctx: &PageContext,
        event: ActionEvent<ApprovalRequest>,
    ) -> AppResult<()> {
        match event.action.as_str() {
            "Pipeline" => show_pipeline(ctx, event.row.id).await,
            other => Err(unknown_action(other)),
        }
    }
}

/// Stages waiting for the signed-in user's decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct TasksPage;

#[async_trait]
impl ListPage for TasksPage {
    type Row = ApprovalTask;

    fn name(&self) -> &'static str {
        "approval-tasks"
    }

    fn table(&self, config: &TableConfig) -> DataTableConfig<ApprovalTask> {
        DataTableConfig::new()
            .with_defaults(config)
            .column(DataTableColumn::new("stageName", "Stage").sortable())
            .column(DataTableColumn::new("entityType", "Type").sortable())
            .column(DataTableColumn::new("entityLabel", "Subject"))
            .column(
                DataTableColumn::new("assignedAt", "Assigned")
                    .sortable()
                    .of_type(ColumnType::Datetime),
            )
            .filter(DataTableFilter::new("entityType", "Type", FilterType::Select))
            .filter(DataTableFilter::new("assignedAt", "Assigned", FilterType::Daterange))
            .action(DataTableAction::new("Approve"))
            .action(DataTableAction::new("Pipeline"))
            .search_fields(["entityLabel", "stageName"])
            .default_sort("assignedAt", SortOrder::Asc)
    }

    fn source(&self, api: &ApiServices) -> Arc<dyn SearchSource<ApprovalTask>> {
        Arc::new(api.approvals.inbox())
    }

    async fn handle_action(
        &self,
        ctx: &PageContext,
        event: ActionEvent<ApprovalTask>,
    ) -> AppResult<()> {
        let task = event.row;
        match event.action.as_str() {
            "Pipeline" => show_pipeline(ctx, task.request_id).await,
            "Approve" => {
                let subject = task.entity_label.as_deref().unwrap_or(&task.entity_type);
                let question = format!("Approve {} at stage {}?", subject, task.stage_name);
                if ctx.ask("Approve", question).await {
                    let decision = ApprovalDecision {
                        decision: Decision::Approve,
                        comment: None,
                    };
                    let execution = ctx.api.approvals.decide(task.request_id, &decision).await?;
                    ctx.done(format!("Approved stage {}", task.stage_name)).await;
                    print_pipeline(&execution, ctx.format);
                }
                Ok(())
            }
            other => Err(unknown_action(other)),
        }
    }
}

/// Workflow definitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowsPage;

#[async_trait]
impl ListPage for WorkflowsPage {
    type Row = Workflow;

    fn name(&self) -> &'static str {
        "approval-workflows"
    }

    fn table(&self, config: &TableConfig) -> DataTableConfig<Workflow> {
        DataTableConfig::new()
            .with_defaults(config)
            .column(DataTableColumn::new("name", "Name").sortable())
            .column(DataTableColumn::new("module", "Module").sortable())
            .column(
                DataTableColumn::new("stages", "Stages")
                    .format(|_, workflow: &Workflow| {
                        workflow
                            .ordered_stages()
                            .iter()
                            .map(|stage| stage.name.as_str())
                            .collect::<Vec<_>>()
                            .join(" → ")
                    }),
            )
            .column(DataTableColumn::new("isActive", "Active").of_type(ColumnType::Boolean))
            .filter(DataTableFilter::new("module", "Module", FilterType::Select))
            .filter(DataTableFilter::new("isActive", "Active", FilterType::Select).yes_no())
            .action(DataTableAction::new("Deactivate").visible_when(|w: &Workflow| w.is_active))
            .action(DataTableAction::new("Activate").visible_when(|w: &Workflow| !w.is_active))
            .action(DataTableAction::new("Delete"))
            .search_fields(["name", "module"])
            .eager_load(["stages"])
    }

    fn source(&self, api: &ApiServices) -> Arc<dyn SearchSource<Workflow>> {
        Arc::new(api.workflows.clone())
    }

    async fn handle_action(&self, ctx: &PageContext, event: ActionEvent<Workflow>) -> AppResult<()> {
        let workflow = event.row;
        match event.action.as_str() {
            "Activate" | "Deactivate" => {
                let activate = event.action == "Activate";
                let question = format!(
                    "{} workflow {}? New {} requests are affected.",
                    event.action, workflow.name, workflow.module
                );
                if activate || ctx.ask("Deactivate workflow", question).await {
                    let payload = UpdateWorkflow {
                        is_active: Some(activate),
                        ..UpdateWorkflow::default()
                    };
                    let updated = ctx.api.workflows.update(workflow.id, &payload).await?;
                    let state = if updated.is_active { "active" } else { "inactive" };
                    ctx.done(format!("Workflow {} is {state}", updated.name)).await;
                }
            }
            "Delete" => {
                let question = format!("Delete workflow {}? This cannot be undone.", workflow.name);
                if ctx.ask("Delete workflow", question).await {
                    ctx.api.workflows.delete(workflow.id).await?;
                    ctx.done(format!("Workflow {} deleted", workflow.name)).await;
                }
            }
            other => return Err(unknown_action(other)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use memberhub_core::types::StageId;
    use memberhub_entity::approval::ExecutionStep;

    use super::*;

    fn step(order: u32, status: StepStatus) -> ExecutionStep {
        ExecutionStep {
            stage_id: StageId::new(),
            stage_name: format!("Stage {order}"),
            order,
            status,
            decided_by: (status != StepStatus::Pending).then(|| "asha".to_string()),
            decided_at: (status != StepStatus::Pending).then(Utc::now),
            comment: None,
        }
    }

    #[test]
    fn test_pipeline_in_stage_order_with_current() {
        let execution = ApprovalExecution {
            request_id: ApprovalRequestId::new(),
            status: ApprovalStatus::InProgress,
            steps: vec![
                step(3, StepStatus::Pending),
                step(1, StepStatus::Approved),
                step(2, StepStatus::Pending),
            ],
        };
        let rows = pipeline_rows(&execution);
        let orders: Vec<u32> = rows.iter().map(|r| r.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(rows[0].status, "✓ approved");
        assert_eq!(rows[0].decided_by, "asha");
        assert_eq!(rows[1].current, "▶");
        assert_eq!(rows[2].current, "");
        assert_eq!(rows[2].decided_at, "-");
    }

    #[test]
    fn test_finished_pipeline_has_no_current() {
        let execution = ApprovalExecution {
            request_id: ApprovalRequestId::new(),
            status: ApprovalStatus::Rejected,
            steps: vec![step(1, StepStatus::Rejected), step(2, StepStatus::Skipped)],
        };
        let rows = pipeline_rows(&execution);
        assert!(rows.iter().all(|r| r.current.is_empty()));
        assert_eq!(rows[1].status, "↷ skipped");
    }
}
