//! Multi-stage approval workflows as seen from the console.
//!
//! The server decides who approves next and when a request advances; these
//! types only describe what it reports and what the console sends back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use memberhub_core::types::{ApprovalRequestId, RoleId, StageId, UserId, WorkflowId};

use crate::access::RoleSummary;

wire_enum!(
    /// Overall status of an approval request.
    ApprovalStatus {
        /// Submitted, no stage decided yet.
        Pending => "pending",
        /// At least one stage decided, more remain.
        InProgress => "in_progress",
        /// Every stage approved.
        Approved => "approved",
        /// A stage rejected the request.
        Rejected => "rejected",
        /// Withdrawn by the submitter.
        Cancelled => "cancelled",
    }
);

wire_enum!(
    /// Status of a single stage in an execution pipeline.
    StepStatus {
        /// Waiting for a decision.
        Pending => "pending",
        /// Approved by the stage approver.
        Approved => "approved",
        /// Rejected by the stage approver.
        Rejected => "rejected",
        /// Not required (auto-approved or short-circuited).
        Skipped => "skipped",
    }
);

wire_enum!(
    /// Decision recorded by an approver.
    Decision {
        /// Approve the current stage.
        Approve => "approve",
        /// Reject the request.
        Reject => "reject",
    }
);

/// One stage of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStage {
    /// Stage identifier.
    pub id: StageId,
    /// Stage name.
    pub name: String,
    /// Position in the workflow (1-based).
    pub order: u32,
    /// Role whose holders may decide this stage.
    pub approver_role_id: RoleId,
    /// Embedded role when eager-loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver_role: Option<RoleSummary>,
    /// Whether the server approves this stage without a human decision.
    #[serde(default)]
    pub auto_approve: bool,
}

/// An approval workflow bound to a module (members, claims, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Workflow identifier.
    pub id: WorkflowId,
    /// Workflow name.
    pub name: String,
    /// Module whose records go through this workflow.
    pub module: String,
    /// Whether new requests use this workflow.
    pub is_active: bool,
    /// Stages, in any order as received.
    #[serde(default)]
    pub stages: Vec<WorkflowStage>,
}

impl Workflow {
    /// Stages sorted by their order.
    pub fn ordered_stages(&self) -> Vec<&WorkflowStage> {
        let mut stages: Vec<&WorkflowStage> = self.stages.iter().collect();
        stages.sort_by_key(|s| s.order);
        stages
    }
}

/// A request travelling through a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    /// Request identifier.
    pub id: ApprovalRequestId,
    /// Workflow in use.
    pub workflow_id: WorkflowId,
    /// Kind of record under approval, e.g. `member`.
    pub entity_type: String,
    /// Identifier of the record under approval.
    pub entity_id: String,
    /// Short human description of the record.
    #[serde(default)]
    pub entity_label: Option<String>,
    /// Who submitted it.
    pub submitted_by: UserId,
    /// When it was submitted.
    pub submitted_at: DateTime<Utc>,
    /// Overall status.
    pub status: ApprovalStatus,
    /// Order of the stage awaiting a decision.
    #[serde(default)]
    pub current_stage_order: Option<u32>,
}

/// An inbox entry: a stage waiting for the signed-in user's decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalTask {
    /// Request awaiting a decision.
    pub request_id: ApprovalRequestId,
    /// Stage awaiting a decision.
    pub stage_id: StageId,
    /// Stage name.
    pub stage_name: String,
    /// Kind of record.
    pub entity_type: String,
    /// Short description of the record.
    #[serde(default)]
    pub entity_label: Option<String>,
    /// When the stage became current.
    pub assigned_at: DateTime<Utc>,
}

/// One stage's outcome in a request's execution pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStep {
    /// Stage identifier.
    pub stage_id: StageId,
    /// Stage name.
    pub stage_name: String,
    /// Stage position.
    pub order: u32,
    /// Outcome so far.
    pub status: StepStatus,
    /// Who decided, if anyone.
    #[serde(default)]
    pub decided_by: Option<String>,
    /// When it was decided.
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
    /// Decision comment.
    #[serde(default)]
    pub comment: Option<String>,
}

/// The execution pipeline of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalExecution {
    /// Request identifier.
    pub request_id: ApprovalRequestId,
    /// Overall status.
    pub status: ApprovalStatus,
    /// Per-stage outcomes.
    pub steps: Vec<ExecutionStep>,
}

impl ApprovalExecution {
    /// Steps sorted by stage order.
    pub fn ordered_steps(&self) -> Vec<&ExecutionStep> {
        let mut steps: Vec<&ExecutionStep> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.order);
        steps
    }

    /// The first pending step, unless the request is already final.
    pub fn current_step(&self) -> Option<&ExecutionStep> {
        if matches!(
            self.status,
            ApprovalStatus::Approved | ApprovalStatus::Rejected | ApprovalStatus::Cancelled
        ) {
            return None;
        }
        self.ordered_steps()
            .into_iter()
            .find(|s| s.status == StepStatus::Pending)
    }
}

/// An approver's decision on the current stage.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_decision"))]
pub struct ApprovalDecision {
    /// Approve or reject.
    pub decision: Decision,
    /// Comment; required when rejecting.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}

fn validate_decision(decision: &ApprovalDecision) -> Result<(), ValidationError> {
    let has_comment = decision
        .comment
        .as_deref()
        .is_some_and(|c| !c.trim().is_empty());
    if decision.decision == Decision::Reject && !has_comment {
        let mut err = ValidationError::new("comment_required");
        err.message = Some("A comment is required when rejecting".into());
        return Err(err);
    }
    Ok(())
}

/// Stage definition within a workflow payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StageDefinition {
    /// Stage name.
    #[validate(length(min = 1, max = 80, message = "Stage name is required"))]
    pub name: String,
    /// Approver role.
    pub approver_role_id: RoleId,
    /// Auto-approve flag.
    #[serde(default)]
    pub auto_approve: bool,
}

/// Payload creating a workflow; stage order is the list order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflow {
    /// Workflow name.
    #[validate(length(min = 1, max = 80, message = "Workflow name is required"))]
    pub name: String,
    /// Module.
    #[validate(length(min = 1, max = 40))]
    pub module: String,
    /// Stages in order; at least one.
    #[validate(length(min = 1, message = "A workflow needs at least one stage"), nested)]
    pub stages: Vec<StageDefinition>,
}

/// Partial update of a workflow's header fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkflow {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 80))]
    pub name: Option<String>,
    /// Enable or disable the workflow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Submission of a record for approval.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApproval {
    /// Kind of record, e.g. `member`.
    #[validate(length(min = 1, max = 40, message = "Entity type is required"))]
    pub entity_type: String,
    /// Identifier of the record.
    #[validate(length(min = 1, message = "Entity id is required"))]
    pub entity_id: String,
    /// Workflow to use; the server picks the module default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<WorkflowId>,
    /// Note for the first approver.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}

/// Payload reordering a workflow's stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderStages {
    /// Stage identifiers in their new order.
    pub stage_ids: Vec<StageId>,
}

impl ReorderStages {
    /// Build a reorder payload moving the stage at `from` to `to` (0-based).
    pub fn moving(workflow: &Workflow, from: usize, to: usize) -> Option<Self> {
        let mut ids: Vec<StageId> = workflow.ordered_stages().iter().map(|s| s.id).collect();
        if from >= ids.len() || to >= ids.len() {
            return None;
        }
        let moved = ids.remove(from);
        ids.insert(to, moved);
        Some(Self { stage_ids: ids })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_payload;

    fn step(order: u32, status: StepStatus) -> ExecutionStep {
        ExecutionStep {
            stage_id: StageId::new(),
            stage_name: format!("Stage {order}"),
            order,
            status,
            decided_by: None,
            decided_at: None,
            comment: None,
        }
    }

    #[test]
    fn test_current_step_is_first_pending_by_order() {
        let execution = ApprovalExecution {
            request_id: ApprovalRequestId::new(),
            status: ApprovalStatus::InProgress,
            steps: vec![
                step(3, StepStatus::Pending),
                step(1, StepStatus::Approved),
                step(2, StepStatus::Pending),
            ],
        };
        assert_eq!(execution.current_step().unwrap().order, 2);
    }

    #[test]
    fn test_final_request_has_no_current_step() {
        let execution = ApprovalExecution {
            request_id: ApprovalRequestId::new(),
            status: ApprovalStatus::Rejected,
            steps: vec![step(1, StepStatus::Rejected), step(2, StepStatus::Pending)],
        };
        assert!(execution.current_step().is_none());
    }

    #[test]
    fn test_reject_requires_comment() {
        let reject = ApprovalDecision {
            decision: Decision::Reject,
            comment: Some("   ".to_string()),
        };
        assert!(validate_payload(&reject).is_err());
        let approve = ApprovalDecision {
            decision: Decision::Approve,
            comment: None,
        };
        assert!(validate_payload(&approve).is_ok());
    }

    #[test]
    fn test_reorder_moves_stage() {
        let role = RoleId::new();
        let stages: Vec<WorkflowStage> = (1..=3)
            .map(|order| WorkflowStage {
                id: StageId::new(),
                name: format!("S{order}"),
                order,
                approver_role_id: role,
                approver_role: None,
                auto_approve: false,
            })
            .collect();
        let workflow = Workflow {
            id: WorkflowId::new(),
            name: "Member onboarding".to_string(),
            module: "members".to_string(),
            is_active: true,
            stages: stages.clone(),
        };
        let reorder = ReorderStages::moving(&workflow, 2, 0).unwrap();
        assert_eq!(
            reorder.stage_ids,
            vec![stages[2].id, stages[0].id, stages[1].id]
        );
        assert!(ReorderStages::moving(&workflow, 3, 0).is_none());
    }

    #[test]
    fn test_workflow_needs_stage() {
        let workflow = CreateWorkflow {
            name: "Empty".to_string(),
            module: "claims".to_string(),
            stages: Vec::new(),
        };
        let err = validate_payload(&workflow).unwrap_err();
        assert!(err.message.contains("at least one stage"));
    }
}
