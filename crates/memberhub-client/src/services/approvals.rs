//! Approval workflows, requests, inbox, and decisions.
//!
//! Stage resolution happens on the server. The console lists what is
//! waiting, shows the execution pipeline and posts decisions.

use async_trait::async_trait;
use tracing::info;

use memberhub_core::error::AppError;
use memberhub_core::traits::SearchSource;
use memberhub_core::types::{ApprovalRequestId, SearchRequest, SearchResponse, WorkflowId};
use memberhub_entity::approval::{
    ApprovalDecision, ApprovalExecution, ApprovalRequest, ApprovalTask, CreateWorkflow,
    ReorderStages, SubmitApproval, UpdateWorkflow, Workflow,
};
use memberhub_entity::validation::validate_payload;

use crate::http::{HttpService, SearchEndpoint};

/// Workflow definitions.
#[derive(Debug, Clone)]
pub struct WorkflowService {
    http: HttpService,
}

impl WorkflowService {
    /// Creates a new workflow service.
    pub fn new(http: HttpService) -> Self {
        Self { http }
    }

    /// Gets one workflow with its stages.
    pub async fn get(&self, id: WorkflowId) -> Result<Workflow, AppError> {
        self.http.get(&format!("approval-workflows/{id}")).await
    }

    /// Creates a workflow.
    pub async fn create(&self, payload: &CreateWorkflow) -> Result<Workflow, AppError> {
        validate_payload(payload)?;
        let workflow: Workflow = self.http.post("approval-workflows", payload).await?;
        info!(
            workflow_id = %workflow.id,
            stages = workflow.stages.len(),
            "Approval workflow created"
        );
        Ok(workflow)
    }

    /// Applies a partial update.
    pub async fn update(
        &self,
        id: WorkflowId,
        payload: &UpdateWorkflow,
    ) -> Result<Workflow, AppError> {
        validate_payload(payload)?;
        let workflow = self
            .http
            .patch(&format!("approval-workflows/{id}"), payload)
            .await?;
        info!(workflow_id = %id, "Approval workflow updated");
        Ok(workflow)
    }

    /// Deletes a workflow.
    pub async fn delete(&self, id: WorkflowId) -> Result<(), AppError> {
        self.http
            .delete(&format!("approval-workflows/{id}"))
            .await?;
        info!(workflow_id = %id, "Approval workflow deleted");
        Ok(())
    }

    /// Persists a new stage order.
    pub async fn reorder_stages(
        &self,
        id: WorkflowId,
        payload: &ReorderStages,
    ) -> Result<Workflow, AppError> {
        if payload.stage_ids.is_empty() {
            return Err(AppError::validation("Stage order must not be empty"));
        }
        let workflow = self
            .http
            .put(&format!("approval-workflows/{id}/stages/reorder"), payload)
            .await?;
        info!(workflow_id = %id, "Workflow stages reordered");
        Ok(workflow)
    }
}

#[async_trait]
impl SearchSource<Workflow> for WorkflowService {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse<Workflow>, AppError> {
        self.http.search("approval-workflows/search", request).await
    }
}

/// Approval requests and decisions.
#[derive(Debug, Clone)]
pub struct ApprovalService {
    http: HttpService,
}

impl ApprovalService {
    /// Creates a new approval service.
    pub fn new(http: HttpService) -> Self {
        Self { http }
    }

    /// Gets one request.
    pub async fn get(&self, id: ApprovalRequestId) -> Result<ApprovalRequest, AppError> {
        self.http.get(&format!("approval-requests/{id}")).await
    }

    /// Submits a record for approval.
    pub async fn submit(&self, payload: &SubmitApproval) -> Result<ApprovalRequest, AppError> {
        validate_payload(payload)?;
        let request: ApprovalRequest = self.http.post("approval-requests", payload).await?;
        info!(
            request_id = %request.id,
            entity_type = %request.entity_type,
            "Approval request submitted"
        );
        Ok(request)
    }

    /// Stage-by-stage outcome of a request.
    pub async fn execution(&self, id: ApprovalRequestId) -> Result<ApprovalExecution, AppError> {
        self.http
            .get(&format!("approval-requests/{id}/execution"))
            .await
    }

    /// Records a decision on the current stage of a request.
    pub async fn decide(
        &self,
        id: ApprovalRequestId,
        decision: &ApprovalDecision,
    ) -> Result<ApprovalExecution, AppError> {
        validate_payload(decision)?;
        let execution: ApprovalExecution = self
            .http
            .post(&format!("approval-requests/{id}/decision"), decision)
            .await?;
        info!(
            request_id = %id,
            decision = %decision.decision,
            status = %execution.status,
            "Approval decision recorded"
        );
        Ok(execution)
    }

    /// Tasks awaiting the signed-in user's decision.
    pub fn inbox(&self) -> SearchEndpoint<ApprovalTask> {
        SearchEndpoint::new(self.http.clone(), "approval-tasks/search")
    }

    /// Requests submitted by the signed-in user.
    pub fn my_submissions(&self) -> SearchEndpoint<ApprovalRequest> {
        SearchEndpoint::new(self.http.clone(), "approval-requests/my-submissions/search")
    }
}

#[async_trait]
impl SearchSource<ApprovalRequest> for ApprovalService {
    async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<SearchResponse<ApprovalRequest>, AppError> {
        self.http.search("approval-requests/search", request).await
    }
}
