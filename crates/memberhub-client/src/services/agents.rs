//! Field agents: listing, onboarding, and activation.

use async_trait::async_trait;
use tracing::info;

use memberhub_core::error::AppError;
use memberhub_core::traits::SearchSource;
use memberhub_core::types::{AgentId, SearchRequest, SearchResponse};
use memberhub_entity::agent::{Agent, CreateAgent, UpdateAgent};
use memberhub_entity::validation::validate_payload;

use crate::http::HttpService;

/// Agent administration.
#[derive(Debug, Clone)]
pub struct AgentService {
    /// Shared HTTP client.
    http: HttpService,
}

impl AgentService {
    /// Creates a new agent service.
    pub fn new(http: HttpService) -> Self {
        Self { http }
    }

    /// Gets one agent.
    pub async fn get(&self, id: AgentId) -> Result<Agent, AppError> {
        self.http.get(&format!("agents/{id}")).await
    }

    /// Registers a new agent.
    pub async fn create(&self, payload: &CreateAgent) -> Result<Agent, AppError> {
        validate_payload(payload)?;
        let agent: Agent = self.http.post("agents", payload).await?;
        info!(agent_id = %agent.id, code = %agent.agent_code, "Agent created");
        Ok(agent)
    }

    /// Applies a partial update.
    pub async fn update(&self, id: AgentId, payload: &UpdateAgent) -> Result<Agent, AppError> {
        validate_payload(payload)?;
        let agent = self.http.patch(&format!("agents/{id}"), payload).await?;
        info!(agent_id = %id, "Agent updated");
        Ok(agent)
    }

    /// Re-enables an agent.
    pub async fn activate(&self, id: AgentId) -> Result<Agent, AppError> {
        let agent = self
            .http
            .post(&format!("agents/{id}/activate"), &serde_json::json!({}))
            .await?;
        info!(agent_id = %id, "Agent activated");
        Ok(agent)
    }

    /// Disables an agent. The server refuses while members are still assigned.
    pub async fn deactivate(&self, id: AgentId) -> Result<Agent, AppError> {
        let agent = self
            .http
            .post(&format!("agents/{id}/deactivate"), &serde_json::json!({}))
            .await?;
        info!(agent_id = %id, "Agent deactivated");
        Ok(agent)
    }

    /// Deletes an agent.
    pub async fn delete(&self, id: AgentId) -> Result<(), AppError> {
        self.http.delete(&format!("agents/{id}")).await?;
        info!(agent_id = %id, "Agent deleted");
        Ok(())
    }
}

#[async_trait]
impl SearchSource<Agent> for AgentService {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse<Agent>, AppError> {
        self.http.search("agents/search", request).await
    }
}
