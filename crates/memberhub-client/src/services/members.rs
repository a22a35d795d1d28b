//! Members, their nominees, and suspension.

use async_trait::async_trait;
use tracing::info;

use memberhub_core::error::AppError;
use memberhub_core::traits::SearchSource;
use memberhub_core::types::{MemberId, SearchRequest, SearchResponse};
use memberhub_entity::member::{CreateMember, Member, Nominee, SuspendMember, UpdateMember};
use memberhub_entity::validation::validate_payload;

use crate::http::HttpService;

/// Member administration.
#[derive(Debug, Clone)]
pub struct MemberService {
    /// Shared HTTP client.
    http: HttpService,
}

impl MemberService {
    /// Creates a new member service.
    pub fn new(http: HttpService) -> Self {
        Self { http }
    }

    /// Gets one member.
    pub async fn get(&self, id: MemberId) -> Result<Member, AppError> {
        self.http.get(&format!("members/{id}")).await
    }

    /// Registers a member together with their nominees.
    pub async fn create(&self, payload: &CreateMember) -> Result<Member, AppError> {
        validate_payload(payload)?;
        let member: Member = self.http.post("members", payload).await?;
        info!(member_id = %member.id, code = %member.member_code, "Member registered");
        Ok(member)
    }

    /// Applies a partial update.
    pub async fn update(&self, id: MemberId, payload: &UpdateMember) -> Result<Member, AppError> {
        validate_payload(payload)?;
        let member = self.http.patch(&format!("members/{id}"), payload).await?;
        info!(member_id = %id, "Member updated");
        Ok(member)
    }

    /// Suspends a member.
    pub async fn suspend(&self, id: MemberId, payload: &SuspendMember) -> Result<Member, AppError> {
        validate_payload(payload)?;
        let member = self
            .http
            .post(&format!("members/{id}/suspend"), payload)
            .await?;
        info!(member_id = %id, "Member suspended");
        Ok(member)
    }

    /// Lifts a suspension.
    pub async fn reactivate(&self, id: MemberId) -> Result<Member, AppError> {
        let member = self
            .http
            .post(&format!("members/{id}/reactivate"), &serde_json::json!({}))
            .await?;
        info!(member_id = %id, "Member reactivated");
        Ok(member)
    }

    /// Lists a member's nominees.
    pub async fn nominees(&self, id: MemberId) -> Result<Vec<Nominee>, AppError> {
        self.http.get(&format!("members/{id}/nominees")).await
    }
}

#[async_trait]
impl SearchSource<Member> for MemberService {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse<Member>, AppError> {
        self.http.search("members/search", request).await
    }
}
