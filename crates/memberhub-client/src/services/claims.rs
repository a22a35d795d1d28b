//! Death claims and their supporting documents.

use async_trait::async_trait;
use tracing::info;

use memberhub_core::error::AppError;
use memberhub_core::traits::SearchSource;
use memberhub_core::types::{ClaimId, SearchRequest, SearchResponse};
use memberhub_entity::claim::{
    ClaimDocument, CreateClaim, DeathClaim, DocumentUpload, UpdateClaimStatus,
};
use memberhub_entity::validation::validate_payload;

use crate::http::HttpService;

/// Death claim administration.
#[derive(Debug, Clone)]
pub struct ClaimService {
    http: HttpService,
}

impl ClaimService {
    /// Creates a new claim service.
    pub fn new(http: HttpService) -> Self {
        Self { http }
    }

    /// Gets one claim.
    pub async fn get(&self, id: ClaimId) -> Result<DeathClaim, AppError> {
        self.http.get(&format!("death-claims/{id}")).await
    }

    /// Reports a death.
    pub async fn create(&self, payload: &CreateClaim) -> Result<DeathClaim, AppError> {
        validate_payload(payload)?;
        let claim: DeathClaim = self.http.post("death-claims", payload).await?;
        info!(claim_id = %claim.id, number = %claim.claim_number, "Death claim reported");
        Ok(claim)
    }

    /// Moves a claim to its next status.
    ///
    /// Transitions not allowed from the current status are rejected locally
    /// when `current` is known.
    pub async fn update_status(
        &self,
        id: ClaimId,
        current: Option<&DeathClaim>,
        payload: &UpdateClaimStatus,
    ) -> Result<DeathClaim, AppError> {
        validate_payload(payload)?;
        if let Some(claim) = current {
            if !claim.status.next().contains(&payload.status) {
                return Err(AppError::validation(format!(
                    "Claim {} cannot move from {} to {}",
                    claim.claim_number, claim.status, payload.status
                )));
            }
        }
        let claim = self
            .http
            .patch(&format!("death-claims/{id}/status"), payload)
            .await?;
        info!(claim_id = %id, status = %payload.status, "Claim status updated");
        Ok(claim)
    }

    /// Uploads a supporting document as multipart form data.
    pub async fn upload_document(
        &self,
        id: ClaimId,
        upload: &DocumentUpload,
    ) -> Result<ClaimDocument, AppError> {
        let document: ClaimDocument = self
            .http
            .upload(&format!("death-claims/{id}/documents"), upload)
            .await?;
        info!(
            claim_id = %id,
            document_id = %document.id,
            kind = %upload.document_type,
            size = upload.content.len(),
            "Claim document uploaded"
        );
        Ok(document)
    }

    /// Lists a claim's documents.
    pub async fn documents(&self, id: ClaimId) -> Result<Vec<ClaimDocument>, AppError> {
        self.http.get(&format!("death-claims/{id}/documents")).await
    }
}

#[async_trait]
impl SearchSource<DeathClaim> for ClaimService {
    async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<SearchResponse<DeathClaim>, AppError> {
        self.http.search("death-claims/search", request).await
    }
}
