//! Death claims raised against deceased members, and their documents.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use memberhub_core::types::{ClaimId, DocumentId, MemberId};

use crate::member::MemberSummary;

wire_enum!(
    /// Claim processing status.
    ClaimStatus {
        /// Death reported, nothing verified yet.
        Reported => "reported",
        /// Documents under verification.
        UnderVerification => "under_verification",
        /// Documents verified.
        Verified => "verified",
        /// Approved for payout.
        Approved => "approved",
        /// Rejected.
        Rejected => "rejected",
        /// Paid out to nominees.
        Settled => "settled",
    }
);

impl ClaimStatus {
    /// Statuses a claim may move to next.
    pub fn next(&self) -> &'static [ClaimStatus] {
        match self {
            Self::Reported => &[Self::UnderVerification, Self::Rejected],
            Self::UnderVerification => &[Self::Verified, Self::Rejected],
            Self::Verified => &[Self::Approved, Self::Rejected],
            Self::Approved => &[Self::Settled],
            Self::Rejected | Self::Settled => &[],
        }
    }

    /// Whether no further transition is possible.
    pub fn is_final(&self) -> bool {
        self.next().is_empty()
    }
}

wire_enum!(
    /// Kind of supporting document.
    DocumentType {
        /// Death certificate.
        DeathCertificate => "death_certificate",
        /// Identity proof of the deceased.
        IdentityProof => "identity_proof",
        /// Identity proof of the nominee.
        NomineeProof => "nominee_proof",
        /// Bank account details for payout.
        BankDetails => "bank_details",
        /// Anything else.
        Other => "other",
    }
);

/// A death claim as listed by the administration API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeathClaim {
    /// Claim identifier.
    pub id: ClaimId,
    /// Human-facing claim number.
    pub claim_number: String,
    /// Deceased member.
    pub member_id: MemberId,
    /// Embedded member when eager-loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<MemberSummary>,
    /// Date of death.
    pub date_of_death: NaiveDate,
    /// Processing status.
    pub status: ClaimStatus,
    /// Benefit amount once assessed.
    #[serde(default)]
    pub claim_amount: Option<f64>,
    /// Reviewer remarks.
    #[serde(default)]
    pub remarks: Option<String>,
    /// When the death was reported.
    pub reported_at: DateTime<Utc>,
}

/// A document attached to a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDocument {
    /// Document identifier.
    pub id: DocumentId,
    /// Document kind.
    pub document_type: DocumentType,
    /// Display name.
    pub document_name: String,
    /// MIME type.
    pub mime_type: String,
    /// Download location.
    pub url: String,
    /// When it was uploaded.
    pub uploaded_at: DateTime<Utc>,
}

/// Payload for reporting a death.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClaim {
    /// Deceased member.
    pub member_id: MemberId,
    /// Date of death.
    pub date_of_death: NaiveDate,
    /// Place of death.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200))]
    pub place_of_death: Option<String>,
    /// Cause of death.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub cause: Option<String>,
}

/// Payload moving a claim to another status.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClaimStatus {
    /// Target status.
    pub status: ClaimStatus,
    /// Reviewer remarks.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000))]
    pub remarks: Option<String>,
}

/// Upper bound on uploaded documents, in bytes.
pub const MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

/// A document ready to be sent as multipart form data.
#[derive(Debug, Clone, Validate)]
pub struct DocumentUpload {
    /// Document kind (`documentType` form field).
    pub document_type: DocumentType,
    /// Display name (`documentName` form field).
    #[validate(length(min = 1, max = 200, message = "Document name is required"))]
    pub document_name: String,
    /// MIME type (`mimeType` form field).
    #[validate(length(min = 3, message = "MIME type is required"))]
    pub mime_type: String,
    /// Original file name of the `file` part.
    pub file_name: String,
    /// File contents.
    #[validate(length(min = 1, max = 10485760, message = "File must be between 1 byte and 10 MiB"))]
    pub content: Vec<u8>,
}
