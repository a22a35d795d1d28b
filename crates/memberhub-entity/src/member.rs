//! Members enrolled in the benefits scheme, and their nominees.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use memberhub_core::types::{AgentId, MemberId, NomineeId, UnitId};

use crate::agent::AgentSummary;
use crate::organization::UnitSummary;
use crate::validation::{validate_min_age, validate_phone};

wire_enum!(
    /// Membership lifecycle status.
    MemberStatus {
        /// Registered, awaiting approval.
        Pending => "pending",
        /// Contributing member.
        Active => "active",
        /// Temporarily suspended (e.g. missed contributions).
        Suspended => "suspended",
        /// Member has died; a claim may exist.
        Deceased => "deceased",
        /// Membership closed.
        Closed => "closed",
    }
);

wire_enum!(
    /// Gender as recorded at registration.
    Gender {
        /// Male.
        Male => "male",
        /// Female.
        Female => "female",
        /// Other or undisclosed.
        Other => "other",
    }
);

/// A member as listed by the administration API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Member identifier.
    pub id: MemberId,
    /// Human-facing membership number.
    pub member_code: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
    /// Gender.
    pub gender: Gender,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    pub phone: String,
    /// Enrolling agent.
    pub agent_id: AgentId,
    /// Embedded agent when eager-loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentSummary>,
    /// Unit the member belongs to.
    pub unit_id: UnitId,
    /// Embedded unit when eager-loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<UnitSummary>,
    /// Lifecycle status.
    pub status: MemberStatus,
    /// When the member registered.
    pub registered_at: DateTime<Utc>,
}

impl Member {
    /// Given and family name joined.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether the member can be suspended from the current status.
    pub fn can_suspend(&self) -> bool {
        self.status == MemberStatus::Active
    }

    /// Whether the member can be reactivated from the current status.
    pub fn can_reactivate(&self) -> bool {
        self.status == MemberStatus::Suspended
    }
}

/// Compact member reference embedded in claims and wallets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    /// Member identifier.
    pub id: MemberId,
    /// Membership number.
    pub member_code: String,
    /// Display name.
    pub name: String,
}

/// A person who receives benefits on the member's death.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nominee {
    /// Nominee identifier.
    pub id: NomineeId,
    /// Full name.
    pub name: String,
    /// Relationship to the member.
    pub relationship: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Percentage of the benefit.
    pub share_percent: u8,
}

/// Nominee entry within a registration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNominee {
    /// Full name.
    #[validate(length(min = 1, max = 120, message = "Nominee name is required"))]
    pub name: String,
    /// Relationship to the member.
    #[validate(length(min = 1, max = 40))]
    pub relationship: String,
    /// Contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    /// Percentage of the benefit.
    #[validate(range(min = 1, max = 100))]
    pub share_percent: u8,
}

/// Payload for registering a member.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_nominee_shares"))]
pub struct CreateMember {
    /// Given name.
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    /// Family name.
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    /// Date of birth.
    #[validate(custom(function = "validate_min_age"))]
    pub date_of_birth: NaiveDate,
    /// Gender.
    pub gender: Gender,
    /// Contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    /// Contact phone.
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    /// Enrolling agent.
    pub agent_id: AgentId,
    /// Unit.
    pub unit_id: UnitId,
    /// Nominees; shares must add up to 100 when any are given.
    #[validate(nested)]
    pub nominees: Vec<CreateNominee>,
}

fn validate_nominee_shares(member: &CreateMember) -> Result<(), ValidationError> {
    if member.nominees.is_empty() {
        return Ok(());
    }
    let total: u32 = member
        .nominees
        .iter()
        .map(|n| u32::from(n.share_percent))
        .sum();
    if total != 100 {
        let mut err = ValidationError::new("nominee_shares");
        err.message = Some(format!("Nominee shares must total 100%, got {total}%").into());
        return Err(err);
    }
    Ok(())
}

/// Partial update of a member (PATCH).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMember {
    /// New given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    /// New family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    /// New email.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    /// New phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    /// Move to another unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<UnitId>,
}

/// Reason attached to a suspension.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SuspendMember {
    /// Why the member is suspended.
    #[validate(length(min = 1, max = 500, message = "A reason is required"))]
    pub reason: String,
}
