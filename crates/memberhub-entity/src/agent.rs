//! Agents who enrol and service members.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use memberhub_core::types::{AgentId, UnitId};

use crate::organization::UnitSummary;
use crate::validation::{validate_code, validate_phone};

wire_enum!(
    /// Agent account status.
    AgentStatus {
        /// Can enrol members.
        Active => "active",
        /// Deactivated by an administrator.
        Inactive => "inactive",
        /// Suspended pending review.
        Suspended => "suspended",
    }
);

/// An agent as listed by the administration API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Unique agent identifier.
    pub id: AgentId,
    /// Human-facing agent code.
    pub agent_code: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    pub phone: String,
    /// Unit the agent belongs to.
    #[serde(default)]
    pub unit_id: Option<UnitId>,
    /// Embedded unit when eager-loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<UnitSummary>,
    /// Account status.
    pub status: AgentStatus,
    /// Number of members enrolled by this agent.
    #[serde(default)]
    pub member_count: u32,
    /// Date the agent joined.
    #[serde(default)]
    pub joined_on: Option<NaiveDate>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl Agent {
    /// Given and family name joined.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Compact agent reference embedded in other records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSummary {
    /// Agent identifier.
    pub id: AgentId,
    /// Agent code.
    pub agent_code: String,
    /// Display name.
    pub name: String,
}

/// Payload for registering an agent.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgent {
    /// Agent code.
    #[validate(length(max = 20), custom(function = "validate_code"))]
    pub agent_code: String,
    /// Given name.
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    /// Family name.
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    /// Contact email.
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    /// Contact phone.
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    /// Owning unit.
    pub unit_id: UnitId,
}

/// Partial update of an agent (PATCH).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAgent {
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
