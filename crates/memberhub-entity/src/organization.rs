//! Organizational hierarchy: areas contain forums, forums contain units.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use memberhub_core::types::{AreaId, ForumId, UnitId};

use crate::validation::validate_code;

/// A top-level geographic area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    /// Area identifier.
    pub id: AreaId,
    /// Area name.
    pub name: String,
    /// Short code.
    pub code: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the area accepts new registrations.
    pub is_active: bool,
    /// Number of forums in the area.
    #[serde(default)]
    pub forum_count: u32,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// A forum within an area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forum {
    /// Forum identifier.
    pub id: ForumId,
    /// Parent area.
    pub area_id: AreaId,
    /// Embedded area when eager-loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<AreaSummary>,
    /// Forum name.
    pub name: String,
    /// Short code.
    pub code: String,
    /// Whether the forum is active.
    pub is_active: bool,
    /// Number of units in the forum.
    #[serde(default)]
    pub unit_count: u32,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// A unit within a forum; agents and members belong to units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// Unit identifier.
    pub id: UnitId,
    /// Parent forum.
    pub forum_id: ForumId,
    /// Embedded forum when eager-loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forum: Option<ForumSummary>,
    /// Unit name.
    pub name: String,
    /// Short code.
    pub code: String,
    /// Whether the unit is active.
    pub is_active: bool,
    /// Number of members in the unit.
    #[serde(default)]
    pub member_count: u32,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Compact area reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSummary {
    /// Area identifier.
    pub id: AreaId,
    /// Area name.
    pub name: String,
}

/// Compact forum reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumSummary {
    /// Forum identifier.
    pub id: ForumId,
    /// Forum name.
    pub name: String,
}

/// Compact unit reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSummary {
    /// Unit identifier.
    pub id: UnitId,
    /// Unit name.
    pub name: String,
}

/// Payload for creating an area, forum or unit.
///
/// `parent_id` is the area for a forum and the forum for a unit; it is
/// ignored for areas.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrgNode {
    /// Display name.
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    /// Short code.
    #[validate(length(max = 20), custom(function = "validate_code"))]
    pub code: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// Parent node identifier, as a raw UUID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<uuid::Uuid>,
}

/// Partial update of an area, forum or unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrgNode {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// Activate or deactivate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
