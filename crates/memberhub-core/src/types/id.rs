//! Newtype wrappers around [`uuid::Uuid`] for domain entity identifiers.
//!
//! Distinct types prevent passing a `MemberId` where an `AgentId` is
//! expected when building API paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to define a newtype ID wrapper around `Uuid`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Return the inner UUID value.
            pub fn into_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a member.
    MemberId
);

define_id!(
    /// Unique identifier for a member's nominee.
    NomineeId
);

define_id!(
    /// Unique identifier for an agent.
    AgentId
);

define_id!(
    /// Unique identifier for an area.
    AreaId
);

define_id!(
    /// Unique identifier for a forum.
    ForumId
);

define_id!(
    /// Unique identifier for an organizational unit.
    UnitId
);

define_id!(
    /// Unique identifier for a role.
    RoleId
);

define_id!(
    /// Unique identifier for a permission.
    PermissionId
);

define_id!(
    /// Unique identifier for a console user.
    UserId
);

define_id!(
    /// Unique identifier for a death claim.
    ClaimId
);

define_id!(
    /// Unique identifier for an uploaded document.
    DocumentId
);

define_id!(
    /// Unique identifier for an approval workflow.
    WorkflowId
);

define_id!(
    /// Unique identifier for a workflow stage.
    StageId
);

define_id!(
    /// Unique identifier for an approval request.
    ApprovalRequestId
);

define_id!(
    /// Unique identifier for a wallet.
    WalletId
);

define_id!(
    /// Unique identifier for a wallet transaction.
    TransactionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_id_new() {
        assert_ne!(MemberId::new(), MemberId::new());
    }

    #[test]
    fn test_member_id_from_str() {
        let uuid = Uuid::new_v4();
        let id: MemberId = uuid.to_string().parse().expect("should parse");
        assert_eq!(id.into_uuid(), uuid);
        assert!("not-a-uuid".parse::<AgentId>().is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let id = ClaimId::new();
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, format!("\"{id}\""));
    }
}
