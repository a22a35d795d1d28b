//! Member wallets and their transaction ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use memberhub_core::types::{MemberId, TransactionId, WalletId};

wire_enum!(
    /// Ledger entry kind.
    TransactionKind {
        /// Money paid in by the member.
        Deposit => "deposit",
        /// Contribution debited towards a claim.
        Contribution => "contribution",
        /// Money returned to the member.
        Refund => "refund",
        /// Manual correction.
        Adjustment => "adjustment",
    }
);

wire_enum!(
    /// Settlement status of a ledger entry.
    TransactionStatus {
        /// Awaiting settlement.
        Pending => "pending",
        /// Settled.
        Completed => "completed",
        /// Failed or reversed.
        Failed => "failed",
    }
);

/// A member's wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    /// Wallet identifier.
    pub id: WalletId,
    /// Owning member.
    pub member_id: MemberId,
    /// Current balance.
    pub balance: f64,
    /// ISO currency code.
    pub currency: String,
    /// Whether debits are allowed.
    pub is_active: bool,
    /// Last movement.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    /// Transaction identifier.
    pub id: TransactionId,
    /// Wallet.
    pub wallet_id: WalletId,
    /// Entry kind.
    pub kind: TransactionKind,
    /// Signed amount.
    pub amount: f64,
    /// Balance after the entry.
    pub balance_after: f64,
    /// External reference.
    #[serde(default)]
    pub reference: Option<String>,
    /// Settlement status.
    pub status: TransactionStatus,
    /// When it was recorded.
    pub created_at: DateTime<Utc>,
}

/// Request to credit a member's wallet.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    /// Amount to deposit.
    #[validate(range(min = 1.0, max = 1000000.0, message = "Amount must be between 1 and 1,000,000"))]
    pub amount: f64,
    /// Payment reference.
    #[validate(length(min = 1, max = 80, message = "A payment reference is required"))]
    pub reference: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_payload;

    #[test]
    fn test_deposit_bounds() {
        let deposit = DepositRequest {
            amount: 0.5,
            reference: "UPI-1".to_string(),
        };
        assert!(validate_payload(&deposit).is_err());
        let deposit = DepositRequest {
            amount: 500.0,
            reference: "UPI-1".to_string(),
        };
        assert!(validate_payload(&deposit).is_ok());
    }
}
