//! Member wallets.

use tracing::info;

use memberhub_core::error::AppError;
use memberhub_core::types::{MemberId, WalletId};
use memberhub_entity::validation::validate_payload;
use memberhub_entity::wallet::{DepositRequest, Wallet, WalletTransaction};

use crate::http::{HttpService, SearchEndpoint};

/// Wallet lookups and deposit requests. Settlement happens server side.
#[derive(Debug, Clone)]
pub struct WalletService {
    http: HttpService,
}

impl WalletService {
    /// Creates a new wallet service.
    pub fn new(http: HttpService) -> Self {
        Self { http }
    }

    /// The wallet owned by a member.
    pub async fn for_member(&self, member_id: MemberId) -> Result<Wallet, AppError> {
        self.http
            .get(&format!("wallets/member/{member_id}"))
            .await
    }

    /// Ledger of one wallet.
    pub fn transactions(&self, wallet_id: WalletId) -> SearchEndpoint<WalletTransaction> {
        SearchEndpoint::new(
            self.http.clone(),
            format!("wallets/{wallet_id}/transactions/search"),
        )
    }

    /// Requests a deposit; the returned entry stays pending until settled.
    pub async fn request_deposit(
        &self,
        wallet_id: WalletId,
        payload: &DepositRequest,
    ) -> Result<WalletTransaction, AppError> {
        validate_payload(payload)?;
        let entry: WalletTransaction = self
            .http
            .post(&format!("wallets/{wallet_id}/deposits"), payload)
            .await?;
        info!(
            wallet_id = %wallet_id,
            transaction_id = %entry.id,
            amount = payload.amount,
            "Deposit requested"
        );
        Ok(entry)
    }
}
