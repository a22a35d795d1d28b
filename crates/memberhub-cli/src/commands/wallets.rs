//! Wallet CLI commands.

use std::sync::Arc;

use clap::{Args, Subcommand};

use memberhub_core::result::AppResult;
use memberhub_core::types::MemberId;
use memberhub_entity::wallet::DepositRequest;

use super::list::{self, QueryArgs};
use crate::output;
use crate::pages::PageContext;
use crate::pages::wallets::transactions_table;

/// Arguments for wallet commands
#[derive(Debug, Args)]
pub struct WalletArgs {
    /// Wallet subcommand
    #[command(subcommand)]
    pub command: WalletCommand,
}

/// Wallet subcommands
#[derive(Debug, Subcommand)]
pub enum WalletCommand {
    /// Show a member's wallet
    Show {
        /// Member ID
        member: MemberId,
    },
    /// List a member's wallet transactions
    Transactions {
        /// Member ID
        member: MemberId,
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Request a deposit into a member's wallet
    Deposit {
        /// Member ID
        member: MemberId,
        /// Amount
        #[arg(long)]
        amount: f64,
        /// Payment reference
        #[arg(long)]
        reference: String,
    },
}

/// Execute wallet commands
pub async fn execute(args: &WalletArgs, ctx: &PageContext) -> AppResult<()> {
    match &args.command {
        WalletCommand::Show { member } => {
            let wallet = ctx.api.wallets.for_member(*member).await?;
            output::print_item(&wallet, ctx.format);
        }
        WalletCommand::Transactions { member, query } => {
            let wallet = ctx.api.wallets.for_member(*member).await?;
            let source = Arc::new(ctx.api.wallets.transactions(wallet.id));
            list::run_query(
                "wallet-transactions",
                transactions_table(&ctx.table),
                source,
                query,
                ctx,
            )
            .await?;
        }
        WalletCommand::Deposit {
            member,
            amount,
            reference,
        } => {
            let payload = DepositRequest {
                amount: *amount,
                reference: reference.clone(),
            };
            let wallet = ctx.api.wallets.for_member(*member).await?;
            let question = format!(
                "Request a deposit of {:.2} {} into wallet {}?",
                amount, wallet.currency, wallet.id
            );
            if !ctx.ask("Deposit", question).await {
                return Ok(());
            }
            let entry = ctx.api.wallets.request_deposit(wallet.id, &payload).await?;
            output::print_success(&format!(
                "Deposit {} is {} (balance after {:.2})",
                entry.id, entry.status, entry.balance_after
            ));
        }
    }

    Ok(())
}
