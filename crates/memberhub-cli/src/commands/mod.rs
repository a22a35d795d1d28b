//! CLI command definitions and dispatch.

pub mod approvals;
pub mod browse;
pub mod claims;
pub mod list;
pub mod members;
pub mod wallets;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use memberhub_client::ApiServices;
use memberhub_core::config::AppConfig;
use memberhub_core::result::AppResult;
use memberhub_core::traits::Confirmation;

use crate::confirm::{AssumeYes, DialoguerConfirmation};
use crate::output::{self, OutputFormat};
use crate::pages::access::{PermissionsPage, RolesPage, UsersPage};
use crate::pages::agents::AgentsPage;
use crate::pages::organization::{AreasPage, ForumsPage, UnitsPage};
use crate::pages::{ListPage, PageContext};

use self::list::QueryArgs;

/// MemberHub administration console
#[derive(Debug, Parser)]
#[command(name = "memberhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults to config/default.toml when present)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Answer yes to every confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Agents
    Agents(PageArgs),
    /// Members
    Members(members::MemberArgs),
    /// Areas
    Areas(PageArgs),
    /// Forums
    Forums(PageArgs),
    /// Units
    Units(PageArgs),
    /// Roles
    Roles(PageArgs),
    /// Permission catalogue
    Permissions(PageArgs),
    /// Console users
    Users(PageArgs),
    /// Death claims
    Claims(claims::ClaimArgs),
    /// Approval requests, tasks and workflows
    Approvals(approvals::ApprovalArgs),
    /// Member wallets
    Wallets(wallets::WalletArgs),
    /// Show the signed-in user's profile
    Profile,
    /// Open an interactive list session
    Browse(browse::BrowseArgs),
}

/// Arguments for a plain list page
#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page subcommand
    #[command(subcommand)]
    pub command: PageCommand,
}

/// Plain list page subcommands
#[derive(Debug, Subcommand)]
pub enum PageCommand {
    /// List one page of records
    List(QueryArgs),
}

impl PageArgs {
    async fn execute<P: ListPage>(&self, page: &P, ctx: &PageContext) -> AppResult<()> {
        match &self.command {
            PageCommand::List(query) => list::run(page, query, ctx).await,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        let ctx = self.context(config)?;
        match &self.command {
            Commands::Agents(args) => args.execute(&AgentsPage, &ctx).await,
            Commands::Members(args) => members::execute(args, &ctx).await,
            Commands::Areas(args) => args.execute(&AreasPage, &ctx).await,
            Commands::Forums(args) => args.execute(&ForumsPage, &ctx).await,
            Commands::Units(args) => args.execute(&UnitsPage, &ctx).await,
            Commands::Roles(args) => args.execute(&RolesPage, &ctx).await,
            Commands::Permissions(args) => args.execute(&PermissionsPage, &ctx).await,
            Commands::Users(args) => args.execute(&UsersPage, &ctx).await,
            Commands::Claims(args) => claims::execute(args, &ctx).await,
            Commands::Approvals(args) => approvals::execute(args, &ctx).await,
            Commands::Wallets(args) => wallets::execute(args, &ctx).await,
            Commands::Profile => {
                let profile = ctx.api.users.profile().await?;
                output::print_item(&profile, ctx.format);
                Ok(())
            }
            Commands::Browse(args) => browse::execute(args, &ctx).await,
        }
    }

    /// Build the shared services and the confirmation policy.
    pub fn context(&self, config: AppConfig) -> AppResult<PageContext> {
        let confirm: Arc<dyn Confirmation> = if self.yes {
            Arc::new(AssumeYes)
        } else {
            Arc::new(DialoguerConfirmation)
        };
        Ok(PageContext {
            api: ApiServices::from_config(&config.api)?,
            table: config.table,
            confirm,
            format: self.format,
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use crate::pages::PageKind;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_page_list_flags() {
        let cli = Cli::try_parse_from([
            "memberhub",
            "--format",
            "json",
            "-y",
            "members",
            "list",
            "--search",
            "asha",
            "--filter",
            "status=active,suspended",
            "--filter",
            "registeredAt=2024-01-01..2024-01-31",
            "--sort",
            "registeredAt:desc",
            "--page-size",
            "25",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.yes);
        let Commands::Members(members::MemberArgs {
            command: members::MemberCommand::List(query),
        }) = cli.command
        else {
            panic!("expected members list");
        };
        assert_eq!(query.search.as_deref(), Some("asha"));
        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, Some(25));
    }

    #[test]
    fn test_plain_page_list() {
        let cli = Cli::try_parse_from(["memberhub", "roles", "list", "-p", "3"]).unwrap();
        let Commands::Roles(PageArgs {
            command: PageCommand::List(query),
        }) = cli.command
        else {
            panic!("expected roles list");
        };
        assert_eq!(query.page, 3);
        assert!(Cli::try_parse_from(["memberhub", "members", "find"]).is_err());
    }

    #[test]
    fn test_browse_takes_page_kind() {
        let cli = Cli::try_parse_from(["memberhub", "browse", "tasks"]).unwrap();
        let Commands::Browse(args) = cli.command else {
            panic!("expected browse");
        };
        assert_eq!(args.page, PageKind::Tasks);
        assert!(Cli::try_parse_from(["memberhub", "browse", "invoices"]).is_err());
    }

    #[test]
    fn test_claim_upload_flags() {
        let cli = Cli::try_parse_from([
            "memberhub",
            "claims",
            "upload",
            "6f1c1a52-4f0e-4a8e-9a53-0d6f1f4f7b10",
            "certificate.pdf",
            "--type",
            "death_certificate",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Claims(_)));
        assert!(
            Cli::try_parse_from([
                "memberhub",
                "claims",
                "upload",
                "6f1c1a52-4f0e-4a8e-9a53-0d6f1f4f7b10",
                "certificate.pdf",
                "--type",
                "selfie",
            ])
            .is_err()
        );
    }
}
