//! Member CLI commands.

use clap::{Args, Subcommand};
use tokio::time::Instant;

use memberhub_core::result::AppResult;

use super::list::{self, QueryArgs};
use crate::output;
use crate::pages::PageContext;
use crate::pages::members::{MemberMatch, MembersPage, member_lookup};

/// Arguments for member commands
#[derive(Debug, Args)]
pub struct MemberArgs {
    /// Member subcommand
    #[command(subcommand)]
    pub command: MemberCommand,
}

/// Member subcommands
#[derive(Debug, Subcommand)]
pub enum MemberCommand {
    /// List one page of members
    List(QueryArgs),
    /// Look a member up by code, name or phone
    Find {
        /// Search term
        term: String,
    },
}

/// Execute member commands
pub async fn execute(args: &MemberArgs, ctx: &PageContext) -> AppResult<()> {
    match &args.command {
        MemberCommand::List(query) => list::run(&MembersPage, query, ctx).await?,
        MemberCommand::Find { term } => {
            let mut lookup = member_lookup(&ctx.api, &ctx.table);
            lookup.input(term, Instant::now());
            match lookup.settle().await? {
                Some(members) => {
                    let rows: Vec<MemberMatch> = members.iter().map(MemberMatch::from).collect();
                    output::print_list(&rows, ctx.format);
                }
                None => output::print_warning(&format!(
                    "Type at least {} characters to search members",
                    lookup.min_chars()
                )),
            }
        }
    }

    Ok(())
}
