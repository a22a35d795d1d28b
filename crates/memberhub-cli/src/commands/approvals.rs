//! Approval CLI commands.

use clap::{ArgGroup, Args, Subcommand};

use memberhub_core::result::AppResult;
use memberhub_core::types::{ApprovalRequestId, WorkflowId};
use memberhub_entity::approval::{ApprovalDecision, Decision, SubmitApproval};
use memberhub_entity::validation::validate_payload;

use super::list::{self, QueryArgs};
use crate::output;
use crate::pages::PageContext;
use crate::pages::approvals::{
    RequestsPage, SubmissionsPage, TasksPage, WorkflowsPage, print_pipeline,
};

/// Arguments for approval commands
#[derive(Debug, Args)]
pub struct ApprovalArgs {
    /// Approval subcommand
    #[command(subcommand)]
    pub command: ApprovalCommand,
}

/// Approval subcommands
#[derive(Debug, Subcommand)]
pub enum ApprovalCommand {
    /// List all approval requests
    List(QueryArgs),
    /// List tasks awaiting my decision
    Tasks(QueryArgs),
    /// List requests I submitted
    Submissions(QueryArgs),
    /// List workflow definitions
    Workflows(QueryArgs),
    /// Approve or reject the current stage of a request
    #[command(group(ArgGroup::new("decision").required(true).args(["approve", "reject"])))]
    Decide {
        /// Request ID
        request: ApprovalRequestId,
        /// Approve the stage
        #[arg(long)]
        approve: bool,
        /// Reject the stage (needs --comment)
        #[arg(long)]
        reject: bool,
        /// Comment recorded with the decision
        #[arg(long)]
        comment: Option<String>,
    },
    /// Show a request's stages and their status
    Pipeline {
        /// Request ID
        request: ApprovalRequestId,
    },
    /// Submit an entity for approval
    Submit {
        /// Entity type, e.g. member
        entity_type: String,
        /// Entity ID
        entity_id: String,
        /// Workflow to use instead of the module default
        #[arg(long)]
        workflow: Option<WorkflowId>,
        /// Comment for the approvers
        #[arg(long)]
        comment: Option<String>,
    },
}

/// Execute approval commands
pub async fn execute(args: &ApprovalArgs, ctx: &PageContext) -> AppResult<()> {
    match &args.command {
        ApprovalCommand::List(query) => list::run(&RequestsPage, query, ctx).await?,
        ApprovalCommand::Tasks(query) => list::run(&TasksPage, query, ctx).await?,
        ApprovalCommand::Submissions(query) => list::run(&SubmissionsPage, query, ctx).await?,
        ApprovalCommand::Workflows(query) => list::run(&WorkflowsPage, query, ctx).await?,
        ApprovalCommand::Decide {
            request,
            approve,
            comment,
            ..
        } => {
            let decision = ApprovalDecision {
                decision: if *approve { Decision::Approve } else { Decision::Reject },
                comment: comment.clone(),
            };
            // Reject without a comment fails here, before the prompt.
            validate_payload(&decision)?;

            let question = format!(
                "{} the current stage of request {request}?",
                verb(decision.decision)
            );
            if !ctx.ask("Approval decision", question).await {
                return Ok(());
            }
            let execution = ctx.api.approvals.decide(*request, &decision).await?;
            output::print_success(&format!("Decision recorded: {}", decision.decision));
            print_pipeline(&execution, ctx.format);
        }
        ApprovalCommand::Pipeline { request } => {
            let execution = ctx.api.approvals.execution(*request).await?;
            print_pipeline(&execution, ctx.format);
        }
        ApprovalCommand::Submit {
            entity_type,
            entity_id,
            workflow,
            comment,
        } => {
            let payload = SubmitApproval {
                entity_type: entity_type.clone(),
                entity_id: entity_id.clone(),
                workflow_id: *workflow,
                comment: comment.clone(),
            };
            let request = ctx.api.approvals.submit(&payload).await?;
            output::print_success(&format!(
                "Submitted {} {} for approval as {}",
                request.entity_type, request.entity_id, request.id
            ));
        }
    }

    Ok(())
}

fn verb(decision: Decision) -> &'static str {
    match decision {
        Decision::Approve => "Approve",
        Decision::Reject => "Reject",
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(subcommand)]
        command: ApprovalCommand,
    }

    #[test]
    fn test_decide_needs_a_decision() {
        let id = ApprovalRequestId::new().to_string();
        assert!(Harness::try_parse_from(["memberhub", "decide", id.as_str()]).is_err());
        assert!(
            Harness::try_parse_from(["memberhub", "decide", id.as_str(), "--approve", "--reject"])
                .is_err()
        );
        let parsed = Harness::try_parse_from([
            "memberhub",
            "decide",
            id.as_str(),
            "--reject",
            "--comment",
            "Missing proof",
        ])
        .unwrap();
        assert!(matches!(parsed.command, ApprovalCommand::Decide { reject: true, .. }));
    }

    #[test]
    fn test_list_flags() {
        let parsed = Harness::try_parse_from([
            "memberhub",
            "tasks",
            "--filter",
            "entityType=member",
            "--sort",
            "assignedAt:desc",
            "-p",
            "2",
        ])
        .unwrap();
        let ApprovalCommand::Tasks(query) = parsed.command else {
            panic!("expected tasks");
        };
        assert_eq!(query.filters, vec![("entityType".to_string(), "member".to_string())]);
        assert_eq!(query.page, 2);
    }
}
