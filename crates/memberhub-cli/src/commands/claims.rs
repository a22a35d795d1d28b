//! Death claim CLI commands.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, Subcommand};

use memberhub_core::error::AppError;
use memberhub_core::result::AppResult;
use memberhub_core::types::{ClaimId, MemberId};
use memberhub_entity::claim::{
    ClaimStatus, CreateClaim, DocumentType, DocumentUpload, MAX_DOCUMENT_BYTES,
    UpdateClaimStatus,
};

use super::list::{self, QueryArgs};
use crate::output;
use crate::pages::claims::{ClaimsPage, DocumentRow};
use crate::pages::{PageContext, humanize};

/// Arguments for claim commands
#[derive(Debug, Args)]
pub struct ClaimArgs {
    /// Claim subcommand
    #[command(subcommand)]
    pub command: ClaimCommand,
}

/// Claim subcommands
#[derive(Debug, Subcommand)]
pub enum ClaimCommand {
    /// List death claims
    List(QueryArgs),
    /// Report a member's death
    Report {
        /// Member ID
        member: MemberId,
        /// Date of death (YYYY-MM-DD)
        #[arg(long = "date")]
        date_of_death: NaiveDate,
        /// Place of death
        #[arg(long)]
        place: Option<String>,
        /// Cause of death
        #[arg(long)]
        cause: Option<String>,
    },
    /// Upload a supporting document
    Upload {
        /// Claim ID
        claim: ClaimId,
        /// File to upload
        file: PathBuf,
        /// Document type (death_certificate, identity_proof, nominee_proof, bank_details, other)
        #[arg(long = "type")]
        document_type: DocumentType,
        /// Display name; defaults to the file name
        #[arg(long)]
        name: Option<String>,
    },
    /// List a claim's documents
    Documents {
        /// Claim ID
        claim: ClaimId,
    },
    /// Move a claim to another status
    Status {
        /// Claim ID
        claim: ClaimId,
        /// Target status
        status: ClaimStatus,
        /// Remarks recorded with the change
        #[arg(long)]
        remarks: Option<String>,
    },
}

/// Execute claim commands
pub async fn execute(args: &ClaimArgs, ctx: &PageContext) -> AppResult<()> {
    match &args.command {
        ClaimCommand::List(query) => list::run(&ClaimsPage, query, ctx).await?,
        ClaimCommand::Report {
            member,
            date_of_death,
            place,
            cause,
        } => {
            let payload = CreateClaim {
                member_id: *member,
                date_of_death: *date_of_death,
                place_of_death: place.clone(),
                cause: cause.clone(),
            };
            let claim = ctx.api.claims.create(&payload).await?;
            output::print_success(&format!(
                "Claim {} reported ({})",
                claim.claim_number,
                humanize(claim.status.as_str())
            ));
        }
        ClaimCommand::Upload {
            claim,
            file,
            document_type,
            name,
        } => {
            let upload = read_upload(file, *document_type, name.clone()).await?;
            let document = ctx.api.claims.upload_document(*claim, &upload).await?;
            output::print_success(&format!(
                "Uploaded {} ({} bytes) as {}",
                document.document_name,
                upload.content.len(),
                humanize(document.document_type.as_str())
            ));
        }
        ClaimCommand::Documents { claim } => {
            let documents = ctx.api.claims.documents(*claim).await?;
            let rows: Vec<DocumentRow> = documents.iter().map(DocumentRow::from).collect();
            output::print_list(&rows, ctx.format);
        }
        ClaimCommand::Status {
            claim,
            status,
            remarks,
        } => {
            let current = ctx.api.claims.get(*claim).await?;
            let question = format!(
                "Move claim {} from {} to {}?",
                current.claim_number,
                humanize(current.status.as_str()),
                humanize(status.as_str())
            );
            if !ctx.ask("Update claim", question).await {
                return Ok(());
            }
            let payload = UpdateClaimStatus {
                status: *status,
                remarks: remarks.clone(),
            };
            let updated = ctx
                .api
                .claims
                .update_status(*claim, Some(&current), &payload)
                .await?;
            output::print_success(&format!(
                "Claim {} is {}",
                updated.claim_number,
                humanize(updated.status.as_str())
            ));
        }
    }

    Ok(())
}

/// Read a file into an upload, guessing its MIME type from the extension.
pub async fn read_upload(
    path: &Path,
    document_type: DocumentType,
    name: Option<String>,
) -> AppResult<DocumentUpload> {
    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_DOCUMENT_BYTES {
        return Err(AppError::validation(format!(
            "{} is {} bytes; the limit is {MAX_DOCUMENT_BYTES}",
            path.display(),
            metadata.len()
        )));
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::validation(format!("{} is not a file", path.display())))?;
    let content = tokio::fs::read(path).await?;
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    Ok(DocumentUpload {
        document_type,
        document_name: name.unwrap_or_else(|| file_name.clone()),
        mime_type,
        file_name,
        content,
    })
}
