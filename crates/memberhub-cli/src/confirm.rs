//! [`Confirmation`] implementations for the terminal.

use async_trait::async_trait;
use tracing::warn;

use memberhub_core::traits::{ConfirmRequest, Confirmation, ToastLevel};

use crate::output;

/// Asks on the terminal. The prompt runs on a blocking thread so the
/// runtime keeps driving in-flight loads.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialoguerConfirmation;

#[async_trait]
impl Confirmation for DialoguerConfirmation {
    async fn confirm(&self, request: &ConfirmRequest) -> bool {
        let prompt = format!("{}: {}", request.title, request.message);
        let default = request.default_yes;
        let answer = tokio::task::spawn_blocking(move || {
            dialoguer::Confirm::new()
                .with_prompt(prompt)
                .default(default)
                .interact()
        })
        .await;

        match answer {
            Ok(Ok(confirmed)) => confirmed,
            Ok(Err(e)) => {
                warn!(error = %e, "Confirmation prompt failed");
                false
            }
            Err(e) => {
                warn!(error = %e, "Confirmation task failed");
                false
            }
        }
    }

    async fn toast(&self, level: ToastLevel, message: &str) {
        print_toast(level, message);
    }
}

/// Confirms everything; used with `--yes` and in scripts.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

#[async_trait]
impl Confirmation for AssumeYes {
    async fn confirm(&self, request: &ConfirmRequest) -> bool {
        tracing::debug!(title = %request.title, "Confirmed without prompting");
        true
    }

    async fn toast(&self, level: ToastLevel, message: &str) {
        print_toast(level, message);
    }
}

fn print_toast(level: ToastLevel, message: &str) {
    match level {
        ToastLevel::Success => output::print_success(message),
        ToastLevel::Info => output::print_info(message),
        ToastLevel::Warning => output::print_warning(message),
        ToastLevel::Error => output::print_error(message),
    }
}
