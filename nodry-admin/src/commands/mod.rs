//! Page-level handlers, one module per admin panel screen.

mod catalog;
mod content;
mod dashboard;
mod inquiries;
mod session;

use anyhow::Result;
use nodry_client::{ApiClient, ClientError, ReorderError};
use nodry_config::ClientConfig;

use crate::cli::Command;

pub async fn dispatch(
    client: &ApiClient,
    config: &ClientConfig,
    command: Command,
) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            session::login(client, &username, &password).await
        }
        Command::Logout => session::logout(client).await,
        Command::Status => session::status(client, config).await,
        Command::Summary => dashboard::summary(client).await,
        Command::Manufacturers { action } => {
            catalog::manufacturers(client, action).await
        }
        Command::Documents { action } => {
            catalog::documents(client, action).await
        }
        Command::Leads { action } => inquiries::leads(client, action).await,
        Command::Rfq { action } => inquiries::rfq(client, action).await,
        Command::Investor { action } => {
            inquiries::investor(client, action).await
        }
        Command::Content { action } => content::content(client, action).await,
    }
}

/// Whether a failed command means the stored session is no longer usable.
pub fn requires_login(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        if let Some(client) = cause.downcast_ref::<ClientError>() {
            client.requires_login()
        } else if let Some(reorder) = cause.downcast_ref::<ReorderError>() {
            reorder.requires_login()
        } else {
            false
        }
    })
}

/// Log and print a failed command. Expired sessions are cleared.
pub async fn report_failure(client: &ApiClient, err: &anyhow::Error) {
    tracing::error!(error = %format!("{err:#}"), "command failed");
    eprintln!("Error: {err:#}");

    if requires_login(err) {
        if let Err(clear_err) = client.logout().await {
            tracing::warn!(error = %clear_err, "failed to clear session");
        }
        eprintln!("Your session has expired. Run `nodry login` to sign in again.");
    }
}
