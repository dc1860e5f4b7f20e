use anyhow::{Context, Result};
use nodry_client::ApiClient;
use nodry_config::ClientConfig;

pub async fn login(
    client: &ApiClient,
    username: &str,
    password: &str,
) -> Result<()> {
    client
        .login(username, password)
        .await
        .context("login failed")?;
    tracing::info!(username, "logged in");
    println!("Logged in as {}.", username.trim());
    Ok(())
}

pub async fn logout(client: &ApiClient) -> Result<()> {
    client.logout().await.context("failed to clear session")?;
    println!("Logged out.");
    Ok(())
}

pub async fn status(client: &ApiClient, config: &ClientConfig) -> Result<()> {
    println!("API:      {}", client.base_url());
    println!("Session:  {}", config.session_path().display());
    if let Some(path) = &config.metadata.config_path {
        println!("Config:   {}", path.display());
    }
    println!(
        "Signed in: {}",
        if client.is_authenticated().await {
            "yes"
        } else {
            "no"
        }
    );
    Ok(())
}
