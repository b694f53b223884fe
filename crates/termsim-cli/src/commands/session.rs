use anyhow::Result;
use colored::Colorize;
use termsim_core::TermsimError;

use crate::bootstrap::App;

pub async fn show(app: &App, session_id: &str) -> Result<()> {
    let session = app
        .service
        .get_session(session_id)
        .await?
        .ok_or_else(|| TermsimError::not_found("Session", session_id))?;

    println!("{}", serde_json::to_string_pretty(&session)?);
    Ok(())
}

pub async fn reset(app: &App, session_id: &str) -> Result<()> {
    if !app.service.reset_session(session_id).await? {
        return Err(TermsimError::not_found("Session", session_id).into());
    }
    println!("{}", format!("Session {session_id} reset to the default environment").green());
    Ok(())
}

pub async fn create(app: &App, user: Option<String>) -> Result<()> {
    let session = app.service.create_session(user).await?;
    println!("{}", session.session_id);
    Ok(())
}

pub async fn list(app: &App) -> Result<()> {
    let ids = app.service.list_sessions().await?;
    if ids.is_empty() {
        println!("{}", "No stored sessions".bright_black());
    }
    for id in ids {
        println!("{id}");
    }
    Ok(())
}
