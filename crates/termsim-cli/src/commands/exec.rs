use anyhow::Result;
use colored::Colorize;
use termsim_application::CommandRequest;

use crate::bootstrap::App;

pub async fn run(
    app: &App,
    command: String,
    session: Option<String>,
    user: Option<String>,
    json: bool,
) -> Result<()> {
    let mut request = CommandRequest::new(command);
    request.session_id = session;
    request.user_id = user;

    let response = app.service.process_command(request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if response.success {
        println!("{}", response.output);
    } else {
        println!("{}", response.output.red());
    }
    eprintln!("{}", format!("session: {}", response.session_id).bright_black());
    Ok(())
}
