use crate::commands::common::open_context;
use crate::error::CliError;

pub async fn run_login(email: &str, password: &str) -> Result<(), CliError> {
    let ctx = open_context().await?;
    let session = ctx.auth.sign_in(email, password).await?;

    let who = session.user.email.unwrap_or(session.user.id);
    println!("Signed in as {who}");
    Ok(())
}

pub async fn run_logout() -> Result<(), CliError> {
    let ctx = open_context().await?;
    ctx.auth.sign_out().await?;
    println!("Signed out");
    Ok(())
}
