use crate::commands::common::{open_context, short_id};
use crate::error::CliError;

pub async fn run_status() -> Result<(), CliError> {
    let ctx = open_context().await?;

    let online = ctx.connectivity.is_online();
    println!("Connection: {}", if online { "online" } else { "offline" });

    match ctx.auth.current_session()? {
        Some(session) => {
            let who = session.user.email.unwrap_or(session.user.id);
            println!("Signed in as: {who}");
        }
        None => println!("Not signed in"),
    }

    let pending = ctx.service.pending_mutations().await?;
    println!("Queued changes: {pending}");

    let status = ctx.service.engine().status();
    match status.last_sync_time() {
        Some(timestamp) => {
            let formatted = chrono::DateTime::from_timestamp_millis(timestamp).map_or_else(
                || timestamp.to_string(),
                |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            );
            println!("Last sync: {formatted}");
        }
        None => println!("Last sync: never (this run)"),
    }

    let failed = ctx.service.attention_needed().await?;
    if !failed.is_empty() {
        println!("Needs attention (sync failed, run `liftlog sync` to retry):");
        for workout in &failed {
            println!(
                "  {}  {}",
                short_id(&workout.local_id),
                workout.date.format("%Y-%m-%d")
            );
        }
    }
    Ok(())
}
