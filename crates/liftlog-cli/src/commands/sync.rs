use crate::commands::common::open_context;
use crate::error::CliError;

pub async fn run_sync() -> Result<(), CliError> {
    let ctx = open_context().await?;

    if !ctx.connectivity.is_online() {
        println!("Offline; set LIFTLOG_API_URL (and unset LIFTLOG_OFFLINE) to sync.");
        return Ok(());
    }

    let report = ctx.service.sync_now().await?;
    if !report.ran {
        println!("Sync skipped (another pass is running)");
        return Ok(());
    }

    println!(
        "Sync finished: {} sent, {} requeued, {} dropped",
        report.succeeded, report.requeued, report.dropped
    );
    if report.parked > 0 {
        println!(
            "{} change(s) hit the retry limit; run `liftlog sync` again to retry them",
            report.parked
        );
    }

    let remaining = ctx.service.pending_mutations().await?;
    if remaining > 0 {
        println!("{remaining} change(s) still queued");
    }
    Ok(())
}
