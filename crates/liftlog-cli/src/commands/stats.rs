use liftlog_core::services::StatsService;

use crate::commands::common::{current_week, format_week_line, open_context, weekly_to_item};
use crate::error::CliError;

pub async fn run_stats(weeks: usize, as_json: bool) -> Result<(), CliError> {
    let ctx = open_context().await?;
    let stats = StatsService::new(&ctx.store);
    let weekly = stats.weekly_volume(weeks).await?;

    if as_json {
        let items: Vec<_> = weekly.iter().map(weekly_to_item).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if weekly.is_empty() {
        println!("No workouts logged yet");
        return Ok(());
    }

    let this_week = current_week();
    for week in &weekly {
        println!("{}", format_week_line(week, this_week));
    }
    Ok(())
}
