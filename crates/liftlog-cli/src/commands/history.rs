use liftlog_core::db::SettingsRepository;
use liftlog_core::services::StatsService;

use crate::commands::common::{
    format_history_line, history_to_item, open_context, weight_unit_label,
};
use crate::error::CliError;

pub async fn run_history(exercise: &str, limit: usize, as_json: bool) -> Result<(), CliError> {
    let ctx = open_context().await?;
    let stats = StatsService::new(&ctx.store);
    let history = stats.exercise_history(exercise).await?;

    if as_json {
        let items: Vec<_> = history.iter().take(limit).map(history_to_item).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if history.is_empty() {
        println!("No logged sessions for '{exercise}'");
        return Ok(());
    }

    let settings = SettingsRepository::new(&ctx.store).load().await?;
    let unit = weight_unit_label(settings.weight_unit);
    for entry in history.iter().take(limit) {
        println!("{}", format_history_line(entry, unit));
    }

    if let Some(pr) = stats.personal_record(exercise).await? {
        if let Some(weight) = pr.weight {
            println!(
                "Best: {}x{} @{weight}{unit} on {}",
                pr.sets,
                pr.reps,
                pr.date.format("%Y-%m-%d")
            );
        }
    }
    Ok(())
}
