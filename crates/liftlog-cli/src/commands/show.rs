use liftlog_core::db::SettingsRepository;

use crate::commands::common::{
    detail_to_item, format_exercise_line, normalize_workout_identifier, open_context,
    resolve_workout, short_id, sync_status_label, weight_unit_label,
};
use crate::error::CliError;

pub async fn run_show(id: &str, as_json: bool) -> Result<(), CliError> {
    let query = normalize_workout_identifier(id)?;
    let ctx = open_context().await?;
    let workout = resolve_workout(&ctx.service, &query).await?;
    let detail = ctx
        .service
        .get(workout.local_id)
        .await?
        .ok_or(CliError::WorkoutNotFound(query))?;

    let item = detail_to_item(&detail);
    if as_json {
        println!("{}", serde_json::to_string_pretty(&item)?);
        return Ok(());
    }

    println!(
        "{}  {}  {}",
        short_id(&detail.workout.local_id),
        detail.workout.date.format("%Y-%m-%d"),
        sync_status_label(detail.workout.sync_status)
    );
    if let Some(notes) = &detail.workout.notes {
        println!("{notes}");
    }
    let settings = SettingsRepository::new(&ctx.store).load().await?;
    let unit = weight_unit_label(settings.weight_unit);
    for exercise in &item.exercises {
        println!("{}", format_exercise_line(exercise, unit));
    }
    Ok(())
}
