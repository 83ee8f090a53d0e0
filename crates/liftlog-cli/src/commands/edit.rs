use liftlog_core::models::WorkoutDraft;

use crate::commands::common::{
    normalize_workout_identifier, open_context, parse_exercise_spec, parse_workout_date,
    resolve_workout, short_id,
};
use crate::error::CliError;

pub async fn run_edit(
    id: &str,
    date: Option<&str>,
    notes: Option<String>,
    exercise_specs: &[String],
) -> Result<(), CliError> {
    let query = normalize_workout_identifier(id)?;
    let ctx = open_context().await?;
    let workout = resolve_workout(&ctx.service, &query).await?;

    let draft = WorkoutDraft {
        // Keep the existing date unless one was given.
        date: match date {
            Some(_) => parse_workout_date(date)?,
            None => workout.date,
        },
        notes: notes.or_else(|| workout.notes.clone()),
        exercises: exercise_specs
            .iter()
            .map(|spec| parse_exercise_spec(spec))
            .collect::<Result<Vec<_>, _>>()?,
    };

    let updated = ctx.service.update_workout(workout.local_id, draft).await?;
    println!("{}", short_id(&updated.local_id));
    Ok(())
}
