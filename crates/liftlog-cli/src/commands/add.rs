use liftlog_core::models::WorkoutDraft;

use crate::commands::common::{open_context, parse_exercise_spec, parse_workout_date, short_id};
use crate::error::CliError;

pub async fn run_add(
    date: Option<&str>,
    notes: Option<String>,
    exercise_specs: &[String],
) -> Result<(), CliError> {
    let draft = WorkoutDraft {
        date: parse_workout_date(date)?,
        notes,
        exercises: exercise_specs
            .iter()
            .map(|spec| parse_exercise_spec(spec))
            .collect::<Result<Vec<_>, _>>()?,
    };

    let ctx = open_context().await?;
    let workout = ctx.service.create_workout(draft).await?;

    println!("{}", short_id(&workout.local_id));
    Ok(())
}
