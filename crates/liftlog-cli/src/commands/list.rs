use crate::commands::common::{
    format_workout_lines, open_context, workout_to_list_item, WorkoutListItem,
};
use crate::error::CliError;

pub async fn run_list(limit: usize, as_json: bool) -> Result<(), CliError> {
    let ctx = open_context().await?;
    let mut workouts = ctx.service.list().await?;
    workouts.truncate(limit);

    if as_json {
        let items = workouts
            .iter()
            .map(workout_to_list_item)
            .collect::<Vec<WorkoutListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for line in format_workout_lines(&workouts) {
            println!("{line}");
        }
    }

    Ok(())
}
