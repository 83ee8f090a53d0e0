use crate::commands::common::{
    normalize_workout_identifier, open_context, resolve_workout, short_id,
};
use crate::error::CliError;

pub async fn run_delete(id: &str) -> Result<(), CliError> {
    let query = normalize_workout_identifier(id)?;
    let ctx = open_context().await?;
    let workout = resolve_workout(&ctx.service, &query).await?;

    ctx.service.delete_workout(workout.local_id).await?;
    println!("{}", short_id(&workout.local_id));
    Ok(())
}
