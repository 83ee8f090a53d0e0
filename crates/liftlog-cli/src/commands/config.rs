use liftlog_core::db::SettingsRepository;

use crate::commands::common::{open_context, parse_toggle, parse_weight_unit, weight_unit_label};
use crate::error::CliError;

pub async fn run_config(unit: Option<&str>, auto_sync: Option<&str>) -> Result<(), CliError> {
    let ctx = open_context().await?;
    let repo = SettingsRepository::new(&ctx.store);
    let mut settings = repo.load().await?;

    let mut changed = false;
    if let Some(unit) = unit {
        settings.weight_unit = parse_weight_unit(unit)?;
        changed = true;
    }
    if let Some(auto_sync) = auto_sync {
        settings.auto_sync_enabled = parse_toggle(auto_sync)?;
        changed = true;
    }
    if changed {
        repo.save(&settings).await?;
    }

    println!("unit: {}", weight_unit_label(settings.weight_unit));
    println!(
        "auto-sync: {}",
        if settings.auto_sync_enabled { "on" } else { "off" }
    );
    Ok(())
}
