use liftlog_core::db::CatalogRepository;

use crate::commands::common::open_context;
use crate::error::CliError;

pub async fn run_catalog(query: Option<&str>) -> Result<(), CliError> {
    let ctx = open_context().await?;
    let catalog = CatalogRepository::new(&ctx.store);
    let entries = catalog.search(query.unwrap_or("")).await?;

    for entry in &entries {
        println!("{:<24}  {}", entry.name, entry.muscle_group);
    }
    Ok(())
}
