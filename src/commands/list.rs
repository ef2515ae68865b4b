//! `rackstate list` - live collection inventory for one resource kind

use crate::cli::ListArgs;
use crate::config::Config;
use crate::{Context, connect, ui};
use anyhow::Result;
use reconcile::Engine;

pub fn run(ctx: &Context, args: &ListArgs) -> Result<()> {
    let config = Config::load(ctx.config.as_deref())?;
    let registry = connect::build_registry(&config)?;
    let engine = Engine::new(&registry);

    let records = engine.enumerate(
        args.kind,
        args.api_version,
        args.variant.as_deref().or(config.appliance.variant.as_deref()),
    )?;

    ui::header(&format!("{} ({})", args.kind, records.len()));
    for record in &records {
        ui::kv(record.name().unwrap_or("(unnamed)"), &record.uri);
    }
    if records.is_empty() {
        ui::dim("no resources in this collection");
    }
    Ok(())
}
