//! `rackstate apply` - reconcile a plan against the appliance

use crate::cli::ApplyArgs;
use crate::config::Config;
use crate::runner::{self, ApplySummary};
use crate::{Context, commands, connect, plan, ui};
use anyhow::{Result, bail};
use reconcile::{Engine, Outcome};

pub fn run(ctx: &Context, args: &ApplyArgs) -> Result<()> {
    let entries = plan::load(&args.plan)?;
    if entries.is_empty() {
        ui::warn("no declared resources found in plan");
        return Ok(());
    }

    let config = Config::load(ctx.config.as_deref())?;
    let registry = connect::build_registry(&config)?;
    let engine = Engine::new(&registry);

    if args.dry_run {
        ui::info("dry run: resolving existence only, nothing will change");
        return commands::status::report(&engine, &entries);
    }

    if !ctx.quiet {
        ui::header(&format!("Applying {} declared resources", entries.len()));
    }

    let results = runner::run(&engine, &entries, args.jobs);
    for entry in &results {
        match &entry.result {
            Ok(outcome) => {
                if !ctx.quiet {
                    ui::outcome(&entry.label, outcome);
                    if let Outcome::ActionResult(payload) = outcome {
                        for line in serde_json::to_string_pretty(payload)?.lines() {
                            ui::dim(line);
                        }
                    }
                }
            }
            Err(err) => ui::error(&format!("{}: {err}", entry.label)),
        }
    }

    let summary = ApplySummary::from_results(&results);
    if summary.is_success() {
        ui::success(&format!(
            "{} changed, {} unchanged, {} read",
            summary.changes(),
            summary.unchanged,
            summary.found + summary.actions
        ));
        Ok(())
    } else {
        bail!("{} of {} resources failed", summary.failed, summary.total());
    }
}
