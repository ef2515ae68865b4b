//! `rackstate status` - read-only existence report for a plan

use crate::cli::StatusArgs;
use crate::config::Config;
use crate::{Context, connect, plan, ui};
use anyhow::Result;
use colored::Colorize;
use reconcile::{DeclaredResource, Engine, Existence};

pub fn run(ctx: &Context, args: &StatusArgs) -> Result<()> {
    let entries = plan::load(&args.plan)?;
    if entries.is_empty() {
        ui::warn("no declared resources found in plan");
        return Ok(());
    }

    let config = Config::load(ctx.config.as_deref())?;
    let registry = connect::build_registry(&config)?;
    let engine = Engine::new(&registry);

    report(&engine, &entries)
}

/// Probe each declaration and print its live state. Shared with
/// `apply --dry-run`.
pub fn report(engine: &Engine, entries: &[DeclaredResource]) -> Result<()> {
    ui::header(&format!("Status of {} declared resources", entries.len()));

    let mut failures = 0;
    for declared in entries {
        let label = format!("{} '{}'", declared.kind, declared.name);
        match engine.probe(declared) {
            Ok(Existence::Found(record)) => {
                println!("{} {} {}", "✓".green(), label, record.uri.dimmed());
            }
            Ok(Existence::Absent) => {
                println!("{} {} {}", "·".dimmed(), label, "absent".dimmed());
            }
            Ok(Existence::Ambiguous(candidates)) => {
                println!(
                    "{} {} {}",
                    "⚠".yellow(),
                    label,
                    format!("{} candidates match", candidates.len()).yellow()
                );
                for candidate in &candidates {
                    ui::dim(&candidate.uri);
                }
            }
            Err(err) => {
                failures += 1;
                ui::error(&format!("{label}: {err}"));
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} resources could not be probed");
    }
    Ok(())
}
