//! Plan runner: applies declared resources through the engine
//!
//! Entries are independent; with `jobs > 1` they run on a bounded rayon
//! pool. The engine itself imposes no ordering, and entries naming the same
//! remote resource are the operator's concern.

use rayon::prelude::*;
use reconcile::{DeclaredResource, Engine, Error, Outcome};

/// Result of applying one plan entry.
pub struct EntryResult {
    pub label: String,
    pub result: Result<Outcome, Error>,
}

fn apply_one(engine: &Engine, declared: &DeclaredResource) -> EntryResult {
    let label = format!("{} '{}' -> {}", declared.kind, declared.name, declared.ensure);
    EntryResult {
        label,
        result: engine.reconcile(declared),
    }
}

/// Apply every entry, sequentially or on a bounded thread pool.
pub fn run(engine: &Engine, entries: &[DeclaredResource], jobs: usize) -> Vec<EntryResult> {
    if jobs <= 1 || entries.len() <= 1 {
        return entries.iter().map(|e| apply_one(engine, e)).collect();
    }

    match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
        Ok(pool) => pool.install(|| {
            entries
                .par_iter()
                .map(|entry| apply_one(engine, entry))
                .collect()
        }),
        Err(err) => {
            log::warn!("falling back to sequential apply: {err}");
            entries.iter().map(|e| apply_one(engine, e)).collect()
        }
    }
}

/// Summary of an apply run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub unchanged: usize,
    pub found: usize,
    pub actions: usize,
    pub failed: usize,
}

impl ApplySummary {
    pub fn from_results(results: &[EntryResult]) -> Self {
        let mut summary = Self::default();
        for entry in results {
            summary.add(&entry.result);
        }
        summary
    }

    pub fn add(&mut self, result: &Result<Outcome, Error>) {
        match result {
            Ok(Outcome::Created(_)) => self.created += 1,
            Ok(Outcome::Updated(_)) => self.updated += 1,
            Ok(Outcome::Deleted) => self.deleted += 1,
            Ok(Outcome::Unchanged) => self.unchanged += 1,
            Ok(Outcome::Found(_)) => self.found += 1,
            Ok(Outcome::ActionResult(_)) => self.actions += 1,
            Err(_) => self.failed += 1,
        }
    }

    /// Number of entries that mutated the appliance.
    pub fn changes(&self) -> usize {
        self.created + self.updated + self.deleted
    }

    pub fn total(&self) -> usize {
        self.changes() + self.unchanged + self.found + self.actions + self.failed
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}
