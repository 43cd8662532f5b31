use std::{fmt::Write as _, path::PathBuf};

use kaiju_cats_core::CatStatus;
use kaiju_cats_system_driver::RunSummary;
use kaiju_cats_system_scoring::{ScoreReport, DEFAULT_DISTANCE_PENALTY};
use serde::Serialize;

/// Everything `simulate` prints.
#[derive(Debug, Serialize)]
pub(crate) struct SimulationOutput {
    pub(crate) report: ScoreReport,
    pub(crate) summary: RunSummary,
    pub(crate) rejected: usize,
    pub(crate) fitness: i128,
}

impl SimulationOutput {
    pub(crate) fn new(report: ScoreReport, summary: RunSummary, rejected: usize) -> Self {
        let fitness = report.fitness(DEFAULT_DISTANCE_PENALTY);
        Self {
            report,
            summary,
            rejected,
            fitness,
        }
    }

    pub(crate) fn to_plain(&self) -> String {
        let report = &self.report;
        let (spent, total) = report.budget();
        let mut text = String::new();
        let _ = writeln!(text, "score: {}", report.score());
        let _ = writeln!(
            text,
            "turns: {}{}",
            self.summary.turns_played,
            if self.summary.settled { " (settled)" } else { "" }
        );
        let _ = writeln!(text, "budget: {spent}/{total}");
        if self.rejected > 0 {
            let _ = writeln!(text, "rejected placements: {}", self.rejected);
        }
        for cat in report.cats() {
            let distance = cat
                .distance_to_bed
                .map_or_else(|| "-".to_owned(), |distance| distance.to_string());
            let _ = writeln!(
                text,
                "{:<6} {:<9} power {:>8}  at {:<8} bed distance {}",
                cat.color.to_string(),
                status_label(cat.status),
                cat.power,
                cat.cell.to_string(),
                distance
            );
        }
        text
    }
}

/// One evaluated grid of a batch.
#[derive(Debug, Serialize)]
pub(crate) struct BatchEntry {
    pub(crate) file: PathBuf,
    pub(crate) score: u64,
    pub(crate) fitness: i128,
    pub(crate) turns: u32,
    pub(crate) rejected: usize,
}

/// Everything `batch` prints.
#[derive(Debug, Serialize)]
pub(crate) struct BatchOutput {
    pub(crate) entries: Vec<BatchEntry>,
    pub(crate) best: Option<usize>,
}

impl BatchOutput {
    pub(crate) fn new(entries: Vec<BatchEntry>) -> Self {
        // Earliest file wins ties so output does not depend on scheduling.
        let best = entries
            .iter()
            .enumerate()
            .max_by(|(a_index, a), (b_index, b)| {
                a.score.cmp(&b.score).then(b_index.cmp(a_index))
            })
            .map(|(index, _)| index);
        Self { entries, best }
    }

    pub(crate) fn to_plain(&self) -> String {
        let mut text = String::new();
        for entry in &self.entries {
            let _ = writeln!(
                text,
                "{}: score {} fitness {} turns {}",
                entry.file.display(),
                entry.score,
                entry.fitness,
                entry.turns
            );
        }
        if let Some(best) = self.best.and_then(|index| self.entries.get(index)) {
            let _ = writeln!(text, "best: {} ({})", best.file.display(), best.score);
        }
        text
    }
}

const fn status_label(status: CatStatus) -> &'static str {
    match status {
        CatStatus::Active => "active",
        CatStatus::StuckInMud => "stuck",
        CatStatus::Stomping => "stomping",
        CatStatus::Finished => "finished",
        CatStatus::Defeated => "defeated",
    }
}
