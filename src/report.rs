//! # Tabular display for scan reports
//!
//! A borrowing display adaptor that renders a [`ScanReport`] as a
//! `{time step, error}` table, one row per scanned candidate, followed by the
//! convergence verdict. The values are the contract; the formatting is not.

use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

use crate::estimator::scan::ScanReport;

/// Borrowing adaptor; obtained through [`ScanReport::show`].
pub struct ScanReportDisplay<'a> {
    report: &'a ScanReport,
}

impl ScanReport {
    /// Render the report as a table when formatted with `{}`.
    pub fn show(&self) -> ScanReportDisplay<'_> {
        ScanReportDisplay { report: self }
    }
}

impl fmt::Display for ScanReportDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Simulation", "Time step (s)", "Error (m)"]);

        // Row 0 is the scan reference and carries no error of its own.
        for (i, time_step) in self.report.timesteps.iter().enumerate().skip(1) {
            let error = match self.report.lookahead_errors[i] {
                Some(error_m) => format!("{error_m:.1}"),
                None => "skipped".to_string(),
            };
            table.add_row(vec![
                Cell::new(i).set_alignment(CellAlignment::Right),
                Cell::new(time_step).set_alignment(CellAlignment::Right),
                Cell::new(error).set_alignment(CellAlignment::Right),
            ]);
        }

        writeln!(f, "{table}")?;

        let result = &self.report.result;
        if result.converged {
            write!(
                f,
                "Converged: a time step of {} s meets the tolerance.",
                result.best_timestep
            )
        } else {
            write!(
                f,
                "Tolerance not reached; finest tested time step is {} s.",
                result.best_timestep
            )
        }
    }
}
