//! Stateful outlier treatment over a single table.

use super::bounds::OutlierMethod;
use super::flag::flag_column;
use super::plan::{TreatmentPlan, TreatmentStep};
use super::remove::{remove_iqr, remove_percentile, remove_zscore};
use super::treat::{clip_column, clip_zscore_column, log_column, winsorize_column};
use crate::data::Table;
use crate::error::Result;
use tracing::{debug, info};

/// Holds a table and applies outlier treatments to it.
///
/// Each treatment produces a new table that replaces the held one, so later
/// calls see the result of earlier ones. The table is replaced after every
/// column: if a call fails on its third column, the first two keep their
/// treatment. Callers that need earlier states should keep the tables
/// returned by [`OutlierHandler::table`] themselves.
///
/// The handler is not meant to be shared between threads while treatments run;
/// a single writer per table is the caller's responsibility.
#[derive(Debug, Clone)]
pub struct OutlierHandler {
    table: Table,
}

impl OutlierHandler {
    /// Take ownership of a table.
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    /// The current table.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Give back the current table.
    pub fn into_table(self) -> Table {
        self.table
    }

    fn apply<S, F>(&mut self, columns: &[S], mut step: F) -> Result<&Table>
    where
        S: AsRef<str>,
        F: FnMut(&Table, &str) -> Result<Table>,
    {
        for column in columns {
            self.table = step(&self.table, column.as_ref())?;
        }
        Ok(&self.table)
    }

    /// Remove rows outside each column's IQR fences, column by column.
    pub fn remove_outliers_iqr<S: AsRef<str>>(&mut self, columns: &[S]) -> Result<&Table> {
        self.apply(columns, remove_iqr)
    }

    /// Remove rows outside each column's percentile ranks, column by column.
    pub fn remove_outliers_percentile<S: AsRef<str>>(
        &mut self,
        columns: &[S],
        lower_percentile: f64,
        upper_percentile: f64,
    ) -> Result<&Table> {
        self.apply(columns, |t, c| {
            remove_percentile(t, c, lower_percentile, upper_percentile)
        })
    }

    /// Clamp values to each column's bounds.
    pub fn clip_outliers<S: AsRef<str>>(
        &mut self,
        columns: &[S],
        method: OutlierMethod,
        lower_percentile: f64,
        upper_percentile: f64,
    ) -> Result<&Table> {
        self.apply(columns, |t, c| {
            clip_column(t, c, method, lower_percentile, upper_percentile)
        })
    }

    /// Replace values with `ln(1 + x)`.
    pub fn log_transform<S: AsRef<str>>(&mut self, columns: &[S]) -> Result<&Table> {
        self.apply(columns, log_column)
    }

    /// Winsorize each column's tails.
    pub fn winsorize_outliers<S: AsRef<str>>(
        &mut self,
        columns: &[S],
        limits: (f64, f64),
    ) -> Result<&Table> {
        self.apply(columns, |t, c| winsorize_column(t, c, limits))
    }

    /// Add `<column>_outlier_flag` columns.
    pub fn flag_outliers<S: AsRef<str>>(
        &mut self,
        columns: &[S],
        method: OutlierMethod,
        lower_percentile: f64,
        upper_percentile: f64,
    ) -> Result<&Table> {
        self.apply(columns, |t, c| {
            flag_column(t, c, method, lower_percentile, upper_percentile)
        })
    }

    /// Remove rows with `z >= threshold` (one-sided).
    pub fn remove_outliers_zscore<S: AsRef<str>>(
        &mut self,
        columns: &[S],
        threshold: f64,
    ) -> Result<&Table> {
        self.apply(columns, |t, c| remove_zscore(t, c, threshold))
    }

    /// Replace values with `|z| >= threshold` by the column median.
    pub fn clip_outliers_zscore<S: AsRef<str>>(
        &mut self,
        columns: &[S],
        threshold: f64,
    ) -> Result<&Table> {
        self.apply(columns, |t, c| clip_zscore_column(t, c, threshold))
    }

    /// Run a single configured step.
    pub fn apply_step(&mut self, step: &TreatmentStep) -> Result<&Table> {
        let before = self.table.n_rows();
        match step {
            TreatmentStep::RemoveIqr { columns } => self.remove_outliers_iqr(columns)?,
            TreatmentStep::RemovePercentile {
                columns,
                lower_percentile,
                upper_percentile,
            } => self.remove_outliers_percentile(columns, *lower_percentile, *upper_percentile)?,
            TreatmentStep::Clip {
                columns,
                method,
                lower_percentile,
                upper_percentile,
            } => self.clip_outliers(columns, *method, *lower_percentile, *upper_percentile)?,
            TreatmentStep::LogTransform { columns } => self.log_transform(columns)?,
            TreatmentStep::Winsorize { columns, limits } => {
                self.winsorize_outliers(columns, *limits)?
            }
            TreatmentStep::Flag {
                columns,
                method,
                lower_percentile,
                upper_percentile,
            } => self.flag_outliers(columns, *method, *lower_percentile, *upper_percentile)?,
            TreatmentStep::RemoveZscore { columns, threshold } => {
                self.remove_outliers_zscore(columns, *threshold)?
            }
            TreatmentStep::ClipZscore { columns, threshold } => {
                self.clip_outliers_zscore(columns, *threshold)?
            }
        };
        debug!(
            step = step.name(),
            before,
            after = self.table.n_rows(),
            "applied treatment step"
        );
        Ok(&self.table)
    }

    /// Run every step of a plan in order.
    pub fn apply_plan(&mut self, plan: &TreatmentPlan) -> Result<&Table> {
        info!(plan = %plan.name, steps = plan.steps.len(), "running treatment plan");
        for step in &plan.steps {
            self.apply_step(step)?;
        }
        Ok(&self.table)
    }
}
