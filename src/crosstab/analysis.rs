//! Marginal, conditional and joint probabilities of a contingency table.
//!
//! All probabilities are percentages (0 to 100). Every view starts from a
//! copy of the contingency counts with `All` margins and adds its derived
//! columns by left-joining on the row label.

use super::contingency::ContingencyTable;
use crate::data::{LabeledFrame, Table};
use crate::error::Result;
use crate::naming::{
    column_given_row_name, joint_prob_name, marginal_prob_name, row_given_column_name,
    NameRegistry, MARGIN_LABEL,
};
use tracing::debug;

/// Names of every synthetic row and column, resolved once per analysis.
#[derive(Debug, Clone)]
struct DerivedNames {
    marginal_row: String,
    marginal_column: String,
    /// `(column level, name)` for `P(row_variable | level)`.
    row_given_column: Vec<(String, String)>,
    /// `(column level, name)` for `P(level | row_variable)`.
    column_given_row: Vec<(String, String)>,
    /// `(column level, name)` for the joint probability.
    joint: Vec<(String, String)>,
}

impl DerivedNames {
    fn resolve(ct: &ContingencyTable) -> Self {
        let row_var = ct.row_variable();
        let levels = ct.column_levels_by_appearance();

        let mut row_names = NameRegistry::with_reserved(
            ct.row_levels().iter().map(String::as_str).chain([MARGIN_LABEL]),
        );
        let marginal_row = row_names.claim(marginal_prob_name(ct.column_variable()));

        let mut columns = NameRegistry::with_reserved(
            ct.column_levels().iter().map(String::as_str).chain([MARGIN_LABEL]),
        );
        let marginal_column = columns.claim(marginal_prob_name(row_var));
        let mut claim_all = |make: &dyn Fn(&str) -> String| -> Vec<(String, String)> {
            levels
                .iter()
                .map(|level| (level.clone(), columns.claim(make(level))))
                .collect()
        };
        let row_given_column = claim_all(&|level: &str| row_given_column_name(row_var, level));
        let column_given_row = claim_all(&|level: &str| column_given_row_name(level, row_var));
        let joint = claim_all(&|level: &str| joint_prob_name(level, row_var));

        Self {
            marginal_row,
            marginal_column,
            row_given_column,
            column_given_row,
            joint,
        }
    }
}

/// Probability views over the cross-tabulation of two categorical columns.
///
/// The contingency table is built once at construction; every derivation
/// reads it without modifying it.
#[derive(Debug, Clone)]
pub struct CrossTabAnalysis {
    contingency: ContingencyTable,
    names: DerivedNames,
}

impl CrossTabAnalysis {
    /// Cross-tabulate `row_variable` (index) against `column_variable`.
    ///
    /// Both must be categorical columns of `table`.
    pub fn new(table: &Table, row_variable: &str, column_variable: &str) -> Result<Self> {
        let contingency = ContingencyTable::from_table(table, row_variable, column_variable)?;
        let names = DerivedNames::resolve(&contingency);
        debug!(
            row_variable,
            column_variable,
            rows = contingency.row_levels().len(),
            columns = contingency.column_levels().len(),
            total = contingency.total(),
            "built contingency table"
        );
        Ok(Self { contingency, names })
    }

    /// The underlying contingency table.
    pub fn contingency(&self) -> &ContingencyTable {
        &self.contingency
    }

    /// Counts with `All` margins.
    pub fn crosstab(&self) -> Result<LabeledFrame> {
        self.contingency.to_frame()
    }

    /// Counts plus marginal probabilities of both variables.
    ///
    /// Adds a `Marginal_prob_of_<column_variable>` row holding
    /// `100 * count(All, c) / total` for every column, and a
    /// `Marginal_prob_of_<row_variable>` column holding
    /// `100 * count(r, All) / total` for every row. The cell where the two
    /// meet is missing.
    pub fn marginal_probabilities(&self) -> Result<LabeledFrame> {
        let ct = &self.contingency;
        let total = ct.total();
        let mut frame = ct.to_frame()?;

        let marginal_row = frame
            .column_names()
            .iter()
            .map(|column| ct.column_total(column).and_then(|n| percent(n, total)))
            .collect();
        frame.push_row(self.names.marginal_row.clone(), marginal_row)?;

        let marginal_column = frame
            .row_labels()
            .iter()
            .map(|row| {
                if *row == self.names.marginal_row {
                    None
                } else {
                    ct.row_total(row).and_then(|n| percent(n, total))
                }
            })
            .collect();
        frame.push_column(self.names.marginal_column.clone(), marginal_column)?;
        Ok(frame)
    }

    /// Counts plus conditional probabilities in both directions.
    ///
    /// `prob_<row_variable>_given_<c>` divides each cell of column `c` by the
    /// column total and covers the real row levels only, so it is missing in
    /// the `All` row. `prob_<c>_given_<row_variable>` divides each cell of
    /// column `c` by its row total; in the `All` row that is the marginal
    /// probability of `c`.
    pub fn conditional_probabilities(&self) -> Result<LabeledFrame> {
        let ct = &self.contingency;
        let rows = self.rows_with_margin();

        let mut derived = LabeledFrame::new(rows.clone());
        for (level, name) in &self.names.row_given_column {
            let values = rows
                .iter()
                .map(|row| {
                    if row == MARGIN_LABEL {
                        None
                    } else {
                        ratio(ct.count(row, level), ct.column_total(level))
                    }
                })
                .collect();
            derived.push_column(name.clone(), values)?;
        }
        for (level, name) in &self.names.column_given_row {
            let values = rows
                .iter()
                .map(|row| ratio(ct.count(row, level), ct.row_total(row)))
                .collect();
            derived.push_column(name.clone(), values)?;
        }

        ct.to_frame()?.merge_left(&derived)
    }

    /// Counts plus joint probabilities `100 * count(r, c) / total`.
    ///
    /// Only real levels are normalized, so the `All` row is missing in the
    /// `joint_prob_*` columns.
    pub fn joint_probabilities(&self) -> Result<LabeledFrame> {
        let ct = &self.contingency;
        let total = ct.total();
        let rows = ct.row_levels_by_appearance().to_vec();

        let mut derived = LabeledFrame::new(rows.clone());
        for (level, name) in &self.names.joint {
            let values = rows
                .iter()
                .map(|row| ct.count(row, level).and_then(|n| percent(n, total)))
                .collect();
            derived.push_column(name.clone(), values)?;
        }

        ct.to_frame()?.merge_left(&derived)
    }

    /// Marginal view extended with the conditional and joint columns.
    ///
    /// Count columns appear once. The synthetic marginal row is missing in
    /// every conditional and joint column.
    pub fn full_frame(&self) -> Result<LabeledFrame> {
        let marginal = self.marginal_probabilities()?;
        let conditional = self.conditional_probabilities()?.without_columns_of(&marginal);
        let joint = self.joint_probabilities()?.without_columns_of(&marginal);

        marginal.merge_left(&conditional)?.merge_left(&joint)
    }

    fn rows_with_margin(&self) -> Vec<String> {
        self.contingency
            .row_levels_by_appearance()
            .iter()
            .cloned()
            .chain(std::iter::once(MARGIN_LABEL.to_string()))
            .collect()
    }
}

fn percent(count: u64, total: u64) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(100.0 * count as f64 / total as f64)
    }
}

fn ratio(count: Option<u64>, total: Option<u64>) -> Option<f64> {
    match (count, total) {
        (Some(count), Some(total)) => percent(count, total),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use approx::assert_relative_eq;

    /// (M,A), (M,B), (F,A), (F,A)
    fn create_test_analysis() -> CrossTabAnalysis {
        let table = Table::from_columns(vec![
            ("Gender", Column::categorical(["M", "M", "F", "F"])),
            ("Product", Column::categorical(["A", "B", "A", "A"])),
        ])
        .unwrap();
        CrossTabAnalysis::new(&table, "Gender", "Product").unwrap()
    }

    #[test]
    fn test_marginal_probabilities() {
        let frame = create_test_analysis().marginal_probabilities().unwrap();

        assert_eq!(frame.row_labels(), &["F", "M", "All", "Marginal_prob_of_Product"]);
        assert_eq!(frame.column_names(), &["A", "B", "All", "Marginal_prob_of_Gender"]);
        assert_relative_eq!(frame.value("Marginal_prob_of_Product", "A").unwrap().unwrap(), 75.0);
        assert_relative_eq!(frame.value("Marginal_prob_of_Product", "B").unwrap().unwrap(), 25.0);
        assert_relative_eq!(frame.value("Marginal_prob_of_Product", "All").unwrap().unwrap(), 100.0);
        assert_relative_eq!(frame.value("F", "Marginal_prob_of_Gender").unwrap().unwrap(), 50.0);
        assert_relative_eq!(frame.value("All", "Marginal_prob_of_Gender").unwrap().unwrap(), 100.0);
        assert_eq!(
            frame
                .value("Marginal_prob_of_Product", "Marginal_prob_of_Gender")
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_conditional_probabilities() {
        let frame = create_test_analysis().conditional_probabilities().unwrap();

        assert_eq!(
            frame.column_names(),
            &[
                "A",
                "B",
                "All",
                "prob_Gender_given_A",
                "prob_Gender_given_B",
                "prob_A_given_Gender",
                "prob_B_given_Gender",
            ]
        );
        // P(Gender = F | Product = A) = 2/3
        assert_relative_eq!(frame.value("F", "prob_Gender_given_A").unwrap().unwrap(), 200.0 / 3.0);
        assert_relative_eq!(frame.value("F", "prob_Gender_given_B").unwrap().unwrap(), 0.0);
        // P(Product = A | Gender = F) = 1
        assert_relative_eq!(frame.value("F", "prob_A_given_Gender").unwrap().unwrap(), 100.0);
        assert_relative_eq!(frame.value("M", "prob_B_given_Gender").unwrap().unwrap(), 50.0);
        // All row
        assert_eq!(frame.value("All", "prob_Gender_given_A").unwrap(), None);
        assert_eq!(frame.value("All", "prob_Gender_given_B").unwrap(), None);
        assert_relative_eq!(frame.value("All", "prob_A_given_Gender").unwrap().unwrap(), 75.0);
    }

    #[test]
    fn test_joint_probabilities() {
        let frame = create_test_analysis().joint_probabilities().unwrap();

        assert_relative_eq!(frame.value("F", "joint_prob_A_Gender").unwrap().unwrap(), 50.0);
        assert_relative_eq!(frame.value("M", "joint_prob_B_Gender").unwrap().unwrap(), 25.0);
        assert_relative_eq!(frame.value("F", "joint_prob_B_Gender").unwrap().unwrap(), 0.0);
        assert_eq!(frame.value("All", "joint_prob_A_Gender").unwrap(), None);
        // counts untouched
        assert_eq!(frame.value("All", "All").unwrap(), Some(4.0));
    }

    #[test]
    fn test_full_frame() {
        let analysis = create_test_analysis();
        let full = analysis.full_frame().unwrap();

        assert_eq!(full.n_rows(), 4);
        // 3 counts + marginal + 4 conditional + 2 joint
        assert_eq!(full.n_columns(), 10);
        assert_eq!(
            full.column_names().iter().filter(|c| c.as_str() == "A").count(),
            1
        );
        assert_eq!(
            full.value("Marginal_prob_of_Product", "prob_A_given_Gender").unwrap(),
            None
        );
        assert_eq!(
            full.value("Marginal_prob_of_Product", "joint_prob_A_Gender").unwrap(),
            None
        );
        assert_relative_eq!(full.value("F", "joint_prob_A_Gender").unwrap().unwrap(), 50.0);
    }

    #[test]
    fn test_colliding_level_names_stay_unique() {
        // a Product level named after the row variable
        let table = Table::from_columns(vec![
            ("Gender", Column::categorical(["M", "F", "F"])),
            ("Product", Column::categorical(["Gender", "A", "Gender"])),
        ])
        .unwrap();
        let full = CrossTabAnalysis::new(&table, "Gender", "Product")
            .unwrap()
            .full_frame()
            .unwrap();

        assert!(full.has_column("prob_Gender_given_Gender"));
        assert!(full.has_column("prob_Gender_given_Gender_2"));
        // P(Gender = M | Product = Gender) = 1/2
        assert_relative_eq!(
            full.value("M", "prob_Gender_given_Gender").unwrap().unwrap(),
            50.0
        );
        // P(Product = Gender | Gender = M) = 1
        assert_relative_eq!(
            full.value("M", "prob_Gender_given_Gender_2").unwrap().unwrap(),
            100.0
        );
    }
}
