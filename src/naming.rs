//! Naming policy for derived columns and rows.
//!
//! Every name the engines synthesize is produced here, so the rules can be
//! checked without running any statistics.
//!
//! # Collision rule
//!
//! Derived names are claimed through a [`NameRegistry`]. When a candidate is
//! already taken, `_2`, `_3`, ... is appended until it is free. Claims happen
//! in a fixed derivation order, so the outcome is deterministic.
//!
//! Category labels are assumed not to contain the literal segments `prob_`,
//! `_given_`, `joint_prob_` or `Marginal_prob_of_`.

use std::collections::HashSet;

/// Label of the synthetic margin row and column of a contingency table.
pub const MARGIN_LABEL: &str = "All";

/// Name of the boolean column added by outlier flagging.
pub fn outlier_flag_name(column: &str) -> String {
    format!("{}_outlier_flag", column)
}

/// Name of the synthetic marginal-probability row or column for a variable.
pub fn marginal_prob_name(variable: &str) -> String {
    format!("Marginal_prob_of_{}", variable)
}

/// Name of the column holding `P(row_variable | column_variable = level)`.
pub fn row_given_column_name(row_variable: &str, column_level: &str) -> String {
    format!("prob_{}_given_{}", row_variable, column_level)
}

/// Name of the column holding `P(column_variable = level | row_variable)`.
pub fn column_given_row_name(column_level: &str, row_variable: &str) -> String {
    format!("prob_{}_given_{}", column_level, row_variable)
}

/// Name of the column holding `P(row, column_variable = level)`.
pub fn joint_prob_name(column_level: &str, row_variable: &str) -> String {
    format!("joint_prob_{}_{}", column_level, row_variable)
}

/// Tracks names already in use and hands out unique ones.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    taken: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-seeded with existing names.
    pub fn with_reserved<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            taken: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Claim `candidate`, or the first free `candidate_N` for N = 2, 3, ...
    pub fn claim(&mut self, candidate: String) -> String {
        let name = if self.taken.contains(&candidate) {
            (2..)
                .map(|n| format!("{}_{}", candidate, n))
                .find(|name| !self.taken.contains(name))
                .unwrap_or(candidate)
        } else {
            candidate
        };
        self.taken.insert(name.clone());
        name
    }
}
