//! Contingency tables and the probability views derived from them.

mod analysis;
mod contingency;

pub use analysis::CrossTabAnalysis;
pub use contingency::ContingencyTable;
