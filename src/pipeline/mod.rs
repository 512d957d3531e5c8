//! Comparison pipeline.
//!
//! [`evaluate_unit`] scores one repository between two tools; [`run_batch`]
//! drives every repository and tool pair of a standard and writes the
//! output tables.

mod batch;
mod unit;

pub use batch::{BatchReport, BatchRequest, read_repository_list, run_batch, tool_pairs};
pub use unit::{
    Cell, EvaluationOptions, SummaryRow, UnitError, UnitOutcome, evaluate_documents,
    evaluate_unit, load_document,
};

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::ERROR, 3);
    }
}
