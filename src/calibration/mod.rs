pub mod calibrator;
pub mod labeled;
pub mod record;

pub use calibrator::{
    evaluate_grid, evaluate_pair, pick_best, select_best, CalibrationResult, PairEvaluation,
    PairOutcome,
};
pub use labeled::{Label, LabeledTestSet};
pub use record::CalibrationRecord;
