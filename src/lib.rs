// Polaxis: political-loadedness scoring for terms in word-embedding spaces
//
// This is the library root. Each module corresponds to one stage of the
// pipeline: load spaces, calibrate an axis, rank candidates, merge and export.

pub mod axis;
pub mod calibration;
pub mod config;
pub mod embedding;
pub mod error;
pub mod output;
pub mod ranking;
pub mod seeds;

pub use error::ScoreError;
