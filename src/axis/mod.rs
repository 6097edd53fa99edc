// Semantic axes: build a direction from two word poles and project terms onto it.

pub mod builder;
pub mod builtin;
pub mod definition;
pub mod projection;

pub use builder::{build_axis, build_axis_for, SemanticAxis};
pub use definition::AxisDefinition;
pub use projection::{loadedness, project};
