// Interval Engine Library
// Exports all modules for testing and reuse

pub mod engine;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use engine::{EngineCommand, IntervalEngine};
pub use error::{EngineError, InvariantViolation, ValidationError};
