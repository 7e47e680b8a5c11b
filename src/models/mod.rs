pub mod generation;
pub mod record;
pub mod report;

pub use generation::{GenerationOutcome, GenerationResult};
pub use record::LogRecord;
pub use report::Report;
