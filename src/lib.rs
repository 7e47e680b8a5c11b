//! daybrief turns one day of captured screen activity into a single
//! narrative markdown report.
//!
//! The upstream capture stack (screenshots, window metadata, OCR, privacy
//! filtering) appends one JSON record per minute to a per-date JSONL file;
//! this crate reads that day back, splits it into sessions by time gap,
//! collapses unchanged-screen runs, packs the result into size-bounded
//! chunks, has an OpenAI-compatible backend narrate each chunk, and
//! reassembles everything into a fixed five-section document written
//! atomically to a date-keyed path.
//!
//! The host application owns argument parsing, scheduling and logger
//! setup (see [`utils::logging::init`]); the entry point here is
//! [`pipeline::generate_report_for_date`].

pub mod chunking;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod segmentation;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use error::{ConfigError, LlmError};
pub use models::{GenerationResult, LogRecord, Report};
pub use pipeline::generate_report_for_date;
