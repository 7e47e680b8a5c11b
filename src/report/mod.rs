pub mod assemble;
pub mod template;
pub mod writer;

pub use assemble::merge_results;
pub use template::{render_empty_report, render_report, SECTION_TITLES};
pub use writer::{build_report_filename, save_report};
