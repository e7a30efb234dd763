//! Result reporting: plain-text files and terminal summaries.

mod report;
mod terminal;

pub use report::{write_entries, ReportWriter};
pub use terminal::format_summary;
