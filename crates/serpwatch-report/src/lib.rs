//! Report artifact and run history.
//!
//! [`sheets`] builds a pure in-memory model of the workbook, [`xlsx`] renders
//! it to disk, and [`history`] keeps a bounded JSON log of completed runs.

pub mod error;
pub mod history;
pub mod sheets;
pub mod xlsx;

pub use error::ReportError;
pub use history::{append_history, load_history, HistoryEntry, HistoryRow, HistorySource};
pub use sheets::{
    build_workbook, mean_position, Cell, ReportInput, Sheet, Workbook, AI_SHEET, DETAIL_SHEET,
    IMAGES_SHEET, NEWS_SHEET, STATISTICS_SHEET, SUMMARY_SHEET,
};
pub use xlsx::{render, write_report};
