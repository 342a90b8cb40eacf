//! Email digest of a monitoring run.

pub mod digest;
pub mod email;
pub mod error;

pub use digest::{load_attachment, render_html, subject_for, Digest, ReportAttachment};
pub use email::{EmailNotifier, Notifier};
pub use error::NotifyError;
