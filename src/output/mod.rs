// src/output/mod.rs
//! Output handling with clear separation of planning and execution.
//!
//! Planning (which mail, which file) is pure; [`deliver`] is where the
//! I/O happens.

mod mailer;
mod paths;
mod types;
mod writer;

// Re-export the public interface
pub use mailer::{compose_mail, send_mail, ComposedMail};
pub use paths::{digest_file_path, plan_delivery, sanitize_filename};
pub use types::{
    CompletedOperation, DeliveryTarget, ExecutionStats, FailedOperation, OutputPlan, OutputReport,
};
pub use writer::deliver;
