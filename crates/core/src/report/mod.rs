//! Run report rendering and delivery.

pub mod notifier;
pub mod render;

pub use notifier::{ReportNotifier, ReportSender};
pub use render::ReportDocument;
