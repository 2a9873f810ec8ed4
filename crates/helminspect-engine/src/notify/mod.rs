//! Run notifications.
//!
//! Notification is best effort: callers log a failed notification and move on.

pub mod slack;

use helminspect_core::errors::Result;
use helminspect_core::{DriftReport, RunIdentity};

pub use slack::SlackNotifier;

/// Delivers the outcome of a drift run somewhere outside the process.
#[allow(clippy::result_large_err)]
pub trait Notifier {
    /// Announce `report` for `identity`.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::ExternalService` if delivery fails.
    fn notify(&self, identity: &RunIdentity, report: &DriftReport) -> Result<()>;
}

/// Notifier used when no destination is configured.
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _: &RunIdentity, _: &DriftReport) -> Result<()> {
        tracing::debug!("no notification destination configured");
        Ok(())
    }
}
