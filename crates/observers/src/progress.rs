use strand_core::Observer;

use crate::traits::HasProgress;

/// Reports run progress at evenly spaced marks.
///
/// With `n` notifications, a mark fires each time the run crosses another
/// `1/n` of its steps, so the default of 20 reports every 5%. Each
/// notification is logged with `tracing::info!` and kept for inspection.
/// When a single event crosses several marks, one notification is emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressObserver {
    notifications: usize,
    next_mark: usize,
    reported: Vec<f64>,
}

impl ProgressObserver {
    /// Default number of notifications per run.
    pub const DEFAULT_NOTIFICATIONS: usize = 20;

    /// Creates an observer that reports `notifications` times per run.
    ///
    /// Zero is treated as one.
    #[must_use]
    pub fn new(notifications: usize) -> Self {
        Self {
            notifications: notifications.max(1),
            next_mark: 1,
            reported: Vec::new(),
        }
    }

    /// Returns the reported percentages, in order.
    #[must_use]
    pub fn reported(&self) -> &[f64] {
        &self.reported
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn record(&mut self, progress: f64) {
        let marks = self.notifications as f64;
        // Tolerate rounding in step / total.
        let reached = (progress * marks + 1e-9).floor();
        if reached < self.next_mark as f64 {
            return;
        }

        let percent = 100.0 * progress;
        tracing::info!(percent, "progress");
        self.reported.push(percent);

        self.next_mark = reached as usize + 1;
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NOTIFICATIONS)
    }
}

impl<E: HasProgress> Observer<E> for ProgressObserver {
    fn observe(&mut self, event: &E) {
        if let Some(progress) = event.progress() {
            self.record(progress);
        }
    }
}

/// Allows `&mut ProgressObserver` to be passed to a runner that takes its
/// observer by value, so the report can be read afterwards.
impl<E: HasProgress> Observer<E> for &mut ProgressObserver {
    fn observe(&mut self, event: &E) {
        (*self).observe(event);
    }
}
