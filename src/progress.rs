//! Progress reporting using indicatif.
//!
//! The engine reports through [`ProgressCallback`] so that library callers
//! can plug in their own reporting. [`Progress`] draws terminal bars for the
//! `classify` and `compare` phases.

use std::sync::Mutex;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Phase name used while turning handles into records.
pub const PHASE_CLASSIFY: &str = "classify";
/// Phase name used while resolving candidate pairs.
pub const PHASE_COMPARE: &str = "compare";

/// Progress callback for the deduplication phases.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase (`"classify"` or `"compare"`)
    /// * `total` - Total number of items to process
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called after each item, with a 1-based position and a short label.
    fn on_progress(&self, current: usize, label: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Terminal progress bars.
pub struct Progress {
    multi: MultiProgress,
    active: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter. Nothing is drawn when `quiet` is set.
    ///
    /// # Examples
    ///
    /// ```
    /// use geodupe::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        let multi = if quiet {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        } else {
            MultiProgress::new()
        };
        Self {
            multi,
            active: Mutex::new(None),
            quiet,
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn with_active(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        if let Ok(mut guard) = self.active.lock() {
            f(&mut guard);
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }
        let pb = self.multi.add(ProgressBar::new(total as u64));
        pb.set_style(Self::style());
        pb.set_message(match phase {
            PHASE_CLASSIFY => "Classifying".to_string(),
            PHASE_COMPARE => "Comparing".to_string(),
            other => other.to_string(),
        });
        self.with_active(|slot| *slot = Some(pb));
    }

    fn on_progress(&self, current: usize, label: &str) {
        if self.quiet {
            return;
        }
        self.with_active(|slot| {
            if let Some(pb) = slot {
                pb.set_position(current as u64);
                if !label.is_empty() {
                    pb.set_message(label.to_string());
                }
            }
        });
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }
        self.with_active(|slot| {
            if let Some(pb) = slot.take() {
                pb.finish_with_message(format!("{phase} complete"));
            }
        });
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.with_active(|slot| {
            if let Some(pb) = slot {
                pb.set_message(message.to_string());
            }
        });
    }
}
