//! Step progress events.
//!
//! Each step reports `(percent, message)` pairs to a [`ProgressObserver`].
//! The observer decides how to present them; steps never touch the
//! terminal directly.

/// A single progress update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Completion of the current step, 0..=100.
    pub percent: u8,
    /// What the step is doing now.
    pub message: String,
}

/// Receives progress updates from a running step.
pub trait ProgressObserver {
    fn on_progress(&mut self, event: &ProgressEvent);
}

/// Observer that keeps every event, for tests.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<ProgressEvent>,
}

impl ProgressObserver for RecordingObserver {
    fn on_progress(&mut self, event: &ProgressEvent) {
        self.events.push(event.clone());
    }
}

/// Reports progress for one step.
///
/// Percentages are clamped to 100 and never go backwards.
pub struct ProgressReporter<'a> {
    observer: &'a mut dyn ProgressObserver,
    last: u8,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(observer: &'a mut dyn ProgressObserver) -> Self {
        Self { observer, last: 0 }
    }

    /// Report `percent` with `message`.
    pub fn report(&mut self, percent: u8, message: &str) {
        let percent = percent.min(100).max(self.last);
        self.last = percent;
        self.observer.on_progress(&ProgressEvent {
            percent,
            message: message.to_string(),
        });
    }

    /// Report a new message at the current percentage.
    pub fn message(&mut self, message: &str) {
        let last = self.last;
        self.report(last, message);
    }

    /// Last reported percentage.
    pub fn percent(&self) -> u8 {
        self.last
    }
}

/// Percentage for item `index` (1-based) of `total`, spread over
/// `start..=end`.
pub fn scaled_percent(index: usize, total: usize, start: u8, end: u8) -> u8 {
    if total == 0 {
        return end;
    }
    let span = end.saturating_sub(start) as usize;
    let index = index.min(total);
    start + (span * index / total) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporter_never_goes_backwards() {
        let mut observer = RecordingObserver::default();
        let mut reporter = ProgressReporter::new(&mut observer);
        reporter.report(40, "a");
        reporter.report(20, "b");
        reporter.report(150, "c");

        let percents: Vec<u8> = observer.events.iter().map(|e| e.percent).collect();
        assert_eq!(percents, vec![40, 40, 100]);
    }

    #[test]
    fn message_keeps_percentage() {
        let mut observer = RecordingObserver::default();
        let mut reporter = ProgressReporter::new(&mut observer);
        reporter.report(30, "start");
        reporter.message("still going");
        assert_eq!(reporter.percent(), 30);
        assert_eq!(observer.events[1].message, "still going");
    }

    #[test]
    fn scaled_percent_spans_range() {
        assert_eq!(scaled_percent(0, 24, 10, 90), 10);
        assert_eq!(scaled_percent(12, 24, 10, 90), 50);
        assert_eq!(scaled_percent(24, 24, 10, 90), 90);
    }

    #[test]
    fn scaled_percent_empty_list_is_done() {
        assert_eq!(scaled_percent(0, 0, 10, 90), 90);
    }
}
