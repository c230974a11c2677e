//! Progress reporting for long-running computations.
//!
//! Every algorithm threads a [`ProgressReporter`] through its inner loop.
//! The reporter is fire-and-forget: emitting never blocks and never panics,
//! and when nobody is listening the ticks are simply dropped.

/// Minimum fraction change between forwarded ticks (~1% granularity).
const MIN_STEP: f64 = 0.01;

/// Bounded-granularity, monotone progress sink.
///
/// Guarantees observed by consumers:
/// - reported fractions are clamped to `[0, 1]`
/// - the sequence of forwarded fractions is non-decreasing
/// - ticks closer than ~1% to the previous one are suppressed, except the
///   terminal 1.0
/// - [`ProgressReporter::finish`] emits the terminal 1.0 exactly once, so
///   early-convergence breaks still culminate in a full report
pub struct ProgressReporter {
    sink: Option<Box<dyn FnMut(f64) + Send>>,
    last: f64,
    finished: bool,
}

impl ProgressReporter {
    /// Reporter forwarding ticks into the given sink.
    pub fn new(sink: impl FnMut(f64) + Send + 'static) -> Self {
        Self {
            sink: Some(Box::new(sink)),
            last: -1.0,
            finished: false,
        }
    }

    /// Reporter that drops every tick. For direct library calls and tests.
    pub fn disabled() -> Self {
        Self {
            sink: None,
            last: -1.0,
            finished: false,
        }
    }

    /// Report an absolute fraction in `[0, 1]`.
    pub fn report(&mut self, fraction: f64) {
        if self.finished {
            return;
        }
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            return;
        };
        if fraction < self.last {
            return;
        }
        let terminal = (fraction - 1.0).abs() < f64::EPSILON;
        if !terminal && fraction - self.last < MIN_STEP {
            return;
        }
        self.last = fraction;
        if let Some(sink) = self.sink.as_mut() {
            sink(fraction);
        }
        if terminal {
            self.finished = true;
        }
    }

    /// Report `done / total`, tolerating `total == 0`.
    pub fn report_ratio(&mut self, done: usize, total: usize) {
        if total == 0 {
            return;
        }
        self.report(done as f64 / total as f64);
    }

    /// Emit the terminal 1.0 if it has not been emitted yet.
    pub fn finish(&mut self) {
        self.report(1.0);
    }

    /// Last fraction forwarded, or `None` before the first tick.
    pub fn last_reported(&self) -> Option<f64> {
        (self.last >= 0.0).then_some(self.last)
    }
}
