use std::collections::HashMap;
use std::time::Instant;

/// Observer for batch and export runs.
///
/// Use cases report through this instead of printing, so the CLI can throttle
/// and summarize while tests stay quiet.
pub trait PipelineLogger: Send {
    /// `current` of `total` items finished.
    fn progress(&mut self, current: usize, total: usize);

    /// Time spent in a named stage for one item.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Per-item measurement, averaged in the summary (e.g. masked pixel count).
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// An item was skipped; the run continues.
    fn skipped(&mut self, item: &str, reason: &str);

    /// End-of-run report. Default: no-op.
    fn summary(&self) {}
}

/// Discards every event.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
    fn skipped(&mut self, _item: &str, _reason: &str) {}
}

/// Logger for the CLI: progress lines every `throttle` items (and on the
/// last one), skips as warnings, and a per-stage timing table at the end.
pub struct StdoutPipelineLogger {
    label: String,
    throttle: usize,
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    total: usize,
    skipped: usize,
}

impl StdoutPipelineLogger {
    pub fn new(label: impl Into<String>, throttle: usize) -> Self {
        Self {
            label: label.into(),
            throttle: throttle.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            total: 0,
            skipped: 0,
        }
    }

    /// Whether `progress(current, total)` prints a line.
    pub fn reports_at(&self, current: usize, total: usize) -> bool {
        total > 0 && (current % self.throttle == 0 || current == total)
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() && self.skipped == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "{} summary ({} items, {} skipped, {:.1}s total):",
            self.label,
            self.total,
            self.skipped,
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.iter().collect();
        stages.sort_by(|a, b| a.0.cmp(b.0));
        for (stage, durations) in stages {
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = mean(durations);
            let pct = if elapsed_ms > 0.0 {
                total_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:10}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms  ({pct:4.1}%)"
            ));
        }

        let mut metrics: Vec<_> = self.metrics.iter().collect();
        metrics.sort_by(|a, b| a.0.cmp(b.0));
        for (name, values) in metrics {
            lines.push(format!("  {name}: avg {:.1}", mean(values)));
        }

        if self.total > 0 && elapsed_ms > 0.0 {
            let rate = self.total as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {rate:.1} items/s"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.total = total;
        if self.reports_at(current, total) {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("{}: {current}/{total} ({pct:.1}%)", self.label);
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn skipped(&mut self, item: &str, reason: &str) {
        self.skipped += 1;
        log::warn!("Skipping {item}: {reason}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

/// Milliseconds since `start`, for [`PipelineLogger::timing`].
pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
