use std::time::{Duration, Instant};
use tracing::debug;

/// Duration of one pipeline step
#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: String,
    pub duration: Duration,
}

/// Wall-clock durations of pipeline steps, in the order they ran
#[derive(Debug, Default)]
pub struct PipelineTimings {
    steps: Vec<StepTiming>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `step` inside a `step` span named `name` and records how long it took.
    ///
    /// The duration is recorded whether or not `step` succeeds.
    pub fn time<T>(&mut self, name: impl Into<String>, step: impl FnOnce() -> T) -> T {
        let name = name.into();
        let _span = tracing::info_span!("step", name = %name).entered();
        let start = Instant::now();
        let output = step();
        self.steps.push(StepTiming { name, duration: start.elapsed() });
        output
    }

    /// Appends the steps of a later stage of the same run.
    pub fn extend(&mut self, later: PipelineTimings) {
        self.steps.extend(later.steps);
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn log_summary(&self) {
        let total = self.total_duration();
        for step in &self.steps {
            let share = if total.is_zero() {
                0.0
            } else {
                step.duration.as_secs_f64() / total.as_secs_f64() * 100.0
            };
            debug!(
                step = %step.name,
                ms = step.duration.as_secs_f64() * 1000.0,
                share = %format!("{:.1}%", share),
                "Step timing"
            );
        }
        debug!(ms = total.as_secs_f64() * 1000.0, "Total pipeline time");
    }
}
