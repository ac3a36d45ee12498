use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct StepTimings {
    pub step: Duration,
    pub record: Duration,
    pub total: Duration,
}

/// Optional hook interface for capturing runner step timings.
///
/// Kept independent of game-specific State/Input types so the same profiler
/// works for the CLI, tests and scripted agents.
pub trait Profiler {
    fn on_step(&mut self, _frame: usize, _timings: StepTimings) {}
}

/// Reports each step through `log` and keeps a running total.
#[derive(Debug, Default)]
pub struct LogProfiler {
    steps: usize,
    total: Duration,
    slowest: Duration,
}

impl LogProfiler {
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn slowest(&self) -> Duration {
        self.slowest
    }

    pub fn mean(&self) -> Duration {
        if self.steps == 0 {
            return Duration::ZERO;
        }
        match u32::try_from(self.steps) {
            Ok(steps) => self.total / steps,
            Err(_) => self.total.div_f64(self.steps as f64),
        }
    }
}

impl Profiler for LogProfiler {
    fn on_step(&mut self, frame: usize, timings: StepTimings) {
        self.steps += 1;
        self.total += timings.total;
        self.slowest = self.slowest.max(timings.total);
        log::trace!(
            "frame {frame}: step {:?} record {:?} total {:?}",
            timings.step,
            timings.record,
            timings.total
        );
    }
}
