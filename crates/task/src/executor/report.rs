use std::fmt;
use std::time::Duration;
use taskwright_core::TaskId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed,
    /// Not run, with the reason
    Skipped(String),
    /// Started in the background and left running
    Started,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTiming {
    pub task: TaskId,
    pub duration: Duration,
    pub outcome: TaskOutcome,
}

/// What ran during one invocation and how long each step took
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub timings: Vec<TaskTiming>,
}

impl ExecutionReport {
    pub fn record(&mut self, task: TaskId, duration: Duration, outcome: TaskOutcome) {
        self.timings.push(TaskTiming {
            task,
            duration,
            outcome,
        });
    }

    pub fn total(&self) -> Duration {
        self.timings.iter().map(|t| t.duration).sum()
    }

    /// Tasks that actually ran to completion, in order
    pub fn completed(&self) -> Vec<&str> {
        self.timings
            .iter()
            .filter(|t| t.outcome == TaskOutcome::Completed)
            .map(|t| t.task.as_str())
            .collect()
    }

    pub fn skipped(&self) -> Vec<&str> {
        self.timings
            .iter()
            .filter(|t| matches!(t.outcome, TaskOutcome::Skipped(_)))
            .map(|t| t.task.as_str())
            .collect()
    }
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .timings
            .iter()
            .map(|t| t.task.len())
            .max()
            .unwrap_or(0)
            .max("Total".len());

        writeln!(f, "Execution Time")?;
        for timing in &self.timings {
            let note = match &timing.outcome {
                TaskOutcome::Completed => String::new(),
                TaskOutcome::Skipped(reason) => format!(" (skipped: {reason})"),
                TaskOutcome::Started => " (background)".to_string(),
            };
            writeln!(
                f,
                "  {:<width$}  {:>8}{note}",
                timing.task.as_str(),
                format_duration(timing.duration)
            )?;
        }
        writeln!(f, "  {:<width$}  {:>8}", "Total", format_duration(self.total()))
    }
}

pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{millis}ms")
    } else if millis < 60_000 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
