//! Per-run statistics reported by the chain driver.

use std::fmt;
use std::time::Duration;

/// Why a chain stopped. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// All requested iterations were executed.
    Exhausted,
    /// Too many consecutive rejections; the chain is considered converged or stuck.
    Stagnated,
    /// The configured wall-clock budget ran out.
    Deadline,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Termination::Exhausted => "iterations exhausted",
            Termination::Stagnated => "stagnated",
            Termination::Deadline => "deadline reached",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStats {
    /// Steps actually executed (at most the configured iteration count).
    pub steps: usize,
    /// Accepted candidates among those steps.
    pub accepted: usize,
    pub termination: Termination,
    pub elapsed: Duration,
}

impl RunStats {
    /// `accepted / steps`, in `[0, 1]`. Zero for a run that executed no step.
    pub fn accepted_ratio(&self) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            self.accepted as f64 / self.steps as f64
        }
    }
}
