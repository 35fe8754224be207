/*!
Diagnostic side channel of the chain driver.

Runs never print. Everything a caller may want to observe while a chain is
running (the initial state, per-step outcomes, rejected anomalies, the final
accepted ratio) goes through a [`Reporter`] passed into the run.
*/

use std::fmt::Debug;

use indicatif::ProgressBar;

use crate::error::Warning;
use crate::stats::RunStats;

/// Receives diagnostics from a running chain. Every method defaults to a no-op.
pub trait Reporter {
    /// The chain is about to take its first step.
    fn on_start(&mut self, _initial_state: &dyn Debug, _initial_value: f64) {}

    /// Step `step` (0-based) finished.
    fn on_step(&mut self, _step: usize, _accepted: bool) {}

    /// A candidate was rejected because its objective value was unusable.
    fn on_warning(&mut self, _warning: &Warning) {}

    /// The chain terminated.
    fn on_finish(&mut self, _stats: &RunStats) {}
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn on_start(&mut self, initial_state: &dyn Debug, initial_value: f64) {
        (**self).on_start(initial_state, initial_value)
    }

    fn on_step(&mut self, step: usize, accepted: bool) {
        (**self).on_step(step, accepted)
    }

    fn on_warning(&mut self, warning: &Warning) {
        (**self).on_warning(warning)
    }

    fn on_finish(&mut self, stats: &RunStats) {
        (**self).on_finish(stats)
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Forwards diagnostics to `tracing`, optionally tagged with a chain index.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter {
    chain: Option<usize>,
}

impl TracingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_chain(chain: usize) -> Self {
        Self { chain: Some(chain) }
    }
}

impl Reporter for TracingReporter {
    fn on_start(&mut self, initial_state: &dyn Debug, initial_value: f64) {
        tracing::info!(
            chain = ?self.chain,
            initial_state = ?initial_state,
            initial_value,
            "chain started"
        );
    }

    fn on_warning(&mut self, warning: &Warning) {
        tracing::warn!(chain = ?self.chain, %warning, "candidate rejected");
    }

    fn on_finish(&mut self, stats: &RunStats) {
        tracing::info!(
            chain = ?self.chain,
            steps = stats.steps,
            accepted = stats.accepted,
            accepted_ratio = stats.accepted_ratio(),
            termination = %stats.termination,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "chain finished"
        );
    }
}

/// Ticks an `indicatif` bar once per step and passes everything on to `inner`.
#[derive(Clone)]
pub struct ProgressReporter<R = TracingReporter> {
    bar: ProgressBar,
    inner: R,
}

impl<R: Reporter> ProgressReporter<R> {
    pub fn new(bar: ProgressBar, inner: R) -> Self {
        Self { bar, inner }
    }

    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }
}

impl<R: Reporter> Reporter for ProgressReporter<R> {
    fn on_start(&mut self, initial_state: &dyn Debug, initial_value: f64) {
        self.inner.on_start(initial_state, initial_value);
    }

    fn on_step(&mut self, step: usize, accepted: bool) {
        self.bar.inc(1);
        self.inner.on_step(step, accepted);
    }

    fn on_warning(&mut self, warning: &Warning) {
        self.inner.on_warning(warning);
    }

    fn on_finish(&mut self, stats: &RunStats) {
        self.bar.finish_with_message(format!(
            "{} | accepted ratio {:.3}",
            stats.termination,
            stats.accepted_ratio()
        ));
        self.inner.on_finish(stats);
    }
}
