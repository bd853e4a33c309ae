use crate::dissolve::order::{RevealPolicy, erase_order};
use crate::foundation::error::{CurtainError, CurtainResult};
use crate::foundation::rng::RandomSource;
use crate::grid::builder::Grid;

/// Completion hook of a dissolve run; runs once, after the last erase.
pub type OnComplete = Box<dyn FnOnce()>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DissolveState {
    Idle,
    Running,
    Done,
    /// Torn down before completion; the completion hook never ran.
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// A run already started on this grid generation; nothing changed.
    Rejected,
}

/// Result of one scheduling tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickStatus {
    /// Cells erased during this tick.
    pub erased: usize,
    /// Cells still waiting.
    pub remaining: usize,
    pub done: bool,
}

impl TickStatus {
    fn idle(done: bool) -> Self {
        Self {
            erased: 0,
            remaining: 0,
            done,
        }
    }
}

/// In-flight erase plan.
pub struct DissolveRun {
    order: Vec<usize>,
    cursor: usize,
    batch_size: usize,
    completed: bool,
    on_complete: Option<OnComplete>,
}

impl std::fmt::Debug for DissolveRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DissolveRun")
            .field("len", &self.order.len())
            .field("cursor", &self.cursor)
            .field("batch_size", &self.batch_size)
            .field("completed", &self.completed)
            .finish()
    }
}

impl DissolveRun {
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.order.len() - self.cursor
    }
}

/// Idle -> Running -> Done batch scheduler (Running -> Cancelled on teardown).
///
/// One run per grid generation: once started, `start` is rejected until [`reset`](Self::reset).
#[derive(Debug)]
pub struct DissolveScheduler {
    state: DissolveState,
    run: Option<DissolveRun>,
    reduced_motion: bool,
}

impl DissolveScheduler {
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            state: DissolveState::Idle,
            run: None,
            reduced_motion,
        }
    }

    pub fn state(&self) -> DissolveState {
        self.state
    }

    pub fn run(&self) -> Option<&DissolveRun> {
        self.run.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.state == DissolveState::Running
    }

    /// Plan a run over `grid`. `batch_size` is ignored under reduced motion.
    pub fn start(
        &mut self,
        grid: &Grid,
        policy: RevealPolicy,
        batch_size: usize,
        rng: &mut dyn RandomSource,
        on_complete: OnComplete,
    ) -> CurtainResult<StartOutcome> {
        if batch_size == 0 {
            return Err(CurtainError::validation("dissolve batch size must be > 0"));
        }
        if self.state != DissolveState::Idle {
            tracing::debug!(state = ?self.state, "dissolve start rejected");
            return Ok(StartOutcome::Rejected);
        }

        let order = erase_order(grid, policy, rng);
        let batch_size = if self.reduced_motion {
            order.len().max(1)
        } else {
            batch_size
        };
        tracing::debug!(cells = order.len(), batch_size, ?policy, "dissolve started");
        self.run = Some(DissolveRun {
            order,
            cursor: 0,
            batch_size,
            completed: false,
            on_complete: Some(on_complete),
        });
        self.state = DissolveState::Running;
        Ok(StartOutcome::Started)
    }

    /// Erase the next batch through `erase`, in order.
    ///
    /// When the last cell is erased the state becomes Done and the completion hook runs.
    /// If `erase` fails the cursor stays on the failing cell and the error is returned.
    pub fn tick(
        &mut self,
        mut erase: impl FnMut(usize) -> CurtainResult<()>,
    ) -> CurtainResult<TickStatus> {
        if self.state != DissolveState::Running {
            return Ok(TickStatus::idle(self.state == DissolveState::Done));
        }
        let Some(run) = self.run.as_mut() else {
            return Ok(TickStatus::idle(false));
        };

        let end = (run.cursor + run.batch_size).min(run.order.len());
        let mut erased = 0;
        while run.cursor < end {
            erase(run.order[run.cursor])?;
            run.cursor += 1;
            erased += 1;
        }

        let remaining = run.remaining();
        if remaining == 0 && !run.completed {
            run.completed = true;
            self.state = DissolveState::Done;
            tracing::debug!(cells = run.order.len(), "dissolve complete");
            if let Some(hook) = run.on_complete.take() {
                hook();
            }
        }
        Ok(TickStatus {
            erased,
            remaining,
            done: remaining == 0,
        })
    }

    /// Stop scheduling; the completion hook is dropped without running.
    pub fn cancel(&mut self) {
        if let Some(run) = self.run.as_mut()
            && !run.completed
        {
            tracing::debug!(
                erased = run.cursor,
                remaining = run.remaining(),
                "dissolve cancelled"
            );
            run.on_complete = None;
        }
        if self.state == DissolveState::Running {
            self.state = DissolveState::Cancelled;
        }
    }

    /// Forget the current run so a new grid generation can start one.
    pub fn reset(&mut self) {
        self.cancel();
        self.run = None;
        self.state = DissolveState::Idle;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dissolve/scheduler.rs"]
mod tests;
