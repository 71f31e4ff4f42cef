//! Scheduled tasks with cancellation handles
//!
//! The state machine never sleeps. It asks a `Scheduler` for timers and is
//! called back through `LottoApp::on_timer` with the kind and handle.

/// Identifies one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// What a timer is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Repeating reshuffle of the displayed balls while spinning
    PreviewTick,
    /// One-shot end of the spin: the real draw
    Resolve,
    /// One-shot toast dismissal
    ToastDismiss,
}

/// Timer service
pub trait Scheduler {
    fn schedule_once(&mut self, kind: TimerKind, delay_ms: u32) -> TimerHandle;

    fn schedule_repeating(&mut self, kind: TimerKind, period_ms: u32) -> TimerHandle;

    /// Cancel a timer; unknown or already-fired handles are ignored
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Debug, Clone)]
struct Pending {
    handle: TimerHandle,
    kind: TimerKind,
    due_ms: u64,
    period_ms: Option<u32>,
}

/// Virtual-time scheduler; time only moves when told to
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    next_id: u64,
    pending: Vec<Pending>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of live timers
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Whether any live timer has this kind
    pub fn has_pending(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|p| p.kind == kind)
    }

    /// Pop the earliest timer due at or before `until_ms`, moving the clock
    /// to its due time. Repeating timers are re-armed. Ties fire in
    /// scheduling order.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerKind, TimerHandle)> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= until_ms)
            .min_by_key(|(_, p)| (p.due_ms, p.handle))
            .map(|(i, _)| i)?;

        let due = self.pending[idx].due_ms;
        self.now_ms = self.now_ms.max(due);

        let fired = match self.pending[idx].period_ms {
            Some(period) => {
                let p = &mut self.pending[idx];
                p.due_ms += u64::from(period.max(1));
                p.clone()
            }
            None => self.pending.remove(idx),
        };
        Some((fired.kind, fired.handle))
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    fn push(&mut self, kind: TimerKind, delay_ms: u32, period_ms: Option<u32>) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending.push(Pending {
            handle,
            kind,
            due_ms: self.now_ms + u64::from(delay_ms),
            period_ms,
        });
        handle
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&mut self, kind: TimerKind, delay_ms: u32) -> TimerHandle {
        self.push(kind, delay_ms, None)
    }

    fn schedule_repeating(&mut self, kind: TimerKind, period_ms: u32) -> TimerHandle {
        self.push(kind, period_ms.max(1), Some(period_ms))
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|p| p.handle != handle);
    }
}
