use core::time::Duration;

/// Period between two ticks of the elapsed-time counter.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Largest value the elapsed-time counter reaches, it stops itself there.
pub const TIMER_MAX: u16 = 999;

/// Source of repeating ticks.
///
/// Every call to [`Scheduler::every`] starts one independent tick source which
/// keeps firing until its handle is dropped.
pub trait Scheduler {
    type Handle;

    fn every(&self, period: Duration) -> Self::Handle;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerState {
    Stopped,
    Running,
}

/// Elapsed-seconds counter with at most one live tick source.
///
/// The tick source is owned by the timer, dropping the timer cancels it.
pub struct TimerControl<S: Scheduler> {
    scheduler: S,
    value: u16,
    max: u16,
    ticking: Option<S::Handle>,
}

impl<S: Scheduler> core::fmt::Debug for TimerControl<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TimerControl")
            .field("value", &self.value)
            .field("max", &self.max)
            .field("state", &self.state())
            .finish()
    }
}

impl<S: Scheduler> TimerControl<S> {
    pub fn new(scheduler: S) -> Self {
        Self::with_max(scheduler, TIMER_MAX)
    }

    pub fn with_max(scheduler: S, max: u16) -> Self {
        Self {
            scheduler,
            value: 0,
            max,
            ticking: None,
        }
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    pub fn state(&self) -> TimerState {
        if self.ticking.is_some() {
            TimerState::Running
        } else {
            TimerState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticking.is_some()
    }

    /// Starts ticking unless already running. Returns whether a tick source was created.
    pub fn start(&mut self) -> bool {
        if self.ticking.is_some() || self.value >= self.max {
            return false;
        }
        log::debug!("timer started at {}", self.value);
        self.ticking = Some(self.scheduler.every(TICK_PERIOD));
        true
    }

    pub fn pause(&mut self) -> bool {
        let was_running = self.ticking.take().is_some();
        if was_running {
            log::debug!("timer paused at {}", self.value);
        }
        was_running
    }

    /// Stops the timer and seeds it with `value`.
    pub fn reset(&mut self, value: u16) {
        self.pause();
        self.value = value.min(self.max);
    }

    /// Advances by one second. Ticks delivered after a pause are ignored.
    pub fn tick(&mut self) -> bool {
        if self.ticking.is_none() {
            return false;
        }
        if self.value < self.max {
            self.value += 1;
        }
        if self.value >= self.max {
            self.pause();
        }
        true
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    /// Scheduler driven by hand: every live handle fires once per simulated second.
    #[derive(Clone, Debug, Default)]
    pub(crate) struct ManualScheduler {
        sources: Rc<RefCell<Vec<Weak<()>>>>,
    }

    #[derive(Debug)]
    pub(crate) struct ManualHandle(#[allow(dead_code)] Rc<()>);

    impl ManualScheduler {
        pub(crate) fn live_sources(&self) -> usize {
            self.sources
                .borrow()
                .iter()
                .filter(|source| source.strong_count() > 0)
                .count()
        }
    }

    impl Scheduler for ManualScheduler {
        type Handle = ManualHandle;

        fn every(&self, period: Duration) -> ManualHandle {
            assert_eq!(period, TICK_PERIOD);
            let handle = Rc::new(());
            self.sources.borrow_mut().push(Rc::downgrade(&handle));
            ManualHandle(handle)
        }
    }

    /// Lets one simulated second pass, delivering a tick per live source.
    pub(crate) fn advance<S: Scheduler>(timer: &mut TimerControl<S>, scheduler: &ManualScheduler) {
        for _ in 0..scheduler.live_sources() {
            timer.tick();
        }
    }
}
