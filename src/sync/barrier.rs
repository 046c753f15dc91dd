//! Reusable, generation-counted rendezvous for a fixed set of workers.
//!
//! Every participant calls [`Barrier::wait`] once per pass. The last arrival
//! resets the counter, bumps the generation and wakes everybody. Waiters sleep
//! until the generation they arrived in has closed, so a fast worker that
//! re-enters the barrier for the next pass cannot release stragglers early.
//!
//! The engine can [`Barrier::break_barrier`] when a peer will never arrive
//! (spawn failure, panic). All current and future waits then return
//! [`BarrierWait::Broken`].
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarrierWait {
    /// This caller was the last to arrive and released the others.
    Leader,
    Follower,
    /// The barrier was broken; the pass did not complete for everybody.
    Broken,
}

impl BarrierWait {
    #[inline]
    pub fn is_broken(self) -> bool {
        self == BarrierWait::Broken
    }
}

#[derive(Debug, Default)]
struct State {
    arrived: usize,
    generation: u64,
    broken: bool,
}

#[derive(Debug)]
pub struct Barrier {
    state: Mutex<State>,
    released: Condvar,
    total: usize,
}

impl Barrier {
    /// Barrier for `total` participants. `total` of zero behaves like one.
    pub fn new(total: usize) -> Self {
        Self {
            state: Mutex::new(State::default()),
            released: Condvar::new(),
            total: total.max(1),
        }
    }

    /// Completed rendezvous so far.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn wait(&self) -> BarrierWait {
        let mut state = self.lock();
        if state.broken {
            return BarrierWait::Broken;
        }
        state.arrived += 1;
        if state.arrived == self.total {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            self.released.notify_all();
            return BarrierWait::Leader;
        }

        let generation = state.generation;
        while state.generation == generation && !state.broken {
            state = self
                .released
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if state.generation == generation {
            BarrierWait::Broken
        } else {
            BarrierWait::Follower
        }
    }

    /// Release every waiter and make subsequent waits return immediately.
    pub fn break_barrier(&self) {
        let mut state = self.lock();
        state.broken = true;
        self.released.notify_all();
    }

    pub fn is_broken(&self) -> bool {
        self.lock().broken
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // the state is plain counters, still consistent after a panic elsewhere
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
