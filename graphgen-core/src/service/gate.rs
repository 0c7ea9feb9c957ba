//! Re-armable release barrier for paused workers.

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct GateState {
    paused: bool,
    epoch: u64,
}

/// Parks workers between a pause and the matching resume.
///
/// Every resume bumps the epoch, so a worker parked under one pause is
/// released even if another pause closes the gate before it wakes.
#[derive(Debug, Default)]
pub(super) struct PauseGate {
    state: Mutex<GateState>,
    released: Condvar,
}

impl PauseGate {
    /// Arms the gate; workers that reach [`Self::park`] block from now on.
    pub(super) fn close(&self) {
        self.state.lock().paused = true;
    }

    /// Releases every parked worker at once.
    pub(super) fn open(&self) {
        {
            let mut state = self.state.lock();
            state.paused = false;
            state.epoch = state.epoch.wrapping_add(1);
        }
        self.released.notify_all();
    }

    /// Blocks the caller until the gate is opened. Returns immediately when
    /// the gate is not closed.
    pub(super) fn park(&self) {
        let mut state = self.state.lock();
        let epoch = state.epoch;
        while state.paused && state.epoch == epoch {
            self.released.wait(&mut state);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        thread,
        time::Duration,
    };

    use super::*;

    #[test]
    fn open_gate_does_not_block() {
        let gate = PauseGate::default();
        gate.park();
        gate.close();
        gate.open();
        gate.park();
    }

    #[test]
    fn open_releases_every_parked_thread() {
        let gate = Arc::new(PauseGate::default());
        let released = Arc::new(AtomicUsize::new(0));
        gate.close();

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let gate = Arc::clone(&gate);
                let released = Arc::clone(&released);
                thread::spawn(move || {
                    gate.park();
                    released.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        assert_eq!(released.load(Ordering::SeqCst), 0);

        gate.open();
        for handle in handles {
            handle.join().expect("parked thread exits cleanly");
        }
        assert_eq!(released.load(Ordering::SeqCst), 3);
    }
}
