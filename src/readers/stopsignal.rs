// src/readers/stopsignal.rs

//! Implements a [`StopSignal`], a shutdown latch that interrupts the
//! sleeping done by the readers.
//!
//! A reader in tail mode may wait indefinitely for new data, and a pacing
//! reader may sleep for as long as the gap between two records. Both sleep
//! through a `StopSignal` so that another thread, e.g. a Ctrl-C handler, may
//! end the wait promptly.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ::crossbeam_channel::{RecvTimeoutError, TryRecvError};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Nothing is ever sent on the channel. Dropping the only sender
/// disconnects every receiver, which is the "stopped" state.
type ChanSendStop = ::crossbeam_channel::Sender<()>;
type ChanRecvStop = ::crossbeam_channel::Receiver<()>;

/// Cloneable shutdown latch.
///
/// All clones share the same state. Once [`stop`] is called on any clone,
/// every clone [`is_stopped`] and every current or future [`sleep`] returns
/// immediately. A `StopSignal` cannot be reset.
///
/// [`stop`]: StopSignal::stop
/// [`is_stopped`]: StopSignal::is_stopped
/// [`sleep`]: StopSignal::sleep
#[derive(Clone)]
pub struct StopSignal {
    chan_send: Arc<Mutex<Option<ChanSendStop>>>,
    chan_recv: ChanRecvStop,
}

impl fmt::Debug for StopSignal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("StopSignal")
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        StopSignal::new()
    }
}

impl StopSignal {
    pub fn new() -> StopSignal {
        let (chan_send, chan_recv) = ::crossbeam_channel::bounded::<()>(0);

        StopSignal {
            chan_send: Arc::new(Mutex::new(Some(chan_send))),
            chan_recv,
        }
    }

    /// Trip the latch. Idempotent.
    pub fn stop(&self) {
        defn!();
        let sender: Option<ChanSendStop> = match self.chan_send.lock() {
            Ok(mut guard) => guard.take(),
            // a panicked holder of the lock cannot have left the `Option`
            // half-taken
            Err(poisoned) => poisoned.into_inner().take(),
        };
        // dropping the sender disconnects all receivers
        drop(sender);
        defx!();
    }

    /// Has [`stop`] been called on this or any clone?
    ///
    /// [`stop`]: StopSignal::stop
    pub fn is_stopped(&self) -> bool {
        matches!(self.chan_recv.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Sleep for `duration` or until stopped, whichever comes first.
    ///
    /// Returns `true` if the entire `duration` passed, `false` if stopped.
    pub fn sleep(&self, duration: Duration) -> bool {
        if duration.is_zero() {
            return !self.is_stopped();
        }
        match self.chan_recv.recv_timeout(duration) {
            Err(RecvTimeoutError::Timeout) => true,
            Err(RecvTimeoutError::Disconnected) => {
                defñ!("interrupted sleep of {:?}", duration);
                false
            }
            // never sent
            Ok(_) => false,
        }
    }
}
