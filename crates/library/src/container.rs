//! Hand-off between the interactive session and a detached run.
//!
//! The event loop owns the terminal. A run launched from the browser must
//! first get the terminal back, so the run side asks the loop to shut down and
//! waits until the loop confirms it has released the terminal. The loop then
//! waits for the run to finish before the process exits.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use tracing::trace;

/// Loop side of the hand-off.
#[derive(Debug)]
pub struct Container {
    /// Shutdown requests from the run side.
    shutdown_rx: Receiver<()>,
    /// Acknowledgement that the terminal is released.
    released_tx: Sender<()>,
    /// Completion of the handed-off run.
    done_rx: Receiver<()>,
}

/// Run side of the hand-off; cheap to clone.
#[derive(Debug, Clone)]
pub struct ContainerHandle {
    /// Shutdown requests to the loop.
    shutdown_tx: Sender<()>,
    /// Terminal release acknowledgements.
    released_rx: Receiver<()>,
    /// Run completion.
    done_tx: Sender<()>,
}

/// Create a connected container and handle.
pub fn container() -> (Container, ContainerHandle) {
    let (shutdown_tx, shutdown_rx) = bounded(1);
    let (released_tx, released_rx) = bounded(1);
    let (done_tx, done_rx) = bounded(1);
    (
        Container {
            shutdown_rx,
            released_tx,
            done_rx,
        },
        ContainerHandle {
            shutdown_tx,
            released_rx,
            done_tx,
        },
    )
}

impl Container {
    /// True when a shutdown was requested since the last call.
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_rx.try_recv().is_ok()
    }

    /// Wait up to `timeout` for a shutdown request.
    pub fn wait_shutdown(&self, timeout: Duration) -> bool {
        self.shutdown_rx.recv_timeout(timeout).is_ok()
    }

    /// Tell the run side the terminal has been released.
    pub fn released(&self) {
        trace!("terminal released");
        let _ignored = self.released_tx.try_send(());
    }

    /// Block until the handed-off run finishes.
    ///
    /// Returns immediately when every handle has been dropped.
    pub fn wait_for_handoff(&self) {
        let _ignored = self.done_rx.recv();
    }

    /// Like [`Container::wait_for_handoff`], giving up after `timeout`.
    pub fn wait_for_handoff_timeout(&self, timeout: Duration) -> bool {
        !matches!(
            self.done_rx.recv_timeout(timeout),
            Err(RecvTimeoutError::Timeout)
        )
    }
}

impl ContainerHandle {
    /// Ask the event loop to stop and block until it releases the terminal.
    ///
    /// Returns early when the loop side is gone.
    pub fn shutdown(&self) {
        trace!("requesting interactive shutdown");
        let _ignored = self.shutdown_tx.try_send(());
        let _ignored = self.released_rx.recv();
    }

    /// Signal that the handed-off run completed.
    pub fn finish(&self) {
        let _ignored = self.done_tx.try_send(());
    }
}
