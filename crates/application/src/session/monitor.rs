//! Inactivity monitor: one resettable deadline driven by environment
//! signals.

use std::sync::atomic::Ordering;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use super::manager::SessionManager;
use crate::error::{SessionError, SessionResult};
use crate::ports::EnvironmentEvent;

/// Keeps the monitor task alive. Dropping the handle stops the task and
/// unsubscribes from the environment signals.
#[derive(Debug)]
pub struct MonitorHandle {
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Returns true until the task has stopped.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops the task and waits for it to wind down.
    pub async fn stop(mut self) {
        self.task.abort();
        let _ = (&mut self.task).await;
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Clears the running flag when the task ends, however it ends.
struct RunningGuard(SessionManager);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.monitor_flag().store(false, Ordering::Release);
    }
}

impl SessionManager {
    /// Spawns the inactivity monitor.
    ///
    /// The task applies every environment signal to the session. When no
    /// activity arrives within the inactivity window while authenticated,
    /// the session is ended with [`SessionNotice::Expired`](super::SessionNotice::Expired).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MonitorAlreadyRunning`] if a monitor is
    /// already attached.
    pub fn start_monitor(&self) -> SessionResult<MonitorHandle> {
        if self.monitor_flag().swap(true, Ordering::AcqRel) {
            return Err(SessionError::MonitorAlreadyRunning);
        }
        let events = self.signals().subscribe();
        let guard = RunningGuard(self.clone());
        let task = tokio::spawn(async move {
            run(&guard.0, events).await;
            drop(guard);
        });
        Ok(MonitorHandle { task })
    }
}

async fn run(session: &SessionManager, mut events: broadcast::Receiver<EnvironmentEvent>) {
    let window = session.inactivity_timeout();
    let deadline = tokio::time::sleep(window);
    tokio::pin!(deadline);
    let mut listening = true;

    loop {
        tokio::select! {
            event = events.recv(), if listening => match event {
                Ok(event) => session.handle_event(event),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "environment events lagged");
                    session.record_activity();
                }
                Err(RecvError::Closed) => {
                    debug!("environment signals closed");
                    listening = false;
                }
            },
            () = session.activity().notified() => {
                deadline.as_mut().reset(Instant::now() + window);
            }
            () = &mut deadline => {
                if session.is_authenticated() {
                    session.expire().await;
                }
                deadline.as_mut().reset(Instant::now() + window);
            }
        }
    }
}
