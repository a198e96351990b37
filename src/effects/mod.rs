//! The environment-injection seam for command execution.
//!
//! Commands coming out of the engine are inert descriptors. A
//! [`CommandRunner`] is the one capability object that interprets them —
//! constructed once per environment (real I/O in production, a recorder in
//! tests) and handed an [`Emitter`] to feed results back into the action
//! stream. The core never calls a runner itself; the host does, strictly
//! after committing and observing the new state.

use std::sync::Arc;

/// Callback a runner uses to push follow-up actions into the machine's
/// dispatch queue.
pub struct Emitter<A> {
    emit: Arc<dyn Fn(A) + Send + Sync>,
}

impl<A> Emitter<A> {
    pub fn new<F>(emit: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            emit: Arc::new(emit),
        }
    }

    /// Feed one action back into the stream.
    pub fn emit(&self, action: A) {
        (self.emit)(action);
    }
}

impl<A> Clone for Emitter<A> {
    fn clone(&self) -> Self {
        Self {
            emit: Arc::clone(&self.emit),
        }
    }
}

/// Interprets commands for one environment.
pub trait CommandRunner<C, A>: Send + Sync {
    /// Perform the side effect the command describes. Results come back as
    /// actions through the emitter; there is no other channel.
    fn run(&self, command: C, emit: &Emitter<A>);
}

/// Run the command from a dispatch, if there was one.
///
/// Thin convenience for the host's post-commit step:
/// `perform(&runner, machine.dispatch(action), &emitter)`.
pub fn perform<C, A>(runner: &dyn CommandRunner<C, A>, command: Option<C>, emit: &Emitter<A>) {
    if let Some(command) = command {
        runner.run(command, emit);
    }
}
