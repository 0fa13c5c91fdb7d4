//! Immutable state snapshots published to observers.
//!
//! Each store keeps its state as an `Arc<S>` inside a `watch` channel.
//! Readers clone the `Arc`; writers go through [`Published::update`], which
//! copies on write when a reader still holds the previous snapshot, so a
//! snapshot never changes after it was handed out.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::StoreError;

#[derive(Debug)]
pub(crate) struct Published<S> {
    tx: watch::Sender<Arc<S>>,
}

impl<S: Clone> Published<S> {
    pub(crate) fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { tx }
    }

    pub(crate) fn snapshot(&self) -> Arc<S> {
        Arc::clone(&self.tx.borrow())
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<S>> {
        self.tx.subscribe()
    }

    /// Applies `f` and notifies subscribers.
    pub(crate) fn update(&self, f: impl FnOnce(&mut S)) {
        self.tx.send_modify(|state| f(Arc::make_mut(state)));
    }

    /// Applies `f` and returns its result; subscribers are notified only
    /// when it returns `Ok`. `f` must leave the state untouched when it fails.
    pub(crate) fn try_update<T, E>(
        &self,
        f: impl FnOnce(&mut S) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut outcome = None;
        self.tx.send_if_modified(|state| {
            let result = f(Arc::make_mut(state));
            let modified = result.is_ok();
            outcome = Some(result);
            modified
        });
        outcome.expect("send_if_modified always invokes its closure")
    }
}

/// State carrying the transient `loading` / `error` hints every async
/// action maintains.
pub(crate) trait ActionState: Clone {
    fn loading_mut(&mut self) -> &mut bool;
    fn error_mut(&mut self) -> &mut Option<String>;
}

macro_rules! impl_action_state {
    ($state:ty) => {
        impl $crate::snapshot::ActionState for $state {
            fn loading_mut(&mut self) -> &mut bool {
                &mut self.loading
            }

            fn error_mut(&mut self) -> &mut Option<String> {
                &mut self.error
            }
        }
    };
}
pub(crate) use impl_action_state;

impl<S: ActionState> Published<S> {
    /// Marks an action as started: `loading` on, previous error cleared.
    pub(crate) fn begin(&self) {
        self.update(|state| {
            *state.loading_mut() = true;
            *state.error_mut() = None;
        });
    }

    /// Applies the action's result and turns `loading` off.
    pub(crate) fn finish(&self, f: impl FnOnce(&mut S)) {
        self.update(|state| {
            f(state);
            *state.loading_mut() = false;
        });
    }

    /// Records `err` as the user-facing error, turns `loading` off and hands
    /// the error back for propagation.
    pub(crate) fn fail(&self, err: StoreError) -> StoreError {
        let message = err.user_message();
        tracing::debug!(error = %message, "store action failed");
        self.update(|state| {
            *state.loading_mut() = false;
            *state.error_mut() = Some(message);
        });
        err
    }
}
