use crate::{
    domain::{apply, Action, BoardConfig, BoardState, DragOutcome},
    error::Result,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Handle returned by [`BoardStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Arc<BoardState>) + Send>;

/// Owns the current board snapshot and publishes a new one per action.
///
/// Dispatch takes `&mut self`, so actions are applied one at a time and
/// observers never see a partially applied transition.
pub struct BoardStore {
    state: Arc<BoardState>,
    version: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl BoardStore {
    /// Creates a store around an externally supplied state
    pub fn new(initial: BoardState) -> Self {
        Self {
            state: Arc::new(initial),
            version: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Creates a store holding the startup board for a configuration
    pub fn from_config(config: &BoardConfig) -> Result<Self> {
        Ok(Self::new(BoardState::new(config)?))
    }

    /// Returns the latest published snapshot
    pub fn snapshot(&self) -> Arc<BoardState> {
        Arc::clone(&self.state)
    }

    /// Number of actions applied since the store was created
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Applies an action and publishes the resulting snapshot.
    ///
    /// On error the current snapshot stays in place and nothing is published.
    pub fn dispatch(&mut self, action: Action) -> Result<Arc<BoardState>> {
        let next = match apply(&self.state, &action) {
            Ok(next) => Arc::new(next),
            Err(err) => {
                warn!(action = action.name(), error = %err, "Rejected board action");
                return Err(err);
            }
        };

        self.state = Arc::clone(&next);
        self.version += 1;
        debug!(
            action = action.name(),
            version = self.version,
            issues = next.issue_count(),
            "Applied board action"
        );

        for (_, listener) in self.listeners.iter_mut() {
            listener(&next);
        }

        Ok(next)
    }

    /// Dispatches the move described by a finished drag.
    ///
    /// Returns `Ok(None)` without touching the store when the issue was
    /// dropped outside every list.
    pub fn dispatch_drag(&mut self, outcome: DragOutcome) -> Result<Option<Arc<BoardState>>> {
        match outcome.into_action() {
            Some(action) => self.dispatch(action).map(Some),
            None => {
                debug!("Ignoring drag without destination");
                Ok(None)
            }
        }
    }

    /// Registers a listener called with every newly published snapshot
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Arc<BoardState>) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new(BoardState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::DragLocation, error::BoardError};
    use std::sync::Mutex;

    #[test]
    fn test_dispatch_publishes_snapshot() {
        let mut store = BoardStore::default();
        let before = store.snapshot();

        let after = store.dispatch(Action::add_issue("To do")).unwrap();

        assert_eq!(store.version(), 1);
        assert_eq!(after.issue_count(), 1);
        assert!(Arc::ptr_eq(&after, &store.snapshot()));
        assert_eq!(before.issue_count(), 0);
    }

    #[test]
    fn test_failed_dispatch_keeps_state() {
        let mut store = BoardStore::default();
        let before = store.snapshot();

        let err = store
            .dispatch(Action::move_issue("To do", "Done", 0, 0))
            .unwrap_err();

        assert!(err.is_invariant_violation());
        assert_eq!(store.version(), 0);
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn test_subscribers_receive_each_snapshot() {
        let mut store = BoardStore::default();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let id = store.subscribe(move |state| {
            sink.lock().unwrap().push(state.issue_count());
        });

        store.dispatch(Action::add_issue("To do")).unwrap();
        store.dispatch(Action::add_issue("Done")).unwrap();
        let _ = store.dispatch(Action::add_issue("Missing"));

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.dispatch(Action::add_issue("Done")).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_dispatch_drag() {
        let mut store = BoardStore::default();
        store.dispatch(Action::add_issue("To do")).unwrap();

        let dropped_outside = DragOutcome {
            source: DragLocation::new("To do", 0),
            destination: None,
        };
        assert!(store.dispatch_drag(dropped_outside).unwrap().is_none());
        assert_eq!(store.version(), 1);

        let dropped_on_done = DragOutcome {
            source: DragLocation::new("To do", 0),
            destination: Some(DragLocation::new("Done", 0)),
        };
        let state = store.dispatch_drag(dropped_on_done).unwrap().unwrap();
        assert_eq!(state.list("Done").unwrap().len(), 1);
        assert!(state.list("To do").unwrap().is_empty());
    }

    #[test]
    fn test_from_config_rejects_invalid_config() {
        let config = BoardConfig {
            lists: vec!["".to_string()],
            ..BoardConfig::default()
        };
        assert!(matches!(
            BoardStore::from_config(&config),
            Err(BoardError::ConfigError(_))
        ));
    }
}
