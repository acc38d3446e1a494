//! # Issue Board Core
//!
//! State machine for a drag-and-drop kanban issue board.
//!
//! The board is an ordered set of named issue lists. Every change is an
//! [`Action`] fed through the pure [`apply`] function, which returns a new
//! immutable [`BoardState`] and leaves the old one intact. [`BoardStore`]
//! holds the current snapshot and publishes each new one to subscribers.
//! Authentication and persistence are reached through the [`Authenticator`]
//! and [`Storage`] traits; the core itself performs no I/O.

pub mod domain;
pub mod error;
pub mod session;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use domain::{
    action::{Action, DragLocation, DragOutcome},
    board::{BoardConfig, BoardState},
    issue::{Issue, IssueId},
    list::IssueList,
    reducer::apply,
};
pub use error::{BoardError, Result};
pub use session::{AuthOutcome, Authenticator, BoardGate, Credentials, SessionToken};
pub use storage::{file_storage::FileStorage, SavedBoard, Storage};
pub use store::{BoardStore, SubscriptionId};
