pub mod action;
pub mod board;
pub mod issue;
pub mod list;
pub mod reducer;

pub use action::{Action, DragLocation, DragOutcome};
pub use board::{BoardConfig, BoardState};
pub use issue::{Issue, IssueId};
pub use list::IssueList;
pub use reducer::apply;
