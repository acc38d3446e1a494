use crate::domain::list::IssueList;
use serde::{Deserialize, Serialize};

/// A requested board transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Moves one issue between lists, or within a list when `from == to`
    MoveIssue {
        from: String,
        to: String,
        from_index: usize,
        to_index: usize,
    },
    /// Appends a list. A missing name is generated as `List <n>`.
    AddList {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        seed: usize,
    },
    /// Appends a generated issue to a list
    AddIssue {
        list: String,
        #[serde(default)]
        template: Option<String>,
    },
    /// Replaces the contents of the named lists wholesale
    ReplaceLists { lists: Vec<IssueList> },
    /// Removes one issue; its id is never handed out again
    RemoveIssue { list: String, index: usize },
}

impl Action {
    /// Name of the action kind, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::MoveIssue { .. } => "move_issue",
            Self::AddList { .. } => "add_list",
            Self::AddIssue { .. } => "add_issue",
            Self::ReplaceLists { .. } => "replace_lists",
            Self::RemoveIssue { .. } => "remove_issue",
        }
    }

    pub fn move_issue(
        from: impl Into<String>,
        to: impl Into<String>,
        from_index: usize,
        to_index: usize,
    ) -> Self {
        Self::MoveIssue {
            from: from.into(),
            to: to.into(),
            from_index,
            to_index,
        }
    }

    pub fn add_issue(list: impl Into<String>) -> Self {
        Self::AddIssue {
            list: list.into(),
            template: None,
        }
    }
}

/// A position inside a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragLocation {
    pub list: String,
    pub index: usize,
}

impl DragLocation {
    pub fn new(list: impl Into<String>, index: usize) -> Self {
        Self {
            list: list.into(),
            index,
        }
    }
}

/// Result of a finished drag gesture as reported by the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragOutcome {
    pub source: DragLocation,
    /// `None` when the issue was dropped outside every list
    pub destination: Option<DragLocation>,
}

impl DragOutcome {
    /// Converts the drag into a move, or `None` when there is nowhere to move to
    pub fn into_action(self) -> Option<Action> {
        let destination = self.destination?;
        Some(Action::MoveIssue {
            from: self.source.list,
            to: destination.list,
            from_index: self.source.index,
            to_index: destination.index,
        })
    }
}
