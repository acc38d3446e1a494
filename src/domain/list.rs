use crate::domain::issue::{Issue, IssueId};
use serde::{Deserialize, Serialize};

/// A named column of issues, ordered top to bottom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueList {
    pub name: String,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl IssueList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            issues: Vec::new(),
        }
    }

    pub fn with_issues(name: impl Into<String>, issues: Vec<Issue>) -> Self {
        Self {
            name: name.into(),
            issues,
        }
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Issue> {
        self.issues.get(index)
    }

    /// Returns the position of the issue with the given id
    pub fn position(&self, id: &IssueId) -> Option<usize> {
        self.issues.iter().position(|issue| &issue.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &IssueId> {
        self.issues.iter().map(|issue| &issue.id)
    }
}
