use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Unique identifier for an issue (e.g., item-1, item-2, item-100)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IssueId(String);

impl IssueId {
    const GENERATED_PREFIX: &'static str = "item-";

    /// Creates a new IssueId from a counter
    pub fn new(counter: u32) -> Self {
        Self(format!("{}{}", Self::GENERATED_PREFIX, counter))
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the counter value for ids of the generated `item-<n>` form
    pub fn number(&self) -> Option<u32> {
        self.0
            .strip_prefix(Self::GENERATED_PREFIX)
            .and_then(|rest| rest.parse::<u32>().ok())
    }
}

impl FromStr for IssueId {
    type Err = crate::error::BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(crate::error::BoardError::InvalidIssueId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for IssueId {
    type Error = crate::error::BoardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IssueId> for String {
    fn from(id: IssueId) -> Self {
        id.0
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single card on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: IssueId,
    pub content: String,
}

impl Issue {
    pub fn new(id: IssueId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }

    /// Generates an issue from a content template.
    ///
    /// Every `{n}` in the template is replaced with the counter value and
    /// every `{id}` with the full identifier.
    pub fn generate(counter: u32, template: &str) -> Self {
        let id = IssueId::new(counter);
        let content = template
            .replace("{n}", &counter.to_string())
            .replace("{id}", id.as_str());
        Self { id, content }
    }
}
