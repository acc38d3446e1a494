use crate::{
    domain::{
        issue::{Issue, IssueId},
        list::IssueList,
    },
    error::{BoardError, Result},
};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, sync::Arc};

/// Content template used when an action does not supply one
pub const DEFAULT_ISSUE_TEMPLATE: &str = "Issue {n}";

/// Prefix for generated list names (e.g., "List 1", "List 2")
pub const GENERATED_LIST_PREFIX: &str = "List ";

/// Startup configuration for a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Names of the initial lists, left to right
    pub lists: Vec<String>,
    /// Number of generated issues placed in each initial list
    pub seed_issues: usize,
    /// Template for generated issue content
    pub issue_template: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            lists: vec![
                "To do".to_string(),
                "In progress".to_string(),
                "Done".to_string(),
            ],
            seed_issues: 0,
            issue_template: DEFAULT_ISSUE_TEMPLATE.to_string(),
        }
    }
}

impl BoardConfig {
    /// Parses a configuration from TOML. Missing fields take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the initial list names are non-empty and unique
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for name in &self.lists {
            if name.trim().is_empty() {
                return Err(BoardError::ConfigError(
                    "list names must not be empty".to_string(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(BoardError::ConfigError(format!(
                    "list name '{}' appears more than once",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// On-the-wire shape of a board, validated before it becomes a `BoardState`
#[derive(Deserialize)]
struct BoardStateRecord {
    lists: Vec<IssueList>,
    #[serde(default = "first_counter")]
    next_issue_number: u64,
    #[serde(default = "first_counter")]
    next_list_number: u64,
    #[serde(default = "default_template")]
    issue_template: String,
}

fn first_counter() -> u64 {
    1
}

fn default_template() -> String {
    DEFAULT_ISSUE_TEMPLATE.to_string()
}

impl TryFrom<BoardStateRecord> for BoardState {
    type Error = BoardError;

    fn try_from(record: BoardStateRecord) -> Result<Self> {
        let mut state = Self::from_lists(record.lists)?;
        state.next_issue_number = state.next_issue_number.max(record.next_issue_number);
        state.next_list_number = state.next_list_number.max(record.next_list_number);
        state.issue_template = record.issue_template;
        Ok(state)
    }
}

/// Immutable snapshot of the whole board.
///
/// Lists are kept in visual (left to right) order behind `Arc`, so a
/// transition only copies the lists it touches. Invariants:
/// - list names are unique
/// - an issue id appears in at most one list, at most once
/// - `next_issue_number` is above every generated issue id on the board
/// - `next_list_number` is above every generated list name on the board
///
/// Counters are wider than the `u32` numbers they hand out, so a board
/// holding `item-4294967295` records an exhausted id space instead of
/// wrapping or repeating an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardStateRecord")]
pub struct BoardState {
    lists: Vec<Arc<IssueList>>,
    next_issue_number: u64,
    next_list_number: u64,
    issue_template: String,
}

impl BoardState {
    /// Builds the startup board described by a configuration
    pub fn new(config: &BoardConfig) -> Result<Self> {
        config.validate()?;

        let mut state = Self::from_lists(Vec::new())?;
        state.issue_template = config.issue_template.clone();

        for name in &config.lists {
            let mut list = IssueList::new(name.clone());
            for _ in 0..config.seed_issues {
                list.issues.push(state.allocate_issue(None)?);
            }
            state.note_list_name(name);
            state.lists.push(Arc::new(list));
        }

        Ok(state)
    }

    /// Builds a board from externally supplied lists, checking every invariant
    pub fn from_lists(lists: Vec<IssueList>) -> Result<Self> {
        let lists: Vec<Arc<IssueList>> = lists.into_iter().map(Arc::new).collect();
        validate_lists(&lists)?;

        let mut state = Self {
            lists,
            next_issue_number: 1,
            next_list_number: 1,
            issue_template: DEFAULT_ISSUE_TEMPLATE.to_string(),
        };

        let names: Vec<String> = state.lists.iter().map(|l| l.name.clone()).collect();
        for name in &names {
            state.note_list_name(name);
        }
        let ids: Vec<IssueId> = state
            .lists
            .iter()
            .flat_map(|l| l.ids().cloned())
            .collect();
        for id in &ids {
            state.note_issue_id(id);
        }

        Ok(state)
    }

    /// Iterates over the lists in visual order
    pub fn lists(&self) -> impl Iterator<Item = &IssueList> {
        self.lists.iter().map(|list| list.as_ref())
    }

    /// Gets a list by name
    pub fn list(&self, name: &str) -> Option<&IssueList> {
        self.lists
            .iter()
            .find(|list| list.name == name)
            .map(|list| list.as_ref())
    }

    pub fn list_names(&self) -> Vec<&str> {
        self.lists.iter().map(|list| list.name.as_str()).collect()
    }

    pub fn list_count(&self) -> usize {
        self.lists.len()
    }

    /// Total number of issues across all lists
    pub fn issue_count(&self) -> usize {
        self.lists.iter().map(|list| list.len()).sum()
    }

    /// Finds which list holds an issue and at what position
    pub fn find_issue(&self, id: &IssueId) -> Option<(&str, usize)> {
        self.lists.iter().find_map(|list| {
            list.position(id)
                .map(|index| (list.name.as_str(), index))
        })
    }

    pub fn contains_issue(&self, id: &IssueId) -> bool {
        self.find_issue(id).is_some()
    }

    pub fn next_issue_number(&self) -> u64 {
        self.next_issue_number
    }

    pub fn next_list_number(&self) -> u64 {
        self.next_list_number
    }

    pub fn issue_template(&self) -> &str {
        &self.issue_template
    }

    /// Returns true when both snapshots hold the very same allocation for
    /// the named list
    pub fn shares_list_with(&self, other: &BoardState, name: &str) -> bool {
        match (self.list_arc(name), other.list_arc(name)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn list_arc(&self, name: &str) -> Option<&Arc<IssueList>> {
        self.lists.iter().find(|list| list.name == name)
    }

    pub(crate) fn index_of(&self, name: &str) -> Result<usize> {
        self.lists
            .iter()
            .position(|list| list.name == name)
            .ok_or_else(|| BoardError::ListNotFound(name.to_string()))
    }

    pub(crate) fn list_at(&self, index: usize) -> &IssueList {
        &self.lists[index]
    }

    /// Gives write access to one list, copying it first if an older
    /// snapshot still refers to it
    pub(crate) fn list_at_mut(&mut self, index: usize) -> &mut IssueList {
        Arc::make_mut(&mut self.lists[index])
    }

    pub(crate) fn push_list(&mut self, list: IssueList) {
        self.note_list_name(&list.name);
        self.lists.push(Arc::new(list));
    }

    /// Creates a fresh issue, advancing the id counter.
    ///
    /// Fails once every `item-<n>` id has been handed out.
    pub(crate) fn allocate_issue(&mut self, template: Option<&str>) -> Result<Issue> {
        let counter = u32::try_from(self.next_issue_number)
            .map_err(|_| BoardError::IdSpaceExhausted)?;
        self.next_issue_number += 1;
        let template = template.unwrap_or(&self.issue_template);
        Ok(Issue::generate(counter, template))
    }

    /// Produces the next unused generated list name, advancing the counter.
    ///
    /// Every iteration consumes a counter value, so the loop ends at the
    /// latest when the `u32` range runs out.
    pub(crate) fn allocate_list_name(&mut self) -> Result<String> {
        loop {
            let counter = u32::try_from(self.next_list_number)
                .map_err(|_| BoardError::ListNamesExhausted)?;
            self.next_list_number += 1;
            let name = format!("{}{}", GENERATED_LIST_PREFIX, counter);
            if self.list_arc(&name).is_none() {
                return Ok(name);
            }
        }
    }

    /// Keeps the issue counter above a generated id that entered the board
    pub(crate) fn note_issue_id(&mut self, id: &IssueId) {
        if let Some(n) = id.number() {
            self.next_issue_number = self.next_issue_number.max(u64::from(n) + 1);
        }
    }

    fn note_list_name(&mut self, name: &str) {
        if let Some(n) = generated_list_number(name) {
            self.next_list_number = self.next_list_number.max(u64::from(n) + 1);
        }
    }
}

impl Default for BoardState {
    fn default() -> Self {
        let mut state = Self {
            lists: Vec::new(),
            next_issue_number: 1,
            next_list_number: 1,
            issue_template: DEFAULT_ISSUE_TEMPLATE.to_string(),
        };
        for name in BoardConfig::default().lists {
            state.push_list(IssueList::new(name));
        }
        state
    }
}

fn generated_list_number(name: &str) -> Option<u32> {
    name.strip_prefix(GENERATED_LIST_PREFIX)
        .and_then(|rest| rest.parse::<u32>().ok())
}

pub(crate) fn validate_list_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(BoardError::InvalidListName(name.to_string()));
    }
    Ok(())
}

fn validate_lists(lists: &[Arc<IssueList>]) -> Result<()> {
    let mut names = HashSet::new();
    let mut ids = HashSet::new();

    for list in lists {
        validate_list_name(&list.name)?;
        if !names.insert(list.name.as_str()) {
            return Err(BoardError::DuplicateListName(list.name.clone()));
        }
        for id in list.ids() {
            if !ids.insert(id) {
                return Err(BoardError::DuplicateIssueId(id.to_string()));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(n: u32) -> Issue {
        Issue::new(IssueId::new(n), format!("Issue {}", n))
    }

    #[test]
    fn test_board_creation() {
        let board = BoardState::default();
        assert_eq!(board.list_names(), vec!["To do", "In progress", "Done"]);
        assert_eq!(board.issue_count(), 0);
        assert_eq!(board.next_issue_number(), 1);
    }

    #[test]
    fn test_seeded_board_from_config() {
        let config = BoardConfig {
            lists: vec!["A".to_string(), "B".to_string()],
            seed_issues: 2,
            issue_template: "Card {n}".to_string(),
        };
        let board = BoardState::new(&config).unwrap();

        assert_eq!(board.issue_count(), 4);
        assert_eq!(board.next_issue_number(), 5);
        let b = board.list("B").unwrap();
        assert_eq!(b.issues[0].id.as_str(), "item-3");
        assert_eq!(b.issues[1].content, "Card 4");
    }

    #[test]
    fn test_config_rejects_duplicate_lists() {
        let config = BoardConfig {
            lists: vec!["A".to_string(), "A".to_string()],
            ..BoardConfig::default()
        };
        assert!(matches!(
            BoardState::new(&config),
            Err(BoardError::ConfigError(_))
        ));
    }

    #[test]
    fn test_config_from_toml() {
        let config = BoardConfig::from_toml_str(
            r#"
            lists = ["Backlog", "Doing"]
            seed_issues = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.lists, vec!["Backlog", "Doing"]);
        assert_eq!(config.seed_issues, 1);
        assert_eq!(config.issue_template, DEFAULT_ISSUE_TEMPLATE);

        assert_eq!(BoardConfig::from_toml_str("").unwrap(), BoardConfig::default());
        assert!(BoardConfig::from_toml_str("lists = [\"\"]").is_err());
        assert!(BoardConfig::from_toml_str("seed_issues = \"many\"").is_err());
    }

    #[test]
    fn test_from_lists_checks_invariants() {
        let dup_name = vec![IssueList::new("A"), IssueList::new("A")];
        assert!(matches!(
            BoardState::from_lists(dup_name),
            Err(BoardError::DuplicateListName(_))
        ));

        let dup_id = vec![
            IssueList::with_issues("A", vec![issue(1)]),
            IssueList::with_issues("B", vec![issue(1)]),
        ];
        assert!(matches!(
            BoardState::from_lists(dup_id),
            Err(BoardError::DuplicateIssueId(_))
        ));

        let blank = vec![IssueList::new(" ")];
        assert!(matches!(
            BoardState::from_lists(blank),
            Err(BoardError::InvalidListName(_))
        ));
    }

    #[test]
    fn test_from_lists_advances_counters() {
        let board = BoardState::from_lists(vec![
            IssueList::with_issues("List 4", vec![issue(9), issue(2)]),
            IssueList::with_issues(
                "Other",
                vec![Issue::new("custom".parse().unwrap(), "x")],
            ),
        ])
        .unwrap();

        assert_eq!(board.next_issue_number(), 10);
        assert_eq!(board.next_list_number(), 5);
    }

    #[test]
    fn test_counters_past_last_id_exhaust_instead_of_repeating() {
        let mut board = BoardState::from_lists(vec![
            IssueList::with_issues("A", vec![issue(u32::MAX)]),
            IssueList::new("List 4294967295"),
        ])
        .unwrap();

        assert_eq!(board.next_issue_number(), u64::from(u32::MAX) + 1);
        assert!(matches!(
            board.allocate_issue(None),
            Err(BoardError::IdSpaceExhausted)
        ));
        assert!(matches!(
            board.allocate_list_name(),
            Err(BoardError::ListNamesExhausted)
        ));
    }

    #[test]
    fn test_last_id_is_still_handed_out() {
        let json = format!(
            r#"{{"lists": [{{"name": "A"}}], "next_issue_number": {}}}"#,
            u32::MAX
        );
        let mut board: BoardState = serde_json::from_str(&json).unwrap();

        let last = board.allocate_issue(None).unwrap();
        assert_eq!(last.id, IssueId::new(u32::MAX));
        assert!(board.allocate_issue(None).is_err());
    }

    #[test]
    fn test_find_issue() {
        let board = BoardState::from_lists(vec![
            IssueList::with_issues("A", vec![issue(1)]),
            IssueList::with_issues("B", vec![issue(2), issue(3)]),
        ])
        .unwrap();

        assert_eq!(board.find_issue(&IssueId::new(3)), Some(("B", 1)));
        assert!(!board.contains_issue(&IssueId::new(4)));
    }

    #[test]
    fn test_serialization_round_trip() {
        let board = BoardState::new(&BoardConfig {
            seed_issues: 1,
            ..BoardConfig::default()
        })
        .unwrap();

        let json = serde_json::to_string(&board).unwrap();
        let back: BoardState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
    }

    #[test]
    fn test_deserialize_rejects_duplicate_ids() {
        let json = r#"{
            "lists": [
                {"name": "A", "issues": [{"id": "item-1", "content": "x"}]},
                {"name": "B", "issues": [{"id": "item-1", "content": "y"}]}
            ]
        }"#;
        let result: std::result::Result<BoardState, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_never_lowers_counters() {
        let json = r#"{
            "lists": [{"name": "A", "issues": [{"id": "item-5", "content": "x"}]}],
            "next_issue_number": 2
        }"#;
        let board: BoardState = serde_json::from_str(json).unwrap();
        assert_eq!(board.next_issue_number(), 6);
    }
}
