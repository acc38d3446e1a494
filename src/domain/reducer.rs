//! Pure board transitions.
//!
//! `apply` never touches its input: it clones the snapshot (which only bumps
//! the reference count of each list) and copies a list the first time it is
//! written to. Lists an action does not touch stay shared with the previous
//! snapshot.

use crate::{
    domain::{
        action::Action,
        board::{validate_list_name, BoardState},
        list::IssueList,
    },
    error::{BoardError, Result},
};
use std::collections::HashSet;

/// Computes the state that follows `action`.
///
/// Malformed actions fail with a descriptive error and produce no state.
pub fn apply(state: &BoardState, action: &Action) -> Result<BoardState> {
    match action {
        Action::MoveIssue {
            from,
            to,
            from_index,
            to_index,
        } => move_issue(state, from, to, *from_index, *to_index),
        Action::AddList { name, seed } => add_list(state, name.as_deref(), *seed),
        Action::AddIssue { list, template } => add_issue(state, list, template.as_deref()),
        Action::ReplaceLists { lists } => replace_lists(state, lists),
        Action::RemoveIssue { list, index } => remove_issue(state, list, *index),
    }
}

fn move_issue(
    state: &BoardState,
    from: &str,
    to: &str,
    from_index: usize,
    to_index: usize,
) -> Result<BoardState> {
    let from_pos = state.index_of(from)?;
    let to_pos = state.index_of(to)?;

    let from_len = state.list_at(from_pos).len();
    check_index(from, from_index, from_len)?;

    // Insertion bound is measured after the issue has left its source list
    let to_len_after_removal = if from_pos == to_pos {
        from_len - 1
    } else {
        state.list_at(to_pos).len()
    };
    if to_index > to_len_after_removal {
        return Err(BoardError::IndexOutOfRange {
            list: to.to_string(),
            index: to_index,
            len: to_len_after_removal,
        });
    }

    if from_pos == to_pos && from_index == to_index {
        return Ok(state.clone());
    }

    let mut next = state.clone();
    let issue = next.list_at_mut(from_pos).issues.remove(from_index);
    next.list_at_mut(to_pos).issues.insert(to_index, issue);
    Ok(next)
}

fn add_list(state: &BoardState, name: Option<&str>, seed: usize) -> Result<BoardState> {
    let mut next = state.clone();

    let name = match name {
        Some(name) => {
            validate_list_name(name)?;
            if state.list(name).is_some() {
                return Err(BoardError::DuplicateListName(name.to_string()));
            }
            name.to_string()
        }
        None => next.allocate_list_name()?,
    };

    let mut list = IssueList::new(name);
    for _ in 0..seed {
        list.issues.push(next.allocate_issue(None)?);
    }
    next.push_list(list);
    Ok(next)
}

fn add_issue(state: &BoardState, list: &str, template: Option<&str>) -> Result<BoardState> {
    let pos = state.index_of(list)?;

    let mut next = state.clone();
    let issue = next.allocate_issue(template)?;
    next.list_at_mut(pos).issues.push(issue);
    Ok(next)
}

fn replace_lists(state: &BoardState, replacements: &[IssueList]) -> Result<BoardState> {
    let mut targets = Vec::with_capacity(replacements.len());
    let mut seen = HashSet::new();
    for replacement in replacements {
        if !seen.insert(replacement.name.as_str()) {
            return Err(BoardError::DuplicateListName(replacement.name.clone()));
        }
        targets.push(state.index_of(&replacement.name)?);
    }

    // Ids held by untouched lists plus every incoming id must stay unique
    let mut ids = HashSet::new();
    for list in state.lists().filter(|list| !seen.contains(list.name.as_str())) {
        ids.extend(list.ids());
    }
    for replacement in replacements {
        for id in replacement.ids() {
            if !ids.insert(id) {
                return Err(BoardError::DuplicateIssueId(id.to_string()));
            }
        }
    }

    let mut next = state.clone();
    for (pos, replacement) in targets.into_iter().zip(replacements) {
        next.list_at_mut(pos).issues = replacement.issues.clone();
        for id in replacement.ids() {
            next.note_issue_id(id);
        }
    }
    Ok(next)
}

fn remove_issue(state: &BoardState, list: &str, index: usize) -> Result<BoardState> {
    let pos = state.index_of(list)?;
    check_index(list, index, state.list_at(pos).len())?;

    let mut next = state.clone();
    next.list_at_mut(pos).issues.remove(index);
    Ok(next)
}

fn check_index(list: &str, index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(BoardError::IndexOutOfRange {
            list: list.to_string(),
            index,
            len,
        });
    }
    Ok(())
}
