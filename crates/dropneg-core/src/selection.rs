#![forbid(unsafe_code)]

//! Selection state machine.
//!
//! [`SelectionState`] accumulates the user's picks from independent UI
//! events, in any order, and [`SelectionState::try_confirm`] is the single
//! gate that turns them into a [`NegotiationResult`].
//!
//! # Invariants
//!
//! 1. Every mutator is last-write-wins for its own field and touches no
//!    other field.
//! 2. Toggling `drop_as_file` never clears a stored type, file type, or
//!    destination; the inactive branch is simply not consulted.
//! 3. `try_confirm` succeeds iff an action is set and either
//!    - not dropping as a file, and a type other than the file sentinel is set, or
//!    - dropping as a file, and both a file type and a destination are set.
//! 4. A successful result carries a destination iff it came from the file branch.

use crate::action::DropAction;
use crate::offer::FILE_SENTINEL;
use crate::outcome::NegotiationResult;
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a confirmation attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationBlocked {
    /// No action selected.
    NoAction,
    /// Dropping directly but no type selected.
    NoType,
    /// Dropping directly but the selected type is the file sentinel.
    FileSentinelSelected,
    /// Dropping as a file but no file type selected.
    NoFileType,
    /// Dropping as a file but no destination chosen.
    NoDestination,
}

impl fmt::Display for ConfirmationBlocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::NoAction => "choose a drop action",
            Self::NoType => "choose a data type",
            Self::FileSentinelSelected => "check \"Drop as file\" to drop a file",
            Self::NoFileType => "choose a file type",
            Self::NoDestination => "choose a destination file",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ConfirmationBlocked {}

/// The user's current choices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    drop_as_file: bool,
    selected_type: Option<String>,
    selected_file_type: Option<String>,
    destination: Option<PathBuf>,
    selected_action: Option<DropAction>,
}

impl SelectionState {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the "drop as file" toggle.
    pub fn on_toggle_drop_as_file(&mut self, drop_as_file: bool) {
        self.drop_as_file = drop_as_file;
    }

    /// Record the selected type.
    pub fn on_select_type(&mut self, id: impl Into<String>) {
        self.selected_type = Some(id.into());
    }

    /// Record the selected file type.
    pub fn on_select_file_type(&mut self, id: impl Into<String>) {
        self.selected_file_type = Some(id.into());
    }

    /// Record the selected action.
    pub fn on_select_action(&mut self, action: DropAction) {
        self.selected_action = Some(action);
    }

    /// Record the destination returned by the file chooser.
    pub fn on_file_chosen(&mut self, path: impl Into<PathBuf>) {
        self.destination = Some(path.into());
    }

    /// Build the result, or report what is missing.
    pub fn try_confirm(&self) -> Result<NegotiationResult, ConfirmationBlocked> {
        let action = self.selected_action.ok_or(ConfirmationBlocked::NoAction)?;
        if self.drop_as_file {
            let file_type = self
                .selected_file_type
                .as_ref()
                .ok_or(ConfirmationBlocked::NoFileType)?;
            let destination = self
                .destination
                .as_ref()
                .ok_or(ConfirmationBlocked::NoDestination)?;
            Ok(NegotiationResult {
                action,
                representation: file_type.clone(),
                destination: Some(destination.clone()),
            })
        } else {
            let ty = self
                .selected_type
                .as_ref()
                .ok_or(ConfirmationBlocked::NoType)?;
            if ty == FILE_SENTINEL {
                return Err(ConfirmationBlocked::FileSentinelSelected);
            }
            Ok(NegotiationResult {
                action,
                representation: ty.clone(),
                destination: None,
            })
        }
    }

    /// Whether [`try_confirm`](Self::try_confirm) would succeed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.try_confirm().is_ok()
    }

    /// Whether the file branch is active.
    #[must_use]
    pub fn drop_as_file(&self) -> bool {
        self.drop_as_file
    }

    /// Direct representation picked in the type menu.
    #[must_use]
    pub fn selected_type(&self) -> Option<&str> {
        self.selected_type.as_deref()
    }

    /// File type picked in the file-type menu.
    #[must_use]
    pub fn selected_file_type(&self) -> Option<&str> {
        self.selected_file_type.as_deref()
    }

    /// Destination returned by the file chooser.
    #[must_use]
    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    /// Action picked in the action menu.
    #[must_use]
    pub fn selected_action(&self) -> Option<DropAction> {
        self.selected_action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selection_needs_action_first() {
        let state = SelectionState::new();
        assert_eq!(state.try_confirm(), Err(ConfirmationBlocked::NoAction));
    }

    #[test]
    fn direct_drop() {
        let mut state = SelectionState::new();
        state.on_select_action(DropAction::COPY);
        assert_eq!(state.try_confirm(), Err(ConfirmationBlocked::NoType));
        state.on_select_type("text/plain");
        let result = state.try_confirm().unwrap();
        assert_eq!(result.action, DropAction::COPY);
        assert_eq!(result.representation, "text/plain");
        assert_eq!(result.destination, None);
    }

    #[test]
    fn sentinel_cannot_be_dropped_directly() {
        let mut state = SelectionState::new();
        state.on_select_action(DropAction::COPY);
        state.on_select_type(FILE_SENTINEL);
        assert_eq!(
            state.try_confirm(),
            Err(ConfirmationBlocked::FileSentinelSelected)
        );
    }

    #[test]
    fn file_drop_needs_file_type_and_destination() {
        let mut state = SelectionState::new();
        state.on_select_action(DropAction::MOVE);
        state.on_toggle_drop_as_file(true);
        assert_eq!(state.try_confirm(), Err(ConfirmationBlocked::NoFileType));
        state.on_select_file_type("image/png");
        assert_eq!(state.try_confirm(), Err(ConfirmationBlocked::NoDestination));
        state.on_file_chosen("/tmp/out.png");
        let result = state.try_confirm().unwrap();
        assert_eq!(result.representation, "image/png");
        assert_eq!(result.destination.as_deref(), Some(Path::new("/tmp/out.png")));
        assert!(result.is_file_drop());
    }

    #[test]
    fn toggle_keeps_both_branches() {
        let mut state = SelectionState::new();
        state.on_select_action(DropAction::COPY);
        state.on_select_type("text/plain");
        state.on_toggle_drop_as_file(true);
        state.on_select_file_type("image/png");
        assert_eq!(state.selected_type(), Some("text/plain"));
        assert!(!state.is_ready());

        state.on_toggle_drop_as_file(false);
        assert_eq!(state.selected_file_type(), Some("image/png"));
        assert_eq!(state.try_confirm().unwrap().representation, "text/plain");
    }

    #[test]
    fn last_write_wins() {
        let mut state = SelectionState::new();
        state.on_select_type("a");
        state.on_select_type("b");
        state.on_select_action(DropAction::COPY);
        state.on_select_action(DropAction::LINK);
        let result = state.try_confirm().unwrap();
        assert_eq!(result.representation, "b");
        assert_eq!(result.action, DropAction::LINK);
    }

    #[test]
    fn destination_ignored_for_direct_drop() {
        let mut state = SelectionState::new();
        state.on_select_action(DropAction::COPY);
        state.on_select_type("text/plain");
        state.on_file_chosen("/tmp/x");
        assert_eq!(state.try_confirm().unwrap().destination, None);
    }
}
