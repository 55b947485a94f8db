#![forbid(unsafe_code)]

//! Events delivered to the drop dialog.
//!
//! Every control in the dialog is pre-bound to one of these; frontends never
//! invent identifiers of their own, they post the event attached to the
//! control the user activated.

use crate::action::DropAction;
use std::path::PathBuf;

/// A single UI event for the drop dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    /// The "Drop as file" checkbox changed.
    ToggleDropAsFile(bool),
    /// A data type was picked from the type menu.
    SelectType(String),
    /// A file type was picked from the file-type menu.
    SelectFileType(String),
    /// An action was picked from the action menu.
    SelectAction(DropAction),
    /// The "Choose file..." button was pressed.
    OpenFileChooser,
    /// The file chooser returned a destination.
    FileChosen(PathBuf),
    /// The file chooser was dismissed without a choice.
    FileChooserDismissed,
    /// The Drop button was pressed.
    Confirm,
    /// The Cancel button was pressed, or the window was closed.
    Cancel,
}

impl DialogEvent {
    /// Stable name for tracing.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ToggleDropAsFile(_) => "ToggleDropAsFile",
            Self::SelectType(_) => "SelectType",
            Self::SelectFileType(_) => "SelectFileType",
            Self::SelectAction(_) => "SelectAction",
            Self::OpenFileChooser => "OpenFileChooser",
            Self::FileChosen(_) => "FileChosen",
            Self::FileChooserDismissed => "FileChooserDismissed",
            Self::Confirm => "Confirm",
            Self::Cancel => "Cancel",
        }
    }
}
