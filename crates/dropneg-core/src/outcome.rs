#![forbid(unsafe_code)]

//! Results of a negotiation.

use crate::action::DropAction;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The representation and action the user settled on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationResult {
    /// Chosen action.
    pub action: DropAction,
    /// Chosen type identifier, from the offer's types or file types.
    pub representation: String,
    /// Save destination. Present only for the file branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
}

impl NegotiationResult {
    /// Whether the result asks for the data to be delivered as a file.
    #[must_use]
    pub fn is_file_drop(&self) -> bool {
        self.destination.is_some()
    }
}

/// How a shown dialog ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The user confirmed a complete selection.
    Accepted(NegotiationResult),
    /// The user cancelled or closed the dialog.
    Declined,
}

impl Outcome {
    /// The accepted result, if any.
    #[must_use]
    pub fn accepted(self) -> Option<NegotiationResult> {
        match self {
            Self::Accepted(result) => Some(result),
            Self::Declined => None,
        }
    }

    /// Returns true for [`Outcome::Declined`].
    #[must_use]
    pub fn is_declined(&self) -> bool {
        matches!(self, Self::Declined)
    }
}
