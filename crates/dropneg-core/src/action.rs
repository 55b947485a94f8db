#![forbid(unsafe_code)]

//! Drop action codes and their display labels.
//!
//! An action is the semantic effect of a drop (copy, move, link, trash). On
//! the wire it is a plain `i32`; the well-known values are four-char codes.
//! Labels are produced by an injected [`ActionLabeler`] so that the mapping
//! stays explicit and testable instead of living in a process-wide table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

const fn four_cc(code: &[u8; 4]) -> i32 {
    i32::from_be_bytes(*code)
}

/// A drop action code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DropAction(pub i32);

impl DropAction {
    /// Copy the dragged data to the target (`'DDCP'`).
    pub const COPY: Self = Self(four_cc(b"DDCP"));
    /// Move the dragged data to the target (`'DDMV'`).
    pub const MOVE: Self = Self(four_cc(b"DDMV"));
    /// Create a link to the dragged data at the target (`'DDLN'`).
    pub const LINK: Self = Self(four_cc(b"DDLN"));
    /// Dispose of the dragged data (`'DDTR'`).
    pub const TRASH: Self = Self(four_cc(b"DDTR"));

    /// Raw code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> i32 {
        self.0
    }

    /// Returns the four-char rendering of the code if every byte is printable ASCII.
    #[must_use]
    pub fn four_char_code(self) -> Option<String> {
        let bytes = self.0.to_be_bytes();
        if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            Some(bytes.iter().map(|&b| b as char).collect())
        } else {
            None
        }
    }
}

impl From<i32> for DropAction {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl fmt::Display for DropAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.four_char_code() {
            Some(cc) => write!(f, "'{cc}'"),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Maps an action code to the label shown in the action menu.
///
/// Must be pure: the dialog may call it any number of times per code.
pub type ActionLabeler = Arc<dyn Fn(DropAction) -> String + Send + Sync>;

/// Default labels for the well-known actions.
///
/// Unknown codes are shown as their four-char code when printable, otherwise
/// as a decimal number.
#[must_use]
pub fn action_label(action: DropAction) -> String {
    match action {
        DropAction::COPY => "Copy".to_string(),
        DropAction::MOVE => "Move".to_string(),
        DropAction::LINK => "Link".to_string(),
        DropAction::TRASH => "Trash".to_string(),
        other => other.to_string(),
    }
}

/// The default labeler, wrapping [`action_label`].
#[must_use]
pub fn default_labeler() -> ActionLabeler {
    Arc::new(action_label)
}
