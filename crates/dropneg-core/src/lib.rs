#![forbid(unsafe_code)]

//! Core: drag offers, action codes, the selection state machine, and the
//! toolkit-neutral population of the drop dialog.
//!
//! Nothing here spawns threads or blocks. The runtime crate drives these
//! types from a UI event loop.

pub mod action;
pub mod config;
pub mod event;
pub mod offer;
pub mod outcome;
pub mod selection;
pub mod view;

pub use action::{ActionLabeler, DropAction, action_label, default_labeler};
pub use config::DialogConfig;
pub use event::DialogEvent;
pub use offer::{
    FILE_SENTINEL, FieldKind, FieldValue, MissingReason, OfferDiagnostic, OfferError, OfferSpec,
    RawOffer,
};
pub use outcome::{NegotiationResult, Outcome};
pub use selection::{ConfirmationBlocked, SelectionState};
pub use view::{Button, Checkbox, Control, DialogView, MenuField, MenuItem, ViewInputs};
