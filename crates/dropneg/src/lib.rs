#![forbid(unsafe_code)]

//! Drag-and-drop negotiation dialog: public facade.
//!
//! Re-exports the offer model and selection state machine from
//! `dropneg-core` and, with the `runtime` feature, the dialog runtime and
//! the blocking [`Negotiator`].

// --- Core re-exports -------------------------------------------------------

pub use dropneg_core::{
    ActionLabeler, ConfirmationBlocked, DialogConfig, DialogEvent, DialogView, DropAction,
    FILE_SENTINEL, FieldKind, FieldValue, MissingReason, NegotiationResult, OfferDiagnostic,
    OfferError, OfferSpec, Outcome, RawOffer, SelectionState, action_label, default_labeler,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use dropneg_runtime::{
    Cmd, DismissingChooser, DropDialog, FileChooser, FixedChooser, Messenger, Model,
    NegotiationError, Negotiator, Presenter, Program, ProgramSimulator, SaveRequest, SaveTarget,
};

/// Result of a negotiation.
#[cfg(feature = "runtime")]
pub type Result<T> = std::result::Result<T, NegotiationError>;

/// Decode a JSON offer and negotiate it.
///
/// Malformed JSON is reported as [`NegotiationError::InvalidOffer`], the same
/// as a well-formed offer that fails validation.
#[cfg(feature = "runtime")]
pub fn negotiate_json(negotiator: &Negotiator, json: &str) -> Result<Outcome> {
    let offer = RawOffer::from_json(json)?;
    negotiator.negotiate(&offer)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DialogEvent, DropAction, NegotiationResult, OfferError, OfferSpec, Outcome, RawOffer,
        SelectionState,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{FileChooser, NegotiationError, Negotiator, Presenter, Result};
}
