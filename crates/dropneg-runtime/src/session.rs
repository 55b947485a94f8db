#![forbid(unsafe_code)]

//! Blocking negotiation bridge.
//!
//! [`Negotiator::negotiate`] validates an offer on the calling thread, then
//! runs a [`DropDialog`] on its own UI thread and blocks until the dialog
//! closes. The two threads meet only at a one-shot completion owned by the
//! dialog, so the caller never reads dialog state before the outcome is
//! delivered and the dialog never writes after.

use crate::chooser::{DismissingChooser, FileChooser};
use crate::completion::{CompletionError, completion};
use crate::dialog::DropDialog;
use crate::program::{Presenter, Program};
use dropneg_core::{
    ActionLabeler, DialogConfig, OfferError, OfferSpec, Outcome, RawOffer, default_labeler,
};
use std::fmt;
use std::io;
use std::sync::Arc;
use std::thread;
use tracing::{info, info_span, warn};

/// Name of the thread the dialog runs on.
pub const UI_THREAD_NAME: &str = "drop-dialog";

/// Builds the frontend for one dialog.
pub type FrontendFactory = Arc<dyn Fn() -> Box<dyn Presenter<DropDialog>> + Send + Sync>;

/// Why a negotiation produced no outcome.
#[derive(Debug)]
pub enum NegotiationError {
    /// The offer failed validation; no dialog was shown.
    InvalidOffer(OfferError),
    /// The UI thread could not be started.
    Spawn(io::Error),
    /// The UI thread ended without delivering an outcome.
    UiDisconnected,
}

impl fmt::Display for NegotiationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOffer(err) => write!(f, "invalid offer: {err}"),
            Self::Spawn(err) => write!(f, "failed to start dialog thread: {err}"),
            Self::UiDisconnected => write!(f, "dialog ended without an outcome"),
        }
    }
}

impl std::error::Error for NegotiationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidOffer(err) => Some(err),
            Self::Spawn(err) => Some(err),
            Self::UiDisconnected => None,
        }
    }
}

impl From<OfferError> for NegotiationError {
    fn from(err: OfferError) -> Self {
        Self::InvalidOffer(err)
    }
}

impl NegotiationError {
    /// Returns true for [`NegotiationError::InvalidOffer`].
    #[must_use]
    pub fn is_invalid_offer(&self) -> bool {
        matches!(self, Self::InvalidOffer(_))
    }
}

/// Runs drop dialogs on behalf of synchronous callers.
///
/// A negotiator is reusable and may be shared between threads; each call
/// to [`negotiate`](Self::negotiate) gets its own dialog, thread and
/// completion.
#[derive(Clone)]
pub struct Negotiator {
    frontend: FrontendFactory,
    chooser: Arc<dyn FileChooser>,
    labeler: ActionLabeler,
    config: DialogConfig,
}

impl Negotiator {
    /// Create a negotiator whose dialogs are drawn by `frontend()`.
    pub fn new<F>(frontend: F) -> Self
    where
        F: Fn() -> Box<dyn Presenter<DropDialog>> + Send + Sync + 'static,
    {
        Self {
            frontend: Arc::new(frontend),
            chooser: Arc::new(DismissingChooser),
            labeler: default_labeler(),
            config: DialogConfig::default(),
        }
    }

    #[must_use]
    pub fn with_file_chooser(mut self, chooser: impl FileChooser + 'static) -> Self {
        self.chooser = Arc::new(chooser);
        self
    }

    /// Override how action codes are labelled in the action menu.
    #[must_use]
    pub fn with_action_labels(mut self, labeler: ActionLabeler) -> Self {
        self.labeler = labeler;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: DialogConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    /// Show a dialog for `offer` and block until the user settles it.
    ///
    /// Invalid offers are rejected before anything is shown. Otherwise this
    /// returns once the dialog closes, with [`Outcome::Accepted`] if the user
    /// confirmed and [`Outcome::Declined`] for any other way out.
    pub fn negotiate(&self, offer: &RawOffer) -> Result<Outcome, NegotiationError> {
        let _span = info_span!("dropneg.negotiate").entered();

        let spec = OfferSpec::parse(offer).inspect_err(|err| {
            warn!(error = %err, "rejecting offer");
        })?;
        info!(
            types = spec.types().len(),
            file_types = spec.file_types().len(),
            actions = spec.actions().len(),
            "offer accepted"
        );

        let (sender, waiter) = completion();
        let dialog = DropDialog::new(spec)
            .with_config(self.config.clone())
            .with_labeler(Arc::clone(&self.labeler))
            .with_chooser(Arc::clone(&self.chooser))
            .with_completion(sender);
        let frontend = Arc::clone(&self.frontend);

        // The UI thread is detached; the completion is the only join point.
        thread::Builder::new()
            .name(UI_THREAD_NAME.to_owned())
            .spawn(move || {
                let program = Program::with_presenter(dialog, frontend());
                program.run();
            })
            .map_err(NegotiationError::Spawn)?;

        match waiter.wait() {
            Ok(outcome) => {
                info!(declined = outcome.is_declined(), "negotiation finished");
                Ok(outcome)
            }
            Err(CompletionError::Abandoned | CompletionError::AlreadyTaken) => {
                warn!("dialog thread exited without an outcome");
                Err(NegotiationError::UiDisconnected)
            }
        }
    }
}

impl fmt::Debug for Negotiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Negotiator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
