#![forbid(unsafe_code)]

//! The drop dialog as a [`Model`].
//!
//! `DropDialog` owns the parsed offer and the [`SelectionState`] and handles
//! one [`DialogEvent`] at a time. Its lifecycle is
//!
//! ```text
//! Open ──(selection events)──▶ Open
//! Open ──Confirm (gate passes)──▶ Confirmed ──▶ Closed
//! Open ──Cancel / window closed──▶ Cancelled ──▶ Closed
//! ```
//!
//! A refused confirmation keeps the dialog open and sets a status line.
//! Whatever edge is taken, `on_close` resolves the [`Outcome`] and hands it
//! to the completion sender, which can fire only once.

use crate::chooser::{FileChooser, SaveRequest};
use crate::completion::CompletionSender;
use crate::program::{Cmd, Model};
use dropneg_core::{
    ActionLabeler, DialogConfig, DialogEvent, DialogView, NegotiationResult, OfferSpec, Outcome,
    SelectionState, ViewInputs, default_labeler,
};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

/// Where the dialog is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogPhase {
    /// Shown and accepting events.
    Open,
    /// The user confirmed; the result is waiting for close.
    Confirmed(NegotiationResult),
    /// The user cancelled or closed the window.
    Cancelled,
    /// Torn down; the outcome has been delivered.
    Closed,
}

/// The drop dialog.
pub struct DropDialog {
    offer: OfferSpec,
    selection: SelectionState,
    config: DialogConfig,
    labeler: ActionLabeler,
    chooser: Option<Arc<dyn FileChooser>>,
    chooser_open: bool,
    status: Option<String>,
    phase: DialogPhase,
    completion: Option<CompletionSender<Outcome>>,
    outcome: Option<Outcome>,
}

impl DropDialog {
    /// Create a dialog for an already validated offer.
    pub fn new(offer: OfferSpec) -> Self {
        Self {
            offer,
            selection: SelectionState::new(),
            config: DialogConfig::default(),
            labeler: default_labeler(),
            chooser: None,
            chooser_open: false,
            status: None,
            phase: DialogPhase::Open,
            completion: None,
            outcome: None,
        }
    }

    /// Override titles, labels and placeholders.
    #[must_use]
    pub fn with_config(mut self, config: DialogConfig) -> Self {
        self.config = config;
        self
    }

    /// Override how action codes are labelled.
    #[must_use]
    pub fn with_labeler(mut self, labeler: ActionLabeler) -> Self {
        self.labeler = labeler;
        self
    }

    /// Collaborator used for "Choose file...". Without one the button does nothing.
    #[must_use]
    pub fn with_chooser(mut self, chooser: Arc<dyn FileChooser>) -> Self {
        self.chooser = Some(chooser);
        self
    }

    /// Where to deliver the outcome when the dialog closes.
    #[must_use]
    pub fn with_completion(mut self, completion: CompletionSender<Outcome>) -> Self {
        self.completion = Some(completion);
        self
    }

    /// The validated offer being negotiated.
    pub fn offer(&self) -> &OfferSpec {
        &self.offer
    }

    /// What the user has picked so far.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> &DialogPhase {
        &self.phase
    }

    /// Feedback from the last refused confirmation.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// True while a file chooser task is outstanding.
    pub fn is_chooser_open(&self) -> bool {
        self.chooser_open
    }

    /// The outcome, once closed.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Current population of the dialog.
    pub fn view(&self) -> DialogView {
        DialogView::build(ViewInputs {
            offer: &self.offer,
            selection: &self.selection,
            config: &self.config,
            labeler: &*self.labeler,
            status: self.status.as_deref(),
            chooser_open: self.chooser_open,
        })
    }

    fn open_chooser(&mut self) -> Cmd<DialogEvent> {
        if self.chooser_open {
            debug!("file chooser already open");
            return Cmd::none();
        }
        let Some(chooser) = self.chooser.clone() else {
            debug!("no file chooser configured");
            return Cmd::none();
        };
        self.chooser_open = true;
        let request = SaveRequest {
            suggested_name: self.offer.clip_name().map(str::to_owned),
            file_type: self.selection.selected_file_type().map(str::to_owned),
        };
        // A chooser that panics must still answer, or every control stays disabled.
        Cmd::task_named("file-chooser", move || {
            match panic::catch_unwind(AssertUnwindSafe(|| chooser.choose(&request))) {
                Ok(Some(target)) => DialogEvent::FileChosen(target.path()),
                Ok(None) => DialogEvent::FileChooserDismissed,
                Err(_) => {
                    warn!("file chooser panicked; treating it as dismissed");
                    DialogEvent::FileChooserDismissed
                }
            }
        })
    }

    fn confirm(&mut self) -> Cmd<DialogEvent> {
        match self.selection.try_confirm() {
            Ok(result) => {
                debug!(action = %result.action, representation = %result.representation, "confirmed");
                self.status = None;
                self.phase = DialogPhase::Confirmed(result);
                Cmd::quit()
            }
            Err(blocked) => {
                debug!(%blocked, "confirmation blocked");
                self.status = Some(blocked.to_string());
                Cmd::none()
            }
        }
    }
}

impl Model for DropDialog {
    type Message = DialogEvent;

    fn update(&mut self, event: DialogEvent) -> Cmd<DialogEvent> {
        debug!(event = event.name(), "dialog event");
        if self.phase != DialogPhase::Open {
            return Cmd::none();
        }
        if self.chooser_open
            && !matches!(
                event,
                DialogEvent::FileChosen(_) | DialogEvent::FileChooserDismissed | DialogEvent::Cancel
            )
        {
            debug!(event = event.name(), "file chooser is open; ignoring");
            return Cmd::none();
        }
        match event {
            DialogEvent::ToggleDropAsFile(on) => {
                self.selection.on_toggle_drop_as_file(on);
                Cmd::none()
            }
            DialogEvent::SelectType(id) => {
                if self.offer.has_type(&id) {
                    self.selection.on_select_type(id);
                } else {
                    debug!(%id, "ignoring type not in offer");
                }
                Cmd::none()
            }
            DialogEvent::SelectFileType(id) => {
                if self.offer.has_file_type(&id) {
                    self.selection.on_select_file_type(id);
                } else {
                    debug!(%id, "ignoring file type not in offer");
                }
                Cmd::none()
            }
            DialogEvent::SelectAction(action) => {
                if self.offer.has_action(action) {
                    self.selection.on_select_action(action);
                } else {
                    debug!(%action, "ignoring action not in offer");
                }
                Cmd::none()
            }
            DialogEvent::OpenFileChooser => self.open_chooser(),
            DialogEvent::FileChosen(path) => {
                self.chooser_open = false;
                let line = format!("drop destination: {}", path.display());
                self.selection.on_file_chosen(path);
                Cmd::log(line)
            }
            DialogEvent::FileChooserDismissed => {
                self.chooser_open = false;
                Cmd::none()
            }
            DialogEvent::Confirm => self.confirm(),
            DialogEvent::Cancel => {
                self.phase = DialogPhase::Cancelled;
                Cmd::quit()
            }
        }
    }

    fn on_close(&mut self) {
        if self.phase == DialogPhase::Closed {
            return;
        }
        let outcome = match std::mem::replace(&mut self.phase, DialogPhase::Closed) {
            DialogPhase::Confirmed(result) => Outcome::Accepted(result),
            DialogPhase::Open | DialogPhase::Cancelled | DialogPhase::Closed => Outcome::Declined,
        };
        debug!(?outcome, "dialog closed");
        if let Some(completion) = self.completion.take() {
            completion.complete(outcome.clone());
        }
        self.outcome = Some(outcome);
    }
}
