#![forbid(unsafe_code)]

//! Scripted frontend.
//!
//! A [`ScriptedFrontend`] plays a [`Script`] against a live dialog: on every
//! frame it looks at the freshly built [`DialogView`] and performs the next
//! step, the way a user clicking through the dialog would. At most one event
//! is posted per frame, so each [`Step::Pick`] sees the view produced by the
//! previous one.
//!
//! When the script runs out while the dialog is still open, the frontend
//! closes the window, so a script that never confirms ends in a decline
//! instead of blocking the caller forever.

use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dropneg_core::{Control, DialogEvent, DialogView};
use dropneg_runtime::{DropDialog, Messenger, Negotiator, Presenter};
use tracing::debug;

type ViewPredicate = Arc<dyn Fn(&DialogView) -> bool + Send + Sync>;

/// One user action.
#[derive(Clone)]
pub enum Step {
    /// Post an event directly.
    Send(DialogEvent),
    /// Activate the first enabled control, menu item, or button with this label.
    Pick(String),
    /// Wait for a frame satisfying the predicate.
    Await(ViewPredicate),
    /// Close the window.
    Close,
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send(event) => f.debug_tuple("Send").field(event).finish(),
            Self::Pick(label) => f.debug_tuple("Pick").field(label).finish(),
            Self::Await(_) => f.write_str("Await(..)"),
            Self::Close => f.write_str("Close"),
        }
    }
}

/// An ordered list of steps.
#[derive(Debug, Clone, Default)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    #[must_use]
    pub fn send(self, event: DialogEvent) -> Self {
        self.step(Step::Send(event))
    }

    #[must_use]
    pub fn pick(self, label: impl Into<String>) -> Self {
        self.step(Step::Pick(label.into()))
    }

    #[must_use]
    pub fn wait_until<F>(self, predicate: F) -> Self
    where
        F: Fn(&DialogView) -> bool + Send + Sync + 'static,
    {
        self.step(Step::Await(Arc::new(predicate)))
    }

    #[must_use]
    pub fn close(self) -> Self {
        self.step(Step::Close)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[derive(Debug, Default)]
struct Record {
    frontends: usize,
    views: Vec<DialogView>,
    posted: Vec<DialogEvent>,
    failures: Vec<String>,
    detached: usize,
}

/// What scripted frontends observed, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    inner: Arc<Mutex<Record>>,
}

impl Transcript {
    fn lock(&self) -> MutexGuard<'_, Record> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of frontends created so far.
    pub fn frontends(&self) -> usize {
        self.lock().frontends
    }

    /// Every frame presented, in order.
    pub fn views(&self) -> Vec<DialogView> {
        self.lock().views.clone()
    }

    pub fn last_view(&self) -> Option<DialogView> {
        self.lock().views.last().cloned()
    }

    /// Events posted by the scripts, in order.
    pub fn posted(&self) -> Vec<DialogEvent> {
        self.lock().posted.clone()
    }

    /// Steps that could not be performed.
    pub fn failures(&self) -> Vec<String> {
        self.lock().failures.clone()
    }

    /// Number of frontends that were detached.
    pub fn detached(&self) -> usize {
        self.lock().detached
    }
}

/// Find the event bound to the first enabled control labelled `label`.
///
/// Menu items are matched inside enabled menus only, in tab order.
pub fn find_control(view: &DialogView, label: &str) -> Option<DialogEvent> {
    view.controls().into_iter().find_map(|control| match control {
        Control::Menu(menu) if menu.enabled => menu.item(label).map(|item| item.event.clone()),
        Control::Checkbox(checkbox) if checkbox.enabled && checkbox.label == label => {
            Some(checkbox.toggle_event())
        }
        Control::Button(button) if button.enabled && button.label == label => {
            Some(button.event.clone())
        }
        _ => None,
    })
}

/// A [`Presenter`] that plays a [`Script`].
pub struct ScriptedFrontend {
    steps: std::vec::IntoIter<Step>,
    messenger: Option<Messenger<DialogEvent>>,
    transcript: Transcript,
    exhausted: bool,
}

impl ScriptedFrontend {
    pub fn new(script: Script, transcript: Transcript) -> Self {
        transcript.lock().frontends += 1;
        Self {
            steps: script.steps.into_iter(),
            messenger: None,
            transcript,
            exhausted: false,
        }
    }

    fn post(&mut self, event: DialogEvent) {
        debug!(event = event.name(), "script posts");
        if let Some(messenger) = &self.messenger {
            messenger.post(event.clone());
        }
        self.transcript.lock().posted.push(event);
    }

    fn pump(&mut self, view: &DialogView) -> io::Result<()> {
        loop {
            let Some(step) = self.steps.as_slice().first().cloned() else {
                if !self.exhausted {
                    self.exhausted = true;
                    debug!("script exhausted; closing window");
                    self.post(DialogEvent::Cancel);
                }
                return Ok(());
            };
            match step {
                Step::Await(predicate) => {
                    if !predicate(view) {
                        return Ok(());
                    }
                    self.steps.next();
                }
                Step::Send(event) => {
                    self.steps.next();
                    self.post(event);
                    return Ok(());
                }
                Step::Pick(label) => {
                    self.steps.next();
                    let Some(event) = find_control(view, &label) else {
                        let failure = format!("no enabled control labelled {label:?}");
                        self.transcript.lock().failures.push(failure.clone());
                        return Err(io::Error::new(io::ErrorKind::NotFound, failure));
                    };
                    self.post(event);
                    return Ok(());
                }
                Step::Close => {
                    self.steps.next();
                    self.exhausted = true;
                    self.post(DialogEvent::Cancel);
                    return Ok(());
                }
            }
        }
    }
}

impl Presenter<DropDialog> for ScriptedFrontend {
    fn attach(&mut self, messenger: Messenger<DialogEvent>) -> io::Result<()> {
        self.messenger = Some(messenger);
        Ok(())
    }

    fn present(&mut self, model: &DropDialog) -> io::Result<()> {
        let view = model.view();
        self.transcript.lock().views.push(view.clone());
        self.pump(&view)
    }

    fn detach(&mut self) {
        self.messenger = None;
        self.transcript.lock().detached += 1;
    }
}

/// A negotiator whose every dialog is driven by a fresh copy of `script`.
pub fn scripted_negotiator(script: Script) -> (Negotiator, Transcript) {
    let transcript = Transcript::default();
    let shared = transcript.clone();
    let negotiator = Negotiator::new(move || {
        Box::new(ScriptedFrontend::new(script.clone(), shared.clone()))
    });
    (negotiator, transcript)
}
