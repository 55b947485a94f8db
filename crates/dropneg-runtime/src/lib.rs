#![forbid(unsafe_code)]

//! Runtime for the drop negotiation dialog.
//!
//! - [`program`]: Elm-style event loop ([`Model`], [`Cmd`], [`Program`]) and
//!   the [`Presenter`] seam frontends implement.
//! - [`simulator`]: deterministic, thread-free [`ProgramSimulator`].
//! - [`dialog`]: the [`DropDialog`] model.
//! - [`completion`]: one-shot rendezvous between the UI thread and the caller.
//! - [`chooser`]: the file-save chooser collaborator.
//! - [`session`]: [`Negotiator`], the blocking `negotiate` entry point.

pub mod chooser;
pub mod completion;
pub mod dialog;
pub mod program;
pub mod session;
pub mod simulator;

pub use chooser::{DismissingChooser, FileChooser, FixedChooser, SaveRequest, SaveTarget};
pub use completion::{CompletionError, CompletionSender, CompletionWaiter, completion};
pub use dialog::{DialogPhase, DropDialog};
pub use program::{Cmd, Headless, Messenger, Model, Presenter, Program};
pub use session::{FrontendFactory, NegotiationError, Negotiator, UI_THREAD_NAME};
pub use simulator::{CmdRecord, ProgramSimulator};
