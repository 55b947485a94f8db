#![forbid(unsafe_code)]

//! Elm-style event loop for dialogs.
//!
//! A [`Program`] owns a [`Model`] on the thread that calls
//! [`Program::run`] and feeds it one message at a time, each handled to
//! completion before the next is received. Side effects are requested by
//! returning a [`Cmd`] from `update`.
//!
//! Messages come in through [`Messenger`] handles: the presenter gets one in
//! [`Presenter::attach`] to forward user input, and background tasks post
//! their answer through another.
//!
//! # Example
//!
//! ```ignore
//! use dropneg_runtime::program::{Cmd, Model, Program};
//!
//! struct Counter { count: i32 }
//!
//! enum Msg { Increment, Quit }
//!
//! impl Model for Counter {
//!     type Message = Msg;
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Increment => { self.count += 1; Cmd::none() }
//!             Msg::Quit => Cmd::quit(),
//!         }
//!     }
//! }
//!
//! let program = Program::new(Counter { count: 0 });
//! let messenger = program.messenger();
//! messenger.post(Msg::Increment);
//! messenger.post(Msg::Quit);
//! let model = program.run();
//! assert_eq!(model.count, 1);
//! ```

use std::fmt;
use std::io;
use std::sync::mpsc;
use std::thread;
use tracing::{debug, info, info_span, warn};

/// Application state and behavior driven by a [`Program`].
pub trait Model: Sized {
    /// Messages that update the model.
    type Message: Send + 'static;

    /// Called once before the first message. Return startup commands.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Handle one message.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Called exactly once when the loop ends, however it ends.
    fn on_close(&mut self) {}
}

/// A side effect requested by [`Model::update`].
#[derive(Default)]
pub enum Cmd<M> {
    /// No operation.
    #[default]
    None,
    /// Stop the loop.
    Quit,
    /// Execute commands in order, stopping after a `Quit`.
    Batch(Vec<Cmd<M>>),
    /// Send a message to the model.
    Msg(M),
    /// Run a blocking closure on a background thread; its return value is
    /// posted back as a message. Runs inline if no thread can be started.
    Task(Option<String>, Box<dyn FnOnce() -> M + Send>),
    /// Write a line to the log.
    Log(String),
}

impl<M: fmt::Debug> fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Quit => write!(f, "Quit"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Self::Task(name, _) => f.debug_struct("Task").field("name", name).finish(),
            Self::Log(s) => f.debug_tuple("Log").field(s).finish(),
        }
    }
}

impl<M> Cmd<M> {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a quit command.
    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    /// Create a message command.
    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Create a log command.
    #[inline]
    pub fn log(msg: impl Into<String>) -> Self {
        Self::Log(msg.into())
    }

    /// Create a batch of commands.
    pub fn batch(cmds: Vec<Self>) -> Self {
        if cmds.len() > 1 {
            return Self::Batch(cmds);
        }
        cmds.into_iter().next().unwrap_or(Self::None)
    }

    /// Create a background task command.
    pub fn task<F>(f: F) -> Self
    where
        F: FnOnce() -> M + Send + 'static,
    {
        Self::Task(None, Box::new(f))
    }

    /// Create a named background task command. The name shows up in logs.
    pub fn task_named<F>(name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce() -> M + Send + 'static,
    {
        Self::Task(Some(name.into()), Box::new(f))
    }

    /// Return a stable name for tracing.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Quit => "Quit",
            Self::Batch(_) => "Batch",
            Self::Msg(_) => "Msg",
            Self::Task(..) => "Task",
            Self::Log(_) => "Log",
        }
    }
}

/// Handle for posting messages into a running [`Program`].
pub struct Messenger<M> {
    sender: mpsc::Sender<M>,
}

impl<M> Clone for Messenger<M> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<M> fmt::Debug for Messenger<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Messenger").finish_non_exhaustive()
    }
}

impl<M> Messenger<M> {
    /// Queue a message. Returns `false` if the program has already ended.
    pub fn post(&self, msg: M) -> bool {
        self.sender.send(msg).is_ok()
    }
}

/// Draws a model and feeds user input back into the program.
///
/// All methods run on the program's thread.
pub trait Presenter<M: Model>: Send {
    /// Called once before the first frame.
    fn attach(&mut self, messenger: Messenger<M::Message>) -> io::Result<()> {
        let _ = messenger;
        Ok(())
    }

    /// Draw the current state. Called after init and after every update
    /// while the program is running.
    fn present(&mut self, model: &M) -> io::Result<()>;

    /// Called once after the loop ends.
    fn detach(&mut self) {}
}

/// Presenter that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl<M: Model> Presenter<M> for Headless {
    fn present(&mut self, _model: &M) -> io::Result<()> {
        Ok(())
    }
}

/// The event loop.
pub struct Program<M: Model> {
    model: M,
    presenter: Box<dyn Presenter<M>>,
    sender: mpsc::Sender<M::Message>,
    receiver: mpsc::Receiver<M::Message>,
    running: bool,
    tasks: Vec<thread::JoinHandle<()>>,
}

impl<M: Model> Program<M> {
    /// Create a headless program.
    pub fn new(model: M) -> Self {
        Self::with_presenter(model, Box::new(Headless))
    }

    /// Create a program that draws through `presenter`.
    pub fn with_presenter(model: M, presenter: Box<dyn Presenter<M>>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            model,
            presenter,
            sender,
            receiver,
            running: true,
            tasks: Vec::new(),
        }
    }

    /// A handle for posting messages, usable from any thread.
    pub fn messenger(&self) -> Messenger<M::Message> {
        Messenger {
            sender: self.sender.clone(),
        }
    }

    /// Run until the model quits, then return it.
    ///
    /// `Model::on_close` runs exactly once before this returns. Messages
    /// still queued after the quit are dropped.
    pub fn run(mut self) -> M {
        let _span = info_span!("dropneg.program.run").entered();

        if let Err(err) = self.presenter.attach(self.messenger()) {
            warn!(error = %err, "presenter failed to attach; closing");
            self.running = false;
        }

        if self.running {
            let cmd = self.model.init();
            self.execute_cmd(cmd);
            self.present();
        }

        while self.running {
            let Ok(msg) = self.receiver.recv() else {
                break;
            };
            let cmd = self.model.update(msg);
            self.execute_cmd(cmd);
            if self.running {
                self.present();
            }
        }

        self.model.on_close();
        self.presenter.detach();
        self.reap_tasks();
        info!("program closed");
        self.model
    }

    fn present(&mut self) {
        if let Err(err) = self.presenter.present(&self.model) {
            warn!(error = %err, "present failed; closing");
            self.running = false;
        }
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => self.running = false,
            Cmd::Msg(m) => {
                let cmd = self.model.update(m);
                self.execute_cmd(cmd);
            }
            Cmd::Batch(cmds) => {
                for c in cmds {
                    self.execute_cmd(c);
                    if !self.running {
                        break;
                    }
                }
            }
            Cmd::Task(name, f) => {
                // The closure is handed over only once the thread exists, so a
                // failed spawn can still run it and no answer is lost.
                let sender = self.sender.clone();
                let (handoff, pickup) = mpsc::channel::<Box<dyn FnOnce() -> M::Message + Send>>();
                let mut builder = thread::Builder::new();
                if let Some(name) = &name {
                    builder = builder.name(name.clone());
                }
                match builder.spawn(move || {
                    if let Ok(f) = pickup.recv() {
                        let _ = sender.send(f());
                    }
                }) {
                    Ok(handle) => {
                        let _ = handoff.send(f);
                        self.tasks.push(handle);
                    }
                    Err(err) => {
                        warn!(task = ?name, error = %err, "failed to spawn task; running inline");
                        let cmd = self.model.update(f());
                        self.execute_cmd(cmd);
                    }
                }
            }
            Cmd::Log(text) => info!(target: "dropneg::program", "{}", text.trim_end()),
        }
    }

    /// Join tasks that already finished; the rest are left detached.
    fn reap_tasks(&mut self) {
        for handle in self.tasks.drain(..) {
            if handle.is_finished() {
                if handle.join().is_err() {
                    warn!("background task panicked");
                }
            } else {
                debug!("leaving unfinished task detached");
            }
        }
    }
}
