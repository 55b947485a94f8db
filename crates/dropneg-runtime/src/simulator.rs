#![forbid(unsafe_code)]

//! Deterministic program simulator for testing.
//!
//! `ProgramSimulator` runs a [`Model`] without threads or a presenter.
//! Messages are dispatched synchronously and background tasks run inline,
//! so a test observes exactly the state a real program would reach once all
//! task answers have arrived.
//!
//! # Example
//!
//! ```ignore
//! use dropneg_runtime::simulator::ProgramSimulator;
//!
//! let mut sim = ProgramSimulator::new(dialog);
//! sim.init();
//! sim.send(DialogEvent::SelectAction(DropAction::COPY));
//! assert!(sim.is_running());
//! ```

use crate::program::{Cmd, Model};

/// Record of a command that was executed during simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdRecord {
    /// No-op command.
    None,
    /// Quit command.
    Quit,
    /// Message sent to model.
    Msg,
    /// Batch of commands.
    Batch(usize),
    /// Background task executed synchronously.
    Task(Option<String>),
    /// Log message emitted.
    Log(String),
}

/// Deterministic simulator for [`Model`] testing.
pub struct ProgramSimulator<M: Model> {
    model: M,
    command_log: Vec<CmdRecord>,
    logs: Vec<String>,
    running: bool,
    closed: bool,
}

impl<M: Model> ProgramSimulator<M> {
    /// Create a new simulator with the given model.
    ///
    /// The model is not initialized until [`init`](Self::init) is called.
    pub fn new(model: M) -> Self {
        Self {
            model,
            command_log: Vec::new(),
            logs: Vec::new(),
            running: true,
            closed: false,
        }
    }

    /// Initialize the model by calling `Model::init()` and executing returned commands.
    pub fn init(&mut self) {
        let cmd = self.model.init();
        self.execute_cmd(cmd);
        self.finish_if_stopped();
    }

    /// Send a message to the model. Ignored once the program has stopped.
    pub fn send(&mut self, msg: M::Message) {
        if !self.running {
            return;
        }
        let cmd = self.model.update(msg);
        self.execute_cmd(cmd);
        self.finish_if_stopped();
    }

    /// Send several messages in order.
    pub fn send_all(&mut self, msgs: impl IntoIterator<Item = M::Message>) {
        for msg in msgs {
            self.send(msg);
        }
    }

    /// Close the program from outside, as a window manager would.
    pub fn close(&mut self) {
        self.running = false;
        self.finish_if_stopped();
    }

    /// Get a reference to the model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the model.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Consume the simulator and return the model.
    pub fn into_model(self) -> M {
        self.model
    }

    /// Returns `false` after a `Cmd::Quit` or [`close`](Self::close).
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Get all log messages emitted via `Cmd::Log`.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// Get the command execution log.
    pub fn command_log(&self) -> &[CmdRecord] {
        &self.command_log
    }

    fn finish_if_stopped(&mut self) {
        if !self.running && !self.closed {
            self.closed = true;
            self.model.on_close();
        }
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {
                self.command_log.push(CmdRecord::None);
            }
            Cmd::Quit => {
                self.running = false;
                self.command_log.push(CmdRecord::Quit);
            }
            Cmd::Msg(m) => {
                self.command_log.push(CmdRecord::Msg);
                let cmd = self.model.update(m);
                self.execute_cmd(cmd);
            }
            Cmd::Batch(cmds) => {
                self.command_log.push(CmdRecord::Batch(cmds.len()));
                for c in cmds {
                    self.execute_cmd(c);
                    if !self.running {
                        break;
                    }
                }
            }
            Cmd::Task(name, f) => {
                self.command_log.push(CmdRecord::Task(name));
                let msg = f();
                if self.running {
                    let cmd = self.model.update(msg);
                    self.execute_cmd(cmd);
                }
            }
            Cmd::Log(text) => {
                self.command_log.push(CmdRecord::Log(text.clone()));
                self.logs.push(text);
            }
        }
    }
}
