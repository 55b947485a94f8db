#![forbid(unsafe_code)]

//! Terminal session lifecycle and the crossterm frontend.
//!
//! [`TerminalSession`] puts the terminal into raw mode on the alternate
//! screen and restores it on drop, including on panic. [`TerminalFrontend`]
//! is the [`Presenter`] the demo hands to the negotiator: frames are sent to
//! a worker thread that owns the terminal, draws, and turns key presses into
//! dialog events.

use std::io::{self, Write};
use std::sync::OnceLock;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event};
use dropneg_core::{DialogEvent, DialogView};
use dropneg_runtime::{DropDialog, Messenger, Presenter};
use tracing::{debug, info, warn};

use crate::navigation::{Focus, Reaction};
use crate::render;

const INPUT_POLL: Duration = Duration::from_millis(30);

/// Raw mode + alternate screen, undone on drop.
#[derive(Debug)]
pub struct TerminalSession {
    alternate_screen_enabled: bool,
}

impl TerminalSession {
    /// Enter raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be enabled.
    pub fn new() -> io::Result<Self> {
        install_panic_hook();

        crossterm::terminal::enable_raw_mode()?;
        info!("terminal raw mode enabled");
        let mut session = Self {
            alternate_screen_enabled: false,
        };

        let mut stdout = io::stdout();
        crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
        session.alternate_screen_enabled = true;
        crossterm::execute!(stdout, crossterm::cursor::Hide)?;
        Ok(session)
    }

    fn cleanup(&mut self) {
        let mut stdout = io::stdout();
        let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
        if self.alternate_screen_enabled {
            let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
        }
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = stdout.flush();
        info!("terminal restored");
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
    let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

/// Draws the dialog in the terminal and reads the keyboard.
#[derive(Default)]
pub struct TerminalFrontend {
    frames: Option<Sender<DialogView>>,
    worker: Option<JoinHandle<io::Result<()>>>,
}

impl TerminalFrontend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presenter<DropDialog> for TerminalFrontend {
    fn attach(&mut self, messenger: Messenger<DialogEvent>) -> io::Result<()> {
        let session = TerminalSession::new()?;
        let (frames, rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("drop-dialog-tty".into())
            .spawn(move || {
                let result = run_terminal(&session, &rx, &messenger);
                if let Err(err) = &result {
                    warn!(error = %err, "terminal worker failed; closing dialog");
                    messenger.post(DialogEvent::Cancel);
                }
                drop(session);
                result
            })?;
        self.frames = Some(frames);
        self.worker = Some(worker);
        Ok(())
    }

    fn present(&mut self, model: &DropDialog) -> io::Result<()> {
        let frames = self
            .frames
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "frontend not attached"))?;
        frames
            .send(model.view())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "terminal worker stopped"))
    }

    fn detach(&mut self) {
        self.frames = None;
        if let Some(worker) = self.worker.take() {
            match worker.join() {
                Ok(Ok(())) => debug!("terminal worker finished"),
                Ok(Err(err)) => warn!(error = %err, "terminal worker ended with an error"),
                Err(_) => warn!("terminal worker panicked"),
            }
        }
    }
}

/// Worker loop: redraw on every frame, forward key presses, stop when the
/// frame channel closes.
fn run_terminal(
    _session: &TerminalSession,
    frames: &Receiver<DialogView>,
    messenger: &Messenger<DialogEvent>,
) -> io::Result<()> {
    let mut stdout = io::stdout();
    let mut focus = Focus::default();
    let mut view: Option<DialogView> = None;

    loop {
        match frames.recv_timeout(INPUT_POLL) {
            Ok(mut latest) => {
                while let Ok(newer) = frames.try_recv() {
                    latest = newer;
                }
                focus.settle(&latest);
                render::draw(&mut stdout, &render::layout(&latest, focus))?;
                view = Some(latest);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }

        if !event::poll(Duration::ZERO)? {
            continue;
        }
        let Some(current) = view.as_ref() else {
            let _ = event::read()?;
            continue;
        };
        match event::read()? {
            Event::Key(key) => match focus.handle_key(current, key) {
                Reaction::Post(dialog_event) => {
                    debug!(event = dialog_event.name(), "key press");
                    messenger.post(dialog_event);
                }
                Reaction::Redraw => render::draw(&mut stdout, &render::layout(current, focus))?,
                Reaction::Ignore => {}
            },
            Event::Resize(..) => render::draw(&mut stdout, &render::layout(current, focus))?,
            _ => {}
        }
    }
}
