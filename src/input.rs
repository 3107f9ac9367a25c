//! Line-oriented terminal input.
//!
//! rustyline's editor blocks its thread while it waits for a key press, so the
//! [`RustylineReader`] keeps the editor on a dedicated thread and hands each
//! result back over a oneshot channel.  The session task therefore suspends at
//! the prompt instead of blocking the runtime.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::thread;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::oneshot;

use crate::error::{Error, Result};

/// What happened at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A line was entered; it is trimmed.
    Line(String),

    /// The user pressed Ctrl-C.
    Interrupted,

    /// Input ended (Ctrl-D or closed stdin).
    Closed,
}

/// A source of input lines.
#[async_trait::async_trait]
pub trait LineReader: Send {
    /// Wait for the next line, showing `prompt`.
    async fn read_line(&mut self, prompt: &str) -> Result<InputEvent>;
}

struct ReadRequest {
    prompt: String,
    reply: oneshot::Sender<Result<InputEvent>>,
}

/// Interactive reader backed by rustyline, with in-memory history.
pub struct RustylineReader {
    requests: mpsc::Sender<ReadRequest>,
}

impl RustylineReader {
    /// Start the editor thread.
    ///
    /// Fails if the terminal cannot be initialised.
    pub fn new() -> Result<Self> {
        let (requests, inbox) = mpsc::channel::<ReadRequest>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();

        thread::Builder::new()
            .name("line-editor".to_string())
            .spawn(move || {
                let mut editor = match DefaultEditor::new() {
                    Ok(editor) => {
                        let _ = ready_tx.send(Ok(()));
                        editor
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(Error::input(format!(
                            "failed to initialise line editor: {err}"
                        ))));
                        return;
                    }
                };
                while let Ok(request) = inbox.recv() {
                    let event = match editor.readline(&request.prompt) {
                        Ok(line) => {
                            let line = line.trim().to_string();
                            if !line.is_empty() {
                                let _ = editor.add_history_entry(line.as_str());
                            }
                            Ok(InputEvent::Line(line))
                        }
                        Err(ReadlineError::Interrupted) => Ok(InputEvent::Interrupted),
                        Err(ReadlineError::Eof) => Ok(InputEvent::Closed),
                        Err(err) => Err(Error::input(err.to_string())),
                    };
                    if request.reply.send(event).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| Error::io("failed to spawn line editor thread", e))?;

        ready_rx
            .recv()
            .map_err(|_| Error::input("line editor thread exited during start-up"))??;
        Ok(Self { requests })
    }
}

#[async_trait::async_trait]
impl LineReader for RustylineReader {
    async fn read_line(&mut self, prompt: &str) -> Result<InputEvent> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(ReadRequest {
                prompt: prompt.to_string(),
                reply,
            })
            .map_err(|_| Error::input("line editor thread has stopped"))?;
        response
            .await
            .map_err(|_| Error::input("line editor thread has stopped"))?
    }
}

/// Reader that replays a fixed script, then reports [`InputEvent::Closed`].
///
/// Lines are trimmed exactly as interactive input would be.
#[derive(Debug, Default, Clone)]
pub struct ScriptedReader {
    script: VecDeque<InputEvent>,
    prompts: usize,
}

impl ScriptedReader {
    /// Script consisting only of lines.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_events(
            lines
                .into_iter()
                .map(|line| InputEvent::Line(line.into().trim().to_string())),
        )
    }

    /// Script of arbitrary events, e.g. to simulate Ctrl-C.
    pub fn from_events<I: IntoIterator<Item = InputEvent>>(events: I) -> Self {
        Self {
            script: events.into_iter().collect(),
            prompts: 0,
        }
    }

    /// How many times a line was requested.
    pub fn prompts(&self) -> usize {
        self.prompts
    }

    /// Events not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

#[async_trait::async_trait]
impl LineReader for ScriptedReader {
    async fn read_line(&mut self, _prompt: &str) -> Result<InputEvent> {
        self.prompts += 1;
        Ok(self.script.pop_front().unwrap_or(InputEvent::Closed))
    }
}
