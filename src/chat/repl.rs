//! The interactive read/dispatch loop.
//!
//! A [`SessionLoop`] ties together one [`ChatSession`], one [`CommandRouter`],
//! a [`LineReader`] and a [`Renderer`].  It has exactly two suspension points:
//! waiting for input and waiting for the backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::backend::ChatBackend;
use crate::chat::commands::COMMAND_MARKER;
use crate::chat::router::{CommandRouter, GOODBYE, Outcome};
use crate::chat::session::ChatSession;
use crate::error::Result;
use crate::input::{InputEvent, LineReader};
use crate::observability::SESSION_ERRORS;
use crate::render::Renderer;

/// Prompt shown when none is configured.
pub const DEFAULT_PROMPT: &str = "> ";

/// Reader failures in a row after which the session gives up.
pub const MAX_CONSECUTIVE_INPUT_ERRORS: u32 = 5;

/// Whether the loop should keep going.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// True until an exit command, an interrupt, or end of input.
    pub running: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { running: true }
    }
}

/// One interactive session.
pub struct SessionLoop<B: ChatBackend> {
    session: ChatSession<B>,
    router: CommandRouter,
    reader: Box<dyn LineReader>,
    renderer: Box<dyn Renderer>,
    prompt: String,
    interrupt: Option<Arc<AtomicBool>>,
    state: SessionState,
    input_errors: u32,
}

impl<B: ChatBackend> SessionLoop<B> {
    /// Assemble a session from its collaborators.
    pub fn new(
        session: ChatSession<B>,
        router: CommandRouter,
        reader: Box<dyn LineReader>,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        Self {
            session,
            router,
            reader,
            renderer,
            prompt: DEFAULT_PROMPT.to_string(),
            interrupt: None,
            state: SessionState::default(),
            input_errors: 0,
        }
    }

    /// Set the input prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Watch `flag` for a Ctrl-C delivered outside the prompt.
    ///
    /// The flag is checked between iterations; a backend call that is already
    /// in flight runs to completion first.
    pub fn with_interrupt_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Run until exit, interrupt or end of input.
    pub async fn start(&mut self) {
        tracing::info!(backend = %self.session.backend().describe(), "session started");
        self.state.running = true;
        self.router.show_welcome(self.renderer.as_mut());

        while self.state.running {
            if self.interrupt_requested() {
                self.stop();
                break;
            }
            if let Err(err) = self.step().await {
                SESSION_ERRORS.click();
                tracing::warn!(error = %err, "session loop error");
                self.renderer.print_error(&err.to_string());
                self.input_errors += 1;
                if self.input_errors >= MAX_CONSECUTIVE_INPUT_ERRORS {
                    tracing::warn!(
                        errors = self.input_errors,
                        "too many consecutive input errors; stopping"
                    );
                    self.state.running = false;
                }
            }
        }
        tracing::info!(turns = self.session.message_count(), "session stopped");
    }

    async fn step(&mut self) -> Result<()> {
        let event = self.reader.read_line(&self.prompt).await?;
        self.input_errors = 0;
        match event {
            InputEvent::Interrupted | InputEvent::Closed => self.stop(),
            InputEvent::Line(line) => self.handle_line(line.trim()).await,
        }
        Ok(())
    }

    /// Process one line of already-acquired input.
    pub async fn handle_line(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        if let Some(body) = line.strip_prefix(COMMAND_MARKER) {
            let outcome = self.router.dispatch(body, self.renderer.as_mut());
            self.apply(outcome);
            return;
        }

        self.renderer.start_thinking();
        let result = self.session.send(line).await;
        self.renderer.finish_thinking();
        match result {
            Ok(reply) => self.renderer.print_line(&format!("Assistant: {reply}")),
            Err(err) => self.renderer.print_error(&err.to_string()),
        }
        if self.interrupt_requested() {
            self.stop();
        }
    }

    fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Continue => {}
            Outcome::Exit => self.state.running = false,
            Outcome::ResetConversation => self.session.clear_context(),
        }
    }

    fn stop(&mut self) {
        if self.state.running {
            self.renderer.print_line(GOODBYE);
            self.state.running = false;
        }
    }

    fn interrupt_requested(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|flag| flag.swap(false, Ordering::Relaxed))
    }

    /// Current running state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The command router, and through it the server registry.
    pub fn router(&self) -> &CommandRouter {
        &self.router
    }

    /// The chat session, and through it the conversation.
    pub fn session(&self) -> &ChatSession<B> {
        &self.session
    }

    /// The renderer output goes to.
    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use crate::error::Error;
    use crate::input::ScriptedReader;
    use crate::render::CaptureRenderer;
    use crate::types::Turn;

    struct Broken;

    #[async_trait::async_trait]
    impl LineReader for Broken {
        async fn read_line(&mut self, _prompt: &str) -> Result<InputEvent> {
            Err(Error::input("terminal went away"))
        }
    }

    /// Backend that raises the interrupt flag while its call is in flight.
    struct InterruptsMidCall {
        flag: Arc<AtomicBool>,
    }

    #[async_trait::async_trait]
    impl ChatBackend for InterruptsMidCall {
        async fn reply(&self, _messages: &[Turn]) -> Result<String> {
            self.flag.store(true, Ordering::Relaxed);
            Ok("finished anyway".to_string())
        }
    }

    fn session_with(reader: Box<dyn LineReader>) -> SessionLoop<MockBackend> {
        SessionLoop::new(
            ChatSession::new(MockBackend::new()),
            CommandRouter::default(),
            reader,
            Box::new(CaptureRenderer::new()),
        )
    }

    #[tokio::test]
    async fn exit_stops_loop() {
        let mut repl = session_with(Box::new(ScriptedReader::new(["/exit", "never read"])));
        repl.start().await;
        assert!(!repl.state().running);
        assert!(repl.session().context().is_empty());
    }

    #[tokio::test]
    async fn reset_clears_conversation() {
        let mut repl = session_with(Box::new(ScriptedReader::new(["hello", "/reset"])));
        repl.start().await;
        assert!(repl.session().context().is_empty());
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let mut repl = session_with(Box::new(ScriptedReader::new(["", "   "])));
        repl.start().await;
        assert_eq!(repl.session().message_count(), 0);
    }

    #[tokio::test]
    async fn repeated_input_errors_stop_loop() {
        let mut repl = session_with(Box::new(Broken));
        repl.start().await;
        assert!(!repl.state().running);
    }

    #[tokio::test]
    async fn interrupt_flag_ends_session() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut repl = session_with(Box::new(ScriptedReader::new(["hello"])))
            .with_interrupt_flag(Arc::clone(&flag));
        repl.start().await;
        assert!(!repl.state().running);
        assert_eq!(repl.session().message_count(), 0);
        assert!(!flag.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn interrupt_during_call_prints_reply_then_goodbye() {
        let flag = Arc::new(AtomicBool::new(false));
        let output = CaptureRenderer::new();
        let backend = InterruptsMidCall {
            flag: Arc::clone(&flag),
        };
        let mut repl = SessionLoop::new(
            ChatSession::new(backend),
            CommandRouter::default(),
            Box::new(ScriptedReader::new(["hello", "never read"])),
            Box::new(output.clone()),
        )
        .with_interrupt_flag(Arc::clone(&flag));
        repl.start().await;

        let lines = output.lines();
        let at = lines
            .iter()
            .position(|line| line == "Assistant: finished anyway")
            .unwrap();
        assert_eq!(lines[at + 1], GOODBYE);
        assert_eq!(lines.len(), at + 2);
        assert_eq!(repl.session().context().len(), 2);
        assert!(!repl.state().running);
        assert!(!output.contains("never read"));
    }
}
