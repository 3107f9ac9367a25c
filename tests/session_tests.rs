//! End-to-end tests driving the full session loop with scripted input.

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use personal_agent::chat::{
        ChatSession, CommandRouter, DEFAULT_WELCOME, GOODBYE, HELP_HINT, ServerRegistry,
        SessionLoop,
    };
    use personal_agent::{
        CaptureRenderer, ChatBackend, Error, InputEvent, MockBackend, Result, Role,
        ScriptedReader, Turn,
    };

    /// Backend that fails on every call whose message contains "fail".
    struct Flaky {
        calls: Mutex<usize>,
    }

    impl Flaky {
        fn new() -> Self {
            Self {
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl ChatBackend for Flaky {
        async fn reply(&self, messages: &[Turn]) -> Result<String> {
            *self.calls.lock().unwrap() += 1;
            let last = messages.last().expect("at least one turn");
            if last.content().contains("fail") {
                Err(Error::connection("connection refused", None))
            } else {
                Ok(format!("echo {} ({} turns)", last.content(), messages.len()))
            }
        }
    }

    fn run_loop<B: ChatBackend>(
        backend: B,
        reader: ScriptedReader,
    ) -> (SessionLoop<B>, CaptureRenderer) {
        let output = CaptureRenderer::new();
        let repl = SessionLoop::new(
            ChatSession::new(backend),
            CommandRouter::new(ServerRegistry::new()),
            Box::new(reader),
            Box::new(output.clone()),
        );
        (repl, output)
    }

    async fn run_lines(lines: &[&str]) -> (SessionLoop<MockBackend>, CaptureRenderer) {
        let (mut repl, output) = run_loop(
            MockBackend::new(),
            ScriptedReader::new(lines.iter().copied()),
        );
        repl.start().await;
        (repl, output)
    }

    #[tokio::test]
    async fn welcome_banner_comes_first() {
        let (_, output) = run_lines(&["/help", "/exit"]).await;
        let lines = output.lines();
        assert_eq!(lines[0], DEFAULT_WELCOME);
        assert_eq!(lines[1], HELP_HINT);
    }

    #[tokio::test]
    async fn commands_are_case_insensitive() {
        let (_, lower) = run_lines(&["/help"]).await;
        let (_, upper) = run_lines(&["/HELP"]).await;
        assert_eq!(lower.lines(), upper.lines());
        assert!(lower.contains("/server"));
    }

    #[tokio::test]
    async fn chat_grows_context_in_order() {
        let (repl, output) = run_lines(&["hello", "how are you?", "/exit"]).await;
        let context = repl.session().context();
        assert_eq!(context.len(), 4);
        assert_eq!(context[0].role(), Role::User);
        assert_eq!(context[0].content(), "hello");
        assert_eq!(context[1].role(), Role::Assistant);
        assert_eq!(context[2].content(), "how are you?");
        assert_eq!(context[3].content(), "This is a mock response to: how are you?");
        assert!(output.contains("Assistant: This is a mock response to: hello"));
        assert_eq!(output.thinking_shown(), 2);
    }

    #[tokio::test]
    async fn backend_failure_keeps_session_alive() {
        let reader = ScriptedReader::new(["first", "please fail", "second", "/exit"]);
        let (mut repl, output) = run_loop(Flaky::new(), reader);
        repl.start().await;

        assert!(output.contains("Error: Connection error: Failed to send message"));
        assert!(output.contains("Assistant: echo second (3 turns)"));
        assert_eq!(repl.session().context().len(), 4);
        assert!(
            repl.session()
                .context()
                .iter()
                .all(|turn| !turn.content().contains("fail"))
        );
        assert_eq!(*repl.session().backend().calls.lock().unwrap(), 3);
        assert_eq!(output.lines().last().map(String::as_str), Some(GOODBYE));
    }

    #[tokio::test]
    async fn empty_registry_lists_nothing() {
        let (_, output) = run_lines(&["/server list", "/exit"]).await;
        assert!(output.contains("没有服务器可用"));
        assert!(!output.contains("- "));
    }

    #[tokio::test]
    async fn add_then_list() {
        let (repl, output) = run_lines(&[
            "/server add test http://localhost:8000",
            "/server list",
            "/exit",
        ])
        .await;
        assert!(output.contains("test"));
        assert!(output.contains("http://localhost:8000"));
        assert_eq!(repl.router().registry().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_add_keeps_first_url() {
        let (repl, output) = run_lines(&[
            "/server add test http://localhost:8000",
            "/server add test http://localhost:9000",
            "/exit",
        ])
        .await;
        assert!(output.contains("名称重复，添加失败"));
        let record = repl.router().registry().get("test").unwrap();
        assert_eq!(record.url.as_str(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn unknown_command_prints_help() {
        let (_, output) = run_lines(&["/frobnicate"]).await;
        let lines = output.lines();
        let at = lines
            .iter()
            .position(|line| line == "Unknown command: frobnicate")
            .unwrap();
        assert_eq!(lines[at + 1], "Available commands:");
        assert_eq!(lines[at + 2], "Available CLI commands:");
    }

    #[tokio::test]
    async fn clear_keeps_conversation() {
        let (repl, output) = run_lines(&["hello", "/clear", "/exit"]).await;
        assert_eq!(repl.session().context().len(), 2);
        let lines = output.lines();
        let at = lines
            .iter()
            .position(|line| line == CaptureRenderer::CLEAR_MARKER)
            .unwrap();
        assert_eq!(lines[at + 1], DEFAULT_WELCOME);
        assert_eq!(lines[at + 2], HELP_HINT);
    }

    #[tokio::test]
    async fn reset_forgets_conversation() {
        let (repl, output) = run_lines(&["hello", "/reset", "again", "/exit"]).await;
        assert!(output.contains("Conversation cleared."));
        let context = repl.session().context();
        assert_eq!(context.len(), 2);
        assert_eq!(context[0].content(), "again");
    }

    #[tokio::test]
    async fn interrupt_says_goodbye() {
        let reader = ScriptedReader::from_events([
            InputEvent::Line("/server list".to_string()),
            InputEvent::Interrupted,
            InputEvent::Line("never read".to_string()),
        ]);
        let (mut repl, output) = run_loop(MockBackend::new(), reader);
        repl.start().await;
        assert!(!repl.state().running);
        assert_eq!(output.lines().last().map(String::as_str), Some(GOODBYE));
        assert!(repl.session().context().is_empty());
    }

    #[tokio::test]
    async fn end_of_input_says_goodbye_once() {
        let (repl, output) = run_lines(&["hello"]).await;
        assert!(!repl.state().running);
        let goodbyes = output.lines().iter().filter(|l| *l == GOODBYE).count();
        assert_eq!(goodbyes, 1);
    }

    #[tokio::test]
    async fn blank_lines_are_skipped() {
        let (repl, output) = run_lines(&["", "   ", "/exit"]).await;
        assert!(repl.session().context().is_empty());
        assert_eq!(
            output.lines(),
            vec![
                DEFAULT_WELCOME.to_string(),
                HELP_HINT.to_string(),
                GOODBYE.to_string(),
            ]
        );
    }
}
