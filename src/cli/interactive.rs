//! Interactive menu and chat loop.
//!
//! One dispatch loop drives an explicit state machine; every handler reads
//! at most one line and returns the next state.

use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::cli::commands::index_with_progress;
use crate::cli::output::Formatter;
use crate::models::ConversationHistory;
use crate::services::RagService;

const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Menu,
    Indexing,
    Chatting,
    Stats,
    Exiting,
}

pub struct InteractiveSession<'a, R, W> {
    service: &'a RagService,
    formatter: Box<dyn Formatter>,
    documents_path: PathBuf,
    top_k: usize,
    history: ConversationHistory,
    input: R,
    output: W,
}

impl<'a, R, W> InteractiveSession<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(
        service: &'a RagService,
        formatter: Box<dyn Formatter>,
        documents_path: PathBuf,
        top_k: usize,
        history_limit: usize,
        input: R,
        output: W,
    ) -> Self {
        Self {
            service,
            formatter,
            documents_path,
            top_k,
            history: ConversationHistory::new(history_limit),
            input,
            output,
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Run until the user exits or input ends.
    pub async fn run(&mut self, initial: State) -> Result<()> {
        let mut state = initial;
        if state == State::Chatting {
            self.chat_banner()?;
        }

        loop {
            debug!(?state, "interactive state");
            state = match state {
                State::Menu => self.menu().await?,
                State::Indexing => self.index().await?,
                State::Chatting => self.chat_turn().await?,
                State::Stats => self.stats().await?,
                State::Exiting => {
                    writeln!(self.output, "\nGoodbye!\n")?;
                    self.output.flush()?;
                    return Ok(());
                }
            };
        }
    }

    /// Next input line with the trailing newline removed, or `None` at end of input.
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    async fn menu(&mut self) -> Result<State> {
        writeln!(self.output, "\n{}", "-".repeat(RULE_WIDTH))?;
        writeln!(self.output, "OPTIONS:")?;
        writeln!(self.output, "  1. Index documents (required before first use)")?;
        writeln!(self.output, "  2. Start chat")?;
        writeln!(self.output, "  3. View index statistics")?;
        writeln!(self.output, "  4. Exit")?;
        writeln!(self.output, "{}", "-".repeat(RULE_WIDTH))?;

        let Some(choice) = self.read_line("\nSelect an option (1-4): ").await? else {
            return Ok(State::Exiting);
        };

        Ok(match choice.as_str() {
            "1" => State::Indexing,
            "2" => {
                self.chat_banner()?;
                State::Chatting
            }
            "3" => State::Stats,
            "4" => State::Exiting,
            _ => {
                writeln!(self.output, "\nInvalid choice. Please try again.")?;
                State::Menu
            }
        })
    }

    async fn index(&mut self) -> Result<State> {
        writeln!(
            self.output,
            "\nIndexing documents from {}...",
            self.documents_path.display()
        )?;
        self.output.flush()?;

        match index_with_progress(self.service, &self.documents_path).await {
            Ok(report) => write!(self.output, "\n{}", self.formatter.format_index_report(&report))?,
            Err(e) => write!(
                self.output,
                "{}",
                self.formatter.format_error(&format!("indexing failed: {e}"))
            )?,
        }
        Ok(State::Menu)
    }

    async fn stats(&mut self) -> Result<State> {
        match self.service.stats().await {
            Ok(stats) => write!(self.output, "\n{}", self.formatter.format_index_stats(&stats))?,
            Err(e) => write!(
                self.output,
                "{}",
                self.formatter.format_error(&format!("failed to fetch stats: {e}"))
            )?,
        }
        Ok(State::Menu)
    }

    fn chat_banner(&mut self) -> Result<()> {
        writeln!(self.output, "\n{}", "=".repeat(RULE_WIDTH))?;
        writeln!(self.output, "  CHAT MODE")?;
        writeln!(self.output, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(self.output, "\nCommands:")?;
        writeln!(self.output, "  - Type your question to get an answer")?;
        writeln!(self.output, "  - \"back\" - Return to main menu")?;
        writeln!(self.output, "  - \"clear\" - Clear chat history")?;
        writeln!(self.output, "  - \"exit\" - Exit chatbot\n")?;
        Ok(())
    }

    async fn chat_turn(&mut self) -> Result<State> {
        let Some(question) = self.read_line("You: ").await? else {
            return Ok(State::Exiting);
        };

        if question.is_empty() {
            return Ok(State::Chatting);
        }

        match question.to_lowercase().as_str() {
            "back" => return Ok(State::Menu),
            "exit" => return Ok(State::Exiting),
            "clear" => {
                self.history.clear();
                writeln!(self.output, "Chat history cleared\n")?;
                return Ok(State::Chatting);
            }
            _ => {}
        }

        writeln!(self.output, "\nThinking...\n")?;
        self.output.flush()?;

        match self
            .service
            .query_with_history(&mut self.history, &question, self.top_k)
            .await
        {
            Ok(answer) => writeln!(self.output, "{}", self.formatter.format_answer(&answer))?,
            Err(e) => write!(self.output, "{}", self.formatter.format_error(&e.to_string()))?,
        }

        Ok(State::Chatting)
    }
}
