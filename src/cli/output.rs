//! Line-based printing of a streaming answer.
//!
//! The conversation publishes whole snapshots; [`StreamPrinter`] remembers
//! what it already wrote for the current assistant message and prints only
//! the new part, so the terminal shows tokens as they arrive.

use std::io::{self, Write};

use crate::conversation::ConversationSnapshot;
use crate::models::{MessageRole, MessageStatus};

/// Line width for separators.
const LINE_WIDTH: usize = 60;

/// Longest tool output shown in the summary.
const PREVIEW_CHARS: usize = 80;

/// Status icons
pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const FAILURE: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const RUNNING: &str = "⠿";
}

/// Prints the assistant answer incrementally.
#[derive(Debug)]
pub struct StreamPrinter<W: Write> {
    out: W,
    message_id: Option<u64>,
    printed: usize,
    tool_status: Option<String>,
    finished: bool,
}

impl<W: Write> StreamPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            message_id: None,
            printed: 0,
            tool_status: None,
            finished: false,
        }
    }

    /// Print whatever changed in the latest assistant message.
    pub fn render(&mut self, snapshot: &ConversationSnapshot) -> io::Result<()> {
        let Some(message) = snapshot.last_message() else {
            return Ok(());
        };
        if message.role != MessageRole::Assistant {
            return Ok(());
        }

        if self.message_id != Some(message.id) {
            self.message_id = Some(message.id);
            self.printed = 0;
            self.tool_status = None;
            self.finished = false;
        }
        if self.finished {
            return Ok(());
        }

        // Content only grows, so everything past `printed` is new.
        if let Some(delta) = message.content.get(self.printed..) {
            if !delta.is_empty() {
                write!(self.out, "{}", delta)?;
                self.printed = message.content.len();
            }
        }

        if message.tool_status != self.tool_status {
            if let Some(tool) = &message.tool_status {
                self.break_line(&message.content)?;
                writeln!(self.out, "  {} running {}...", icons::RUNNING, tool)?;
            }
            self.tool_status = message.tool_status.clone();
        }

        if !message.is_streaming() {
            writeln!(self.out)?;
            if !message.tool_calls.is_empty() {
                writeln!(self.out, "{}", "─".repeat(LINE_WIDTH))?;
                for call in &message.tool_calls {
                    writeln!(
                        self.out,
                        "  {} {}({}) -> {}",
                        icons::SUCCESS,
                        call.tool,
                        call.input,
                        call.output_preview(PREVIEW_CHARS)
                    )?;
                }
            }
            match message.status {
                MessageStatus::Incomplete => {
                    writeln!(self.out, "  {} answer incomplete", icons::WARNING)?
                }
                MessageStatus::Failed => writeln!(self.out, "  {} no answer", icons::FAILURE)?,
                MessageStatus::Complete | MessageStatus::Streaming => {}
            }
            self.finished = true;
        }

        self.out.flush()
    }

    /// Consume the printer and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn break_line(&mut self, content: &str) -> io::Result<()> {
        if self.printed > 0 && !content[..self.printed].ends_with('\n') {
            writeln!(self.out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::StreamPhase;
    use crate::models::{Message, OpenToolCall};
    use std::sync::Arc;
    use uuid::Uuid;

    fn snapshot(messages: Vec<Message>) -> ConversationSnapshot {
        ConversationSnapshot {
            conversation_id: Uuid::nil(),
            messages: messages.into_iter().map(Arc::new).collect(),
            session_id: None,
            phase: StreamPhase::Streaming,
            done: false,
            revision: 0,
        }
    }

    fn output(printer: StreamPrinter<Vec<u8>>) -> String {
        String::from_utf8(printer.into_inner()).unwrap()
    }

    #[test]
    fn test_prints_only_new_content() {
        let mut printer = StreamPrinter::new(Vec::new());
        let mut answer = Message::assistant_placeholder(1);

        answer.append_token("Net ");
        printer.render(&snapshot(vec![answer.clone()])).unwrap();
        answer.append_token("premium");
        printer.render(&snapshot(vec![answer.clone()])).unwrap();
        printer.render(&snapshot(vec![answer.clone()])).unwrap();

        assert_eq!(output(printer), "Net premium");
    }

    #[test]
    fn test_ignores_user_messages() {
        let mut printer = StreamPrinter::new(Vec::new());
        printer
            .render(&snapshot(vec![Message::user(0, "question")]))
            .unwrap();
        assert_eq!(output(printer), "");
    }

    #[test]
    fn test_tool_status_and_summary() {
        let mut printer = StreamPrinter::new(Vec::new());
        let mut answer = Message::assistant_placeholder(1);

        answer.append_token("Let me check.");
        answer.set_tool_status("calc");
        printer.render(&snapshot(vec![answer.clone()])).unwrap();

        answer.clear_tool_status();
        answer.push_tool_call(OpenToolCall::new("calc", "2+2").seal("4"));
        answer.finalize();
        printer.render(&snapshot(vec![answer.clone()])).unwrap();

        let text = output(printer);
        assert!(text.contains("running calc..."));
        assert!(text.contains("calc(2+2) -> 4"));
        assert!(text.starts_with("Let me check."));
    }

    #[test]
    fn test_finished_message_printed_once() {
        let mut printer = StreamPrinter::new(Vec::new());
        let mut answer = Message::assistant_placeholder(1);
        answer.append_token("Half");
        answer.abort("The connection was lost while the answer was streaming.");

        printer.render(&snapshot(vec![answer.clone()])).unwrap();
        printer.render(&snapshot(vec![answer.clone()])).unwrap();

        let text = output(printer);
        assert_eq!(text.matches("answer incomplete").count(), 1);
        assert!(text.contains("**Connection error:**"));
    }

    #[test]
    fn test_new_message_resets_progress() {
        let mut printer = StreamPrinter::new(Vec::new());
        let mut first = Message::assistant_placeholder(1);
        first.append_token("one");
        first.finalize();
        printer.render(&snapshot(vec![first.clone()])).unwrap();

        let mut second = Message::assistant_placeholder(3);
        second.append_token("two");
        printer
            .render(&snapshot(vec![first, Message::user(2, "again"), second]))
            .unwrap();

        assert_eq!(output(printer), "one\ntwo");
    }
}
