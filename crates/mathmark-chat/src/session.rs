use crate::backend::ChatBackend;
use crate::error::ChatError;
use crate::message::Message;
use crate::poll::{PollOutcome, ReplyPoller};
use crate::transcript::{Transcript, WaitingState};
use crate::view::{DEFAULT_TYPING_DOTS, MessageView};
use tokio::sync::watch;

/// State of one chat window.
pub struct ChatSession {
    view: MessageView,
    transcript: Transcript,
    waiting: WaitingState,
    input_enabled: bool,
    erase_visible: bool,
    typing_dots: usize,
}

impl ChatSession {
    pub fn new(view: MessageView) -> Self {
        Self {
            view,
            transcript: Transcript::new(),
            waiting: WaitingState::default(),
            input_enabled: true,
            erase_visible: false,
            typing_dots: DEFAULT_TYPING_DOTS,
        }
    }

    pub fn with_typing_dots(mut self, dots: usize) -> Self {
        self.typing_dots = dots;
        self
    }

    pub fn view(&self) -> &MessageView {
        &self.view
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn waiting(&self) -> WaitingState {
        self.waiting
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Whether the "erase conversation" control should be offered.
    pub fn erase_visible(&self) -> bool {
        self.erase_visible
    }

    pub fn append_message(&mut self, message: &Message) {
        let html = self.view.render(message);
        self.transcript.append(html);
    }

    /// Renders a previously stored conversation.
    pub fn load_history(&mut self, messages: &[Message]) {
        for message in messages {
            self.append_message(message);
        }
        self.erase_visible = !self.transcript.is_empty();
    }

    /// Locks input, shows the user's message and the typing indicator.
    pub fn begin_exchange(&mut self, text: &str) {
        self.input_enabled = false;
        self.append_message(&Message::user_text(text));
        let indicator = self.view.typing_indicator(self.typing_dots);
        self.waiting = self.waiting.show(&mut self.transcript, indicator);
    }

    /// Appends replies in arrival order, keeping the typing indicator last.
    pub fn apply_replies(&mut self, replies: &[Message]) {
        if replies.is_empty() {
            return;
        }
        let was_waiting = self.waiting.pending;
        self.waiting = self.waiting.clear(&mut self.transcript);
        for reply in replies {
            self.append_message(reply);
        }
        if was_waiting {
            let indicator = self.view.typing_indicator(self.typing_dots);
            self.waiting = self.waiting.show(&mut self.transcript, indicator);
        }
    }

    /// The exchange finished normally.
    pub fn complete(&mut self) {
        self.waiting = self.waiting.clear(&mut self.transcript);
        self.input_enabled = true;
        self.erase_visible = true;
    }

    /// The exchange failed; the user may try again.
    pub fn abort(&mut self) {
        self.waiting = self.waiting.clear(&mut self.transcript);
        self.input_enabled = true;
    }

    /// Empties the transcript after the conversation was erased.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.waiting = WaitingState::default();
        self.input_enabled = true;
        self.erase_visible = false;
    }

    /// Sends `text` and polls for the assistant's replies.
    pub async fn send(
        &mut self,
        backend: &dyn ChatBackend,
        poller: &ReplyPoller,
        text: &str,
        cancel: &mut watch::Receiver<bool>,
    ) -> Result<PollOutcome, ChatError> {
        self.begin_exchange(text);

        let receipt = match backend.send_message(text).await {
            Ok(receipt) => receipt,
            Err(e) => {
                log::error!("Error sending message: {}", e);
                self.abort();
                return Err(e);
            }
        };

        if !receipt.is_processing() {
            log::error!("Unexpected send status: {}", receipt.status);
            self.abort();
            return Err(ChatError::UnexpectedStatus(receipt.status));
        }

        log::debug!(
            "Message accepted as {}",
            receipt.user_msg_id.as_deref().unwrap_or("<unknown>")
        );
        let outcome = poller.run(backend, self, cancel).await?;
        if outcome == PollOutcome::Cancelled {
            self.abort();
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathmark_render::DelimitedRenderer;
    use std::sync::Arc;

    fn session() -> ChatSession {
        ChatSession::new(MessageView::new(Arc::new(DelimitedRenderer), "Bot")).with_typing_dots(1)
    }

    #[test]
    fn test_begin_exchange_locks_input() {
        let mut s = session();
        s.begin_exchange("hello");
        assert!(!s.input_enabled());
        assert!(s.waiting().pending);
        assert_eq!(s.transcript().len(), 2);
        let last = s.transcript().entries().last().unwrap();
        assert!(last.contains("is typing"));
    }

    #[test]
    fn test_indicator_stays_last() {
        let mut s = session();
        s.begin_exchange("q");
        s.apply_replies(&[Message::assistant_text("a1"), Message::assistant_text("a2")]);
        let entries: Vec<_> = s.transcript().entries().collect();
        assert_eq!(entries.len(), 4);
        assert!(entries[1].contains("a1"));
        assert!(entries[2].contains("a2"));
        assert!(entries[3].contains("is typing"));
    }

    #[test]
    fn test_complete_and_abort() {
        let mut s = session();
        s.begin_exchange("q");
        s.complete();
        assert!(s.input_enabled());
        assert!(s.erase_visible());
        assert!(!s.waiting().pending);
        assert_eq!(s.transcript().len(), 1);

        let mut s = session();
        s.begin_exchange("q");
        s.abort();
        assert!(s.input_enabled());
        assert!(!s.erase_visible());
        assert_eq!(s.transcript().len(), 1);
    }

    #[test]
    fn test_load_history_and_clear() {
        let mut s = session();
        s.load_history(&[]);
        assert!(!s.erase_visible());
        s.load_history(&[Message::user_text("q"), Message::assistant_text("$x$")]);
        assert!(s.erase_visible());
        assert!(s.transcript().to_html().contains(r"\(x\)"));
        s.clear();
        assert!(s.transcript().is_empty());
        assert!(!s.erase_visible());
    }
}
