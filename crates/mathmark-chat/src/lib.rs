//! # mathmark chat
//!
//! Client side of a chat widget whose messages are markdown with math.
//!
//! A [`ChatSession`] keeps the rendered transcript and the typing indicator.
//! [`ChatSession::send`] posts a message through a [`ChatBackend`] and then
//! drives a [`ReplyPoller`] until the backend marks its reply batch final.

pub mod backend;
pub mod config;
pub mod error;
pub mod message;
pub mod poll;
pub mod session;
pub mod transcript;
pub mod view;

pub use backend::{ChatBackend, HttpBackend, ReplyBatch, SendReceipt};
pub use config::ChatConfig;
pub use error::ChatError;
pub use message::{Content, Message, Role};
pub use poll::{PollOutcome, PollSettings, ReplyPoller};
pub use session::ChatSession;
pub use transcript::{EntryHandle, Transcript, WaitingState};
pub use view::{MessageView, reformat_indentation};
