//! Chat command adapter.
//!
//! Pulls text commands from the owner's chat through the [`ChatChannel`]
//! port, at most once per poll interval. One fetch can return a backlog;
//! the backlog is buffered here and handed out one command per cycle so
//! that every command goes through the controller in arrival order.
//!
//! | Text        | Command        |
//! |-------------|----------------|
//! | `/armar`    | `Arm`          |
//! | `/desarmar` | `Disarm`       |
//! | `/status`   | `StatusQuery`  |
//! | `/logs`     | `LogRequest`   |
//! | anything else | `Unrecognized` |

use std::collections::VecDeque;

use log::{debug, info, warn};

use super::InputAdapter;
use crate::app::commands::{Command, Source};
use crate::app::ports::{ChatChannel, ChatCursor};
use crate::fsm::SystemState;
use crate::scheduler::PollGate;

pub struct ChatAdapter<C: ChatChannel> {
    channel: C,
    gate: PollGate,
    /// Id of the newest message already taken from the channel.
    cursor: Option<ChatCursor>,
    pending: VecDeque<String>,
}

impl<C: ChatChannel> ChatAdapter<C> {
    pub fn new(channel: C, poll_interval_ms: u32) -> Self {
        Self {
            channel,
            gate: PollGate::new(poll_interval_ms),
            cursor: None,
            pending: VecDeque::new(),
        }
    }

    pub fn cursor(&self) -> Option<ChatCursor> {
        self.cursor
    }

    /// Messages fetched but not yet turned into commands.
    pub fn backlog(&self) -> usize {
        self.pending.len()
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    fn fetch(&mut self) {
        let messages = match self.channel.fetch_since(self.cursor) {
            Ok(m) => m,
            Err(e) => {
                warn!("Chat: fetch failed: {}", e);
                return;
            }
        };

        for msg in messages {
            if self.cursor.is_some_and(|c| msg.id <= c) {
                debug!("Chat: skipping already-seen message {}", msg.id);
                continue;
            }
            self.cursor = Some(msg.id);
            self.pending.push_back(msg.text);
        }
    }
}

impl<C: ChatChannel> InputAdapter for ChatAdapter<C> {
    fn poll(&mut self, now_ms: u64, _state: &SystemState) -> Option<Command> {
        if self.pending.is_empty() && self.gate.try_fire(now_ms) {
            self.fetch();
        }
        let text = self.pending.pop_front()?;
        info!("Chat: received {:?}", text);
        Some(parse_command(&text))
    }
}

/// Map one chat message to a command. Leading and trailing whitespace is
/// ignored; the command word itself must match exactly.
pub fn parse_command(text: &str) -> Command {
    let source = Source::ChatChannel;
    match text.trim() {
        "/armar" => Command::Arm { source },
        "/desarmar" => Command::Disarm { source },
        "/status" => Command::StatusQuery { source },
        "/logs" => Command::LogRequest { source },
        other => Command::Unrecognized {
            source,
            raw: other.to_string(),
        },
    }
}
