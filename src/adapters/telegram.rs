//! Telegram Bot API adapter.
//!
//! Implements [`Notifier`] (`sendMessage`, `sendDocument`) and
//! [`ChatChannel`] (`getUpdates`) for a single owner chat.
//!
//! | Call          | Method | Body                              |
//! |---------------|--------|-----------------------------------|
//! | `send`        | POST   | JSON `{chat_id, text}`            |
//! | `send_document` | POST | `multipart/form-data` file upload |
//! | `fetch_since` | GET    | none; `offset` + `limit` query, no long-poll |
//!
//! A getUpdates body is read into a buffer of [`MAX_RESPONSE_BYTES`].
//! `limit` keeps a batch of ordinary updates inside it. A batch that still
//! overflows is never parsed: the bot drops to one update per request and,
//! if a single update alone overflows, acknowledges it unread so the queue
//! keeps moving.
//!
//! Response parsing is plain `serde_json` and runs on the host. The HTTPS
//! transport (`EspHttpConnection` with the built-in CA bundle) only exists
//! on `target_os = "espidf"`; elsewhere requests are logged and dropped.
//!
//! The bot is a cheap handle (token + chat id, one connection per
//! request), so the notifier and the chat adapter each hold a clone.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{ChatChannel, ChatCursor, ChatError, ChatMessage, Notifier, NotifyError};

pub const API_BASE: &str = "https://api.telegram.org";

/// Upper bound on a getUpdates response read into memory.
pub const MAX_RESPONSE_BYTES: usize = 24 * 1024;

/// Budget for one update carrying a full-length plain-text message plus
/// its metadata.
const MAX_UPDATE_BYTES: usize = 6 * 1024;

/// `limit` for a normal getUpdates request.
pub const UPDATES_LIMIT: usize = MAX_RESPONSE_BYTES / MAX_UPDATE_BYTES;

const _: () = assert!(UPDATES_LIMIT >= 1);

const MULTIPART_BOUNDARY: &str = "----sentinel-log-boundary";

// ───────────────────────────────────────────────────────────────
// Wire types
// ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Deserialize)]
struct UpdatesResponse {
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Deserialize)]
struct Update {
    update_id: i64,
    message: Option<IncomingMessage>,
}

#[derive(Deserialize)]
struct IncomingMessage {
    chat: Chat,
    text: Option<String>,
}

#[derive(Deserialize)]
struct Chat {
    id: i64,
}

/// Result of decoding one getUpdates body.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedUpdates {
    /// Text messages from the owner chat, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Highest `update_id` in the batch, including updates that were
    /// filtered out. Must be acknowledged or the service resends them.
    pub last_update_id: Option<i64>,
}

/// Decode a getUpdates response, keeping only text messages from
/// `chat_id`.
pub fn parse_updates(body: &[u8], chat_id: i64) -> Result<ParsedUpdates, ChatError> {
    let resp: UpdatesResponse = serde_json::from_slice(body).map_err(|e| {
        debug!("Telegram: bad getUpdates body: {}", e);
        ChatError::Malformed
    })?;
    if !resp.ok {
        return Err(ChatError::Transport);
    }

    let mut parsed = ParsedUpdates::default();
    for update in resp.result {
        parsed.last_update_id = Some(
            parsed
                .last_update_id
                .map_or(update.update_id, |id| id.max(update.update_id)),
        );
        let Some(msg) = update.message else { continue };
        if msg.chat.id != chat_id {
            warn!("Telegram: ignoring message from chat {}", msg.chat.id);
            continue;
        }
        let Some(text) = msg.text else { continue };
        parsed.messages.push(ChatMessage {
            id: update.update_id,
            text,
        });
    }
    Ok(parsed)
}

/// `update_id` of the first update in a (possibly truncated) body.
///
/// Used only when a body overflowed the read buffer; the id is the first
/// field the service emits for each update, so it survives the cut.
pub fn first_update_id(body: &[u8]) -> Option<i64> {
    const KEY: &[u8] = b"\"update_id\":";
    let start = body.windows(KEY.len()).position(|w| w == KEY)? + KEY.len();
    let rest = &body[start..];
    let digits_at = rest.iter().position(|b| !b.is_ascii_whitespace())?;
    let digits: &[u8] = &rest[digits_at..];
    let len = digits.iter().take_while(|b| b.is_ascii_digit()).count();
    core::str::from_utf8(&digits[..len]).ok()?.parse().ok()
}

/// Build a `multipart/form-data` body carrying `chat_id` and one document.
pub fn multipart_document(chat_id: i64, file_name: &str, contents: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(contents.len() + 256);
    let b = MULTIPART_BOUNDARY;
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"chat_id\"\r\n\r\n{chat_id}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"document\"; filename=\"{file_name}\"\r\n\
             Content-Type: text/plain\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{b}--\r\n").as_bytes());
    body
}

// ───────────────────────────────────────────────────────────────
// Bot handle
// ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct TelegramBot {
    token: String,
    chat_id: i64,
    /// Highest update id seen, including foreign-chat updates.
    acked: Option<i64>,
    /// Fetch one update at a time after an oversized batch.
    narrow: bool,
}

impl TelegramBot {
    pub fn new(token: impl Into<String>, chat_id: i64) -> Self {
        Self {
            token: token.into(),
            chat_id,
            acked: None,
            narrow: false,
        }
    }

    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    fn updates_url(&self, cursor: Option<ChatCursor>) -> String {
        let from = match (cursor, self.acked) {
            (Some(c), Some(a)) => Some(c.max(a)),
            (c, a) => c.or(a),
        };
        let limit = if self.narrow { 1 } else { UPDATES_LIMIT };
        match from {
            Some(id) => format!(
                "{}?offset={}&limit={}&timeout=0",
                self.method_url("getUpdates"),
                id + 1,
                limit
            ),
            None => format!("{}?limit={}&timeout=0", self.method_url("getUpdates"), limit),
        }
    }

    fn ack(&mut self, id: i64) {
        self.acked = Some(self.acked.map_or(id, |a| a.max(id)));
    }

    /// Decode one getUpdates body and advance the acknowledged offset.
    /// `truncated` means the transport stopped reading at the buffer cap.
    fn absorb(&mut self, body: &[u8], truncated: bool) -> Result<Vec<ChatMessage>, ChatError> {
        if truncated {
            if self.narrow {
                match first_update_id(body) {
                    Some(id) => {
                        warn!("Telegram: update {} exceeds {} bytes, skipped", id, MAX_RESPONSE_BYTES);
                        self.ack(id);
                    }
                    None => warn!("Telegram: oversized update without a readable id"),
                }
            } else {
                warn!("Telegram: batch exceeds {} bytes, fetching one at a time", MAX_RESPONSE_BYTES);
                self.narrow = true;
            }
            return Err(ChatError::Oversized);
        }
        if body.is_empty() {
            return Ok(Vec::new());
        }

        let parsed = parse_updates(body, self.chat_id)?;
        match parsed.last_update_id {
            Some(id) => self.ack(id),
            // Caught up.
            None => self.narrow = false,
        }
        Ok(parsed.messages)
    }

    fn post(&self, method: &str, content_type: &str, body: &[u8]) -> Result<(), NotifyError> {
        let reply = transport::request(
            "POST",
            &self.method_url(method),
            Some((content_type, body)),
            &mut Vec::new(),
        )?;
        if !(200..300).contains(&reply.status) {
            return Err(NotifyError::Rejected(reply.status));
        }
        Ok(())
    }
}

impl Notifier for TelegramBot {
    fn send(&mut self, text: &str) -> Result<(), NotifyError> {
        let body = serde_json::to_vec(&SendMessage {
            chat_id: self.chat_id,
            text,
        })
        .map_err(|_| NotifyError::Transport)?;
        self.post("sendMessage", "application/json", &body)?;
        info!("Telegram: sent {:?}", text);
        Ok(())
    }

    fn send_document(&mut self, file_name: &str, contents: &[u8]) -> Result<(), NotifyError> {
        let body = multipart_document(self.chat_id, file_name, contents);
        let content_type = format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY);
        self.post("sendDocument", &content_type, &body)?;
        info!("Telegram: sent {} ({} bytes)", file_name, contents.len());
        Ok(())
    }
}

impl ChatChannel for TelegramBot {
    fn fetch_since(&mut self, cursor: Option<ChatCursor>) -> Result<Vec<ChatMessage>, ChatError> {
        let mut body = Vec::new();
        let reply = transport::request("GET", &self.updates_url(cursor), None, &mut body)
            .map_err(|e| match e {
                NotifyError::NotConnected => ChatError::NotConnected,
                _ => ChatError::Transport,
            })?;
        if reply.status != 200 {
            return Err(ChatError::Transport);
        }
        self.absorb(&body, reply.truncated)
    }
}

// ───────────────────────────────────────────────────────────────
// Transport
// ───────────────────────────────────────────────────────────────

/// Outcome of one HTTP exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    /// The body did not fit in [`MAX_RESPONSE_BYTES`]; `out` holds a prefix.
    pub truncated: bool,
}

#[cfg(target_os = "espidf")]
mod transport {
    use esp_idf_svc::http::Method;
    use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
    use log::warn;

    use super::{MAX_RESPONSE_BYTES, Reply};
    use crate::app::ports::NotifyError;

    /// Perform one HTTPS request, appending at most `MAX_RESPONSE_BYTES`
    /// of the response body to `out`.
    pub fn request(
        method: &str,
        url: &str,
        body: Option<(&str, &[u8])>,
        out: &mut Vec<u8>,
    ) -> Result<Reply, NotifyError> {
        let config = Configuration {
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            timeout: Some(core::time::Duration::from_secs(5)),
            ..Default::default()
        };
        let mut conn = EspHttpConnection::new(&config).map_err(|e| {
            warn!("HTTP: connection setup failed: {}", e);
            NotifyError::Transport
        })?;

        let method = if method == "POST" { Method::Post } else { Method::Get };
        let len;
        let mut headers: heapless::Vec<(&str, &str), 2> = heapless::Vec::new();
        if let Some((content_type, payload)) = body {
            len = payload.len().to_string();
            let _ = headers.push(("Content-Type", content_type));
            let _ = headers.push(("Content-Length", len.as_str()));
        }

        conn.initiate_request(method, url, &headers).map_err(|e| {
            warn!("HTTP: request failed: {}", e);
            NotifyError::Transport
        })?;
        if let Some((_, payload)) = body {
            let mut written = 0;
            while written < payload.len() {
                written += conn.write(&payload[written..]).map_err(|_| NotifyError::Transport)?;
            }
        }
        conn.initiate_response().map_err(|_| NotifyError::Transport)?;
        let status = conn.status();

        let mut buf = [0u8; 512];
        let mut truncated = false;
        loop {
            let n = conn.read(&mut buf).map_err(|_| NotifyError::Transport)?;
            if n == 0 {
                break;
            }
            let room = MAX_RESPONSE_BYTES - out.len();
            if n > room {
                out.extend_from_slice(&buf[..room]);
                truncated = true;
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        Ok(Reply { status, truncated })
    }
}

#[cfg(not(target_os = "espidf"))]
mod transport {
    use log::info;

    use super::Reply;
    use crate::app::ports::NotifyError;

    /// Simulation: log the request and answer 200 with an empty body.
    pub fn request(
        method: &str,
        url: &str,
        body: Option<(&str, &[u8])>,
        _out: &mut Vec<u8>,
    ) -> Result<Reply, NotifyError> {
        // Strip the token before logging.
        let endpoint = url.rsplit('/').next().unwrap_or(url);
        info!(
            "HTTP(sim): {} {} ({} bytes)",
            method,
            endpoint,
            body.map_or(0, |(_, b)| b.len())
        );
        Ok(Reply {
            status: 200,
            truncated: false,
        })
    }
}
