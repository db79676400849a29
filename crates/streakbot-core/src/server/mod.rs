//! Webhook HTTP listener.
//!
//! A deliberately small HTTP/1.1 server: Telegram POSTs one update per
//! request to a single route and only needs a `200 OK` acknowledgment back.
//! Each connection is an independent tokio task; the database sits behind a
//! mutex and every handler takes it for exactly one record touch.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::commands;
use crate::config::Config;
use crate::error::BotError;
use crate::storage::Database;
use crate::streak::phrases::PhrasePicker;
use crate::telegram::client::TelegramClient;
use crate::telegram::types::Update;

/// Upper bound on an inbound request, headers plus body.
const MAX_REQUEST_BYTES: usize = 64 * 1024;

pub struct WebhookServer {
    config: Config,
    db: Arc<Mutex<Database>>,
    client: Arc<TelegramClient>,
    picker: Arc<PhrasePicker>,
}

impl WebhookServer {
    pub fn new(config: Config, db: Database) -> Self {
        let client = Arc::new(TelegramClient::new(config.bot_token.clone()));
        Self {
            config,
            db: Arc::new(Mutex::new(db)),
            client,
            picker: Arc::new(PhrasePicker::new()),
        }
    }

    /// Replace the outbound client (tests point it at a mock server).
    pub fn with_client(mut self, client: TelegramClient) -> Self {
        self.client = Arc::new(client);
        self
    }

    /// Bind on the configured port and serve until the process exits.
    ///
    /// # Errors
    /// Returns an error if the listener cannot bind.
    pub async fn run(self) -> Result<(), BotError> {
        let addr = format!("0.0.0.0:{}", self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already-bound listener (tests bind port 0 themselves).
    pub async fn serve(self, listener: TcpListener) -> Result<(), BotError> {
        let addr = listener.local_addr()?;
        info!(%addr, path = %self.config.webhook_path, "listening for webhook updates");

        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    continue;
                }
            };
            let db = Arc::clone(&self.db);
            let client = Arc::clone(&self.client);
            let picker = Arc::clone(&self.picker);
            let path = self.config.webhook_path.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, &path, &db, &client, &picker).await {
                    warn!(%peer, error = %e, "connection handling failed");
                }
            });
        }
    }
}

struct Request {
    method: String,
    path: String,
    body: Vec<u8>,
}

async fn handle_connection<S>(
    mut stream: S,
    webhook_path: &str,
    db: &Mutex<Database>,
    client: &TelegramClient,
    picker: &PhrasePicker,
) -> std::io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let Some(request) = read_request(&mut stream).await? else {
        return write_response(&mut stream, "400 Bad Request").await;
    };

    if request.path != webhook_path {
        return write_response(&mut stream, "404 Not Found").await;
    }
    if request.method != "POST" {
        return write_response(&mut stream, "405 Method Not Allowed").await;
    }

    // Telegram gets its acknowledgment regardless of what the update does.
    write_response(&mut stream, "200 OK").await?;
    process_update(&request.body, db, client, picker).await;
    Ok(())
}

/// Decode one update and answer it. All failure modes end here: transport
/// problems are dropped with a log line, storage problems already produced a
/// fallback reply text, delivery problems are logged and not retried.
async fn process_update(
    body: &[u8],
    db: &Mutex<Database>,
    client: &TelegramClient,
    picker: &PhrasePicker,
) {
    let update: Update = match serde_json::from_slice(body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "could not decode incoming update");
            return;
        }
    };
    let Some(message) = update.message else {
        debug!(update_id = update.update_id, "update carries no message");
        return;
    };
    if message.text.is_empty() {
        debug!(update_id = update.update_id, "message carries no text");
        return;
    }
    debug!(
        update_id = update.update_id,
        user_id = message.from.id,
        text = %message.text,
        "handling update"
    );

    let today = chrono::Local::now().date_naive();
    let reply = {
        let db = db.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        commands::reply_for(&db, picker, &message, today)
    };

    if let Err(e) = client.send_message(message.chat.id, &reply).await {
        error!(chat_id = message.chat.id, error = %e, "failed to deliver reply");
    }
}

/// Read one HTTP/1.1 request. Returns `None` for anything malformed or
/// oversized; the caller answers 400.
async fn read_request<S: AsyncRead + Unpin>(stream: &mut S) -> std::io::Result<Option<Request>> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
        if buf.len() > MAX_REQUEST_BYTES {
            return Ok(None);
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let request_line = match lines.next() {
        Some(line) => line,
        None => return Ok(None),
    };
    let mut parts = request_line.split_whitespace();
    let (method, target) = match (parts.next(), parts.next()) {
        (Some(method), Some(target)) => (method, target),
        _ => return Ok(None),
    };

    // The request target may carry a query string; compare on the path only.
    let path = url::Url::parse(&format!("http://localhost{target}"))
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| target.to_string());

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    if content_length > MAX_REQUEST_BYTES {
        return Ok(None);
    }

    let body_start = (header_end + 4).min(buf.len());
    let mut body = buf[body_start..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(content_length);

    Ok(Some(Request {
        method: method.to_string(),
        path,
        body,
    }))
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|window| window == b"\r\n\r\n")
}

async fn write_response<S: AsyncWrite + Unpin>(stream: &mut S, status: &str) -> std::io::Result<()> {
    let response = format!("HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
