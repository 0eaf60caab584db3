//! JSON-RPC/LSP client over a child process's stdio.
//!
//! Reading and writing happen on two background threads connected by mpsc channels, so the host
//! loop stays synchronous: it drains [`LspClient::try_recv`] alongside its other event sources.

use crate::lsp_transport::{read_lsp_message, write_lsp_message};
use serde_json::{Map, Value, json};
use std::io::{self, BufReader, BufWriter};
use std::process::{Child, ChildStdin, ChildStdout, Command as ProcessCommand, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Messages received from the server.
#[derive(Debug)]
pub enum LspInbound {
    /// A raw JSON-RPC message.
    Message(Value),
    /// The reader or writer thread failed; the connection is unusable.
    IoError(String),
}

/// How a raw JSON-RPC message is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Has `method` and `id` (number or string); expects a reply.
    Request,
    /// Has `method` and no `id`.
    Notification,
    /// Has `id` and no `method`.
    Response,
    /// Neither.
    Invalid,
}

impl MessageKind {
    /// Classify `msg`.
    pub fn of(msg: &Value) -> Self {
        let has_id = msg.get("id").is_some_and(|id| !id.is_null());
        match (msg.get("method").is_some(), has_id) {
            (true, true) => Self::Request,
            (true, false) => Self::Notification,
            (false, true) => Self::Response,
            (false, false) => Self::Invalid,
        }
    }
}

/// A minimal language-server client over stdio pipes.
pub struct LspClient {
    child: Child,
    tx: mpsc::Sender<Value>,
    rx: mpsc::Receiver<LspInbound>,
    next_id: u64,
    workspace_folders: Vec<Value>,
}

impl std::fmt::Debug for LspClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LspClient")
            .field("pid", &self.child.id())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl LspClient {
    /// Spawn a server and connect to its stdio.
    ///
    /// `stdin`/`stdout` are overridden to pipes; configure `stderr` on `cmd` beforehand
    /// (TUIs want `Stdio::null()`).
    pub fn spawn(mut cmd: ProcessCommand, workspace_folders: Vec<Value>) -> io::Result<Self> {
        cmd.stdin(Stdio::piped()).stdout(Stdio::piped());
        let child = cmd.spawn()?;
        Self::from_child(child, workspace_folders)
    }

    /// Wrap an already spawned child whose stdin/stdout are piped.
    pub fn from_child(mut child: Child, workspace_folders: Vec<Value>) -> io::Result<Self> {
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("language server stdin is not piped"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("language server stdout is not piped"))?;

        let (tx_out, rx_out) = mpsc::channel::<Value>();
        let (tx_in, rx_in) = mpsc::channel::<LspInbound>();

        {
            let tx_in = tx_in.clone();
            thread::Builder::new()
                .name("diag-lens-lsp-writer".to_string())
                .spawn(move || write_loop(stdin, rx_out, tx_in))?;
        }
        thread::Builder::new()
            .name("diag-lens-lsp-reader".to_string())
            .spawn(move || read_loop(stdout, tx_in))?;

        Ok(Self {
            child,
            tx: tx_out,
            rx: rx_in,
            next_id: 1,
            workspace_folders,
        })
    }

    /// Send a notification.
    pub fn notify(&self, method: &str, params: Value) -> io::Result<()> {
        self.send(envelope(None, Some(method), |obj| {
            obj.insert("params".to_string(), params);
        }))
    }

    /// Send a request and return its id.
    pub fn request(&mut self, method: &str, params: Value) -> io::Result<u64> {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        self.send(envelope(Some(Value::from(id)), Some(method), |obj| {
            obj.insert("params".to_string(), params);
        }))?;
        Ok(id)
    }

    /// Answer a server request successfully. `id` is echoed as sent (number or string).
    pub fn respond(&self, id: Value, result: Value) -> io::Result<()> {
        self.send(envelope(Some(id), None, |obj| {
            obj.insert("result".to_string(), result);
        }))
    }

    /// Answer a server request with an error.
    pub fn respond_error(
        &self,
        id: Value,
        code: i64,
        message: impl Into<String>,
    ) -> io::Result<()> {
        let error = json!({ "code": code, "message": message.into() });
        self.send(envelope(Some(id), None, |obj| {
            obj.insert("error".to_string(), error);
        }))
    }

    /// Next inbound message, if one is ready.
    pub fn try_recv(&self) -> Option<LspInbound> {
        self.rx.try_recv().ok()
    }

    /// Block until the response to `request_id` arrives.
    ///
    /// Server requests received meanwhile are answered via [`Self::handle_server_request`];
    /// notifications received meanwhile are returned alongside the response so the caller does
    /// not lose early `publishDiagnostics`.
    pub fn wait_for_response(
        &mut self,
        request_id: u64,
        timeout: Duration,
    ) -> io::Result<(Value, Vec<Value>)> {
        let deadline = Instant::now() + timeout;
        let mut notifications = Vec::new();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("timed out waiting for LSP response id={request_id}"),
                ));
            }

            let inbound = self
                .rx
                .recv_timeout(remaining)
                .map_err(|err| io::Error::new(io::ErrorKind::TimedOut, err))?;

            match inbound {
                LspInbound::IoError(err) => {
                    return Err(io::Error::new(io::ErrorKind::BrokenPipe, err));
                }
                LspInbound::Message(msg) => match MessageKind::of(&msg) {
                    MessageKind::Response
                        if msg.get("id").and_then(Value::as_u64) == Some(request_id) =>
                    {
                        return Ok((msg, notifications));
                    }
                    MessageKind::Request => self.handle_server_request(&msg)?,
                    MessageKind::Notification => notifications.push(msg),
                    _ => log::debug!("dropping unrelated LSP message: {msg}"),
                },
            }
        }
    }

    /// Answer a server->client request with a safe default. No-op for non-requests.
    pub fn handle_server_request(&mut self, msg: &Value) -> io::Result<()> {
        if MessageKind::of(msg) != MessageKind::Request {
            return Ok(());
        }
        let id = msg.get("id").cloned().unwrap_or(Value::Null);
        let method = msg.get("method").and_then(Value::as_str).unwrap_or("");

        let result = match method {
            "workspace/configuration" => {
                let item_count = msg
                    .pointer("/params/items")
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len);
                Value::Array(vec![Value::Null; item_count])
            }
            "workspace/workspaceFolders" => Value::Array(self.workspace_folders.clone()),
            _ => {
                log::trace!("auto-replying null to server request {method}");
                Value::Null
            }
        };

        self.respond(id, result)
    }

    /// Ask the server to shut down and exit, then reap the process.
    pub fn shutdown(&mut self, timeout: Duration) -> io::Result<()> {
        let id = self.request("shutdown", Value::Null)?;
        // Best effort: some servers exit without answering.
        if let Err(err) = self.wait_for_response(id, timeout) {
            log::debug!("shutdown response not received: {err}");
        }
        self.notify("exit", Value::Null)?;
        self.reap(timeout);
        Ok(())
    }

    fn reap(&mut self, timeout: Duration) {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            match self.child.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) => thread::sleep(Duration::from_millis(10)),
                Err(err) => {
                    log::warn!("failed to poll language server process: {err}");
                    break;
                }
            }
        }
        if let Err(err) = self.child.kill() {
            log::debug!("language server kill: {err}");
        }
        let _ = self.child.wait();
    }

    fn send(&self, message: Value) -> io::Result<()> {
        self.tx
            .send(message)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "LSP writer thread stopped"))
    }
}

impl Drop for LspClient {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

fn envelope(
    id: Option<Value>,
    method: Option<&str>,
    fill: impl FnOnce(&mut Map<String, Value>),
) -> Value {
    let mut obj = Map::new();
    obj.insert("jsonrpc".to_string(), Value::String("2.0".to_string()));
    if let Some(id) = id {
        obj.insert("id".to_string(), id);
    }
    if let Some(method) = method {
        obj.insert("method".to_string(), Value::String(method.to_string()));
    }
    fill(&mut obj);
    Value::Object(obj)
}

fn write_loop(stdin: ChildStdin, rx: mpsc::Receiver<Value>, tx_in: mpsc::Sender<LspInbound>) {
    let mut writer = BufWriter::new(stdin);
    for value in rx {
        if let Err(err) = write_lsp_message(&mut writer, &value) {
            log::warn!("LSP write failed: {err}");
            let _ = tx_in.send(LspInbound::IoError(err.to_string()));
            break;
        }
    }
}

fn read_loop(stdout: ChildStdout, tx: mpsc::Sender<LspInbound>) {
    let mut reader = BufReader::new(stdout);
    loop {
        match read_lsp_message(&mut reader) {
            Ok(Some(value)) => {
                if tx.send(LspInbound::Message(value)).is_err() {
                    break;
                }
            }
            Ok(None) => {
                log::debug!("language server closed stdout");
                break;
            }
            Err(err) => {
                log::warn!("LSP read failed: {err}");
                let _ = tx.send(LspInbound::IoError(err.to_string()));
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shapes() {
        let request = envelope(Some(json!(3)), Some("initialize"), |obj| {
            obj.insert("params".to_string(), json!({}));
        });
        assert_eq!(
            request,
            json!({ "jsonrpc": "2.0", "id": 3, "method": "initialize", "params": {} })
        );

        let notification = envelope(None, Some("exit"), |obj| {
            obj.insert("params".to_string(), Value::Null);
        });
        assert_eq!(notification.get("id"), None);

        let response = envelope(Some(json!("ra-7")), None, |obj| {
            obj.insert("result".to_string(), Value::Null);
        });
        assert_eq!(
            response,
            json!({ "jsonrpc": "2.0", "id": "ra-7", "result": null })
        );
    }

    #[test]
    fn test_message_kind_accepts_string_ids() {
        let string_request = json!({ "id": "ra-7", "method": "window/workDoneProgress/create" });
        assert_eq!(MessageKind::of(&string_request), MessageKind::Request);
        assert_eq!(
            MessageKind::of(&json!({ "id": 7, "method": "workspace/configuration" })),
            MessageKind::Request
        );
        assert_eq!(
            MessageKind::of(&json!({ "method": "textDocument/publishDiagnostics" })),
            MessageKind::Notification
        );
        assert_eq!(
            MessageKind::of(&json!({ "id": "ra-7", "result": null })),
            MessageKind::Response
        );
        assert_eq!(MessageKind::of(&json!({})), MessageKind::Invalid);
    }
}
