//! Language-server session that turns server traffic into lens events.

use crate::lsp_client::{LspClient, LspInbound, MessageKind};
use crate::lsp_host::LspLensHost;
use diag_lens::{DocumentUri, LensEvent};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::process::Command as ProcessCommand;
use std::time::Duration;

/// Options used to spawn and initialize an [`LspLensSession`].
#[derive(Debug)]
pub struct LspLensSessionOptions {
    /// Server command (caller configures args/env/stderr).
    pub cmd: ProcessCommand,
    /// Returned for `workspace/workspaceFolders` requests.
    pub workspace_folders: Vec<Value>,
    /// Exact `initialize` params.
    pub initialize_params: Value,
    /// How long to wait for the `initialize` response.
    pub initialize_timeout: Duration,
}

impl LspLensSessionOptions {
    /// Options with [`default_initialize_params`] for `root`.
    pub fn new(cmd: ProcessCommand, root: &Path) -> Self {
        let root_uri = DocumentUri::from_path(root);
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "root".to_string());
        let folder = json!({ "uri": root_uri.as_str(), "name": name });
        Self {
            cmd,
            workspace_folders: vec![folder],
            initialize_params: default_initialize_params(&root_uri),
            initialize_timeout: Duration::from_secs(10),
        }
    }
}

/// Minimal `initialize` params advertising diagnostics support.
pub fn default_initialize_params(root_uri: &DocumentUri) -> Value {
    json!({
        "processId": std::process::id(),
        "rootUri": root_uri.as_str(),
        "workspaceFolders": [{ "uri": root_uri.as_str(), "name": "root" }],
        "capabilities": {
            "textDocument": {
                "publishDiagnostics": {
                    "relatedInformation": false,
                    "versionSupport": true
                },
                "synchronization": { "didSave": true }
            },
            "workspace": {
                "configuration": true,
                "workspaceFolders": true
            }
        },
        "clientInfo": { "name": "diag-lens", "version": env!("CARGO_PKG_VERSION") }
    })
}

/// A running language server plus the notifications not yet handed to the host.
#[derive(Debug)]
pub struct LspLensSession {
    client: LspClient,
    pending: VecDeque<Value>,
    opened: Vec<DocumentUri>,
}

impl LspLensSession {
    /// Spawn the server and complete the `initialize` handshake.
    pub fn start(opts: LspLensSessionOptions) -> io::Result<Self> {
        let LspLensSessionOptions {
            cmd,
            workspace_folders,
            initialize_params,
            initialize_timeout,
        } = opts;

        let mut client = LspClient::spawn(cmd, workspace_folders)?;
        let id = client.request("initialize", initialize_params)?;
        let (response, early) = client.wait_for_response(id, initialize_timeout)?;
        if let Some(error) = response.get("error") {
            return Err(io::Error::other(format!("initialize failed: {error}")));
        }
        client.notify("initialized", json!({}))?;

        Ok(Self {
            client,
            pending: early.into(),
            opened: Vec::new(),
        })
    }

    /// Send `textDocument/didOpen` and record the document in `host`.
    ///
    /// Returns the [`LensEvent::DocumentOpened`] to dispatch.
    pub fn open_document(
        &mut self,
        host: &mut LspLensHost,
        uri: DocumentUri,
        language_id: &str,
        text: &str,
    ) -> io::Result<LensEvent> {
        if !self.opened.contains(&uri) {
            self.client.notify(
                "textDocument/didOpen",
                json!({
                    "textDocument": {
                        "uri": uri.as_str(),
                        "languageId": language_id,
                        "version": 1,
                        "text": text,
                    }
                }),
            )?;
            self.opened.push(uri.clone());
        }
        Ok(host.store_mut().open(uri))
    }

    /// Send `textDocument/didSave` so servers that check on save (rust-analyzer with
    /// `checkOnSave`) publish fresh diagnostics.
    pub fn save_document(&mut self, uri: &DocumentUri) -> io::Result<()> {
        self.client.notify(
            "textDocument/didSave",
            json!({ "textDocument": { "uri": uri.as_str() } }),
        )
    }

    /// Drain available server messages into `host`, returning the lens events they produce.
    ///
    /// Server requests are answered with safe defaults. Fails only when the connection broke.
    pub fn poll(&mut self, host: &mut LspLensHost) -> io::Result<Vec<LensEvent>> {
        let mut events = Vec::new();

        while let Some(msg) = self.pending.pop_front() {
            events.extend(host.apply_message(&msg));
        }

        while let Some(inbound) = self.client.try_recv() {
            match inbound {
                LspInbound::IoError(err) => {
                    return Err(io::Error::new(io::ErrorKind::BrokenPipe, err));
                }
                LspInbound::Message(msg) => {
                    if MessageKind::of(&msg) == MessageKind::Request {
                        self.client.handle_server_request(&msg)?;
                        continue;
                    }
                    events.extend(host.apply_message(&msg));
                }
            }
        }

        Ok(events)
    }

    /// Shut the server down.
    pub fn shutdown(mut self, timeout: Duration) -> io::Result<()> {
        self.client.shutdown(timeout)
    }
}
