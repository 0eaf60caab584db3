#![cfg(unix)]

use diag_lens_lsp::{LspClient, LspInbound};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

fn frame(msg: &Value) -> String {
    let body = msg.to_string();
    format!("Content-Length: {}\r\n\r\n{}", body.len(), body)
}

/// A fake server that writes `script` and then echoes whatever the client sends.
fn scripted_server(script: &[Value]) -> LspClient {
    let frames: String = script.iter().map(frame).collect();
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(r#"printf '%s' "$LSP_SCRIPT"; exec cat"#)
        .env("LSP_SCRIPT", frames)
        .stderr(Stdio::null());
    LspClient::spawn(cmd, Vec::new()).unwrap()
}

fn recv_matching(client: &LspClient, pred: impl Fn(&Value) -> bool) -> Option<Value> {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        match client.try_recv() {
            Some(LspInbound::Message(msg)) if pred(&msg) => return Some(msg),
            Some(LspInbound::IoError(err)) => panic!("connection failed: {err}"),
            Some(LspInbound::Message(_)) => {}
            None => thread::sleep(Duration::from_millis(5)),
        }
    }
    None
}

#[test]
fn test_string_id_request_is_answered_while_waiting() {
    let mut client = scripted_server(&[
        json!({
            "jsonrpc": "2.0",
            "id": "ra-7",
            "method": "window/workDoneProgress/create",
            "params": { "token": "rustAnalyzer/Indexing" }
        }),
        json!({ "jsonrpc": "2.0", "id": 1, "result": { "capabilities": {} } }),
    ]);

    let id = client.request("initialize", json!({})).unwrap();
    assert_eq!(id, 1);
    let (response, early) = client.wait_for_response(id, Duration::from_secs(5)).unwrap();
    assert_eq!(response["result"], json!({ "capabilities": {} }));
    assert!(early.is_empty(), "request queued as notification: {early:?}");

    // The echo of our reply shows what the server received.
    let reply = recv_matching(&client, |msg| msg.get("id") == Some(&json!("ra-7")));
    assert_eq!(
        reply,
        Some(json!({ "jsonrpc": "2.0", "id": "ra-7", "result": null }))
    );
}

#[test]
fn test_configuration_reply_keeps_string_id() {
    let mut client = scripted_server(&[]);
    let request = json!({
        "jsonrpc": "2.0",
        "id": "cfg-1",
        "method": "workspace/configuration",
        "params": { "items": [{ "section": "rust-analyzer" }, { "section": "files" }] }
    });
    client.handle_server_request(&request).unwrap();

    let reply = recv_matching(&client, |msg| msg.get("id") == Some(&json!("cfg-1")));
    assert_eq!(
        reply,
        Some(json!({ "jsonrpc": "2.0", "id": "cfg-1", "result": [null, null] }))
    );
}

#[test]
fn test_notifications_are_not_answered() {
    let mut client = scripted_server(&[]);
    client
        .handle_server_request(&json!({ "jsonrpc": "2.0", "method": "window/logMessage" }))
        .unwrap();
    client.notify("exit", Value::Null).unwrap();

    // Only the notification we sent comes back.
    let first = recv_matching(&client, |_| true).unwrap();
    assert_eq!(first["method"], json!("exit"));
}
