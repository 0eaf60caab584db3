use diag_lens::{
    DiagnosticSeverity, DocumentUri, LensEvent, LensHost, PanelView, PresentationDriver,
    SeverityTally, VisualTier,
};
use diag_lens_lsp::{LspDiagnosticSeverity, LspLensHost, PublishDiagnosticsParams};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn item(line: u32, severity: Option<u64>, message: &str) -> Value {
    let mut d = json!({
        "range": {
            "start": { "line": line, "character": 0 },
            "end": { "line": line, "character": 4 }
        },
        "message": message,
    });
    if let Some(severity) = severity {
        d["severity"] = json!(severity);
    }
    d
}

fn publish(uri: &str, items: Vec<Value>) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "textDocument/publishDiagnostics",
        "params": { "uri": uri, "version": 3, "diagnostics": items }
    })
}

#[test]
fn test_parse_publish_diagnostics() {
    let params = json!({
        "uri": "file:///w/src/main.rs",
        "version": 7,
        "diagnostics": [
            {
                "range": { "start": { "line": 3, "character": 1 }, "end": { "line": 3, "character": 9 } },
                "severity": 1,
                "code": "E0308",
                "source": "rustc",
                "message": "mismatched types"
            },
            {
                "range": { "start": { "line": 5, "character": 0 }, "end": { "line": 6, "character": 0 } },
                "severity": 2,
                "code": 42,
                "message": "unused"
            },
            { "severity": 1, "message": "no range" }
        ]
    });

    let parsed = PublishDiagnosticsParams::from_params(&params).unwrap();
    assert_eq!(parsed.uri, "file:///w/src/main.rs");
    assert_eq!(parsed.version, Some(7));
    assert_eq!(parsed.diagnostics.len(), 2);
    assert_eq!(
        parsed.diagnostics[0].severity,
        Some(LspDiagnosticSeverity::Error)
    );
    assert_eq!(parsed.diagnostics[1].code.as_deref(), Some("42"));

    let diagnostics = parsed.to_diagnostics();
    assert_eq!(diagnostics[0].line, 3);
    assert_eq!(diagnostics[0].severity, DiagnosticSeverity::Error);
    assert_eq!(diagnostics[0].source.as_deref(), Some("rustc"));
    assert_eq!(diagnostics[0].code.as_deref(), Some("E0308"));
    assert_eq!(diagnostics[1].line, 5);
    assert_eq!(diagnostics[1].severity, DiagnosticSeverity::Warning);
}

#[test]
fn test_severity_mapping_and_default() {
    let params = json!({
        "uri": "file:///a.rs",
        "diagnostics": [
            item(0, Some(3), "info"),
            item(0, Some(4), "hint"),
            item(1, None, "untyped"),
            item(2, Some(9), "unknown")
        ]
    });
    let diagnostics = PublishDiagnosticsParams::from_params(&params)
        .unwrap()
        .to_diagnostics();

    let severities: Vec<DiagnosticSeverity> = diagnostics.iter().map(|d| d.severity).collect();
    assert_eq!(
        severities,
        vec![
            DiagnosticSeverity::Information,
            DiagnosticSeverity::Hint,
            DiagnosticSeverity::Error,
            DiagnosticSeverity::Error,
        ]
    );
}

#[test]
fn test_missing_uri_is_rejected() {
    assert_eq!(
        PublishDiagnosticsParams::from_params(&json!({ "diagnostics": [] })),
        None
    );
}

#[test]
fn test_host_ignores_other_messages() {
    let mut host = LspLensHost::new();
    let log_message = json!({
        "jsonrpc": "2.0",
        "method": "window/logMessage",
        "params": { "type": 3, "message": "hi" }
    });
    assert_eq!(host.apply_message(&log_message), None);

    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "textDocument/publishDiagnostics",
        "params": { "uri": "file:///a.rs", "diagnostics": [] }
    });
    assert_eq!(host.apply_message(&request), None);
}

#[test]
fn test_host_publishes_into_store() {
    let mut host = LspLensHost::new();
    let event = host
        .apply_message(&publish(
            "file:///w/a%20b.rs",
            vec![item(1, Some(1), "x"), item(1, Some(2), "y")],
        ))
        .unwrap();

    let uri = DocumentUri::parse("file:///w/a b.rs");
    assert_eq!(event, LensEvent::DiagnosticsChanged(vec![uri.clone()]));
    assert_eq!(host.diagnostics(&uri).len(), 2);

    host.apply_message(&publish("file:///w/a%20b.rs", Vec::new()));
    assert!(host.diagnostics(&uri).is_empty());
}

#[test]
fn test_server_traffic_drives_panel() {
    let a = DocumentUri::parse("file:///w/a.rs");
    let b = DocumentUri::parse("file:///w/b.rs");
    let mut host = LspLensHost::new();
    host.store_mut().open(a.clone());
    host.store_mut().open(b.clone());

    let mut views = Vec::<PanelView>::new();
    {
        let mut driver = PresentationDriver::new(host, |view: &PanelView| views.push(*view));
        driver.attach_panel();

        // Background document: no render.
        let event = driver
            .host_mut()
            .apply_message(&publish(b.as_str(), vec![item(0, Some(1), "e")]))
            .unwrap();
        assert!(!driver.handle(event));

        let items = (0..6).map(|i| item(i, Some(1), "e")).collect();
        let event = driver
            .host_mut()
            .apply_message(&publish(a.as_str(), items))
            .unwrap();
        assert!(driver.handle(event));
        assert_eq!(driver.render_count(), 2);
    }

    assert_eq!(views[0], PanelView::resting(true));
    assert_eq!(views[1].tally, SeverityTally::new(6, 0));
    assert_eq!(views[1].error_tier, VisualTier::Distressed);
}
