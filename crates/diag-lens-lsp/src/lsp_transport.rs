//! JSON-RPC/LSP stdio framing.
//!
//! Every message is a JSON value preceded by HTTP-like headers:
//!
//! ```text
//! Content-Length: <n>\r\n
//! \r\n
//! <n bytes of UTF-8 JSON>
//! ```
//!
//! Other headers (`Content-Type`) are accepted and ignored.

use serde_json::Value;
use std::io::{self, BufRead, Write};

/// Write one framed message and flush.
pub fn write_lsp_message<W: Write>(writer: &mut W, value: &Value) -> io::Result<()> {
    let body =
        serde_json::to_vec(value).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

    write!(writer, "Content-Length: {}\r\n\r\n", body.len())?;
    writer.write_all(&body)?;
    writer.flush()
}

/// Read one framed message.
///
/// Returns `Ok(None)` on clean EOF before any header byte.
pub fn read_lsp_message<R: BufRead>(reader: &mut R) -> io::Result<Option<Value>> {
    let Some(len) = read_content_length(reader)? else {
        return Ok(None);
    };

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;

    serde_json::from_slice(&body)
        .map(Some)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

fn read_content_length<R: BufRead>(reader: &mut R) -> io::Result<Option<usize>> {
    let mut content_length: Option<usize> = None;
    let mut saw_header = false;
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            if saw_header {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "EOF inside LSP message headers",
                ));
            }
            return Ok(None);
        }
        saw_header = true;

        let header = line.trim_end_matches(['\r', '\n']);
        if header.is_empty() {
            break;
        }

        // Header names are case-insensitive in practice.
        if let Some((name, value)) = header.split_once(':')
            && name.trim().eq_ignore_ascii_case("Content-Length")
        {
            content_length = value.trim().parse::<usize>().ok();
        }
    }

    content_length
        .map(Some)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "Missing Content-Length header"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    #[test]
    fn test_reads_consecutive_messages() {
        let mut buf = Vec::new();
        write_lsp_message(&mut buf, &json!({ "id": 1 })).unwrap();
        write_lsp_message(&mut buf, &json!({ "id": 2 })).unwrap();

        let mut reader = Cursor::new(buf);
        assert_eq!(read_lsp_message(&mut reader).unwrap(), Some(json!({ "id": 1 })));
        assert_eq!(read_lsp_message(&mut reader).unwrap(), Some(json!({ "id": 2 })));
        assert_eq!(read_lsp_message(&mut reader).unwrap(), None);
    }

    #[test]
    fn test_extra_headers_and_case() {
        let body = br#"{"method":"x"}"#;
        let raw = format!(
            "content-length: {}\r\nContent-Type: application/vscode-jsonrpc; charset=utf-8\r\n\r\n{}",
            body.len(),
            std::str::from_utf8(body).unwrap()
        );
        let mut reader = Cursor::new(raw.into_bytes());
        assert_eq!(
            read_lsp_message(&mut reader).unwrap(),
            Some(json!({ "method": "x" }))
        );
    }

    #[test]
    fn test_missing_length_is_invalid_data() {
        let mut reader = Cursor::new(b"Content-Type: x\r\n\r\n{}".to_vec());
        let err = read_lsp_message(&mut reader).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_truncated_headers() {
        let mut reader = Cursor::new(b"Content-Length: 2\r\n".to_vec());
        let err = read_lsp_message(&mut reader).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
