//! Document identity.
//!
//! Hosts address documents by URI. The lens only decorates documents backed by local files
//! (`file://`); everything else (`git:`, `untitled:`, `output:` ...) is ignored silently.
//!
//! Two URIs name the same document when their identity keys match. For `file` URIs the key is
//! the percent-decoded filesystem path, so `file:///tmp/a%20b.rs` and `file:///tmp/a b.rs`
//! are the same document. Escaped `/` and `%` stay escaped in the key: `file:///a%2Fb.rs` names
//! a file called `a/b.rs`, not `b.rs` inside `a`.

use std::fmt;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Scheme of documents backed by the local filesystem.
pub const FILE_SCHEME: &str = "file";

/// A parsed document URI with a normalized identity.
#[derive(Debug, Clone)]
pub struct DocumentUri {
    raw: String,
    scheme: String,
    identity: String,
}

impl DocumentUri {
    /// Parse a URI string.
    ///
    /// A string without a scheme is treated as a local path and converted to a `file://` URI.
    pub fn parse(uri: impl Into<String>) -> Self {
        let raw = uri.into();
        match split_scheme(&raw) {
            Some((scheme, rest)) => {
                let scheme = scheme.to_ascii_lowercase();
                let identity = if scheme == FILE_SCHEME {
                    file_identity(rest)
                } else {
                    raw.clone()
                };
                Self {
                    raw,
                    scheme,
                    identity,
                }
            }
            None => Self::from_path(Path::new(&raw)),
        }
    }

    /// Build a `file://` URI for a local path.
    ///
    /// The path is canonicalized when it exists, so relative paths and symlinks resolve to the
    /// same identity the host reports.
    pub fn from_path(path: &Path) -> Self {
        let abs = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let mut path_str = abs.to_string_lossy().to_string();

        if cfg!(windows) {
            path_str = path_str.replace('\\', "/");
            if !path_str.starts_with('/') {
                path_str.insert(0, '/');
            }
        }

        let raw = format!("file://{}", percent_encode_path(&path_str));
        Self {
            raw,
            scheme: FILE_SCHEME.to_string(),
            identity: path_str.replace('%', "%25"),
        }
    }

    /// The URI as given by the host.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lowercase URI scheme (e.g. `"file"`, `"git"`).
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns `true` if the document is backed by a local file.
    pub fn is_local_file(&self) -> bool {
        self.scheme == FILE_SCHEME
    }

    /// Convert a `file://` URI back into a local filesystem path.
    pub fn to_file_path(&self) -> Option<PathBuf> {
        if !self.is_local_file() {
            return None;
        }

        let mut path_str = percent_decode_path(&self.identity);
        if path_str.is_empty() {
            return None;
        }

        // `/C:/...` -> `C:\...`
        if cfg!(windows) {
            if path_str.starts_with('/') && path_str.get(2..3) == Some(":") {
                path_str.remove(0);
            }
            path_str = path_str.replace('/', "\\");
        }

        Some(PathBuf::from(path_str))
    }
}

impl PartialEq for DocumentUri {
    fn eq(&self, other: &Self) -> bool {
        self.scheme == other.scheme && self.identity == other.identity
    }
}

impl Eq for DocumentUri {}

impl Hash for DocumentUri {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.scheme.hash(state);
        self.identity.hash(state);
    }
}

impl fmt::Display for DocumentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for DocumentUri {
    fn from(uri: &str) -> Self {
        Self::parse(uri)
    }
}

impl From<String> for DocumentUri {
    fn from(uri: String) -> Self {
        Self::parse(uri)
    }
}

/// Split `scheme:rest`. Single-letter schemes are Windows drive letters, not schemes.
fn split_scheme(uri: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = uri.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() || scheme.len() < 2 {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }
    Some((scheme, rest))
}

fn file_identity(rest: &str) -> String {
    let path = rest.strip_prefix("//").unwrap_or(rest);
    let path = path.strip_prefix("localhost").unwrap_or(path);
    decode_escapes(path, b"/%")
}

/// Percent-encode a path for use in a `file://` URI.
///
/// Keeps unreserved bytes and `/`, percent-encodes the rest.
pub fn percent_encode_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for &b in path.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

/// Percent-decode a URI path component. Malformed escapes are kept verbatim.
pub fn percent_decode_path(path: &str) -> String {
    decode_escapes(path, &[])
}

/// Decode escapes except those producing a byte in `keep`, which are normalized to uppercase.
fn decode_escapes(path: &str, keep: &[u8]) -> String {
    fn hex_val(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        }
    }

    let bytes = path.as_bytes();
    let mut out = Vec::<u8>::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && let (Some(hi), Some(lo)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2]))
        {
            let byte = (hi << 4) | lo;
            if keep.contains(&byte) {
                out.extend_from_slice(format!("%{byte:02X}").as_bytes());
            } else {
                out.push(byte);
            }
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).to_string()
}
