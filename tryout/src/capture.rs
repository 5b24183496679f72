use std::collections::BTreeMap;

use bytes::Bytes;
use tracing::instrument;

use crate::body::BodyRendering;
use crate::record::Record;
use crate::time::TimeSource;

/// Requests for this path are acknowledged but never recorded, browsers ask
/// for it on every visit to the viewer.
pub const FAVICON_PATH: &str = "favicon.ico";

/// Column budget for the header dump before it wraps one entry per line.
pub const HEADERS_WIDTH: usize = 40;

/// Everything the capture needs from an inbound request, as plain values.
/// Missing values are left empty by the caller.
#[derive(Clone, Default, Debug)]
pub struct CaptureRequest {
    pub method: String,
    pub scheme: String,
    pub http_version: String,
    pub client_address: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Capture {
    Recorded(Record),
    Ignored,
}

/// Normalize a request into a [`Record`]. Never fails: anything missing is
/// recorded as an empty string.
#[instrument(skip_all, fields(method = %request.method, path = %request.path))]
pub fn capture<T: TimeSource + ?Sized>(
    request: CaptureRequest,
    timesource: &T,
    rendering: BodyRendering,
) -> Capture {
    if request.path.trim_start_matches('/') == FAVICON_PATH {
        return Capture::Ignored;
    }

    Capture::Recorded(Record {
        timestamp: timesource.current_time(),
        origin_ip: request.client_address,
        method: request.method.to_uppercase(),
        scheme: request.scheme.to_uppercase(),
        http_version: request.http_version,
        path: join_path(&request.path, request.query.as_deref()),
        headers: format_headers(&request.headers),
        body: rendering.render(&request.body),
    })
}

/// Request path with a guaranteed leading slash. The query is only appended
/// when there is one, so `/foo` never turns into `/foo?`.
pub fn join_path(path: &str, query: Option<&str>) -> String {
    let mut joined = String::with_capacity(path.len() + 1);
    if !path.starts_with('/') {
        joined.push('/');
    }
    joined.push_str(path);

    if let Some(query) = query.filter(|q| !q.is_empty()) {
        joined.push('?');
        joined.push_str(query);
    }
    joined
}

/// Sorted `{'key': 'value', ...}` dump of the headers. Repeated keys are
/// folded into one comma separated value. Wraps to one entry per line once the
/// flat form is wider than [`HEADERS_WIDTH`].
pub fn format_headers(headers: &[(String, String)]) -> String {
    if headers.is_empty() {
        return String::new();
    }

    let mut folded: BTreeMap<&str, String> = BTreeMap::new();
    for (key, value) in headers {
        folded
            .entry(key.as_str())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.clone());
    }

    let entries: Vec<String> = folded
        .iter()
        .map(|(key, value)| format!("{}: {}", quote(key), quote(value)))
        .collect();

    let flat = format!("{{{}}}", entries.join(", "));
    if flat.chars().count() <= HEADERS_WIDTH {
        flat
    } else {
        format!("{{{}}}", entries.join(",\n "))
    }
}

fn quote(s: &str) -> String {
    let delimiter = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(delimiter);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}
