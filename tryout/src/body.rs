//! Bounded text renderings of raw request bodies.
//!
//! Bodies are unbounded on the wire, so both renderings stop formatting once
//! they have produced `MAX_LINES` worth of output.

/// Maximum number of lines a hex view may hold, marker line included.
pub const MAX_LINES: usize = 25;
pub const BYTES_PER_LINE: usize = 16;
pub const TRUNCATION_MARKER: &str = "(truncated...)";

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum BodyRendering {
    /// Hex bytes with a printable-ASCII gutter and offsets, one line per 16 bytes.
    #[default]
    Hex,
    /// Single line with non-printable bytes escaped.
    Escaped,
}

impl std::str::FromStr for BodyRendering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_ref() {
            "hex" => Ok(BodyRendering::Hex),
            "escaped" => Ok(BodyRendering::Escaped),
            _ => Err(format!("Unknown body rendering: {s}")),
        }
    }
}

impl BodyRendering {
    pub fn render(&self, body: &[u8]) -> String {
        match self {
            BodyRendering::Hex => hex_view(body),
            BodyRendering::Escaped => escaped(body),
        }
    }
}

/// Hex dump capped at [`MAX_LINES`]. Once the cap is reached the last line is
/// swapped for [`TRUNCATION_MARKER`]. The dump is lazy, so only the lines
/// that are kept ever get formatted.
pub fn hex_view(body: &[u8]) -> String {
    if body.is_empty() {
        return String::new();
    }

    let mut lines: Vec<String> = hexdump::hexdump_iter(body)
        .take(MAX_LINES)
        .map(|line| format!("{line}"))
        .collect();

    if lines.len() == MAX_LINES {
        if let Some(last) = lines.last_mut() {
            *last = TRUNCATION_MARKER.to_string();
        }
    }

    lines.join("\n")
}

/// Escaped single-line rendering. Only the first `MAX_LINES * BYTES_PER_LINE`
/// bytes are rendered, so it shares the hex view's input budget.
pub fn escaped(body: &[u8]) -> String {
    let budget = MAX_LINES * BYTES_PER_LINE;
    let shown = &body[..body.len().min(budget)];

    let mut out = String::with_capacity(shown.len());
    for &b in shown {
        match b {
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            b'"' => out.push_str("\\\""),
            b if is_printable(b) => out.push(b as char),
            b => out.push_str(&format!("\\x{b:02x}")),
        }
    }

    if body.len() > budget {
        out.push(' ');
        out.push_str(TRUNCATION_MARKER);
    }
    out
}

fn is_printable(b: u8) -> bool {
    (0x20..=0x7e).contains(&b)
}
