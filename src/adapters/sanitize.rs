//! Log sanitization for patient identifiers and lab values.
//!
//! Log lines may carry request URLs (`/patient/42`), structured fields
//! (`patient=42`) or serialized panels (`"GLU":5.0`). These are redacted
//! before formatted output reaches the sink, together with a few common
//! credential formats that can leak through error messages.
//!
//! Input is capped at `LABRISK_SANITIZE_MAX_BYTES` (default 16 KiB) per call.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static PATTERNS: OnceLock<RedactionRules> = OnceLock::new();

const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

struct RedactionRules {
    set: RegexSet,
    rules: Vec<Rule>,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn max_sanitize_bytes() -> usize {
    std::env::var("LABRISK_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn rules() -> &'static RedactionRules {
    PATTERNS.get_or_init(|| {
        let table: Vec<(&'static str, &'static str)> = vec![
            // Request paths for a single patient
            (r#"/patient/[^\s/?#"')]+"#, "/patient/[REDACTED-ID]"),
            // `patient=42`, `patient_id: 42`, `Patient 42` (an id always has a digit)
            (
                r#"(?i)\b(patient(?:[_ ]?id)?)(\s*[:=#]?\s*"?)[A-Za-z-]*\d[A-Za-z0-9-]*"#,
                "${1}${2}[REDACTED-ID]",
            ),
            // Analyte assignments: `GLU=5.0`, `"HGB":150`
            (
                r#"\b(HGB|MCV|GLU|ALT|AST|CREA|TSH)("?\s*[:=]\s*"?)-?\d+(?:\.\d+)?(?:[eE][-+]?\d+)?"#,
                "${1}${2}[REDACTED-VALUE]",
            ),
            // Email addresses
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
                "[REDACTED-EMAIL]",
            ),
            // Bearer tokens / JWTs
            (
                r"\beyJ[a-zA-Z0-9_-]{10,}\.[a-zA-Z0-9_-]{10,}\.[a-zA-Z0-9_-]{10,}\b",
                "[REDACTED-JWT]",
            ),
            // Credentials passed as query parameters or key/value pairs
            (
                r"(?i)\b(api[_-]?key|access[_-]?token|token|password|secret)(\s*[:=]\s*)[^\s&]{8,}",
                "${1}${2}[REDACTED-SECRET]",
            ),
        ];

        let set = RegexSet::new(table.iter().map(|(p, _)| *p)).expect("Valid regex set");
        let rules = table
            .into_iter()
            .map(|(pattern, replacement)| Rule {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect();

        RedactionRules { set, rules }
    })
}

/// Redact patient identifiers, lab values and credentials from `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let rules = rules();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in rules.set.matches(prefix).into_iter() {
        let rule = &rules.rules[idx];
        result = rule.regex.replace_all(&result, rule.replacement).into_owned();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// Check whether `input` contains anything [`sanitize`] would redact.
#[must_use]
pub fn contains_sensitive(input: &str) -> bool {
    let (prefix, _) = truncate_to_char_boundary(input, max_sanitize_bytes());
    rules().set.is_match(prefix)
}

/// A `tracing_subscriber` writer wrapper that sanitizes each formatted log
/// line before it is written to the underlying sink.
#[derive(Debug)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<M: Clone> Clone for SanitizingMakeWriter<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W> SanitizingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let sanitized = sanitize(&String::from_utf8_lossy(&line));
            self.inner.write_all(sanitized.as_bytes())?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A formatter that never emits a newline must not grow the buffer forever.
        let hard_cap = max_sanitize_bytes().saturating_mul(2);
        if hard_cap > 0 && self.buffer.len() > hard_cap {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n")?;
            self.buffer.clear();
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;

        if !self.buffer.is_empty() {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
        }

        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer())
    }
}
