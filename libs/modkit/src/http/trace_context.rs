//! W3C `traceparent` handling for outgoing requests.
//!
//! Only the version `00` format is understood:
//! `00-<32 hex trace id>-<16 hex parent id>-<2 hex flags>`.

use std::fmt;
use std::str::FromStr;

use http::{HeaderMap, HeaderName, HeaderValue};
use tracing::Span;

pub const TRACEPARENT: &str = "traceparent";

const SAMPLED: u8 = 0x01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceParent {
    pub trace_id: u128,
    pub parent_id: u64,
    pub flags: u8,
}

impl TraceParent {
    /// Start a new sampled trace.
    pub fn generate() -> Self {
        Self {
            trace_id: nonzero(rand::random::<u128>),
            parent_id: nonzero(rand::random::<u64>),
            flags: SAMPLED,
        }
    }

    /// Same trace, new hop.
    pub fn child(&self) -> Self {
        Self {
            parent_id: nonzero(rand::random::<u64>),
            ..*self
        }
    }

    pub fn trace_id_hex(&self) -> String {
        format!("{:032x}", self.trace_id)
    }
}

fn nonzero<T: Default + PartialEq>(mut draw: impl FnMut() -> T) -> T {
    // All-zero ids are invalid per the W3C format
    loop {
        let v = draw();
        if v != T::default() {
            return v;
        }
    }
}

impl fmt::Display for TraceParent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "00-{:032x}-{:016x}-{:02x}",
            self.trace_id, self.parent_id, self.flags
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTraceParent;

impl fmt::Display for InvalidTraceParent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("malformed traceparent header")
    }
}

impl std::error::Error for InvalidTraceParent {}

impl FromStr for TraceParent {
    type Err = InvalidTraceParent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('-');
        let (Some("00"), Some(trace), Some(parent), Some(flags), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(InvalidTraceParent);
        };
        if trace.len() != 32 || parent.len() != 16 || flags.len() != 2 {
            return Err(InvalidTraceParent);
        }

        let trace_id = u128::from_str_radix(trace, 16).map_err(|_| InvalidTraceParent)?;
        let parent_id = u64::from_str_radix(parent, 16).map_err(|_| InvalidTraceParent)?;
        let flags = u8::from_str_radix(flags, 16).map_err(|_| InvalidTraceParent)?;
        if trace_id == 0 || parent_id == 0 {
            return Err(InvalidTraceParent);
        }

        Ok(Self {
            trace_id,
            parent_id,
            flags,
        })
    }
}

/// Set `traceparent` on an outgoing request and record the trace id on `span`.
///
/// A valid header already present (set by the caller) keeps its trace id and
/// gets a new parent id; anything else starts a new trace.
pub fn inject_trace_context(headers: &mut HeaderMap, span: &Span) -> TraceParent {
    let existing = headers
        .get(TRACEPARENT)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<TraceParent>().ok());

    let tp = existing.map_or_else(TraceParent::generate, |tp| tp.child());

    if let Ok(value) = HeaderValue::from_str(&tp.to_string()) {
        headers.insert(HeaderName::from_static(TRACEPARENT), value);
    }
    span.record("trace_id", tp.trace_id_hex().as_str());
    tp
}
