//! Request Context: per-request identifiers carried through logs and headers
use chrono::Utc;
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
    pub trace_id: String,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: generate_request_id(),
            trace_id: generate_trace_id(),
        }
    }

    /// Keeps a caller supplied trace id so one trace can span several requests.
    pub fn with_trace(trace_id: impl Into<String>) -> Self {
        Self {
            request_id: generate_request_id(),
            trace_id: trace_id.into(),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// `req_<base36 millis>_<6 random chars>`
pub fn generate_request_id() -> String {
    format!("req_{}_{}", timestamp36(), random36(6))
}

/// `trace_<base36 millis>_<8 random chars>`
pub fn generate_trace_id() -> String {
    format!("trace_{}_{}", timestamp36(), random36(8))
}

fn timestamp36() -> String {
    let mut millis = Utc::now().timestamp_millis().max(0) as u64;
    if millis == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while millis > 0 {
        digits.push(BASE36[(millis % 36) as usize]);
        millis /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

fn random36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}
