//! History query-string parsing. Never fails: anything malformed falls
//! back to "no limit" / "no filter".

use crate::risk::RiskState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    /// `None` means the whole history.
    pub count: Option<usize>,
    /// `None` means every status.
    pub status: Option<RiskState>,
    /// Keep entries whose timestamp is at or after this.
    pub from_ms: Option<u64>,
}

impl HistoryQuery {
    pub fn parse(query: &str) -> Self {
        let mut out = Self::default();
        for pair in query.split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "count" => out.count = parse_count(value),
                "status" | "estado" => out.status = RiskState::parse(value),
                "from" => out.from_ms = value.parse::<u64>().ok().filter(|&ms| ms > 0),
                _ => {}
            }
        }
        out
    }
}

/// Positive integers only; zero, negatives and garbage mean "all".
fn parse_count(value: &str) -> Option<usize> {
    value
        .parse::<i64>()
        .ok()
        .filter(|&n| n > 0)
        .and_then(|n| usize::try_from(n).ok())
}
