//! # Field Normalizer
//! Turns raw scraped strings into typed values. Individual records may
//! be excluded (price on request) or rejected (malformed price) without
//! aborting the batch; both outcomes are counted so callers can surface
//! them as diagnostics.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::NormalizeRules;
use crate::ingest::types::RawListing;
use crate::location;

/// Typed view of a listing, ready for snapshot selection and
/// aggregation. `state`/`city`/`neighborhood` are always present but may
/// be empty when the location could not be decomposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedListing {
    pub title: String,
    pub price: f64,
    pub rooms: Option<f64>,
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub date_scraped: Option<NaiveDateTime>,
}

/// Per-record normalization outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Keep(NormalizedListing),
    /// The price field carries an exclude phrase ("price on request").
    ExcludedOnRequest,
    /// The price failed to parse, or parsed negative.
    MalformedPrice(String),
}

/// Batch counters; the pipeline mirrors these to the metrics recorder.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeStats {
    pub kept: usize,
    pub excluded_on_request: usize,
    pub malformed_price: usize,
    pub undated: usize,
}

/// Normalize one raw record. Pure; a record can drop out of the batch
/// only via the non-`Keep` outcomes.
pub fn normalize_record(raw: &RawListing, rules: &NormalizeRules) -> Outcome {
    if rules.is_excluded(&raw.price) {
        return Outcome::ExcludedOnRequest;
    }

    let price = match parse_price(&raw.price, rules) {
        Ok(p) => p,
        Err(e) => return Outcome::MalformedPrice(e),
    };

    let parts = location::decompose(raw.location.as_deref());

    Outcome::Keep(NormalizedListing {
        title: raw.title.trim().to_string(),
        price,
        rooms: extract_rooms(&raw.rooms),
        state: parts.state().to_string(),
        city: parts.city().to_string(),
        neighborhood: parts.neighborhood().to_string(),
        date_scraped: parse_date(&raw.date_scraped),
    })
}

/// Normalize a whole batch. Record-level failures never abort the run.
pub fn normalize_batch(raw: &[RawListing], rules: &NormalizeRules) -> (Vec<NormalizedListing>, NormalizeStats) {
    let mut kept = Vec::with_capacity(raw.len());
    let mut stats = NormalizeStats::default();

    for record in raw {
        match normalize_record(record, rules) {
            Outcome::Keep(n) => {
                if n.date_scraped.is_none() {
                    stats.undated += 1;
                }
                kept.push(n);
            }
            Outcome::ExcludedOnRequest => stats.excluded_on_request += 1,
            Outcome::MalformedPrice(detail) => {
                tracing::debug!(detail = %detail, title = %record.title, "malformed price");
                stats.malformed_price += 1;
            }
        }
    }

    stats.kept = kept.len();
    (kept, stats)
}

/// Apply the strip-token table to a raw price. Decodes HTML entities
/// first so `&nbsp;` and a literal non-breaking space scrub the same
/// way. A fixed point: cleaning already-clean text is a no-op.
pub fn clean_price(raw: &str, rules: &NormalizeRules) -> String {
    let mut out = html_escape::decode_html_entities(raw).to_string();
    for token in &rules.strip_tokens {
        if !token.is_empty() {
            out = out.replace(token.as_str(), "");
        }
    }
    out.trim().to_string()
}

fn parse_price(raw: &str, rules: &NormalizeRules) -> Result<f64, String> {
    let cleaned = clean_price(raw, rules);
    let value: f64 = cleaned
        .parse()
        .map_err(|_| format!("unparseable price {raw:?}"))?;
    if !value.is_finite() {
        return Err(format!("non-finite price {raw:?}"));
    }
    // Zero is a legitimate upstream value; negative never is.
    if value < 0.0 {
        return Err(format!("negative price {value}"));
    }
    Ok(value)
}

fn digit_run() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"\d+").unwrap())
}

/// First contiguous run of decimal digits, e.g. `"T3 duplex"` → `3`.
/// Absent (not zero) when the text has no digits.
pub fn extract_rooms(raw: &str) -> Option<f64> {
    digit_run()
        .find(raw)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Parse a scrape timestamp. Accepted shapes, in order: RFC 3339,
/// `%Y-%m-%d %H:%M:%S`, `%Y-%m-%dT%H:%M:%S`, bare `%Y-%m-%d` (midnight).
/// Unparseable input yields `None`; such records can never match a
/// defined snapshot maximum.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
