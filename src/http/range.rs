//! HTTP Range request parsing module
//!
//! Single `bytes=<start>-<end>` ranges only. Bounds are never clamped: a range
//! reaching past the end of the file is unsatisfiable.

/// Parsed and validated Range request, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRequest {
    /// Start byte position
    pub start: u64,
    /// End byte position
    pub end: u64,
}

impl RangeRequest {
    /// Number of bytes covered
    #[inline]
    pub const fn content_length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header value
    pub fn content_range(&self, file_size: u64) -> String {
        format!("bytes {}-{}/{file_size}", self.start, self.end)
    }
}

/// Range header parse result
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    /// Valid range request
    Valid(RangeRequest),
    /// Bounds invalid for this file - should return 416
    NotSatisfiable,
    /// No Range header or unparseable (ignore, return full content)
    None,
}

/// Parse HTTP Range header (single range only, bytes unit)
///
/// - `bytes=start-end` - Specific range
/// - `bytes=start-` - From start to end of file
/// - `bytes=-end` - From byte 0 to `end` (a missing start defaults to 0)
///
/// Multi-range headers, other units and non-numeric bounds yield
/// [`RangeParseResult::None`].
pub fn parse_range_header(range_header: Option<&str>, file_size: u64) -> RangeParseResult {
    let Some(header) = range_header else {
        return RangeParseResult::None;
    };

    let Some(spec) = header.trim().strip_prefix("bytes=") else {
        return RangeParseResult::None; // Not bytes unit, ignore
    };

    // Only support single range (not multi-range)
    if spec.contains(',') {
        return RangeParseResult::None;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeParseResult::None;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    // Both bounds are parsed before either is validated
    let (Some(start), Some(end)) = (
        parse_bound(start_str, 0),
        parse_bound(end_str, file_size.saturating_sub(1)),
    ) else {
        return RangeParseResult::None;
    };

    // A bound too large for u64 lies past the end of any file
    let (Bound::Value(start), Bound::Value(end)) = (start, end) else {
        return RangeParseResult::NotSatisfiable;
    };

    // An empty file fails the first check for every range
    if start >= file_size || end >= file_size || start > end {
        return RangeParseResult::NotSatisfiable;
    }

    RangeParseResult::Valid(RangeRequest { start, end })
}

/// A numeric range bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Value(u64),
    /// All digits, but past `u64::MAX`
    Overflow,
}

/// Parse one bound, substituting `default` when it is absent
///
/// `None` means the bound is not a number at all.
fn parse_bound(value: &str, default: u64) -> Option<Bound> {
    if value.is_empty() {
        return Some(Bound::Value(default));
    }
    if let Ok(n) = value.parse::<u64>() {
        return Some(Bound::Value(n));
    }
    let digits = value.strip_prefix('+').unwrap_or(value);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(Bound::Overflow)
    } else {
        None
    }
}
