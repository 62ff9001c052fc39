//! Identifier generation and ISO-8601 timestamps.

use std::sync::atomic::{AtomicI64, Ordering};

use rand::Rng;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Prefix shared by every generated record identifier.
pub const ID_PREFIX: &str = "form_";

/// Length of the random base-36 suffix.
const SUFFIX_LEN: usize = 9;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Highest millisecond value handed out so far; keeps ids non-decreasing
/// even if the wall clock steps backwards.
static LAST_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Generate a record identifier: `form_<unix-millis>_<9 base-36 chars>`.
///
/// Uniqueness rests on the random suffix; two ids in the same millisecond
/// collide with probability 36^-9.
pub fn generate_id() -> String {
    let now = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
    let millis = LAST_MILLIS.fetch_max(now, Ordering::SeqCst).max(now);

    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    format!("{ID_PREFIX}{millis}_{suffix}")
}

/// Current instant as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn now_iso() -> String {
    format_iso(OffsetDateTime::now_utc())
}

/// Format an instant in UTC with millisecond precision.
pub fn format_iso(instant: OffsetDateTime) -> String {
    let utc = instant.to_offset(UtcOffset::UTC);
    let fmt = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    );
    // Only fails for years outside 0..=9999.
    utc.format(&fmt)
        .unwrap_or_else(|_| utc.unix_timestamp().to_string())
}

/// Parse an ISO-8601 / RFC 3339 timestamp as written by [`format_iso`].
pub fn parse_iso(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339).ok()
}
