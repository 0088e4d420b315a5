//! Colombia wall-clock time. The panel reports in America/Bogota, which is
//! UTC-5 all year (no DST), so a fixed offset is sufficient.

use chrono::{DateTime, FixedOffset, Utc};

const BOGOTA_UTC_OFFSET_SECS: i32 = 5 * 3600;

/// The fixed UTC-5 offset applied to every displayed timestamp.
pub fn bogota_offset() -> FixedOffset {
    // Five hours west is always inside chrono's +/-24h bound.
    FixedOffset::west_opt(BOGOTA_UTC_OFFSET_SECS).unwrap()
}

/// Current Colombia time.
pub fn bogota_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&bogota_offset())
}

/// Control-bar and footer display format, e.g. "24/08/2026 03:05 PM".
pub fn format_stamp(at: DateTime<FixedOffset>) -> String {
    at.format("%d/%m/%Y %I:%M %p").to_string()
}
