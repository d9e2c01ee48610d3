use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};

// Slates are published against the US Eastern calendar day. A fixed
// standard-time offset keeps date resolution deterministic year-round.
const EASTERN_OFFSET_SECS: i32 = -5 * 3600;

pub fn resolve_game_date(
    date_arg: Option<&str>,
    now_utc: DateTime<Utc>,
) -> anyhow::Result<NaiveDate> {
    if let Some(s) = date_arg {
        return NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date (expected YYYY-MM-DD): {s}"));
    }

    let eastern =
        chrono::FixedOffset::east_opt(EASTERN_OFFSET_SECS).context("invalid Eastern offset")?;
    Ok(now_utc.with_timezone(&eastern).date_naive())
}
