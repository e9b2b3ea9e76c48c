use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Result, bail};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const EPOCH_SECONDS_CUTOFF: i128 = 100_000_000_000;
const EPOCH_MILLIS_CUTOFF: i128 = 100_000_000_000_000;
const EPOCH_MICROS_CUTOFF: i128 = 100_000_000_000_000_000;

// Accepts bare epoch values (seconds/millis/micros/nanos, inferred by
// magnitude) or RFC3339; everything is floored to whole epoch seconds,
// the resolution every query boundary uses.
pub fn parse_epoch_seconds(raw: &str) -> Result<i64> {
    let candidate = raw.trim();
    if candidate.is_empty() {
        bail!("time input is empty");
    }

    if let Ok(epoch_raw) = candidate.parse::<i128>() {
        return epoch_to_seconds(epoch_raw);
    }

    if let Ok(parsed) = OffsetDateTime::parse(candidate, &Rfc3339) {
        let seconds = parsed.unix_timestamp();
        if seconds < 0 {
            bail!("times before 1970-01-01T00:00:00Z are not supported");
        }
        return Ok(seconds);
    }

    bail!("unsupported time format: {candidate}");
}

#[must_use]
pub fn format_epoch_seconds(epoch_seconds: i64) -> String {
    match OffsetDateTime::from_unix_timestamp(epoch_seconds) {
        Ok(dt) => format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            dt.year(),
            u8::from(dt.month()),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second()
        ),
        Err(_) => format!("epoch:{epoch_seconds}"),
    }
}

#[must_use]
pub fn unix_timestamp_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| {
            i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
        })
}

fn epoch_to_seconds(epoch_raw: i128) -> Result<i64> {
    if epoch_raw < 0 {
        bail!("negative epoch values are not supported");
    }

    let seconds = if epoch_raw < EPOCH_SECONDS_CUTOFF {
        epoch_raw
    } else if epoch_raw < EPOCH_MILLIS_CUTOFF {
        epoch_raw / 1_000
    } else if epoch_raw < EPOCH_MICROS_CUTOFF {
        epoch_raw / 1_000_000
    } else {
        epoch_raw / 1_000_000_000
    };

    i64::try_from(seconds).map_err(|_| anyhow::anyhow!("time exceeds supported epoch range"))
}
