// src/deutils.rs
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use chrono::{DateTime, TimeZone, Utc};

/// Accepts a JSON number or a numeric string; rejects NaN and infinities.
pub fn deserialize_numeric_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let v = Value::deserialize(deserializer)?;
    let n = v
        .as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| D::Error::custom(format!("expected a number, got {}", v)))?;
    if !n.is_finite() {
        return Err(D::Error::custom("non-finite number"));
    }
    Ok(n)
}

/// Deserializes an epoch timestamp (integer or float seconds) into UTC.
pub fn deserialize_epoch_utc<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let float_epoch = deserialize_numeric_f64(deserializer)?;

    let secs = float_epoch.trunc() as i64;
    let nanos = (float_epoch.fract().abs() * 1_000_000_000.0) as u32;

    Utc.timestamp_opt(secs, nanos)
        .single()
        .ok_or_else(|| D::Error::custom(format!("invalid epoch timestamp: {}", float_epoch)))
}
