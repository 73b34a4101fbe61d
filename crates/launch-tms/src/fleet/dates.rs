use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parses the timestamp shapes the fleet API and spreadsheet exports emit.
///
/// RFC 3339 values are converted to UTC; bare dates resolve to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Calendar day of a timestamp, used for all day-bucket comparisons.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    parse_timestamp(raw).map(|dt| dt.date())
}

pub(crate) fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.as_deref().and_then(parse_calendar_date))
}

pub(crate) fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.as_deref().and_then(parse_timestamp))
}

pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl LenientNumber {
    fn into_finite(self) -> Option<f64> {
        let value = match self {
            LenientNumber::Number(value) => value,
            LenientNumber::Text(raw) => raw.trim().replace(',', "").parse().ok()?,
            LenientNumber::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

/// Numbers or numeric strings; anything else is absent rather than an error.
pub(crate) fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<LenientNumber>::deserialize(deserializer)?;
    Ok(opt.and_then(LenientNumber::into_finite))
}

/// Whole numbers in range only, so `"2020"` and `2020.0` parse but `"20.5"` does not.
pub(crate) fn deserialize_lenient_u16<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<LenientNumber>::deserialize(deserializer)?;
    Ok(opt
        .and_then(LenientNumber::into_finite)
        .filter(|value| value.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(value))
        .map(|value| value as u16))
}
