use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use serde::{
    de::{Deserialize, Deserializer, Unexpected, Visitor},
    ser::{Serialize, Serializer},
};
use std::fmt::Display;
use std::str::FromStr;

const TIMESTAMP_FMT: &str = "%Y%m%d%H%M%S";
const TIMESTAMP_LEN: usize = 14;
const HUMAN_DATE_FMT: &str = "%d %B %Y";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid timestamp length")]
    InvalidLength(String),
    #[error("Invalid timestamp input")]
    InvalidDateTime(#[from] chrono::format::ParseError),
}

/// A Wayback Machine capture timestamp (`YYYYMMDDhhmmss`, always UTC).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    /// A timestamp predating the archive, used to request the oldest capture.
    pub fn earliest() -> Self {
        // 1900-08-31 23:13:00 is a valid calendar date, so this can't fail.
        let date = NaiveDate::from_ymd_opt(1900, 8, 31)
            .and_then(|date| date.and_hms_opt(23, 13, 0))
            .unwrap_or(NaiveDateTime::MIN);

        Self(date.and_utc())
    }

    /// The current wall-clock time, truncated to whole seconds.
    pub fn now() -> Self {
        Self(Utc::now().trunc_subsecs(0))
    }

    /// Render as `DD Month YYYY` (e.g. `13 April 2017`).
    pub fn human_date(&self) -> String {
        self.0.format(HUMAN_DATE_FMT).to_string()
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FMT))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == TIMESTAMP_LEN {
            Ok(Timestamp(
                NaiveDateTime::parse_from_str(s, TIMESTAMP_FMT)?.and_utc(),
            ))
        } else {
            Err(Self::Err::InvalidLength(s.to_string()))
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TimestampVisitor;

        impl<'de> Visitor<'de> for TimestampVisitor {
            type Value = Timestamp;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("struct Timestamp")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse()
                    .map_err(|_| serde::de::Error::invalid_value(Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_str(TimestampVisitor)
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
