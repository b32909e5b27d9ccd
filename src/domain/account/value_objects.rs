use chrono::{DateTime, NaiveDateTime, Utc};
use derive_more::{Deref, Display};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{AsRefStr, Display as StrumDisplay, EnumString};

/// Snapshot instant as delivered by the remote store.
///
/// Holds `None` when the wire value could not be parsed; formatters render
/// such values as `Invalid Date` instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(Option<DateTime<Utc>>);

impl Timestamp {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(Some(instant))
    }

    pub fn invalid() -> Self {
        Self(None)
    }

    pub fn from_millis(millis: i64) -> Self {
        Self(DateTime::<Utc>::from_timestamp_millis(millis))
    }

    /// Accepts RFC 3339 and offset-less ISO-8601 (read as UTC).
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Self::new(parsed.with_timezone(&Utc));
        }
        // Postgres text output uses a space separator and a short "+00" offset.
        if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
            return Self::new(parsed.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Self::new(naive.and_utc());
            }
        }
        Self::invalid()
    }

    pub fn value(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    pub fn millis(&self) -> Option<i64> {
        self.0.map(|instant| instant.timestamp_millis())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::new(instant)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Timestamp::parse).unwrap_or_else(Timestamp::invalid))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(instant) => serializer.serialize_str(&instant.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }
}

/// Reads a numeric column that may arrive as a JSON number or a numeric
/// string (Postgres `numeric`). Unparsable input becomes NaN.
pub fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Missing(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(value) => value,
        Raw::Text(text) => text.trim().parse::<f64>().unwrap_or(f64::NAN),
        Raw::Missing(()) => f64::NAN,
    })
}

/// Optional variant of [`lenient_f64`] for columns some tables omit.
pub fn lenient_opt_f64<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Missing(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Some(value),
        Raw::Text(text) => Some(text.trim().parse::<f64>().unwrap_or(f64::NAN)),
        Raw::Missing(()) => None,
    })
}

/// Ticker symbol, normalised to upper case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deref, Display, Serialize)]
#[display(fmt = "{}", _0)]
pub struct Symbol(String);

impl Symbol {
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.trim().to_uppercase())
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Symbol::from(raw.as_str()))
    }
}

/// Direction of a logged trade.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum TradeSide {
    #[strum(serialize = "BUY")]
    #[serde(rename = "BUY", alias = "buy")]
    Buy,
    #[strum(serialize = "SELL")]
    #[serde(rename = "SELL", alias = "sell")]
    Sell,
}

/// Broker-reported account state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccountState {
    Active,
    Inactive,
    /// Any other broker status string, kept verbatim.
    Other(String),
}

impl AccountState {
    pub fn is_active(&self) -> bool {
        matches!(self, AccountState::Active)
    }

    pub fn as_str(&self) -> &str {
        match self {
            AccountState::Active => "ACTIVE",
            AccountState::Inactive => "INACTIVE",
            AccountState::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for AccountState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AccountState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AccountState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => AccountState::Active,
            "INACTIVE" => AccountState::Inactive,
            _ => AccountState::Other(raw),
        })
    }
}
