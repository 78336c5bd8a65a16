use serde::{ de, Deserialize, Deserializer, Serializer };
use tracing::Level;

/// Lenient level parsing for configuration; unknown names fall back to INFO
pub fn parse_level(value: &str) -> Level {
    value.trim().parse::<Level>().unwrap_or(Level::INFO)
}

/// Serialize `tracing::Level` as a lowercase name
pub fn serialize_level<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer
{
    serializer.serialize_str(&level.as_str().to_lowercase())
}

/// Deserialize `tracing::Level` from its name, rejecting unknown values
pub fn deserialize_level<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where D: Deserializer<'de>
{
    let raw = String::deserialize(deserializer)?;
    raw.parse::<Level>().map_err(|_| de::Error::custom(format!("unknown log level: {}", raw)))
}
