//! Serde helpers for custom serialization.

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

/// Serialization and deserialization for an optional `Duration` as whole seconds.
pub mod option_duration_secs {
    use super::*;

    /// Serialize `Some(duration)` as a u64 number of seconds and `None` as null.
    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(duration) => serializer.serialize_some(&duration.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional u64 number of seconds. Zero means no timeout.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.filter(|secs| *secs > 0).map(Duration::from_secs))
    }
}

/// Deserialize a `null` value as the type's default, for list fields that the
/// kubelet may encode as `null` instead of an empty array.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
