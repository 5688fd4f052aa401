use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Treats an absent or blank string as `None`, otherwise parses it.
///
/// Query strings coming from table filters send `?std=&div=` rather than
/// omitting the parameter.
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}
