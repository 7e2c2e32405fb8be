mod import;
mod property;
mod role;
mod user;

pub use import::*;
pub use property::*;
pub use role::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// Record ids may be strings or numbers depending on the backend version.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Str(String),
    Num(i64),
}

impl IdRepr {
    fn into_string(self) -> String {
        match self {
            IdRepr::Str(s) => s,
            IdRepr::Num(n) => n.to_string(),
        }
    }
}

pub(crate) fn de_id<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<IdRepr>::deserialize(d).map(|id| id.map(IdRepr::into_string).unwrap_or_default())
}

pub(crate) fn de_opt_id<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<IdRepr>::deserialize(d).map(|id| id.map(IdRepr::into_string))
}

/// Treat an explicit `null` the same as a missing field.
pub(crate) fn de_null_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(d).map(Option::unwrap_or_default)
}
