use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::enums::UserRole;
use super::location::GeoPoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub village: String,
    pub language: String,
    pub role: UserRole,
    pub emergency_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub phone: String,
    pub village: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub role: UserRole,
    pub emergency_contact: Option<String>,
    pub location: Option<GeoPoint>,
}

fn default_language() -> String {
    "en".to_string()
}

impl User {
    pub fn from_create(input: UserCreate) -> Self {
        Self {
            id: super::new_id(),
            name: input.name,
            phone: input.phone,
            village: input.village,
            language: input.language,
            role: input.role,
            emergency_contact: input.emergency_contact,
            location: input.location,
            created_at: super::now(),
        }
    }
}

/// Optional filters for listing users. Blank values (`?role=&village=`)
/// mean "no filter".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub role: Option<UserRole>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub village: Option<String>,
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
