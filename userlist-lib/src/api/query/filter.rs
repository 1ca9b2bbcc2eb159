//! In-memory filtering of loaded users.

use std::fmt;
use std::str::FromStr;

use crate::model::User;

/// Gender values the listing can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// All selectable genders, in display order.
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Value as it appears in API payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A gender string that is neither `male` nor `female`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gender: {0:?}")]
pub struct UnknownGender(pub String);

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(UnknownGender(other.to_string())),
        }
    }
}

/// The filter control a change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Gender,
    /// Labelled "Country" in the UI; matched against the user's city.
    City,
}

impl FilterField {
    /// Form field name of the control.
    pub fn name(self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::City => "country",
        }
    }
}

/// Row-inclusion criteria for the displayed users.
///
/// `None` means "any" for that field. Replaced wholesale on change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FilterSpec {
    pub gender: Option<Gender>,
    pub city: Option<String>,
}

impl FilterSpec {
    /// Returns a copy with one field replaced by a raw control value.
    ///
    /// An empty value clears the field.
    pub fn with_value(&self, field: FilterField, value: &str) -> Result<Self, UnknownGender> {
        let mut next = self.clone();
        match field {
            FilterField::Gender => {
                next.gender = if value.is_empty() {
                    None
                } else {
                    Some(value.parse()?)
                };
            }
            FilterField::City => {
                next.city = (!value.is_empty()).then(|| value.to_string());
            }
        }
        Ok(next)
    }

    /// Raw control value of a field (empty for "any").
    pub fn value(&self, field: FilterField) -> &str {
        match field {
            FilterField::Gender => self.gender.map(Gender::as_str).unwrap_or(""),
            FilterField::City => self.city.as_deref().unwrap_or(""),
        }
    }

    /// Returns `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        self.gender.is_none() && self.city.is_none()
    }

    /// Returns `true` if `user` satisfies every set field.
    pub fn matches(&self, user: &User) -> bool {
        let gender_ok = self.gender.is_none_or(|g| user.gender == g.as_str());
        let city_ok = self
            .city
            .as_deref()
            .is_none_or(|city| user.address.city == city);
        gender_ok && city_ok
    }

    /// Returns the matching users, preserving order.
    pub fn apply(&self, users: &[User]) -> Vec<User> {
        users.iter().filter(|u| self.matches(u)).cloned().collect()
    }
}
