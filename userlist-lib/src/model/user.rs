//! User records as returned by the `/users` endpoint.

use serde::Deserialize;

/// A user record.
///
/// Only the fields the listing consumes are modeled; anything else in the
/// payload is ignored during deserialization.
///
/// # Example
///
/// ```
/// use userlist_lib::model::User;
///
/// let json = r#"{
///     "id": 1,
///     "firstName": "Emily",
///     "lastName": "Johnson",
///     "age": 28,
///     "gender": "female",
///     "image": "https://dummyjson.com/icon/emilys/128",
///     "company": { "title": "Sales Manager" },
///     "address": { "city": "Phoenix", "state": "Mississippi" }
/// }"#;
///
/// let user: User = serde_json::from_str(json).unwrap();
/// assert_eq!(user.full_name(), "Emily Johnson");
/// assert_eq!(user.location(), "Phoenix, Mississippi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: u64,
    /// Avatar image URL.
    pub image: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Age in years.
    pub age: u32,
    /// Gender as reported by the API (`"male"` / `"female"`).
    pub gender: String,
    /// Employer information.
    pub company: Company,
    /// Postal address.
    pub address: Address,
}

impl User {
    /// Returns `"{first} {last}"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns `"{city}, {state}"`.
    pub fn location(&self) -> String {
        format!("{}, {}", self.address.city, self.address.state)
    }
}

/// Company details of a user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Company {
    /// Job title, shown as the user's designation.
    pub title: String,
}

/// Address details of a user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Address {
    pub city: String,
    pub state: String,
}
