//! Ordering types for user queries.

use std::fmt;

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Value of the `order` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Arrow glyph shown next to the active column header.
    pub fn glyph(self) -> char {
        match self {
            Self::Asc => '↑',
            Self::Desc => '↓',
        }
    }
}

/// Column a listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    Id,
    Name,
    Age,
}

impl SortKey {
    /// Short name used in logs and markup attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Age => "age",
        }
    }

    /// Field name understood by the API's `sortBy` parameter.
    ///
    /// Names sort by first name.
    pub fn api_field(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "firstName",
            Self::Age => "age",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Specifies the ordering of a user listing.
///
/// Replaced wholesale on change; any key/direction pair is valid.
///
/// # Example
///
/// ```
/// use userlist_lib::api::query::{Direction, SortKey, SortSpec};
///
/// let sort = SortSpec::default();
/// assert_eq!(sort, SortSpec::asc(SortKey::Id));
///
/// // Clicking the same column again flips the direction.
/// assert_eq!(sort.toggled(SortKey::Id).direction, Direction::Desc);
/// // Clicking another column starts ascending.
/// assert_eq!(sort.toggled(SortKey::Age), SortSpec::asc(SortKey::Age));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: Direction,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: Direction) -> Self {
        Self { key, direction }
    }

    /// Ascending sort on `key`.
    pub fn asc(key: SortKey) -> Self {
        Self::new(key, Direction::Asc)
    }

    /// Descending sort on `key`.
    pub fn desc(key: SortKey) -> Self {
        Self::new(key, Direction::Desc)
    }

    /// The spec that results from clicking the `key` column header.
    ///
    /// Descending only when `key` is already the active key in ascending
    /// order; every other click yields ascending.
    pub fn toggled(self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == Direction::Asc {
            Direction::Desc
        } else {
            Direction::Asc
        };
        Self::new(key, direction)
    }

    /// Glyph to show next to the `key` header, if it is the active key.
    pub fn indicator(&self, key: SortKey) -> Option<char> {
        (self.key == key).then(|| self.direction.glyph())
    }
}
