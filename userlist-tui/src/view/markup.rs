//! HTML rendering of the listing.

use std::fmt;

use userlist_lib::api::query::{FilterField, Gender};
use userlist_lib::model::User;

use super::COLUMNS;
use crate::store::ListState;

/// Edge length, in pixels, of the avatar thumbnails.
const IMAGE_SIZE: u32 = 50;

/// HTML fragment for one [`ListState`].
///
/// Rendered through [`Display`](fmt::Display):
///
/// ```ignore
/// let html = Markup::new(&store.snapshot(), &config.cities).to_string();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Markup<'a> {
    state: &'a ListState,
    cities: &'a [String],
}

impl<'a> Markup<'a> {
    pub fn new(state: &'a ListState, cities: &'a [String]) -> Self {
        Self { state, cities }
    }

    fn filters(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let genders: Vec<&str> = Gender::ALL.iter().map(|g| g.as_str()).collect();
        let cities: Vec<&str> = self.cities.iter().map(String::as_str).collect();

        writeln!(f, r#"<div class="filters">"#)?;
        self.select(f, "Gender", FilterField::Gender, &genders)?;
        self.select(f, "Country", FilterField::City, &cities)?;
        writeln!(f, "</div>")
    }

    fn select(
        &self,
        f: &mut fmt::Formatter<'_>,
        label: &str,
        field: FilterField,
        options: &[&str],
    ) -> fmt::Result {
        let current = self.state.filter.value(field);
        writeln!(f, "<label>{}: <select name=\"{}\">", label, field.name())?;
        option(f, "", "Any", current.is_empty())?;
        for value in options {
            option(f, value, value, current == *value)?;
        }
        writeln!(f, "</select></label>")
    }

    fn head(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<thead><tr>")?;
        for column in &COLUMNS {
            match column.sort {
                Some(key) => {
                    write!(f, r#"<th data-sort="{}">{}"#, key, column.label)?;
                    if let Some(glyph) = self.state.sort.indicator(key) {
                        write!(f, " {}", glyph)?;
                    }
                    write!(f, "</th>")?;
                }
                None => write!(f, "<th>{}</th>", column.label)?,
            }
        }
        writeln!(f, "</tr></thead>")
    }

    fn row(f: &mut fmt::Formatter<'_>, user: &User) -> fmt::Result {
        writeln!(
            f,
            "<tr data-id=\"{id}\"><td>{id}</td>\
             <td><img src=\"{src}\" alt=\"{alt}\" width=\"{size}\" height=\"{size}\"></td>\
             <td>{name}</td><td>{age}</td><td>{title}</td><td>{location}</td></tr>",
            id = user.id,
            src = Escaped(&user.image),
            alt = Escaped(&user.first_name),
            size = IMAGE_SIZE,
            name = Escaped(&user.full_name()),
            age = user.age,
            title = Escaped(&user.company.title),
            location = Escaped(&user.location()),
        )
    }
}

impl fmt::Display for Markup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, r#"<div class="user-list-container">"#)?;
        writeln!(f, "<h1>User Listing</h1>")?;
        self.filters(f)?;

        writeln!(f, r#"<table class="user-table">"#)?;
        self.head(f)?;
        writeln!(f, "<tbody>")?;
        for user in &self.state.users {
            Self::row(f, user)?;
        }
        writeln!(f, "</tbody>")?;
        writeln!(f, "</table>")?;

        if self.state.loading {
            writeln!(f, r#"<p class="loading">Loading...</p>"#)?;
        }
        writeln!(f, "</div>")
    }
}

fn option(f: &mut fmt::Formatter<'_>, value: &str, label: &str, selected: bool) -> fmt::Result {
    let selected = if selected { " selected" } else { "" };
    writeln!(
        f,
        "<option value=\"{}\"{}>{}</option>",
        Escaped(value),
        selected,
        Escaped(label)
    )
}

/// Text with HTML special characters escaped.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&#39;")?,
                c => write!(f, "{}", c)?,
            }
        }
        Ok(())
    }
}
