//! Typed parsing of scenario data tables.
//!
//! Gherkin tables arrive as rows of strings with a header row. Each entity
//! declares the columns it requires and the ones it accepts optionally via
//! [`FromRow::COLUMNS`]; a missing required column or an unparseable cell is
//! a [`HarnessError::Configuration`], because it means the feature file is
//! wrong rather than the service.
//!
//! ```rust
//! use petstore_bdd::model::PetRequest;
//! use petstore_bdd::table::{DataTable, FromRow};
//!
//! let table = DataTable::from_rows(vec![
//!     vec!["name".into(), "status".into(), "tags".into()],
//!     vec!["Rex".into(), "available".into(), "friendly, loyal".into()],
//! ])
//! .expect("well-formed table");
//! let pet = PetRequest::from_row(&table.first_row().expect("one row")).expect("pet");
//! assert_eq!(pet.name, "Rex");
//! assert_eq!(pet.tags.len(), 2);
//! ```

use crate::error::{HarnessError, Result};
use itertools::Itertools;
use crate::model::{Category, Credentials, OrderRequest, PetRequest, Tag, UserRequest};
use std::str::FromStr;

/// Declared column set for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    /// Columns that must be present and non-empty.
    pub required: &'static [&'static str],
    /// Columns that may be omitted or left blank.
    pub optional: &'static [&'static str],
}

/// Gherkin data table with a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Build a table from raw rows, treating the first row as the header.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] when the table is empty, has
    /// duplicate header names, or a row width differs from the header.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Self> {
        let mut iter = rows.into_iter();
        let header: Vec<String> = iter
            .next()
            .ok_or_else(|| HarnessError::configuration("data table has no header row"))?
            .into_iter()
            .map(|cell| cell.trim().to_owned())
            .collect();
        if let Some(name) = header.iter().duplicates().next() {
            return Err(HarnessError::configuration(format!(
                "data table repeats column '{name}'"
            )));
        }
        let body: Vec<Vec<String>> = iter.collect();
        if let Some((index, row)) = body
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != header.len())
        {
            return Err(HarnessError::configuration(format!(
                "data table row {} has {} cells but the header has {}",
                index + 1,
                row.len(),
                header.len()
            )));
        }
        Ok(Self { header, rows: body })
    }

    /// Column names in header order.
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data rows as column-keyed views.
    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.rows.iter().map(|cells| TableRow {
            header: &self.header,
            cells,
        })
    }

    /// The first data row; scenario tables describe one entity each.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] when the table has no data
    /// rows.
    pub fn first_row(&self) -> Result<TableRow<'_>> {
        self.rows()
            .next()
            .ok_or_else(|| HarnessError::configuration("data table has no data rows"))
    }
}

/// One data row, addressed by column name.
#[derive(Debug, Clone, Copy)]
pub struct TableRow<'a> {
    header: &'a [String],
    cells: &'a [String],
}

impl<'a> TableRow<'a> {
    /// Trimmed cell for `column`, or `None` when the column is absent or the
    /// cell is blank.
    #[must_use]
    pub fn optional(&self, column: &str) -> Option<&'a str> {
        self.header
            .iter()
            .zip(self.cells)
            .find(|(name, _)| name.as_str() == column)
            .map(|(_, cell)| cell.trim())
            .filter(|cell| !cell.is_empty())
    }

    /// Trimmed cell for a required `column`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] naming the column when it is
    /// absent or blank.
    pub fn required(&self, column: &str) -> Result<&'a str> {
        self.optional(column).ok_or_else(|| {
            HarnessError::configuration(format!("missing required column '{column}'"))
        })
    }

    /// Parse an optional cell with [`FromStr`].
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] when the cell does not parse.
    pub fn parse_optional<T: FromStr>(&self, column: &str) -> Result<Option<T>> {
        self.optional(column)
            .map(|cell| parse_cell(column, cell))
            .transpose()
    }

    /// Parse a required cell with [`FromStr`].
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] when the cell is missing or
    /// does not parse.
    pub fn parse_required<T: FromStr>(&self, column: &str) -> Result<T> {
        parse_cell(column, self.required(column)?)
    }

    /// Comma-separated list cell, trimmed, with blanks dropped.
    #[must_use]
    pub fn list(&self, column: &str) -> Vec<String> {
        self.optional(column)
            .map(|cell| {
                cell.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Check the row against a declared column set.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] for the first missing required
    /// column, or for a column that is neither required nor optional.
    pub fn validate(&self, columns: Columns) -> Result<()> {
        for column in columns.required {
            self.required(column)?;
        }
        if let Some(unknown) = self.header.iter().find(|name| {
            !columns.required.contains(&name.as_str()) && !columns.optional.contains(&name.as_str())
        }) {
            return Err(HarnessError::configuration(format!(
                "unexpected column '{unknown}'"
            )));
        }
        Ok(())
    }
}

fn parse_cell<T: FromStr>(column: &str, cell: &str) -> Result<T> {
    cell.parse().map_err(|_| {
        HarnessError::configuration(format!("column '{column}' has unparseable value '{cell}'"))
    })
}

/// Entities that can be built from one scenario table row.
pub trait FromRow: Sized {
    /// Columns this entity reads.
    const COLUMNS: Columns;

    /// Build the entity from a row already known to satisfy [`Self::COLUMNS`].
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] when a cell does not parse.
    fn build(row: &TableRow<'_>) -> Result<Self>;

    /// Validate `row` against [`Self::COLUMNS`] and build the entity.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] for missing, unknown or
    /// unparseable columns.
    fn from_row(row: &TableRow<'_>) -> Result<Self> {
        row.validate(Self::COLUMNS)?;
        Self::build(row)
    }
}

impl FromRow for PetRequest {
    const COLUMNS: Columns = Columns {
        required: &["name", "status"],
        optional: &["category", "tags", "photoUrls"],
    };

    fn build(row: &TableRow<'_>) -> Result<Self> {
        Ok(Self {
            name: row.required("name")?.to_owned(),
            category: row.optional("category").map(Category::named),
            photo_urls: row.list("photoUrls"),
            tags: row.list("tags").into_iter().map(Tag::named).collect(),
            status: row.required("status")?.to_owned(),
        })
    }
}

impl FromRow for OrderRequest {
    const COLUMNS: Columns = Columns {
        required: &["petId", "quantity", "status"],
        optional: &["complete", "shipDate"],
    };

    fn build(row: &TableRow<'_>) -> Result<Self> {
        Ok(Self {
            id: None,
            pet_id: Some(row.parse_required("petId")?),
            quantity: Some(row.parse_required("quantity")?),
            ship_date: row.optional("shipDate").map(str::to_owned),
            status: Some(row.required("status")?.to_owned()),
            complete: Some(row.parse_optional("complete")?.unwrap_or(false)),
        })
    }
}

impl FromRow for UserRequest {
    const COLUMNS: Columns = Columns {
        required: &["username", "password"],
        optional: &["firstName", "lastName", "email", "phone", "userStatus"],
    };

    fn build(row: &TableRow<'_>) -> Result<Self> {
        Ok(Self {
            username: row.required("username")?.to_owned(),
            first_name: row.optional("firstName").map(str::to_owned),
            last_name: row.optional("lastName").map(str::to_owned),
            email: row.optional("email").map(str::to_owned),
            password: row.required("password")?.to_owned(),
            phone: row.optional("phone").map(str::to_owned),
            user_status: row.parse_optional("userStatus")?.unwrap_or(0),
        })
    }
}

impl FromRow for Credentials {
    const COLUMNS: Columns = Columns {
        required: &["username", "password"],
        optional: &[],
    };

    fn build(row: &TableRow<'_>) -> Result<Self> {
        Ok(Self {
            username: row.required("username")?.to_owned(),
            password: row.required("password")?.to_owned(),
        })
    }
}

/// Parse the first row of `rows` into `T`.
///
/// # Errors
///
/// Returns [`HarnessError::Configuration`] when the table is malformed or
/// the row does not satisfy `T`'s columns.
pub fn parse_first<T: FromRow>(rows: Vec<Vec<String>>) -> Result<T> {
    let table = DataTable::from_rows(rows)?;
    T::from_row(&table.first_row()?)
}
