use serde::{Deserialize, Serialize};

use crate::errors::{CatalogError, Result};

/// A persisted catalog record
///
/// `id` is assigned by the store on insert and never changes. Titles and
/// authors are not unique: several books may share either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Auto-assigned row identity
    pub id: i64,

    pub title: String,

    pub author: String,

    /// Publication year
    pub year: i32,

    /// Price, always finite and non-negative
    pub price: f64,
}

impl Book {
    /// The insert payload this record would round-trip through (identity dropped)
    pub fn to_new_book(&self) -> NewBook {
        NewBook {
            title: self.title.clone(),
            author: self.author.clone(),
            year: self.year,
            price: self.price,
        }
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {}, Título: {}, Autor: {}, Ano: {}, Preço: {}",
            self.id, self.title, self.author, self.year, self.price
        )
    }
}

/// A validated insert payload
///
/// Fields are private so every value in circulation went through `new`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    title: String,
    author: String,
    year: i32,
    price: f64,
}

impl NewBook {
    /// Validate and build an insert payload
    ///
    /// Title and author are trimmed; both must be non-empty afterwards.
    ///
    /// # Errors
    ///
    /// - `EmptyTitle` / `EmptyAuthor` for blank text
    /// - `NonFinitePrice` for NaN or infinity
    /// - `NegativePrice` for prices below zero
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        price: f64,
    ) -> Result<Self> {
        let title = title.into().trim().to_string();
        let author = author.into().trim().to_string();

        if title.is_empty() {
            return Err(CatalogError::EmptyTitle);
        }
        if author.is_empty() {
            return Err(CatalogError::EmptyAuthor);
        }
        validate_price(price)?;

        Ok(Self {
            title,
            author,
            year,
            price,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

/// Check a price against the catalog's rules (finite, non-negative)
///
/// Shared by inserts and bulk price updates.
pub fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() {
        return Err(CatalogError::NonFinitePrice);
    }
    if price < 0.0 {
        return Err(CatalogError::NegativePrice { price });
    }
    Ok(())
}
