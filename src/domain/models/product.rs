use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Product {
    pub id: String,
    pub farmer_id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub quantity: i64,
    pub image_path: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(draft: NewProduct, image_path: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            farmer_id: draft.farmer_id,
            title: draft.title,
            description: draft.description,
            price: draft.price,
            quantity: draft.quantity,
            image_path,
            created_at: Utc::now(),
        }
    }
}

/// Marketplace row: a product joined with its owner's username.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ProductListing {
    pub id: String,
    pub farmer_id: String,
    pub farmer_name: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub quantity: i64,
    pub image_path: String,
    pub created_at: DateTime<Utc>,
}

/// Input for AddProduct before the image is stored.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub farmer_id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ProductFilter {
    /// Search term as a LIKE pattern with wildcards escaped by `\`.
    /// An empty term matches everything and yields `None`.
    ///
    /// SQLite `LIKE` folds case for ASCII letters only, so `äpfel` does not
    /// match `Äpfel` there; PostgreSQL `ILIKE` folds all letters.
    pub fn search_pattern(&self) -> Option<String> {
        let term = self.search.as_deref()?;
        if term.is_empty() {
            return None;
        }

        let mut pattern = String::with_capacity(term.len() + 2);
        pattern.push('%');
        for c in term.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        Some(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(term: &str) -> ProductFilter {
        ProductFilter { search: Some(term.to_string()), ..Default::default() }
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        assert_eq!(search("tom").search_pattern().as_deref(), Some("%tom%"));
        assert_eq!(search("50%").search_pattern().as_deref(), Some("%50\\%%"));
        assert_eq!(search("a_b").search_pattern().as_deref(), Some("%a\\_b%"));
        assert_eq!(search("c:\\").search_pattern().as_deref(), Some("%c:\\\\%"));
    }

    #[test]
    fn test_empty_search_is_absent() {
        assert!(search("").search_pattern().is_none());
        assert_eq!(search(" ").search_pattern().as_deref(), Some("% %"));
        assert!(ProductFilter::default().search_pattern().is_none());
    }
}
