use crate::domain::models::product::ProductFilter;
use crate::error::AppError;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct AddToCartRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// Raw query string; blank price fields count as absent.
#[derive(Deserialize, Default)]
pub struct ListProductsQuery {
    pub search: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

impl ListProductsQuery {
    pub fn into_filter(self) -> Result<ProductFilter, AppError> {
        Ok(ProductFilter {
            search: self.search,
            min_price: parse_price("min_price", self.min_price)?,
            max_price: parse_price("max_price", self.max_price)?,
        })
    }
}

fn parse_price(field: &str, raw: Option<String>) -> Result<Option<f64>, AppError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("{} must be a number", field))),
    }
}
