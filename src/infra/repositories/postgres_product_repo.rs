use crate::domain::{
    models::product::{Product, ProductFilter, ProductListing},
    ports::ProductRepository
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Postgres, PgPool};
use tracing::error;

const LISTING_SELECT: &str = "SELECT p.id, p.farmer_id, u.username AS farmer_name, p.title, p.description, p.price, p.quantity, p.image_path, p.created_at FROM products p JOIN users u ON p.farmer_id = u.id WHERE 1=1";

pub struct PostgresProductRepo {
    pool: PgPool,
}

impl PostgresProductRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepo {
    async fn create(&self, product: &Product) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(
            "INSERT INTO products (id, farmer_id, title, description, price, quantity, image_path, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *"
        )
            .bind(&product.id)
            .bind(&product.farmer_id)
            .bind(&product.title)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.quantity)
            .bind(&product.image_path)
            .bind(product.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Postgres Product Insert Failed: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    // ILIKE folds case beyond ASCII.
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<ProductListing>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(LISTING_SELECT);

        if let Some(pattern) = filter.search_pattern() {
            qb.push(" AND (p.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR p.description ILIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }
        if let Some(min) = filter.min_price {
            qb.push(" AND p.price >= ").push_bind(min);
        }
        if let Some(max) = filter.max_price {
            qb.push(" AND p.price <= ").push_bind(max);
        }
        qb.push(" ORDER BY p.created_at ASC, p.id ASC");

        qb.build_query_as::<ProductListing>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_farmer(&self, farmer_id: &str) -> Result<Vec<Product>, AppError> {
        sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE farmer_id = $1 ORDER BY created_at ASC, id ASC"
        )
            .bind(farmer_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_owned(&self, id: &str, farmer_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND farmer_id = $2")
            .bind(id)
            .bind(farmer_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Postgres Product Deletion Failed: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
