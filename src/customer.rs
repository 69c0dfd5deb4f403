//! Customer directory.
//!
//! Customer CRUD lives in the outer API layer; the engine only reads the
//! fields that parametrize a conversion: the per-customer spread multiplier,
//! the affiliate link and the PIX key used to route inbound deposits.

use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CustomerError {
    fn from(e: sqlx::Error) -> Self {
        CustomerError::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CustomerProfile {
    pub customer_id: i64,
    pub pix_key: Option<String>,
    pub spread_multiplier: Decimal,
    pub affiliate_customer_id: Option<i64>,
}

impl CustomerProfile {
    /// Profile used when the directory has no row for the customer:
    /// base spread, no affiliate.
    pub fn default_for(customer_id: i64) -> Self {
        Self {
            customer_id,
            pix_key: None,
            spread_multiplier: Decimal::ONE,
            affiliate_customer_id: None,
        }
    }
}

pub struct CustomerDirectory {
    pool: PgPool,
}

impl CustomerDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, customer_id: i64) -> Result<CustomerProfile, CustomerError> {
        let row = sqlx::query(
            "SELECT customer_id, pix_key, spread_multiplier, affiliate_customer_id
             FROM customers_tb WHERE customer_id = $1",
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match row {
            Some(row) => row_to_profile(&row),
            None => CustomerProfile::default_for(customer_id),
        })
    }

    pub async fn find_by_pix_key(
        &self,
        pix_key: &str,
    ) -> Result<Option<CustomerProfile>, CustomerError> {
        let row = sqlx::query(
            "SELECT customer_id, pix_key, spread_multiplier, affiliate_customer_id
             FROM customers_tb WHERE pix_key = $1",
        )
        .bind(pix_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_profile(&r)))
    }

    /// Insert or update a profile (used by fixtures and the admin layer).
    pub async fn upsert(&self, profile: &CustomerProfile) -> Result<(), CustomerError> {
        sqlx::query(
            r#"
            INSERT INTO customers_tb (customer_id, pix_key, spread_multiplier, affiliate_customer_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (customer_id) DO UPDATE SET
                pix_key = EXCLUDED.pix_key,
                spread_multiplier = EXCLUDED.spread_multiplier,
                affiliate_customer_id = EXCLUDED.affiliate_customer_id
            "#,
        )
        .bind(profile.customer_id)
        .bind(&profile.pix_key)
        .bind(profile.spread_multiplier)
        .bind(profile.affiliate_customer_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn row_to_profile(row: &sqlx::postgres::PgRow) -> CustomerProfile {
    CustomerProfile {
        customer_id: row.get("customer_id"),
        pix_key: row.get("pix_key"),
        spread_multiplier: row.get("spread_multiplier"),
        affiliate_customer_id: row.get("affiliate_customer_id"),
    }
}
