//! Payout persistence.
//!
//! State updates are CAS-guarded and validated against the FSM table.
//! Row creation happens inside the saga's transaction, atomically with
//! the reservation debit.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};

use super::error::PayoutError;
use super::state::PayoutState;
use super::types::Payout;

const SELECT_COLUMNS: &str = "payout_id, customer_id, amount, pix_key, request_id, debit_tx_id,
    end_to_end_id, state, error_message, created_at, updated_at";

pub struct PayoutDb {
    pool: PgPool,
}

impl PayoutDb {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert the payout row inside the caller's transaction (the same one
    /// that carries the reservation debit).
    pub async fn insert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        customer_id: i64,
        amount: rust_decimal::Decimal,
        pix_key: &str,
        request_id: &str,
        debit_tx_id: i64,
    ) -> Result<i64, PayoutError> {
        let payout_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO payouts_tb
                (customer_id, amount, pix_key, request_id, debit_tx_id, state)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING payout_id
            "#,
        )
        .bind(customer_id)
        .bind(amount)
        .bind(pix_key)
        .bind(request_id)
        .bind(debit_tx_id)
        .bind(PayoutState::Pending.id())
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PayoutError::DuplicateRequest(request_id.to_string())
            } else {
                e.into()
            }
        })?;

        Ok(payout_id)
    }

    pub async fn get(&self, payout_id: i64) -> Result<Option<Payout>, PayoutError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM payouts_tb WHERE payout_id = $1"
        ))
        .bind(payout_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_payout(&r)).transpose()
    }

    pub async fn get_required(&self, payout_id: i64) -> Result<Payout, PayoutError> {
        self.get(payout_id)
            .await?
            .ok_or_else(|| PayoutError::NotFound(payout_id.to_string()))
    }

    pub async fn get_by_request_id(
        &self,
        request_id: &str,
    ) -> Result<Option<Payout>, PayoutError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM payouts_tb WHERE request_id = $1"
        ))
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_payout(&r)).transpose()
    }

    pub async fn get_by_end_to_end_id(
        &self,
        end_to_end_id: &str,
    ) -> Result<Option<Payout>, PayoutError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM payouts_tb WHERE end_to_end_id = $1"
        ))
        .bind(end_to_end_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_payout(&r)).transpose()
    }

    /// Atomic CAS state update, validated against the transition table.
    pub async fn update_state_if(
        &self,
        payout_id: i64,
        expected: PayoutState,
        new: PayoutState,
    ) -> Result<bool, PayoutError> {
        if !expected.can_transition(new) {
            return Err(PayoutError::InvalidStateTransition {
                from: expected,
                to: new,
            });
        }

        let result = sqlx::query(
            "UPDATE payouts_tb SET state = $1, updated_at = NOW()
             WHERE payout_id = $2 AND state = $3",
        )
        .bind(new.id())
        .bind(payout_id)
        .bind(expected.id())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// CAS state update carrying an error message.
    pub async fn update_state_with_error(
        &self,
        payout_id: i64,
        expected: PayoutState,
        new: PayoutState,
        error: &str,
    ) -> Result<bool, PayoutError> {
        if !expected.can_transition(new) {
            return Err(PayoutError::InvalidStateTransition {
                from: expected,
                to: new,
            });
        }

        let result = sqlx::query(
            "UPDATE payouts_tb
             SET state = $1, error_message = $2, updated_at = NOW()
             WHERE payout_id = $3 AND state = $4",
        )
        .bind(new.id())
        .bind(error)
        .bind(payout_id)
        .bind(expected.id())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Store the bank correlation id once the rail assigns it.
    pub async fn set_end_to_end_id(
        &self,
        payout_id: i64,
        end_to_end_id: &str,
    ) -> Result<(), PayoutError> {
        sqlx::query(
            "UPDATE payouts_tb SET end_to_end_id = $1, updated_at = NOW()
             WHERE payout_id = $2",
        )
        .bind(end_to_end_id)
        .bind(payout_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

fn row_to_payout(row: &PgRow) -> Result<Payout, PayoutError> {
    let state_id: i16 = row.get("state");
    let state = PayoutState::from_id(state_id)
        .ok_or_else(|| PayoutError::DatabaseError(format!("Invalid state: {}", state_id)))?;

    Ok(Payout {
        payout_id: row.get("payout_id"),
        customer_id: row.get("customer_id"),
        amount: row.get("amount"),
        pix_key: row.get("pix_key"),
        request_id: row.get("request_id"),
        debit_tx_id: row.get("debit_tx_id"),
        end_to_end_id: row.get("end_to_end_id"),
        state,
        error_message: row.get("error_message"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
