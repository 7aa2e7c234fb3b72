//! # Daily Log Repository
//!
//! Database operations for cash-drawer sessions.
//!
//! ## Daily Log Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Daily Log Lifecycle                               │
//! │                                                                         │
//! │  1. OPEN                                                               │
//! │     └── open() → DailyLog { status: OPEN, starting_cash }              │
//! │                                                                         │
//! │  2. RECORD SALES (TransactionRepository)                               │
//! │     └── insert() only while the log is OPEN                            │
//! │                                                                         │
//! │  3. BALANCE (any time, as often as needed)                             │
//! │     └── balance() → DayBalance (read-only snapshot)                    │
//! │                                                                         │
//! │  4. CLOSE                                                              │
//! │     └── close() → DailyLog { status: CLOSED } + DayClose               │
//! │     └── (status flip and final snapshot in one DB transaction)         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::transaction;
use emis_core::{
    balance_day, reconcile, CoreError, DailyLog, DayBalance, DayClose, DayStatus, Money,
};

/// Fetches one log through any executor (pool or open transaction).
pub(crate) async fn fetch_log<'e, E>(executor: E, id: i64) -> DbResult<Option<DailyLog>>
where
    E: SqliteExecutor<'e>,
{
    let log = sqlx::query_as::<_, DailyLog>(
        r#"
        SELECT
            id, location_id, date,
            starting_cash_cents, closing_cash_cents, deposit_cents,
            status, created_at, closed_at
        FROM daily_logs
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(log)
}

/// Repository for daily log database operations.
#[derive(Debug, Clone)]
pub struct DailyLogRepository {
    pool: SqlitePool,
}

impl DailyLogRepository {
    /// Creates a new DailyLogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DailyLogRepository { pool }
    }

    /// Opens a new drawer session for a location.
    ///
    /// The location check and the insert are one statement. Several logs
    /// may exist for the same location and date.
    ///
    /// ## Errors
    /// * `CoreError::LocationNotFound` - unknown `location_id`
    /// * `CoreError::InvalidAmount` - negative starting cash
    pub async fn open(
        &self,
        location_id: i64,
        starting_cash: Money,
        date: NaiveDate,
    ) -> DbResult<DailyLog> {
        if starting_cash.is_negative() {
            return Err(CoreError::InvalidAmount {
                field: "starting_cash".to_string(),
                reason: "a drawer cannot start with negative cash".to_string(),
            }
            .into());
        }

        let now = Utc::now();

        debug!(location_id, starting_cash = %starting_cash, %date, "Opening daily log");

        let result = sqlx::query(
            r#"
            INSERT INTO daily_logs (
                location_id, date,
                starting_cash_cents, closing_cash_cents, deposit_cents,
                status, created_at
            )
            SELECT ?1, ?2, ?3, 0, 0, ?4, ?5
            WHERE EXISTS (SELECT 1 FROM locations WHERE id = ?1)
            "#,
        )
        .bind(location_id)
        .bind(date)
        .bind(starting_cash.cents())
        .bind(DayStatus::Open)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::LocationNotFound(location_id).into());
        }

        let log = DailyLog {
            id: result.last_insert_rowid(),
            location_id,
            date,
            starting_cash_cents: starting_cash.cents(),
            closing_cash_cents: 0,
            deposit_cents: 0,
            status: DayStatus::Open,
            created_at: now,
            closed_at: None,
        };

        info!(log_id = log.id, location_id, "Day started");
        Ok(log)
    }

    /// Gets a daily log by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<DailyLog>> {
        fetch_log(&self.pool, id).await
    }

    /// Lists a location's logs, newest first.
    pub async fn list_for_location(&self, location_id: i64) -> DbResult<Vec<DailyLog>> {
        let logs = sqlx::query_as::<_, DailyLog>(
            r#"
            SELECT
                id, location_id, date,
                starting_cash_cents, closing_cash_cents, deposit_cents,
                status, created_at, closed_at
            FROM daily_logs
            WHERE location_id = ?1
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(location_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    /// Computes the balance of one log from a consistent snapshot.
    ///
    /// The log and its transactions are read inside one DB transaction, so
    /// a sale recorded concurrently is either fully counted or not at all.
    /// Works for OPEN and CLOSED logs alike.
    pub async fn balance(&self, id: i64) -> DbResult<DayBalance> {
        let mut tx = self.pool.begin().await?;

        let log = fetch_log(&mut *tx, id)
            .await?
            .ok_or(CoreError::DailyLogNotFound(id))?;
        let transactions = transaction::fetch_for_log(&mut *tx, id).await?;

        tx.commit().await?;

        let balance = balance_day(&log, &transactions);
        debug!(
            log_id = id,
            transaction_count = balance.transaction_count,
            total_sales = %balance.total_sales,
            "Day balanced"
        );
        Ok(balance)
    }

    /// Closes an OPEN log with the counted drawer figures.
    ///
    /// ## What This Does
    /// 1. Flips `OPEN → CLOSED` with a guarded UPDATE (only one concurrent
    ///    close can win)
    /// 2. Records closing cash, deposit and `closed_at`
    /// 3. Reads the final balance in the same DB transaction
    ///
    /// ## Errors
    /// * `CoreError::DailyLogNotFound` - unknown id
    /// * `CoreError::DayClosed` - already closed
    pub async fn close(
        &self,
        id: i64,
        closing_cash: Money,
        deposit: Money,
    ) -> DbResult<(DailyLog, DayClose)> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE daily_logs SET
                status = ?2,
                closing_cash_cents = ?3,
                deposit_cents = ?4,
                closed_at = ?5
            WHERE id = ?1 AND status = ?6
            "#,
        )
        .bind(id)
        .bind(DayStatus::Closed)
        .bind(closing_cash.cents())
        .bind(deposit.cents())
        .bind(now)
        .bind(DayStatus::Open)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Nothing was written; dropping `tx` rolls it back.
            return Err(match fetch_log(&mut *tx, id).await? {
                None => CoreError::DailyLogNotFound(id).into(),
                Some(log) => match log.status.close(log.id) {
                    Err(e) => e.into(),
                    Ok(_) => DbError::TransactionFailed(format!(
                        "daily log {} is open but the close did not apply",
                        id
                    )),
                },
            });
        }

        let log = fetch_log(&mut *tx, id)
            .await?
            .ok_or(CoreError::DailyLogNotFound(id))?;
        let transactions = transaction::fetch_for_log(&mut *tx, id).await?;

        tx.commit().await?;

        let close = reconcile(balance_day(&log, &transactions), closing_cash, deposit);

        info!(
            log_id = id,
            closing_cash = %closing_cash,
            deposit = %deposit,
            over_short = %close.over_short,
            "Day closed"
        );
        Ok((log, close))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use emis_core::{NewTransaction, PaymentMethod};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn sale(log_id: i64, cents: i64, method: PaymentMethod) -> NewTransaction {
        NewTransaction {
            daily_log_id: log_id,
            vehicle_make: "2015 Honda Civic".to_string(),
            vin: None,
            plate: None,
            is_dmv: false,
            is_tsi: false,
            is_safety: false,
            is_renewal: false,
            emis_cert_num: None,
            dmv_num: None,
            total_amount: Money::from_cents(cents),
            payment_method: method,
        }
    }

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let shop = db.locations().insert("Taylorsville").await.unwrap();
        (db, shop.id)
    }

    #[tokio::test]
    async fn test_open_and_get() {
        let (db, shop) = setup().await;
        let repo = db.daily_logs();

        let log = repo.open(shop, Money::from_cents(10_000), today()).await.unwrap();
        assert_eq!(log.status, DayStatus::Open);
        assert_eq!(log.starting_cash_cents, 10_000);

        let stored = repo.get_by_id(log.id).await.unwrap().unwrap();
        assert_eq!(stored.id, log.id);
        assert_eq!(stored.location_id, shop);
        assert_eq!(stored.date, today());
        assert_eq!(stored.status, DayStatus::Open);
        assert!(stored.closed_at.is_none());
    }

    #[tokio::test]
    async fn test_open_unknown_location() {
        let (db, shop) = setup().await;

        let err = db
            .daily_logs()
            .open(shop + 99, Money::zero(), today())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::LocationNotFound(_))));
    }

    #[tokio::test]
    async fn test_open_negative_starting_cash() {
        let (db, shop) = setup().await;

        let err = db
            .daily_logs()
            .open(shop, Money::from_cents(-1), today())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::InvalidAmount { .. })));
    }

    #[tokio::test]
    async fn test_same_day_logs_are_distinct() {
        let (db, shop) = setup().await;
        let repo = db.daily_logs();

        let first = repo.open(shop, Money::from_cents(5_000), today()).await.unwrap();
        let second = repo.open(shop, Money::from_cents(7_500), today()).await.unwrap();
        assert_ne!(first.id, second.id);

        let logs = repo.list_for_location(shop).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].id, second.id);
    }

    #[tokio::test]
    async fn test_balance_scenario() {
        let (db, shop) = setup().await;
        let log = db
            .daily_logs()
            .open(shop, Money::from_cents(10_000), today())
            .await
            .unwrap();

        let empty = db.daily_logs().balance(log.id).await.unwrap();
        assert!(empty.total_sales.is_zero());
        assert_eq!(empty.expected_drawer_cash.cents(), 10_000);

        db.transactions().insert(&sale(log.id, 4_000, PaymentMethod::Cash)).await.unwrap();
        db.transactions().insert(&sale(log.id, 2_500, PaymentMethod::Cc)).await.unwrap();

        let b = db.daily_logs().balance(log.id).await.unwrap();
        assert_eq!(b.total_sales.cents(), 6_500);
        assert_eq!(b.cash_sales.cents(), 4_000);
        assert_eq!(b.credit_card_sales.cents(), 2_500);
        assert_eq!(b.expected_drawer_cash.cents(), 14_000);
        assert_eq!(b.transaction_count, 2);

        // Repeat calls give the same answer
        assert_eq!(db.daily_logs().balance(log.id).await.unwrap(), b);
    }

    #[tokio::test]
    async fn test_balance_unknown_log() {
        let (db, _) = setup().await;

        let err = db.daily_logs().balance(404).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::DailyLogNotFound(404))));
    }

    #[tokio::test]
    async fn test_close_records_counts() {
        let (db, shop) = setup().await;
        let log = db
            .daily_logs()
            .open(shop, Money::from_cents(10_000), today())
            .await
            .unwrap();
        db.transactions().insert(&sale(log.id, 4_000, PaymentMethod::Cash)).await.unwrap();

        let (closed, close) = db
            .daily_logs()
            .close(log.id, Money::from_cents(13_900), Money::from_cents(10_000))
            .await
            .unwrap();

        assert_eq!(closed.status, DayStatus::Closed);
        assert_eq!(closed.closing_cash_cents, 13_900);
        assert_eq!(closed.deposit_cents, 10_000);
        assert!(closed.closed_at.is_some());
        assert_eq!(close.balance.expected_drawer_cash.cents(), 14_000);
        assert_eq!(close.over_short.cents(), -100);

        // A closed day can still be balanced
        let b = db.daily_logs().balance(log.id).await.unwrap();
        assert_eq!(b, close.balance);
    }

    #[tokio::test]
    async fn test_close_twice_fails() {
        let (db, shop) = setup().await;
        let repo = db.daily_logs();
        let log = repo.open(shop, Money::zero(), today()).await.unwrap();

        repo.close(log.id, Money::zero(), Money::zero()).await.unwrap();
        let err = repo
            .close(log.id, Money::from_cents(500), Money::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::DayClosed { .. })));

        // The first close's figures stand
        let stored = repo.get_by_id(log.id).await.unwrap().unwrap();
        assert_eq!(stored.closing_cash_cents, 0);
    }

    #[tokio::test]
    async fn test_close_unknown_log() {
        let (db, _) = setup().await;

        let err = db
            .daily_logs()
            .close(77, Money::zero(), Money::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::DailyLogNotFound(77))));
    }
}
