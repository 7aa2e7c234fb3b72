//! # Transaction Repository
//!
//! Database operations for vehicle service sales. Transactions are
//! append-only: there is no update or delete.

use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::daily_log;
use emis_core::{CoreError, DayStatus, NewTransaction, Transaction};

/// Fetches every transaction of one log, oldest first, through any
/// executor (pool or open transaction).
pub(crate) async fn fetch_for_log<'e, E>(executor: E, daily_log_id: i64) -> DbResult<Vec<Transaction>>
where
    E: SqliteExecutor<'e>,
{
    let transactions = sqlx::query_as::<_, Transaction>(
        r#"
        SELECT
            id, daily_log_id,
            vehicle_make, vin, plate,
            is_dmv, is_tsi, is_safety, is_renewal,
            emis_cert_num, dmv_num,
            total_amount_cents, payment_method, created_at
        FROM transactions
        WHERE daily_log_id = ?1
        ORDER BY id
        "#,
    )
    .bind(daily_log_id)
    .fetch_all(executor)
    .await?;

    Ok(transactions)
}

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Records a validated transaction against an OPEN daily log.
    ///
    /// ## Guarded Insert
    /// ```text
    /// INSERT ... SELECT ... WHERE EXISTS (log ?1 AND status = OPEN)
    ///      │
    ///      ├── 1 row  → stored, id assigned
    ///      └── 0 rows → look the log up to explain why:
    ///                   missing → DailyLogNotFound
    ///                   CLOSED  → DayClosed
    /// ```
    /// The status check and the write are one statement, so a transaction
    /// can never land in a day that a concurrent close already flipped.
    pub async fn insert(&self, new: &NewTransaction) -> DbResult<Transaction> {
        let now = Utc::now();

        debug!(
            daily_log_id = new.daily_log_id,
            amount = %new.total_amount,
            method = %new.payment_method,
            "Recording transaction"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO transactions (
                daily_log_id,
                vehicle_make, vin, plate,
                is_dmv, is_tsi, is_safety, is_renewal,
                emis_cert_num, dmv_num,
                total_amount_cents, payment_method, created_at
            )
            SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13
            WHERE EXISTS (
                SELECT 1 FROM daily_logs WHERE id = ?1 AND status = ?14
            )
            "#,
        )
        .bind(new.daily_log_id)
        .bind(&new.vehicle_make)
        .bind(&new.vin)
        .bind(&new.plate)
        .bind(new.is_dmv)
        .bind(new.is_tsi)
        .bind(new.is_safety)
        .bind(new.is_renewal)
        .bind(&new.emis_cert_num)
        .bind(&new.dmv_num)
        .bind(new.total_amount.cents())
        .bind(new.payment_method)
        .bind(now)
        .bind(DayStatus::Open)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.explain_rejected_insert(new.daily_log_id).await);
        }

        Ok(Transaction {
            id: result.last_insert_rowid(),
            daily_log_id: new.daily_log_id,
            vehicle_make: new.vehicle_make.clone(),
            vin: new.vin.clone(),
            plate: new.plate.clone(),
            is_dmv: new.is_dmv,
            is_tsi: new.is_tsi,
            is_safety: new.is_safety,
            is_renewal: new.is_renewal,
            emis_cert_num: new.emis_cert_num.clone(),
            dmv_num: new.dmv_num.clone(),
            total_amount_cents: new.total_amount.cents(),
            payment_method: new.payment_method,
            created_at: now,
        })
    }

    async fn explain_rejected_insert(&self, daily_log_id: i64) -> DbError {
        match daily_log::fetch_log(&self.pool, daily_log_id).await {
            Ok(None) => CoreError::DailyLogNotFound(daily_log_id).into(),
            Ok(Some(log)) => match log.ensure_open() {
                Err(e) => e.into(),
                Ok(()) => DbError::TransactionFailed(format!(
                    "daily log {} is open but the insert did not apply",
                    daily_log_id
                )),
            },
            Err(e) => e,
        }
    }

    /// Gets a transaction by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT
                id, daily_log_id,
                vehicle_make, vin, plate,
                is_dmv, is_tsi, is_safety, is_renewal,
                emis_cert_num, dmv_num,
                total_amount_cents, payment_method, created_at
            FROM transactions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Lists a log's transactions in the order they were recorded.
    pub async fn list_for_log(&self, daily_log_id: i64) -> DbResult<Vec<Transaction>> {
        fetch_for_log(&self.pool, daily_log_id).await
    }

    /// Counts a log's transactions.
    pub async fn count_for_log(&self, daily_log_id: i64) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE daily_log_id = ?1")
                .bind(daily_log_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;
    use emis_core::{Money, PaymentMethod};

    fn sale(log_id: i64, cents: i64, method: PaymentMethod) -> NewTransaction {
        NewTransaction {
            daily_log_id: log_id,
            vehicle_make: "2011 Ford F-150".to_string(),
            vin: Some("1FTFW1ET5BFA00001".to_string()),
            plate: Some("ABC-123".to_string()),
            is_dmv: true,
            is_tsi: false,
            is_safety: true,
            is_renewal: false,
            emis_cert_num: Some("E-5521".to_string()),
            dmv_num: None,
            total_amount: Money::from_cents(cents),
            payment_method: method,
        }
    }

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let shop = db.locations().insert("West Jordan").await.unwrap();
        let log = db
            .daily_logs()
            .open(
                shop.id,
                Money::from_cents(10_000),
                NaiveDate::from_ymd_opt(2026, 10, 14).unwrap(),
            )
            .await
            .unwrap();
        (db, log.id)
    }

    #[tokio::test]
    async fn test_insert_round_trips_fields() {
        let (db, log_id) = setup().await;
        let repo = db.transactions();

        let stored = repo.insert(&sale(log_id, 3_999, PaymentMethod::Fleet)).await.unwrap();
        let fetched = repo.get_by_id(stored.id).await.unwrap().unwrap();

        assert_eq!(fetched.daily_log_id, log_id);
        assert_eq!(fetched.vehicle_make, "2011 Ford F-150");
        assert_eq!(fetched.vin.as_deref(), Some("1FTFW1ET5BFA00001"));
        assert_eq!(fetched.plate.as_deref(), Some("ABC-123"));
        assert!(fetched.is_dmv && fetched.is_safety);
        assert!(!fetched.is_tsi && !fetched.is_renewal);
        assert_eq!(fetched.emis_cert_num.as_deref(), Some("E-5521"));
        assert!(fetched.dmv_num.is_none());
        assert_eq!(fetched.total_amount_cents, 3_999);
        assert_eq!(fetched.payment_method, PaymentMethod::Fleet);
    }

    #[tokio::test]
    async fn test_list_and_count() {
        let (db, log_id) = setup().await;
        let repo = db.transactions();

        let a = repo.insert(&sale(log_id, 100, PaymentMethod::Cash)).await.unwrap();
        let b = repo.insert(&sale(log_id, 200, PaymentMethod::Check)).await.unwrap();

        let listed: Vec<_> = repo.list_for_log(log_id).await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(listed, vec![a.id, b.id]);
        assert_eq!(repo.count_for_log(log_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unknown_log_rejected() {
        let (db, log_id) = setup().await;

        let err = db
            .transactions()
            .insert(&sale(log_id + 1, 100, PaymentMethod::Cash))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::DailyLogNotFound(_))));
    }

    #[tokio::test]
    async fn test_closed_log_rejected() {
        let (db, log_id) = setup().await;
        db.daily_logs()
            .close(log_id, Money::from_cents(10_000), Money::zero())
            .await
            .unwrap();

        let err = db
            .transactions()
            .insert(&sale(log_id, 100, PaymentMethod::Cash))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::DayClosed { .. })));
        assert_eq!(db.transactions().count_for_log(log_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_logs_are_isolated() {
        let (db, first) = setup().await;
        let shop = db.locations().insert("Sandy").await.unwrap();
        let second = db
            .daily_logs()
            .open(shop.id, Money::zero(), NaiveDate::from_ymd_opt(2026, 10, 14).unwrap())
            .await
            .unwrap()
            .id;

        db.transactions().insert(&sale(first, 4_000, PaymentMethod::Cash)).await.unwrap();
        db.transactions().insert(&sale(second, 900, PaymentMethod::Cash)).await.unwrap();

        let a = db.daily_logs().balance(first).await.unwrap();
        let b = db.daily_logs().balance(second).await.unwrap();
        assert_eq!(a.total_sales.cents(), 4_000);
        assert_eq!(b.total_sales.cents(), 900);
        assert_eq!(b.transaction_count, 1);
    }

    // In-memory databases are limited to one connection, so the tests below
    // use a file database to get real concurrent writers.
    struct FileDb {
        db: Database,
        path: std::path::PathBuf,
    }

    impl FileDb {
        async fn open(name: &str) -> Self {
            let path = std::env::temp_dir()
                .join(format!("emis-{}-{}.db", name, std::process::id()));
            remove_db_files(&path);
            let db = Database::new(DbConfig::new(&path).max_connections(5))
                .await
                .unwrap();
            FileDb { db, path }
        }

        async fn cleanup(self) {
            self.db.close().await;
            remove_db_files(&self.path);
        }
    }

    fn remove_db_files(path: &std::path::Path) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = path.as_os_str().to_owned();
            file.push(suffix);
            std::fs::remove_file(file).ok();
        }
    }

    async fn open_day(db: &Database, shop: &str) -> i64 {
        let shop = db.locations().insert(shop).await.unwrap();
        db.daily_logs()
            .open(
                shop.id,
                Money::from_cents(10_000),
                NaiveDate::from_ymd_opt(2026, 10, 14).unwrap(),
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_all_recorded() {
        let file = FileDb::open("concurrent-inserts").await;
        let log_id = open_day(&file.db, "Taylorsville").await;

        let handles: Vec<_> = (0..60)
            .map(|i| {
                let repo = file.db.transactions();
                tokio::spawn(async move {
                    repo.insert(&sale(log_id, 100 + i, PaymentMethod::Cash)).await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let balance = file.db.daily_logs().balance(log_id).await.unwrap();
        assert_eq!(balance.transaction_count, 60);
        // 60 * 100 + (0 + 1 + ... + 59)
        assert_eq!(balance.cash_sales.cents(), 6_000 + 1_770);

        file.cleanup().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_inserts_racing_close_never_land_after_close() {
        let file = FileDb::open("insert-close-race").await;
        let log_id = open_day(&file.db, "Draper").await;

        let mut inserts = Vec::new();
        for i in 0..40 {
            let repo = file.db.transactions();
            inserts.push(tokio::spawn(async move {
                repo.insert(&sale(log_id, 500 + i, PaymentMethod::Cash)).await
            }));
        }

        let logs = file.db.daily_logs();
        let close = tokio::spawn(async move {
            logs.close(log_id, Money::from_cents(10_000), Money::zero()).await
        });

        let mut accepted = 0u32;
        for handle in inserts {
            match handle.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(e) => assert!(
                    matches!(e, DbError::Core(CoreError::DayClosed { .. })),
                    "unexpected insert error: {e}"
                ),
            }
        }

        let (closed, snapshot) = close.await.unwrap().unwrap();
        assert_eq!(closed.status, DayStatus::Closed);
        assert_eq!(snapshot.balance.transaction_count, accepted);
        assert_eq!(
            file.db.transactions().count_for_log(log_id).await.unwrap(),
            i64::from(accepted)
        );

        file.cleanup().await;
    }
}
