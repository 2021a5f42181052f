#[cfg(feature = "ssr")]
mod db_impl {
    use crate::error::StoreError;
    use crate::models::review::{NewReview, ReviewId, StoredReview};
    use crate::store::{InsertionHub, RemoteReviewStore, Subscription, SubscriptionId};
    use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
    use leptos::logging;
    use leptos::logging::log;
    use rusqlite::{params, Connection, Row};
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use uuid::Uuid;


    /// SQLite-backed review store shared by the HTTP handlers.
    #[derive(Debug)]
    pub struct SqliteReviewStore {
        conn: Arc<Mutex<Connection>>,
        hub: InsertionHub,
    }

    impl SqliteReviewStore {
        // Create a new database connection
        pub fn new(db_path: &str) -> Result<Self, StoreError> {
            let conn = Connection::open(db_path)?;
            logging::log!("[DATABASE] Connection established at: {}", db_path);
            Ok(SqliteReviewStore {
                conn: Arc::new(Mutex::new(conn)),
                hub: InsertionHub::new(),
            })
        }

        pub async fn create_schema(&self) -> Result<(), StoreError> {
            let conn = self.conn.lock().await;
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS testimonials (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    position TEXT,
                    review TEXT NOT NULL,
                    rating INTEGER,
                    approved INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_testimonials_approved_created
                    ON testimonials (approved, created_at DESC);",
            )
            .map_err(|e| {
                logging::error!("[DATABASE] Failed creating testimonials table: {}", e);
                e
            })?;
            Ok(())
        }

        pub fn subscriber_count(&self) -> usize {
            self.hub.active()
        }
    }

    fn read_row(row: &Row<'_>) -> rusqlite::Result<(StoredReview, String)> {
        let created_at: String = row.get(6)?;
        Ok((
            StoredReview {
                id: ReviewId(row.get(0)?),
                name: row.get(1)?,
                position: row.get(2)?,
                review: row.get(3)?,
                rating: row.get(4)?,
                approved: row.get(5)?,
                created_at: DateTime::<Utc>::MIN_UTC,
            },
            created_at,
        ))
    }

    fn parse_timestamp(id: &ReviewId, raw: &str) -> Result<DateTime<Utc>, StoreError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| StoreError::Malformed(format!("review {id} has bad created_at '{raw}': {e}")))
    }

    impl RemoteReviewStore for SqliteReviewStore {
        async fn query_approved(&self) -> Result<Vec<StoredReview>, StoreError> {
            let conn = self.conn.lock().await;
            let mut stmt = conn.prepare(
                "SELECT id, name, position, review, rating, approved, created_at
                 FROM testimonials
                 WHERE approved = 1
                 ORDER BY created_at DESC, rowid DESC",
            )?;
            let rows = stmt.query_map([], read_row)?;
            let mut result = Vec::new();
            for row in rows {
                let (mut review, created_at) = row?;
                review.created_at = parse_timestamp(&review.id, &created_at)?;
                result.push(review);
            }
            log!("[DATABASE] Fetched {} approved testimonials", result.len());
            Ok(result)
        }

        async fn insert(&self, record: NewReview) -> Result<StoredReview, StoreError> {
            let stored = StoredReview {
                id: ReviewId(Uuid::new_v4().to_string()),
                name: record.name,
                position: Some(record.position),
                review: record.review,
                rating: Some(i64::from(record.rating)),
                approved: record.approved,
                // Stored with microsecond precision; keep the echo identical to a re-read.
                created_at: Utc::now().trunc_subsecs(6),
            };
            {
                let conn = self.conn.lock().await;
                conn.execute(
                    "INSERT INTO testimonials (id, name, position, review, rating, approved, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        stored.id.as_str(),
                        stored.name,
                        stored.position,
                        stored.review,
                        stored.rating,
                        stored.approved,
                        stored.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
                    ],
                )?;
            }
            log!("[DATABASE] Inserted testimonial {}", stored.id);
            let delivered = self.hub.publish(&stored);
            log!("[DATABASE] Broadcast testimonial {} to {} subscribers", stored.id, delivered);
            Ok(stored)
        }

        fn subscribe_insertions(&self) -> Result<Subscription, StoreError> {
            Ok(self.hub.subscribe())
        }

        fn unsubscribe(&self, id: SubscriptionId) {
            self.hub.unsubscribe(id);
        }
    }
}

#[cfg(feature = "ssr")]
pub use db_impl::SqliteReviewStore;
