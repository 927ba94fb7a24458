//! SQLite persistence layer for alarm health reports.
//!
//! This crate stores the two record collections one evaluation run
//! publishes (issue groups and description suggestions) using SQLx with
//! SQLite, and reads them back for the dashboard widgets.
//!
//! # Example
//!
//! ```no_run
//! use alarm_core::IssueTag;
//! use report_store::{IssueGroupRecord, ReportDatabase, ReportStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = ReportDatabase::connect("sqlite:alarm-report.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     db.put_issue_group(&IssueGroupRecord::empty(IssueTag::NoActions)).await?;
//!     let groups = db.scan_issue_groups().await?;
//!     println!("{} issue groups stored", groups.len());
//!
//!     Ok(())
//! }
//! ```

pub mod description;
pub mod error;
pub mod issue_group;
pub mod models;
pub mod retry;
mod store;

pub use error::{Result, StoreError};
pub use models::{AlarmRef, DescriptionRecord, IssueGroupRecord, Report};
pub use retry::RetryConfig;
pub use store::ReportStore;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// SQLite-backed report store.
#[derive(Debug, Clone)]
pub struct ReportDatabase {
    pool: SqlitePool,
    retry: RetryConfig,
}

impl ReportDatabase {
    /// Default pool size for database connections.
    /// One writer per run plus a handful of concurrent widget reads.
    const DEFAULT_POOL_SIZE: u32 = 5;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> report_store::Result<()> {
    /// // File database
    /// let db = report_store::ReportDatabase::connect("sqlite:data/report.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = report_store::ReportDatabase::connect_with_pool_size("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to report database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self {
            pool,
            retry: RetryConfig::default(),
        })
    }

    /// Replace the retry policy used for writes.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running report database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the retry policy used for writes.
    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
