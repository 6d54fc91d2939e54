// SQLite persistence for the local backend. Monitors are stored as a JSON
// column next to the site row; settings are integer key/value rows.

use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

use crate::models::{Monitor, Site};

const HISTORY_LIMIT_KEY: &str = "history_limit";

pub struct SiteRepo {
    pool: SqlitePool,
}

impl SiteRepo {
    /// Connect to SQLite at `path` (":memory:" for a private in-memory db),
    /// creating parent dirs and the file if missing.
    pub async fn connect(path: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = if path == ":memory:" {
            // Every connection to :memory: is its own database; keep exactly one alive.
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
                .await?
        } else {
            if let Some(parent) = Path::new(path).parent() {
                std::fs::create_dir_all(parent)?;
            }
            let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .busy_timeout(std::time::Duration::from_secs(5))
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
            SqlitePoolOptions::new()
                .max_connections(max_connections)
                .connect_with(opts)
                .await?
        };
        Ok(Self { pool })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sites (
                identifier TEXT PRIMARY KEY,
                name TEXT,
                monitoring INTEGER NOT NULL,
                monitors TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE TABLE IF NOT EXISTS settings (key TEXT PRIMARY KEY, value INTEGER NOT NULL)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    fn parse_site_row(row: &SqliteRow) -> anyhow::Result<Site> {
        let monitors: String = row.try_get("monitors")?;
        let monitors: Vec<Monitor> = serde_json::from_str(&monitors)?;
        Ok(Site {
            identifier: row.try_get("identifier")?,
            name: row.try_get("name")?,
            monitoring: row.try_get("monitoring")?,
            monitors,
        })
    }

    /// All sites in insertion order.
    #[instrument(skip(self), fields(repo = "sites", operation = "list_sites"))]
    pub async fn list_sites(&self) -> anyhow::Result<Vec<Site>> {
        let rows = sqlx::query(
            "SELECT identifier, name, monitoring, monitors FROM sites ORDER BY rowid ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::parse_site_row).collect()
    }

    pub async fn get_site(&self, identifier: &str) -> anyhow::Result<Option<Site>> {
        let row = sqlx::query(
            "SELECT identifier, name, monitoring, monitors FROM sites WHERE identifier = $1",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(Self::parse_site_row).transpose()
    }

    #[instrument(skip(self, site), fields(repo = "sites", operation = "upsert_site", identifier = %site.identifier))]
    pub async fn upsert_site(&self, site: &Site) -> anyhow::Result<()> {
        let monitors = serde_json::to_string(&site.monitors)?;
        sqlx::query(
            "INSERT INTO sites (identifier, name, monitoring, monitors) VALUES ($1, $2, $3, $4)
             ON CONFLICT(identifier) DO UPDATE SET name = excluded.name, monitoring = excluded.monitoring, monitors = excluded.monitors",
        )
        .bind(&site.identifier)
        .bind(&site.name)
        .bind(site.monitoring)
        .bind(&monitors)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// True if a row was removed.
    #[instrument(skip(self), fields(repo = "sites", operation = "delete_site"))]
    pub async fn delete_site(&self, identifier: &str) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM sites WHERE identifier = $1")
            .bind(identifier)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_sites(&self) -> anyhow::Result<usize> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM sites")
            .fetch_one(&self.pool)
            .await?;
        let n: i64 = row.try_get("n")?;
        Ok(n as usize)
    }

    pub async fn history_limit(&self) -> anyhow::Result<Option<u32>> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = $1")
            .bind(HISTORY_LIMIT_KEY)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let value: i64 = row.try_get("value")?;
        Ok(Some(u32::try_from(value.max(0)).unwrap_or(u32::MAX)))
    }

    pub async fn set_history_limit(&self, limit: u32) -> anyhow::Result<()> {
        sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES ($1, $2)")
            .bind(HISTORY_LIMIT_KEY)
            .bind(limit as i64)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Writes a consistent copy of the database to `dest` (must not exist).
    #[instrument(skip(self), fields(repo = "sites", operation = "vacuum_into"))]
    pub async fn vacuum_into(&self, dest: &Path) -> anyhow::Result<()> {
        let dest = dest
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("backup path is not valid UTF-8"))?;
        sqlx::query("VACUUM INTO $1")
            .bind(dest)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
