// db/db.rs
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

/// Role assumed by every caller-scoped statement. It does not own the tables,
/// so the row-level policies apply to it.
pub const AUTHENTICATED_ROLE: &str = "flashfix_authenticated";

#[derive(Clone)]
pub struct DBClient {
    pub pool: Pool<Postgres>,
}

impl std::fmt::Debug for DBClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DBClient")
            .field("pool", &"Pool<Postgres>")
            .field("size", &self.pool.size())
            .finish()
    }
}

impl DBClient {
    pub fn new(pool: Pool<Postgres>) -> Self {
        DBClient { pool }
    }

    /// Opens a transaction that runs as `caller` under row-level security.
    /// Both settings are transaction-local, so they vanish when the
    /// connection goes back to the pool.
    pub async fn begin_as(&self, caller: Uuid) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!("SET LOCAL ROLE {}", AUTHENTICATED_ROLE))
            .execute(&mut *tx)
            .await?;

        sqlx::query("SELECT set_config('app.current_identity', $1, true)")
            .bind(caller.to_string())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}
