//! Session lookup seam used by the job worker

use crate::sqlite::{self, Database};
use crate::TokenEncryptor;
use async_trait::async_trait;
use ctbridge_core::{Result, ShopSession};

/// Resolves the stored session for a shop
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The session background work should use, or `None` for an unknown shop
    async fn find_by_shop(&self, shop: &str) -> Result<Option<ShopSession>>;
}

/// [`SessionStore`] backed by the SQLite `sessions` table
pub struct SqliteSessionStore {
    db: Database,
    encryptor: TokenEncryptor,
}

impl SqliteSessionStore {
    pub fn new(db: Database, encryptor: TokenEncryptor) -> Self {
        Self { db, encryptor }
    }

    pub async fn store(&self, session: &ShopSession) -> Result<()> {
        sqlite::store_session(self.db.pool(), &self.encryptor, session).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<ShopSession>> {
        sqlite::get_session(self.db.pool(), &self.encryptor, id).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        sqlite::delete_session(self.db.pool(), id).await
    }

    pub async fn delete_shop(&self, shop: &str) -> Result<u64> {
        sqlite::delete_sessions_by_shop(self.db.pool(), shop).await
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn find_by_shop(&self, shop: &str) -> Result<Option<ShopSession>> {
        sqlite::find_session_by_shop(self.db.pool(), &self.encryptor, shop).await
    }
}
