//! Shop session CRUD operations
//!
//! Access tokens never touch the database in clear text: they are written
//! through [`TokenEncryptor`] and decrypted on read.

use crate::encryption::{EncryptedToken, TokenEncryptor};
use chrono::{DateTime, Utc};
use ctbridge_core::{Error, Result, ShopSession};
use sqlx::SqlitePool;

/// Database row for a session
#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: String,
    shop: String,
    state: String,
    is_online: i32,
    scope: Option<String>,
    expires: Option<DateTime<Utc>>,
    access_token_encrypted: Option<Vec<u8>>,
    access_token_iv: Option<Vec<u8>>,
    user_id: Option<i64>,
}

impl SessionRow {
    fn into_session(self, encryptor: &TokenEncryptor) -> Result<ShopSession> {
        let access_token = match (self.access_token_encrypted, self.access_token_iv) {
            (Some(ciphertext), Some(iv)) => {
                let sealed = EncryptedToken::from_parts(ciphertext, &iv)?;
                Some(encryptor.open(&self.id, &sealed)?)
            }
            _ => None,
        };

        Ok(ShopSession {
            id: self.id,
            shop: self.shop,
            state: self.state,
            is_online: self.is_online != 0,
            scope: self.scope,
            expires: self.expires,
            access_token,
            user_id: self.user_id,
        })
    }
}

const SESSION_COLUMNS: &str = "id, shop, state, is_online, scope, expires, \
     access_token_encrypted, access_token_iv, user_id";

/// Insert a session, or replace the stored one with the same id
pub async fn store_session(
    pool: &SqlitePool,
    encryptor: &TokenEncryptor,
    session: &ShopSession,
) -> Result<()> {
    let encrypted = session
        .access_token
        .as_deref()
        .map(|token| encryptor.seal(&session.id, token))
        .transpose()?;
    let (ciphertext, iv) = match &encrypted {
        Some(token) => (Some(token.ciphertext.as_slice()), Some(&token.iv[..])),
        None => (None, None),
    };

    sqlx::query(
        r#"
        INSERT INTO sessions
            (id, shop, state, is_online, scope, expires, access_token_encrypted, access_token_iv, user_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            shop = excluded.shop,
            state = excluded.state,
            is_online = excluded.is_online,
            scope = excluded.scope,
            expires = excluded.expires,
            access_token_encrypted = excluded.access_token_encrypted,
            access_token_iv = excluded.access_token_iv,
            user_id = excluded.user_id,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(&session.id)
    .bind(&session.shop)
    .bind(&session.state)
    .bind(session.is_online as i32)
    .bind(&session.scope)
    .bind(session.expires)
    .bind(ciphertext)
    .bind(iv)
    .bind(session.user_id)
    .execute(pool)
    .await
    .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(())
}

/// Get a session by its id
pub async fn get_session(
    pool: &SqlitePool,
    encryptor: &TokenEncryptor,
    id: &str,
) -> Result<Option<ShopSession>> {
    let row: Option<SessionRow> =
        sqlx::query_as(&format!("SELECT {} FROM sessions WHERE id = ?", SESSION_COLUMNS))
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| Error::DatabaseError(e.to_string()))?;

    row.map(|r| r.into_session(encryptor)).transpose()
}

/// Find the session background work should use for a shop
///
/// Offline sessions win over online ones; among equals the most recently
/// written session is returned.
pub async fn find_session_by_shop(
    pool: &SqlitePool,
    encryptor: &TokenEncryptor,
    shop: &str,
) -> Result<Option<ShopSession>> {
    let row: Option<SessionRow> = sqlx::query_as(&format!(
        "SELECT {} FROM sessions WHERE shop = ? \
         ORDER BY is_online ASC, updated_at DESC, rowid DESC LIMIT 1",
        SESSION_COLUMNS
    ))
    .bind(shop)
    .fetch_optional(pool)
    .await
    .map_err(|e| Error::DatabaseError(e.to_string()))?;

    row.map(|r| r.into_session(encryptor)).transpose()
}

/// Delete a session by id
pub async fn delete_session(pool: &SqlitePool, id: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(())
}

/// Delete every session for a shop (app uninstalled); returns rows removed
pub async fn delete_sessions_by_shop(pool: &SqlitePool, shop: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE shop = ?")
        .bind(shop)
        .execute(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    const SHOP: &str = "demo.myshopify.com";

    async fn setup() -> (Database, TokenEncryptor) {
        let db = Database::connect_in_memory().await.unwrap();
        let encryptor = TokenEncryptor::new(&[7u8; 32]).unwrap();
        (db, encryptor)
    }

    #[tokio::test]
    async fn test_store_and_find_by_shop() {
        let (db, encryptor) = setup().await;
        let session = ShopSession::offline(SHOP, "shpat_abc");

        store_session(db.pool(), &encryptor, &session).await.unwrap();

        let found = find_session_by_shop(db.pool(), &encryptor, SHOP)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, session);

        let by_id = get_session(db.pool(), &encryptor, &session.id).await.unwrap();
        assert_eq!(by_id, Some(session));
    }

    #[tokio::test]
    async fn test_unknown_shop_returns_none() {
        let (db, encryptor) = setup().await;
        let found = find_session_by_shop(db.pool(), &encryptor, "missing.myshopify.com")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_token_is_not_stored_in_clear() {
        let (db, encryptor) = setup().await;
        store_session(db.pool(), &encryptor, &ShopSession::offline(SHOP, "shpat_plaintext"))
            .await
            .unwrap();

        let (blob,): (Vec<u8>,) =
            sqlx::query_as("SELECT access_token_encrypted FROM sessions WHERE shop = ?")
                .bind(SHOP)
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert!(!blob
            .windows(b"shpat_plaintext".len())
            .any(|w| w == b"shpat_plaintext"));
    }

    #[tokio::test]
    async fn test_token_moved_to_other_row_is_rejected() {
        let (db, encryptor) = setup().await;
        store_session(db.pool(), &encryptor, &ShopSession::offline(SHOP, "shpat_a"))
            .await
            .unwrap();
        store_session(
            db.pool(),
            &encryptor,
            &ShopSession::offline("other.myshopify.com", "shpat_b"),
        )
        .await
        .unwrap();

        sqlx::query(
            "UPDATE sessions SET \
             access_token_encrypted = (SELECT access_token_encrypted FROM sessions WHERE shop = ?1), \
             access_token_iv = (SELECT access_token_iv FROM sessions WHERE shop = ?1) \
             WHERE shop = ?2",
        )
        .bind(SHOP)
        .bind("other.myshopify.com")
        .execute(db.pool())
        .await
        .unwrap();

        let result = find_session_by_shop(db.pool(), &encryptor, "other.myshopify.com").await;
        assert!(matches!(result, Err(Error::EncryptionError(_))));
    }

    #[tokio::test]
    async fn test_upsert_replaces_token() {
        let (db, encryptor) = setup().await;
        let mut session = ShopSession::offline(SHOP, "shpat_old");
        store_session(db.pool(), &encryptor, &session).await.unwrap();

        session.access_token = Some("shpat_new".to_string());
        session.scope = Some("read_products".to_string());
        store_session(db.pool(), &encryptor, &session).await.unwrap();

        let found = get_session(db.pool(), &encryptor, &session.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.access_token.as_deref(), Some("shpat_new"));
        assert_eq!(found.scope.as_deref(), Some("read_products"));
    }

    #[tokio::test]
    async fn test_offline_session_preferred() {
        let (db, encryptor) = setup().await;
        let offline = ShopSession::offline(SHOP, "shpat_offline");
        let online = ShopSession {
            id: format!("{}_42", SHOP),
            is_online: true,
            access_token: Some("shpua_online".to_string()),
            user_id: Some(42),
            ..offline.clone()
        };

        store_session(db.pool(), &encryptor, &offline).await.unwrap();
        store_session(db.pool(), &encryptor, &online).await.unwrap();

        let found = find_session_by_shop(db.pool(), &encryptor, SHOP)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.access_token.as_deref(), Some("shpat_offline"));
    }

    #[tokio::test]
    async fn test_session_without_token() {
        let (db, encryptor) = setup().await;
        let mut session = ShopSession::offline(SHOP, "unused");
        session.access_token = None;
        store_session(db.pool(), &encryptor, &session).await.unwrap();

        let found = find_session_by_shop(db.pool(), &encryptor, SHOP)
            .await
            .unwrap()
            .unwrap();
        assert!(found.access_token.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let (db, encryptor) = setup().await;
        let session = ShopSession::offline(SHOP, "shpat_abc");
        store_session(db.pool(), &encryptor, &session).await.unwrap();
        store_session(
            db.pool(),
            &encryptor,
            &ShopSession::offline("other.myshopify.com", "shpat_xyz"),
        )
        .await
        .unwrap();

        delete_session(db.pool(), &session.id).await.unwrap();
        assert!(get_session(db.pool(), &encryptor, &session.id)
            .await
            .unwrap()
            .is_none());

        let removed = delete_sessions_by_shop(db.pool(), "other.myshopify.com")
            .await
            .unwrap();
        assert_eq!(removed, 1);
    }
}
