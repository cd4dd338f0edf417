use std::sync::Arc;

use rusqlite::{OptionalExtension, params};

use crate::db::Database;
use crate::error::Result;
use crate::models::AppToken;

#[derive(Clone)]
pub struct AppTokensDao {
    db: Arc<Database>,
}

impl AppTokensDao {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn get_app_token(&self, token: &str) -> Result<Option<AppToken>> {
        self.db.with_connection(|conn| {
            let mut stmt =
                conn.prepare("SELECT token, app_name FROM app_token WHERE token = ?1")?;

            let app_token = stmt
                .query_row(params![token], |row| {
                    Ok(AppToken {
                        token: row.get(0)?,
                        app_name: row.get(1)?,
                    })
                })
                .optional()?;

            Ok(app_token)
        })
    }

    /// All registered tokens in registration order
    pub fn get_all_app_tokens(&self) -> Result<Vec<AppToken>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT token, app_name FROM app_token ORDER BY rowid")?;

            let tokens = stmt
                .query_map([], |row| {
                    Ok(AppToken {
                        token: row.get(0)?,
                        app_name: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(tokens)
        })
    }

    pub fn save_app_token(&self, app_token: &AppToken) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO app_token (token, app_name)
                 VALUES (?1, ?2)
                 ON CONFLICT(token) DO UPDATE SET app_name = ?2",
                params![&app_token.token, &app_token.app_name],
            )?;
            Ok(())
        })
    }

    /// Returns whether a token was removed
    pub fn delete_app_token(&self, token: &str) -> Result<bool> {
        self.db.with_connection(|conn| {
            let removed = conn.execute("DELETE FROM app_token WHERE token = ?1", params![token])?;
            Ok(removed > 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_dao() -> AppTokensDao {
        AppTokensDao::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    #[test]
    fn test_save_and_get_app_token() {
        let dao = setup_dao();

        dao.save_app_token(&AppToken::new("tok-A", "Arena")).unwrap();

        let retrieved = dao.get_app_token("tok-A").unwrap();
        assert_eq!(retrieved, Some(AppToken::new("tok-A", "Arena")));
        assert!(dao.get_app_token("tok-missing").unwrap().is_none());
    }

    #[test]
    fn test_list_keeps_registration_order_across_renames() {
        let dao = setup_dao();

        dao.save_app_token(&AppToken::new("tok-Z", "Zombies")).unwrap();
        dao.save_app_token(&AppToken::new("tok-A", "Arena")).unwrap();
        dao.save_app_token(&AppToken::new("tok-Z", "Zombies II")).unwrap();

        let tokens = dao.get_all_app_tokens().unwrap();
        assert_eq!(
            tokens,
            vec![AppToken::new("tok-Z", "Zombies II"), AppToken::new("tok-A", "Arena")]
        );
    }

    #[test]
    fn test_delete_app_token() {
        let dao = setup_dao();
        dao.save_app_token(&AppToken::new("tok-A", "Arena")).unwrap();

        assert!(dao.delete_app_token("tok-A").unwrap());
        assert!(!dao.delete_app_token("tok-A").unwrap());
        assert!(dao.get_app_token("tok-A").unwrap().is_none());
    }
}
