use std::sync::Arc;

use rusqlite::{OptionalExtension, Row, params};

use crate::db::Database;
use crate::error::Result;
use crate::models::User;

#[derive(Clone)]
pub struct UsersDao {
    db: Arc<Database>,
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        is_active: row.get(2)?,
    })
}

impl UsersDao {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        self.db.with_connection(|conn| {
            let user = conn
                .query_row(
                    "SELECT id, name, is_active FROM user WHERE id = ?1",
                    params![user_id],
                    map_user,
                )
                .optional()?;

            Ok(user)
        })
    }

    pub fn get_all_users(&self) -> Result<Vec<User>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT id, name, is_active FROM user ORDER BY id")?;

            let users = stmt
                .query_map([], map_user)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(users)
        })
    }

    pub fn save_user(&self, user: &User) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO user (id, name, is_active)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET name = ?2, is_active = ?3",
                params![user.id, &user.name, user.is_active],
            )?;
            Ok(())
        })
    }

    /// Returns whether the user exists
    pub fn set_active(&self, user_id: i64, is_active: bool) -> Result<bool> {
        self.db.with_connection(|conn| {
            let updated = conn.execute(
                "UPDATE user SET is_active = ?2 WHERE id = ?1",
                params![user_id, is_active],
            )?;
            Ok(updated > 0)
        })
    }
}
