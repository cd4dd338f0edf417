use std::sync::Arc;

use crate::db::{AppTokensDao, Database, SessionsDao, UsersDao};
use crate::error::Result;
use crate::models::{AppToken, NewSessionRecord, SessionFilter, SessionOrder, SessionRecord, User};

/// Persistence capabilities the statistics service relies on
pub trait StatisticsStore: Send + Sync {
    fn find_app_token(&self, token: &str) -> Result<Option<AppToken>>;

    /// Registered tokens in registration order
    fn list_app_tokens(&self) -> Result<Vec<AppToken>>;

    fn find_user(&self, user_id: i64) -> Result<Option<User>>;

    /// Users ordered by id
    fn list_users(&self) -> Result<Vec<User>>;

    fn insert_session_record(&self, record: &NewSessionRecord) -> Result<SessionRecord>;

    /// Persist all records atomically: readers see either none or all of them
    fn insert_session_records(&self, records: &[NewSessionRecord]) -> Result<Vec<SessionRecord>>;

    fn query_session_records(
        &self,
        filter: &SessionFilter,
        order: SessionOrder,
    ) -> Result<Vec<SessionRecord>>;
}

#[derive(Clone)]
pub struct SqliteStore {
    app_tokens: AppTokensDao,
    users: UsersDao,
    sessions: SessionsDao,
}

impl SqliteStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            app_tokens: AppTokensDao::new(Arc::clone(&db)),
            users: UsersDao::new(Arc::clone(&db)),
            sessions: SessionsDao::new(db),
        }
    }

    pub fn app_tokens(&self) -> &AppTokensDao {
        &self.app_tokens
    }

    pub fn users(&self) -> &UsersDao {
        &self.users
    }
}

impl StatisticsStore for SqliteStore {
    fn find_app_token(&self, token: &str) -> Result<Option<AppToken>> {
        self.app_tokens.get_app_token(token)
    }

    fn list_app_tokens(&self) -> Result<Vec<AppToken>> {
        self.app_tokens.get_all_app_tokens()
    }

    fn find_user(&self, user_id: i64) -> Result<Option<User>> {
        self.users.get_user(user_id)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        self.users.get_all_users()
    }

    fn insert_session_record(&self, record: &NewSessionRecord) -> Result<SessionRecord> {
        self.sessions.insert_session(record)
    }

    fn insert_session_records(&self, records: &[NewSessionRecord]) -> Result<Vec<SessionRecord>> {
        self.sessions.insert_sessions(records)
    }

    fn query_session_records(
        &self,
        filter: &SessionFilter,
        order: SessionOrder,
    ) -> Result<Vec<SessionRecord>> {
        self.sessions.get_sessions(filter, order)
    }
}
