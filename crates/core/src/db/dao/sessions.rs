use std::sync::Arc;

use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};
use tracing::debug;

use crate::db::Database;
use crate::error::Result;
use crate::models::{NewSessionRecord, SessionFilter, SessionOrder, SessionRecord};
use crate::utils::time::{format_timestamp, parse_timestamp};

const SELECT_SESSIONS: &str = r#"
    SELECT id, app_token, user_id, played_time, scores, is_win, created_at
    FROM statistic
    WHERE (?1 IS NULL OR user_id = ?1)
      AND (?2 IS NULL OR app_token = ?2)
"#;

#[derive(Clone)]
pub struct SessionsDao {
    db: Arc<Database>,
}

fn map_session(row: &Row<'_>) -> rusqlite::Result<SessionRecord> {
    let created_at: String = row.get(6)?;
    let created_at = parse_timestamp(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    Ok(SessionRecord {
        id: row.get(0)?,
        app_token: row.get(1)?,
        user_id: row.get(2)?,
        played_time: row.get(3)?,
        score: row.get(4)?,
        is_win: row.get(5)?,
        created_at,
    })
}

fn insert(conn: &Connection, record: &NewSessionRecord) -> Result<SessionRecord> {
    let saved = record.clone().into_record(0);
    conn.execute(
        r#"
        INSERT INTO statistic (app_token, user_id, played_time, scores, is_win, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            &record.app_token,
            record.user_id,
            record.played_time,
            record.score,
            record.is_win,
            format_timestamp(saved.created_at),
        ],
    )?;

    Ok(SessionRecord {
        id: conn.last_insert_rowid(),
        ..saved
    })
}

impl SessionsDao {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn insert_session(&self, record: &NewSessionRecord) -> Result<SessionRecord> {
        self.db.with_connection(|conn| insert(conn, record))
    }

    /// Insert every record or none of them
    pub fn insert_sessions(&self, records: &[NewSessionRecord]) -> Result<Vec<SessionRecord>> {
        self.db.transaction(|tx| {
            let saved = records
                .iter()
                .map(|record| insert(tx, record))
                .collect::<Result<Vec<_>>>()?;

            debug!(count = saved.len(), "inserted session batch");
            Ok(saved)
        })
    }

    pub fn get_sessions(
        &self,
        filter: &SessionFilter,
        order: SessionOrder,
    ) -> Result<Vec<SessionRecord>> {
        let order_by = match order {
            SessionOrder::Insertion => "ORDER BY id",
            SessionOrder::NewestFirst => "ORDER BY created_at DESC, id ASC",
        };

        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!("{} {}", SELECT_SESSIONS, order_by))?;

            let sessions = stmt
                .query_map(params![filter.user_id, filter.app_token], map_session)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(sessions)
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone, Utc};

    use super::*;
    use crate::error::Error;
    use crate::models::SessionInput;

    fn setup_dao() -> SessionsDao {
        SessionsDao::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    fn record(token: &str, user_id: i64, played_time: i64, minutes_ago: i64) -> NewSessionRecord {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        NewSessionRecord::from_input(
            token,
            &SessionInput::new(user_id, played_time, 1, true),
            now - TimeDelta::minutes(minutes_ago),
        )
    }

    #[test]
    fn test_insert_and_filter_sessions() {
        let dao = setup_dao();

        dao.insert_session(&record("tok-A", 1, 10, 0)).unwrap();
        dao.insert_session(&record("tok-B", 1, 20, 0)).unwrap();
        dao.insert_session(&record("tok-A", 2, 30, 0)).unwrap();

        let by_user = dao
            .get_sessions(&SessionFilter::by_user(1), SessionOrder::Insertion)
            .unwrap();
        assert_eq!(by_user.iter().map(|s| s.played_time).collect::<Vec<_>>(), vec![10, 20]);

        let by_token = dao
            .get_sessions(&SessionFilter::by_token("tok-A"), SessionOrder::Insertion)
            .unwrap();
        assert_eq!(by_token.iter().map(|s| s.user_id).collect::<Vec<_>>(), vec![1, 2]);

        let all = dao
            .get_sessions(&SessionFilter::default(), SessionOrder::Insertion)
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_newest_first_is_stable_for_equal_timestamps() {
        let dao = setup_dao();

        let first = dao.insert_session(&record("tok-A", 1, 1, 5)).unwrap();
        let tie_a = dao.insert_session(&record("tok-A", 1, 2, 0)).unwrap();
        let tie_b = dao.insert_session(&record("tok-A", 1, 3, 0)).unwrap();

        let ids: Vec<i64> = dao
            .get_sessions(&SessionFilter::by_user(1), SessionOrder::NewestFirst)
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();

        assert_eq!(ids, vec![tie_a.id, tie_b.id, first.id]);
    }

    #[test]
    fn test_batch_insert_is_all_or_nothing() {
        let dao = setup_dao();

        let mut bad = record("tok-A", 1, 0, 0);
        bad.played_time = -1;
        let batch = vec![record("tok-A", 1, 10, 0), bad];

        let result = dao.insert_sessions(&batch);
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        let all = dao
            .get_sessions(&SessionFilter::default(), SessionOrder::Insertion)
            .unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn test_created_at_survives_storage() {
        let dao = setup_dao();
        let mut new = record("tok-A", 1, 10, 3);
        new.created_at += TimeDelta::nanoseconds(1_234_567);

        let saved = dao.insert_session(&new).unwrap();
        assert_eq!(saved.created_at.timestamp_subsec_nanos(), 1_234_000);
        let loaded = dao
            .get_sessions(&SessionFilter::by_token("tok-A"), SessionOrder::Insertion)
            .unwrap();

        assert_eq!(loaded, vec![saved]);
    }
}
