use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a session report sent by a game client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInput {
    pub user_id: i64,
    pub played_time: i64,
    #[serde(rename = "scores")]
    pub score: i64,
    pub is_win: bool,
}

impl SessionInput {
    pub fn new(user_id: i64, played_time: i64, score: i64, is_win: bool) -> Self {
        Self {
            user_id,
            played_time,
            score,
            is_win,
        }
    }
}

/// Stored timestamps keep microseconds, so in-memory copies are truncated to match
const TIMESTAMP_PRECISION: u16 = 6;

/// A session record that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSessionRecord {
    pub app_token: String,
    pub user_id: i64,
    pub played_time: i64,
    pub score: i64,
    pub is_win: bool,
    pub created_at: DateTime<Utc>,
}

impl NewSessionRecord {
    pub fn from_input(
        app_token: impl Into<String>,
        input: &SessionInput,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            app_token: app_token.into(),
            user_id: input.user_id,
            played_time: input.played_time,
            score: input.score,
            is_win: input.is_win,
            created_at: created_at.trunc_subsecs(TIMESTAMP_PRECISION),
        }
    }

    pub fn into_record(self, id: i64) -> SessionRecord {
        SessionRecord {
            id,
            app_token: self.app_token,
            user_id: self.user_id,
            played_time: self.played_time,
            score: self.score,
            is_win: self.is_win,
            created_at: self.created_at.trunc_subsecs(TIMESTAMP_PRECISION),
        }
    }
}

/// One persisted outcome of a single play session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: i64,
    pub app_token: String,
    pub user_id: i64,
    pub played_time: i64,
    pub score: i64,
    pub is_win: bool,
    pub created_at: DateTime<Utc>,
}

/// Scope of a session record query. Empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFilter {
    pub user_id: Option<i64>,
    pub app_token: Option<String>,
}

impl SessionFilter {
    pub fn by_user(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            app_token: None,
        }
    }

    pub fn by_token(app_token: impl Into<String>) -> Self {
        Self {
            user_id: None,
            app_token: Some(app_token.into()),
        }
    }

    pub fn matches(&self, record: &SessionRecord) -> bool {
        self.user_id.is_none_or(|id| id == record.user_id)
            && self
                .app_token
                .as_deref()
                .is_none_or(|token| token == record.app_token)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionOrder {
    /// Insertion order
    #[default]
    Insertion,
    /// Creation timestamp descending, insertion order among equal timestamps
    NewestFirst,
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    #[test]
    fn test_created_at_is_truncated_to_micros() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let precise = base + TimeDelta::nanoseconds(1_234_567);
        let expected = base + TimeDelta::microseconds(1_234);

        let input = SessionInput::new(1, 5, 1, true);
        let mut new = NewSessionRecord::from_input("tok-A", &input, precise);
        assert_eq!(new.created_at, expected);

        new.created_at = precise;
        assert_eq!(new.into_record(7).created_at, expected);
    }
}
