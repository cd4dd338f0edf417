use parking_lot::RwLock;

use crate::db::StatisticsStore;
use crate::error::Result;
use crate::models::{AppToken, NewSessionRecord, SessionFilter, SessionOrder, SessionRecord, User};

#[derive(Debug, Default)]
struct Tables {
    app_tokens: Vec<AppToken>,
    users: Vec<User>,
    sessions: Vec<SessionRecord>,
}

/// Store kept entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_app_token(&self, app_token: AppToken) {
        let mut tables = self.tables.write();

        match tables.app_tokens.iter_mut().find(|t| t.token == app_token.token) {
            Some(existing) => existing.app_name = app_token.app_name,
            None => tables.app_tokens.push(app_token),
        }
    }

    pub fn delete_app_token(&self, token: &str) -> bool {
        let mut tables = self.tables.write();
        let before = tables.app_tokens.len();
        tables.app_tokens.retain(|t| t.token != token);

        tables.app_tokens.len() != before
    }

    pub fn save_user(&self, user: User) {
        let mut tables = self.tables.write();

        match tables.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user,
            None => {
                tables.users.push(user);
                tables.users.sort_by_key(|u| u.id);
            }
        }
    }

    fn next_id(tables: &Tables) -> i64 {
        tables.sessions.last().map_or(1, |s| s.id + 1)
    }
}

impl StatisticsStore for MemoryStore {
    fn find_app_token(&self, token: &str) -> Result<Option<AppToken>> {
        let tables = self.tables.read();
        Ok(tables.app_tokens.iter().find(|t| t.token == token).cloned())
    }

    fn list_app_tokens(&self) -> Result<Vec<AppToken>> {
        Ok(self.tables.read().app_tokens.clone())
    }

    fn find_user(&self, user_id: i64) -> Result<Option<User>> {
        let tables = self.tables.read();
        Ok(tables.users.iter().find(|u| u.id == user_id).cloned())
    }

    fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.tables.read().users.clone())
    }

    fn insert_session_record(&self, record: &NewSessionRecord) -> Result<SessionRecord> {
        let mut tables = self.tables.write();
        let saved = record.clone().into_record(Self::next_id(&tables));
        tables.sessions.push(saved.clone());

        Ok(saved)
    }

    fn insert_session_records(&self, records: &[NewSessionRecord]) -> Result<Vec<SessionRecord>> {
        let mut tables = self.tables.write();
        let first_id = Self::next_id(&tables);

        let saved: Vec<SessionRecord> = records
            .iter()
            .zip(first_id..)
            .map(|(record, id)| record.clone().into_record(id))
            .collect();
        tables.sessions.extend(saved.iter().cloned());

        Ok(saved)
    }

    fn query_session_records(
        &self,
        filter: &SessionFilter,
        order: SessionOrder,
    ) -> Result<Vec<SessionRecord>> {
        let tables = self.tables.read();
        let mut sessions: Vec<SessionRecord> = tables
            .sessions
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();

        if order == SessionOrder::NewestFirst {
            // stable: equal timestamps stay in insertion order
            sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }

        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};

    use super::*;
    use crate::models::SessionInput;

    #[test]
    fn test_newest_first_keeps_insertion_order_on_ties() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let older = now - TimeDelta::hours(1);

        let batch: Vec<NewSessionRecord> = [(1, older), (2, now), (3, now)]
            .into_iter()
            .map(|(played, at)| {
                NewSessionRecord::from_input("tok-A", &SessionInput::new(9, played, 0, false), at)
            })
            .collect();
        store.insert_session_records(&batch).unwrap();

        let played: Vec<i64> = store
            .query_session_records(&SessionFilter::by_user(9), SessionOrder::NewestFirst)
            .unwrap()
            .iter()
            .map(|s| s.played_time)
            .collect();

        assert_eq!(played, vec![2, 3, 1]);
    }

    #[test]
    fn test_ids_are_sequential_across_writes() {
        let store = MemoryStore::new();
        let input = SessionInput::new(1, 5, 0, true);
        let record = NewSessionRecord::from_input("tok-A", &input, Utc::now());

        let first = store.insert_session_record(&record).unwrap();
        let batch = store
            .insert_session_records(&[record.clone(), record.clone()])
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(batch.iter().map(|s| s.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_save_app_token_renames_in_place() {
        let store = MemoryStore::new();
        store.save_app_token(AppToken::new("tok-B", "Bombers"));
        store.save_app_token(AppToken::new("tok-A", "Arena"));
        store.save_app_token(AppToken::new("tok-B", "Bombers 2"));

        let tokens = store.list_app_tokens().unwrap();
        assert_eq!(
            tokens,
            vec![AppToken::new("tok-B", "Bombers 2"), AppToken::new("tok-A", "Arena")]
        );
        assert!(store.delete_app_token("tok-A"));
        assert!(store.find_app_token("tok-A").unwrap().is_none());
    }
}
