use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::db::StatisticsStore;
use crate::domain::StatisticsService;
use crate::error::{Error, Result};
use crate::models::{NewSessionRecord, SessionInput};

/// Body of a session report posted by a game client
#[derive(Debug, Deserialize)]
struct SessionReport {
    statistic: ReportEntries,
}

// Older clients send the entries as a JSON string instead of an array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReportEntries {
    Entries(Vec<SessionInput>),
    Encoded(String),
}

/// Decode the `statistic` entries of a client report
pub fn parse_session_report(payload: &str) -> Result<Vec<SessionInput>> {
    let report: SessionReport = serde_json::from_str(payload)?;

    match report.statistic {
        ReportEntries::Entries(entries) => Ok(entries),
        ReportEntries::Encoded(encoded) => Ok(serde_json::from_str(&encoded)?),
    }
}

fn validate_batch(sessions: &[SessionInput]) -> Result<()> {
    if sessions.is_empty() {
        return Err(Error::InvalidInput("session batch is empty".into()));
    }

    if let Some((index, session)) = sessions
        .iter()
        .enumerate()
        .find(|(_, session)| session.played_time < 0)
    {
        return Err(Error::InvalidInput(format!(
            "entry {} has negative played time {}",
            index, session.played_time
        )));
    }

    Ok(())
}

impl<S: StatisticsStore> StatisticsService<S> {
    /// Persist one session record per entry, stamped with the current time.
    ///
    /// The batch is all-or-nothing: an invalid entry, an unknown token or a
    /// failed insert leaves the store untouched. Returns the number of records written.
    pub fn record_session_batch(
        &self,
        app_token: &str,
        sessions: &[SessionInput],
    ) -> Result<usize> {
        self.record_session_batch_at(app_token, sessions, Utc::now())
    }

    pub fn record_session_batch_at(
        &self,
        app_token: &str,
        sessions: &[SessionInput],
        created_at: DateTime<Utc>,
    ) -> Result<usize> {
        validate_batch(sessions)?;

        let Some(resolved) = self.store.find_app_token(app_token)? else {
            warn!(token = %app_token, "session report with unknown app token");
            return Err(Error::UnknownToken(app_token.to_string()));
        };

        let records: Vec<NewSessionRecord> = sessions
            .iter()
            .map(|session| {
                NewSessionRecord::from_input(resolved.token.as_str(), session, created_at)
            })
            .collect();

        let saved = self.store.insert_session_records(&records)?;
        info!(
            token = %resolved.token,
            game = %resolved.app_name,
            count = saved.len(),
            "recorded session batch"
        );

        Ok(saved.len())
    }

    /// Decode a raw client report and record it
    pub fn record_report_json(&self, app_token: &str, payload: &str) -> Result<usize> {
        let sessions = parse_session_report(payload)?;
        self.record_session_batch(app_token, &sessions)
    }
}
