use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::{InactiveUserPolicy, StatisticsConfig};
use crate::db::StatisticsStore;
use crate::domain::totals::{played_time, played_within, score_total, sort_desc_by_key};
use crate::error::{Error, Result};
use crate::models::{
    AppToken, BestUser, PopularGame, RecentGame, SessionFilter, SessionOrder, User,
};

/// Derives the lobby statistic projections from stored session records.
///
/// Nothing is cached: every read goes back to the store, and a failing lookup
/// aborts the whole call instead of producing a partial projection.
#[derive(Clone)]
pub struct StatisticsService<S> {
    pub(crate) store: S,
    pub(crate) config: StatisticsConfig,
}

impl<S: StatisticsStore> StatisticsService<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, StatisticsConfig::default())
    }

    pub fn with_config(store: S, config: StatisticsConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &StatisticsConfig {
        &self.config
    }

    /// Sessions of a user, most recent first, with their game names resolved
    pub fn recent_games(&self, user_id: i64) -> Result<Vec<RecentGame>> {
        let sessions = self
            .store
            .query_session_records(&SessionFilter::by_user(user_id), SessionOrder::NewestFirst)?;
        debug!(user_id, sessions = sessions.len(), "loaded recent sessions");

        let mut game_names: HashMap<String, String> = HashMap::new();
        let mut recent = Vec::with_capacity(sessions.len());

        for session in sessions {
            let game = match game_names.get(&session.app_token) {
                Some(name) => name.clone(),
                None => {
                    let Some(app_token) = self.store.find_app_token(&session.app_token)? else {
                        warn!(
                            session_id = session.id,
                            token = %session.app_token,
                            "session references an unknown app token"
                        );
                        return Err(Error::IntegrityFault {
                            session_id: session.id,
                            token: session.app_token,
                        });
                    };

                    game_names.insert(app_token.token, app_token.app_name.clone());
                    app_token.app_name
                }
            };

            recent.push(RecentGame {
                game,
                played_time: session.played_time,
                result: session.is_win,
            });
        }

        Ok(recent)
    }

    /// Every registered game ranked by total played time
    pub fn most_popular_games(&self) -> Result<Vec<PopularGame>> {
        self.most_popular_games_at(Utc::now())
    }

    /// Same as [`Self::most_popular_games`], with the weekly window ending at `now`
    pub fn most_popular_games_at(&self, now: DateTime<Utc>) -> Result<Vec<PopularGame>> {
        let app_tokens = self.store.list_app_tokens()?;

        let mut games = app_tokens
            .iter()
            .map(|app_token| self.popularity(app_token, now))
            .collect::<Result<Vec<_>>>()?;

        sort_desc_by_key(&mut games, |game| game.played_time);
        debug!(games = games.len(), "ranked popular games");

        Ok(games)
    }

    /// Popularity of a single registered game
    pub fn game_popularity(&self, token: &str) -> Result<PopularGame> {
        self.game_popularity_at(token, Utc::now())
    }

    pub fn game_popularity_at(&self, token: &str, now: DateTime<Utc>) -> Result<PopularGame> {
        let app_token = self
            .store
            .find_app_token(token)?
            .ok_or_else(|| Error::UnknownToken(token.to_string()))?;

        self.popularity(&app_token, now)
    }

    /// Active users with a positive score, best first
    pub fn best_users(&self) -> Result<Vec<BestUser>> {
        let users = self.store.list_users()?;
        let mut ranking = Vec::with_capacity(users.len());

        for user in users {
            if !self.is_rankable(&user)? {
                continue;
            }

            ranking.push(self.totals_for(&user)?);
        }

        sort_desc_by_key(&mut ranking, |user| user.scores);
        ranking.retain(|user| user.scores > 0);
        debug!(users = ranking.len(), "ranked best users");

        Ok(ranking)
    }

    /// Totals of one user, without the positive-score cut applied by the ranking
    pub fn user_totals(&self, user_id: i64) -> Result<Option<BestUser>> {
        let Some(user) = self.store.find_user(user_id)? else {
            return Ok(None);
        };

        if !self.is_rankable(&user)? {
            return Ok(None);
        }

        self.totals_for(&user).map(Some)
    }

    fn popularity(&self, app_token: &AppToken, now: DateTime<Utc>) -> Result<PopularGame> {
        let sessions = self.store.query_session_records(
            &SessionFilter::by_token(app_token.token.as_str()),
            SessionOrder::Insertion,
        )?;

        Ok(PopularGame {
            token: app_token.token.clone(),
            name: app_token.app_name.clone(),
            played_time: played_time(&sessions)?,
            played_in_week: played_within(&sessions, now, self.config.popular_window)?,
        })
    }

    fn totals_for(&self, user: &User) -> Result<BestUser> {
        let sessions = self
            .store
            .query_session_records(&SessionFilter::by_user(user.id), SessionOrder::Insertion)?;

        Ok(BestUser {
            id: user.id,
            name: user.name.clone(),
            played_time: played_time(&sessions)?,
            scores: score_total(&sessions)?,
        })
    }

    /// Inactive users either fail the call or are left out, depending on the policy
    fn is_rankable(&self, user: &User) -> Result<bool> {
        if user.is_active {
            return Ok(true);
        }

        match self.config.inactive_users {
            InactiveUserPolicy::Reject => {
                warn!(user_id = user.id, "inactive user met during ranking");
                Err(Error::InactiveUser(user.id))
            }
            InactiveUserPolicy::Skip => {
                debug!(user_id = user.id, "skipping inactive user");
                Ok(false)
            }
        }
    }
}
