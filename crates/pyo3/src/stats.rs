//! GameStats - Main PyO3 class for lobby statistics
//!
//! Stateless API that takes the data_dir for each operation.
//! Projections are returned as JSON strings in the lobby's wire format.

use std::path::PathBuf;

use gamestats_core::db::SqliteStore;
use gamestats_core::error::Error as CoreError;
use gamestats_core::models::{AppToken, User};
use gamestats_core::{StatisticsConfig, StatisticsService};
use pyo3::exceptions::PyException;
use pyo3::prelude::*;
use serde::Serialize;

use crate::db::get_or_create_database;

const STORAGE_DB_FILENAME: &str = "statistics.db";

/// Convert core errors to Python exceptions, prefixed with their stable code
fn to_py_err(err: CoreError) -> PyErr {
    PyException::new_err(format!("{}: {}", err.code(), err))
}

fn to_json<T: Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(|e| to_py_err(CoreError::Payload(e)))
}

#[pyclass]
pub struct GameStats {}

#[pymethods]
impl GameStats {
    #[new]
    fn new() -> PyResult<Self> {
        Ok(Self {})
    }

    /// Record a client report; returns the number of stored sessions
    fn record_session_batch(
        &self,
        data_dir: &str,
        app_token: &str,
        payload: &str,
    ) -> PyResult<usize> {
        let service = Self::get_service(data_dir).map_err(to_py_err)?;

        service
            .record_report_json(app_token, payload)
            .map_err(to_py_err)
    }

    fn recent_games(&self, data_dir: &str, user_id: i64) -> PyResult<String> {
        let service = Self::get_service(data_dir).map_err(to_py_err)?;
        to_json(&service.recent_games(user_id).map_err(to_py_err)?)
    }

    fn most_popular_games(&self, data_dir: &str) -> PyResult<String> {
        let service = Self::get_service(data_dir).map_err(to_py_err)?;
        to_json(&service.most_popular_games().map_err(to_py_err)?)
    }

    fn best_users(&self, data_dir: &str) -> PyResult<String> {
        let service = Self::get_service(data_dir).map_err(to_py_err)?;
        to_json(&service.best_users().map_err(to_py_err)?)
    }

    fn register_game(&self, data_dir: &str, token: &str, name: &str) -> PyResult<()> {
        let service = Self::get_service(data_dir).map_err(to_py_err)?;

        service
            .store()
            .app_tokens()
            .save_app_token(&AppToken::new(token, name))
            .map_err(to_py_err)
    }

    fn register_user(
        &self,
        data_dir: &str,
        user_id: i64,
        name: &str,
        is_active: bool,
    ) -> PyResult<()> {
        let service = Self::get_service(data_dir).map_err(to_py_err)?;
        let user = User {
            id: user_id,
            name: name.to_string(),
            is_active,
        };

        service.store().users().save_user(&user).map_err(to_py_err)
    }
}

impl GameStats {
    /// Statistics service over the cached database in `data_dir`
    pub fn get_service(data_dir: &str) -> Result<StatisticsService<SqliteStore>, CoreError> {
        let db_path = PathBuf::from(data_dir).join(STORAGE_DB_FILENAME);
        let db = get_or_create_database(&db_path)?;

        Ok(StatisticsService::with_config(
            SqliteStore::new(db),
            StatisticsConfig::from_env()?,
        ))
    }
}
