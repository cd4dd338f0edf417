use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use gamestats_core::db::Database;
use gamestats_core::error::Error as CoreError;
use parking_lot::Mutex;

pub static DB_CACHE: LazyLock<Mutex<HashMap<String, Arc<Database>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Get or create a database connection
///
/// If the database already exists in the cache, returns the cached instance.
/// Otherwise, opens the database, runs migrations, and caches it.
pub fn get_or_create_database<P: AsRef<Path>>(db_path: P) -> Result<Arc<Database>, CoreError> {
    let db_path = db_path.as_ref();
    let cache_key = db_path.to_string_lossy().to_string();

    let mut cache = DB_CACHE.lock();

    if let Some(db) = cache.get(&cache_key) {
        return Ok(Arc::clone(db));
    }

    let db = Arc::new(Database::open(db_path)?);
    cache.insert(cache_key, Arc::clone(&db));

    println!("[RUST][DB_CACHE] Opened statistics database at {:?}", db_path);

    Ok(db)
}

/// Clear the database cache (useful for testing)
pub fn clear_cache() {
    DB_CACHE.lock().clear();
}
