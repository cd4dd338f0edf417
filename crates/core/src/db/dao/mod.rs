pub mod app_tokens;
pub mod sessions;
pub mod users;

pub use app_tokens::AppTokensDao;
pub use sessions::SessionsDao;
pub use users::UsersDao;
