pub mod app_token;
pub mod session;
pub mod statistics;
pub mod user;

pub use app_token::AppToken;
pub use session::{NewSessionRecord, SessionFilter, SessionInput, SessionOrder, SessionRecord};
pub use statistics::{BestUser, PopularGame, RecentGame};
pub use user::User;
