pub mod reporting;
pub mod statistics;
pub mod totals;

pub use reporting::parse_session_report;
pub use statistics::StatisticsService;
