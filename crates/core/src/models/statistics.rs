use serde::Serialize;

/// One row of a user's recent games list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentGame {
    pub game: String,
    pub played_time: i64,
    pub result: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularGame {
    pub token: String,
    pub name: String,
    pub played_time: i64,
    pub played_in_week: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestUser {
    pub id: i64,
    pub name: String,
    pub played_time: i64,
    pub scores: i64,
}
