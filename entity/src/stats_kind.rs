use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Eq, PartialEq, EnumIter, Deserialize, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "stats_kind")]
pub enum StatsKind {
    #[sea_orm(string_value = "events")]
    Events,
    #[sea_orm(string_value = "players")]
    Players,
}

impl std::fmt::Display for StatsKind {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsKind::Events => write!(fmt, "events"),
            StatsKind::Players => write!(fmt, "players"),
        }
    }
}

impl std::str::FromStr for StatsKind {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "events" => Ok(StatsKind::Events),
            "players" => Ok(StatsKind::Players),
            _ => Err(()),
        }
    }
}
