//! Slicer bodies. Values arrive as loose JSON and are parsed by the domain,
//! so that anything unrecognised is answered as a bad selection.
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct LeagueSelection {
    #[schema(example = "a98c3295-0933-44cb-89db-7db0f7250fb1")]
    pub(crate) league_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct TeamSelection {
    #[schema(example = "a98c3295-0933-44cb-89db-7db0f7250fb1")]
    pub(crate) team_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct SeasonSelection {
    /// The year the season starts in, e.g. 2025 for 2025-2026. A numeric string is accepted too.
    #[schema(value_type = i32, example = 2025)]
    pub(crate) start_year: Value,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct GenderSelection {
    /// `men` or `women`, in any letter case
    pub(crate) gender: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct AgeGroupSelection {
    /// e.g. `senior`, `u17` or `U-17`
    pub(crate) age_group: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CompetitionRowSelection {
    /// A row id or `__pokalturneringen__`
    pub(crate) row_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CompetitionPoolSelection {
    /// A pool id or `__pokal_pool__`
    pub(crate) pool_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CompetitionTeamSelection {
    pub(crate) team_name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CalendarModeSelection {
    /// `all` or `team`
    pub(crate) mode: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct ViewModeSelection {
    /// `light` or `dark`
    pub(crate) mode: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct StatsAggregationModeSelection {
    /// `total` or `per_game`
    pub(crate) mode: String,
}
