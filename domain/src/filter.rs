//! Resolves the effective filter selection from a partial, possibly stale,
//! set of session preferences. Every slicer falls back to its first option
//! when its stored value is absent or no longer among the options. Nothing
//! here writes to the session.
use crate::error::Error;
use crate::preferences::SessionPreferences;
use crate::{
    age_group::AgeGroup, competition_pool_teams, competition_pools, competition_rows,
    competition_seasons, gender::Gender, leagues, teams, Id,
};
use async_trait::async_trait;
use entity_api::competition;
use entity_api::error::EntityApiErrorKind;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use utoipa::ToSchema;

/// Id of the virtual row that gathers every cup row of a season.
pub const CUP_ROW_ID: &str = "__pokalturneringen__";
/// Id of the single pool listed under the virtual cup row.
pub const CUP_POOL_ID: &str = "__pokal_pool__";
pub const CUP_NAME: &str = "Pokalturneringen";

pub fn is_cup_row_name(name: &str) -> bool {
    name.trim().to_lowercase().starts_with("pokal")
}

/// Read access to the competition reference data the resolver works over.
#[async_trait]
pub trait CompetitionCatalog: Send + Sync {
    async fn seasons(&self) -> Result<Vec<competition_seasons::Model>, Error>;

    async fn season_ids_with_pools(&self) -> Result<Vec<Id>, Error>;

    /// Rows of a season and gender that have at least one pool.
    async fn rows_with_pools(
        &self,
        season_id: Id,
        gender: Gender,
    ) -> Result<Vec<competition_rows::Model>, Error>;

    async fn row_by_id(&self, id: Id) -> Result<Option<competition_rows::Model>, Error>;

    async fn pools_of_rows(&self, row_ids: Vec<Id>)
        -> Result<Vec<competition_pools::Model>, Error>;

    async fn pool_by_id(&self, id: Id) -> Result<Option<competition_pools::Model>, Error>;

    async fn pool_standings(
        &self,
        pool_id: Id,
    ) -> Result<Vec<competition_pool_teams::Model>, Error>;

    /// Every team name that appears as home or away team in the pools' matches.
    async fn match_team_names(&self, pool_ids: Vec<Id>) -> Result<Vec<String>, Error>;
}

#[async_trait]
impl CompetitionCatalog for DatabaseConnection {
    async fn seasons(&self) -> Result<Vec<competition_seasons::Model>, Error> {
        Ok(competition::find_seasons(self).await?)
    }

    async fn season_ids_with_pools(&self) -> Result<Vec<Id>, Error> {
        Ok(competition::find_season_ids_with_pools(self).await?)
    }

    async fn rows_with_pools(
        &self,
        season_id: Id,
        gender: Gender,
    ) -> Result<Vec<competition_rows::Model>, Error> {
        Ok(competition::find_rows_with_pools(self, season_id, gender).await?)
    }

    async fn row_by_id(&self, id: Id) -> Result<Option<competition_rows::Model>, Error> {
        match competition::find_row_by_id(self, id).await {
            Ok(row) => Ok(Some(row)),
            Err(err) if err.error_kind == EntityApiErrorKind::RecordNotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn pools_of_rows(
        &self,
        row_ids: Vec<Id>,
    ) -> Result<Vec<competition_pools::Model>, Error> {
        Ok(competition::find_pools_by_rows(self, row_ids).await?)
    }

    async fn pool_by_id(&self, id: Id) -> Result<Option<competition_pools::Model>, Error> {
        match competition::find_pool_by_id(self, id).await {
            Ok(pool) => Ok(Some(pool)),
            Err(err) if err.error_kind == EntityApiErrorKind::RecordNotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn pool_standings(
        &self,
        pool_id: Id,
    ) -> Result<Vec<competition_pool_teams::Model>, Error> {
        Ok(competition::find_pool_teams(self, pool_id).await?)
    }

    async fn match_team_names(&self, pool_ids: Vec<Id>) -> Result<Vec<String>, Error> {
        let matches = competition::find_matches_by_pools(self, pool_ids).await?;
        let names: BTreeSet<String> = matches
            .into_iter()
            .flat_map(|m| [m.home_team, m.away_team])
            .filter(|name| !name.trim().is_empty())
            .collect();
        Ok(names.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AppSelection {
    pub league: Option<leagues::Model>,
    pub team: Option<teams::Model>,
    /// Teams of the effective league, alphabetically
    pub teams: Vec<teams::Model>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SeasonOption {
    pub start_year: i32,
    pub label: String,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AgeGroupOption {
    pub value: AgeGroup,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RowOption {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PoolOption {
    pub id: String,
    pub pulje_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CompetitionContext {
    pub seasons: Vec<SeasonOption>,
    pub selected_season_start_year: Option<i32>,
    #[schema(value_type = Option<Uuid>)]
    pub selected_season_id: Option<Id>,
    pub selected_season_is_current: bool,
    pub selected_gender: Gender,
    pub age_groups: Vec<AgeGroupOption>,
    pub selected_age_group: Option<AgeGroup>,
    pub rows: Vec<RowOption>,
    pub selected_row_id: Option<String>,
    pub pools: Vec<PoolOption>,
    pub selected_pool_id: Option<String>,
    /// The real pools behind the selected pool; every cup pool when the cup is selected
    #[schema(value_type = Vec<Uuid>)]
    pub effective_pool_ids: Vec<Id>,
    pub is_cup: bool,
    pub team_names: Vec<String>,
    pub selected_team_name: Option<String>,
}

/// Effective league and team: the stored ones while they still exist and
/// belong together, otherwise the first alphabetically.
pub fn resolve_app_selection(
    prefs: &SessionPreferences,
    leagues: &[leagues::Model],
    teams: &[teams::Model],
) -> AppSelection {
    let mut leagues: Vec<&leagues::Model> = leagues.iter().collect();
    leagues.sort_by_key(|league| sort_key(&league.name));

    let league = prefs
        .league_id
        .and_then(|id| leagues.iter().find(|league| league.id == id).copied())
        .or_else(|| leagues.first().copied())
        .cloned();

    let mut league_teams: Vec<teams::Model> = match &league {
        Some(league) => teams
            .iter()
            .filter(|team| team.league_id == league.id)
            .cloned()
            .collect(),
        None => Vec::new(),
    };
    league_teams.sort_by_key(|team| sort_key(&team.name));

    let team = prefs
        .team_id
        .and_then(|id| league_teams.iter().find(|team| team.id == id))
        .or_else(|| league_teams.first())
        .cloned();

    AppSelection {
        league,
        team,
        teams: league_teams,
    }
}

pub async fn resolve_competition_context<C>(
    catalog: &C,
    prefs: &SessionPreferences,
) -> Result<CompetitionContext, Error>
where
    C: CompetitionCatalog + ?Sized,
{
    resolve_competition_context_at(catalog, prefs, entity_api::current_season_start_year()).await
}

pub(crate) async fn resolve_competition_context_at<C>(
    catalog: &C,
    prefs: &SessionPreferences,
    current_start_year: i32,
) -> Result<CompetitionContext, Error>
where
    C: CompetitionCatalog + ?Sized,
{
    // Seasons: the current one and every season that has pools, newest first
    let with_pools: HashSet<Id> = catalog.season_ids_with_pools().await?.into_iter().collect();
    let mut seasons: Vec<competition_seasons::Model> = catalog
        .seasons()
        .await?
        .into_iter()
        .filter(|season| {
            (season.is_current && season.start_year <= current_start_year)
                || with_pools.contains(&season.id)
        })
        .collect();
    seasons.sort_by(|a, b| b.start_year.cmp(&a.start_year));

    let selected_season = prefs
        .season_start_year
        .and_then(|year| seasons.iter().find(|season| season.start_year == year))
        .or_else(|| seasons.iter().find(|season| season.is_current))
        .or_else(|| seasons.first());

    let gender = prefs.gender.unwrap_or_default();

    let season_rows = match selected_season {
        Some(season) => catalog.rows_with_pools(season.id, gender).await?,
        None => Vec::new(),
    };

    // Age groups in their canonical order
    let available_age_groups: Vec<AgeGroup> = season_rows
        .iter()
        .map(|row| row.age_group)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let selected_age_group = prefs
        .age_group
        .filter(|age_group| available_age_groups.contains(age_group))
        .or_else(|| available_age_groups.first().copied());

    let mut rows: Vec<competition_rows::Model> = season_rows
        .into_iter()
        .filter(|row| Some(row.age_group) == selected_age_group)
        .collect();
    rows.sort_by_key(|row| sort_key(&row.name));
    let (cup_rows, league_rows): (Vec<_>, Vec<_>) =
        rows.into_iter().partition(|row| is_cup_row_name(&row.name));

    let mut row_options = Vec::with_capacity(league_rows.len() + 1);
    if !cup_rows.is_empty() {
        row_options.push(RowOption {
            id: CUP_ROW_ID.to_owned(),
            name: CUP_NAME.to_owned(),
        });
    }
    row_options.extend(league_rows.iter().map(|row| RowOption {
        id: row.id.to_string(),
        name: row.name.clone(),
    }));

    // A stored cup row maps onto the virtual cup row
    let requested_row = prefs.competition_row_id.as_deref().map(|id| {
        if cup_rows.iter().any(|row| row.id.to_string() == id) {
            CUP_ROW_ID
        } else {
            id
        }
    });
    let selected_row_id = first_valid(requested_row, row_options.iter().map(|o| o.id.as_str()));
    let is_cup = selected_row_id.as_deref() == Some(CUP_ROW_ID);

    let cup_pools = if is_cup {
        catalog
            .pools_of_rows(cup_rows.iter().map(|row| row.id).collect())
            .await?
    } else {
        Vec::new()
    };

    let pool_options: Vec<PoolOption> = if is_cup {
        vec![PoolOption {
            id: CUP_POOL_ID.to_owned(),
            pulje_id: 0,
            name: CUP_NAME.to_owned(),
        }]
    } else if let Some(row_id) = selected_row_id.as_deref().and_then(parse_id) {
        let mut pools = catalog.pools_of_rows(vec![row_id]).await?;
        pools.sort_by_key(|pool| sort_key(&pool.name));
        pools
            .into_iter()
            .map(|pool| PoolOption {
                id: pool.id.to_string(),
                pulje_id: pool.pulje_id,
                name: pool.name,
            })
            .collect()
    } else {
        Vec::new()
    };

    let requested_pool = prefs.competition_pool_id.as_deref().map(|id| {
        if is_cup && cup_pools.iter().any(|pool| pool.id.to_string() == id) {
            CUP_POOL_ID
        } else {
            id
        }
    });
    let selected_pool_id =
        first_valid(requested_pool, pool_options.iter().map(|o| o.id.as_str()));

    let effective_pool_ids: Vec<Id> = if is_cup {
        cup_pools.iter().map(|pool| pool.id).collect()
    } else {
        selected_pool_id
            .as_deref()
            .and_then(parse_id)
            .into_iter()
            .collect()
    };

    let team_names = if is_cup {
        sorted_names(catalog.match_team_names(effective_pool_ids.clone()).await?)
    } else {
        match effective_pool_ids.first() {
            Some(pool_id) => {
                let standings: Vec<String> = catalog
                    .pool_standings(*pool_id)
                    .await?
                    .into_iter()
                    .map(|line| line.name)
                    .collect();
                if standings.is_empty() {
                    // Some competitions publish no standings table
                    sorted_names(catalog.match_team_names(vec![*pool_id]).await?)
                } else {
                    standings
                }
            }
            None => Vec::new(),
        }
    };

    let selected_team_name = first_valid(
        prefs.competition_team_name.as_deref(),
        team_names.iter().map(String::as_str),
    );

    Ok(CompetitionContext {
        seasons: seasons
            .iter()
            .map(|season| SeasonOption {
                start_year: season.start_year,
                label: format!("{}-{}", season.start_year, season.start_year + 1),
                is_current: season.is_current,
            })
            .collect(),
        selected_season_start_year: selected_season.map(|season| season.start_year),
        selected_season_id: selected_season.map(|season| season.id),
        selected_season_is_current: selected_season.map(|s| s.is_current).unwrap_or(false),
        selected_gender: gender,
        age_groups: available_age_groups
            .iter()
            .map(|value| AgeGroupOption {
                value: *value,
                label: value.label().to_owned(),
            })
            .collect(),
        selected_age_group,
        rows: row_options,
        selected_row_id,
        pools: pool_options,
        selected_pool_id,
        effective_pool_ids,
        is_cup,
        team_names,
        selected_team_name,
    })
}

/// The requested value when it is among the options, otherwise the first option.
fn first_valid<'a>(
    requested: Option<&'a str>,
    options: impl Iterator<Item = &'a str> + Clone,
) -> Option<String> {
    requested
        .filter(|value| options.clone().any(|option| option == *value))
        .or_else(|| options.clone().next())
        .map(str::to_owned)
}

fn parse_id(value: &str) -> Option<Id> {
    Id::parse_str(value).ok()
}

fn sorted_names(mut names: Vec<String>) -> Vec<String> {
    names.sort_by_key(|name| sort_key(name));
    names.dedup();
    names
}

/// Case-insensitive key that orders æ, ø and å after z, as Danish does.
pub(crate) fn sort_key(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'æ' => '{',
            'ø' => '|',
            'å' => '}',
            other => other,
        })
        .collect()
}
