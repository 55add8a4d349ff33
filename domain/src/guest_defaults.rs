//! First-visit defaults for guest sessions.
use crate::error::Error;
use crate::filter::CompetitionCatalog;
use crate::preferences::SessionPreferences;
use crate::{age_group::AgeGroup, gender::Gender, leagues, teams};
use entity_api::{league, team};
use log::*;
use sea_orm::DatabaseConnection;
use service::config::Config;

/// Names the guest defaults are looked up by. A league, row, pool or team
/// matches when its name contains the configured name, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestDefaults {
    pub league_name: String,
    pub competition_row_name: String,
    pub pool_name: String,
    pub team_name: String,
}

impl GuestDefaults {
    pub fn from_config(config: &Config) -> Self {
        Self {
            league_name: config.guest_default_league.clone(),
            competition_row_name: config.guest_default_competition_row.clone(),
            pool_name: config.guest_default_pool.clone(),
            team_name: config.guest_default_team.clone(),
        }
    }
}

fn name_contains(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(&needle.trim().to_lowercase())
}

/// Fills an untouched guest session with the default selection and marks it
/// initialised. A guest who already picked anything is only marked
/// initialised; logged-in users are left alone. Returns whether `prefs` changed.
pub async fn ensure_guest_defaults<C>(
    catalog: &C,
    leagues: &[leagues::Model],
    teams: &[teams::Model],
    prefs: &mut SessionPreferences,
    defaults: &GuestDefaults,
) -> Result<bool, Error>
where
    C: CompetitionCatalog + ?Sized,
{
    if !prefs.is_guest() || prefs.guest_defaults_applied {
        return Ok(false);
    }

    if prefs.has_selection() {
        prefs.guest_defaults_applied = true;
        return Ok(true);
    }

    prefs.gender = Some(Gender::Men);
    prefs.age_group = Some(AgeGroup::Senior);

    let seasons = catalog.seasons().await?;
    let season = seasons.iter().find(|season| season.is_current);
    prefs.season_start_year = season.map(|season| season.start_year);

    let mut leagues: Vec<&leagues::Model> = leagues.iter().collect();
    leagues.sort_by(|a, b| a.name.cmp(&b.name));
    prefs.league_id = leagues
        .iter()
        .find(|league| name_contains(&league.name, &defaults.league_name))
        .map(|league| league.id);

    let mut teams: Vec<&teams::Model> = teams.iter().collect();
    teams.sort_by(|a, b| a.name.cmp(&b.name));
    if let Some(team) = teams.iter().find(|team| {
        name_contains(&team.name, &defaults.team_name)
            && prefs.league_id.map_or(true, |id| team.league_id == id)
    }) {
        prefs.team_id = Some(team.id);
        prefs.league_id.get_or_insert(team.league_id);
    }

    if let Some(season) = season {
        let row = catalog
            .rows_with_pools(season.id, Gender::Men)
            .await?
            .into_iter()
            .find(|row| {
                row.age_group == AgeGroup::Senior
                    && name_contains(&row.name, &defaults.competition_row_name)
            });

        if let Some(row) = row {
            prefs.competition_row_id = Some(row.id.to_string());

            for pool in catalog.pools_of_rows(vec![row.id]).await? {
                if name_contains(&pool.name, &defaults.pool_name)
                    && !catalog.pool_standings(pool.id).await?.is_empty()
                {
                    prefs.competition_pool_id = Some(pool.id.to_string());
                    break;
                }
            }
        }
    }

    prefs.competition_team_name = Some(defaults.team_name.clone());
    prefs.guest_defaults_applied = true;

    debug!("Applied guest defaults: {prefs:?}");
    Ok(true)
}

/// Applies the guest defaults against the database's reference data.
pub async fn apply(
    db: &DatabaseConnection,
    prefs: &mut SessionPreferences,
    defaults: &GuestDefaults,
) -> Result<bool, Error> {
    if !prefs.is_guest() || prefs.guest_defaults_applied {
        return Ok(false);
    }
    let leagues = league::find_all(db).await?;
    let teams = team::find_all(db).await?;
    ensure_guest_defaults(db, &leagues, &teams, prefs, defaults).await
}
