//! Reference data: leagues, their teams, clubs and referees.
use crate::error::Error;
use crate::filter::{resolve_app_selection, AppSelection};
use crate::preferences::SessionPreferences;
use crate::{clubs, leagues, referees, teams, Id};
use entity_api::{club, league, referee, team};
use sea_orm::DatabaseConnection;

pub async fn list_leagues(db: &DatabaseConnection) -> Result<Vec<leagues::Model>, Error> {
    Ok(league::find_all(db).await?)
}

/// Teams of a league. An unknown league is not found rather than empty.
pub async fn list_teams(db: &DatabaseConnection, league_id: Id) -> Result<Vec<teams::Model>, Error> {
    let league = league::find_by_id(db, league_id).await?;
    Ok(team::find_by_league(db, league.id).await?)
}

pub async fn find_team(db: &DatabaseConnection, team_id: Id) -> Result<teams::Model, Error> {
    Ok(team::find_by_id(db, team_id).await?)
}

pub async fn list_all_teams(db: &DatabaseConnection) -> Result<Vec<teams::Model>, Error> {
    Ok(team::find_all(db).await?)
}

pub async fn list_clubs(db: &DatabaseConnection) -> Result<Vec<clubs::Model>, Error> {
    Ok(club::find_all(db).await?)
}

pub async fn list_referees(db: &DatabaseConnection) -> Result<Vec<referees::Model>, Error> {
    Ok(referee::find_all(db).await?)
}

/// Effective league and team for the session, with the league's teams.
pub async fn app_selection(
    db: &DatabaseConnection,
    prefs: &SessionPreferences,
) -> Result<AppSelection, Error> {
    let leagues = league::find_all(db).await?;
    let teams = team::find_all(db).await?;
    Ok(resolve_app_selection(prefs, &leagues, &teams))
}
