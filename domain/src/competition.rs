//! Competition browsing over the resolved filter context.
use crate::error::Error;
use crate::filter::{resolve_competition_context, CompetitionContext};
use crate::preferences::{CalendarMode, SessionPreferences};
use crate::{competition_matches, competition_pool_teams, Id};
use entity_api::competition;
use sea_orm::DatabaseConnection;

pub async fn context(
    db: &DatabaseConnection,
    prefs: &SessionPreferences,
) -> Result<CompetitionContext, Error> {
    resolve_competition_context(db, prefs).await
}

/// Whether `game` involves `team_name`, ignoring case and surrounding whitespace.
pub fn involves_team(game: &competition_matches::Model, team_name: &str) -> bool {
    let team_name = team_name.trim().to_lowercase();
    [&game.home_team, &game.away_team]
        .iter()
        .any(|name| name.trim().to_lowercase() == team_name)
}

/// Keeps only the selected team's matches when the calendar shows one team.
pub fn narrow_to_team(
    matches: Vec<competition_matches::Model>,
    calendar_mode: CalendarMode,
    team_name: Option<&str>,
) -> Vec<competition_matches::Model> {
    match (calendar_mode, team_name) {
        (CalendarMode::Team, Some(team_name)) => matches
            .into_iter()
            .filter(|game| involves_team(game, team_name))
            .collect(),
        _ => matches,
    }
}

/// Matches of the effective pools, in kick-off order.
pub async fn matches(
    db: &DatabaseConnection,
    prefs: &SessionPreferences,
) -> Result<Vec<competition_matches::Model>, Error> {
    let context = context(db, prefs).await?;
    let matches = competition::find_matches_by_pools(db, context.effective_pool_ids).await?;

    Ok(narrow_to_team(
        matches,
        prefs.calendar_mode.unwrap_or_default(),
        context.selected_team_name.as_deref(),
    ))
}

pub async fn find_match(
    db: &DatabaseConnection,
    match_id: Id,
) -> Result<competition_matches::Model, Error> {
    Ok(competition::find_match_by_id(db, match_id).await?)
}

/// Standings of the selected pool. The cup has none.
pub async fn standings(
    db: &DatabaseConnection,
    prefs: &SessionPreferences,
) -> Result<Vec<competition_pool_teams::Model>, Error> {
    let context = context(db, prefs).await?;
    match (context.is_cup, context.effective_pool_ids.as_slice()) {
        (false, [pool_id]) => Ok(competition::find_pool_teams(db, *pool_id).await?),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn game(home: &str, away: &str) -> competition_matches::Model {
        competition_matches::Model {
            id: Id::new_v4(),
            pool_id: Id::new_v4(),
            match_no: 1,
            starts_at: Some(Utc::now().into()),
            venue: None,
            home_team: home.to_owned(),
            away_team: away.to_owned(),
            home_score: None,
            away_score: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn team_calendar_keeps_home_and_away_matches() {
        let matches = vec![
            game("Alliancen København", "Tølløse"),
            game("Greve", "Alliancen København"),
            game("Greve", "Tølløse"),
        ];

        let narrowed = narrow_to_team(
            matches,
            CalendarMode::Team,
            Some(" alliancen københavn "),
        );
        assert_eq!(narrowed.len(), 2);
    }

    #[test]
    fn full_calendar_keeps_every_match() {
        let matches = vec![game("Greve", "Tølløse"), game("Greve", "Frederikshavn")];

        assert_eq!(
            narrow_to_team(matches.clone(), CalendarMode::All, Some("Greve")).len(),
            2
        );
        assert_eq!(narrow_to_team(matches, CalendarMode::Team, None).len(), 2);
    }
}
