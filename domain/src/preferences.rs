//! Session-scoped UI preferences and the cascading rules between them.
//!
//! Selections form two dependency chains, `league -> team` and
//! `season | gender -> age group -> competition row -> pool -> team name`.
//! Setting a value clears everything strictly downstream of it, so the stored
//! set never holds a selection that was made under a different upstream value.
use crate::error::Error;
use crate::filter::{sort_key, CompetitionCatalog, CUP_POOL_ID, CUP_ROW_ID};
use crate::{age_group::AgeGroup, gender::Gender, teams, Id};
use entity_api::{league, team};
use log::*;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use utoipa::ToSchema;

/// Key under which the preferences are stored in the server-side session.
pub const SESSION_KEY: &str = "preferences";

pub const MIN_SEASON_START_YEAR: i32 = 2000;
pub const MAX_SEASON_START_YEAR: i32 = 2100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CalendarMode {
    #[default]
    All,
    Team,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatsAggregationMode {
    #[default]
    Total,
    PerGame,
}

impl FromStr for CalendarMode {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "all" => Ok(CalendarMode::All),
            "team" => Ok(CalendarMode::Team),
            _ => Err(()),
        }
    }
}

impl FromStr for ViewMode {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "light" => Ok(ViewMode::Light),
            "dark" => Ok(ViewMode::Dark),
            _ => Err(()),
        }
    }
}

impl FromStr for StatsAggregationMode {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "total" => Ok(StatsAggregationMode::Total),
            "per_game" | "pergame" => Ok(StatsAggregationMode::PerGame),
            _ => Err(()),
        }
    }
}

fn parse_choice<T: FromStr>(value: &str, what: &str) -> Result<T, Error> {
    value
        .parse::<T>()
        .map_err(|_| Error::bad_selection(format!("Unknown {what}: {}", value.trim())))
}

/// Parses a gender in any letter case, e.g. `men` or `MEN`.
pub fn parse_gender(value: &str) -> Result<Gender, Error> {
    parse_choice(value, "gender")
}

/// Parses an age group by value or label, e.g. `u17`, `U17` or `U-17`.
pub fn parse_age_group(value: &str) -> Result<AgeGroup, Error> {
    parse_choice(value, "age group")
}

pub fn parse_calendar_mode(value: &str) -> Result<CalendarMode, Error> {
    parse_choice(value, "calendar mode")
}

pub fn parse_view_mode(value: &str) -> Result<ViewMode, Error> {
    parse_choice(value, "view mode")
}

pub fn parse_stats_aggregation_mode(value: &str) -> Result<StatsAggregationMode, Error> {
    parse_choice(value, "stats aggregation mode")
}

/// Reads a season start year given either as a JSON number or as a string.
/// The range is checked by [`SessionPreferences::set_season`].
pub fn parse_season_start_year(value: &Value) -> Result<i32, Error> {
    let year = match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    year.and_then(|year| i32::try_from(year).ok())
        .ok_or_else(|| Error::bad_selection("Season start year is not a number"))
}

fn parse_selected_id(value: &str, what: &str) -> Result<Id, Error> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::bad_selection(format!("{what} id is missing")));
    }
    entity_api::uuid_parse_str(value).map_err(|_| Error::bad_selection(format!("Unknown {what}")))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionPreferences {
    /// Set while a user is logged in; `None` marks a guest session
    #[schema(value_type = Option<Uuid>)]
    pub user_id: Option<Id>,
    pub guest_defaults_applied: bool,
    #[schema(value_type = Option<Uuid>)]
    pub league_id: Option<Id>,
    #[schema(value_type = Option<Uuid>)]
    pub team_id: Option<Id>,
    pub season_start_year: Option<i32>,
    pub gender: Option<Gender>,
    pub age_group: Option<AgeGroup>,
    /// A row id, or the virtual cup row id
    pub competition_row_id: Option<String>,
    /// A pool id, or the virtual cup pool id
    pub competition_pool_id: Option<String>,
    pub competition_team_name: Option<String>,
    pub calendar_mode: Option<CalendarMode>,
    pub view_mode: Option<ViewMode>,
    pub stats_aggregation_mode: Option<StatsAggregationMode>,
}

impl SessionPreferences {
    pub fn is_guest(&self) -> bool {
        self.user_id.is_none()
    }

    /// Whether any league or competition slicer holds a value.
    pub fn has_selection(&self) -> bool {
        self.gender.is_some()
            || self.age_group.is_some()
            || self.season_start_year.is_some()
            || self.league_id.is_some()
            || self.team_id.is_some()
            || self.competition_row_id.is_some()
            || self.competition_pool_id.is_some()
            || self.competition_team_name.is_some()
    }

    pub fn set_league(&mut self, league_id: Id) {
        self.league_id = Some(league_id);
        self.team_id = None;
        self.touched_by_guest();
    }

    pub fn set_team(&mut self, team: &teams::Model) {
        self.league_id = Some(team.league_id);
        self.team_id = Some(team.id);
        self.touched_by_guest();
    }

    pub fn set_season(&mut self, start_year: i32) -> Result<(), Error> {
        if !(MIN_SEASON_START_YEAR..=MAX_SEASON_START_YEAR).contains(&start_year) {
            return Err(Error::bad_selection(format!(
                "Season start year must be between {MIN_SEASON_START_YEAR} and {MAX_SEASON_START_YEAR}"
            )));
        }
        self.season_start_year = Some(start_year);
        self.clear_from_age_group();
        self.touched_by_guest();
        Ok(())
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.gender = Some(gender);
        self.clear_from_age_group();
        self.touched_by_guest();
    }

    pub fn set_age_group(&mut self, age_group: AgeGroup) {
        self.age_group = Some(age_group);
        self.clear_from_row();
        self.touched_by_guest();
    }

    /// Selects a row together with the pool it opens on.
    pub fn set_competition_row(&mut self, row_id: String, pool_id: String) {
        self.competition_row_id = Some(row_id);
        self.competition_pool_id = Some(pool_id);
        self.competition_team_name = None;
        self.touched_by_guest();
    }

    /// Selects a pool and the row it belongs to.
    pub fn set_competition_pool(&mut self, row_id: String, pool_id: String) {
        self.competition_row_id = Some(row_id);
        self.competition_pool_id = Some(pool_id);
        self.competition_team_name = None;
        self.touched_by_guest();
    }

    pub fn set_competition_team(&mut self, team_name: &str) -> Result<(), Error> {
        let team_name = team_name.trim();
        if team_name.is_empty() {
            return Err(Error::bad_selection("Team name is missing"));
        }
        self.competition_team_name = Some(team_name.to_owned());
        self.touched_by_guest();
        Ok(())
    }

    pub fn set_calendar_mode(&mut self, mode: CalendarMode) {
        self.calendar_mode = Some(mode);
        self.touched_by_guest();
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = Some(mode);
        self.touched_by_guest();
    }

    pub fn set_stats_aggregation_mode(&mut self, mode: StatsAggregationMode) {
        self.stats_aggregation_mode = Some(mode);
        self.touched_by_guest();
    }

    fn clear_from_age_group(&mut self) {
        self.age_group = None;
        self.clear_from_row();
    }

    fn clear_from_row(&mut self) {
        self.competition_row_id = None;
        self.competition_pool_id = None;
        self.competition_team_name = None;
    }

    // A guest who picks anything has made the session their own
    fn touched_by_guest(&mut self) {
        if self.is_guest() {
            self.guest_defaults_applied = true;
        }
    }
}

pub async fn select_league(
    db: &DatabaseConnection,
    prefs: &mut SessionPreferences,
    league_id: &str,
) -> Result<(), Error> {
    let league_id = parse_selected_id(league_id, "league")?;
    let league = league::find_by_id(db, league_id)
        .await
        .map_err(|_| Error::bad_selection("Unknown league"))?;
    prefs.set_league(league.id);
    Ok(())
}

pub async fn select_team(
    db: &DatabaseConnection,
    prefs: &mut SessionPreferences,
    team_id: &str,
) -> Result<(), Error> {
    let team_id = parse_selected_id(team_id, "team")?;
    let team = team::find_by_id(db, team_id)
        .await
        .map_err(|_| Error::bad_selection("Unknown team"))?;
    prefs.set_team(&team);
    Ok(())
}

pub async fn select_competition_row<C>(
    catalog: &C,
    prefs: &mut SessionPreferences,
    row_id: &str,
) -> Result<(), Error>
where
    C: CompetitionCatalog + ?Sized,
{
    let row_id = row_id.trim();
    if row_id == CUP_ROW_ID {
        prefs.set_competition_row(CUP_ROW_ID.to_owned(), CUP_POOL_ID.to_owned());
        return Ok(());
    }

    let id = parse_selected_id(row_id, "competition row")?;
    let row = catalog
        .row_by_id(id)
        .await?
        .ok_or_else(|| Error::bad_selection("Unknown competition row"))?;
    // Opens on the pool the resolver would list first
    let first_pool = catalog
        .pools_of_rows(vec![row.id])
        .await?
        .into_iter()
        .min_by_key(|pool| sort_key(&pool.name))
        .ok_or_else(|| Error::bad_selection("Competition row has no pools"))?;

    debug!("Row {} opens on pool {}", row.id, first_pool.id);
    prefs.set_competition_row(row.id.to_string(), first_pool.id.to_string());
    Ok(())
}

pub async fn select_competition_pool<C>(
    catalog: &C,
    prefs: &mut SessionPreferences,
    pool_id: &str,
) -> Result<(), Error>
where
    C: CompetitionCatalog + ?Sized,
{
    let pool_id = pool_id.trim();
    if pool_id == CUP_POOL_ID {
        prefs.set_competition_pool(CUP_ROW_ID.to_owned(), CUP_POOL_ID.to_owned());
        return Ok(());
    }

    let id = parse_selected_id(pool_id, "competition pool")?;
    let pool = catalog
        .pool_by_id(id)
        .await?
        .ok_or_else(|| Error::bad_selection("Unknown competition pool"))?;
    prefs.set_competition_pool(pool.row_id.to_string(), pool.id.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, RequestErrorKind};
    use chrono::Utc;

    fn fully_selected() -> SessionPreferences {
        SessionPreferences {
            user_id: Some(Id::new_v4()),
            guest_defaults_applied: false,
            league_id: Some(Id::new_v4()),
            team_id: Some(Id::new_v4()),
            season_start_year: Some(2025),
            gender: Some(Gender::Men),
            age_group: Some(AgeGroup::Senior),
            competition_row_id: Some(Id::new_v4().to_string()),
            competition_pool_id: Some(Id::new_v4().to_string()),
            competition_team_name: Some("Alliancen København".to_owned()),
            calendar_mode: Some(CalendarMode::Team),
            view_mode: Some(ViewMode::Dark),
            stats_aggregation_mode: Some(StatsAggregationMode::PerGame),
        }
    }

    #[test]
    fn selecting_a_gender_clears_everything_below_it() {
        let mut prefs = fully_selected();
        prefs.set_gender(Gender::Women);

        assert_eq!(prefs.gender, Some(Gender::Women));
        assert_eq!(prefs.season_start_year, Some(2025));
        assert_eq!(prefs.age_group, None);
        assert_eq!(prefs.competition_row_id, None);
        assert_eq!(prefs.competition_pool_id, None);
        assert_eq!(prefs.competition_team_name, None);
        // The league chain is independent
        assert!(prefs.league_id.is_some());
        assert!(prefs.team_id.is_some());
    }

    #[test]
    fn selecting_a_season_clears_the_age_group_chain() {
        let mut prefs = fully_selected();
        prefs.set_season(2024).unwrap();

        assert_eq!(prefs.season_start_year, Some(2024));
        assert_eq!(prefs.gender, Some(Gender::Men));
        assert_eq!(prefs.age_group, None);
        assert_eq!(prefs.competition_row_id, None);
    }

    #[test]
    fn seasons_outside_the_supported_range_are_rejected() {
        let mut prefs = fully_selected();
        let err = prefs.set_season(1999).unwrap_err();

        assert!(matches!(
            err.error_kind,
            DomainErrorKind::Request(RequestErrorKind::BadSelection(_))
        ));
        assert!(prefs.set_season(2101).is_err());
        assert!(prefs.set_season(2000).is_ok());
        assert!(prefs.set_season(2100).is_ok());
    }

    #[test]
    fn selecting_an_age_group_keeps_gender_and_season() {
        let mut prefs = fully_selected();
        prefs.set_age_group(AgeGroup::U17);

        assert_eq!(prefs.age_group, Some(AgeGroup::U17));
        assert_eq!(prefs.gender, Some(Gender::Men));
        assert_eq!(prefs.season_start_year, Some(2025));
        assert_eq!(prefs.competition_row_id, None);
        assert_eq!(prefs.competition_pool_id, None);
        assert_eq!(prefs.competition_team_name, None);
    }

    #[test]
    fn selecting_a_row_sets_its_pool_and_clears_the_team_name() {
        let mut prefs = fully_selected();
        prefs.set_competition_row("row".to_owned(), "pool".to_owned());

        assert_eq!(prefs.competition_row_id.as_deref(), Some("row"));
        assert_eq!(prefs.competition_pool_id.as_deref(), Some("pool"));
        assert_eq!(prefs.competition_team_name, None);
        assert_eq!(prefs.age_group, Some(AgeGroup::Senior));
    }

    #[test]
    fn selecting_a_league_clears_the_team() {
        let mut prefs = fully_selected();
        let league_id = Id::new_v4();
        prefs.set_league(league_id);

        assert_eq!(prefs.league_id, Some(league_id));
        assert_eq!(prefs.team_id, None);
    }

    #[test]
    fn selecting_a_team_also_selects_its_league() {
        let now = Utc::now();
        let team = teams::Model {
            id: Id::new_v4(),
            league_id: Id::new_v4(),
            club_id: None,
            name: "Alliancen København".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        };
        let mut prefs = SessionPreferences::default();
        prefs.set_team(&team);

        assert_eq!(prefs.team_id, Some(team.id));
        assert_eq!(prefs.league_id, Some(team.league_id));
    }

    #[test]
    fn independent_modes_do_not_cascade() {
        let mut prefs = fully_selected();
        let before = prefs.clone();
        prefs.set_view_mode(ViewMode::Light);
        prefs.set_calendar_mode(CalendarMode::All);
        prefs.set_stats_aggregation_mode(StatsAggregationMode::Total);

        assert_eq!(prefs.competition_team_name, before.competition_team_name);
        assert_eq!(prefs.competition_pool_id, before.competition_pool_id);
        assert_eq!(prefs.team_id, before.team_id);
    }

    #[test]
    fn any_guest_selection_marks_the_session_initialised() {
        let mut prefs = SessionPreferences::default();
        assert!(prefs.is_guest());
        prefs.set_view_mode(ViewMode::Dark);
        assert!(prefs.guest_defaults_applied);

        let mut member = fully_selected();
        member.set_view_mode(ViewMode::Dark);
        assert!(!member.guest_defaults_applied);
    }

    fn is_bad_selection(err: Error) -> bool {
        matches!(
            err.error_kind,
            DomainErrorKind::Request(RequestErrorKind::BadSelection(_))
        )
    }

    #[test]
    fn slicer_values_parse_in_any_case() {
        assert_eq!(parse_gender("MEN").unwrap(), Gender::Men);
        assert_eq!(parse_gender(" women ").unwrap(), Gender::Women);
        assert_eq!(parse_age_group("U-17").unwrap(), AgeGroup::U17);
        assert_eq!(parse_age_group("SENIOR").unwrap(), AgeGroup::Senior);
        assert_eq!(parse_calendar_mode("TEAM").unwrap(), CalendarMode::Team);
        assert_eq!(parse_view_mode("Dark").unwrap(), ViewMode::Dark);
        assert_eq!(
            parse_stats_aggregation_mode("per-game").unwrap(),
            StatsAggregationMode::PerGame
        );
    }

    #[test]
    fn unknown_slicer_values_are_bad_selections() {
        assert!(is_bad_selection(parse_gender("mixed").unwrap_err()));
        assert!(is_bad_selection(parse_age_group("u99").unwrap_err()));
        assert!(is_bad_selection(parse_calendar_mode("").unwrap_err()));
        assert!(is_bad_selection(parse_view_mode("sepia").unwrap_err()));
        assert!(is_bad_selection(
            parse_stats_aggregation_mode("median").unwrap_err()
        ));
    }

    #[test]
    fn season_start_years_may_be_numbers_or_strings() {
        assert_eq!(parse_season_start_year(&serde_json::json!(2025)).unwrap(), 2025);
        assert_eq!(parse_season_start_year(&serde_json::json!(" 2024 ")).unwrap(), 2024);
        assert!(is_bad_selection(
            parse_season_start_year(&serde_json::json!("abc")).unwrap_err()
        ));
        assert!(is_bad_selection(
            parse_season_start_year(&serde_json::json!(2025.5)).unwrap_err()
        ));
        assert!(is_bad_selection(
            parse_season_start_year(&serde_json::Value::Null).unwrap_err()
        ));
    }

    #[test]
    fn blank_team_names_are_rejected() {
        let mut prefs = SessionPreferences::default();
        assert!(prefs.set_competition_team("   ").is_err());
        prefs.set_competition_team(" Alliancen København ").unwrap();
        assert_eq!(
            prefs.competition_team_name.as_deref(),
            Some("Alliancen København")
        );
    }
}


#[cfg(test)]
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use crate::error::{DomainErrorKind, RequestErrorKind};
    use crate::leagues;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn an_unknown_league_is_a_bad_selection() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<leagues::Model>::new()])
            .into_connection();
        let mut prefs = SessionPreferences::default();

        let err = select_league(&db, &mut prefs, &Id::new_v4().to_string())
            .await
            .unwrap_err();
        assert!(matches!(
            err.error_kind,
            DomainErrorKind::Request(RequestErrorKind::BadSelection(_))
        ));
        assert_eq!(prefs.league_id, None);
    }

    #[tokio::test]
    async fn a_malformed_league_id_never_reaches_the_database() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let mut prefs = SessionPreferences::default();

        assert!(select_league(&db, &mut prefs, "not-a-uuid").await.is_err());
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn selecting_a_league_clears_the_team() -> Result<(), Error> {
        let now = Utc::now();
        let league = leagues::Model {
            id: Id::new_v4(),
            name: "Floorball Ligaen".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![league.clone()]])
            .into_connection();
        let mut prefs = SessionPreferences {
            team_id: Some(Id::new_v4()),
            ..Default::default()
        };

        select_league(&db, &mut prefs, &league.id.to_string()).await?;
        assert_eq!(prefs.league_id, Some(league.id));
        assert_eq!(prefs.team_id, None);
        Ok(())
    }

    #[tokio::test]
    async fn selecting_a_team_selects_its_league() -> Result<(), Error> {
        let now = Utc::now();
        let team = teams::Model {
            id: Id::new_v4(),
            league_id: Id::new_v4(),
            club_id: None,
            name: "Alliancen København".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![team.clone()]])
            .into_connection();
        let mut prefs = SessionPreferences::default();

        select_team(&db, &mut prefs, &team.id.to_string()).await?;
        assert_eq!(prefs.team_id, Some(team.id));
        assert_eq!(prefs.league_id, Some(team.league_id));
        Ok(())
    }
}
