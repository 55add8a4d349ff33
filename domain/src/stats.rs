//! Statistics CSV uploads and the player figures derived from them.
use crate::approval::Actor;
use crate::error::Error;
use crate::filter::sort_key;
use crate::preferences::StatsAggregationMode;
use crate::{
    roles::Role, stats_events, stats_files, stats_kind::StatsKind, stats_players, teams, users, Id,
};
use chrono::Utc;
use csv::{ReaderBuilder, StringRecord, Trim};
use entity_api::{stats, team};
use log::*;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use utoipa::ToSchema;

pub const DEFAULT_EVENT_LIMIT: u64 = 200;
pub const MAX_EVENT_LIMIT: u64 = 1000;

const TIMESTAMP: &[&str] = &["timestamp", "time", "tid"];
const EVENT: &[&str] = &["event", "eventtype", "type", "haendelse", "hændelse"];
const TEAM_NAME: &[&str] = &["team", "teamname", "hold"];
const PERIOD: &[&str] = &["period", "periode"];
const STRENGTH: &[&str] = &["strength", "situation"];
const P1_NO: &[&str] = &["p1no", "p1number", "player1no", "player1number"];
const P1_NAME: &[&str] = &["p1name", "player1name", "player1"];
const P2_NO: &[&str] = &["p2no", "p2number", "player2no", "player2number"];
const P2_NAME: &[&str] = &["p2name", "player2name", "player2"];
const GOALIE_NAME: &[&str] = &["goalie", "goaliename", "keeper", "målmand"];
const X_M: &[&str] = &["xm", "x"];
const Y_M: &[&str] = &["ym", "y"];
const GAME_ID: &[&str] = &["gameid", "matchid", "kampid"];
const COMPETITION: &[&str] = &["competition", "league", "turnering"];
const GAME_DATE: &[&str] = &["gamedate", "date", "dato"];
const NUMBER: &[&str] = &["number", "no", "nr", "shirtnumber"];
const NAME: &[&str] = &["name", "player", "playername", "navn"];
const LINE: &[&str] = &["line", "kæde"];

/// Game details taken from the first data row of a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMetadata {
    pub game_id: Option<String>,
    pub competition: Option<String>,
    pub game_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFile {
    pub metadata: FileMetadata,
    pub events: Vec<stats_events::Model>,
    pub players: Vec<stats_players::Model>,
}

// Column positions found by header name.
struct Headers(Vec<String>);

impl Headers {
    fn new(record: &StringRecord) -> Self {
        Headers(record.iter().map(normalize_header).collect())
    }

    fn find(&self, aliases: &[&str]) -> Option<usize> {
        aliases
            .iter()
            .find_map(|alias| self.0.iter().position(|header| header == alias))
    }
}

/// Lowercases and drops everything but letters and digits, so `Player 1 Name` matches `player1name`.
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn text(record: &StringRecord, column: Option<usize>) -> Option<String> {
    column
        .and_then(|index| record.get(index))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

fn integer(record: &StringRecord, column: Option<usize>) -> Option<i32> {
    text(record, column).and_then(|value| value.parse().ok())
}

// Accepts both `1.5` and `1,5`.
fn decimal(record: &StringRecord, column: Option<usize>) -> Option<f64> {
    text(record, column).and_then(|value| value.replace(',', ".").parse().ok())
}

fn delimiter_of(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or_default();
    if header.matches(';').count() > header.matches(',').count() {
        b';'
    } else {
        b','
    }
}

/// Parses an uploaded CSV file into rows for `team_id`. Both `,` and `;` separated files are read.
pub fn parse_csv(kind: StatsKind, content: &str, team_id: Id) -> Result<ParsedFile, Error> {
    let content = content.trim_start_matches('\u{feff}');
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter_of(content))
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let headers = Headers::new(reader.headers()?);
    let game_id_column = headers.find(GAME_ID);
    let competition_column = headers.find(COMPETITION);
    let game_date_column = headers.find(GAME_DATE);

    let mut parsed = ParsedFile::default();
    let now = Utc::now();

    for (row_no, record) in reader.records().enumerate() {
        let record = record?;
        if row_no == 0 {
            parsed.metadata = FileMetadata {
                game_id: text(&record, game_id_column),
                competition: text(&record, competition_column),
                game_date: text(&record, game_date_column),
            };
        }

        match kind {
            StatsKind::Events => {
                let Some(event) = text(&record, headers.find(EVENT)) else {
                    continue;
                };
                parsed.events.push(stats_events::Model {
                    id: Id::nil(),
                    file_id: Id::nil(),
                    team_id,
                    row_no: row_no as i32 + 1,
                    timestamp: text(&record, headers.find(TIMESTAMP)),
                    event,
                    team_name: text(&record, headers.find(TEAM_NAME)),
                    period: text(&record, headers.find(PERIOD)),
                    strength: text(&record, headers.find(STRENGTH)),
                    p1_no: integer(&record, headers.find(P1_NO)),
                    p1_name: text(&record, headers.find(P1_NAME)),
                    p2_no: integer(&record, headers.find(P2_NO)),
                    p2_name: text(&record, headers.find(P2_NAME)),
                    goalie_name: text(&record, headers.find(GOALIE_NAME)),
                    x_m: decimal(&record, headers.find(X_M)),
                    y_m: decimal(&record, headers.find(Y_M)),
                    game_id: text(&record, game_id_column)
                        .or_else(|| parsed.metadata.game_id.clone()),
                    game_date: text(&record, game_date_column)
                        .or_else(|| parsed.metadata.game_date.clone()),
                    created_at: now.into(),
                });
            }
            StatsKind::Players => {
                let Some(name) = text(&record, headers.find(NAME)) else {
                    continue;
                };
                parsed.players.push(stats_players::Model {
                    id: Id::nil(),
                    file_id: Id::nil(),
                    team_id,
                    number: integer(&record, headers.find(NUMBER)),
                    name,
                    line: text(&record, headers.find(LINE)),
                    team_name: text(&record, headers.find(TEAM_NAME)),
                    game_id: text(&record, game_id_column)
                        .or_else(|| parsed.metadata.game_id.clone()),
                    created_at: now.into(),
                });
            }
        }
    }

    if parsed.events.is_empty() && parsed.players.is_empty() {
        return Err(Error::invalid(format!("The file holds no {kind} rows")));
    }
    Ok(parsed)
}

/// Approved team leaders of the team, club leaders of its club and admins.
pub fn can_manage_team(actor: &users::Model, team: &teams::Model) -> bool {
    let authority = Actor::from_user(actor);
    authority.is_admin()
        || authority.authorities.iter().any(|a| match a.role {
            Role::TeamLeader => a.team_id == Some(team.id),
            Role::ClubLeader => a.club_id.is_some() && a.club_id == team.club_id,
            _ => false,
        })
}

async fn managed_team(
    db: &DatabaseConnection,
    actor: &users::Model,
    team_id: Id,
) -> Result<teams::Model, Error> {
    let team = team::find_by_id(db, team_id).await?;
    if !can_manage_team(actor, &team) {
        return Err(Error::forbidden());
    }
    Ok(team)
}

pub async fn upload(
    db: &DatabaseConnection,
    actor: &users::Model,
    team_id: Id,
    kind: StatsKind,
    original_name: String,
    content: String,
) -> Result<stats_files::Model, Error> {
    let team = managed_team(db, actor, team_id).await?;
    let parsed = parse_csv(kind, &content, team.id)?;
    debug!(
        "Parsed {original_name}: {} events, {} players",
        parsed.events.len(),
        parsed.players.len()
    );

    let now = Utc::now();
    let file = stats_files::Model {
        id: Id::nil(),
        team_id: team.id,
        uploaded_by_id: actor.id,
        kind,
        original_name,
        content,
        game_id: parsed.metadata.game_id,
        competition: parsed.metadata.competition,
        game_date: parsed.metadata.game_date,
        created_at: now.into(),
        updated_at: now.into(),
    };

    Ok(stats::create_file(db, file, parsed.events, parsed.players).await?)
}

pub async fn list_files(
    db: &DatabaseConnection,
    team_id: Id,
    kind: Option<StatsKind>,
) -> Result<Vec<stats_files::Model>, Error> {
    Ok(stats::find_files(db, team_id, kind).await?)
}

pub async fn delete_file(
    db: &DatabaseConnection,
    actor: &users::Model,
    team_id: Id,
    file_id: Id,
) -> Result<(), Error> {
    let team = managed_team(db, actor, team_id).await?;
    let file = stats::find_file_by_id(db, file_id).await?;
    if file.team_id != team.id {
        return Err(Error::not_found());
    }

    stats::delete_file(db, file.id).await?;
    info!("User {} deleted stats file {}", actor.id, file.id);
    Ok(())
}

/// Zero and negative limits mean a single event.
pub fn clamp_event_limit(limit: Option<i64>) -> u64 {
    match limit {
        None => DEFAULT_EVENT_LIMIT,
        Some(limit) => u64::try_from(limit).unwrap_or(0).clamp(1, MAX_EVENT_LIMIT),
    }
}

pub async fn list_events(
    db: &DatabaseConnection,
    team_id: Id,
    limit: Option<i64>,
) -> Result<Vec<stats_events::Model>, Error> {
    Ok(stats::find_events(db, team_id, clamp_event_limit(limit)).await?)
}

pub async fn list_players(
    db: &DatabaseConnection,
    team_id: Id,
) -> Result<Vec<stats_players::Model>, Error> {
    Ok(stats::find_players(db, team_id).await?)
}

pub async fn summary(
    db: &DatabaseConnection,
    team_id: Id,
    mode: StatsAggregationMode,
) -> Result<Vec<PlayerSummary>, Error> {
    let events = stats::find_all_events(db, team_id).await?;
    Ok(player_summary(&events, mode))
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PlayerSummary {
    pub name: String,
    pub number: Option<i32>,
    pub games: u32,
    pub goals: f64,
    pub assists: f64,
    pub points: f64,
    pub shots: f64,
    pub penalties: f64,
}

#[derive(Default)]
struct Tally {
    number: Option<i32>,
    games: BTreeSet<String>,
    goals: u32,
    assists: u32,
    shots: u32,
    penalties: u32,
}

fn is_goal(event: &str) -> bool {
    event.contains("goal") || event.contains("mål")
}

fn is_shot(event: &str) -> bool {
    event.contains("shot") || is_goal(event)
}

fn is_penalty(event: &str) -> bool {
    event.contains("penalty") || event.contains("udvisning")
}

/// Per player figures over `events`, best scorers first.
pub fn player_summary(
    events: &[stats_events::Model],
    mode: StatsAggregationMode,
) -> Vec<PlayerSummary> {
    let mut tallies: HashMap<String, Tally> = HashMap::new();

    for event in events {
        let kind = event.event.to_lowercase();
        let game = event.game_id.clone().unwrap_or_default();

        if let Some(name) = event.p1_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            let tally = tallies.entry(name.to_owned()).or_default();
            tally.number = tally.number.or(event.p1_no);
            tally.games.insert(game.clone());
            if is_goal(&kind) {
                tally.goals += 1;
            }
            if is_shot(&kind) {
                tally.shots += 1;
            }
            if is_penalty(&kind) {
                tally.penalties += 1;
            }
        }

        if let Some(name) = event.p2_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            let tally = tallies.entry(name.to_owned()).or_default();
            tally.number = tally.number.or(event.p2_no);
            tally.games.insert(game);
            if is_goal(&kind) {
                tally.assists += 1;
            }
        }
    }

    let mut summaries: Vec<PlayerSummary> = tallies
        .into_iter()
        .map(|(name, tally)| {
            let games = tally.games.len() as u32;
            let divisor = match mode {
                StatsAggregationMode::Total => 1.0,
                StatsAggregationMode::PerGame => f64::from(games.max(1)),
            };
            let per = |count: u32| f64::from(count) / divisor;
            PlayerSummary {
                name,
                number: tally.number,
                games,
                goals: per(tally.goals),
                assists: per(tally.assists),
                points: per(tally.goals + tally.assists),
                shots: per(tally.shots),
                penalties: per(tally.penalties),
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.points
            .total_cmp(&a.points)
            .then(b.goals.total_cmp(&a.goals))
            .then_with(|| sort_key(&a.name).cmp(&sort_key(&b.name)))
    });
    summaries
}


#[cfg(test)]
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use crate::error::{DomainErrorKind, EntityErrorKind, InternalErrorKind, RequestErrorKind};
    use crate::{approval_status::ApprovalStatus, global_role::GlobalRole, user_roles};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn team() -> teams::Model {
        let now = Utc::now();
        teams::Model {
            id: Id::new_v4(),
            league_id: Id::new_v4(),
            club_id: Some(Id::new_v4()),
            name: "Alliancen København".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn leader_of(team_id: Id) -> users::Model {
        let now = Utc::now();
        let user_id = Id::new_v4();
        users::Model {
            id: user_id,
            email: "holdleder@floorball.dk".to_owned(),
            username: "holdleder".to_owned(),
            name: None,
            password: String::new(),
            global_role: GlobalRole::Member,
            created_at: now.into(),
            updated_at: now.into(),
            roles: vec![user_roles::Model {
                id: Id::new_v4(),
                user_id,
                role: Role::TeamLeader,
                status: ApprovalStatus::Approved,
                club_id: None,
                team_id: Some(team_id),
                referee_id: None,
                club_leader_title: None,
                scope_key: format!("team:{team_id}"),
                decided_by_id: None,
                decided_at: None,
                created_at: now.into(),
                updated_at: now.into(),
            }],
        }
    }

    fn file(team_id: Id, uploaded_by_id: Id) -> stats_files::Model {
        let now = Utc::now();
        stats_files::Model {
            id: Id::new_v4(),
            team_id,
            uploaded_by_id,
            kind: StatsKind::Events,
            original_name: "kamp.csv".to_owned(),
            content: String::new(),
            game_id: Some("G-1001".to_owned()),
            competition: None,
            game_date: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn stored_event(team_id: Id, game: &str, kind: &str, p1: &str, p2: Option<&str>) -> stats_events::Model {
        stats_events::Model {
            id: Id::new_v4(),
            file_id: Id::new_v4(),
            team_id,
            row_no: 1,
            timestamp: None,
            event: kind.to_owned(),
            team_name: None,
            period: None,
            strength: None,
            p1_no: Some(9),
            p1_name: Some(p1.to_owned()),
            p2_no: None,
            p2_name: p2.map(str::to_owned),
            goalie_name: None,
            x_m: None,
            y_m: None,
            game_id: Some(game.to_owned()),
            game_date: None,
            created_at: Utc::now().into(),
        }
    }

    const CSV: &str = "Game ID,Event,Player 1 Name\nG-1001,Shot,Jens Hansen\nG-1001,Goal,Jens Hansen\n";

    #[tokio::test]
    async fn staff_of_another_team_cannot_upload() {
        let team = team();
        let outsider = leader_of(Id::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[team.clone()]])
            .into_connection();

        let err = upload(
            &db,
            &outsider,
            team.id,
            StatsKind::Events,
            "kamp.csv".to_owned(),
            CSV.to_owned(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.error_kind, DomainErrorKind::Request(RequestErrorKind::Forbidden));
        // Only the team lookup ran
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn team_leaders_upload_files_with_their_rows() -> Result<(), Error> {
        let team = team();
        let leader = leader_of(team.id);
        let stored = file(team.id, leader.id);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[team.clone()]])
            .append_query_results([[stored.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 2,
            }])
            .into_connection();

        let created = upload(
            &db,
            &leader,
            team.id,
            StatsKind::Events,
            "kamp.csv".to_owned(),
            CSV.to_owned(),
        )
        .await?;
        assert_eq!(created, stored);

        // The file and its events are written in one transaction
        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2);
        assert!(format!("{:?}", log[1]).contains("stats_events"));
        Ok(())
    }

    #[tokio::test]
    async fn files_of_another_team_are_not_found() {
        let team = team();
        let leader = leader_of(team.id);
        let foreign = file(Id::new_v4(), Id::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[team.clone()]])
            .append_query_results([[foreign.clone()]])
            .into_connection();

        let err = delete_file(&db, &leader, team.id, foreign.id)
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
        // Nothing was deleted
        assert_eq!(db.into_transaction_log().len(), 2);
    }

    #[tokio::test]
    async fn team_leaders_delete_their_own_files() -> Result<(), Error> {
        let team = team();
        let leader = leader_of(team.id);
        let own = file(team.id, leader.id);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[team.clone()]])
            .append_query_results([[own.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        delete_file(&db, &leader, team.id, own.id).await?;
        assert_eq!(db.into_transaction_log().len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn summary_aggregates_the_stored_events() -> Result<(), Error> {
        let team_id = Id::new_v4();
        let events = vec![
            stored_event(team_id, "g1", "Goal", "Jens Hansen", Some("Mads Ørsted")),
            stored_event(team_id, "g1", "Shot", "Jens Hansen", None),
            stored_event(team_id, "g2", "Goal", "Jens Hansen", None),
            stored_event(team_id, "g2", "Goal", "Mads Ørsted", None),
        ];
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([events.clone()])
            .append_query_results([events])
            .into_connection();

        let total = summary(&db, team_id, StatsAggregationMode::Total).await?;
        assert_eq!(total[0].name, "Jens Hansen");
        assert_eq!(total[0].goals, 2.0);
        assert_eq!(total[0].shots, 3.0);
        assert_eq!(total[1].name, "Mads Ørsted");
        assert_eq!(total[1].points, 2.0);

        let per_game = summary(&db, team_id, StatsAggregationMode::PerGame).await?;
        assert_eq!(per_game[0].games, 2);
        assert_eq!(per_game[0].goals, 1.0);
        assert_eq!(per_game[1].assists, 0.5);
        Ok(())
    }
}
