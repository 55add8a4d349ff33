use chrono::{Duration, Utc};
use password_auth::generate_hash;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

pub use entity::{
    age_group, approval_status, clubs, competition_matches, competition_pool_teams,
    competition_pools, competition_rows, competition_seasons, gender, global_role, leagues,
    referees, roles, stats_events, stats_files, stats_kind, stats_players, teams, user_roles,
    users, Id,
};

pub mod club;
pub mod competition;
pub mod error;
pub mod league;
pub mod referee;
pub mod stats;
pub mod team;
pub mod user;
pub mod user_role;

pub fn uuid_parse_str(uuid_str: &str) -> Result<Id, error::Error> {
    Id::parse_str(uuid_str.trim()).map_err(|_| error::Error {
        source: None,
        error_kind: error::EntityApiErrorKind::InvalidQueryTerm,
    })
}

/// Fills an empty database with a small, self-consistent league: one admin,
/// a handful of clubs, teams and referees, and the current season's men's
/// senior league and cup with standings and matches.
pub async fn seed_database(db: &DatabaseConnection) -> Result<(), error::Error> {
    let now = Utc::now();

    let admin = users::ActiveModel {
        email: Set("seed.admin@floorball.dk".to_owned()),
        username: Set("seedadmin".to_owned()),
        name: Set(Some("Seed Admin".to_owned())),
        password: Set(generate_hash("dLxNxnjn&b!2sqkwFbb4s8jX")),
        global_role: Set(global_role::GlobalRole::Admin),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    user_roles::ActiveModel {
        user_id: Set(admin.id),
        role: Set(roles::Role::Admin),
        status: Set(approval_status::ApprovalStatus::Approved),
        scope_key: Set("global".to_owned()),
        decided_by_id: Set(Some(admin.id)),
        decided_at: Set(Some(now.into())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let herrer = leagues::ActiveModel {
        name: Set("Unihoc Floorball Liga Herrer".to_owned()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let damer = leagues::ActiveModel {
        name: Set("Unihoc Floorball Liga Damer".to_owned()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let club_names = [
        ("Alliancen København", "101"),
        ("Aarhus Floorball Klub", "102"),
        ("Benløse Floorball Club", "103"),
        ("Copenhagen Ninjas", "104"),
    ];
    let mut club_ids = Vec::new();
    for (name, club_no) in club_names {
        let club = clubs::ActiveModel {
            name: Set(name.to_owned()),
            club_no: Set(Some(club_no.to_owned())),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        club_ids.push((name, club.id));
    }

    for (name, club_id) in &club_ids {
        for league in [&herrer, &damer] {
            teams::ActiveModel {
                league_id: Set(league.id),
                club_id: Set(Some(*club_id)),
                name: Set(name.to_string()),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }

    for (name, referee_no) in [("Anders Dommer", "D-17"), ("Birgitte Dommer", "D-23")] {
        referees::ActiveModel {
            name: Set(name.to_owned()),
            referee_no: Set(Some(referee_no.to_owned())),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    let season = competition_seasons::ActiveModel {
        start_year: Set(current_season_start_year()),
        is_current: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    for (row_name, pool_name, pulje_id) in [
        ("Unihoc Floorball Liga Herrer", "Pulje 1", 9001),
        ("Pokalturneringen Herrer", "1. runde", 9101),
    ] {
        let row = competition_rows::ActiveModel {
            season_id: Set(season.id),
            gender: Set(gender::Gender::Men),
            age_group: Set(age_group::AgeGroup::Senior),
            name: Set(row_name.to_owned()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let pool = competition_pools::ActiveModel {
            row_id: Set(row.id),
            pulje_id: Set(pulje_id),
            name: Set(pool_name.to_owned()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let is_cup = row_name.starts_with("Pokal");
        if !is_cup {
            for (rank, (name, _)) in club_ids.iter().enumerate() {
                competition_pool_teams::ActiveModel {
                    pool_id: Set(pool.id),
                    name: Set(name.to_string()),
                    rank: Set(rank as i32 + 1),
                    played: Set(2),
                    points: Set(6 - 2 * rank as i32),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                    ..Default::default()
                }
                .insert(db)
                .await?;
            }
        }

        let mut match_no = 1;
        for (home, away) in [(0, 1), (2, 3), (1, 2), (3, 0)] {
            let starts_at = now + Duration::days(7 * match_no as i64);
            competition_matches::ActiveModel {
                pool_id: Set(pool.id),
                match_no: Set(match_no),
                starts_at: Set(Some(starts_at.into())),
                venue: Set(Some("Hal 1".to_owned())),
                home_team: Set(club_ids[home].0.to_owned()),
                away_team: Set(club_ids[away].0.to_owned()),
                home_score: Set(None),
                away_score: Set(None),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
                ..Default::default()
            }
            .insert(db)
            .await?;
            match_no += 1;
        }
    }

    Ok(())
}

/// A season runs from July to June; it is named after the year it starts in.
pub fn current_season_start_year() -> i32 {
    season_start_year_of(Utc::now().date_naive())
}

pub fn season_start_year_of(date: chrono::NaiveDate) -> i32 {
    use chrono::Datelike;
    if date.month() >= 7 {
        date.year()
    } else {
        date.year() - 1
    }
}
