//! Read-only queries over the competition reference data: seasons, rows,
//! pools, pool standings and matches.
use super::error::{EntityApiErrorKind, Error};
use entity::gender::Gender;
use entity::{
    competition_matches, competition_pool_teams, competition_pools, competition_rows,
    competition_seasons, Id,
};
use sea_orm::{entity::prelude::*, ConnectionTrait, JoinType, QueryOrder, QuerySelect};

/// All seasons, newest first.
pub async fn find_seasons(
    db: &impl ConnectionTrait,
) -> Result<Vec<competition_seasons::Model>, Error> {
    Ok(competition_seasons::Entity::find()
        .order_by_desc(competition_seasons::Column::StartYear)
        .all(db)
        .await?)
}

/// Ids of the seasons that have at least one row with a pool.
pub async fn find_season_ids_with_pools(db: &impl ConnectionTrait) -> Result<Vec<Id>, Error> {
    Ok(competition_rows::Entity::find()
        .select_only()
        .column(competition_rows::Column::SeasonId)
        .join(
            JoinType::InnerJoin,
            competition_rows::Relation::CompetitionPools.def(),
        )
        .distinct()
        .into_tuple::<Id>()
        .all(db)
        .await?)
}

/// Rows of a season and gender that have at least one pool, by name.
pub async fn find_rows_with_pools(
    db: &impl ConnectionTrait,
    season_id: Id,
    gender: Gender,
) -> Result<Vec<competition_rows::Model>, Error> {
    Ok(competition_rows::Entity::find()
        .join(
            JoinType::InnerJoin,
            competition_rows::Relation::CompetitionPools.def(),
        )
        .filter(competition_rows::Column::SeasonId.eq(season_id))
        .filter(competition_rows::Column::Gender.eq(gender))
        .distinct()
        .order_by_asc(competition_rows::Column::Name)
        .all(db)
        .await?)
}

pub async fn find_row_by_id(
    db: &impl ConnectionTrait,
    id: Id,
) -> Result<competition_rows::Model, Error> {
    competition_rows::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::new(EntityApiErrorKind::RecordNotFound))
}

/// Pools of the given rows, by name.
pub async fn find_pools_by_rows(
    db: &impl ConnectionTrait,
    row_ids: Vec<Id>,
) -> Result<Vec<competition_pools::Model>, Error> {
    if row_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(competition_pools::Entity::find()
        .filter(competition_pools::Column::RowId.is_in(row_ids))
        .order_by_asc(competition_pools::Column::Name)
        .all(db)
        .await?)
}

pub async fn find_pool_by_id(
    db: &impl ConnectionTrait,
    id: Id,
) -> Result<competition_pools::Model, Error> {
    competition_pools::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::new(EntityApiErrorKind::RecordNotFound))
}

/// Standings of a pool ordered by rank, ties broken by name.
pub async fn find_pool_teams(
    db: &impl ConnectionTrait,
    pool_id: Id,
) -> Result<Vec<competition_pool_teams::Model>, Error> {
    Ok(competition_pool_teams::Entity::find()
        .filter(competition_pool_teams::Column::PoolId.eq(pool_id))
        .order_by_asc(competition_pool_teams::Column::Rank)
        .order_by_asc(competition_pool_teams::Column::Name)
        .all(db)
        .await?)
}

/// Matches of the given pools in programme order.
pub async fn find_matches_by_pools(
    db: &impl ConnectionTrait,
    pool_ids: Vec<Id>,
) -> Result<Vec<competition_matches::Model>, Error> {
    if pool_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(competition_matches::Entity::find()
        .filter(competition_matches::Column::PoolId.is_in(pool_ids))
        .order_by_asc(competition_matches::Column::StartsAt)
        .order_by_asc(competition_matches::Column::MatchNo)
        .all(db)
        .await?)
}

pub async fn find_match_by_id(
    db: &impl ConnectionTrait,
    id: Id,
) -> Result<competition_matches::Model, Error> {
    competition_matches::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::new(EntityApiErrorKind::RecordNotFound))
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn find_pools_by_rows_skips_the_query_for_no_rows() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        assert!(find_pools_by_rows(&db, vec![]).await?.is_empty());
        assert!(find_matches_by_pools(&db, vec![]).await?.is_empty());
        assert!(db.into_transaction_log().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn find_pool_teams_returns_the_standings() -> Result<(), Error> {
        let now = Utc::now();
        let pool_id = Id::new_v4();
        let standings = vec![competition_pool_teams::Model {
            id: Id::new_v4(),
            pool_id,
            name: "Alliancen København".to_owned(),
            rank: 1,
            played: 10,
            points: 27,
            created_at: now.into(),
            updated_at: now.into(),
        }];
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([standings.clone()])
            .into_connection();

        assert_eq!(find_pool_teams(&db, pool_id).await?, standings);

        Ok(())
    }

    #[tokio::test]
    async fn find_match_by_id_returns_not_found_for_a_missing_match() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<competition_matches::Model>::new()])
            .into_connection();

        let result = find_match_by_id(&db, Id::new_v4()).await;
        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );

        Ok(())
    }
}
