use super::error::{EntityApiErrorKind, Error};
use entity::leagues::{Column, Entity, Model};
use entity::Id;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder};

/// All leagues, alphabetically.
pub async fn find_all(db: &impl ConnectionTrait) -> Result<Vec<Model>, Error> {
    Ok(Entity::find().order_by_asc(Column::Name).all(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
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
    async fn find_by_id_returns_not_found_for_a_missing_league() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        let result = find_by_id(&db, Id::new_v4()).await;
        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
        Ok(())
    }

    #[tokio::test]
    async fn find_all_returns_a_list_of_records_when_present() -> Result<(), Error> {
        let now = Utc::now();
        let leagues = vec![
            Model {
                id: Id::new_v4(),
                name: "Unihoc Floorball Liga Damer".to_owned(),
                created_at: now.into(),
                updated_at: now.into(),
            },
            Model {
                id: Id::new_v4(),
                name: "Unihoc Floorball Liga Herrer".to_owned(),
                created_at: now.into(),
                updated_at: now.into(),
            },
        ];
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([leagues.clone()])
            .into_connection();

        assert_eq!(find_all(&db).await?, leagues);
        Ok(())
    }
}
