use super::error::{EntityApiErrorKind, Error};
use chrono::Utc;
use entity::approval_status::ApprovalStatus;
use entity::roles::Role;
use entity::user_roles::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*, sea_query::Expr, ConnectionTrait, QueryOrder, Set,
};

const LIVE_STATUSES: [ApprovalStatus; 3] = [
    ApprovalStatus::PendingLeader,
    ApprovalStatus::PendingAdmin,
    ApprovalStatus::Approved,
];

pub async fn create(db: &impl ConnectionTrait, membership: Model) -> Result<Model, Error> {
    debug!(
        "New membership to be inserted: {} {} ({})",
        membership.role, membership.scope_key, membership.status
    );

    let now = Utc::now();
    let active_model = ActiveModel {
        user_id: Set(membership.user_id),
        role: Set(membership.role),
        status: Set(membership.status),
        club_id: Set(membership.club_id),
        team_id: Set(membership.team_id),
        referee_id: Set(membership.referee_id),
        club_leader_title: Set(membership.club_leader_title),
        scope_key: Set(membership.scope_key),
        decided_by_id: Set(membership.decided_by_id),
        decided_at: Set(membership.decided_at),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::new(EntityApiErrorKind::RecordNotFound))
}

/// All memberships of a user, newest first.
pub async fn find_by_user(db: &impl ConnectionTrait, user_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// A pending or approved membership of `user_id` for the same role and scope, if any.
pub async fn find_live(
    db: &impl ConnectionTrait,
    user_id: Id,
    role: Role,
    scope_key: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::Role.eq(role))
        .filter(Column::ScopeKey.eq(scope_key))
        .filter(Column::Status.is_in(LIVE_STATUSES))
        .one(db)
        .await?)
}

/// Pending memberships for any of `roles`, newest first.
pub async fn find_pending_by_roles(
    db: &impl ConnectionTrait,
    roles: Vec<Role>,
) -> Result<Vec<Model>, Error> {
    if roles.is_empty() {
        return Ok(Vec::new());
    }

    Ok(Entity::find()
        .filter(Column::Role.is_in(roles))
        .filter(Column::Status.is_in([ApprovalStatus::PendingLeader, ApprovalStatus::PendingAdmin]))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Moves a membership from `expected` to `next` in a single conditional update.
/// Fails with `RecordConflict` when the row no longer holds `expected`.
pub async fn transition_status(
    db: &impl ConnectionTrait,
    id: Id,
    expected: ApprovalStatus,
    next: ApprovalStatus,
    decided_by_id: Option<Id>,
) -> Result<Model, Error> {
    let now: DateTimeWithTimeZone = Utc::now().into();

    let mut update = Entity::update_many()
        .col_expr(Column::Status, Column::Status.save_as(Expr::val(next)))
        .col_expr(Column::UpdatedAt, Expr::value(now));
    if decided_by_id.is_some() {
        update = update
            .col_expr(Column::DecidedById, Expr::value(decided_by_id))
            .col_expr(Column::DecidedAt, Expr::value(Some(now)));
    }

    let result = update
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(expected))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        warn!("Membership {id} was no longer {expected} when moving it to {next}");
        return Err(Error::new(EntityApiErrorKind::RecordConflict));
    }

    find_by_id(db, id).await
}

pub async fn delete_by_id(db: &impl ConnectionTrait, id: Id) -> Result<(), Error> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::new(EntityApiErrorKind::RecordNotFound));
    }
    Ok(())
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod test {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn membership(status: ApprovalStatus) -> Model {
        let now = Utc::now();
        let club_id = Id::new_v4();
        Model {
            id: Id::new_v4(),
            user_id: Id::new_v4(),
            role: Role::ClubLeader,
            status,
            club_id: Some(club_id),
            team_id: None,
            referee_id: None,
            club_leader_title: Some(entity::roles::ClubLeaderTitle::Formand),
            scope_key: format!("club:{club_id}"),
            decided_by_id: None,
            decided_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn transition_status_returns_the_updated_membership() -> Result<(), Error> {
        let approved = membership(ApprovalStatus::Approved);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[approved.clone()]])
            .into_connection();

        let result = transition_status(
            &db,
            approved.id,
            ApprovalStatus::PendingAdmin,
            ApprovalStatus::Approved,
            Some(Id::new_v4()),
        )
        .await?;

        assert_eq!(result.status, ApprovalStatus::Approved);

        Ok(())
    }

    #[tokio::test]
    async fn transition_status_is_a_conflict_when_no_row_matched() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = transition_status(
            &db,
            Id::new_v4(),
            ApprovalStatus::PendingAdmin,
            ApprovalStatus::Rejected,
            Some(Id::new_v4()),
        )
        .await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordConflict
        );

        Ok(())
    }

    #[tokio::test]
    async fn find_pending_by_roles_skips_the_query_for_no_roles() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        assert!(find_pending_by_roles(&db, vec![]).await?.is_empty());
        assert!(db.into_transaction_log().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn delete_by_id_is_not_found_when_nothing_was_deleted() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = delete_by_id(&db, Id::new_v4()).await;
        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );

        Ok(())
    }
}
