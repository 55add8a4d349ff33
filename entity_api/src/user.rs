use super::error::{EntityApiErrorKind, Error};
use async_trait::async_trait;
use axum_login::{AuthnBackend, UserId};
use chrono::Utc;

use entity::users::{ActiveModel, Column, Entity, Model};
use entity::{user_roles, Id};
use log::*;
use password_auth;
use sea_orm::{
    entity::prelude::*, sea_query::Expr, ConnectionTrait, DatabaseConnection, Set,
    TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

pub use entity::users::GlobalRole;

pub async fn create(db: &impl ConnectionTrait, user_model: Model) -> Result<Model, Error> {
    debug!("New User Model to be inserted: {:?}", user_model.email);

    let now = Utc::now();
    let user_active_model: ActiveModel = ActiveModel {
        email: Set(user_model.email.trim().to_lowercase()),
        username: Set(user_model.username.trim().to_owned()),
        name: Set(user_model.name),
        password: Set(generate_hash(user_model.password)),
        global_role: Set(user_model.global_role),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    let mut created_user = user_active_model.insert(db).await?;

    // Newly created users will not have roles at this point so we will add an empty vec manually
    created_user.roles = Vec::new();
    Ok(created_user)
}

/// Creates a user together with its first role membership in one transaction.
pub async fn create_with_membership(
    db: &impl TransactionTrait,
    user_model: Model,
    membership: user_roles::Model,
) -> Result<Model, Error> {
    let txn = db.begin().await?;

    let mut user = create(&txn, user_model).await?;
    let role = crate::user_role::create(
        &txn,
        user_roles::Model {
            user_id: user.id,
            ..membership
        },
    )
    .await?;

    user.roles = vec![role];

    txn.commit().await?;

    Ok(user)
}

pub async fn find_by_email(db: &impl ConnectionTrait, email: &str) -> Result<Option<Model>, Error> {
    let results = Entity::find()
        .filter(Column::Email.eq(email.trim().to_lowercase()))
        .find_with_related(user_roles::Entity)
        .all(db)
        .await?;
    match results.into_iter().next() {
        Some((mut user, roles)) => {
            user.roles = roles;
            Ok(Some(user))
        }
        None => Ok(None),
    }
}

pub async fn find_by_username(
    db: &impl ConnectionTrait,
    username: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Username.eq(username.trim()))
        .one(db)
        .await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    let results = Entity::find_by_id(id)
        .find_with_related(user_roles::Entity)
        .all(db)
        .await?;

    match results.into_iter().next() {
        Some((mut user, roles)) => {
            user.roles = roles;
            Ok(user)
        }
        None => Err(Error::new(EntityApiErrorKind::RecordNotFound)),
    }
}

/// Users by id, without their memberships.
pub async fn find_by_ids(db: &impl ConnectionTrait, ids: Vec<Id>) -> Result<Vec<Model>, Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(Entity::find().filter(Column::Id.is_in(ids)).all(db).await?)
}

/// Moves a user from `from` to `to`, leaving users in any other global role untouched.
/// Returns whether a row changed.
pub async fn promote_global_role(
    db: &impl ConnectionTrait,
    id: Id,
    from: GlobalRole,
    to: GlobalRole,
) -> Result<bool, Error> {
    let result = Entity::update_many()
        .col_expr(Column::GlobalRole, Column::GlobalRole.save_as(Expr::val(to)))
        .col_expr(Column::UpdatedAt, Expr::value(DateTimeWithTimeZone::from(Utc::now())))
        .filter(Column::Id.eq(id))
        .filter(Column::GlobalRole.eq(from))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn verify_password(password_to_verify: &str, password_hash: &str) -> Result<(), Error> {
    match password_auth::verify_password(password_to_verify, password_hash) {
        Ok(_) => Ok(()),
        Err(_) => Err(Error::new(EntityApiErrorKind::RecordUnauthenticated)),
    }
}

pub fn generate_hash(password: String) -> String {
    password_auth::generate_hash(password)
}

async fn authenticate_user(creds: Credentials, user: Model) -> Result<Option<Model>, Error> {
    match password_auth::verify_password(creds.password, &user.password) {
        Ok(_) => Ok(Some(user)),
        Err(_) => Err(Error::new(EntityApiErrorKind::RecordUnauthenticated)),
    }
}

#[derive(Debug, Clone)]
pub struct Backend {
    db: Arc<DatabaseConnection>,
}

#[derive(Debug, Clone, ToSchema, IntoParams, Deserialize)]
#[schema(as = domain::user::Credentials)] // OpenAPI schema
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub next: Option<String>,
}

impl Backend {
    pub fn new(db: &Arc<DatabaseConnection>) -> Self {
        Self {
            // Arc is cloned, but the source DatabaseConnection refers to the same instance
            // as the one passed in to new() (see the Arc documentation for more info)
            db: Arc::clone(db),
        }
    }
}

#[async_trait]
impl AuthnBackend for Backend {
    type User = Model;
    type Credentials = Credentials;
    type Error = Error;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        match find_by_email(self.db.as_ref(), &creds.email).await? {
            Some(user) => authenticate_user(creds, user).await,
            None => Err(Error::new(EntityApiErrorKind::RecordUnauthenticated)),
        }
    }

    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        let results = Entity::find_by_id(*user_id)
            .find_with_related(user_roles::Entity)
            .all(self.db.as_ref())
            .await?;
        match results.into_iter().next() {
            Some((mut user, roles)) => {
                user.roles = roles;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }
}

pub type AuthSession = axum_login::AuthSession<Backend>;
