//! Statistics files of a team and the figures derived from them.
//!
//! Uploads and deletions are routed behind `protect::teams::staff`; the
//! read endpoints behind `protect::users::approved`.

use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::extractors::session_preferences::SessionPrefs;
use crate::params::stats::{EventsParams, FilesParams, SummaryParams};
use crate::params::team::{TeamFilePath, TeamPath};
use crate::{AppState, Error};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::error::Error as DomainError;
use domain::stats::{self as StatsApi, PlayerSummary};
use domain::{stats_events, stats_files, stats_kind::StatsKind, stats_players};
use log::*;
use service::config::ApiVersion;
use std::str::FromStr;

const KIND_FIELD: &str = "kind";
const FILE_FIELD: &str = "file";

#[derive(Debug, Default)]
struct Upload {
    kind: Option<StatsKind>,
    original_name: Option<String>,
    content: Option<String>,
}

fn invalid(message: impl Into<String>) -> Error {
    Error::from(DomainError::invalid(message))
}

async fn read_upload(mut multipart: Multipart, max_bytes: usize) -> Result<Upload, Error> {
    let mut upload = Upload::default();

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        warn!("Malformed multipart upload: {err}");
        invalid("Malformed multipart body")
    })? {
        match field.name() {
            Some(KIND_FIELD) => {
                let kind = field
                    .text()
                    .await
                    .map_err(|_| invalid("Unreadable kind field"))?;
                upload.kind = Some(
                    StatsKind::from_str(&kind)
                        .map_err(|_| invalid("Kind must be events or players"))?,
                );
            }
            Some(FILE_FIELD) => {
                upload.original_name = Some(field.file_name().unwrap_or("upload.csv").to_owned());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| invalid("Unreadable file field"))?;
                if bytes.len() > max_bytes {
                    return Err(invalid(format!("File is larger than {max_bytes} bytes")));
                }
                upload.content = Some(
                    String::from_utf8(bytes.to_vec())
                        .map_err(|_| invalid("File must be UTF-8 encoded CSV"))?,
                );
            }
            other => trace!("Ignoring multipart field {other:?}"),
        }
    }

    Ok(upload)
}

/// CREATE a statistics file for a team from a multipart upload with the
/// fields `kind` (`events` or `players`) and `file` (CSV).
#[utoipa::path(
    post,
    path = "/teams/{id}/stats_files",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Team id"),
    ),
    request_body(content_type = "multipart/form-data", description = "Fields `kind` and `file`"),
    responses(
        (status = 201, description = "Stored and parsed the file", body = stats_files::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a leader of the team or its club"),
        (status = 404, description = "Team not found"),
        (status = 422, description = "Missing fields or unreadable CSV"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn upload(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(path): Path<TeamPath>,
    multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    let upload = read_upload(multipart, app_state.config.stats_upload_max_bytes).await?;
    let (Some(kind), Some(original_name), Some(content)) =
        (upload.kind, upload.original_name, upload.content)
    else {
        return Err(invalid("Both kind and file are required"));
    };
    info!(
        "User {} uploads {kind} file {original_name} for team {}",
        user.id, path.id
    );

    let file = StatsApi::upload(
        app_state.db_conn_ref(),
        &user,
        path.id,
        kind,
        original_name,
        content,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), file)),
    ))
}

/// DELETE a statistics file together with the rows parsed from it.
#[utoipa::path(
    delete,
    path = "/teams/{id}/stats_files/{file_id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Team id"),
        ("file_id" = Uuid, Path, description = "Statistics file id"),
    ),
    responses(
        (status = 204, description = "Deleted the file"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a leader of the team or its club"),
        (status = 404, description = "Team or file not found"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn delete_file(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(path): Path<TeamFilePath>,
) -> Result<impl IntoResponse, Error> {
    StatsApi::delete_file(app_state.db_conn_ref(), &user, path.id, path.file_id).await?;

    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}

/// INDEX a team's statistics files, newest first.
#[utoipa::path(
    get,
    path = "/teams/{id}/stats_files",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Team id"),
        FilesParams,
    ),
    responses(
        (status = 200, description = "Successfully retrieved the files", body = [stats_files::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Awaiting approval"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn files(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(path): Path<TeamPath>,
    Query(params): Query<FilesParams>,
) -> Result<impl IntoResponse, Error> {
    let files = StatsApi::list_files(app_state.db_conn_ref(), path.id, params.kind).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), files)))
}

/// INDEX a team's match events, newest first.
#[utoipa::path(
    get,
    path = "/teams/{id}/stats/events",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Team id"),
        EventsParams,
    ),
    responses(
        (status = 200, description = "Successfully retrieved the events", body = [stats_events::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Awaiting approval"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn events(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(path): Path<TeamPath>,
    Query(params): Query<EventsParams>,
) -> Result<impl IntoResponse, Error> {
    let events = StatsApi::list_events(app_state.db_conn_ref(), path.id, params.limit).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), events)))
}

/// INDEX a team's player rows by shirt number.
#[utoipa::path(
    get,
    path = "/teams/{id}/stats/players",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Team id"),
    ),
    responses(
        (status = 200, description = "Successfully retrieved the players", body = [stats_players::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Awaiting approval"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn players(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(path): Path<TeamPath>,
) -> Result<impl IntoResponse, Error> {
    let players = StatsApi::list_players(app_state.db_conn_ref(), path.id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), players)))
}

/// GET per player figures for a team. The mode defaults to the session's
/// aggregation mode.
#[utoipa::path(
    get,
    path = "/teams/{id}/stats/summary",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Team id"),
        SummaryParams,
    ),
    responses(
        (status = 200, description = "Successfully summarised the events", body = [PlayerSummary]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Awaiting approval"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn summary(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    prefs: SessionPrefs,
    Path(path): Path<TeamPath>,
    Query(params): Query<SummaryParams>,
) -> Result<impl IntoResponse, Error> {
    let mode = params
        .mode
        .or(prefs.prefs.stats_aggregation_mode)
        .unwrap_or_default();
    let summary = StatsApi::summary(app_state.db_conn_ref(), path.id, mode).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), summary)))
}
