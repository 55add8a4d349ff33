use domain::Id;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct TeamPath {
    /// Team id
    #[param(value_type = Uuid)]
    pub(crate) id: Id,
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct TeamFilePath {
    /// Team id
    #[param(value_type = Uuid)]
    pub(crate) id: Id,
    /// Statistics file id
    #[param(value_type = Uuid)]
    pub(crate) file_id: Id,
}
