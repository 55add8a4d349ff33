use serde::Serialize;
pub(crate) mod admin_controller;
pub(crate) mod approval_controller;
pub(crate) mod competition_controller;
pub(crate) mod health_check_controller;
pub(crate) mod league_controller;
pub(crate) mod me_controller;
pub(crate) mod registration_controller;
pub(crate) mod role_controller;
pub(crate) mod stats_controller;
pub(crate) mod ui_controller;
pub(crate) mod user_session_controller;

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status_code: u16, data: T) -> Self {
        Self {
            status_code,
            data: Some(data),
        }
    }

    pub fn no_content(status_code: u16) -> ApiResponse<()> {
        ApiResponse {
            status_code,
            data: None,
        }
    }
}
