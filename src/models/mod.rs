use serde::Serialize;

pub mod file;
pub mod payment;

// Body for every non-validation failure
#[derive(Clone, Debug, Serialize)]
pub struct StatusMessage {
    pub success: bool,
    pub message: String,
}

impl StatusMessage {
    pub fn failure(message: String) -> Self {
        StatusMessage {
            success: false,
            message,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct WelcomeMessage {
    pub message: String,
    pub status: u16,
}
