use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("No user session")]
    NoSession,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    /// 界面上提示给用户的文字，不区分错误种类
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(errors) => format!("Formulaire invalide : {}", errors),
            ClientError::NoSession => "Veuillez vous connecter".to_string(),
            ClientError::Api { message, .. } => format!("Erreur : {}", message),
            _ => "Erreur réseau, veuillez réessayer".to_string(),
        }
    }
}
