//! Enrollment API error types.

/// Errors that can occur while talking to the enrollment API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Request did not complete within the configured timeout
    #[error("Request to '{endpoint}' timed out")]
    Timeout { endpoint: String },

    /// API returned a non-success response
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Failed to deserialize API response
    #[error("Failed to deserialize API response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Created resource carried no identifier
    #[error("Response from '{endpoint}' has no identifier")]
    MissingIdentifier { endpoint: String },
}

impl ApiError {
    /// Best available description for the user: the server's message when
    /// it sent one, otherwise a description of the transport failure.
    ///
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Api { message, .. } => message.clone(),
            ApiError::Timeout { .. } => "Tempo limite de resposta do servidor excedido".to_string(),
            ApiError::HttpRequest(e) => e.to_string(),
            ApiError::Deserialization(_) => "Resposta inválida do servidor".to_string(),
            ApiError::MissingIdentifier { .. } => {
                "Resposta do servidor sem identificador do aluno".to_string()
            }
        }
    }
}
