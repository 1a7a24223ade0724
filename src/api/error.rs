use thiserror::Error;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Errors surfaced by the weather client.
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("missing URL or API_KEY in environment, .env, or bundled config")]
    ConfigMissing,

    #[error(".env file not found ({0})")]
    EnvFileMissing(String),

    #[error("API key invalid or expired")]
    AuthExpired,

    #[error("weather service returned HTTP {0}")]
    ServiceUnavailable(u16),

    #[error("network error contacting weather API: {0}")]
    Network(#[source] reqwest::Error),

    #[error("weather API request failed: {0}")]
    Request(String),
}

impl WeatherError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 => WeatherError::AuthExpired,
            500..=599 => WeatherError::ServiceUnavailable(status.as_u16()),
            _ => WeatherError::Request(format!("HTTP {}: {}", status, Self::truncate_body(body))),
        }
    }

    /// Localized label shown when a fetch fails and no cached snapshot
    /// exists to fall back on.
    pub fn display_message(&self) -> &'static str {
        match self {
            WeatherError::EnvFileMissing(_) => "Standortname nicht verfuegbar (.env fehlt)",
            WeatherError::ConfigMissing => "Standortname nicht verfuegbar (API Konfig fehlt)",
            WeatherError::AuthExpired => "Standortname nicht verfuegbar (API Key ungueltig)",
            WeatherError::Network(_) => "Standortname nicht verfuegbar (kein Internet)",
            WeatherError::ServiceUnavailable(_) => {
                "Standortname nicht verfuegbar (Wetterdienst down)"
            }
            WeatherError::Request(_) => "Standortname nicht verfuegbar (API Anfragefehler)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            WeatherError::from_status(StatusCode::UNAUTHORIZED, ""),
            WeatherError::AuthExpired
        ));
        assert!(matches!(
            WeatherError::from_status(StatusCode::INTERNAL_SERVER_ERROR, ""),
            WeatherError::ServiceUnavailable(500)
        ));
        assert!(matches!(
            WeatherError::from_status(StatusCode::SERVICE_UNAVAILABLE, ""),
            WeatherError::ServiceUnavailable(503)
        ));
        assert!(matches!(
            WeatherError::from_status(StatusCode::NOT_FOUND, "missing"),
            WeatherError::Request(_)
        ));
    }

    #[test]
    fn test_from_status_truncates_long_bodies() {
        let body = "x".repeat(2000);
        let err = WeatherError::from_status(StatusCode::BAD_REQUEST, &body);
        let message = err.to_string();
        assert!(message.contains("truncated, 2000 total bytes"));
        assert!(message.len() < 700);
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            WeatherError::EnvFileMissing(String::new()).display_message(),
            "Standortname nicht verfuegbar (.env fehlt)"
        );
        assert_eq!(
            WeatherError::ConfigMissing.display_message(),
            "Standortname nicht verfuegbar (API Konfig fehlt)"
        );
        assert_eq!(
            WeatherError::AuthExpired.display_message(),
            "Standortname nicht verfuegbar (API Key ungueltig)"
        );
        assert_eq!(
            WeatherError::ServiceUnavailable(502).display_message(),
            "Standortname nicht verfuegbar (Wetterdienst down)"
        );
        assert_eq!(
            WeatherError::Request(String::new()).display_message(),
            "Standortname nicht verfuegbar (API Anfragefehler)"
        );
    }
}
