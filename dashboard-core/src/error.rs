use thiserror::Error;

/// Failures surfaced by a [`crate::client::WeatherSource`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WeatherError {
    /// The provider could not resolve the city, or answered with a non-success status.
    #[error("City not found: {0}")]
    NotFound(String),

    /// Network failure, timeout, or a response that does not have the expected shape.
    #[error("Weather service unavailable: {0}")]
    Transport(String),

    /// No provider credentials, so nothing was requested.
    #[error(
        "No API key configured. Hint: run `dashboard configure` and enter your WeatherAPI.com key."
    )]
    NotConfigured,
}

impl WeatherError {
    /// Short reason suitable for showing to the user.
    pub fn user_reason(&self) -> &'static str {
        match self {
            WeatherError::NotFound(_) => "City not found",
            WeatherError::Transport(_) => "Weather service unavailable",
            WeatherError::NotConfigured => "No API key configured",
        }
    }

    /// Text shown in place of the page. A retry with another city only helps
    /// when a provider is configured, so the missing-key case carries the hint instead.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::NotConfigured => self.to_string(),
            _ => format!("{}. Please enter a valid city name.", self.user_reason()),
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WeatherError::Transport(format!("request timed out: {err}"))
        } else {
            WeatherError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::Transport(format!("malformed forecast response: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_reason_hides_detail() {
        let err = WeatherError::NotFound("status 400: No matching location found.".into());
        assert_eq!(err.user_reason(), "City not found");
        assert!(err.to_string().contains("No matching location"));
    }

    #[test]
    fn user_message_asks_for_another_city() {
        let err = WeatherError::Transport("connection reset".into());
        assert_eq!(
            err.user_message(),
            "Weather service unavailable. Please enter a valid city name."
        );
    }

    #[test]
    fn missing_key_message_carries_configure_hint() {
        let msg = WeatherError::NotConfigured.user_message();

        assert!(msg.starts_with("No API key configured."));
        assert!(msg.contains("dashboard configure"));
    }

    #[test]
    fn json_errors_are_transport_failures() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = WeatherError::from(json_err);

        assert!(matches!(err, WeatherError::Transport(ref msg) if msg.contains("malformed")));
    }
}
