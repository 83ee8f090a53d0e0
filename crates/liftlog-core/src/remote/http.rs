//! HTTP implementation of the workout API client.

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use super::{ApiError, ApiResult, CreateWorkoutResponse, WorkoutBody, WorkoutRemote};

/// Client for the workout API over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpWorkoutRemote {
    base_url: String,
    client: Client,
}

impl HttpWorkoutRemote {
    pub fn new(base_url: impl AsRef<str>) -> ApiResult<Self> {
        let base_url = normalize_base_url(base_url.as_ref())?;
        Ok(Self {
            base_url,
            client: Client::builder().build()?,
        })
    }

    fn workouts_url(&self) -> String {
        format!("{}/api/workouts", self.base_url)
    }

    fn workout_url(&self, server_id: &str) -> String {
        format!("{}/api/workouts/{server_id}", self.base_url)
    }
}

impl WorkoutRemote for HttpWorkoutRemote {
    async fn create_workout(
        &self,
        access_token: &str,
        body: &WorkoutBody,
    ) -> ApiResult<CreateWorkoutResponse> {
        let response = self
            .client
            .post(self.workouts_url())
            .bearer_auth(access_token)
            .json(body)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json::<CreateWorkoutResponse>().await?)
    }

    async fn update_workout(
        &self,
        access_token: &str,
        server_id: &str,
        body: &WorkoutBody,
    ) -> ApiResult<()> {
        let response = self
            .client
            .put(self.workout_url(server_id))
            .bearer_auth(access_token)
            .json(body)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn delete_workout(&self, access_token: &str, server_id: &str) -> ApiResult<()> {
        let response = self
            .client
            .delete(self.workout_url(server_id))
            .bearer_auth(access_token)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status {
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::Api(parse_api_error(status, &body)))
        }
    }
}

fn normalize_base_url(url: &str) -> ApiResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ApiError::InvalidConfiguration(
            "API base URL must not be empty",
        ));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ApiError::InvalidConfiguration(
            "API base URL must include http:// or https://",
        ));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    #[serde(rename = "statusMessage")]
    status_message: Option<String>,
    error: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.status_message).or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_base_url_trims_trailing_slash() {
        let normalized = normalize_base_url("https://gym.example.com/ ").unwrap();
        assert_eq!(normalized, "https://gym.example.com");
    }

    #[test]
    fn test_normalize_base_url_rejects_bare_host() {
        assert!(normalize_base_url("gym.example.com").is_err());
        assert!(normalize_base_url("  ").is_err());
    }

    #[test]
    fn test_parse_api_error_prefers_message() {
        let message = parse_api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"statusMessage":"Invalid workout data"}"#,
        );
        assert_eq!(message, "Invalid workout data (422)");
    }

    #[test]
    fn test_parse_api_error_falls_back_to_status() {
        assert_eq!(
            parse_api_error(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "HTTP 500"
        );
    }
}
