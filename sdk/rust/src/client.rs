use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Submission body. `rating` is sent as given, so callers can exercise validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeedback {
    pub email: String,
    pub rating: Value,
    pub message: String,
    pub agent: String,
}

impl NewFeedback {
    pub fn new(email: &str, rating: i64, message: &str, agent: &str) -> Self {
        Self {
            email: email.to_string(),
            rating: Value::from(rating),
            message: message.to_string(),
            agent: agent.to_string(),
        }
    }
}

/// Body of a 201 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedFeedback {
    pub id: i64,
    pub email: String,
    pub rating: i64,
    pub message: String,
    pub agent: String,
}

/// One entry as returned by the read endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub email: String,
    pub rating: i64,
    pub message: String,
    pub agent: String,
}

/// Every expected answer to a submission.
#[derive(Debug)]
pub enum SubmitOutcome {
    Created(SubmittedFeedback),
    /// 400 with the `errors` array.
    Invalid(Vec<Value>),
    /// 429 with the advisory message.
    RateLimited(String),
}

#[derive(Debug)]
pub enum ClientError {
    Http(reqwest::Error),
    Unexpected { status: StatusCode, body: String },
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Http(e) => write!(f, "request failed: {}", e),
            ClientError::Unexpected { status, body } => {
                write!(f, "service returned status {}: {}", status, body)
            }
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e)
    }
}

pub struct FeedbackClient {
    client: Client,
    base_url: String,
}

impl FeedbackClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .no_proxy()
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Submit feedback.
    pub async fn submit(&self, feedback: &NewFeedback) -> Result<SubmitOutcome, ClientError> {
        let resp = self.client
            .post(format!("{}/feedback", self.base_url))
            .json(feedback)
            .send()
            .await?;

        match resp.status() {
            StatusCode::CREATED => Ok(SubmitOutcome::Created(resp.json().await?)),
            StatusCode::BAD_REQUEST => {
                let body: Value = resp.json().await?;
                let errors = body["errors"].as_array().cloned().unwrap_or_default();
                Ok(SubmitOutcome::Invalid(errors))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let body: Value = resp.json().await?;
                Ok(SubmitOutcome::RateLimited(body["error"].as_str().unwrap_or_default().to_string()))
            }
            _ => Err(unexpected(resp).await),
        }
    }

    /// List every stored entry.
    pub async fn list(&self) -> Result<Vec<FeedbackEntry>, ClientError> {
        let resp = self.client
            .get(format!("{}/feedback", self.base_url))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(unexpected(resp).await);
        }
        Ok(resp.json().await?)
    }

    /// Fetch one entry; `Ok(None)` on 404.
    pub async fn get(&self, id: i64) -> Result<Option<FeedbackEntry>, ClientError> {
        let resp = self.client
            .get(format!("{}/feedback/{}", self.base_url, id))
            .send()
            .await?;

        match resp.status() {
            StatusCode::OK => Ok(Some(resp.json().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(unexpected(resp).await),
        }
    }
}

async fn unexpected(resp: Response) -> ClientError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    ClientError::Unexpected { status, body }
}
