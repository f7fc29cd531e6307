use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::core::models::credits::{PlayerCount, ServerState};

pub const DEFAULT_ENDPOINT: &str = "https://api.exaroton.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Error, Debug)]
pub enum ExarotonError {
    #[error("Exaroton API key is not configured (set EXAROTON_API_KEY or [exaroton] api_key)")]
    MissingApiKey,
    #[error("Exaroton endpoint must use HTTPS, got: {0}")]
    InsecureEndpoint(String),
    #[error("Failed to reach Exaroton: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unauthorized - check your Exaroton API key")]
    Unauthorized,
    #[error("HTTP {status} from Exaroton: {body}")]
    Http { status: u16, body: String },
    #[error("Exaroton API error: {0}")]
    Api(String),
    #[error("Exaroton response had no data")]
    MissingData,
}

/// Source of the live account balance.
pub trait BalanceSource: Send + Sync {
    fn current_credits(&self) -> BoxFuture<'_, Result<f64, ExarotonError>>;
}

/// Source of the account's server list, recorded alongside each snapshot.
pub trait ServerSource: Send + Sync {
    fn server_states(&self) -> BoxFuture<'_, Result<Vec<ServerState>, ExarotonError>>;
}

#[derive(Deserialize)]
struct ApiResponse<T> {
    success: bool,
    error: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct AccountData {
    credits: f64,
}

#[derive(Deserialize)]
struct ServerData {
    id: String,
    name: String,
    status: u8,
    players: Option<PlayersData>,
}

#[derive(Deserialize)]
struct PlayersData {
    max: u32,
    count: u32,
}

/// Human-readable label for an Exaroton server status code.
pub fn status_label(status: u8) -> &'static str {
    match status {
        0 => "offline",
        1 => "online",
        2 => "starting",
        3 => "stopping",
        4 => "restarting",
        5 => "saving",
        6 => "loading",
        7 => "crashed",
        8 => "pending",
        9 => "transferring",
        10 => "preparing",
        _ => "unknown",
    }
}

fn to_server_state(server: ServerData) -> ServerState {
    ServerState {
        status_label: status_label(server.status).to_string(),
        id: server.id,
        name: server.name,
        status: server.status,
        players: server.players.map(|p| PlayerCount {
            max: p.max,
            count: p.count,
        }),
    }
}

/// Unwrap the `{success, error, data}` envelope every Exaroton endpoint uses.
fn unwrap_envelope<T>(response: ApiResponse<T>) -> Result<T, ExarotonError> {
    if !response.success {
        return Err(ExarotonError::Api(
            response.error.unwrap_or_else(|| "request failed".to_string()),
        ));
    }
    response.data.ok_or(ExarotonError::MissingData)
}

/// Reject endpoints that would send the API key over anything but HTTPS.
pub fn validate_endpoint(url: &str) -> Result<(), ExarotonError> {
    if !url.starts_with("https://") {
        return Err(ExarotonError::InsecureEndpoint(url.to_string()));
    }
    Ok(())
}

pub struct ExarotonClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ExarotonClient {
    pub fn new(endpoint: &str, api_key: Option<&str>) -> Result<Self, ExarotonError> {
        let api_key = api_key
            .filter(|k| !k.is_empty())
            .ok_or(ExarotonError::MissingApiKey)?
            .to_string();
        validate_endpoint(endpoint)?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ExarotonError> {
        let url = format!("{}{}", self.endpoint, path);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ExarotonError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExarotonError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ApiResponse<T> = response.json().await?;
        unwrap_envelope(envelope)
    }

    pub async fn fetch_credits(&self) -> Result<f64, ExarotonError> {
        let account: AccountData = self.get("/account/").await?;
        Ok(account.credits)
    }

    pub async fn fetch_servers(&self) -> Result<Vec<ServerState>, ExarotonError> {
        let servers: Vec<ServerData> = self.get("/servers/").await?;
        Ok(servers.into_iter().map(to_server_state).collect())
    }
}

impl BalanceSource for ExarotonClient {
    fn current_credits(&self) -> BoxFuture<'_, Result<f64, ExarotonError>> {
        Box::pin(self.fetch_credits())
    }
}

impl ServerSource for ExarotonClient {
    fn server_states(&self) -> BoxFuture<'_, Result<Vec<ServerState>, ExarotonError>> {
        Box::pin(self.fetch_servers())
    }
}
