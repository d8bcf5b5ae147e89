//! reqwest adapter for the remote game service.

use crate::transport::{Transport, TransportError, TransportErrorKind};
use crate::wire::{ErrorBody, GameStatusResponse, GameStatusResult, MoveResponse, MoveResult};
use reqwest::StatusCode;
use squares_board::BoardSnapshot;
use tracing::{debug, instrument, warn};

/// Path of the status operation under the base URL.
pub const GAME_STATUS_PATH: &str = "gameStatus";
/// Path of the move operation under the base URL.
pub const NEXT_MOVE_PATH: &str = "nextMove";

/// HTTP client for the game service.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Base URL, without trailing slash (e.g. `http://localhost:8080/api/squares`).
    base_url: String,
    /// HTTP client.
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport rooted at `base_url`.
    #[instrument(skip_all)]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "Creating HTTP transport");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Base URL requests are sent under.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs the snapshot. Returns `None` on 204, the body text otherwise.
    #[instrument(skip(self, snapshot), fields(size = snapshot.size(), next = %snapshot.next_player_color()))]
    async fn post(
        &self,
        operation: &str,
        snapshot: &BoardSnapshot,
    ) -> Result<Option<String>, TransportError> {
        let url = format!("{}/{}", self.base_url, operation);
        debug!(url = %url, "Sending request");

        let response = self
            .client
            .post(&url)
            .json(snapshot)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, url = %url, "Request failed");
                TransportError::new(TransportErrorKind::Connection(e.to_string()))
            })?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            debug!("No content");
            return Ok(None);
        }

        let body = response.text().await.map_err(|e| {
            warn!(error = %e, "Failed to read response body");
            TransportError::new(TransportErrorKind::Connection(e.to_string()))
        })?;
        debug!(status = %status, body = %body, "Got response");

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            warn!(status = %status, detail = %detail, "Service returned an error");
            return Err(TransportError::new(TransportErrorKind::Status {
                code: status.as_u16(),
                detail,
            }));
        }

        Ok(Some(body))
    }
}

fn malformed(e: serde_json::Error) -> TransportError {
    TransportError::new(TransportErrorKind::Malformed(e.to_string()))
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    #[instrument(skip_all)]
    async fn game_status(
        &self,
        snapshot: &BoardSnapshot,
    ) -> Result<GameStatusResult, TransportError> {
        let body = self
            .post(GAME_STATUS_PATH, snapshot)
            .await?
            .ok_or_else(|| TransportError::new(TransportErrorKind::EmptyStatus))?;
        let response: GameStatusResponse = serde_json::from_str(&body).map_err(malformed)?;
        response.try_into()
    }

    #[instrument(skip_all)]
    async fn next_move(
        &self,
        snapshot: &BoardSnapshot,
    ) -> Result<Option<MoveResult>, TransportError> {
        let Some(body) = self.post(NEXT_MOVE_PATH, snapshot).await? else {
            return Ok(None);
        };
        // A JSON `null` body declines just like 204 does.
        let response: Option<MoveResponse> = serde_json::from_str(&body).map_err(malformed)?;
        Ok(response.map(MoveResult::from))
    }
}
