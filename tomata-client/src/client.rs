use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::{
    dev_backend::DevBackend,
    domain::{
        ActiveSession, CompletedSession, Phase, SequenceInfo, SettingsError, StartedSession,
        TimerSettings,
    },
    TomataUrl,
};

/// HTTP client for the tomata server, the authority owning session and
/// sequence state. All session mutations go through here; the client never
/// assumes success without a response.
pub struct TomataClient {
    http: reqwest::Client,
    base_url: TomataUrl,
    dev_backend: Option<DevBackend>,
}

#[derive(Error, Debug)]
pub enum TomataError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("another session is already active")]
    Conflict,
    #[error("no active session")]
    NoActiveSession,
    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] SettingsError),
    #[error("ResponseError: {0}")]
    Response(String),
    #[error("ParsingError: {0}")]
    Parsing(String),
}

#[derive(Serialize)]
struct StartSessionRequest {
    #[serde(rename = "type")]
    phase: Option<Phase>,
}

#[derive(Serialize)]
struct ResetCounterRequest {
    confirm: bool,
}

#[derive(Debug, Deserialize)]
struct ResetCounterResponse {
    pomodoro_count: u32,
}

/// `GET /timer/current` answers with either the active session or a
/// human-readable "no timer" message.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CurrentTimerResponse {
    Active(ActiveSession),
    Idle { message: String },
}

impl TomataClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: TomataUrl::new(base_url),
            dev_backend: None,
        }
    }

    /// Client backed by an in-process authority, for tests and `dev` runs.
    pub fn dev() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: TomataUrl::new("http://localhost"),
            dev_backend: Some(DevBackend::new()),
        }
    }

    /// Shared handle to the dev backend, if this is a dev client.
    pub fn dev_handle(&self) -> Option<DevBackend> {
        self.dev_backend.clone()
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, TomataError> {
        match resp.status().as_u16() {
            401 | 403 => return Err(TomataError::Unauthorized),
            404 => return Err(TomataError::NoActiveSession),
            400 | 409 => return Err(TomataError::Conflict),
            status if status >= 400 => {
                return Err(TomataError::Response(format!("status {status}")))
            }
            _ => {}
        }

        resp.json::<T>().await.map_err(|e| {
            TomataError::Parsing(format!("Failed to parse response as JSON: {}", e))
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, url: impl AsRef<str>) -> Result<T, TomataError> {
        let resp = self
            .http
            .get(url.as_ref())
            .send()
            .await
            .map_err(|e| TomataError::Response(e.to_string()))?;
        Self::decode(resp).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        url: impl AsRef<str>,
        body: &B,
    ) -> Result<T, TomataError> {
        let resp = self
            .http
            .post(url.as_ref())
            .json(body)
            .send()
            .await
            .map_err(|e| TomataError::Response(e.to_string()))?;
        Self::decode(resp).await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        url: impl AsRef<str>,
        body: &B,
    ) -> Result<T, TomataError> {
        let resp = self
            .http
            .put(url.as_ref())
            .json(body)
            .send()
            .await
            .map_err(|e| TomataError::Response(e.to_string()))?;
        Self::decode(resp).await
    }

    /// The session the authority currently considers active. Absence is the
    /// idle state, not an error.
    pub async fn active_session(&self) -> Result<Option<ActiveSession>, TomataError> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.active_session());
        }

        let url = self.base_url.append_path("/timer/current");
        match self.fetch::<CurrentTimerResponse>(url).await {
            Ok(CurrentTimerResponse::Active(session)) => Ok(Some(session)),
            Ok(CurrentTimerResponse::Idle { message }) => {
                tracing::debug!(%message, "no active session");
                Ok(None)
            }
            Err(TomataError::NoActiveSession) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create (or continue the sequence with) a new session. Passing `None`
    /// lets the authority choose the phase.
    pub async fn start_session(
        &self,
        phase: Option<Phase>,
    ) -> Result<StartedSession, TomataError> {
        if let Some(dev) = &self.dev_backend {
            return dev.start_session(phase);
        }

        let url = self.base_url.append_path("/timer/start");
        self.post(url, &StartSessionRequest { phase }).await
    }

    /// End the active session early. Idempotent: stopping when nothing is
    /// running is a successful no-op.
    pub async fn stop_session(&self) -> Result<(), TomataError> {
        if let Some(dev) = &self.dev_backend {
            dev.stop_session();
            return Ok(());
        }

        let url = self.base_url.append_path("/timer/stop");
        match self
            .post::<_, serde_json::Value>(url, &serde_json::json!({}))
            .await
        {
            Ok(_) | Err(TomataError::NoActiveSession) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Signal natural expiry. Must precede the next start so the sequence
    /// counter and the new phase stay consistent.
    pub async fn complete_session(&self) -> Result<CompletedSession, TomataError> {
        if let Some(dev) = &self.dev_backend {
            return dev.complete_session();
        }

        let url = self.base_url.append_path("/timer/complete");
        self.post(url, &serde_json::json!({})).await
    }

    pub async fn sequence_info(&self) -> Result<SequenceInfo, TomataError> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.sequence_info());
        }

        self.fetch(self.base_url.append_path("/timer/sequence-info"))
            .await
    }

    /// Reset the pomodoro counter to zero. The confirmation flag is part of
    /// the wire contract; callers are expected to have asked the user first.
    pub async fn reset_sequence(&self) -> Result<u32, TomataError> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.reset_sequence());
        }

        let url = self.base_url.append_path("/timer/reset-counter");
        let resp: ResetCounterResponse =
            self.post(url, &ResetCounterRequest { confirm: true }).await?;
        Ok(resp.pomodoro_count)
    }

    pub async fn default_settings(&self) -> Result<TimerSettings, TomataError> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.settings());
        }

        self.fetch(self.base_url.append_path("/timer/settings/defaults"))
            .await
    }

    /// Push updated settings to the authority. Out-of-bounds values are
    /// rejected locally and never sent.
    pub async fn update_settings(&self, settings: &TimerSettings) -> Result<(), TomataError> {
        settings.validate()?;

        if let Some(dev) = &self.dev_backend {
            dev.update_settings(settings.clone());
            return Ok(());
        }

        let url = self.base_url.append_path("/timer/settings");
        let _: serde_json::Value = self.put(url, settings).await?;
        Ok(())
    }
}
