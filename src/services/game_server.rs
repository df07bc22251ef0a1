//! # Game Server Client
//!
//! Sends credit grants for approved payments to the game server. When no game
//! server is configured the [SimulatedGameServer] answers instead.

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::consts;

/// Credits to add to a player account once a payment went through
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreditGrant {
    pub user_id: String,
    pub credit_amount: u32,
    pub payment_id: String,
    /// Charged amount in won
    pub amount: u64,
    pub payment_method: String,
    /// Unix millis
    pub timestamp: i64,
}

/// Game server answer to a [CreditGrant]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameServerReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub new_credit_balance: Option<i64>,
}

/// Game server reached over http
pub struct GameServerClient {
    /// HTTP client for making API requests
    client: reqwest::Client,
    /// Full url of the credit endpoint
    endpoint: String,
    /// Value of the `X-API-KEY` header
    api_key: String,
}

impl GameServerClient {
    pub fn new(base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(consts::GAME_SERVER_TIMEOUT)
            .build()
            .context("failed to build game server http client")?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}{}",
                base_url.trim_end_matches('/'),
                consts::GAME_SERVER_CREDIT_API_PATH
            ),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl super::GameServerService for GameServerClient {
    async fn grant_credits(&self, grant: CreditGrant) -> anyhow::Result<GameServerReply> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .header("Accept", "application/json")
            .json(&grant)
            .send()
            .await
            .context("Failed to send credit grant to game server")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read game server response")?;

        if body.trim().is_empty() {
            return Ok(GameServerReply {
                success: false,
                message: Some("게임 서버가 빈 응답을 반환했습니다.".to_string()),
                new_credit_balance: None,
            });
        }

        let mut value: serde_json::Value = serde_json::from_str(&body)
            .with_context(|| format!("Game server returned invalid json ({status}): {body}"))?;

        // replies without the flag are judged by the status code
        if let Some(object) = value.as_object_mut() {
            object
                .entry("success")
                .or_insert(serde_json::Value::Bool(status.is_success()));
        }

        serde_json::from_value(value).context("Failed to parse game server response")
    }
}

/// Stand in used when no game server url is configured, every grant succeeds
#[derive(Clone, Default)]
pub struct SimulatedGameServer;

#[async_trait]
impl super::GameServerService for SimulatedGameServer {
    async fn grant_credits(&self, grant: CreditGrant) -> anyhow::Result<GameServerReply> {
        logfire::info!(
            "game server simulated credit grant {payment_id} for {user_id}",
            payment_id = grant.payment_id.clone(),
            user_id = grant.user_id.clone()
        );

        Ok(GameServerReply {
            success: true,
            message: Some("크레딧 추가 처리 완료".to_string()),
            new_credit_balance: Some(
                consts::SIMULATED_BASE_CREDIT_BALANCE + i64::from(grant.credit_amount),
            ),
        })
    }
}
