pub mod game_server;
pub mod payment_gateway;
pub mod session_store;

use crate::models;
use async_trait::async_trait;
use derive_more::{Display, Error};

/// The session store refused a read or a write (quota, serialization, disabled cookies)
#[derive(Debug, Display, Error)]
#[display("session storage error: {_0}")]
pub struct StorageError(#[error(not(source))] pub String);

/// String only key value storage scoped to one browser session
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str);
}

/// Whatever answers `POST /api/payment/process` for the payment page
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn process_payment(
        &self,
        request: models::payment::PaymentRequest,
    ) -> Result<models::payment::PaymentSuccess, models::payment::PaymentFailure>;
}

/// Credits the purchased amount to the player account
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameServerService: Send + Sync {
    async fn grant_credits(
        &self,
        grant: game_server::CreditGrant,
    ) -> anyhow::Result<game_server::GameServerReply>;
}

pub type ImplPaymentGateway = Box<dyn PaymentGateway>;
pub type ImplGameServerService = Box<dyn GameServerService>;
