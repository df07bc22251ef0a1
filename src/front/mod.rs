pub mod credit_shop;
pub mod errors;
pub mod forms;
pub mod middleware;
pub mod payment;
pub mod payment_api;
pub mod routes;
pub mod server;
pub mod session;
pub mod submission;
pub mod templates;
pub mod utils;

use crate::{api::payment::PaymentProcessor, models::package::CreditPackage, services};
use chrono_tz::Tz;
use csrf::AesGcmCsrfProtection;
use std::sync::Arc;

pub struct AppState {
    pub csrf_protec: AesGcmCsrfProtection,
    pub catalog: Vec<CreditPackage>,
    pub payment_processor: Arc<PaymentProcessor>,
    pub payment_gateway: services::ImplPaymentGateway,
    pub submissions: submission::InFlightSubmissions,
    pub timezone: Tz,
}

#[cfg(test)]
pub fn test_app_state(game_server: services::ImplGameServerService) -> AppState {
    use crate::{consts, services::payment_gateway::LocalPaymentGateway};

    let payment_processor = Arc::new(PaymentProcessor::new(
        consts::CREDIT_PACKAGES.to_vec(),
        game_server,
        chrono_tz::Asia::Seoul,
    ));

    AppState {
        csrf_protec: AesGcmCsrfProtection::from_key([7u8; 32]),
        catalog: consts::CREDIT_PACKAGES.to_vec(),
        payment_gateway: Box::new(LocalPaymentGateway::new(payment_processor.clone())),
        payment_processor,
        submissions: submission::InFlightSubmissions::default(),
        timezone: chrono_tz::Asia::Seoul,
    }
}
