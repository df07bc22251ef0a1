use chrono::Utc;
use chrono_tz::Tz;
use derive_more::{Display, Error};
use uuid::Uuid;

use crate::{
    consts, metric,
    models::{
        package::{self, CreditPackage},
        payment::{PaymentReceipt, PaymentRequest, PaymentStatus},
    },
    services::{self, game_server::CreditGrant},
    shop::{
        card::{self, CardValidationError, ExpiryDate, YearMonth},
        pricing,
    },
};

/// Why the payment endpoint refused a request. The display value is sent back as `message`
#[derive(Debug, Display, Error)]
pub enum PaymentApiError {
    #[display("{_0}")]
    InvalidCard(CardValidationError),
    #[display("{_0}")]
    InvalidRequest(#[error(not(source))] String),
    #[display("{_0}")]
    Rejected(#[error(not(source))] String),
    #[display("게임 서버 통신 중 오류가 발생했습니다.")]
    GameServerUnavailable(#[error(not(source))] String),
}

impl PaymentApiError {
    pub fn payment_status(&self) -> PaymentStatus {
        match self {
            PaymentApiError::InvalidCard(_) | PaymentApiError::InvalidRequest(_) => {
                PaymentStatus::Invalid
            }
            PaymentApiError::Rejected(_) => PaymentStatus::Rejected,
            PaymentApiError::GameServerUnavailable(_) => PaymentStatus::GatewayError,
        }
    }
}

/// Logic behind `POST /api/payment/process`
pub struct PaymentProcessor {
    catalog: Vec<CreditPackage>,
    game_server: services::ImplGameServerService,
    timezone: Tz,
}

impl PaymentProcessor {
    pub fn new(
        catalog: Vec<CreditPackage>,
        game_server: services::ImplGameServerService,
        timezone: Tz,
    ) -> Self {
        Self {
            catalog,
            game_server,
            timezone,
        }
    }

    pub async fn process(&self, request: PaymentRequest) -> Result<PaymentReceipt, PaymentApiError> {
        self.process_at(request, YearMonth::now_in(self.timezone))
            .await
    }

    /// Same as [Self::process] with an explicit current month
    pub async fn process_at(
        &self,
        request: PaymentRequest,
        today: YearMonth,
    ) -> Result<PaymentReceipt, PaymentApiError> {
        let result = self.charge(request, today).await;

        match &result {
            Ok(receipt) if receipt.auto_processed => {
                metric::incr_payment_status_statds(&PaymentStatus::AutoApproved.to_string())
            }
            Ok(_) => metric::incr_payment_status_statds(&PaymentStatus::Approved.to_string()),
            Err(e) => {
                logfire::warn!("payment refused: {reason}", reason = e.to_string());
                metric::incr_payment_status_statds(&e.payment_status().to_string())
            }
        }

        result
    }

    async fn charge(
        &self,
        request: PaymentRequest,
        today: YearMonth,
    ) -> Result<PaymentReceipt, PaymentApiError> {
        card::validate_card(&request.card_info, today).map_err(PaymentApiError::InvalidCard)?;

        // the page only checks the shape, a real month is required here
        let expiry = ExpiryDate::parse(&request.card_info.expiry_date)
            .map_err(PaymentApiError::InvalidCard)?;
        if !expiry.has_valid_month() {
            return Err(PaymentApiError::InvalidRequest(
                "유효하지 않은 유효기간입니다.".to_string(),
            ));
        }

        let package = self.find_ordered_package(&request)?;
        let payment_id = new_payment_id();

        logfire::info!(
            "processing payment {payment_id}: {product} for {amount} won with {card}",
            payment_id = payment_id.clone(),
            product = request.product_name.clone(),
            amount = package.price.to_string(),
            card = request.card_info.masked_number()
        );

        if package.price < consts::AUTO_APPROVE_BELOW_AMOUNT {
            return Ok(PaymentReceipt {
                payment_id,
                message: consts::SMALL_AMOUNT_APPROVED_MESSAGE.to_string(),
                credit_amount: package.credit_amount,
                auto_processed: true,
            });
        }

        let reply = self
            .game_server
            .grant_credits(CreditGrant {
                user_id: user_id_for(&request),
                credit_amount: package.credit_amount,
                payment_id: payment_id.clone(),
                amount: package.price,
                payment_method: "card".to_string(),
                timestamp: Utc::now().timestamp_millis(),
            })
            .await
            .map_err(|e| {
                logfire::error!(
                    "game server unreachable for {payment_id}: {error}",
                    payment_id = payment_id.clone(),
                    error = format!("{e:#}")
                );
                PaymentApiError::GameServerUnavailable(e.to_string())
            })?;

        if !reply.success {
            return Err(PaymentApiError::Rejected(
                reply
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| consts::DEFAULT_PAYMENT_ERROR_MESSAGE.to_string()),
            ));
        }

        Ok(PaymentReceipt {
            payment_id,
            message: reply
                .message
                .unwrap_or_else(|| consts::PAYMENT_APPROVED_MESSAGE.to_string()),
            credit_amount: package.credit_amount,
            auto_processed: false,
        })
    }

    fn find_ordered_package(&self, request: &PaymentRequest) -> Result<CreditPackage, PaymentApiError> {
        let invalid_product =
            || PaymentApiError::InvalidRequest("상품 정보가 올바르지 않습니다.".to_string());

        let price = pricing::parse_digits(&request.product_price).ok_or_else(invalid_product)?;
        let credit_amount = package::credit_amount_from_product_name(&request.product_name)
            .ok_or_else(invalid_product)?;

        package::find_package(&self.catalog, credit_amount, price)
            .copied()
            .ok_or_else(invalid_product)
    }
}

/// "PAY-" followed by 32 uppercase hex chars
fn new_payment_id() -> String {
    format!("PAY-{}", Uuid::new_v4().simple().to_string().to_uppercase())
}

fn user_id_for(request: &PaymentRequest) -> String {
    let email = request.card_info.email.trim();
    if email.is_empty() {
        return Uuid::new_v4().to_string();
    }

    email.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::payment::CardInput,
        services::{
            MockGameServerService,
            game_server::{GameServerReply, SimulatedGameServer},
        },
    };

    const TODAY: YearMonth = YearMonth {
        year: 2025,
        month: 1,
    };

    fn request(product_name: &str, product_price: &str) -> PaymentRequest {
        PaymentRequest {
            card_info: CardInput {
                card_number: "1234567890123456".to_string(),
                expiry_date: "12/30".to_string(),
                cvv: "123".to_string(),
                owner_name: "홍길동".to_string(),
                email: "buyer@example.com".to_string(),
            },
            product_name: product_name.to_string(),
            product_price: product_price.to_string(),
        }
    }

    fn processor(game_server: services::ImplGameServerService) -> PaymentProcessor {
        let mut catalog = consts::CREDIT_PACKAGES.to_vec();
        catalog.push(CreditPackage::new(10, 200, false));
        PaymentProcessor::new(catalog, game_server, chrono_tz::Asia::Seoul)
    }

    #[ntex::test]
    async fn test_process_forwards_grant_to_game_server() {
        let mut game_server = MockGameServerService::new();
        game_server
            .expect_grant_credits()
            .withf(|grant| {
                grant.credit_amount == 500
                    && grant.amount == 5000
                    && grant.user_id == "buyer@example.com"
                    && grant.payment_id.starts_with("PAY-")
            })
            .times(1)
            .returning(|_| {
                Ok(GameServerReply {
                    success: true,
                    message: None,
                    new_credit_balance: Some(1500),
                })
            });

        let receipt = processor(Box::new(game_server))
            .process_at(request("500 크레딧", "5000"), TODAY)
            .await
            .unwrap();

        assert_eq!(receipt.credit_amount, 500);
        assert!(!receipt.auto_processed);
        assert_eq!(receipt.message, consts::PAYMENT_APPROVED_MESSAGE);
        assert_eq!(receipt.payment_id.len(), 4 + 32);
        assert!(
            receipt.payment_id[4..]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[ntex::test]
    async fn test_process_auto_approves_small_amounts() {
        let mut game_server = MockGameServerService::new();
        game_server.expect_grant_credits().never();

        let receipt = processor(Box::new(game_server))
            .process_at(request("10 크레딧", "200"), TODAY)
            .await
            .unwrap();

        assert!(receipt.auto_processed);
        assert_eq!(receipt.message, consts::SMALL_AMOUNT_APPROVED_MESSAGE);
    }

    #[ntex::test]
    async fn test_process_passes_game_server_refusal_message() {
        let mut game_server = MockGameServerService::new();
        game_server.expect_grant_credits().times(1).returning(|_| {
            Ok(GameServerReply {
                success: false,
                message: Some("카드 한도 초과".to_string()),
                new_credit_balance: None,
            })
        });

        let err = processor(Box::new(game_server))
            .process_at(request("500 크레딧", "5000"), TODAY)
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentApiError::Rejected(_)));
        assert_eq!(err.to_string(), "카드 한도 초과");
    }

    #[ntex::test]
    async fn test_process_reports_unreachable_game_server() {
        let mut game_server = MockGameServerService::new();
        game_server
            .expect_grant_credits()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("connection refused")));

        let err = processor(Box::new(game_server))
            .process_at(request("500 크레딧", "5000"), TODAY)
            .await
            .unwrap_err();

        assert_eq!(err.payment_status(), PaymentStatus::GatewayError);
        assert_eq!(err.to_string(), "게임 서버 통신 중 오류가 발생했습니다.");
    }

    #[ntex::test]
    async fn test_process_rejects_unknown_product() {
        let processor = processor(Box::new(SimulatedGameServer));

        for (name, price) in [
            ("500 크레딧", "1000"),
            ("크레딧", "5000"),
            ("500 크레딧", "5,000"),
            ("500 크레딧", ""),
        ] {
            let err = processor
                .process_at(request(name, price), TODAY)
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "상품 정보가 올바르지 않습니다.");
        }
    }

    #[ntex::test]
    async fn test_process_validates_card_again() {
        let processor = processor(Box::new(SimulatedGameServer));

        let mut expired = request("500 크레딧", "5000");
        expired.card_info.expiry_date = "01/20".to_string();
        let err = processor.process_at(expired, TODAY).await.unwrap_err();
        assert_eq!(err.to_string(), "만료된 카드입니다.");

        let mut bad_month = request("500 크레딧", "5000");
        bad_month.card_info.expiry_date = "13/30".to_string();
        let err = processor.process_at(bad_month, TODAY).await.unwrap_err();
        assert_eq!(err.to_string(), "유효하지 않은 유효기간입니다.");
        assert_eq!(err.payment_status(), PaymentStatus::Invalid);
    }

    #[test]
    fn test_user_id_falls_back_without_email() {
        let mut request = request("500 크레딧", "5000");
        assert_eq!(user_id_for(&request), "buyer@example.com");

        request.card_info.email = "  ".to_string();
        assert!(Uuid::parse_str(&user_id_for(&request)).is_ok());
    }
}
