//! Payment page controller.
//!
//! Phases: `Idle -> Validating -> Submitting -> {Success, Failure}`. A failure leaves
//! the form editable and can be submitted again, a success hides the form for good.

use derive_more::{Display, Error};
use serde::Serialize;

use crate::{
    consts,
    models::{
        payment::{CardInput, PaymentFailure, PaymentRequest, PaymentSuccess},
        selection::Selection,
    },
    services::{PaymentGateway, SessionStore},
    shop::card::{self, CardValidationError, YearMonth},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPhase {
    #[display("idle")]
    Idle,
    #[display("validating")]
    Validating,
    #[display("submitting")]
    Submitting,
    #[display("success")]
    Success,
    #[display("failure")]
    Failure,
}

/// Product name and formatted price shown above the card form
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductDisplay {
    pub name: String,
    pub price_label: String,
}

impl ProductDisplay {
    /// Price sent to the endpoint: the displayed label without grouping commas
    pub fn price_digits(&self) -> String {
        self.price_label.replace(',', "")
    }
}

impl From<&Selection> for ProductDisplay {
    fn from(selection: &Selection) -> Self {
        ProductDisplay {
            name: selection.product_name.clone(),
            price_label: selection.price_label(),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum LoadOutcome {
    /// Product filled from the session store
    Loaded,
    /// Nothing stored but a product was already on display
    KeptDisplayed,
    /// Nothing to pay for: alert the user and send them back to the shop
    MissingSelection {
        alert: &'static str,
        redirect_to: &'static str,
    },
}

/// Result area under the form
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultPanel {
    Success { payment_id: String },
    Error { message: String },
}

/// Why a submit never reached the endpoint
#[derive(Debug, Display, Error, PartialEq)]
pub enum SubmitError {
    #[display("{_0}")]
    Validation(CardValidationError),
    #[display("결제가 이미 완료되었습니다.")]
    Finished,
    #[display("구매할 크레딧을 선택해주세요.")]
    MissingProduct,
}

pub struct PaymentFormController<'a> {
    gateway: &'a dyn PaymentGateway,
    product: Option<ProductDisplay>,
    phase: PaymentPhase,
    form_visible: bool,
    result: Option<ResultPanel>,
}

impl<'a> PaymentFormController<'a> {
    pub fn new(gateway: &'a dyn PaymentGateway) -> Self {
        Self {
            gateway,
            product: None,
            phase: PaymentPhase::Idle,
            form_visible: true,
            result: None,
        }
    }

    /// Starts with a product already on display, kept when the session store is empty
    pub fn with_displayed_product(mut self, product: ProductDisplay) -> Self {
        self.product = Some(product);
        self
    }

    pub fn phase(&self) -> PaymentPhase {
        self.phase
    }

    pub fn product(&self) -> Option<&ProductDisplay> {
        self.product.as_ref()
    }

    pub fn is_form_visible(&self) -> bool {
        self.form_visible
    }

    pub fn result_panel(&self) -> Option<&ResultPanel> {
        self.result.as_ref()
    }

    pub fn load_selection(&mut self, store: &dyn SessionStore) -> LoadOutcome {
        let selection = Selection::read_from(store).unwrap_or_else(|e| {
            logfire::warn!(
                "selection couldnt be read: {error}",
                error = e.to_string()
            );
            None
        });

        match (selection, &self.product) {
            (Some(selection), _) => {
                self.product = Some(ProductDisplay::from(&selection));
                LoadOutcome::Loaded
            }
            (None, Some(_)) => LoadOutcome::KeptDisplayed,
            (None, None) => LoadOutcome::MissingSelection {
                alert: consts::MISSING_SELECTION_ALERT,
                redirect_to: consts::CREDIT_SHOP_PAGE_PATH,
            },
        }
    }

    /// Formatting applied to the card number field on every input
    pub fn on_card_number_input(raw: &str) -> String {
        card::format_card_number(raw)
    }

    /// Formatting applied to the expiry field on every input
    pub fn on_expiry_input(raw: &str) -> String {
        card::format_expiry_date(raw)
    }

    pub fn validate(card: &CardInput, today: YearMonth) -> Result<(), CardValidationError> {
        card::validate_card(card, today)
    }

    /// Validates the form and, when it passes, submits it for the displayed product.
    ///
    /// `Ok` means the endpoint was called; the outcome is in [Self::result_panel].
    pub async fn submit_form(
        &mut self,
        card: CardInput,
        store: &dyn SessionStore,
        today: YearMonth,
    ) -> Result<(), SubmitError> {
        // Validating and Submitting only exist inside this call, repeated posts of the
        // same form are turned away by the in-flight submission registry
        if self.phase == PaymentPhase::Success {
            return Err(SubmitError::Finished);
        }

        let Some(product) = self.product.clone() else {
            return Err(SubmitError::MissingProduct);
        };

        self.phase = PaymentPhase::Validating;
        if let Err(e) = Self::validate(&card, today) {
            self.phase = PaymentPhase::Idle;
            return Err(SubmitError::Validation(e));
        }

        let card_info = CardInput {
            card_number: card::strip_card_number(&card.card_number),
            ..card
        };

        // the outcome is rendered into the result panel either way
        let _ = self
            .submit(
                PaymentRequest {
                    card_info,
                    product_name: product.name.clone(),
                    product_price: product.price_digits(),
                },
                store,
            )
            .await;

        Ok(())
    }

    /// Calls the payment endpoint. On success the selection is cleared from the store.
    pub async fn submit(
        &mut self,
        request: PaymentRequest,
        store: &dyn SessionStore,
    ) -> Result<PaymentSuccess, PaymentFailure> {
        self.phase = PaymentPhase::Submitting;

        match self.gateway.process_payment(request).await {
            Ok(success) => {
                self.render_success(&success.payment_id);
                Selection::clear(store);
                Ok(success)
            }
            Err(failure) => {
                self.render_error(&failure.message);
                Err(failure)
            }
        }
    }

    /// The form was already paid for: hide it and refuse any further submit
    pub fn mark_finished(&mut self) {
        self.phase = PaymentPhase::Success;
        self.form_visible = false;
    }

    pub fn render_success(&mut self, payment_id: &str) {
        self.phase = PaymentPhase::Success;
        self.form_visible = false;
        self.result = Some(ResultPanel::Success {
            payment_id: payment_id.to_string(),
        });
    }

    pub fn render_error(&mut self, message: &str) {
        self.phase = PaymentPhase::Failure;
        self.result = Some(ResultPanel::Error {
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{MockPaymentGateway, session_store::MemorySessionStore};

    const TODAY: YearMonth = YearMonth {
        year: 2025,
        month: 1,
    };

    fn valid_card() -> CardInput {
        CardInput {
            card_number: "1234 5678 9012 3456".to_string(),
            expiry_date: "12/30".to_string(),
            cvv: "123".to_string(),
            owner_name: "홍길동".to_string(),
            email: "buyer@example.com".to_string(),
        }
    }

    fn stored_selection() -> MemorySessionStore {
        MemorySessionStore::with_items(&[
            ("selectedCredit", "500"),
            ("selectedPrice", "5000"),
            ("productName", "500 크레딧"),
        ])
    }

    #[test]
    fn test_load_selection_fills_product() {
        let gateway = MockPaymentGateway::new();
        let mut controller = PaymentFormController::new(&gateway);

        assert_eq!(controller.load_selection(&stored_selection()), LoadOutcome::Loaded);
        assert_eq!(
            controller.product(),
            Some(&ProductDisplay {
                name: "500 크레딧".to_string(),
                price_label: "5,000".to_string(),
            })
        );
    }

    #[test]
    fn test_load_selection_missing_redirects_to_shop() {
        let gateway = MockPaymentGateway::new();
        let mut controller = PaymentFormController::new(&gateway);

        assert_eq!(
            controller.load_selection(&MemorySessionStore::default()),
            LoadOutcome::MissingSelection {
                alert: "구매할 크레딧을 선택해주세요.",
                redirect_to: "/credit-shop.html",
            }
        );
    }

    #[test]
    fn test_load_selection_missing_keeps_displayed_product() {
        let gateway = MockPaymentGateway::new();
        let mut controller =
            PaymentFormController::new(&gateway).with_displayed_product(ProductDisplay {
                name: "100 크레딧".to_string(),
                price_label: "1,000".to_string(),
            });

        assert_eq!(
            controller.load_selection(&MemorySessionStore::default()),
            LoadOutcome::KeptDisplayed
        );
        assert_eq!(controller.product().unwrap().name, "100 크레딧");
    }

    #[test]
    fn test_input_formatting() {
        assert_eq!(
            PaymentFormController::on_card_number_input("1234567890123456"),
            "1234 5678 9012 3456"
        );
        assert_eq!(PaymentFormController::on_expiry_input("1230"), "12/30");
        assert_eq!(PaymentFormController::on_expiry_input("12"), "12");
    }

    #[ntex::test]
    async fn test_submit_form_expired_card_never_calls_endpoint() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_process_payment().never();
        let store = stored_selection();
        let mut controller = PaymentFormController::new(&gateway);
        controller.load_selection(&store);

        let card = CardInput {
            expiry_date: "01/20".to_string(),
            ..valid_card()
        };
        let result = controller.submit_form(card, &store, TODAY).await;

        assert_eq!(
            result,
            Err(SubmitError::Validation(CardValidationError::ExpiredCard))
        );
        assert_eq!(result.unwrap_err().to_string(), "만료된 카드입니다.");
        assert_eq!(controller.phase(), PaymentPhase::Idle);
        assert!(controller.result_panel().is_none());
        assert_eq!(store.item("selectedCredit").as_deref(), Some("500"));
    }

    #[ntex::test]
    async fn test_submit_form_success_clears_selection() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_process_payment()
            .withf(|request| {
                request.card_info.card_number == "1234567890123456"
                    && request.product_name == "500 크레딧"
                    && request.product_price == "5000"
            })
            .times(1)
            .returning(|_| {
                Ok(PaymentSuccess {
                    payment_id: "PAY123".to_string(),
                })
            });
        let store = stored_selection();
        let mut controller = PaymentFormController::new(&gateway);
        controller.load_selection(&store);

        controller
            .submit_form(valid_card(), &store, TODAY)
            .await
            .unwrap();

        assert_eq!(controller.phase(), PaymentPhase::Success);
        assert!(!controller.is_form_visible());
        assert_eq!(
            controller.result_panel(),
            Some(&ResultPanel::Success {
                payment_id: "PAY123".to_string()
            })
        );
        assert!(store.is_empty());
    }

    #[ntex::test]
    async fn test_submit_form_failure_shows_endpoint_message() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_process_payment()
            .times(2)
            .returning(|_| Err(PaymentFailure::new("카드 한도 초과")));
        let store = stored_selection();
        let mut controller = PaymentFormController::new(&gateway);
        controller.load_selection(&store);

        controller
            .submit_form(valid_card(), &store, TODAY)
            .await
            .unwrap();

        assert_eq!(controller.phase(), PaymentPhase::Failure);
        assert!(controller.is_form_visible());
        assert_eq!(
            controller.result_panel(),
            Some(&ResultPanel::Error {
                message: "카드 한도 초과".to_string()
            })
        );
        assert_eq!(store.item("selectedPrice").as_deref(), Some("5000"));

        // still editable and resubmittable
        assert!(
            controller
                .submit_form(valid_card(), &store, TODAY)
                .await
                .is_ok()
        );
    }

    #[ntex::test]
    async fn test_submit_form_after_success_is_refused() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_process_payment().times(1).returning(|_| {
            Ok(PaymentSuccess {
                payment_id: "PAY123".to_string(),
            })
        });
        let store = stored_selection();
        let mut controller = PaymentFormController::new(&gateway);
        controller.load_selection(&store);

        controller
            .submit_form(valid_card(), &store, TODAY)
            .await
            .unwrap();

        assert_eq!(
            controller.submit_form(valid_card(), &store, TODAY).await,
            Err(SubmitError::Finished)
        );
    }

    #[ntex::test]
    async fn test_marked_finished_form_never_calls_endpoint() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_process_payment().never();
        let store = stored_selection();
        let mut controller = PaymentFormController::new(&gateway);
        controller.load_selection(&store);

        controller.mark_finished();

        assert!(!controller.is_form_visible());
        assert_eq!(
            controller.submit_form(valid_card(), &store, TODAY).await,
            Err(SubmitError::Finished)
        );
    }

    #[ntex::test]
    async fn test_submit_form_without_product() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_process_payment().never();
        let store = MemorySessionStore::default();
        let mut controller = PaymentFormController::new(&gateway);

        assert_eq!(
            controller.submit_form(valid_card(), &store, TODAY).await,
            Err(SubmitError::MissingProduct)
        );
    }

    #[test]
    fn test_price_digits() {
        let product = ProductDisplay {
            name: "5000 크레딧".to_string(),
            price_label: "50,000".to_string(),
        };
        assert_eq!(product.price_digits(), "50000");
    }
}
