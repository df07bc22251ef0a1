//! Frontend route configuration module.
//!
//! Routes are grouped by page, each group registered by its own `configure` function.

use super::{credit_shop, payment, payment_api};
use ntex::web;

/// Configures the credit package picker.
///
/// # Routes
/// - `GET /credit-shop.html` - Package picker, `?selected=N` selects a tile
/// - `POST /credit-shop.html` - Store the selection and go to the payment page
pub fn credit_shop(cfg: &mut web::ServiceConfig) {
    cfg.service((
        credit_shop::get_credit_shop_view,
        credit_shop::proceed_to_payment,
    ));
}

/// Configures the payment form.
///
/// # Routes
/// - `GET /payment.html` - Payment form for the stored selection
/// - `POST /payment.html` - Validate and submit the card form
/// - `GET /payment/widgets/card-number` - Card number input with grouping applied
/// - `GET /payment/widgets/expiry-date` - Expiry input formatted as `MM/YY`
pub fn payment(cfg: &mut web::ServiceConfig) {
    cfg.service((
        payment::get_payment_view,
        payment::submit_payment,
        web::scope("/payment").service((
            payment::format_card_number_widget,
            payment::format_expiry_date_widget,
        )),
    ));
}

/// Configures the payment endpoint.
///
/// # Routes
/// - `POST /api/payment/process` - Charge the card and grant the credits
pub fn payment_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/payment").service((payment_api::process_payment,)));
}
