//! JSON endpoint behind the payment page

use ntex::{http, web};

use crate::{
    api::payment::PaymentApiError,
    front::AppState,
    models::payment::{PaymentErrorBody, PaymentRequest},
};

pub fn status_code_for(error: &PaymentApiError) -> http::StatusCode {
    match error {
        PaymentApiError::InvalidCard(_) | PaymentApiError::InvalidRequest(_) => {
            http::StatusCode::BAD_REQUEST
        }
        PaymentApiError::Rejected(_) => http::StatusCode::PAYMENT_REQUIRED,
        PaymentApiError::GameServerUnavailable(_) => http::StatusCode::BAD_GATEWAY,
    }
}

#[web::post("/process")]
async fn process_payment(
    app_state: web::types::State<AppState>,
    request_body: web::types::Json<PaymentRequest>,
) -> web::HttpResponse {
    match app_state
        .payment_processor
        .process(request_body.into_inner())
        .await
    {
        Ok(receipt) => web::HttpResponse::Ok().json(&receipt),
        Err(e) => {
            web::HttpResponse::build(status_code_for(&e)).json(&PaymentErrorBody::new(e.to_string()))
        }
    }
}
