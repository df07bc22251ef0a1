use ntex::web;
use serde_json::json;
use uuid::Uuid;

use crate::{
    api::payment_form::{LoadOutcome, PaymentFormController, PaymentPhase, SubmitError},
    consts,
    front::{AppState, forms, middleware, session, submission::SubmissionRefused, utils},
    shop::card::YearMonth,
};

fn render_payment_page(
    controller: &PaymentFormController,
    form: &forms::payment::CardFormEcho,
    alert: Option<&str>,
) -> Result<web::HttpResponse, web::Error> {
    let context = tera::Context::from_value(json!({
        "product": controller.product(),
        "phase": controller.phase().to_string(),
        "form_visible": controller.is_form_visible(),
        "result": controller.result_panel(),
        "form": form,
        "card_number": &form.card_number,
        "expiry_date": &form.expiry_date,
        "submission_id": Uuid::new_v4(),
        "alert": alert,
    }))
    .unwrap_or_default();

    utils::render_page("payment.html", &context, consts::PAYMENT_PAGE_PATH)
}

/// Sends the user back to `redirect_to`, the alert is shown by the next page
fn alert_and_redirect(
    cookie: &ntex_session::Session,
    alert: &str,
    redirect_to: &str,
) -> Result<web::HttpResponse, web::Error> {
    if let Err(e) = session::set_flash_alert(cookie, alert) {
        logfire::warn!("flash alert couldnt be stored: {error}", error = e.to_string());
    }

    utils::redirect_to(redirect_to)
}

#[web::get("/payment.html")]
async fn get_payment_view(
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
) -> Result<web::HttpResponse, web::Error> {
    let mut controller = PaymentFormController::new(app_state.payment_gateway.as_ref());
    if let LoadOutcome::MissingSelection { alert, redirect_to } = controller.load_selection(&cookie)
    {
        return alert_and_redirect(&cookie, alert, redirect_to);
    }

    middleware::csrf_token::issue_csrf_token(&app_state, &cookie)?;

    render_payment_page(
        &controller,
        &forms::payment::CardFormEcho::default(),
        None,
    )
}

/// Pay button of the payment form
#[web::post("/payment.html")]
async fn submit_payment(
    _: middleware::csrf_token::CsrfToken,
    app_state: web::types::State<AppState>,
    form: web::types::Form<forms::payment::CardForm>,
    cookie: ntex_session::Session,
) -> Result<web::HttpResponse, web::Error> {
    let form = form.into_inner();

    let mut controller = PaymentFormController::new(app_state.payment_gateway.as_ref());
    if let Some(product) = form.displayed_product() {
        controller = controller.with_displayed_product(product);
    }
    if let LoadOutcome::MissingSelection { alert, redirect_to } = controller.load_selection(&cookie)
    {
        return alert_and_redirect(&cookie, alert, redirect_to);
    }

    let echo = form.echo();
    let permit = match app_state.submissions.try_begin(form.submission_id) {
        Ok(permit) => permit,
        Err(SubmissionRefused::InFlight) => {
            logfire::warn!(
                "duplicated submit ignored: {submission_id}",
                submission_id = form.submission_id.to_string()
            );
            return render_payment_page(
                &controller,
                &echo,
                Some(consts::PAYMENT_IN_PROGRESS_ALERT),
            );
        }
        Err(SubmissionRefused::Completed) => {
            logfire::warn!(
                "submit of an already paid form ignored: {submission_id}",
                submission_id = form.submission_id.to_string()
            );
            controller.mark_finished();
            let alert = SubmitError::Finished.to_string();
            return render_payment_page(&controller, &echo, Some(&alert));
        }
    };

    let today = YearMonth::now_in(app_state.timezone);
    let alert = match controller
        .submit_form(form.card_input(), &cookie, today)
        .await
    {
        Ok(()) => {
            logfire::info!(
                "payment form submitted: {phase}",
                phase = controller.phase().to_string()
            );
            None
        }
        Err(e) => Some(e.to_string()),
    };

    if controller.phase() == PaymentPhase::Success {
        permit.complete();
    }

    render_payment_page(&controller, &echo, alert.as_deref())
}

/// Card number input re-rendered with the grouping applied
#[web::get("/widgets/card-number")]
async fn format_card_number_widget(
    query: web::types::Query<forms::payment::CardNumberQuery>,
) -> Result<web::HttpResponse, web::Error> {
    let context = tera::Context::from_value(json!({
        "card_number": PaymentFormController::on_card_number_input(&query.card_number),
    }))
    .unwrap_or_default();

    utils::render_widget(
        "widgets/card_number_input.html",
        &context,
        "/payment/widgets/card-number",
    )
}

/// Expiry input re-rendered as `MM/YY`
#[web::get("/widgets/expiry-date")]
async fn format_expiry_date_widget(
    query: web::types::Query<forms::payment::ExpiryDateQuery>,
) -> Result<web::HttpResponse, web::Error> {
    let context = tera::Context::from_value(json!({
        "expiry_date": PaymentFormController::on_expiry_input(&query.expiry_date),
    }))
    .unwrap_or_default();

    utils::render_widget(
        "widgets/expiry_date_input.html",
        &context,
        "/payment/widgets/expiry-date",
    )
}
