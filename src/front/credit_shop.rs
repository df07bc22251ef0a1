use ntex::web;
use serde_json::json;

use crate::{
    api::credit_shop::{PackageSelector, ProceedOutcome},
    consts, metric,
    front::{AppState, errors, forms, middleware, session, utils},
    services::SessionStore,
};

fn render_credit_shop(
    selector: &PackageSelector,
    alert: Option<&str>,
) -> Result<web::HttpResponse, web::Error> {
    let context = tera::Context::from_value(json!({
        "tiles": selector.tiles(),
        "summary": selector.summary(),
        "can_proceed": selector.can_proceed(),
        "selected_index": selector.selected_index(),
        "alert": alert,
    }))
    .unwrap_or_default();

    utils::render_page("credit_shop.html", &context, consts::CREDIT_SHOP_PAGE_PATH)
}

fn select_requested(
    selector: &mut PackageSelector,
    index: usize,
) -> Result<(), errors::UserError> {
    selector
        .select_package(index)
        .map_err(|e| errors::UserError::FormInputValueError(e.to_string()))?;
    metric::incr_shop_action_statds("package_selected");

    Ok(())
}

/// Package picker. `?selected=N` picks a tile, otherwise the popular package is preselected
#[web::get("/credit-shop.html")]
async fn get_credit_shop_view(
    app_state: web::types::State<AppState>,
    query: web::types::Query<forms::credit_shop::SelectedQuery>,
    cookie: ntex_session::Session,
) -> Result<web::HttpResponse, web::Error> {
    let mut selector = PackageSelector::new(app_state.catalog.clone());
    match query.selected {
        Some(index) => select_requested(&mut selector, index)?,
        None => {
            selector.auto_select_default();
        }
    }

    middleware::csrf_token::issue_csrf_token(&app_state, &cookie)?;
    let alert = session::take_flash_alert(&cookie);

    render_credit_shop(&selector, alert.as_deref())
}

/// Pay button: stores the selection and moves on to the payment page
#[web::post("/credit-shop.html")]
async fn proceed_to_payment(
    _: middleware::csrf_token::CsrfToken,
    app_state: web::types::State<AppState>,
    form: web::types::Form<forms::credit_shop::ProceedForm>,
    cookie: ntex_session::Session,
) -> Result<web::HttpResponse, web::Error> {
    let mut selector = PackageSelector::new(app_state.catalog.clone());
    if let Some(index) = form.package_index {
        select_requested(&mut selector, index)?;
    }

    match proceed_target(&selector, &cookie) {
        Ok(path) => utils::redirect_to(path),
        Err(alert) => render_credit_shop(&selector, Some(alert)),
    }
}

/// Where the pay button leads, or the alert shown on the shop page when the selection
/// couldnt be stored
fn proceed_target(
    selector: &PackageSelector,
    store: &dyn SessionStore,
) -> Result<&'static str, &'static str> {
    match selector.proceed(store) {
        Ok(ProceedOutcome::Navigate(path)) => Ok(path),
        Ok(ProceedOutcome::NothingSelected) => Ok(consts::CREDIT_SHOP_PAGE_PATH),
        Err(e) => {
            logfire::error!(
                "selection couldnt be stored: {error}",
                error = e.to_string()
            );
            Err(consts::STORAGE_ERROR_ALERT)
        }
    }
}
