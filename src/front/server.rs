//! Handlers not linked to a specific url

use ntex::web;

use crate::{
    consts,
    front::{errors, utils},
};

/// Return a [UrlNotFound](errors::UserError::UrlNotFound) error for urls not defined
pub async fn serve_not_found() -> Result<web::HttpResponse, web::Error> {
    Err(errors::UserError::UrlNotFound.into())
}

/// The shop is the landing page
#[web::get("/")]
async fn index() -> Result<web::HttpResponse, web::Error> {
    utils::redirect_to(consts::CREDIT_SHOP_PAGE_PATH)
}
