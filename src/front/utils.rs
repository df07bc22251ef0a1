use ntex::web;

use crate::front::{errors, templates};

/// [ntext responder](ntex::web::HttpResponse) to redirect to `url`
pub fn redirect_to(url: &str) -> Result<web::HttpResponse, web::Error> {
    Ok(web::HttpResponse::Found().header("location", url).finish())
}

/// Renders `template_name` as a full html page
pub fn render_page(
    template_name: &str,
    context: &tera::Context,
    endpoint: &str,
) -> Result<web::HttpResponse, web::Error> {
    let content = templates::WEB_TEMPLATES
        .render(template_name, context)
        .map_err(|e| {
            errors::ServerError::TemplateError(format!(
                "at {endpoint} endpoint the template couldnt be rendered: {e}"
            ))
        })?;

    Ok(web::HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(content))
}

/// Renders `template_name` as an htmx fragment
pub fn render_widget(
    template_name: &str,
    context: &tera::Context,
    endpoint: &str,
) -> Result<web::HttpResponse, web::Error> {
    let content = templates::WEB_TEMPLATES
        .render(template_name, context)
        .map_err(|e| {
            errors::ServerError::WidgetTemplateError(format!(
                "at {endpoint} endpoint the widget couldnt be rendered: {e}"
            ))
        })?;

    Ok(web::HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(content))
}
