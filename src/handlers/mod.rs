pub mod admin;
pub mod auth;
pub mod cart;
pub mod profile;
pub mod tour;
pub mod uploads;

pub use admin::admin_config;
pub use auth::auth_config;
pub use cart::cart_config;
pub use profile::profile_config;
pub use tour::tour_config;
pub use uploads::upload_resource;

use crate::error::AppError;
use crate::middlewares::CurrentUser;
use crate::views::{ErrorPage, NotFoundPage, Page, Views};
use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError, Result, web};

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Renders a page, falling back to the error page when rendering fails.
pub(crate) fn render_page<P: Page>(
    views: &Views,
    user: &CurrentUser,
    status: StatusCode,
    page: &P,
) -> HttpResponse {
    match views.render(status, user, page) {
        Ok(resp) => resp,
        Err(e) => page_error(views, user, e),
    }
}

/// Page-route failure: 404 view, fixed denial or generic 500 page.
pub(crate) fn page_error(views: &Views, user: &CurrentUser, err: AppError) -> HttpResponse {
    match &err {
        AppError::NotFound(msg) => {
            let page = NotFoundPage {
                message: msg.clone(),
            };
            views
                .render(StatusCode::NOT_FOUND, user, &page)
                .unwrap_or_else(|e| e.error_response())
        }
        AppError::Forbidden => err.error_response(),
        _ => {
            log::error!("Request failed: {err}");
            let page = ErrorPage {
                message: err.user_message(),
            };
            views
                .render(err.status_code(), user, &page)
                .unwrap_or_else(|e| e.error_response())
        }
    }
}

/// Default service for unknown routes.
pub async fn not_found(views: web::Data<Views>, user: CurrentUser) -> Result<HttpResponse> {
    Ok(render_page(
        &views,
        &user,
        StatusCode::NOT_FOUND,
        &NotFoundPage::default(),
    ))
}

/// Ids from the path; anything non-numeric is simply not found.
pub(crate) fn parse_path_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::NotFound("Page not found".to_string()))
}


/// Every route of the site; `main` and the HTTP tests share this.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(tour_config)
        .configure(auth_config)
        .configure(profile_config)
        .configure(cart_config)
        .configure(admin_config)
        .default_service(web::to(not_found));
}
