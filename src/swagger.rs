use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::Role;
use crate::handlers;
use crate::models::*;

/// Only the JSON cart endpoints are documented; every other route renders a page.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::cart::add_to_cart,
        handlers::cart::remove_from_cart,
    ),
    components(
        schemas(
            CartAck,
            CartView,
            CartLine,
            TourResponse,
            CityResponse,
            HotelResponse,
            ClientResponse,
            UserResponse,
            Role,
        )
    ),
    tags(
        (name = "cart", description = "Shopping cart API"),
    ),
    info(
        title = "Travel Agency API",
        version = "1.0.0",
        description = "JSON endpoints of the travel agency site. Calls need the session cookie set by /login."
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
