use super::{page_error, render_page};
use crate::error::AppError;
use crate::middlewares::{AccessGate, CurrentUser};
use crate::models::{ApiResponse, CartAck};
use crate::services::CartService;
use crate::views::{CartPage, Views};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, Result, web};

pub async fn show_cart(
    cart_service: web::Data<CartService>,
    views: web::Data<Views>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    let cart = match user.require() {
        Ok(me) => cart_service.view_cart(me.id).await,
        Err(e) => Err(e),
    };
    match cart {
        Ok(cart) => Ok(render_page(&views, &user, StatusCode::OK, &CartPage { cart })),
        Err(e) => Ok(page_error(&views, &user, e)),
    }
}

#[utoipa::path(
    post,
    path = "/cart/add/{tour_id}",
    tag = "cart",
    params(
        ("tour_id" = i64, Path, description = "Tour to add")
    ),
    responses(
        (status = 200, description = "Tour added to cart", body = CartAck),
        (status = 302, description = "Not signed in, redirected to /login"),
        (status = 404, description = "Tour not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn add_to_cart(
    cart_service: web::Data<CartService>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let result = match user.require() {
        Ok(me) => cart_service.add_to_cart(me.id, path.into_inner()).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(ack) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            ack,
            "Tour added to cart",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/cart/remove/{item_id}",
    tag = "cart",
    params(
        ("item_id" = i64, Path, description = "Cart line to remove")
    ),
    responses(
        (status = 200, description = "Line removed, or it was already gone", body = CartAck),
        (status = 302, description = "Not signed in, redirected to /login"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn remove_from_cart(
    cart_service: web::Data<CartService>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let item_id = path.into_inner();
    let result = match user.require() {
        Ok(me) => cart_service.remove_from_cart(me.id, item_id).await,
        Err(e) => Err::<u64, AppError>(e),
    };
    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            CartAck {
                item_id: Some(item_id),
                quantity: 0,
            },
            "Tour removed from cart",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn cart_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cart")
            .wrap(AccessGate::authenticated())
            .route("", web::get().to(show_cart))
            .route("/add/{tour_id}", web::post().to(add_to_cart))
            .route("/remove/{item_id}", web::post().to(remove_from_cart)),
    );
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::services::catalog_service::tests::{seed_city, seed_hotel, seed_tour};
    use actix_web::http::StatusCode;
    use actix_web::test;

    #[actix_web::test]
    async fn test_cart_actions_require_login() {
        let app = init_app(seeded_pool().await).await;

        let req = test::TestRequest::post().uri("/cart/add/1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp).as_deref(), Some("/login"));
    }

    #[actix_web::test]
    async fn test_add_twice_then_remove() {
        let pool = seeded_pool().await;
        let city = seed_city(&pool, "Lima").await;
        let hotel = seed_hotel(&pool, "Lima Suites", city.id).await;
        let tour = seed_tour(&pool, "Lima Trip", 100_000, 4, city.id, hotel.id).await;
        let app = init_app(pool).await;
        let cookie = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

        let add = || {
            test::TestRequest::post()
                .uri(&format!("/cart/add/{}", tour.id))
                .cookie(cookie.clone())
                .to_request()
        };
        let first = json_body(test::call_service(&app, add()).await).await;
        assert_eq!(first["success"], true);
        assert_eq!(first["data"]["quantity"], 1);
        let second = json_body(test::call_service(&app, add()).await).await;
        assert_eq!(second["data"]["quantity"], 2);
        assert_eq!(first["data"]["item_id"], second["data"]["item_id"]);

        let req = test::TestRequest::get().uri("/cart").cookie(cookie.clone()).to_request();
        let cart = json_body(test::call_service(&app, req).await).await;
        assert_eq!(cart["view"], "cart");
        assert_eq!(cart["items"].as_array().unwrap().len(), 1);
        assert_eq!(cart["total_cents"], 200_000);

        // unknown id: still a success, total unchanged
        let req = test::TestRequest::post()
            .uri("/cart/remove/9999")
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["success"], true);

        let item_id = second["data"]["item_id"].as_i64().unwrap();
        let req = test::TestRequest::post()
            .uri(&format!("/cart/remove/{item_id}"))
            .cookie(cookie.clone())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/cart").cookie(cookie).to_request();
        let cart = json_body(test::call_service(&app, req).await).await;
        assert!(cart["items"].as_array().unwrap().is_empty());
        assert_eq!(cart["total_cents"], 0);
    }

    #[actix_web::test]
    async fn test_add_unknown_tour_is_json_not_found() {
        let app = init_app(seeded_pool().await).await;
        let cookie = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

        let req = test::TestRequest::post()
            .uri("/cart/add/404")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = json_body(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
