use super::{page_error, redirect, render_page};
use crate::error::AppResult;
use crate::middlewares::{AccessGate, CurrentUser};
use crate::models::UpdateProfileForm;
use crate::services::{CartService, UserService};
use crate::views::{ProfilePage, Views};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Result, web};

async fn profile_page(
    user_service: &UserService,
    cart_service: &CartService,
    user_id: i64,
    error: Option<String>,
) -> AppResult<ProfilePage> {
    Ok(ProfilePage {
        profile: user_service.get_profile(user_id).await?,
        cart: cart_service.view_cart(user_id).await?,
        error,
    })
}

pub async fn show_profile(
    user_service: web::Data<UserService>,
    cart_service: web::Data<CartService>,
    views: web::Data<Views>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    let page = match user.require() {
        Ok(me) => profile_page(&user_service, &cart_service, me.id, None).await,
        Err(e) => Err(e),
    };
    match page {
        Ok(page) => Ok(render_page(&views, &user, StatusCode::OK, &page)),
        Err(e) => Ok(page_error(&views, &user, e)),
    }
}

pub async fn update_profile(
    user_service: web::Data<UserService>,
    cart_service: web::Data<CartService>,
    views: web::Data<Views>,
    user: CurrentUser,
    form: web::Form<UpdateProfileForm>,
) -> Result<HttpResponse> {
    let me = match user.require() {
        Ok(me) => me.id,
        Err(e) => return Ok(page_error(&views, &user, e)),
    };

    match user_service.update_profile(me, form.into_inner()).await {
        Ok(_) => Ok(redirect("/profile")),
        Err(e) if e.is_user_correctable() => {
            match profile_page(&user_service, &cart_service, me, Some(e.user_message())).await {
                Ok(page) => Ok(render_page(&views, &user, StatusCode::BAD_REQUEST, &page)),
                Err(e) => Ok(page_error(&views, &user, e)),
            }
        }
        Err(e) => Ok(page_error(&views, &user, e)),
    }
}

pub fn profile_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/profile")
            .wrap(AccessGate::authenticated())
            .route("", web::get().to(show_profile))
            .route("/update", web::post().to(update_profile)),
    );
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use actix_web::http::StatusCode;
    use actix_web::test;

    #[actix_web::test]
    async fn test_profile_requires_login() {
        let app = init_app(seeded_pool().await).await;

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/profile").to_request()).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp).as_deref(), Some("/login"));
    }

    #[actix_web::test]
    async fn test_wrong_current_password_rerenders_profile() {
        let app = init_app(seeded_pool().await).await;
        let cookie = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

        let req = test::TestRequest::post()
            .uri("/profile/update")
            .cookie(cookie.clone())
            .set_form([("currentPassword", "nope"), ("newPassword", "changed")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = json_body(resp).await;
        assert_eq!(body["view"], "profile");
        assert_eq!(body["error"], "Current password is incorrect");
        assert!(body["profile"].get("password_hash").is_none());

        let req = test::TestRequest::post()
            .uri("/profile/update")
            .cookie(cookie)
            .set_form([("firstName", "Ada"), ("email", "ada@example.com")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp).as_deref(), Some("/profile"));
    }
}
