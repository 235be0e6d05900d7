use super::{page_error, redirect, render_page};
use crate::middlewares::{CurrentUser, persist_user};
use crate::models::CredentialsForm;
use crate::services::AuthService;
use crate::views::{LoginPage, RegisterPage, Views};
use actix_session::Session;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Result, web};

pub async fn login_page(views: web::Data<Views>, user: CurrentUser) -> Result<HttpResponse> {
    if user.is_authenticated() {
        return Ok(redirect("/"));
    }
    Ok(render_page(&views, &user, StatusCode::OK, &LoginPage::default()))
}

/// Sets the session only on success; admins land on the admin panel.
pub async fn login(
    auth_service: web::Data<AuthService>,
    views: web::Data<Views>,
    user: CurrentUser,
    session: Session,
    form: web::Form<CredentialsForm>,
) -> Result<HttpResponse> {
    match auth_service.login(&form).await {
        Ok(account) => {
            if let Err(e) = persist_user(&session, account.id) {
                return Ok(page_error(&views, &user, e));
            }
            log::info!("User {} logged in", account.id);
            Ok(redirect(if account.is_admin() { "/admin" } else { "/" }))
        }
        Err(e) if e.is_user_correctable() => {
            let page = LoginPage {
                error: Some(e.user_message()),
                username: Some(form.username.clone()),
            };
            Ok(render_page(&views, &user, StatusCode::BAD_REQUEST, &page))
        }
        Err(e) => Ok(page_error(&views, &user, e)),
    }
}

pub async fn register_page(views: web::Data<Views>, user: CurrentUser) -> Result<HttpResponse> {
    if user.is_authenticated() {
        return Ok(redirect("/"));
    }
    Ok(render_page(&views, &user, StatusCode::OK, &RegisterPage::default()))
}

/// New accounts are always clients and are signed in straight away.
pub async fn register(
    auth_service: web::Data<AuthService>,
    views: web::Data<Views>,
    user: CurrentUser,
    session: Session,
    form: web::Form<CredentialsForm>,
) -> Result<HttpResponse> {
    match auth_service.register(&form).await {
        Ok(account) => {
            if let Err(e) = persist_user(&session, account.id) {
                return Ok(page_error(&views, &user, e));
            }
            Ok(redirect("/"))
        }
        Err(e) if e.is_user_correctable() => {
            let page = RegisterPage {
                error: Some(e.user_message()),
                username: Some(form.username.clone()),
            };
            Ok(render_page(&views, &user, StatusCode::BAD_REQUEST, &page))
        }
        Err(e) => Ok(page_error(&views, &user, e)),
    }
}

pub async fn logout(session: Session) -> Result<HttpResponse> {
    session.purge();
    Ok(redirect("/"))
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::get().to(login_page))
        .route("/login", web::post().to(login))
        .route("/register", web::get().to(register_page))
        .route("/register", web::post().to(register))
        .route("/logout", web::get().to(logout));
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use actix_web::http::StatusCode;
    use actix_web::test;

    async fn register<S>(app: &S, username: &str, password: &str) -> actix_web::dev::ServiceResponse
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse,
                Error = actix_web::Error,
            >,
    {
        let req = test::TestRequest::post()
            .uri("/register")
            .set_form([("username", username), ("password", password)])
            .to_request();
        test::call_service(app, req).await
    }

    #[actix_web::test]
    async fn test_register_duplicate_and_login_scenario() {
        let app = init_app(seeded_pool().await).await;

        let first = register(&app, "alice", "pw1").await;
        assert_eq!(first.status(), StatusCode::FOUND);
        assert_eq!(location(&first).as_deref(), Some("/"));
        let cookie = session_cookie(&first).expect("auto-login after register");

        // signed in: the profile is reachable
        let req = test::TestRequest::get().uri("/profile").cookie(cookie).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["profile"]["username"], "alice");
        assert_eq!(body["profile"]["role"], "client");

        let second = register(&app, "alice", "pw2").await;
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        let body = json_body(second).await;
        assert_eq!(body["view"], "register");
        assert!(body["error"].as_str().unwrap().contains("already exists"));

        let cookie = login(&app, "alice", "pw1").await;
        let req = test::TestRequest::get().uri("/cart").cookie(cookie).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_wrong_password_sets_no_session() {
        let app = init_app(seeded_pool().await).await;
        register(&app, "alice", "pw1").await;

        let req = test::TestRequest::post()
            .uri("/login")
            .set_form([("username", "alice"), ("password", "wrong")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(session_cookie(&resp).is_none());

        let body = json_body(resp).await;
        assert_eq!(body["view"], "login");
        assert_eq!(body["error"], "Invalid username or password");
        assert!(body["user"].is_null());
    }

    #[actix_web::test]
    async fn test_admin_login_redirects_to_panel() {
        let app = init_app(seeded_pool().await).await;

        let req = test::TestRequest::post()
            .uri("/login")
            .set_form([("username", ADMIN_USERNAME), ("password", ADMIN_PASSWORD)])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp).as_deref(), Some("/admin"));
    }

    #[actix_web::test]
    async fn test_login_page_redirects_when_signed_in() {
        let app = init_app(seeded_pool().await).await;
        let cookie = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

        let req = test::TestRequest::get().uri("/login").cookie(cookie).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp).as_deref(), Some("/"));
    }

    #[actix_web::test]
    async fn test_logout_clears_session() {
        let app = init_app(seeded_pool().await).await;
        let cookie = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

        let req = test::TestRequest::get().uri("/logout").cookie(cookie).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        let cleared = session_cookie(&resp).expect("removal cookie");
        assert_eq!(cleared.value(), "");
    }
}
