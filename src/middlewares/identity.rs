use crate::error::AppError;
use crate::models::UserResponse;
use crate::services::UserService;
use actix_session::{Session, SessionExt};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::rc::Rc;

pub const USER_ID_KEY: &str = "user_id";

/// Identity resolved for the current request; absent means anonymous.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(Option<UserResponse>);

impl CurrentUser {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn authenticated(user: UserResponse) -> Self {
        Self(Some(user))
    }

    pub fn user(&self) -> Option<&UserResponse> {
        self.0.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }

    /// For handlers behind the authentication gate.
    pub fn require(&self) -> Result<&UserResponse, AppError> {
        self.0
            .as_ref()
            .ok_or_else(|| AppError::AuthError("login required".to_string()))
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<CurrentUser>().cloned().unwrap_or_default();
        ready(Ok(user))
    }
}

/// Session helpers so handlers never touch raw keys.
pub fn persist_user(session: &Session, user_id: i64) -> Result<(), AppError> {
    session.renew();
    session.insert(USER_ID_KEY, user_id)?;
    Ok(())
}

pub fn session_user_id(session: &Session) -> Option<i64> {
    match session.get::<i64>(USER_ID_KEY) {
        Ok(id) => id,
        Err(e) => {
            log::warn!("Unreadable user id in session: {e}");
            None
        }
    }
}

/// Looks up the session's user id on every request and attaches a
/// [`CurrentUser`] to the request extensions.
pub struct IdentityMiddleware {
    user_service: UserService,
}

impl IdentityMiddleware {
    pub fn new(user_service: UserService) -> Self {
        Self { user_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService {
            service: Rc::new(service),
            user_service: self.user_service.clone(),
        }))
    }
}

pub struct IdentityMiddlewareService<S> {
    service: Rc<S>,
    user_service: UserService,
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let user_service = self.user_service.clone();

        Box::pin(async move {
            let session = req.get_session();
            let current = match session_user_id(&session) {
                Some(user_id) => match user_service.find_public(user_id).await? {
                    Some(user) => CurrentUser::authenticated(user),
                    None => {
                        // account deleted since login; the session itself is left as is
                        log::info!("Session refers to missing user {user_id}, treating as anonymous");
                        CurrentUser::anonymous()
                    }
                },
                None => CurrentUser::anonymous(),
            };

            req.extensions_mut().insert(current);
            service.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::entities::users;
    use crate::handlers::test_support::*;
    use crate::models::CredentialsForm;
    use crate::services::AuthService;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

    #[actix_web::test]
    async fn test_session_of_deleted_user_is_anonymous() {
        let pool = seeded_pool().await;
        AuthService::new(pool.clone())
            .register(&CredentialsForm {
                username: "alice".to_string(),
                password: "pw1".to_string(),
            })
            .await
            .unwrap();
        let app = init_app(pool.clone()).await;
        let cookie = login(&app, "alice", "pw1").await;

        let req = test::TestRequest::get().uri("/").cookie(cookie.clone()).to_request();
        let body = json_body(test::call_service(&app, req).await).await;
        assert_eq!(body["user"]["username"], "alice");

        let deleted = users::Entity::delete_many()
            .filter(users::Column::Username.eq("alice"))
            .exec(&pool)
            .await
            .unwrap();
        assert_eq!(deleted.rows_affected, 1);

        let req = test::TestRequest::get().uri("/").cookie(cookie.clone()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(json_body(resp).await["user"].is_null());

        let req = test::TestRequest::get().uri("/cart").cookie(cookie).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp).as_deref(), Some("/login"));
    }
}
