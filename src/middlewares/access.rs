use crate::entities::Role;
use crate::error::AppError;
use crate::middlewares::CurrentUser;
use actix_web::body::EitherBody;
use actix_web::http::header;
use actix_web::{
    Error, HttpMessage, HttpResponse, ResponseError,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

pub const LOGIN_PATH: &str = "/login";

/// Route requirement placed ahead of a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Authenticated,
    Role(Role),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Unauthenticated: soft failure, the user can log in.
    RedirectToLogin,
    /// Authenticated with the wrong role.
    Forbidden,
}

pub fn require_authenticated(user: &CurrentUser) -> Decision {
    if user.is_authenticated() {
        Decision::Allow
    } else {
        Decision::RedirectToLogin
    }
}

pub fn require_role(user: &CurrentUser, role: Role) -> Decision {
    match user.user() {
        Some(u) if u.role == role => Decision::Allow,
        _ => Decision::Forbidden,
    }
}

impl Gate {
    pub fn check(&self, user: &CurrentUser) -> Decision {
        match self {
            Gate::Authenticated => require_authenticated(user),
            Gate::Role(role) => require_role(user, *role),
        }
    }
}

/// Applies a [`Gate`] to every route in the wrapped scope. Expects
/// `IdentityMiddleware` to have run first.
pub struct AccessGate {
    gate: Gate,
}

impl AccessGate {
    pub fn authenticated() -> Self {
        Self {
            gate: Gate::Authenticated,
        }
    }

    pub fn role(role: Role) -> Self {
        Self {
            gate: Gate::Role(role),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessGateService {
            service,
            gate: self.gate,
        }))
    }
}

pub struct AccessGateService<S> {
    service: S,
    gate: Gate,
}

impl<S, B> Service<ServiceRequest> for AccessGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let user = req
            .extensions()
            .get::<CurrentUser>()
            .cloned()
            .unwrap_or_default();

        match self.gate.check(&user) {
            Decision::Allow => {
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Decision::RedirectToLogin => {
                let resp = HttpResponse::Found()
                    .insert_header((header::LOCATION, LOGIN_PATH))
                    .finish();
                Box::pin(async move { Ok(req.into_response(resp).map_into_right_body()) })
            }
            Decision::Forbidden => {
                log::warn!(
                    "Denied {} {} for user {:?}",
                    req.method(),
                    req.path(),
                    user.user().map(|u| u.id)
                );
                let resp = AppError::Forbidden.error_response();
                Box::pin(async move { Ok(req.into_response(resp).map_into_right_body()) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserResponse;

    fn user_with(role: Role) -> CurrentUser {
        CurrentUser::authenticated(UserResponse {
            id: 1,
            username: "u".to_string(),
            role,
            first_name: None,
            last_name: None,
            email: None,
            phone: None,
            birth_date: None,
            gender: None,
            created_at: chrono::Utc::now(),
        })
    }

    #[test]
    fn test_require_authenticated() {
        assert_eq!(
            require_authenticated(&CurrentUser::anonymous()),
            Decision::RedirectToLogin
        );
        assert_eq!(require_authenticated(&user_with(Role::Client)), Decision::Allow);
    }

    #[test]
    fn test_require_role_admin() {
        assert_eq!(require_role(&user_with(Role::Client), Role::Admin), Decision::Forbidden);
        assert_eq!(require_role(&user_with(Role::Moderator), Role::Admin), Decision::Forbidden);
        assert_eq!(require_role(&user_with(Role::Admin), Role::Admin), Decision::Allow);
        assert_eq!(require_role(&CurrentUser::anonymous(), Role::Admin), Decision::Forbidden);
    }

    #[test]
    fn test_gates_compose() {
        let admin = user_with(Role::Admin);
        for gate in [Gate::Authenticated, Gate::Role(Role::Admin)] {
            assert_eq!(gate.check(&admin), Decision::Allow);
        }
    }
}
