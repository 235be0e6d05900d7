//! Presentation seam.
//!
//! Handlers hand a typed page model to [`Views`]; the configured
//! [`ViewRenderer`] turns `{view, title, user, ...model}` into a response body.
//! The bundled [`JsonViewRenderer`] emits that context as JSON so the site can
//! run (and be tested) without a template engine.

pub mod pages;

use crate::error::AppResult;
use crate::middlewares::CurrentUser;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

pub use pages::*;

/// A view-model bound to a named view.
pub trait Page: Serialize {
    const VIEW: &'static str;

    fn title(&self) -> String;
}

pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &str, context: &Value) -> AppResult<String>;

    fn content_type(&self) -> ContentType;
}

pub struct JsonViewRenderer;

impl ViewRenderer for JsonViewRenderer {
    fn render(&self, _view: &str, context: &Value) -> AppResult<String> {
        Ok(serde_json::to_string(context)?)
    }

    fn content_type(&self) -> ContentType {
        ContentType::json()
    }
}

#[derive(Clone)]
pub struct Views {
    renderer: Arc<dyn ViewRenderer>,
}

impl Views {
    pub fn new(renderer: Arc<dyn ViewRenderer>) -> Self {
        Self { renderer }
    }

    pub fn json() -> Self {
        Self::new(Arc::new(JsonViewRenderer))
    }

    /// Full context handed to the renderer.
    pub fn context<P: Page>(&self, user: &CurrentUser, page: &P) -> AppResult<Value> {
        let mut context = match serde_json::to_value(page)? {
            Value::Object(map) => Value::Object(map),
            Value::Null => json!({}),
            other => json!({ "data": other }),
        };
        if let Value::Object(map) = &mut context {
            map.insert("view".to_string(), Value::from(P::VIEW));
            map.insert("title".to_string(), Value::from(page.title()));
            map.insert("user".to_string(), serde_json::to_value(user.user())?);
        }
        Ok(context)
    }

    pub fn render<P: Page>(
        &self,
        status: StatusCode,
        user: &CurrentUser,
        page: &P,
    ) -> AppResult<HttpResponse> {
        let context = self.context(user, page)?;
        let body = self.renderer.render(P::VIEW, &context)?;
        Ok(HttpResponse::build(status)
            .content_type(self.renderer.content_type())
            .body(body))
    }
}
