pub mod access;
pub mod identity;
pub mod session;

pub use access::{AccessGate, Decision, Gate, require_authenticated, require_role};
pub use identity::{CurrentUser, IdentityMiddleware, persist_user, session_user_id};
pub use session::{SESSION_COOKIE, session_key, session_middleware};
