pub mod admin;
pub mod cart;
pub mod catalog;
pub mod common;
pub mod site_content;
pub mod user;

pub use admin::*;
pub use cart::*;
pub use catalog::*;
pub use common::*;
pub use site_content::*;
pub use user::*;
