pub mod contact;
pub mod money;
pub mod password;
pub mod upload;

pub use contact::*;
pub use money::*;
pub use password::*;
pub use upload::{ImageStore, UploadedImage, image_content_type};
