use crate::error::AppError;
use crate::utils::{ImageStore, image_content_type};
use actix_web::{HttpResponse, ResponseError, Result, web};

/// Serves tour images written by the admin forms.
pub async fn serve_upload(
    image_store: web::Data<ImageStore>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let stored_name = path.into_inner();
    match image_store.read(&stored_name).await {
        Ok(Some(bytes)) => Ok(HttpResponse::Ok()
            .content_type(image_content_type(&stored_name))
            .body(bytes)),
        Ok(None) => Ok(AppError::NotFound("Image not found".to_string()).error_response()),
        Err(e) => Ok(e.error_response()),
    }
}

/// `GET {url_prefix}/{file}`; the prefix comes from the upload config.
pub fn upload_resource(url_prefix: &str) -> actix_web::Resource {
    web::resource(format!("{}/{{file}}", url_prefix.trim_end_matches('/')))
        .route(web::get().to(serve_upload))
}
