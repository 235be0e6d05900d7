use super::{page_error, parse_path_id, redirect, render_page};
use crate::entities::Role;
use crate::error::{AppError, AppResult};
use crate::middlewares::{AccessGate, CurrentUser};
use crate::models::{
    CityForm, ClientForm, HotelForm, NewCity, NewClient, NewHotel, NewTour, SiteContentForm,
    TourForm, TourResponse,
};
use crate::services::{AdminService, CatalogService, SiteContentService};
use crate::utils::{ImageStore, UploadedImage};
use crate::views::{
    AdminPanelPage, CityFormPage, ClientFormPage, HotelFormPage, Page, SiteContentFormPage,
    TourFormPage, Views,
};
use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Result, web};
use futures_util::TryStreamExt;
use std::collections::HashMap;
use std::future::Future;

const ADMIN_HOME: &str = "/admin";
const IMAGE_FIELD: &str = "image";
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// Redirects to the panel on success, re-renders the form with 400 when the
/// admin can fix the input.
async fn after_submit<T, P, F, Fut>(
    views: &Views,
    user: &CurrentUser,
    outcome: AppResult<T>,
    rerender: F,
) -> HttpResponse
where
    P: Page,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = AppResult<P>>,
{
    match outcome {
        Ok(_) => redirect(ADMIN_HOME),
        Err(e) if e.is_user_correctable() => match rerender(e.user_message()).await {
            Ok(page) => render_page(views, user, StatusCode::BAD_REQUEST, &page),
            Err(e) => page_error(views, user, e),
        },
        Err(e) => page_error(views, user, e),
    }
}

fn show<P: Page>(views: &Views, user: &CurrentUser, page: AppResult<P>) -> HttpResponse {
    match page {
        Ok(page) => render_page(views, user, StatusCode::OK, &page),
        Err(e) => page_error(views, user, e),
    }
}

fn after_delete(views: &Views, user: &CurrentUser, outcome: AppResult<u64>) -> HttpResponse {
    match outcome {
        Ok(_) => redirect(ADMIN_HOME),
        Err(e) => page_error(views, user, e),
    }
}

/// 管理后台首页
pub async fn panel(
    catalog: web::Data<CatalogService>,
    views: web::Data<Views>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    let page = async {
        AppResult::Ok(AdminPanelPage {
            tours: catalog.list_tours(None, None).await?,
            cities: catalog.list_cities().await?,
            hotels: catalog.list_hotels().await?,
            clients: catalog.list_clients().await?,
        })
    };
    Ok(show(&views, &user, page.await))
}

// -----------------------------
// City
// -----------------------------

pub async fn add_city_page(views: web::Data<Views>, user: CurrentUser) -> Result<HttpResponse> {
    Ok(show(&views, &user, Ok(CityFormPage::default())))
}

pub async fn add_city(
    admin: web::Data<AdminService>,
    views: web::Data<Views>,
    user: CurrentUser,
    form: web::Form<CityForm>,
) -> Result<HttpResponse> {
    let outcome = match NewCity::try_from(form.into_inner()) {
        Ok(input) => admin.create_city(input).await,
        Err(e) => Err(e),
    };
    Ok(after_submit(&views, &user, outcome, |error| async move {
        Ok(CityFormPage {
            city: None,
            error: Some(error),
        })
    })
    .await)
}

pub async fn edit_city_page(
    catalog: web::Data<CatalogService>,
    views: web::Data<Views>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let page = match parse_path_id(&path) {
        Ok(id) => catalog.get_city(id).await.map(|city| CityFormPage {
            city: Some(city),
            error: None,
        }),
        Err(e) => Err(e),
    };
    Ok(show(&views, &user, page))
}

pub async fn update_city(
    admin: web::Data<AdminService>,
    catalog: web::Data<CatalogService>,
    views: web::Data<Views>,
    user: CurrentUser,
    path: web::Path<String>,
    form: web::Form<CityForm>,
) -> Result<HttpResponse> {
    let city_id = match parse_path_id(&path) {
        Ok(id) => id,
        Err(e) => return Ok(page_error(&views, &user, e)),
    };
    let outcome = admin.update_city(city_id, form.into_inner()).await;
    let catalog = catalog.get_ref();
    Ok(after_submit(&views, &user, outcome, |error| async move {
        Ok(CityFormPage {
            city: Some(catalog.get_city(city_id).await?),
            error: Some(error),
        })
    })
    .await)
}

pub async fn delete_city(
    admin: web::Data<AdminService>,
    views: web::Data<Views>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let outcome = match parse_path_id(&path) {
        Ok(id) => admin.delete_city(id).await,
        Err(e) => Err(e),
    };
    Ok(after_delete(&views, &user, outcome))
}

// -----------------------------
// Hotel
// -----------------------------

async fn hotel_form_page(
    catalog: &CatalogService,
    hotel_id: Option<i64>,
    error: Option<String>,
) -> AppResult<HotelFormPage> {
    let hotel = match hotel_id {
        Some(id) => Some(catalog.get_hotel(id).await?),
        None => None,
    };
    Ok(HotelFormPage {
        hotel,
        cities: catalog.list_cities().await?,
        error,
    })
}

pub async fn add_hotel_page(
    catalog: web::Data<CatalogService>,
    views: web::Data<Views>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    Ok(show(&views, &user, hotel_form_page(&catalog, None, None).await))
}

pub async fn add_hotel(
    admin: web::Data<AdminService>,
    catalog: web::Data<CatalogService>,
    views: web::Data<Views>,
    user: CurrentUser,
    form: web::Form<HotelForm>,
) -> Result<HttpResponse> {
    let outcome = match NewHotel::try_from(form.into_inner()) {
        Ok(input) => admin.create_hotel(input).await,
        Err(e) => Err(e),
    };
    let catalog = catalog.get_ref();
    Ok(after_submit(&views, &user, outcome, |error| {
        hotel_form_page(catalog, None, Some(error))
    })
    .await)
}

pub async fn edit_hotel_page(
    catalog: web::Data<CatalogService>,
    views: web::Data<Views>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let page = match parse_path_id(&path) {
        Ok(id) => hotel_form_page(&catalog, Some(id), None).await,
        Err(e) => Err(e),
    };
    Ok(show(&views, &user, page))
}

pub async fn update_hotel(
    admin: web::Data<AdminService>,
    catalog: web::Data<CatalogService>,
    views: web::Data<Views>,
    user: CurrentUser,
    path: web::Path<String>,
    form: web::Form<HotelForm>,
) -> Result<HttpResponse> {
    let hotel_id = match parse_path_id(&path) {
        Ok(id) => id,
        Err(e) => return Ok(page_error(&views, &user, e)),
    };
    let outcome = admin.update_hotel(hotel_id, form.into_inner()).await;
    let catalog = catalog.get_ref();
    Ok(after_submit(&views, &user, outcome, |error| {
        hotel_form_page(catalog, Some(hotel_id), Some(error))
    })
    .await)
}

pub async fn delete_hotel(
    admin: web::Data<AdminService>,
    views: web::Data<Views>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let outcome = match parse_path_id(&path) {
        Ok(id) => admin.delete_hotel(id).await,
        Err(e) => Err(e),
    };
    Ok(after_delete(&views, &user, outcome))
}

// -----------------------------
// Client
// -----------------------------

pub async fn add_client_page(views: web::Data<Views>, user: CurrentUser) -> Result<HttpResponse> {
    Ok(show(&views, &user, Ok(ClientFormPage::default())))
}

pub async fn add_client(
    admin: web::Data<AdminService>,
    views: web::Data<Views>,
    user: CurrentUser,
    form: web::Form<ClientForm>,
) -> Result<HttpResponse> {
    let outcome = match NewClient::try_from(form.into_inner()) {
        Ok(input) => admin.create_client(input).await,
        Err(e) => Err(e),
    };
    Ok(after_submit(&views, &user, outcome, |error| async move {
        Ok(ClientFormPage {
            client: None,
            error: Some(error),
        })
    })
    .await)
}

pub async fn edit_client_page(
    catalog: web::Data<CatalogService>,
    views: web::Data<Views>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let page = match parse_path_id(&path) {
        Ok(id) => catalog.get_client(id).await.map(|client| ClientFormPage {
            client: Some(client),
            error: None,
        }),
        Err(e) => Err(e),
    };
    Ok(show(&views, &user, page))
}

pub async fn update_client(
    admin: web::Data<AdminService>,
    catalog: web::Data<CatalogService>,
    views: web::Data<Views>,
    user: CurrentUser,
    path: web::Path<String>,
    form: web::Form<ClientForm>,
) -> Result<HttpResponse> {
    let client_id = match parse_path_id(&path) {
        Ok(id) => id,
        Err(e) => return Ok(page_error(&views, &user, e)),
    };
    let outcome = admin.update_client(client_id, form.into_inner()).await;
    let catalog = catalog.get_ref();
    Ok(after_submit(&views, &user, outcome, |error| async move {
        Ok(ClientFormPage {
            client: Some(catalog.get_client(client_id).await?),
            error: Some(error),
        })
    })
    .await)
}

pub async fn delete_client(
    admin: web::Data<AdminService>,
    views: web::Data<Views>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let outcome = match parse_path_id(&path) {
        Ok(id) => admin.delete_client(id).await,
        Err(e) => Err(e),
    };
    Ok(after_delete(&views, &user, outcome))
}

// -----------------------------
// Tour
// -----------------------------

/// Text fields plus the optional image of a multipart tour form.
struct TourSubmission {
    form: TourForm,
    image: Option<UploadedImage>,
}

async fn read_tour_submission(
    mut payload: Multipart,
    max_image_bytes: usize,
) -> AppResult<TourSubmission> {
    let mut fields = HashMap::new();
    let mut image = None;

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name != IMAGE_FIELD && !TourForm::accepts(&name) {
            // the rest of the part is skipped by the next `try_next`
            log::debug!("Ignoring unknown tour form field {name:?}");
            continue;
        }
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let limit = if name == IMAGE_FIELD {
            max_image_bytes
        } else {
            MAX_TEXT_FIELD_BYTES
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            if bytes.len() + chunk.len() > limit {
                return Err(AppError::UploadError(format!(
                    "Field {name} exceeds the {limit} byte limit"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        if name == IMAGE_FIELD {
            // an untouched file input still sends an empty part
            match file_name {
                Some(file_name) if !file_name.is_empty() && !bytes.is_empty() => {
                    image = Some(UploadedImage { file_name, bytes });
                }
                _ => {}
            }
        } else {
            let value = String::from_utf8(bytes).map_err(|_| {
                AppError::ValidationError(format!("Field {name} is not valid text"))
            })?;
            fields.insert(name, value);
        }
    }

    Ok(TourSubmission {
        form: TourForm::from_fields(fields),
        image,
    })
}

async fn tour_form_page(
    catalog: &CatalogService,
    tour: Option<TourResponse>,
    error: Option<String>,
) -> AppResult<TourFormPage> {
    Ok(TourFormPage {
        tour,
        cities: catalog.list_cities().await?,
        hotels: catalog.list_hotels().await?,
        clients: catalog.list_clients().await?,
        error,
    })
}

/// Saves the upload, if any, and removes it again when `write` fails.
async fn with_stored_image<F, Fut>(
    image_store: &ImageStore,
    image: Option<&UploadedImage>,
    write: F,
) -> AppResult<TourResponse>
where
    F: FnOnce(Option<String>) -> Fut,
    Fut: Future<Output = AppResult<TourResponse>>,
{
    let stored = match image {
        Some(image) => Some(image_store.save(image).await?),
        None => None,
    };
    match write(stored.clone()).await {
        Ok(tour) => Ok(tour),
        Err(e) => {
            if let Some(path) = &stored {
                image_store.discard(path).await;
            }
            Err(e)
        }
    }
}

pub async fn add_tour_page(
    catalog: web::Data<CatalogService>,
    views: web::Data<Views>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    Ok(show(&views, &user, tour_form_page(&catalog, None, None).await))
}

pub async fn add_tour(
    admin: web::Data<AdminService>,
    catalog: web::Data<CatalogService>,
    image_store: web::Data<ImageStore>,
    views: web::Data<Views>,
    user: CurrentUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    let outcome = async {
        let submission = read_tour_submission(payload, image_store.max_bytes()).await?;
        let input = NewTour::try_from(&submission.form)?;
        with_stored_image(&image_store, submission.image.as_ref(), |image| {
            admin.create_tour(input, image)
        })
        .await
    }
    .await;

    let catalog = catalog.get_ref();
    Ok(after_submit(&views, &user, outcome, |error| {
        tour_form_page(catalog, None, Some(error))
    })
    .await)
}

pub async fn edit_tour_page(
    catalog: web::Data<CatalogService>,
    views: web::Data<Views>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let page = match parse_path_id(&path) {
        Ok(id) => match catalog.get_tour(id).await {
            Ok(tour) => tour_form_page(&catalog, Some(tour), None).await,
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };
    Ok(show(&views, &user, page))
}

pub async fn update_tour(
    admin: web::Data<AdminService>,
    catalog: web::Data<CatalogService>,
    image_store: web::Data<ImageStore>,
    views: web::Data<Views>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let tour_id = match parse_path_id(&path) {
        Ok(id) => id,
        Err(e) => return Ok(page_error(&views, &user, e)),
    };
    let admin = admin.get_ref();
    let outcome = async {
        let submission = read_tour_submission(payload, image_store.max_bytes()).await?;
        let form = submission.form;
        with_stored_image(&image_store, submission.image.as_ref(), |image| async move {
            admin.update_tour(tour_id, &form, image).await
        })
        .await
    }
    .await;

    let catalog = catalog.get_ref();
    Ok(after_submit(&views, &user, outcome, |error| async move {
        let tour = catalog.get_tour(tour_id).await?;
        tour_form_page(catalog, Some(tour), Some(error)).await
    })
    .await)
}

pub async fn delete_tour(
    admin: web::Data<AdminService>,
    views: web::Data<Views>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let outcome = match parse_path_id(&path) {
        Ok(id) => admin.delete_tour(id).await,
        Err(e) => Err(e),
    };
    Ok(after_delete(&views, &user, outcome))
}

// -----------------------------
// Homepage content
// -----------------------------

pub async fn site_content_page(
    site_content: web::Data<SiteContentService>,
    views: web::Data<Views>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    let page = site_content
        .get()
        .await
        .map(|content| SiteContentFormPage {
            content,
            error: None,
        });
    Ok(show(&views, &user, page))
}

pub async fn update_site_content(
    site_content: web::Data<SiteContentService>,
    views: web::Data<Views>,
    user: CurrentUser,
    form: web::Form<SiteContentForm>,
) -> Result<HttpResponse> {
    let outcome = site_content.update(form.into_inner()).await;
    let site_content = site_content.get_ref();
    Ok(after_submit(&views, &user, outcome, |error| async move {
        Ok(SiteContentFormPage {
            content: site_content.get().await?,
            error: Some(error),
        })
    })
    .await)
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AccessGate::role(Role::Admin))
            .route("", web::get().to(panel))
            .route("/add-city", web::get().to(add_city_page))
            .route("/add-city", web::post().to(add_city))
            .route("/edit-city/{id}", web::get().to(edit_city_page))
            .route("/update-city/{id}", web::post().to(update_city))
            .route("/delete-city/{id}", web::post().to(delete_city))
            .route("/add-hotel", web::get().to(add_hotel_page))
            .route("/add-hotel", web::post().to(add_hotel))
            .route("/edit-hotel/{id}", web::get().to(edit_hotel_page))
            .route("/update-hotel/{id}", web::post().to(update_hotel))
            .route("/delete-hotel/{id}", web::post().to(delete_hotel))
            .route("/add-client", web::get().to(add_client_page))
            .route("/add-client", web::post().to(add_client))
            .route("/edit-client/{id}", web::get().to(edit_client_page))
            .route("/update-client/{id}", web::post().to(update_client))
            .route("/delete-client/{id}", web::post().to(delete_client))
            .route("/add-tour", web::get().to(add_tour_page))
            .route("/add-tour", web::post().to(add_tour))
            .route("/edit-tour/{id}", web::get().to(edit_tour_page))
            .route("/edit-tour/{id}", web::post().to(update_tour))
            .route("/update-tour/{id}", web::post().to(update_tour))
            .route("/delete-tour/{id}", web::post().to(delete_tour))
            .route("/site-content", web::get().to(site_content_page))
            .route("/site-content", web::post().to(update_site_content)),
    );
}

#[cfg(test)]
mod tests {
    use super::MAX_TEXT_FIELD_BYTES;
    use super::super::test_support::*;
    use crate::services::catalog_service::tests::{seed_city, seed_hotel, seed_tour};
    use actix_web::http::StatusCode;
    use actix_web::http::header::CONTENT_TYPE;
    use actix_web::test;

    const BOUNDARY: &str = "----tourformboundary";

    /// Hand-built multipart body: text fields plus an optional image part.
    fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, bytes)) = image {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_request(uri: &str, body: Vec<u8>) -> test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .insert_header((
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(body)
    }

    #[actix_web::test]
    async fn test_admin_routes_are_gated_by_role() {
        let app = init_app(seeded_pool().await).await;

        // the role gate never redirects, even when nobody is signed in
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/admin").to_request()).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/register")
            .set_form([("username", "bob"), ("password", "pw")])
            .to_request();
        let client_cookie = session_cookie(&test::call_service(&app, req).await).unwrap();
        let req = test::TestRequest::get()
            .uri("/admin")
            .cookie(client_cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(test::read_body(resp).await, "Access denied");

        let admin_cookie = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
        let req = test::TestRequest::get()
            .uri("/admin")
            .cookie(admin_cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["view"], "admin");
    }

    #[actix_web::test]
    async fn test_add_city_validation_rerenders_form() {
        let app = init_app(seeded_pool().await).await;
        let cookie = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

        let req = test::TestRequest::post()
            .uri("/admin/add-city")
            .cookie(cookie.clone())
            .set_form([("name", "Lima"), ("country", "")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = json_body(resp).await;
        assert_eq!(body["view"], "city-form");
        assert_eq!(body["error"], "City name and country are required");

        let req = test::TestRequest::post()
            .uri("/admin/add-city")
            .cookie(cookie.clone())
            .set_form([("name", "Lima"), ("country", "Peru")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp).as_deref(), Some("/admin"));

        let req = test::TestRequest::get().uri("/admin").cookie(cookie).to_request();
        let body = json_body(test::call_service(&app, req).await).await;
        assert_eq!(body["cities"][0]["name"], "Lima");
    }

    #[actix_web::test]
    async fn test_add_tour_with_image_then_search_finds_it() {
        let pool = seeded_pool().await;
        let city = seed_city(&pool, "Lima").await;
        let hotel = seed_hotel(&pool, "Lima Suites", city.id).await;
        let app = init_app(pool).await;
        let cookie = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

        let city_id = city.id.to_string();
        let hotel_id = hotel.id.to_string();
        let body = multipart_body(
            &[
                ("name", "Lima Trip"),
                ("price", "1000"),
                ("duration", "4"),
                ("cityId", &city_id),
                ("hotelId", &hotel_id),
                ("flight", "on"),
            ],
            Some(("lima.png", &b"not-really-a-png"[..])),
        );
        let req = multipart_request("/admin/add-tour", body)
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp).as_deref(), Some("/admin"));

        let req = test::TestRequest::post()
            .uri("/search")
            .set_form([("cityId", city_id.as_str())])
            .to_request();
        let body = json_body(test::call_service(&app, req).await).await;
        assert_eq!(body["result_count"], 1);
        assert_eq!(body["tours"][0]["name"], "Lima Trip");
        assert_eq!(body["tours"][0]["price"], "1000.00");
        assert_eq!(body["tours"][0]["hotel"]["name"], "Lima Suites");
        let image = body["tours"][0]["image"].as_str().unwrap();
        assert!(image.starts_with("/uploads/"));

        let resp = test::call_service(&app, test::TestRequest::get().uri(image).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "image/png");
        assert_eq!(test::read_body(resp).await, &b"not-really-a-png"[..]);
    }

    #[actix_web::test]
    async fn test_add_tour_with_unknown_city_rerenders_form() {
        let pool = seeded_pool().await;
        let city = seed_city(&pool, "Lima").await;
        let hotel = seed_hotel(&pool, "Lima Suites", city.id).await;
        let app = init_app(pool).await;
        let cookie = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

        let hotel_id = hotel.id.to_string();
        let body = multipart_body(
            &[
                ("name", "Nowhere"),
                ("price", "10"),
                ("duration", "2"),
                ("cityId", "9999"),
                ("hotelId", &hotel_id),
            ],
            None,
        );
        let req = multipart_request("/admin/add-tour", body)
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = json_body(resp).await;
        assert_eq!(body["view"], "tour-form");
        assert_eq!(body["error"], "Selected city does not exist");
        assert_eq!(body["cities"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::get().uri("/catalog").to_request();
        let body = json_body(test::call_service(&app, req).await).await;
        assert!(body["tours"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_update_tour_keeps_untouched_fields() {
        let pool = seeded_pool().await;
        let city = seed_city(&pool, "Lima").await;
        let hotel = seed_hotel(&pool, "Lima Suites", city.id).await;
        let tour = seed_tour(&pool, "Lima Trip", 100_000, 4, city.id, hotel.id).await;
        let app = init_app(pool).await;
        let cookie = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

        let body = multipart_body(&[("price", "1200"), ("name", "")], None);
        let req = multipart_request(&format!("/admin/update-tour/{}", tour.id), body)
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);

        let req = test::TestRequest::get()
            .uri(&format!("/tour/{}", tour.id))
            .to_request();
        let body = json_body(test::call_service(&app, req).await).await;
        assert_eq!(body["tour"]["name"], "Lima Trip");
        assert_eq!(body["tour"]["price"], "1200.00");
        assert_eq!(body["tour"]["duration"], 4);
    }

    #[actix_web::test]
    async fn test_unknown_tour_form_fields_are_skipped() {
        let pool = seeded_pool().await;
        let city = seed_city(&pool, "Lima").await;
        let hotel = seed_hotel(&pool, "Lima Suites", city.id).await;
        let tour = seed_tour(&pool, "Lima Trip", 100_000, 4, city.id, hotel.id).await;
        let app = init_app(pool).await;
        let cookie = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

        let padding = "x".repeat(MAX_TEXT_FIELD_BYTES + 1);
        let mut fields = vec![("duration", "6"), ("junk", padding.as_str())];
        let extra: Vec<String> = (0..200).map(|i| format!("extra{i}")).collect();
        fields.extend(extra.iter().map(|name| (name.as_str(), "1")));
        let body = multipart_body(&fields, None);
        let req = multipart_request(&format!("/admin/update-tour/{}", tour.id), body)
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);

        let req = test::TestRequest::get()
            .uri(&format!("/tour/{}", tour.id))
            .to_request();
        let body = json_body(test::call_service(&app, req).await).await;
        assert_eq!(body["tour"]["duration"], 6);
        assert_eq!(body["tour"]["name"], "Lima Trip");
    }

    #[actix_web::test]
    async fn test_delete_absent_row_still_redirects() {
        let app = init_app(seeded_pool().await).await;
        let cookie = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

        for uri in ["/admin/delete-tour/999", "/admin/delete-city/999"] {
            let req = test::TestRequest::post()
                .uri(uri)
                .cookie(cookie.clone())
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::FOUND, "{uri}");
            assert_eq!(location(&resp).as_deref(), Some("/admin"));
        }
    }

    #[actix_web::test]
    async fn test_site_content_update_keeps_blank_fields() {
        let app = init_app(seeded_pool().await).await;
        let cookie = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

        let req = test::TestRequest::post()
            .uri("/admin/site-content")
            .cookie(cookie)
            .set_form([("slogan", "Go further"), ("description", "")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let body = json_body(resp).await;
        assert_eq!(body["content"]["slogan"], "Go further");
        assert!(!body["content"]["description"].as_str().unwrap().is_empty());
    }
}
