use super::{page_error, parse_path_id, render_page};
use crate::error::AppResult;
use crate::middlewares::CurrentUser;
use crate::models::{SearchForm, TourFilter};
use crate::services::{CatalogService, HOME_PAGE_TOURS, SiteContentService};
use crate::views::{CatalogPage, HomePage, SearchPage, TourPage, Views};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Result, web};

pub async fn home(
    catalog: web::Data<CatalogService>,
    site_content: web::Data<SiteContentService>,
    views: web::Data<Views>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    let page = async {
        AppResult::Ok(HomePage {
            tours: catalog.list_tours(Some(HOME_PAGE_TOURS), None).await?,
            content: site_content.get().await?,
        })
    };
    match page.await {
        Ok(page) => Ok(render_page(&views, &user, StatusCode::OK, &page)),
        Err(e) => Ok(page_error(&views, &user, e)),
    }
}

pub async fn catalog(
    catalog: web::Data<CatalogService>,
    views: web::Data<Views>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    let page = async {
        AppResult::Ok(CatalogPage {
            tours: catalog.list_tours(None, None).await?,
            cities: catalog.list_cities().await?,
            hotels: catalog.list_hotels().await?,
        })
    };
    match page.await {
        Ok(page) => Ok(render_page(&views, &user, StatusCode::OK, &page)),
        Err(e) => Ok(page_error(&views, &user, e)),
    }
}

async fn search_page(catalog: &CatalogService, filter: TourFilter) -> AppResult<SearchPage> {
    let tours = catalog.search_tours(&filter).await?;
    Ok(SearchPage {
        cities: catalog.list_cities().await?,
        hotels: catalog.list_hotels().await?,
        result_count: tours.len(),
        tours,
        filter,
    })
}

pub async fn search_form(
    catalog: web::Data<CatalogService>,
    views: web::Data<Views>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    match search_page(&catalog, TourFilter::new()).await {
        Ok(page) => Ok(render_page(&views, &user, StatusCode::OK, &page)),
        Err(e) => Ok(page_error(&views, &user, e)),
    }
}

pub async fn search(
    catalog: web::Data<CatalogService>,
    views: web::Data<Views>,
    user: CurrentUser,
    form: web::Form<SearchForm>,
) -> Result<HttpResponse> {
    let filter = TourFilter::from_form(&form);
    log::debug!("Searching tours with {:?}", filter);
    match search_page(&catalog, filter).await {
        Ok(page) => Ok(render_page(&views, &user, StatusCode::OK, &page)),
        Err(e) => Ok(page_error(&views, &user, e)),
    }
}

pub async fn tour_detail(
    catalog: web::Data<CatalogService>,
    views: web::Data<Views>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let tour = match parse_path_id(&path) {
        Ok(id) => catalog.get_tour(id).await,
        Err(e) => Err(e),
    };
    match tour {
        Ok(tour) => Ok(render_page(&views, &user, StatusCode::OK, &TourPage { tour })),
        Err(e) => Ok(page_error(&views, &user, e)),
    }
}

pub fn tour_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/catalog", web::get().to(catalog))
        .route("/search", web::get().to(search_form))
        .route("/search", web::post().to(search))
        .route("/tour/{id}", web::get().to(tour_detail));
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::services::catalog_service::tests::{seed_city, seed_hotel, seed_tour};
    use actix_web::http::StatusCode;
    use actix_web::test;

    #[actix_web::test]
    async fn test_home_lists_at_most_six_tours_with_content() {
        let pool = seeded_pool().await;
        let city = seed_city(&pool, "Lima").await;
        let hotel = seed_hotel(&pool, "Lima Suites", city.id).await;
        for i in 0..7 {
            seed_tour(&pool, &format!("Tour {i}"), 100_000, 3, city.id, hotel.id).await;
        }
        let app = init_app(pool).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["view"], "index");
        assert_eq!(body["tours"].as_array().unwrap().len(), 6);
        assert_eq!(body["tours"][0]["city"]["name"], "Lima");
        assert_eq!(body["content"]["advantages"].as_array().unwrap().len(), 4);
        assert!(body["user"].is_null());
    }

    #[actix_web::test]
    async fn test_search_by_min_price() {
        let pool = seeded_pool().await;
        let city = seed_city(&pool, "Lima").await;
        let hotel = seed_hotel(&pool, "Lima Suites", city.id).await;
        seed_tour(&pool, "Budget", 150_000, 3, city.id, hotel.id).await;
        seed_tour(&pool, "Premium", 250_000, 3, city.id, hotel.id).await;
        let app = init_app(pool).await;

        let req = test::TestRequest::post()
            .uri("/search")
            .set_form([("minPrice", "2000"), ("cityId", ""), ("duration", "abc")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["view"], "search");
        assert_eq!(body["result_count"], 1);
        assert_eq!(body["tours"][0]["name"], "Premium");
        assert_eq!(body["tours"][0]["price"], "2500.00");
    }

    #[actix_web::test]
    async fn test_search_price_bounds_accept_any_decimal() {
        let pool = seeded_pool().await;
        let city = seed_city(&pool, "Lima").await;
        let hotel = seed_hotel(&pool, "Lima Suites", city.id).await;
        seed_tour(&pool, "Budget", 150_000, 3, city.id, hotel.id).await;
        seed_tour(&pool, "Premium", 250_000, 3, city.id, hotel.id).await;
        seed_tour(&pool, "Edge", 200_100, 3, city.id, hotel.id).await;
        let app = init_app(pool).await;

        let search = |pairs: [(&'static str, &'static str); 1]| {
            test::TestRequest::post().uri("/search").set_form(pairs).to_request()
        };

        let body = json_body(test::call_service(&app, search([("maxPrice", "-1")])).await).await;
        assert_eq!(body["result_count"], 0);

        // 2000.999 rounds up to 2001.00
        let body =
            json_body(test::call_service(&app, search([("minPrice", "2000.999")])).await).await;
        assert_eq!(body["result_count"], 2);

        let body = json_body(test::call_service(&app, search([("maxPrice", "1.5e3")])).await).await;
        assert_eq!(body["result_count"], 1);
        assert_eq!(body["tours"][0]["name"], "Budget");
    }

    #[actix_web::test]
    async fn test_missing_tour_renders_not_found_view() {
        let app = init_app(seeded_pool().await).await;

        for uri in ["/tour/999", "/tour/not-a-number", "/no/such/page"] {
            let resp =
                test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
            let body = json_body(resp).await;
            assert_eq!(body["view"], "404");
        }
    }
}
