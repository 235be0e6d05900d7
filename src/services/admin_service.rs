use crate::entities::{
    city_entity as cities, client_entity as clients, hotel_entity as hotels, tour_entity as tours,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CityForm, CityResponse, ClientForm, ClientResponse, HotelForm, HotelResponse, NewCity,
    NewClient, NewHotel, NewTour, TourForm, TourResponse, parse_duration, parse_flag, parse_id,
    parse_rating, parse_stars,
};
use crate::services::load_tour_details;
use crate::utils::{non_blank, parse_price, validate_email, validate_phone};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};

/// Catalog mutations behind the admin role.
///
/// Creates validate required fields and that referenced rows exist.
/// Updates apply only the fields present in the form. Deletes report the
/// number of rows removed; deleting an absent row is not an error.
#[derive(Clone)]
pub struct AdminService {
    pool: DatabaseConnection,
}

impl AdminService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    // -----------------------------
    // City
    // -----------------------------

    pub async fn create_city(&self, input: NewCity) -> AppResult<CityResponse> {
        let city = cities::ActiveModel {
            name: Set(input.name),
            country: Set(input.country),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        log::info!("Created city {} ({})", city.id, city.name);
        Ok(city.into())
    }

    pub async fn update_city(&self, city_id: i64, form: CityForm) -> AppResult<CityResponse> {
        let mut model = self.find_city(city_id).await?.into_active_model();
        if let Some(name) = non_blank(form.name.as_deref()) {
            model.name = Set(name);
        }
        if let Some(country) = non_blank(form.country.as_deref()) {
            model.country = Set(country);
        }
        let city = model.update(&self.pool).await?;
        Ok(city.into())
    }

    pub async fn delete_city(&self, city_id: i64) -> AppResult<u64> {
        let res = cities::Entity::delete_by_id(city_id).exec(&self.pool).await?;
        log_delete("city", city_id, res.rows_affected);
        Ok(res.rows_affected)
    }

    // -----------------------------
    // Hotel
    // -----------------------------

    pub async fn create_hotel(&self, input: NewHotel) -> AppResult<HotelResponse> {
        if let Some(city_id) = input.city_id {
            self.require_city(city_id).await?;
        }
        let hotel = hotels::ActiveModel {
            name: Set(input.name),
            stars: Set(input.stars),
            address: Set(input.address),
            city_id: Set(input.city_id),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        log::info!("Created hotel {} ({})", hotel.id, hotel.name);
        Ok(hotel.into())
    }

    pub async fn update_hotel(&self, hotel_id: i64, form: HotelForm) -> AppResult<HotelResponse> {
        let mut model = self.find_hotel(hotel_id).await?.into_active_model();
        if let Some(name) = non_blank(form.name.as_deref()) {
            model.name = Set(name);
        }
        if let Some(stars) = non_blank(form.stars.as_deref()) {
            model.stars = Set(parse_stars(&stars)?);
        }
        if let Some(address) = non_blank(form.address.as_deref()) {
            model.address = Set(Some(address));
        }
        if let Some(raw) = non_blank(form.city_id.as_deref()) {
            let city_id = parse_id("City", &raw)?;
            self.require_city(city_id).await?;
            model.city_id = Set(Some(city_id));
        }
        let hotel = model.update(&self.pool).await?;
        Ok(hotel.into())
    }

    pub async fn delete_hotel(&self, hotel_id: i64) -> AppResult<u64> {
        let res = hotels::Entity::delete_by_id(hotel_id).exec(&self.pool).await?;
        log_delete("hotel", hotel_id, res.rows_affected);
        Ok(res.rows_affected)
    }

    // -----------------------------
    // Client
    // -----------------------------

    pub async fn create_client(&self, input: NewClient) -> AppResult<ClientResponse> {
        let client = clients::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        log::info!("Created client {} ({})", client.id, client.name);
        Ok(client.into())
    }

    pub async fn update_client(
        &self,
        client_id: i64,
        form: ClientForm,
    ) -> AppResult<ClientResponse> {
        let mut model = self.find_client(client_id).await?.into_active_model();
        if let Some(name) = non_blank(form.name.as_deref()) {
            model.name = Set(name);
        }
        if let Some(email) = non_blank(form.email.as_deref()) {
            validate_email(&email)?;
            model.email = Set(email);
        }
        if let Some(phone) = non_blank(form.phone.as_deref()) {
            validate_phone(&phone)?;
            model.phone = Set(Some(phone));
        }
        let client = model.update(&self.pool).await?;
        Ok(client.into())
    }

    pub async fn delete_client(&self, client_id: i64) -> AppResult<u64> {
        let res = clients::Entity::delete_by_id(client_id).exec(&self.pool).await?;
        log_delete("client", client_id, res.rows_affected);
        Ok(res.rows_affected)
    }

    // -----------------------------
    // Tour
    // -----------------------------

    /// `image` is the public path of an already stored upload.
    pub async fn create_tour(&self, input: NewTour, image: Option<String>) -> AppResult<TourResponse> {
        self.require_city(input.city_id).await?;
        self.require_hotel(input.hotel_id).await?;
        if let Some(client_id) = input.client_id {
            self.require_client(client_id).await?;
        }

        let tour = tours::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            price_cents: Set(input.price_cents),
            duration: Set(input.duration),
            image: Set(image),
            tour_type: Set(input.tour_type),
            meal_type: Set(input.meal_type),
            flight_included: Set(input.flight_included),
            visa_required: Set(input.visa_required),
            rating: Set(input.rating),
            city_id: Set(input.city_id),
            hotel_id: Set(input.hotel_id),
            client_id: Set(input.client_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        log::info!("Created tour {} ({})", tour.id, tour.name);

        self.tour_details(tour).await
    }

    /// Image precedence: fresh upload, then the form's `currentImage`, then
    /// whatever the row already holds.
    pub async fn update_tour(
        &self,
        tour_id: i64,
        form: &TourForm,
        uploaded_image: Option<String>,
    ) -> AppResult<TourResponse> {
        let existing = tours::Entity::find_by_id(tour_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Tour not found".to_string()))?;
        let mut model = existing.into_active_model();

        if let Some(name) = non_blank(form.name.as_deref()) {
            model.name = Set(name);
        }
        if let Some(description) = non_blank(form.description.as_deref()) {
            model.description = Set(Some(description));
        }
        if let Some(price) = non_blank(form.price.as_deref()) {
            model.price_cents = Set(parse_price(&price)?);
        }
        if let Some(duration) = non_blank(form.duration.as_deref()) {
            model.duration = Set(parse_duration(&duration)?);
        }
        if let Some(raw) = non_blank(form.city_id.as_deref()) {
            let city_id = parse_id("City", &raw)?;
            self.require_city(city_id).await?;
            model.city_id = Set(city_id);
        }
        if let Some(raw) = non_blank(form.hotel_id.as_deref()) {
            let hotel_id = parse_id("Hotel", &raw)?;
            self.require_hotel(hotel_id).await?;
            model.hotel_id = Set(hotel_id);
        }
        if let Some(raw) = non_blank(form.client_id.as_deref()) {
            let client_id = parse_id("Client", &raw)?;
            self.require_client(client_id).await?;
            model.client_id = Set(Some(client_id));
        }
        if let Some(kind) = non_blank(form.tour_type.as_deref()) {
            model.tour_type = Set(Some(kind));
        }
        if let Some(meal) = non_blank(form.meal.as_deref()) {
            model.meal_type = Set(Some(meal));
        }
        if let Some(flag) = form.flight.as_deref().and_then(parse_flag) {
            model.flight_included = Set(Some(flag));
        }
        if let Some(flag) = form.visa.as_deref().and_then(parse_flag) {
            model.visa_required = Set(Some(flag));
        }
        if let Some(rating) = non_blank(form.rating.as_deref()) {
            model.rating = Set(Some(parse_rating(&rating)?));
        }
        if let Some(image) = uploaded_image.or_else(|| non_blank(form.current_image.as_deref())) {
            model.image = Set(Some(image));
        }

        let tour = model.update(&self.pool).await?;
        self.tour_details(tour).await
    }

    pub async fn delete_tour(&self, tour_id: i64) -> AppResult<u64> {
        let res = tours::Entity::delete_by_id(tour_id).exec(&self.pool).await?;
        log_delete("tour", tour_id, res.rows_affected);
        Ok(res.rows_affected)
    }

    // -----------------------------
    // 内部辅助方法
    // -----------------------------

    async fn tour_details(&self, tour: tours::Model) -> AppResult<TourResponse> {
        load_tour_details(&self.pool, vec![tour])
            .await?
            .pop()
            .ok_or_else(|| AppError::InternalError("tour lost its city or hotel".to_string()))
    }

    async fn find_city(&self, city_id: i64) -> AppResult<cities::Model> {
        cities::Entity::find_by_id(city_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("City not found".to_string()))
    }

    async fn find_hotel(&self, hotel_id: i64) -> AppResult<hotels::Model> {
        hotels::Entity::find_by_id(hotel_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Hotel not found".to_string()))
    }

    async fn find_client(&self, client_id: i64) -> AppResult<clients::Model> {
        clients::Entity::find_by_id(client_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found".to_string()))
    }

    async fn require_city(&self, city_id: i64) -> AppResult<()> {
        match cities::Entity::find_by_id(city_id).one(&self.pool).await? {
            Some(_) => Ok(()),
            None => Err(AppError::ValidationError(
                "Selected city does not exist".to_string(),
            )),
        }
    }

    async fn require_hotel(&self, hotel_id: i64) -> AppResult<()> {
        match hotels::Entity::find_by_id(hotel_id).one(&self.pool).await? {
            Some(_) => Ok(()),
            None => Err(AppError::ValidationError(
                "Selected hotel does not exist".to_string(),
            )),
        }
    }

    async fn require_client(&self, client_id: i64) -> AppResult<()> {
        match clients::Entity::find_by_id(client_id).one(&self.pool).await? {
            Some(_) => Ok(()),
            None => Err(AppError::ValidationError(
                "Selected client does not exist".to_string(),
            )),
        }
    }
}

fn log_delete(kind: &str, id: i64, rows: u64) {
    if rows == 0 {
        log::info!("Delete of {kind} {id} matched no row");
    } else {
        log::info!("Deleted {kind} {id}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory_pool;
    use crate::services::CatalogService;
    use sea_orm::PaginatorTrait;
    use std::collections::HashMap;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    async fn lima_setup(service: &AdminService) -> (CityResponse, HotelResponse) {
        let city = service
            .create_city(NewCity::try_from(CityForm { name: s("Lima"), country: s("Peru") }).unwrap())
            .await
            .unwrap();
        let hotel = service
            .create_hotel(
                NewHotel::try_from(HotelForm {
                    name: s("Lima Suites"),
                    stars: s("4"),
                    city_id: Some(city.id.to_string()),
                    ..Default::default()
                })
                .unwrap(),
            )
            .await
            .unwrap();
        (city, hotel)
    }

    fn tour_form(city_id: i64, hotel_id: i64) -> TourForm {
        let fields: HashMap<String, String> = [
            ("name", "Lima Trip".to_string()),
            ("price", "1000".to_string()),
            ("duration", "4".to_string()),
            ("cityId", city_id.to_string()),
            ("hotelId", hotel_id.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        TourForm::from_fields(fields)
    }

    #[tokio::test]
    async fn test_lima_scenario() {
        let pool = memory_pool().await;
        let service = AdminService::new(pool.clone());
        let (city, hotel) = lima_setup(&service).await;

        let form = tour_form(city.id, hotel.id);
        let created = service
            .create_tour(NewTour::try_from(&form).unwrap(), None)
            .await
            .unwrap();

        let catalog = CatalogService::new(pool);
        let tour = catalog.get_tour(created.id).await.unwrap();
        assert_eq!(tour.city.name, "Lima");
        assert_eq!(tour.hotel.name, "Lima Suites");
        assert_eq!(tour.price_cents, 100_000);
        assert_eq!(tour.duration, 4);

        let listed = catalog.list_tours(None, None).await.unwrap();
        assert_eq!(listed.iter().filter(|t| t.name == "Lima Trip").count(), 1);
    }

    #[tokio::test]
    async fn test_create_tour_with_unknown_city_writes_nothing() {
        let pool = memory_pool().await;
        let service = AdminService::new(pool.clone());
        let (_, hotel) = lima_setup(&service).await;

        let form = tour_form(999, hotel.id);
        let err = service
            .create_tour(NewTour::try_from(&form).unwrap(), None)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Selected city does not exist");
        assert_eq!(tours::Entity::find().count(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_tour_image_precedence() {
        let pool = memory_pool().await;
        let service = AdminService::new(pool);
        let (city, hotel) = lima_setup(&service).await;
        let form = tour_form(city.id, hotel.id);
        let tour = service
            .create_tour(NewTour::try_from(&form).unwrap(), s("/uploads/original.png"))
            .await
            .unwrap();

        // nothing supplied: keep what is stored
        let untouched = service
            .update_tour(tour.id, &TourForm::default(), None)
            .await
            .unwrap();
        assert_eq!(untouched.image.as_deref(), Some("/uploads/original.png"));
        assert_eq!(untouched.name, "Lima Trip");

        let with_current = TourForm {
            current_image: s("/uploads/current.png"),
            price: s("1200.50"),
            ..Default::default()
        };
        let updated = service.update_tour(tour.id, &with_current, None).await.unwrap();
        assert_eq!(updated.image.as_deref(), Some("/uploads/current.png"));
        assert_eq!(updated.price_cents, 120_050);

        let uploaded = service
            .update_tour(tour.id, &with_current, s("/uploads/new.png"))
            .await
            .unwrap();
        assert_eq!(uploaded.image.as_deref(), Some("/uploads/new.png"));
    }

    #[tokio::test]
    async fn test_update_missing_tour_is_not_found() {
        let service = AdminService::new(memory_pool().await);
        let err = service
            .update_tour(7, &TourForm::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_applies_only_present_fields() {
        let service = AdminService::new(memory_pool().await);
        let (city, hotel) = lima_setup(&service).await;

        let renamed = service
            .update_city(city.id, CityForm { name: s("Lima Metro"), country: s(" ") })
            .await
            .unwrap();
        assert_eq!(renamed.name, "Lima Metro");
        assert_eq!(renamed.country, "Peru");

        let err = service
            .update_hotel(
                hotel.id,
                HotelForm {
                    stars: s("9"),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_user_correctable());
    }

    #[tokio::test]
    async fn test_delete_absent_rows_is_noop() {
        let service = AdminService::new(memory_pool().await);
        assert_eq!(service.delete_city(1).await.unwrap(), 0);
        assert_eq!(service.delete_hotel(1).await.unwrap(), 0);
        assert_eq!(service.delete_client(1).await.unwrap(), 0);
        assert_eq!(service.delete_tour(1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deleting_city_cascades_to_tours() {
        let pool = memory_pool().await;
        let service = AdminService::new(pool.clone());
        let (city, hotel) = lima_setup(&service).await;
        service
            .create_tour(NewTour::try_from(&tour_form(city.id, hotel.id)).unwrap(), None)
            .await
            .unwrap();

        assert_eq!(service.delete_city(city.id).await.unwrap(), 1);
        assert_eq!(tours::Entity::find().count(&pool).await.unwrap(), 0);
        // hotel survives with its city cleared
        let hotel = hotels::Entity::find_by_id(hotel.id).one(&pool).await.unwrap().unwrap();
        assert!(hotel.city_id.is_none());
    }

    #[tokio::test]
    async fn test_client_crud() {
        let service = AdminService::new(memory_pool().await);
        let client = service
            .create_client(
                NewClient::try_from(ClientForm {
                    name: s("Ivan"),
                    email: s("ivan@example.com"),
                    phone: None,
                })
                .unwrap(),
            )
            .await
            .unwrap();

        let updated = service
            .update_client(
                client.id,
                ClientForm {
                    phone: s("+51 1 555 0000"),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.email, "ivan@example.com");
        assert_eq!(updated.phone.as_deref(), Some("+51 1 555 0000"));

        assert_eq!(service.delete_client(client.id).await.unwrap(), 1);
    }
}
