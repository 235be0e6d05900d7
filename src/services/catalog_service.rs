use crate::entities::{
    city_entity as cities, client_entity as clients, hotel_entity as hotels, tour_entity as tours,
};
use crate::error::{AppError, AppResult};
use crate::models::{CityResponse, ClientResponse, HotelResponse, TourFilter, TourResponse};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use std::collections::HashMap;

/// Tours shown on the landing page.
pub const HOME_PAGE_TOURS: u64 = 6;

#[derive(Clone)]
pub struct CatalogService {
    pool: DatabaseConnection,
}

impl CatalogService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 按插入顺序列出旅游产品，city/hotel 始终关联加载
    pub async fn list_tours(
        &self,
        limit: Option<u64>,
        filter: Option<&TourFilter>,
    ) -> AppResult<Vec<TourResponse>> {
        let mut query = tours::Entity::find().order_by_asc(tours::Column::Id);
        if let Some(filter) = filter {
            query = query.filter(filter.condition());
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let models = query.all(&self.pool).await?;
        load_tour_details(&self.pool, models).await
    }

    pub async fn get_tour(&self, tour_id: i64) -> AppResult<TourResponse> {
        let tour = tours::Entity::find_by_id(tour_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Tour not found".to_string()))?;

        load_tour_details(&self.pool, vec![tour])
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound("Tour not found".to_string()))
    }

    /// Empty filter returns the whole catalog.
    pub async fn search_tours(&self, filter: &TourFilter) -> AppResult<Vec<TourResponse>> {
        let filter = (!filter.is_empty()).then_some(filter);
        self.list_tours(None, filter).await
    }

    pub async fn list_cities(&self) -> AppResult<Vec<CityResponse>> {
        let list = cities::Entity::find()
            .order_by_asc(cities::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn list_hotels(&self) -> AppResult<Vec<HotelResponse>> {
        let list = hotels::Entity::find()
            .order_by_asc(hotels::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn list_clients(&self) -> AppResult<Vec<ClientResponse>> {
        let list = clients::Entity::find()
            .order_by_asc(clients::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn get_city(&self, city_id: i64) -> AppResult<CityResponse> {
        cities::Entity::find_by_id(city_id)
            .one(&self.pool)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("City not found".to_string()))
    }

    pub async fn get_hotel(&self, hotel_id: i64) -> AppResult<HotelResponse> {
        hotels::Entity::find_by_id(hotel_id)
            .one(&self.pool)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Hotel not found".to_string()))
    }

    pub async fn get_client(&self, client_id: i64) -> AppResult<ClientResponse> {
        clients::Entity::find_by_id(client_id)
            .one(&self.pool)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Client not found".to_string()))
    }
}

/// Attaches city, hotel and client to each tour with one query per table.
/// Order of `models` is preserved.
pub async fn load_tour_details<C: ConnectionTrait>(
    conn: &C,
    models: Vec<tours::Model>,
) -> AppResult<Vec<TourResponse>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let mut city_ids: Vec<i64> = models.iter().map(|t| t.city_id).collect();
    let mut hotel_ids: Vec<i64> = models.iter().map(|t| t.hotel_id).collect();
    let mut client_ids: Vec<i64> = models.iter().filter_map(|t| t.client_id).collect();
    for ids in [&mut city_ids, &mut hotel_ids, &mut client_ids] {
        ids.sort_unstable();
        ids.dedup();
    }

    let city_map: HashMap<i64, CityResponse> = cities::Entity::find()
        .filter(cities::Column::Id.is_in(city_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|c| (c.id, CityResponse::from(c)))
        .collect();

    let hotel_map: HashMap<i64, HotelResponse> = hotels::Entity::find()
        .filter(hotels::Column::Id.is_in(hotel_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|h| (h.id, HotelResponse::from(h)))
        .collect();

    let client_map: HashMap<i64, ClientResponse> = if client_ids.is_empty() {
        HashMap::new()
    } else {
        clients::Entity::find()
            .filter(clients::Column::Id.is_in(client_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|c| (c.id, ClientResponse::from(c)))
            .collect()
    };

    let mut out = Vec::with_capacity(models.len());
    for tour in models {
        let (Some(city), Some(hotel)) = (
            city_map.get(&tour.city_id).cloned(),
            hotel_map.get(&tour.hotel_id).cloned(),
        ) else {
            // 外键级联删除下不应出现
            log::warn!(
                "Skipping tour {} with unresolved city {} or hotel {}",
                tour.id,
                tour.city_id,
                tour.hotel_id
            );
            continue;
        };
        let client = tour.client_id.and_then(|id| client_map.get(&id).cloned());
        out.push(TourResponse::from_parts(tour, city, hotel, client));
    }
    Ok(out)
}
