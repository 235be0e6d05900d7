use crate::entities::{
    city_entity as cities, client_entity as clients, hotel_entity as hotels, tour_entity as tours,
};
use crate::utils::{Bound, format_cents, parse_bound_cents};
use sea_orm::{ColumnTrait, Condition};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct CityResponse {
    pub id: i64,
    pub name: String,
    pub country: String,
}

impl From<cities::Model> for CityResponse {
    fn from(city: cities::Model) -> Self {
        Self {
            id: city.id,
            name: city.name,
            country: city.country,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct HotelResponse {
    pub id: i64,
    pub name: String,
    pub stars: i32,
    pub address: Option<String>,
    pub city_id: Option<i64>,
}

impl From<hotels::Model> for HotelResponse {
    fn from(hotel: hotels::Model) -> Self {
        Self {
            id: hotel.id,
            name: hotel.name,
            stars: hotel.stars,
            address: hotel.address,
            city_id: hotel.city_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ClientResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<clients::Model> for ClientResponse {
    fn from(client: clients::Model) -> Self {
        Self {
            id: client.id,
            name: client.name,
            email: client.email,
            phone: client.phone,
        }
    }
}

/// Tour with its city and hotel (and booked-for client) always attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct TourResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub price: String,
    pub duration: i32,
    pub image: Option<String>,
    pub tour_type: Option<String>,
    pub meal_type: Option<String>,
    pub flight_included: Option<bool>,
    pub visa_required: Option<bool>,
    pub rating: Option<i32>,
    pub city: CityResponse,
    pub hotel: HotelResponse,
    pub client: Option<ClientResponse>,
}

impl TourResponse {
    pub fn from_parts(
        tour: tours::Model,
        city: CityResponse,
        hotel: HotelResponse,
        client: Option<ClientResponse>,
    ) -> Self {
        Self {
            id: tour.id,
            name: tour.name,
            description: tour.description,
            price_cents: tour.price_cents,
            price: format_cents(tour.price_cents),
            duration: tour.duration,
            image: tour.image,
            tour_type: tour.tour_type,
            meal_type: tour.meal_type,
            flight_included: tour.flight_included,
            visa_required: tour.visa_required,
            rating: tour.rating,
            city,
            hotel,
            client,
        }
    }
}

/// Raw `POST /search` body; every field optional and unparsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchForm {
    pub city_id: Option<String>,
    pub hotel_id: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub duration: Option<String>,
    pub meal: Option<String>,
    #[serde(rename = "type")]
    pub tour_type: Option<String>,
}

/// Typed catalog filter. Present fields combine with AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TourFilter {
    pub city_id: Option<i64>,
    pub hotel_id: Option<i64>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
    pub duration: Option<i32>,
    pub meal_type: Option<String>,
    pub tour_type: Option<String>,
}

fn parse_field<T: std::str::FromStr>(name: &str, raw: Option<&String>) -> Option<T> {
    let raw = raw.map(|v| v.trim()).filter(|v| !v.is_empty())?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            log::debug!("Ignoring non-numeric search field {name}={raw:?}");
            None
        }
    }
}

impl TourFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-numeric or blank inputs are dropped, never fatal.
    pub fn from_form(form: &SearchForm) -> Self {
        let price = |name: &str, raw: Option<&String>, bound: Bound| {
            let raw = raw.map(|v| v.trim()).filter(|v| !v.is_empty())?;
            let cents = parse_bound_cents(raw, bound);
            if cents.is_none() {
                log::debug!("Ignoring non-numeric search field {name}={raw:?}");
            }
            cents
        };
        let text = |raw: Option<&String>| {
            raw.map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            city_id: parse_field("cityId", form.city_id.as_ref()),
            hotel_id: parse_field("hotelId", form.hotel_id.as_ref()),
            min_price_cents: price("minPrice", form.min_price.as_ref(), Bound::Lower),
            max_price_cents: price("maxPrice", form.max_price.as_ref(), Bound::Upper),
            duration: parse_field("duration", form.duration.as_ref()),
            meal_type: text(form.meal.as_ref()),
            tour_type: text(form.tour_type.as_ref()),
        }
    }

    pub fn city(mut self, city_id: i64) -> Self {
        self.city_id = Some(city_id);
        self
    }

    pub fn hotel(mut self, hotel_id: i64) -> Self {
        self.hotel_id = Some(hotel_id);
        self
    }

    pub fn min_price(mut self, cents: i64) -> Self {
        self.min_price_cents = Some(cents);
        self
    }

    pub fn max_price(mut self, cents: i64) -> Self {
        self.max_price_cents = Some(cents);
        self
    }

    pub fn duration(mut self, days: i32) -> Self {
        self.duration = Some(days);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Turns the present fields into query predicates.
    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(city_id) = self.city_id {
            cond = cond.add(tours::Column::CityId.eq(city_id));
        }
        if let Some(hotel_id) = self.hotel_id {
            cond = cond.add(tours::Column::HotelId.eq(hotel_id));
        }
        if let Some(min) = self.min_price_cents {
            cond = cond.add(tours::Column::PriceCents.gte(min));
        }
        if let Some(max) = self.max_price_cents {
            cond = cond.add(tours::Column::PriceCents.lte(max));
        }
        if let Some(duration) = self.duration {
            cond = cond.add(tours::Column::Duration.eq(duration));
        }
        if let Some(meal) = &self.meal_type {
            cond = cond.add(tours::Column::MealType.eq(meal.clone()));
        }
        if let Some(kind) = &self.tour_type {
            cond = cond.add(tours::Column::TourType.eq(kind.clone()));
        }
        cond
    }
}
