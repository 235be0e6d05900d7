use crate::error::{AppError, AppResult};
use crate::utils::{non_blank, parse_price, validate_email, validate_phone};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CityForm {
    pub name: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelForm {
    pub name: Option<String>,
    pub stars: Option<String>,
    pub address: Option<String>,
    pub city_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Tour fields as submitted by the multipart add/edit forms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub duration: Option<String>,
    pub city_id: Option<String>,
    pub hotel_id: Option<String>,
    pub client_id: Option<String>,
    #[serde(rename = "type")]
    pub tour_type: Option<String>,
    pub meal: Option<String>,
    pub flight: Option<String>,
    pub visa: Option<String>,
    pub rating: Option<String>,
    pub current_image: Option<String>,
}

impl TourForm {
    /// Multipart text field names the tour form reads.
    pub const FIELDS: [&'static str; 13] = [
        "name",
        "description",
        "price",
        "duration",
        "cityId",
        "hotelId",
        "clientId",
        "type",
        "meal",
        "flight",
        "visa",
        "rating",
        "currentImage",
    ];

    pub fn accepts(name: &str) -> bool {
        Self::FIELDS.contains(&name)
    }

    pub fn from_fields(mut fields: HashMap<String, String>) -> Self {
        let mut take = |key: &str| fields.remove(key);
        Self {
            name: take("name"),
            description: take("description"),
            price: take("price"),
            duration: take("duration"),
            city_id: take("cityId"),
            hotel_id: take("hotelId"),
            client_id: take("clientId"),
            tour_type: take("type"),
            meal: take("meal"),
            flight: take("flight"),
            visa: take("visa"),
            rating: take("rating"),
            current_image: take("currentImage"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContentForm {
    pub slogan: Option<String>,
    pub description: Option<String>,
    pub advantage1_title: Option<String>,
    pub advantage1_text: Option<String>,
    pub advantage2_title: Option<String>,
    pub advantage2_text: Option<String>,
    pub advantage3_title: Option<String>,
    pub advantage3_text: Option<String>,
    pub advantage4_title: Option<String>,
    pub advantage4_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCity {
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewHotel {
    pub name: String,
    pub stars: i32,
    pub address: Option<String>,
    pub city_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTour {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub duration: i32,
    pub city_id: i64,
    pub hotel_id: i64,
    pub client_id: Option<i64>,
    pub tour_type: Option<String>,
    pub meal_type: Option<String>,
    pub flight_included: Option<bool>,
    pub visa_required: Option<bool>,
    pub rating: Option<i32>,
}

pub fn parse_id(field: &str, raw: &str) -> AppResult<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::ValidationError(format!("{field} must be a valid id")))
}

pub fn parse_stars(raw: &str) -> AppResult<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|s| (1..=5).contains(s))
        .ok_or_else(|| {
            AppError::ValidationError("Hotel stars must be an integer from 1 to 5".to_string())
        })
}

pub fn parse_duration(raw: &str) -> AppResult<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|d| *d > 0)
        .ok_or_else(|| {
            AppError::ValidationError("Duration must be a positive number of days".to_string())
        })
}

pub fn parse_rating(raw: &str) -> AppResult<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|r| (0..=10).contains(r))
        .ok_or_else(|| AppError::ValidationError("Rating must be from 0 to 10".to_string()))
}

/// Checkbox / select values: on|true|yes|1 and off|false|no|0.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

impl TryFrom<CityForm> for NewCity {
    type Error = AppError;

    fn try_from(form: CityForm) -> AppResult<Self> {
        match (non_blank(form.name.as_deref()), non_blank(form.country.as_deref())) {
            (Some(name), Some(country)) => Ok(Self { name, country }),
            _ => Err(AppError::ValidationError(
                "City name and country are required".to_string(),
            )),
        }
    }
}

impl TryFrom<HotelForm> for NewHotel {
    type Error = AppError;

    fn try_from(form: HotelForm) -> AppResult<Self> {
        let (Some(name), Some(stars)) = (
            non_blank(form.name.as_deref()),
            non_blank(form.stars.as_deref()),
        ) else {
            return Err(AppError::ValidationError(
                "Hotel name and stars are required".to_string(),
            ));
        };
        let city_id = non_blank(form.city_id.as_deref())
            .map(|raw| parse_id("City", &raw))
            .transpose()?;
        Ok(Self {
            name,
            stars: parse_stars(&stars)?,
            address: non_blank(form.address.as_deref()),
            city_id,
        })
    }
}

impl TryFrom<ClientForm> for NewClient {
    type Error = AppError;

    fn try_from(form: ClientForm) -> AppResult<Self> {
        let (Some(name), Some(email)) = (
            non_blank(form.name.as_deref()),
            non_blank(form.email.as_deref()),
        ) else {
            return Err(AppError::ValidationError(
                "Client name and email are required".to_string(),
            ));
        };
        validate_email(&email)?;
        let phone = non_blank(form.phone.as_deref());
        if let Some(phone) = &phone {
            validate_phone(phone)?;
        }
        Ok(Self { name, email, phone })
    }
}

impl TryFrom<&TourForm> for NewTour {
    type Error = AppError;

    fn try_from(form: &TourForm) -> AppResult<Self> {
        let required = (
            non_blank(form.name.as_deref()),
            non_blank(form.price.as_deref()),
            non_blank(form.duration.as_deref()),
            non_blank(form.city_id.as_deref()),
            non_blank(form.hotel_id.as_deref()),
        );
        let (Some(name), Some(price), Some(duration), Some(city_id), Some(hotel_id)) = required
        else {
            return Err(AppError::ValidationError(
                "All required fields must be filled in".to_string(),
            ));
        };

        Ok(Self {
            name,
            description: non_blank(form.description.as_deref()),
            price_cents: parse_price(&price)?,
            duration: parse_duration(&duration)?,
            city_id: parse_id("City", &city_id)?,
            hotel_id: parse_id("Hotel", &hotel_id)?,
            client_id: non_blank(form.client_id.as_deref())
                .map(|raw| parse_id("Client", &raw))
                .transpose()?,
            tour_type: non_blank(form.tour_type.as_deref()),
            meal_type: non_blank(form.meal.as_deref()),
            flight_included: form.flight.as_deref().and_then(parse_flag),
            visa_required: form.visa.as_deref().and_then(parse_flag),
            rating: non_blank(form.rating.as_deref())
                .map(|raw| parse_rating(&raw))
                .transpose()?,
        })
    }
}
