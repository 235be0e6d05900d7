use super::Page;
use crate::models::{
    CartView, CityResponse, ClientResponse, HotelResponse, SiteContentResponse, TourFilter,
    TourResponse, UserResponse,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub tours: Vec<TourResponse>,
    pub content: SiteContentResponse,
}

impl Page for HomePage {
    const VIEW: &'static str = "index";

    fn title(&self) -> String {
        "Home - Travel Agency".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogPage {
    pub tours: Vec<TourResponse>,
    pub cities: Vec<CityResponse>,
    pub hotels: Vec<HotelResponse>,
}

impl Page for CatalogPage {
    const VIEW: &'static str = "catalog";

    fn title(&self) -> String {
        "Tour catalog".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct SearchPage {
    pub cities: Vec<CityResponse>,
    pub hotels: Vec<HotelResponse>,
    pub tours: Vec<TourResponse>,
    pub filter: TourFilter,
    pub result_count: usize,
}

impl Page for SearchPage {
    const VIEW: &'static str = "search";

    fn title(&self) -> String {
        "Find a tour".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct TourPage {
    pub tour: TourResponse,
}

impl Page for TourPage {
    const VIEW: &'static str = "tour";

    fn title(&self) -> String {
        self.tour.name.clone()
    }
}

#[derive(Debug, Default, Serialize)]
pub struct LoginPage {
    pub error: Option<String>,
    pub username: Option<String>,
}

impl Page for LoginPage {
    const VIEW: &'static str = "login";

    fn title(&self) -> String {
        "Sign in".to_string()
    }
}

#[derive(Debug, Default, Serialize)]
pub struct RegisterPage {
    pub error: Option<String>,
    pub username: Option<String>,
}

impl Page for RegisterPage {
    const VIEW: &'static str = "register";

    fn title(&self) -> String {
        "Registration".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct ProfilePage {
    pub profile: UserResponse,
    pub cart: CartView,
    pub error: Option<String>,
}

impl Page for ProfilePage {
    const VIEW: &'static str = "profile";

    fn title(&self) -> String {
        "My profile".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct CartPage {
    #[serde(flatten)]
    pub cart: CartView,
}

impl Page for CartPage {
    const VIEW: &'static str = "cart";

    fn title(&self) -> String {
        "Cart".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct AdminPanelPage {
    pub tours: Vec<TourResponse>,
    pub cities: Vec<CityResponse>,
    pub hotels: Vec<HotelResponse>,
    pub clients: Vec<ClientResponse>,
}

impl Page for AdminPanelPage {
    const VIEW: &'static str = "admin";

    fn title(&self) -> String {
        "Admin panel".to_string()
    }
}

#[derive(Debug, Default, Serialize)]
pub struct CityFormPage {
    pub city: Option<CityResponse>,
    pub error: Option<String>,
}

impl Page for CityFormPage {
    const VIEW: &'static str = "city-form";

    fn title(&self) -> String {
        match self.city {
            Some(_) => "Edit city".to_string(),
            None => "Add city".to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct HotelFormPage {
    pub hotel: Option<HotelResponse>,
    pub cities: Vec<CityResponse>,
    pub error: Option<String>,
}

impl Page for HotelFormPage {
    const VIEW: &'static str = "hotel-form";

    fn title(&self) -> String {
        match self.hotel {
            Some(_) => "Edit hotel".to_string(),
            None => "Add hotel".to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct ClientFormPage {
    pub client: Option<ClientResponse>,
    pub error: Option<String>,
}

impl Page for ClientFormPage {
    const VIEW: &'static str = "client-form";

    fn title(&self) -> String {
        match self.client {
            Some(_) => "Edit client".to_string(),
            None => "Add client".to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct TourFormPage {
    pub tour: Option<TourResponse>,
    pub cities: Vec<CityResponse>,
    pub hotels: Vec<HotelResponse>,
    pub clients: Vec<ClientResponse>,
    pub error: Option<String>,
}

impl Page for TourFormPage {
    const VIEW: &'static str = "tour-form";

    fn title(&self) -> String {
        match self.tour {
            Some(_) => "Edit tour".to_string(),
            None => "Add tour".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SiteContentFormPage {
    pub content: SiteContentResponse,
    pub error: Option<String>,
}

impl Page for SiteContentFormPage {
    const VIEW: &'static str = "site-content-form";

    fn title(&self) -> String {
        "Homepage content".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct NotFoundPage {
    pub message: String,
}

impl Default for NotFoundPage {
    fn default() -> Self {
        Self {
            message: "Page not found".to_string(),
        }
    }
}

impl Page for NotFoundPage {
    const VIEW: &'static str = "404";

    fn title(&self) -> String {
        "Page not found".to_string()
    }
}

/// Generic failure page; never carries internal error detail.
#[derive(Debug, Serialize)]
pub struct ErrorPage {
    pub message: String,
}

impl Page for ErrorPage {
    const VIEW: &'static str = "error";

    fn title(&self) -> String {
        "Error".to_string()
    }
}
