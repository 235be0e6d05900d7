pub mod cart_items;
pub mod carts;
pub mod cities;
pub mod clients;
pub mod hotels;
pub mod site_contents;
pub mod tours;
pub mod users;

pub use cart_items as cart_item_entity;
pub use carts as cart_entity;
pub use cities as city_entity;
pub use clients as client_entity;
pub use hotels as hotel_entity;
pub use site_contents as site_content_entity;
pub use tours as tour_entity;
pub use users as user_entity;

pub use users::Role;
