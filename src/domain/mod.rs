pub mod error;
pub mod locale;
pub mod page;
pub mod sitemap;
