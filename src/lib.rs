pub mod api;
pub mod app;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod external;
pub mod geolocation;
pub mod places;
pub mod render;
