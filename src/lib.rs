pub mod carousel;
pub mod config;
pub mod filters;
pub mod handlers_api;
pub mod handlers_health;
pub mod handlers_pages;
pub mod handlers_static;
pub mod models;
pub mod pricing;
pub mod remote_repository;
pub mod repository;
pub mod search_params;
pub mod seed;
pub mod views;
pub mod warp_helpers;
