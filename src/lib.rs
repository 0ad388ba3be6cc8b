pub mod api;
pub mod config;
pub mod db;
pub mod distance;
pub mod geocode;
pub mod link;
pub mod models;
pub mod resolver;
