pub mod advisory;
pub mod api;
pub mod climate;
pub mod config;
pub mod controller;
pub mod domain;
pub mod engine;
pub mod fallback;
pub mod telemetry;
