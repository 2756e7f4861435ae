pub mod collector;
pub mod config;
pub mod generator;
pub mod layout;
pub mod panel;
pub mod power;
pub mod ray;
pub mod reflection;
pub mod simulation;
pub mod sun;
pub mod sweep;
