//! Vehicle rides
//!
//! Servicio de checkout / check-in de vehículos compartidos: máquina de
//! estados del vehículo, ledger de posiciones y métricas de viaje.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
