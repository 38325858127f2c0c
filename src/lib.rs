// src/lib.rs

//! León speed camera bulletin scraper library

pub mod error;
pub mod locale;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
