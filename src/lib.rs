pub mod astro;
pub mod config;
pub mod content;
pub mod error;
pub mod gui;
pub mod math;
pub mod model;
pub mod scene;

pub use error::Error;
