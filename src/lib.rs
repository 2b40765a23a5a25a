pub mod config;
pub mod error;
pub mod gui;
pub mod logging;
pub mod mesh;
pub mod model;
