pub mod analysis;
pub mod config;
pub mod error;
pub mod loader;
pub mod render;
pub mod run;
pub mod simulate;
// cmd and reports belong to the binary (main.rs).
