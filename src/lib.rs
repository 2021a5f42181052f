pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod fallback;
pub mod gesture;
pub mod models;
pub mod pagination;
pub mod store;
pub mod submission;
pub mod sync;
pub mod transport;
pub mod utils;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::App;

    utils::panic_hook::init();
    leptos::mount_to_body(App);
}
