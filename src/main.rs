//! Workspace Console Frontend Entry Point

mod app;
mod commands;
mod components;
mod config;
mod context;
mod error;
mod home;
mod logging;
mod models;
mod persist;
mod resolver;
mod route;
mod session;
mod store;
mod sync;

use app::App;
use config::ConsoleConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    logging::init();

    let config = ConsoleConfig::load();
    log::debug!("console config: {:?}", config);
    mount_to_body(move || view! { <App config=config.clone() /> });
}
