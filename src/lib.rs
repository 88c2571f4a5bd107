pub mod social_client;
pub mod store;
pub mod token_store;
pub mod ui;
pub mod ui_framework;
pub mod user_config;
