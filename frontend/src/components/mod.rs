pub mod api_config_provider;
pub mod api_url_settings;
