pub mod check_config;
pub mod console;
pub mod version;
