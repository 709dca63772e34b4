//! Configuration module

mod site;

pub use site::Config;
pub use site::ConfigMode;
pub use site::Settings;
