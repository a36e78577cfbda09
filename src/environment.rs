use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    /// Base name of the configuration file for this environment, without extension.
    #[must_use]
    pub fn config_file_name(&self) -> String {
        format!("config/{self}")
    }
}
