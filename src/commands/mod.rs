mod account;
mod config_cmd;
mod prayer;

pub use account::AccountCommand;
pub use config_cmd::ConfigCommand;
pub use prayer::PrayerCommand;
