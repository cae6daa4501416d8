use clap::{Args, Subcommand};

use super::prayer::OutputFormat;
use prayertrack::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if config.file_found {
                            println!("Config file: {}", config.config_path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                config.config_path.display()
                            );
                        }
                        println!();

                        println!("server_url: {}", config.server_url.value);
                        println!("  source: {}", config.server_url.source);
                        println!();

                        match &config.session_token {
                            Some(token) => println!("logged in: yes ({})", token.source),
                            None => println!("logged in: no"),
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
