//! Account commands: register, login, logout, and session status.

use clap::{Args, Subcommand};
use std::io::{self, Write};

use prayertrack::client::{ClientError, HttpApi};
use prayertrack::config::Config;
use prayertrack::models::Credentials;

#[derive(Args)]
pub struct AccountCommand {
    #[command(subcommand)]
    command: AccountSubcommand,
}

#[derive(Subcommand)]
enum AccountSubcommand {
    /// Create an account and log in
    Register {
        /// Username
        username: String,
    },
    /// Log in to the server
    Login {
        /// Username
        username: String,
    },
    /// Log out and forget the session
    Logout,
    /// Show who is logged in
    Whoami,
}

impl AccountCommand {
    pub async fn run(&self, config: &mut Config) -> Result<(), Box<dyn std::error::Error>> {
        let api = HttpApi::new(config.server_url.value.clone(), config.token());

        match &self.command {
            AccountSubcommand::Register { username } => {
                let credentials = Credentials {
                    username: username.clone(),
                    password: prompt_password()?,
                };
                let session = api.register(&credentials).await?;
                config.save_token(Some(&session.token))?;
                println!("Registered and logged in as {}", session.user.username);
            }
            AccountSubcommand::Login { username } => {
                let credentials = Credentials {
                    username: username.clone(),
                    password: prompt_password()?,
                };
                let session = match api.login(&credentials).await {
                    Err(ClientError::Unauthenticated) => {
                        return Err("Invalid username or password".into())
                    }
                    other => other?,
                };
                config.save_token(Some(&session.token))?;
                println!("Logged in as {}", session.user.username);
            }
            AccountSubcommand::Logout => {
                match api.logout().await {
                    // Already gone server-side; still forget it locally
                    Ok(()) | Err(ClientError::Unauthenticated) => {}
                    Err(ClientError::NotLoggedIn) => {
                        println!("Not logged in");
                        return Ok(());
                    }
                    Err(e) => return Err(e.into()),
                }
                config.save_token(None)?;
                println!("Logged out");
            }
            AccountSubcommand::Whoami => {
                let user = api.current_user().await?;
                println!("{} (server: {})", user.username, api.base_url());
            }
        }

        Ok(())
    }
}

fn prompt_password() -> io::Result<String> {
    print!("Password: ");
    io::stdout().flush()?;

    let mut password = String::new();
    io::stdin().read_line(&mut password)?;
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}
