//! Prayer Tracker Admin CLI
//!
//! Administration tool for managing accounts directly in the server database.
//!
//! # Usage
//!
//! ```bash
//! prayertrack-admin user add alice --password s3cret
//! prayertrack-admin user list
//! prayertrack-admin user remove alice
//! ```
//!
//! # Environment Variables
//!
//! - `PRAYERTRACK_DATABASE_PATH`: Server database (default: ~/.local/share/prayertrack-server/prayertrack.db)

use clap::{Args, Parser, Subcommand};

use prayertrack::db::{init_db, PrayerRepository, UserRepository};
use prayertrack::server::password::hash_password;
use prayertrack::server::ServerConfig;

// ============================================================================
// CLI Structure
// ============================================================================

#[derive(Parser)]
#[command(name = "prayertrack-admin")]
#[command(version)]
#[command(about = "Prayer Tracker server administration tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User(UserCommand),
}

#[derive(Args)]
struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Subcommand)]
enum UserSubcommand {
    /// Add a new user
    Add {
        /// Username
        username: String,
        /// Initial password
        #[arg(long, short)]
        password: String,
    },
    /// List all users
    List,
    /// Remove a user and all of their prayer entries
    Remove {
        /// Username
        username: String,
    },
}

// ============================================================================
// Commands
// ============================================================================

async fn add_user(
    users: &UserRepository,
    username: String,
    password: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err("Username and password must not be empty".into());
    }

    if users.get_by_username(username).await?.is_some() {
        return Err(format!("User '{}' already exists", username).into());
    }

    let user = users.create(username, &hash_password(&password)).await?;
    println!("Added user: {} (id {})", user.username, user.id);

    Ok(())
}

async fn list_users(
    users: &UserRepository,
    prayers: &PrayerRepository,
) -> Result<(), Box<dyn std::error::Error>> {
    let all = users.list().await?;

    if all.is_empty() {
        println!("No users registered.");
        return Ok(());
    }

    println!("{:<8} {:<30} {:>8} {:>8}", "ID", "USERNAME", "PRAYERS", "ANSWERED");
    println!("{}", "-".repeat(57));

    for user in &all {
        let entries = prayers.list(user.id).await?;
        let answered = entries.iter().filter(|e| e.is_resolved).count();
        println!(
            "{:<8} {:<30} {:>8} {:>8}",
            user.id,
            user.username,
            entries.len(),
            answered
        );
    }

    println!();
    println!("Total: {} user(s)", all.len());

    Ok(())
}

async fn remove_user(
    users: &UserRepository,
    username: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let username = username.trim();
    if !users.delete(username).await? {
        return Err(format!("User '{}' not found", username).into());
    }

    println!("Removed user: {}", username);

    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = ServerConfig::from_env();
    let pool = init_db(&config.database_path).await?;
    let users = UserRepository::new(pool.clone());
    let prayers = PrayerRepository::new(pool);

    match cli.command {
        Commands::User(user_cmd) => match user_cmd.command {
            UserSubcommand::Add { username, password } => {
                add_user(&users, username, password).await
            }
            UserSubcommand::List => list_users(&users, &prayers).await,
            UserSubcommand::Remove { username } => remove_user(&users, username).await,
        },
    }
}
