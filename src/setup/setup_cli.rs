use clap::{Parser, Subcommand};
use multimedia_backend::config::Config;
use multimedia_backend::models::db_operations::users_db_operations;
use multimedia_backend::setup::db_setup;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "setup_cli", author, version, about = "A CLI for initial multimedia database setup.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the .env configuration file.
    #[arg(long, required = true, value_name = "FILE")]
    env_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand, Debug)]
enum DbAction {
    Setup,
}

#[derive(Subcommand, Debug)]
enum UserAction {
    /// Registers a dashboard user that can author multimedia posts.
    Create {
        #[arg(long)]
        username: String,
    },
    List,
}

fn main() {
    let cli = Cli::parse();

    let config = Config::from_env(&cli.env_file)
        .expect("FATAL: Failed to load or parse configuration.");

    match &cli.command {
        Commands::Db { action: DbAction::Setup } => setup_multimedia_database(&config),
        Commands::User { action } => match action {
            UserAction::Create { username } => create_dashboard_user(&config, username),
            UserAction::List => list_dashboard_users(&config),
        },
    }
}

fn open_existing_database(config: &Config) -> Option<Connection> {
    let db_path = config.multimedia_db_path();
    if !db_path.exists() {
        eprintln!(
            "❌ Error: Multimedia database not found at '{}'. Please run `setup_cli db setup` first.",
            db_path.display()
        );
        return None;
    }
    match Connection::open(&db_path) {
        Ok(conn) => Some(conn),
        Err(e) => {
            eprintln!("❌ Error opening multimedia database: {}", e);
            None
        }
    }
}

fn setup_multimedia_database(config: &Config) {
    let db_path = config.multimedia_db_path();
    if db_path.exists() {
        println!("ℹ️ Multimedia database already exists at '{}'. Skipping creation.", db_path.display());
        return;
    }
    println!("\nSetting up multimedia database at '{}'...", db_path.display());

    if let Some(parent_dir) = db_path.parent() {
        if let Err(e) = fs::create_dir_all(parent_dir) {
            eprintln!("❌ Error: Could not create database directory: {}", e);
            return;
        }
    }

    let mut conn = match Connection::open(&db_path) {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("❌ Error: Could not create multimedia database file: {}", e);
            return;
        }
    };
    match db_setup::setup_multimedia_db(&mut conn) {
        Ok(_) => println!("✅ Multimedia database setup completed successfully."),
        Err(e) => eprintln!("❌ Error setting up multimedia database: {}", e),
    }
}

fn create_dashboard_user(config: &Config, username: &str) {
    let Some(conn) = open_existing_database(config) else { return };

    match users_db_operations::create_dashboard_user(&conn, username) {
        Ok(id) => println!("✅ Dashboard user '{}' created with id {}.", username, id),
        Err(e) => eprintln!("❌ Error creating dashboard user: {}. The username might already be taken.", e),
    }
}

fn list_dashboard_users(config: &Config) {
    let Some(conn) = open_existing_database(config) else { return };

    match users_db_operations::read_all_dashboard_users(&conn) {
        Ok(users) => {
            println!("Listing Dashboard Users:");
            for user in users {
                println!("- [{}] {}", user.id, user.username);
            }
        }
        Err(e) => eprintln!("❌ Error fetching dashboard users: {}", e),
    }
}
