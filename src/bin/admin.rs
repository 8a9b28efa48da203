//! CLI administration tool for the BookIT API.
//!
//! Provides commands for bootstrapping administrators, managing accounts,
//! purging revoked tokens and running database operations without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create the first administrator (or promote an existing account)
//! cargo run --bin admin -- user create-admin
//!
//! # List accounts
//! cargo run --bin admin -- user list
//!
//! # Promote or deactivate an account
//! cargo run --bin admin -- user promote jane@example.com
//! cargo run --bin admin -- user deactivate jane@example.com
//!
//! # Remove expired blacklist entries
//! cargo run --bin admin -- tokens cleanup
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Database tools
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`, or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`

use bookit_api::application::services::auth_service::normalize_email;
use bookit_api::config::{Config, mask_connection_string};
use bookit_api::domain::entities::{NewUser, PageRequest, Role, User, UserFilter, UserPatch};
use bookit_api::domain::repositories::{TokenBlacklistRepository, UserRepository};
use bookit_api::infrastructure::persistence::{PgTokenBlacklistRepository, PgUserRepository};
use bookit_api::infrastructure::security::hash_password;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

const MIN_PASSWORD_LEN: usize = 8;
const LIST_LIMIT: i64 = 100;

/// CLI tool for managing the BookIT API.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage the token blacklist
    Tokens {
        #[command(subcommand)]
        action: TokensAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Account management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Create an administrator, or promote the account if the email exists
    CreateAdmin {
        #[arg(short, long)]
        email: Option<String>,

        #[arg(short, long)]
        name: Option<String>,

        /// Password (prompted when omitted; empty input generates one)
        #[arg(short, long)]
        password: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List accounts
    List,

    /// Give an account the admin role
    Promote { email: String },

    /// Deactivate an account
    Deactivate { email: String },
}

/// Blacklist subcommands.
#[derive(Subcommand)]
enum TokensAction {
    /// Delete blacklist entries whose tokens have expired
    Cleanup,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Tokens { action } => handle_tokens_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches account management commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgUserRepository::new(Arc::new(pool.clone())));

    match action {
        UserAction::CreateAdmin {
            email,
            name,
            password,
            yes,
        } => create_admin(repo, email, name, password, yes).await?,
        UserAction::List => list_users(repo).await?,
        UserAction::Promote { email } => promote_user(repo, email).await?,
        UserAction::Deactivate { email } => deactivate_user(repo, email).await?,
    }

    Ok(())
}

async fn find_user(repo: &PgUserRepository, email: &str) -> Result<User> {
    repo.find_by_email(&normalize_email(email))
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("No account with email {email}"))
}

/// Creates an administrator with interactive prompts.
///
/// # Flow
///
/// 1. Prompt for email and name (or use provided)
/// 2. If the email belongs to an account, offer to promote and reactivate it
/// 3. Otherwise prompt for a password, generating one on empty input
/// 4. Confirm creation (unless `--yes` flag)
/// 5. Store the Argon2 hash, never the password
async fn create_admin(
    repo: Arc<PgUserRepository>,
    email: Option<String>,
    name: Option<String>,
    password: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create Administrator".bright_blue().bold());
    println!();

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let email = normalize_email(&email);

    let existing = repo
        .find_by_email(&email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    if let Some(user) = existing {
        println!(
            "  Account {} already exists (role: {}, active: {})",
            user.email.cyan(),
            user.role,
            user.is_active
        );

        if !skip_confirm {
            let confirmed = Confirm::new()
                .with_prompt("Promote it to admin and reactivate it?")
                .default(true)
                .interact()?;

            if !confirmed {
                println!("{}", "❌ Cancelled".red());
                return Ok(());
            }
        }

        repo.update(
            user.id,
            UserPatch {
                role: Some(Role::Admin),
                is_active: Some(true),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| anyhow::anyhow!("Failed to promote account: {}", e))?;

        println!("{}", "✅ Account promoted to admin".green().bold());
        return Ok(());
    }

    let name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Name")
            .with_initial_text("Administrator")
            .interact_text()?,
    };

    let (password, generated) = match password {
        Some(p) => (p, false),
        None => {
            let entered = Password::new()
                .with_prompt("Password (empty to generate)")
                .allow_empty_password(true)
                .interact()?;
            if entered.is_empty() {
                (generate_password(), true)
            } else {
                (entered, false)
            }
        }
    };

    if password.chars().count() < MIN_PASSWORD_LEN {
        anyhow::bail!("Password must be at least {MIN_PASSWORD_LEN} characters");
    }

    println!();
    println!("{}", "Account details:".bright_white().bold());
    println!("  Email: {}", email.cyan());
    println!("  Name:  {}", name.cyan());
    println!("  Role:  {}", "admin".bright_yellow());
    if generated {
        println!("  Password: {}", password.bright_yellow().bold());
        println!();
        println!(
            "{}",
            "⚠️  IMPORTANT: Save this password now! It is not stored anywhere."
                .red()
                .bold()
        );
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this administrator?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    let user = repo
        .create(NewUser {
            email,
            name,
            password_hash,
            role: Role::Admin,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create account: {}", e))?;

    println!("{}", "✅ Administrator created!".green().bold());
    println!("  ID: {}", user.id.to_string().bright_black());
    println!();
    println!("{}", "Log in with:".bright_white());
    println!(
        "  curl -X POST http://localhost:3000/api/auth/login -H 'Content-Type: application/json' \\\n    -d '{{\"email\": \"{}\", \"password\": \"...\"}}'",
        user.email
    );
    println!();

    Ok(())
}

/// Lists accounts, newest first.
///
/// # Output Format
///
/// ```text
/// 📋 Accounts
///
///   Email                          Name                 Role    Status
///   ─────────────────────────────────────────────────────────────────────
///   jane@example.com               Jane Doe             admin   ACTIVE
/// ```
async fn list_users(repo: Arc<PgUserRepository>) -> Result<()> {
    println!("{}", "📋 Accounts".bright_blue().bold());
    println!();

    let page = repo
        .list(UserFilter::default(), PageRequest::new(0, LIST_LIMIT))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list accounts: {}", e))?;

    if page.items.is_empty() {
        println!("{}", "  No accounts found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create-admin",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<30} {:<20} {:<7} {:<10}",
        "Email".bright_white().bold(),
        "Name".bright_white().bold(),
        "Role".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(72).bright_black());

    for user in &page.items {
        let status = if user.is_active {
            "ACTIVE".green()
        } else {
            "INACTIVE".red()
        };
        let role = match user.role {
            Role::Admin => user.role.as_str().bright_yellow(),
            Role::User => user.role.as_str().normal(),
        };

        println!(
            "  {:<30} {:<20} {:<7} {}",
            user.email.cyan(),
            user.name,
            role,
            status
        );
    }

    println!();
    println!(
        "  Showing {} of {}",
        page.items.len().to_string().bright_white().bold(),
        page.total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn promote_user(repo: Arc<PgUserRepository>, email: String) -> Result<()> {
    let user = find_user(&repo, &email).await?;

    if user.is_admin() {
        println!("{}", "⚠️  This account is already an admin".yellow());
        return Ok(());
    }

    repo.update(
        user.id,
        UserPatch {
            role: Some(Role::Admin),
            ..Default::default()
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!("Failed to promote account: {}", e))?;

    println!("{} {}", "✅ Promoted".green().bold(), user.email.cyan());
    Ok(())
}

/// Deactivates an account after confirmation (default: No).
async fn deactivate_user(repo: Arc<PgUserRepository>, email: String) -> Result<()> {
    let user = find_user(&repo, &email).await?;

    if !user.is_active {
        println!("{}", "⚠️  This account is already inactive".yellow());
        return Ok(());
    }

    println!("  Account: {} ({})", user.email.cyan(), user.role);
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Deactivate this account?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.update(
        user.id,
        UserPatch {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!("Failed to deactivate account: {}", e))?;

    println!("{}", "✅ Account deactivated".green().bold());
    Ok(())
}

async fn handle_tokens_action(action: TokensAction, pool: &PgPool) -> Result<()> {
    let repo = PgTokenBlacklistRepository::new(Arc::new(pool.clone()));

    match action {
        TokensAction::Cleanup => {
            println!("{}", "🧹 Purging expired blacklist entries...".bright_blue());

            let removed = repo
                .delete_expired()
                .await
                .map_err(|e| anyhow::anyhow!("Cleanup failed: {}", e))?;

            println!(
                "{} {}",
                "✅ Removed".green().bold(),
                removed.to_string().bright_white().bold()
            );
        }
    }

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Active and total accounts
/// - Active services
/// - Bookings per status
/// - Reviews and the blacklist size
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let (users, active_users): (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), COUNT(*) FILTER (WHERE is_active) FROM users")
            .fetch_one(pool)
            .await?;

    let (services, active_services): (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), COUNT(*) FILTER (WHERE is_active) FROM services")
            .fetch_one(pool)
            .await?;

    let bookings: Vec<(String, i64)> = sqlx::query_as(
        "SELECT status, COUNT(*) FROM bookings GROUP BY status ORDER BY status",
    )
    .fetch_all(pool)
    .await?;

    let reviews: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
        .fetch_one(pool)
        .await?;

    let blacklisted: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM token_blacklist")
        .fetch_one(pool)
        .await?;

    println!(
        "  Users:       {} ({} active)",
        users.to_string().bright_green().bold(),
        active_users
    );
    println!(
        "  Services:    {} ({} active)",
        services.to_string().bright_green().bold(),
        active_services
    );
    println!("  Bookings:");
    if bookings.is_empty() {
        println!("    {}", "none".bright_black());
    }
    for (status, count) in &bookings {
        println!(
            "    {:<11} {}",
            status,
            count.to_string().bright_green().bold()
        );
    }
    println!(
        "  Reviews:     {}",
        reviews.to_string().bright_green().bold()
    );
    println!(
        "  Blacklisted: {}",
        blacklisted.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
        DbAction::Migrate => {
            println!("{}", "🚚 Applying migrations...".bright_blue());

            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Migration failed")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}

/// Generates a random password.
///
/// # Format
///
/// - Length: 20 characters
/// - Character set: A-Z, a-z, 0-9
fn generate_password() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const PASSWORD_LEN: usize = 20;

    let mut rng = rand::rng();

    (0..PASSWORD_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
