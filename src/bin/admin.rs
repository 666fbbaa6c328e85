//! CLI administration tool for linkguard.
//!
//! Provisions users and API tokens, and shows basic statistics, without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create an admin user
//! cargo run --bin admin -- user create --name "Ops" --email ops@example.com --admin
//!
//! # Issue a token for user 1
//! cargo run --bin admin -- token create --user 1 --name "CI"
//!
//! # Revoke it without prompting
//! cargo run --bin admin -- token revoke CI -y
//!
//! # View statistics
//! cargo run --bin admin -- stats
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `TOKEN_SIGNING_SECRET` (required for `token create`): must match the server

use linkguard::application::services::auth_service::hash_token;
use linkguard::domain::entities::{NewUser, Role};
use linkguard::domain::repositories::{TokenRepository, UserRepository};
use linkguard::infrastructure::persistence::{PgTokenRepository, PgUserRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linkguard.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a user
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },

    /// List all users
    List,
}

#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token for a user
    Create {
        /// Owner's user ID
        #[arg(short, long)]
        user: i64,

        /// Token name (e.g., "CI", "Mobile App")
        #[arg(short, long)]
        name: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Numeric ID or exact name
        name_or_id: String,

        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::Create { name, email, admin } => {
            let role = if admin { Role::Admin } else { Role::User };
            let user = repo
                .create(NewUser { name, email, role })
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

            println!("{}", "✅ User created".green().bold());
            println!("  ID:    {}", user.id.to_string().bright_white().bold());
            println!("  Name:  {}", user.name.cyan());
            println!("  Email: {}", user.email);
            println!("  Role:  {}", user.role);
        }
        UserAction::List => {
            let users = repo
                .list()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

            if users.is_empty() {
                println!("{}", "  No users found".yellow());
                return Ok(());
            }

            println!(
                "  {:<5} {:<24} {:<32} {:<6}",
                "ID".bright_white().bold(),
                "Name".bright_white().bold(),
                "Email".bright_white().bold(),
                "Role".bright_white().bold()
            );
            println!("  {}", "─".repeat(70).bright_black());

            for user in &users {
                let role = match user.role {
                    Role::Admin => "admin".magenta(),
                    Role::User => "user".normal(),
                };
                println!(
                    "  {:<5} {:<24} {:<32} {}",
                    user.id.to_string().bright_black(),
                    user.name.cyan(),
                    user.email,
                    role
                );
            }
            println!();
        }
    }

    Ok(())
}

async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let tokens = PgTokenRepository::new(pool.clone());

    match action {
        TokenAction::Create { user, name, yes } => {
            let users = PgUserRepository::new(pool);
            create_token(&tokens, &users, user, name, yes).await?;
        }
        TokenAction::List => list_tokens(&tokens).await?,
        TokenAction::Revoke { name_or_id, yes } => revoke_token(&tokens, &name_or_id, yes).await?,
    }

    Ok(())
}

/// Creates a new API token with interactive prompts.
///
/// Only the HMAC-SHA256 hash (keyed by `TOKEN_SIGNING_SECRET`) is stored;
/// the raw token is displayed once and cannot be retrieved later.
async fn create_token(
    tokens: &PgTokenRepository,
    users: &PgUserRepository,
    user_id: i64,
    name: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let secret =
        std::env::var("TOKEN_SIGNING_SECRET").context("TOKEN_SIGNING_SECRET must be set")?;

    let user = users
        .find_by_id(user_id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("User {user_id} not found"))?;

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("Production API")
            .interact_text()?,
    };

    let token_value = generate_token();

    println!("{}", "Token details:".bright_white().bold());
    println!("  Owner: {} <{}>", user.name.cyan(), user.email);
    println!("  Name:  {}", token_name.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let token_hash = hash_token(&secret, &token_value);

    tokens
        .create_token(user.id, &token_name, &token_hash)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!("{}", "✅ Token created successfully!".green().bold());
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/links",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

async fn list_tokens(repo: &PgTokenRepository) -> Result<()> {
    println!("{}", "📋 API Tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<6} {:<28} {:<18} {:<18} {:<8}",
        "ID".bright_white().bold(),
        "User".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(88).bright_black());

    for token in &tokens {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };
        let last_used = token
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<5} {:<6} {:<28} {:<18} {:<18} {}",
            token.id.to_string().bright_black(),
            token.user_id,
            token.name.cyan(),
            token.created_at.format("%Y-%m-%d %H:%M").to_string(),
            last_used.bright_black(),
            status
        );
    }

    println!();
    println!(
        "  Total: {}",
        tokens.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Revokes a token by ID (numeric input) or exact name.
async fn revoke_token(
    repo: &PgTokenRepository,
    name_or_id: &str,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔒 Revoke API Token".bright_blue().bold());
    println!();

    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await,
        Err(_) => repo.find_by_name(name_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    .context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "⚠️  This token is already revoked".yellow());
        return Ok(());
    }

    println!(
        "  {} (#{}, user {})",
        token.name.cyan(),
        token.id,
        token.user_id
    );
    println!();

    if !skip_confirm
        && !Confirm::new()
            .with_prompt("Revoke this token?")
            .default(false)
            .interact()?
    {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!("{}", "✅ Token revoked successfully!".green().bold());
    println!();

    Ok(())
}

#[derive(sqlx::FromRow)]
struct Totals {
    links: i64,
    anonymous_links: i64,
    clicks: i64,
    users: i64,
    active_tokens: i64,
}

async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let totals: Totals = sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM links) AS links,
            (SELECT COUNT(*) FROM links WHERE user_id IS NULL) AS anonymous_links,
            (SELECT COUNT(*) FROM click_logs) AS clicks,
            (SELECT COUNT(*) FROM users) AS users,
            (SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL) AS active_tokens
        "#,
    )
    .fetch_one(pool)
    .await
    .context("Failed to load totals")?;

    let rows = [
        ("Links", totals.links),
        ("  anonymous", totals.anonymous_links),
        ("Clicks", totals.clicks),
        ("Users", totals.users),
        ("Active tokens", totals.active_tokens),
    ];
    for (label, value) in rows {
        println!("  {:<15} {}", label, value.to_string().bright_green().bold());
    }
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}

/// `lg_` followed by 24 random bytes in hex.
fn generate_token() -> String {
    use rand::Rng;

    let bytes: [u8; 24] = rand::rng().random();
    format!("lg_{}", hex::encode(bytes))
}
