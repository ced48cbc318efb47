//! Storefront command-line client
//!
//! Talks to the storefront backend through the authenticated API client:
//! 1. Loads configuration and the persisted session token
//! 2. Runs one command against the backend
//! 3. Prints the result as JSON on stdout; logs go to stderr

mod config;
mod navigator;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use api_client::ApiClient;
use clap::{Parser, Subcommand};
use common::Secret;
use serde::{Deserialize, Serialize};
use session_store::FileSessionStore;
use storefront::{Cart, ShippingAddress, Storefront};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::navigator::TerminalNavigator;

#[derive(Debug, Parser)]
#[command(name = "storefront", version, about = "Storefront backend client")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List catalog items
    Items,
    /// List purchases
    Purchases,
    /// List shipments
    Shipments,
    /// List companies, optionally filtered by name
    Companies {
        #[arg(long)]
        search: Option<String>,
    },
    /// GET any path relative to the API base URL
    Get { path: String },
    /// Manage the stored access token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Place an order described by a JSON file
    Checkout { order: PathBuf },
}

#[derive(Debug, Subcommand)]
enum TokenAction {
    Show,
    Set { token: String },
    Clear,
}

/// Order file accepted by `checkout`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderFile {
    customer_id: i64,
    address: ShippingAddress,
    items: Vec<OrderLine>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderLine {
    item_id: i64,
    quantity: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    // JSON logs on stderr with LOG_LEVEL / RUST_LOG support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    let (config, config_path) =
        Config::discover(cli.config.as_deref()).context("failed to load configuration")?;
    match &config_path {
        Some(path) => debug!(path = %path.display(), "configuration loaded"),
        None => debug!("no config file, using defaults"),
    }

    let store = FileSessionStore::load(config.session.token_file.clone())
        .await
        .with_context(|| {
            format!(
                "failed to open session file {}",
                config.session.token_file.display()
            )
        })?;

    let mut builder = ApiClient::builder()
        .base_url(&config.api.base_url)
        .refresh_url(&config.api.refresh_url)
        .login_route(&config.api.login_route)
        .with_credentials(config.api.with_credentials)
        .store(Arc::new(store))
        .navigator(Arc::new(TerminalNavigator::stderr()));
    if let Some(timeout) = config.api.timeout() {
        builder = builder.timeout(timeout);
    }
    let client = builder.build().context("failed to build API client")?;

    info!(base_url = %client.base_url(), "storefront client ready");

    run(cli.command, Storefront::new(client)).await
}

async fn run(command: Command, shop: Storefront) -> Result<()> {
    match command {
        Command::Items => print_json(&shop.list_items().await.context("listing items")?),
        Command::Purchases => print_json(
            &shop
                .list_purchases()
                .await
                .context("listing purchases")?,
        ),
        Command::Shipments => print_json(
            &shop
                .list_shipments()
                .await
                .context("listing shipments")?,
        ),
        Command::Companies { search: None } => print_json(
            &shop
                .list_companies()
                .await
                .context("listing companies")?,
        ),
        Command::Companies { search: Some(name) } => print_json(
            &shop
                .search_companies(&name)
                .await
                .with_context(|| format!("searching companies for {name:?}"))?,
        ),
        Command::Get { path } => print_json(
            &shop
                .client()
                .get(&path)
                .await
                .with_context(|| format!("GET {path}"))?,
        ),
        Command::Token { action } => token(action, shop.client()).await,
        Command::Checkout { order } => checkout(&shop, &order).await,
    }
}

async fn token(action: TokenAction, client: &ApiClient) -> Result<()> {
    match action {
        TokenAction::Show => match client.access_token().await {
            Some(token) => println!("{}", token.expose()),
            None => eprintln!("no access token stored"),
        },
        TokenAction::Set { token } => {
            if token.trim().is_empty() {
                bail!("token must not be empty");
            }
            client
                .store_login_token(Secret::new(token))
                .await
                .context("failed to store access token")?;
            info!("access token stored");
        }
        TokenAction::Clear => {
            let removed = client.logout().await.context("failed to clear access token")?;
            info!(removed, "access token cleared");
        }
    }
    Ok(())
}

async fn checkout(shop: &Storefront, order_path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(order_path)
        .with_context(|| format!("failed to read order file {}", order_path.display()))?;
    let order: OrderFile = serde_json::from_str(&raw)
        .with_context(|| format!("invalid order file {}", order_path.display()))?;

    let catalog = shop.list_items().await.context("loading catalog")?;
    let mut cart = Cart::new();
    for line in &order.items {
        let item = catalog
            .iter()
            .find(|item| item.id == line.item_id)
            .with_context(|| format!("item {} is not in the catalog", line.item_id))?;
        let added = cart.add(item, line.quantity);
        if added < line.quantity {
            info!(
                item_id = item.id,
                requested = line.quantity,
                added,
                "quantity capped at available stock"
            );
        }
    }

    let receipt = shop
        .checkout(&cart, &order.address, order.customer_id)
        .await
        .context("checkout failed")?;
    print_json(&receipt)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}
