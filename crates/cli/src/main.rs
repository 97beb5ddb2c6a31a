//! Tastebud CLI - a terminal storefront.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! tastebud restaurants list
//! tastebud restaurants search "thai & noodles"
//! tastebud menu 1
//!
//! # Sign in (the session is stored and reused by later commands)
//! tastebud auth sign-in -e ann@example.com -p hunter22
//! tastebud auth whoami
//!
//! # Price a cart without placing an order
//! tastebud cart quote -r 1 3 3 5
//!
//! # Orders
//! tastebud orders mine
//! tastebud orders set-status 42 on-the-way
//! ```
//!
//! # Commands
//!
//! - `restaurants` - List, fetch, search and filter restaurants
//! - `menu` - Show a restaurant's menu
//! - `auth` - Sign in, sign up, sign out, show the current user
//! - `orders` - Customer and restaurant order views, status updates
//! - `menu-items` - Create, update and delete dishes (restaurant owners)
//! - `cart` - Build a cart and show the checkout summary

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tastebud_core::{MenuItemId, OrderId, OrderStatus, Price, RestaurantId, UserRole};
use tastebud_storefront::config::StorefrontConfig;
use tastebud_storefront::error::{Result, report_error};
use tastebud_storefront::state::AppState;

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "tastebud")]
#[command(author, version, about = "Tastebud storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse restaurants
    Restaurants {
        #[command(subcommand)]
        action: RestaurantAction,
    },
    /// Show a restaurant's menu
    Menu {
        /// Restaurant ID
        restaurant_id: RestaurantId,
    },
    /// Sign in, sign up, sign out
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// View and update orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Manage menu items (restaurant owners)
    MenuItems {
        #[command(subcommand)]
        action: MenuItemAction,
    },
    /// Build a cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum RestaurantAction {
    /// List all restaurants
    List,
    /// Show one restaurant
    Get { id: RestaurantId },
    /// Search by name or description
    Search { term: String },
    /// Filter by cuisine
    Cuisine { name: String },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Sign in and store the session
    SignIn {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Register a new account
    SignUp {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Full name
        #[arg(short, long)]
        name: String,

        /// Account role (`customer`, `restaurant_owner`)
        #[arg(short, long, default_value = "customer")]
        role: UserRole,
    },
    /// Forget the stored session
    SignOut,
    /// Show the signed-in user
    Whoami,
}

#[derive(Subcommand)]
enum OrderAction {
    /// Orders placed by the signed-in customer
    Mine,
    /// Orders received by the signed-in owner's restaurant
    Restaurant,
    /// Update an order's status
    SetStatus {
        id: OrderId,
        /// One of: pending, confirmed, preparing, on-the-way, delivered, cancelled
        status: OrderStatus,
    },
}

#[derive(Subcommand)]
enum MenuItemAction {
    /// Add a dish
    Create(commands::menu_items::MenuItemArgs),
    /// Replace a dish's details
    Update {
        id: MenuItemId,
        #[command(flatten)]
        item: commands::menu_items::MenuItemArgs,
    },
    /// Remove a dish
    Delete { id: MenuItemId },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add dishes from one restaurant and show the checkout summary
    Quote {
        /// Restaurant whose menu the dishes come from
        #[arg(short, long)]
        restaurant: RestaurantId,

        /// Menu item IDs; repeat an ID to add it again
        #[arg(required = true)]
        items: Vec<MenuItemId>,
    },
}

/// Start Sentry when `SENTRY_DSN` is set. Keep the guard until exit so
/// queued events from a failed command are flushed.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    Some(sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            ..Default::default()
        },
    )))
}

/// Warnings and errors become Sentry events; info and debug lines (cart
/// actions, sign-in steps) become breadcrumbs on the next event.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => output::fatal(&format!("Failed to load configuration: {e}")),
    };

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays pipeable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tastebud_storefront=info,tastebud_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli, config).await {
        if !e.is_reported() {
            report_error("command", &e);
        }
        // exit() skips destructors; flush Sentry first.
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<()> {
    let state = AppState::bootstrap(config).await?;

    match cli.command {
        Commands::Restaurants { action } => match action {
            RestaurantAction::List => commands::restaurants::list(&state).await?,
            RestaurantAction::Get { id } => commands::restaurants::get(&state, &id).await?,
            RestaurantAction::Search { term } => {
                commands::restaurants::search(&state, &term).await?;
            }
            RestaurantAction::Cuisine { name } => {
                commands::restaurants::cuisine(&state, &name).await?;
            }
        },
        Commands::Menu { restaurant_id } => {
            commands::restaurants::menu(&state, &restaurant_id).await?;
        }
        Commands::Auth { action } => match action {
            AuthAction::SignIn { email, password } => {
                commands::auth::sign_in(&state, &email, password).await?;
            }
            AuthAction::SignUp {
                email,
                password,
                name,
                role,
            } => commands::auth::sign_up(&state, &email, password, &name, role).await?,
            AuthAction::SignOut => commands::auth::sign_out(&state).await,
            AuthAction::Whoami => commands::auth::whoami(&state),
        },
        Commands::Orders { action } => match action {
            OrderAction::Mine => commands::orders::mine(&state).await?,
            OrderAction::Restaurant => commands::orders::restaurant(&state).await?,
            OrderAction::SetStatus { id, status } => {
                commands::orders::set_status(&state, &id, status).await?;
            }
        },
        Commands::MenuItems { action } => match action {
            MenuItemAction::Create(item) => commands::menu_items::create(&state, item).await?,
            MenuItemAction::Update { id, item } => {
                commands::menu_items::update(&state, &id, item).await?;
            }
            MenuItemAction::Delete { id } => commands::menu_items::delete(&state, &id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Quote { restaurant, items } => {
                commands::cart::quote(&state, &restaurant, &items).await?;
            }
        },
    }
    Ok(())
}

/// Parse a non-negative decimal amount such as `12.99`.
fn parse_price(raw: &str) -> std::result::Result<Price, String> {
    let amount: rust_decimal::Decimal = raw.trim().parse().map_err(|e| format!("{e}"))?;
    Price::new(amount).map_err(|e| e.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("12.99").unwrap(), Price::from_cents(1299));
        assert!(parse_price("-1").is_err());
        assert!(parse_price("abc").is_err());
    }

    #[test]
    fn test_sign_up_role_parsed() {
        let cli = Cli::try_parse_from([
            "tastebud", "auth", "sign-up", "-e", "a@b.com", "-p", "pw", "-n", "Ann", "-r",
            "restaurant_owner",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Auth {
                action: AuthAction::SignUp {
                    role: UserRole::RestaurantOwner,
                    ..
                }
            }
        ));
    }

    #[test]
    fn test_set_status_parsed() {
        let cli =
            Cli::try_parse_from(["tastebud", "orders", "set-status", "42", "on-the-way"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Orders {
                action: OrderAction::SetStatus {
                    status: OrderStatus::OnTheWay,
                    ..
                }
            }
        ));
    }

    #[test]
    fn test_cart_quote_requires_items() {
        assert!(Cli::try_parse_from(["tastebud", "cart", "quote", "-r", "1"]).is_err());
    }
}
