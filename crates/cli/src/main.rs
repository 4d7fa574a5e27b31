//! FreshCart CLI - storefront operations from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in and print the session token
//! fc-cli login -e user@example.com -p "hunter2..."
//!
//! # Subsequent commands read the token from FRESHCART_TOKEN
//! export FRESHCART_TOKEN=eyJhbGciOi...
//!
//! # Browse the catalog
//! fc-cli products list
//! fc-cli products show 6428ebc6dc1175abc65ca0b9
//! fc-cli categories
//! fc-cli brands
//!
//! # Cart operations
//! fc-cli cart show
//! fc-cli cart add 6428ebc6dc1175abc65ca0b9
//! fc-cli cart set-quantity 6428ebc6dc1175abc65ca0b9 3
//! fc-cli cart remove 6428ebc6dc1175abc65ca0b9
//! fc-cli cart clear
//!
//! # Wishlist operations
//! fc-cli wishlist show
//! fc-cli wishlist toggle 6428ebc6dc1175abc65ca0b9
//!
//! # Checkout
//! fc-cli checkout --details "12 Nile St" --phone 01012345678 --city Cairo
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use freshcart_client::{ClientConfig, Storefront};

mod commands;

#[derive(Parser)]
#[command(name = "fc-cli")]
#[command(author, version, about = "FreshCart storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and print the session token
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Check whether the stored token is still valid
    Verify,
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// List product categories
    Categories,
    /// List product brands
    Brands,
    /// Cart operations
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Wishlist operations
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Create a hosted payment session for the current cart
    Checkout {
        /// Street details for the shipping address
        #[arg(long)]
        details: String,

        /// Egyptian mobile number
        #[arg(long)]
        phone: String,

        /// Destination city
        #[arg(long)]
        city: String,

        /// Cart id (defaults to the one the server reports for this session)
        #[arg(long)]
        cart_id: Option<String>,

        /// URL the payment provider redirects back to
        #[arg(long, default_value = "https://freshcart.example/orders")]
        return_url: String,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List the product catalog
    List,
    /// Show one product
    Show {
        /// Product id
        id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Fetch and display the cart
    Show,
    /// Add a product to the cart
    Add {
        /// Product id
        product_id: String,
    },
    /// Set the quantity of a cart line
    SetQuantity {
        /// Product id
        product_id: String,
        /// New quantity (values below 1 are clamped to 1)
        count: u32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        product_id: String,
    },
    /// Delete the whole cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Fetch and display the wishlist
    Show,
    /// Add or remove a product from the wishlist
    Toggle {
        /// Product id
        product_id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let storefront = Storefront::with_session(config, commands::session_from_env());

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&storefront, &email, &password).await?;
        }
        Commands::Verify => commands::auth::verify(&storefront).await?,
        Commands::Products { action } => match action {
            ProductsAction::List => commands::catalog::products(&storefront).await?,
            ProductsAction::Show { id } => commands::catalog::product(&storefront, &id).await?,
        },
        Commands::Categories => commands::catalog::categories(&storefront).await?,
        Commands::Brands => commands::catalog::brands(&storefront).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&storefront).await?,
            CartAction::Add { product_id } => {
                commands::cart::add(&storefront, &product_id).await?;
            }
            CartAction::SetQuantity { product_id, count } => {
                commands::cart::set_quantity(&storefront, &product_id, count).await?;
            }
            CartAction::Remove { product_id } => {
                commands::cart::remove(&storefront, &product_id).await?;
            }
            CartAction::Clear => commands::cart::clear(&storefront).await?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(&storefront).await?,
            WishlistAction::Toggle { product_id } => {
                commands::wishlist::toggle(&storefront, &product_id).await?;
            }
        },
        Commands::Checkout {
            details,
            phone,
            city,
            cart_id,
            return_url,
        } => {
            commands::checkout::create_session(
                &storefront,
                &details,
                &phone,
                &city,
                cart_id.as_deref(),
                &return_url,
            )
            .await?;
        }
    }
    Ok(())
}
