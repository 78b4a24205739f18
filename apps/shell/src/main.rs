//! # `rueda` Command Line
//!
//! Every shell command as a subcommand. Results are printed as JSON on
//! stdout; logs go to stderr. A failed command prints its
//! `{ "code", "message" }` error on stderr and exits with status 1.
//!
//! ```text
//! $ rueda login maria --password ****
//! $ rueda cart add 42
//! $ rueda cart client 7
//! $ rueda checkout credit
//! $ rueda rates set --bcv 36.5
//! $ rueda rates price 85.50
//! ```
//!
//! State lives in the local store between invocations: the cart, the login
//! and the POS session survive from one command to the next.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use rueda_core::{CategoryInput, ClientInput, CreditKind, Money, PaymentMethod, ProductInput, RateSource};
use rueda_shell::commands::{
    auth, cart, categories, clients, dashboard, debt, products, rates, sale, settings,
};
use rueda_shell::error::CommandError;
use rueda_shell::{database_path, init_tracing, AppState};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "rueda", version, about = "Rueda Bike & Moto point of sale")]
struct Cli {
    /// Local store file (defaults to $RUEDA_DB_PATH or the platform data dir)
    #[arg(long, global = true, env = "RUEDA_DB_PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and open a POS session
    Login {
        username: String,
        #[arg(long, env = "RUEDA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Close the POS session and forget the login
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Cart operations
    #[command(subcommand)]
    Cart(CartCommand),
    /// Sell the current cart
    Checkout {
        /// cash, card, transfer, mobile_payment or credit
        payment_method: PaymentMethod,
    },
    /// Sales history, newest first
    Sales,
    /// Home screen counters
    Dashboard,
    /// Clients with debt, overdue first
    Debts,
    #[command(subcommand)]
    Products(ProductCommand),
    #[command(subcommand)]
    Clients(ClientCommand),
    #[command(subcommand)]
    Categories(CategoryCommand),
    /// Exchange rates and bolívar prices
    #[command(subcommand)]
    Rates(RateCommand),
    /// Backend connection
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand)]
enum CartCommand {
    Show,
    /// Add one unit of a product
    Add { product_id: String },
    /// Set a line quantity (0 removes it)
    Set { product_id: String, quantity: i64 },
    Remove { product_id: String },
    /// Line discount in percent
    Discount { product_id: String, percent: f64 },
    /// Discount on the whole cart in percent
    GlobalDiscount { percent: f64 },
    /// Attach a client; omit the id to detach
    Client { client_id: Option<String> },
    Notes { text: String },
    Clear,
}

#[derive(Subcommand)]
enum ProductCommand {
    List,
    Search {
        query: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    Get { id: String },
    /// Create from a JSON body (camelCase ProductInput)
    Create { json: String },
    Update { id: String, json: String },
    Delete { id: String },
    RegenerateSku { id: String },
}

#[derive(Subcommand)]
enum ClientCommand {
    List,
    Get { id: String },
    /// Create from a JSON body (camelCase ClientInput)
    Create { json: String },
    Update { id: String, json: String },
    Delete { id: String },
    /// Record a charge or a payment
    Adjust {
        id: String,
        amount: Money,
        kind: KindArg,
        #[arg(long)]
        description: Option<String>,
    },
    /// Balance movements, newest first
    Credits { id: String },
}

#[derive(Subcommand)]
enum CategoryCommand {
    List,
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        id: String,
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Delete { id: String },
}

#[derive(Subcommand)]
enum RateCommand {
    Show,
    /// Update one or both rates (VES per USD)
    Set {
        #[arg(long)]
        bcv: Option<f64>,
        #[arg(long)]
        parallel: Option<f64>,
    },
    /// Show a USD amount in both currencies
    Price {
        usd: Money,
        /// bcv or parallel (defaults to RUEDA_RATE_SOURCE)
        #[arg(long)]
        source: Option<RateSource>,
    },
}

#[derive(Subcommand)]
enum SettingsCommand {
    GetUrl,
    SetUrl { url: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Charge,
    Payment,
}

impl From<KindArg> for CreditKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Charge => CreditKind::Charge,
            KindArg::Payment => CreditKind::Payment,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CommandError>() {
                Some(command_err) => match serde_json::to_string(command_err) {
                    Ok(json) => eprintln!("{}", json),
                    Err(_) => eprintln!("{}", command_err),
                },
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let db_path = match cli.db {
        Some(path) => path,
        None => database_path()?,
    };
    let app = AppState::open(db_path).await?;

    match cli.command {
        Command::Login { username, password } => {
            print(&auth::login(&app.api, &app.session, &username, &password).await?)
        }
        Command::Logout => print(&auth::logout(&app.api, &app.session).await?),
        Command::Whoami => print(&auth::current_user(&app.session).await),
        Command::Cart(command) => run_cart(&app, command).await,
        Command::Checkout { payment_method } => print(
            &sale::checkout(&app.api, &app.cart, &app.session, &app.config, payment_method).await?,
        ),
        Command::Sales => print(&sale::list_sales(&app.api).await?),
        Command::Dashboard => print(&dashboard::load_dashboard(&app.api, &app.config).await),
        Command::Debts => {
            print(&debt::load_debt_report(&app.api, &app.session, &app.config).await?)
        }
        Command::Products(command) => run_products(&app, command).await,
        Command::Clients(command) => run_clients(&app, command).await,
        Command::Categories(command) => run_categories(&app, command).await,
        Command::Rates(command) => run_rates(&app, command).await,
        Command::Settings(SettingsCommand::GetUrl) => print(&settings::get_api_url(&app.api)),
        Command::Settings(SettingsCommand::SetUrl { url }) => {
            print(&settings::set_api_url(&app.api, &app.store, &url).await?)
        }
    }
}

async fn run_cart(app: &AppState, command: CartCommand) -> anyhow::Result<()> {
    let store = &app.cart;
    let response = match command {
        CartCommand::Show => cart::get_cart(store).await,
        CartCommand::Add { product_id } => cart::add_to_cart(&app.api, store, &product_id).await?,
        CartCommand::Set {
            product_id,
            quantity,
        } => cart::update_cart_item(store, &product_id, quantity).await?,
        CartCommand::Remove { product_id } => cart::remove_from_cart(store, &product_id).await?,
        CartCommand::Discount {
            product_id,
            percent,
        } => cart::set_item_discount(store, &product_id, percent).await?,
        CartCommand::GlobalDiscount { percent } => cart::set_global_discount(store, percent).await?,
        CartCommand::Client { client_id } => {
            cart::select_client(&app.api, store, client_id.as_deref()).await?
        }
        CartCommand::Notes { text } => cart::set_notes(store, &text).await?,
        CartCommand::Clear => cart::clear_cart(store).await?,
    };
    print(&response)
}

async fn run_products(app: &AppState, command: ProductCommand) -> anyhow::Result<()> {
    let (api, session) = (&app.api, &app.session);
    match command {
        ProductCommand::List => print(&products::list_products(api).await?),
        ProductCommand::Search { query, limit } => {
            print(&products::search_products(api, &query, limit).await?)
        }
        ProductCommand::Get { id } => print(&products::get_product(api, &id).await?),
        ProductCommand::Create { json } => {
            let input: ProductInput = parse_json(&json)?;
            print(&products::create_product(api, session, &input).await?)
        }
        ProductCommand::Update { id, json } => {
            let input: ProductInput = parse_json(&json)?;
            print(&products::update_product(api, session, &id, &input).await?)
        }
        ProductCommand::Delete { id } => print(&products::delete_product(api, session, &id).await?),
        ProductCommand::RegenerateSku { id } => {
            print(&products::regenerate_sku(api, session, &id).await?)
        }
    }
}

async fn run_clients(app: &AppState, command: ClientCommand) -> anyhow::Result<()> {
    let (api, session) = (&app.api, &app.session);
    match command {
        ClientCommand::List => print(&clients::list_clients(api).await?),
        ClientCommand::Get { id } => print(&clients::get_client(api, &id).await?),
        ClientCommand::Create { json } => {
            let input: ClientInput = parse_json(&json)?;
            print(&clients::create_client(api, session, &input).await?)
        }
        ClientCommand::Update { id, json } => {
            let input: ClientInput = parse_json(&json)?;
            print(&clients::update_client(api, session, &id, &input).await?)
        }
        ClientCommand::Delete { id } => print(&clients::delete_client(api, session, &id).await?),
        ClientCommand::Adjust {
            id,
            amount,
            kind,
            description,
        } => print(
            &clients::adjust_balance(api, session, &id, amount, kind.into(), description).await?,
        ),
        ClientCommand::Credits { id } => print(&clients::list_credits(api, &id).await?),
    }
}

async fn run_categories(app: &AppState, command: CategoryCommand) -> anyhow::Result<()> {
    let (api, session) = (&app.api, &app.session);
    match command {
        CategoryCommand::List => print(&categories::list_categories(api).await?),
        CategoryCommand::Create { name, description } => {
            let input = CategoryInput { name, description };
            print(&categories::create_category(api, session, &input).await?)
        }
        CategoryCommand::Update {
            id,
            name,
            description,
        } => {
            let input = CategoryInput { name, description };
            print(&categories::update_category(api, session, &id, &input).await?)
        }
        CategoryCommand::Delete { id } => {
            print(&categories::delete_category(api, session, &id).await?)
        }
    }
}

async fn run_rates(app: &AppState, command: RateCommand) -> anyhow::Result<()> {
    match command {
        RateCommand::Show => print(&rates::get_exchange_rates(&app.store).await?),
        RateCommand::Set { bcv, parallel } => {
            print(&rates::set_exchange_rates(&app.store, &app.session, bcv, parallel).await?)
        }
        RateCommand::Price { usd, source } => {
            print(&rates::price_display(&app.store, &app.config, usd, source).await?)
        }
    }
}

fn parse_json<T: DeserializeOwned>(json: &str) -> anyhow::Result<T> {
    serde_json::from_str(json).context("Invalid JSON body")
}

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
