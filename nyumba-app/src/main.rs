use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use nyumba_app::{AppConfig, AppContext, CheckoutSummary, catalog, logger};
use shared::models::{Product, SignupDetails, UserRole};

#[derive(Parser)]
#[command(name = "nyumba", version, about = "Nyumba storefront")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the catalog and list products
    Catalog {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        sub: Option<String>,
        #[arg(long)]
        search: Option<String>,
        /// Only load the first page
        #[arg(long)]
        first_page: bool,
    },
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
    Login {
        phone: String,
        otp: String,
    },
    Logout,
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        address: String,
    },
    Whoami,
    /// Change a user's role (super-admin only)
    Role {
        phone: String,
        role: UserRole,
    },
    Checkout,
}

#[derive(Subcommand)]
enum CartAction {
    List,
    Add {
        product_id: i64,
        /// Variant colour name, defaults to the first variant
        #[arg(long)]
        color: Option<String>,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    Set {
        product_id: i64,
        color: String,
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    Remove {
        product_id: i64,
        color: String,
    },
    Clear,
}

#[derive(Subcommand)]
enum SavedAction {
    List,
    Add { product_id: i64 },
    Remove { product_id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::from_env();
    let log_dir = config.log_dir();
    let _guard = logger::init_logger(&config.log_level, config.log_json, Some(log_dir.as_path()))?;

    let ctx = AppContext::open(config)?;
    run(&ctx, cli.command).await
}

async fn run(ctx: &AppContext, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Catalog {
            category,
            sub,
            search,
            first_page,
        } => {
            load_catalog(ctx, !first_page).await?;
            let catalog = ctx.catalog();
            let products = match (search, category) {
                (Some(text), _) => catalog.search(&text),
                (None, Some(name)) => catalog.in_category(&name, sub.as_deref()),
                (None, None) => catalog.products(),
            };
            for product in &products {
                print_product(product);
            }
            println!("{} products", products.len());
        }
        Command::Cart { action } => cart(ctx, action).await?,
        Command::Saved { action } => saved(ctx, action).await?,
        Command::Login { phone, otp } => {
            let user = ctx.session().login(&phone, &otp)?;
            println!("Welcome back, {} ({})", user.name, user.role);
        }
        Command::Logout => {
            ctx.session().logout();
            println!("Logged out");
        }
        Command::Signup {
            name,
            phone,
            email,
            address,
        } => {
            let user = ctx.session().signup(SignupDetails {
                name,
                phone,
                email,
                address,
            })?;
            println!("Account created for {}", user.name);
        }
        Command::Whoami => match ctx.session().current_user() {
            Some(user) => println!("{}", serde_json::to_string_pretty(user)?),
            None => println!("Not logged in"),
        },
        Command::Role { phone, role } => {
            let mut session = ctx.session();
            let is_admin = session
                .current_user()
                .is_some_and(|u| u.role == UserRole::SuperAdmin);
            if !is_admin {
                bail!("Only a super-admin can change roles");
            }
            if !session.update_user_role(&phone, role) {
                bail!("No user with phone {}", phone);
            }
            println!("{} is now {}", phone, role);
        }
        Command::Checkout => {
            let order = ctx.place_order()?;
            println!("{}", serde_json::to_string_pretty(&order)?);
        }
    }
    Ok(())
}

async fn cart(ctx: &AppContext, action: CartAction) -> anyhow::Result<()> {
    match action {
        CartAction::List => {
            let cart = ctx.cart();
            for item in cart.items() {
                println!(
                    "{:>6} x{:<3} {} ({}) KES {:.2}",
                    item.product.id,
                    item.quantity,
                    item.product.name,
                    item.selected_variant.color_name,
                    item.line_total()
                );
            }
            let summary = CheckoutSummary::from_cart(cart.items(), &ctx.config().delivery);
            println!(
                "{} items, subtotal KES {:.2}, delivery KES {:.2}, total KES {:.2}",
                summary.item_count, summary.subtotal, summary.delivery_fee, summary.total
            );
        }
        CartAction::Add {
            product_id,
            color,
            quantity,
        } => {
            let product = find_product(ctx, product_id).await?;
            let variant = catalog::select_variant(&product, color.as_deref())?;
            let change = ctx
                .cart()
                .add(&product, variant, quantity)
                .map_err(shared::AppError::from)?;
            println!("{:?}", change);
        }
        CartAction::Set {
            product_id,
            color,
            quantity,
        } => {
            let change = ctx.cart().set_quantity(product_id, &color, quantity);
            if let Some(notice) = change.notice() {
                println!("{}", notice);
            }
            println!("{:?}", change);
        }
        CartAction::Remove { product_id, color } => {
            println!("{:?}", ctx.cart().remove(product_id, &color));
        }
        CartAction::Clear => {
            ctx.cart().clear();
            println!("Cart cleared");
        }
    }
    Ok(())
}

async fn saved(ctx: &AppContext, action: SavedAction) -> anyhow::Result<()> {
    match action {
        SavedAction::List => {
            for product in ctx.saved().items() {
                print_product(product);
            }
        }
        SavedAction::Add { product_id } => {
            let product = find_product(ctx, product_id).await?;
            if ctx.saved().add(&product) {
                println!("Saved {}", product.name);
            } else {
                println!("{} is already saved", product.name);
            }
        }
        SavedAction::Remove { product_id } => {
            if !ctx.saved().remove(product_id) {
                println!("Product {} was not saved", product_id);
            }
        }
    }
    Ok(())
}

/// Run both load phases. With `full`, wait for the background phase too.
async fn load_catalog(ctx: &AppContext, full: bool) -> anyhow::Result<()> {
    let loader = ctx.loader()?;
    let background = loader.start().await?;
    if full && let Some(handle) = background {
        handle.await.context("background catalog load panicked")?;
    }
    Ok(())
}

async fn find_product(ctx: &AppContext, product_id: i64) -> anyhow::Result<Product> {
    load_catalog(ctx, true).await?;
    Ok(ctx.catalog().require(product_id)?)
}

fn print_product(product: &Product) {
    let stock = product.total_stock();
    println!(
        "{:>6}  {:<40} {:<16} KES {:>10.2}  {}",
        product.id,
        product.name,
        product.category,
        product.display_price(),
        if stock > 0 {
            format!("{} in stock", stock)
        } else {
            "sold out".to_string()
        }
    );
}
