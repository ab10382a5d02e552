use anyhow::Context;
use clap::Parser;
use storefront_core::{
    AppContext, CartEvent, CartItem, Config, ListController, ListSnapshot, LoadOutcome,
    Product,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(version, about = "Browse, search and shop a product catalog from the terminal", long_about = None)]
struct Cli {
    /// Override the product API base URL
    #[arg(long, global = true, env = "STOREFRONT_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Browse products, optionally within a category
    Products {
        /// Category slug ("all" for everything)
        #[arg(short, long)]
        category: Option<String>,
        /// How many pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Search products
    Search {
        /// Search query
        query: String,
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Show search suggestions for what you've typed so far
    Suggest {
        query: Option<String>,
    },
    /// Show or clear recent searches
    Recent {
        #[arg(long)]
        clear: bool,
    },
    /// List categories
    Categories,
    /// Show product details
    Product {
        id: u64,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
}

#[derive(clap::Subcommand)]
enum CartAction {
    Show,
    Add { id: u64 },
    Remove { id: u64 },
    Set { id: u64, quantity: u32 },
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load().context("Failed to load config")?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }

    let ctx = AppContext::new(config).context("Failed to set up storefront")?;

    if ctx.launch_state().first_launch()? {
        println!("Welcome to Storefront! Try `storefront products` or `storefront search phone`.\n");
    }

    match cli.command {
        Some(Commands::Products { category, pages }) => {
            match category.as_deref().filter(|c| !c.eq_ignore_ascii_case("all")) {
                Some(category) => {
                    tracing::info!("Browsing category: {}", category);
                    let feed = ctx.category_feed();
                    let outcome = feed.select(Some(category)).await;
                    report_failure(&outcome)?;
                    load_pages(feed.list(), pages.saturating_sub(1)).await?;
                    print_products(&feed.snapshot());
                }
                None => {
                    let feed = ctx.product_feed();
                    load_pages(&feed, pages).await?;
                    print_products(&feed.snapshot());
                }
            }
        }
        Some(Commands::Search { query, pages }) => {
            let session = ctx.search_session();
            let outcome = session.submit(&query).await;
            report_failure(&outcome)?;
            for _ in 1..pages {
                let outcome = session.load_more().await;
                report_failure(&outcome)?;
                if !matches!(outcome, LoadOutcome::Loaded { has_more: true, .. }) {
                    break;
                }
            }

            let results = session.results();
            if results.items.is_empty() {
                println!("No products found for \"{}\"", query.trim());
            } else {
                print_products(&results);
            }
        }
        Some(Commands::Suggest { query }) => {
            let query = query.unwrap_or_default();
            for suggestion in ctx.suggestions().suggest(&query) {
                println!("  {}", suggestion);
            }
        }
        Some(Commands::Recent { clear }) => {
            let recents = ctx.recent_searches();
            if clear {
                recents.clear()?;
                println!("Recent searches cleared");
            } else {
                let list = recents.list();
                if list.is_empty() {
                    println!("No recent searches");
                }
                for query in list {
                    println!("  {}", query);
                }
            }
        }
        Some(Commands::Categories) => {
            for category in ctx.catalog().categories().await? {
                println!("  {}", category);
            }
        }
        Some(Commands::Product { id }) => {
            let details = ctx.catalog().product(id).await?;
            let product = &details.product;

            println!("{} (#{})", product.title, product.id);
            if let Some(brand) = &product.brand {
                println!("Brand: {}", brand);
            }
            println!(
                "Price: ${:.2} (was ${:.2}, -{:.0}%)",
                product.price,
                product.original_price(),
                product.discount_percentage
            );
            println!(
                "Rating: {:.1} from {} reviews",
                details.average_review_rating(),
                details.reviews.len()
            );
            println!("Stock: {} ({})", product.stock, details.availability_status);
            println!("Category: {}", product.category);
            println!("\n{}\n", product.description);
            println!("Warranty: {}", details.warranty_information);
            println!("Shipping: {}", details.shipping_information);
            println!("Returns: {}", details.return_policy);

            for review in &details.reviews {
                println!(
                    "  [{}/5] {} - {}",
                    review.rating, review.comment, review.reviewer_name
                );
            }
        }
        Some(Commands::Cart { action }) => {
            let mut cart = ctx.load_cart()?;
            let event = match action.unwrap_or(CartAction::Show) {
                CartAction::Show => None,
                CartAction::Add { id } => {
                    let details = ctx.catalog().product(id).await?;
                    Some(cart.add(CartItem::from_product(&details.product)))
                }
                CartAction::Remove { id } => Some(cart.remove(id)),
                CartAction::Set { id, quantity } => Some(cart.update_quantity(id, quantity)),
                CartAction::Clear => Some(cart.clear()),
            };

            if let Some(event) = event {
                if event != CartEvent::Unchanged {
                    ctx.save_cart(&cart)?;
                }
                println!("{}\n", event);
            }

            if cart.is_empty() {
                println!("Your cart is empty");
            } else {
                for item in cart.items() {
                    println!(
                        "  #{:<5} {:<40} {:>3} x ${:>8.2} = ${:>9.2}",
                        item.id,
                        item.title,
                        item.quantity,
                        item.price,
                        item.subtotal()
                    );
                }
                println!(
                    "\n{} items, total ${:.2}",
                    cart.item_count(),
                    cart.total_price()
                );
            }
        }
        None => {
            println!("No command specified. Try --help");
        }
    }

    Ok(())
}

/// Keep loading until `pages` pages are in or the feed runs dry
async fn load_pages(feed: &ListController<Product>, pages: u32) -> anyhow::Result<()> {
    for _ in 0..pages {
        let outcome = feed.load_next().await;
        report_failure(&outcome)?;
        if !matches!(outcome, LoadOutcome::Loaded { has_more: true, .. }) {
            break;
        }
    }
    Ok(())
}

fn report_failure(outcome: &LoadOutcome) -> anyhow::Result<()> {
    if let LoadOutcome::Failed(info) = outcome {
        anyhow::bail!("{}", info);
    }
    Ok(())
}

fn print_products(snapshot: &ListSnapshot<Product>) {
    for product in &snapshot.items {
        let stock = if product.in_stock() { "" } else { "  (out of stock)" };
        println!(
            "  #{:<5} {:<40} ${:>8.2}  ★{:.1}{}",
            product.id, product.title, product.price, product.rating, stock
        );
    }

    let shown = snapshot.items.len();
    match snapshot.total {
        Some(total) => println!("\nShowing {} of {}", shown, total),
        None => println!("\nShowing {}", shown),
    }
    if snapshot.has_more {
        println!("More available, use --pages to load further");
    }
}
