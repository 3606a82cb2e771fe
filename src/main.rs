use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use order_desk::api::Backend;
use order_desk::app_system::{setup_tracing, DeskSystem};
use order_desk::clients::FormClient;
use order_desk::config::DeskConfig;
use order_desk::domain::{ImageUpload, Operator, OrderId, OrderStatus, ProductCreate, ProductId};
use order_desk::form::{submit_product, ProductForm};
use order_desk::format::parse_grouped;
use order_desk::views::{OrderRow, ProductRow};
use std::path::PathBuf;
use tracing::{error, info, Instrument};

#[derive(Parser)]
#[command(name = "order-desk")]
#[command(about = "Admin desk for the products/orders backend", long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides config and environment
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Name stamped into audit columns
    #[arg(long, global = true)]
    operator: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Product catalog commands
    Products {
        #[command(subcommand)]
        cmd: ProductCmd,
    },

    /// Order commands
    Orders {
        #[command(subcommand)]
        cmd: OrderCmd,
    },

    /// Run the create-order flow against an in-memory backend
    Demo,
}

#[derive(Subcommand)]
enum ProductCmd {
    List,

    /// Add a product
    Create {
        #[arg(long)]
        name: String,

        /// Unit price, `.` grouping allowed (e.g. 15.000)
        #[arg(long)]
        price: String,

        #[arg(long, default_value = "0")]
        stock: String,

        /// Create the product as inactive
        #[arg(long, default_value_t = false)]
        inactive: bool,

        /// Image file to upload
        #[arg(long)]
        image: Option<PathBuf>,
    },

    Delete {
        id: ProductId,
    },
}

#[derive(Args, Clone)]
struct LineArgs {
    /// Product id
    #[arg(long)]
    product: Option<ProductId>,

    #[arg(long)]
    quantity: Option<i64>,

    /// pending | processing | completed | cancelled
    #[arg(long)]
    status: Option<OrderStatus>,

    #[arg(long)]
    payment: Option<String>,

    /// Process start date (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Process end date (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum OrderCmd {
    List,

    Show {
        id: String,
    },

    /// Create an order; the total is derived from the product price
    Create {
        /// Order code, generated when left out
        #[arg(long)]
        code: Option<String>,

        #[command(flatten)]
        line: LineArgs,
    },

    /// Edit an order; unset flags keep the stored values
    Update {
        id: String,

        #[command(flatten)]
        line: LineArgs,
    },

    Delete {
        id: String,
    },
}

fn load_config(cli: &Cli) -> Result<DeskConfig> {
    let mut config =
        DeskConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(url) = &cli.api_url {
        config.api_url = url.clone();
    }
    if let Some(operator) = &cli.operator {
        config.operator = operator.clone();
    }
    Ok(config)
}

fn print_products(rows: &[ProductRow]) {
    for row in rows {
        println!(
            "{:>4}  {:<24} {:>18} {:>8}  {:<8} by {} on {}",
            row.id.to_string(),
            row.name,
            row.price,
            row.stock,
            row.status,
            row.created_by,
            row.created_at
        );
    }
}

fn print_orders(rows: &[OrderRow]) {
    for row in rows {
        println!(
            "{:<12} {:<20} {:<20} x{:<4} {:>18}  {:<10} {:<10} {} - {}",
            row.id.to_string(),
            row.order_code,
            row.product_name,
            row.quantity,
            row.price,
            row.status,
            row.payment_type,
            row.start_process,
            row.end_process
        );
    }
}

/// Pushes the given edits into an open form, product first so the quantity clamps to it.
async fn apply_line(client: &FormClient, line: LineArgs) -> Result<()> {
    if let Some(id) = line.product {
        let snapshot = client.select_product(Some(id)).await?;
        if snapshot.product.is_none() {
            bail!("product {id} is not in the active catalog");
        }
    }
    if let Some(quantity) = line.quantity {
        client.set_quantity(quantity).await?;
    }
    if let Some(status) = line.status {
        client.set_status(status).await?;
    }
    if let Some(payment) = line.payment {
        client.set_payment_type(payment).await?;
    }
    if line.start.is_some() || line.end.is_some() {
        let current = client.snapshot().await?;
        let start = line.start.or(current.start_process);
        let end = line.end.or(current.end_process);
        client.set_process_dates(start, end).await?;
    }
    Ok(())
}

async fn run_products(system: &DeskSystem, operator: &Operator, cmd: ProductCmd) -> Result<()> {
    let view = system.products();
    match cmd {
        ProductCmd::List => print_products(&view.rows().await?),
        ProductCmd::Create { name, price, stock, inactive, image } => {
            let image = match image {
                Some(path) => Some(
                    ImageUpload::from_path(&path)
                        .await
                        .with_context(|| format!("Cannot read image {}", path.display()))?,
                ),
                None => None,
            };
            let form = ProductForm {
                name,
                price: parse_grouped(&price),
                stock: u32::try_from(parse_grouped(&stock)).context("stock is too large")?,
                active: !inactive,
                image,
            };
            submit_product(system.backend(), system.notifier(), &form, operator).await?;
            println!("Product added.");
        }
        ProductCmd::Delete { id } => print_products(&view.delete(id).await?),
    }
    Ok(())
}

async fn run_orders(system: &mut DeskSystem, operator: Operator, cmd: OrderCmd) -> Result<()> {
    match cmd {
        OrderCmd::List => print_orders(&system.orders().rows().await?),
        OrderCmd::Show { id } => {
            let order = system.backend().show_order(&OrderId::from(id)).await?;
            println!("{}", serde_json::to_string_pretty(&order)?);
        }
        OrderCmd::Create { code, line } => {
            let client = system.open_create_form().await?;
            let available = client.refresh_catalog().await?;
            info!(available, "Catalog ready");
            if let Some(code) = code {
                client.set_order_code(code).await?;
            }
            apply_line(&client, line).await?;
            let outcome = client.submit(operator).await?;
            println!("{outcome:?}");
        }
        OrderCmd::Update { id, line } => {
            let (client, draft) = system.open_update_form(OrderId::from(id)).await?;
            info!(order_code = %draft.order_code, "Editing order");
            apply_line(&client, line).await?;
            let outcome = client.submit(operator).await?;
            println!("{outcome:?}");
        }
        OrderCmd::Delete { id } => print_orders(&system.orders().delete(&OrderId::from(id)).await?),
    }
    Ok(())
}

/// Seeds an in-memory backend and walks one order through the form session.
async fn run_demo(config: DeskConfig, operator: Operator) -> Result<()> {
    let (mut system, memory) = DeskSystem::offline(config);

    let span = tracing::info_span!("seed_catalog");
    async {
        let seed = [("Kopi Susu", 15000, 5), ("Teh Tarik", 8000, 0), ("Roti Bakar", 12000, 20)];
        for (name, price, stock) in seed {
            memory
                .create_product(ProductCreate {
                    name: name.to_string(),
                    price,
                    stock,
                    active: true,
                    image: None,
                    creby: operator.name.clone(),
                    cretime: chrono::Utc::now(),
                })
                .await?;
        }
        Ok::<_, anyhow::Error>(())
    }
    .instrument(span)
    .await?;

    let client = system.open_create_form().await?;
    client.refresh_catalog().await?;

    let line = client.select_product(Some(ProductId(1))).await?;
    info!(quantity = line.quantity, total = line.total, "Selected Kopi Susu");
    let line = client.set_quantity(10).await?;
    info!(quantity = line.quantity, total = line.total, "Quantity clamped to stock");
    client.set_payment_type("cash".to_string()).await?;

    let span = tracing::info_span!("order_processing");
    let outcome = async {
        info!("Submitting order through form session");
        client.submit(operator.clone()).await
    }
    .instrument(span)
    .await;

    match outcome {
        Ok(outcome) => info!(?outcome, "Order processed successfully"),
        Err(e) => error!(error = %e, "Order processing failed"),
    }

    print_orders(&system.orders().rows().await?);

    drop(client);
    drop(memory);
    system.shutdown().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let operator = config.operator();
    info!(operator = %operator.name, "Starting order desk");

    match cli.cmd {
        Commands::Demo => run_demo(config, operator).await?,
        Commands::Products { cmd } => {
            let system = DeskSystem::connect(config)?;
            run_products(&system, &operator, cmd).await?;
            system.shutdown().await?;
        }
        Commands::Orders { cmd } => {
            let mut system = DeskSystem::connect(config)?;
            run_orders(&mut system, operator, cmd).await?;
            system.shutdown().await?;
        }
    }
    Ok(())
}
