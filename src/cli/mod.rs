//! Command-line surface over the session facade.
//!
//! This layer only collects input and renders outcomes; every decision
//! (validation, authorization, persistence) happens behind the
//! [`Session`] facade and comes back as a structured value.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use dialoguer::Password;
use std::path::PathBuf;

use crate::db::{DbPool, NewProduct, Product};
use crate::session::Session;

#[derive(Parser, Debug)]
#[command(name = "partbook")]
#[command(author, version, about = "Role-gated registry for manufacturing product records", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "partbook.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Username to authenticate as
    #[arg(short, long, env = "PARTBOOK_USER")]
    pub user: String,

    /// Password (prompted interactively when not set)
    #[arg(long, env = "PARTBOOK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a product record
    Create(CreateArgs),

    /// List all product records
    List,

    /// Show a single product record
    Show {
        /// Product id
        id: i64,
    },

    /// Update one field of a product record
    Update {
        /// Product id
        id: i64,
        /// Field name (e.g. fg_part, fg_part_rev, status)
        field: String,
        /// New value
        value: String,
    },

    /// Delete a product record
    Delete {
        /// Product id
        id: i64,
    },

    /// Export all product records to a CSV file
    Export {
        /// Output file path
        path: PathBuf,
    },

    /// Show recent authentication attempts
    Audit {
        /// Maximum number of rows
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },

    /// Show the authenticated role and its capabilities
    Whoami,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub product_name: String,
    /// FG part (SMxxxxxxx)
    #[arg(long)]
    pub fg_part: String,
    /// FG part revision (xxx.xx)
    #[arg(long)]
    pub fg_part_rev: String,
    #[arg(long)]
    pub pcb_part: String,
    #[arg(long)]
    pub pcb_part_rev: String,
    #[arg(long)]
    pub smd_top: String,
    #[arg(long)]
    pub smd_top_rev: String,
    #[arg(long)]
    pub smd_bottom: String,
    #[arg(long)]
    pub smd_bottom_rev: String,
    #[arg(long)]
    pub sw_wrapper: String,
    #[arg(long)]
    pub sw_wrapper_rev: String,
    /// ECU version (xx.xx.xx)
    #[arg(long)]
    pub ecu_version: String,
    /// Checksum (8 hex characters)
    #[arg(long)]
    pub checksum: String,
    /// Proto number (4 digits, proto builds only)
    #[arg(long)]
    pub proto_number: Option<String>,
    #[arg(long, default_value = "Proto")]
    pub status: String,
    #[arg(long, default_value = "")]
    pub remark: String,
}

impl From<CreateArgs> for NewProduct {
    fn from(args: CreateArgs) -> Self {
        NewProduct {
            product_name: args.product_name,
            fg_part: args.fg_part,
            fg_part_rev: args.fg_part_rev,
            pcb_part: args.pcb_part,
            pcb_part_rev: args.pcb_part_rev,
            smd_top: args.smd_top,
            smd_top_rev: args.smd_top_rev,
            smd_bottom: args.smd_bottom,
            smd_bottom_rev: args.smd_bottom_rev,
            sw_wrapper: args.sw_wrapper,
            sw_wrapper_rev: args.sw_wrapper_rev,
            ecu_version: args.ecu_version,
            checksum: args.checksum,
            proto_number: args.proto_number,
            status: args.status,
            remark: args.remark,
        }
    }
}

/// Authenticate once and dispatch a single command.
pub async fn run(cli: Cli, db: &DbPool) -> Result<()> {
    let password = match cli.password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .interact()
            .context("Failed to read password")?,
    };

    let session = Session::login(db, &cli.user, &password).await?;

    match cli.command {
        Commands::Create(args) => {
            let draft: NewProduct = args.into();
            let id = session.create_product(&draft).await?;
            println!("{} Product {} created", style("✔").green(), id);
        }
        Commands::List => {
            let products = session.list_products().await?;
            render_product_table(&products);
        }
        Commands::Show { id } => {
            let product = session.view_product(id).await?;
            render_product(&product);
        }
        Commands::Update { id, field, value } => {
            session.update_product(id, &field, &value).await?;
            println!("{} Product {} updated", style("✔").green(), id);
        }
        Commands::Delete { id } => {
            session.delete_product(id).await?;
            println!("{} Product {} deleted", style("✔").green(), id);
        }
        Commands::Export { path } => {
            let products = session.list_products().await?;
            let count = products.len();
            let mut writer = csv::Writer::from_path(&path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            for product in &products {
                writer.serialize(product)?;
            }
            writer.flush()?;
            println!(
                "{} Exported {} records to {}",
                style("✔").green(),
                count,
                path.display()
            );
        }
        Commands::Audit { limit } => {
            let attempts = session.recent_auth_attempts(limit).await?;
            for attempt in &attempts {
                let outcome = if attempt.outcome == crate::db::outcomes::SUCCESS {
                    style(attempt.outcome.as_str()).green()
                } else {
                    style(attempt.outcome.as_str()).red()
                };
                println!("{}  {:<20} {}", attempt.created_at, attempt.username, outcome);
            }
        }
        Commands::Whoami => {
            println!(
                "{} ({})",
                style(session.username()).bold(),
                session.role()
            );
            for capability in session.capabilities() {
                println!("  - {}", capability);
            }
        }
    }

    Ok(())
}

fn render_product_table(products: &[Product]) {
    if products.is_empty() {
        println!("{}", style("No products found.").yellow());
        return;
    }

    println!(
        "{}",
        style(format!(
            "{:<5} | {:<25} | {:<12} | {:<7} | {:<7} | {}",
            "ID", "Product Name", "FG Part", "Rev", "Proto #", "Status"
        ))
        .cyan()
    );
    println!("{}", "-".repeat(80));
    for product in products {
        let proto = product
            .proto_number
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<5} | {:<25} | {:<12} | {:<7} | {:<7} | {}",
            product.id,
            product.product_name,
            product.fg_part,
            product.fg_part_rev,
            proto,
            product.status
        );
    }
}

fn render_product(product: &Product) {
    println!("{}", style(format!("===== {} =====", product.product_name)).cyan());
    let proto = product
        .proto_number
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string());
    let rows = [
        ("ID", product.id.to_string()),
        ("FG Part", product.fg_part.clone()),
        ("FG Part Revision", product.fg_part_rev.clone()),
        ("PCB Part", product.pcb_part.clone()),
        ("PCB Part Revision", product.pcb_part_rev.clone()),
        ("SMD Top", product.smd_top.clone()),
        ("SMD Top Revision", product.smd_top_rev.clone()),
        ("SMD Bottom", product.smd_bottom.clone()),
        ("SMD Bottom Revision", product.smd_bottom_rev.clone()),
        ("SW Wrapper", product.sw_wrapper.clone()),
        ("SW Wrapper Revision", product.sw_wrapper_rev.clone()),
        ("ECU Version", product.ecu_version.clone()),
        ("Checksum", product.checksum.clone()),
        ("Proto Number", proto),
        ("Status", product.status.clone()),
        ("Remark", product.remark.clone()),
        ("Created At", product.created_at.clone()),
    ];
    for (label, value) in rows {
        println!("{:<20}: {}", style(label).yellow(), value);
    }
}
