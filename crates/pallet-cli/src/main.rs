use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use pallet_core::{
    render_svg, MultiItemRequest, MultiItemResult, Optimizer, OptimizerResult, PalletQuote,
    SingleItemRequest, Tariff,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pallet")]
#[command(about = "Pallet Optimizer - Find and price the cheapest pallets for furniture", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank pallet types for a single item
    Single {
        /// Request file with one item (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Tariff file with pallets, rates and surcharges
        #[arg(short, long, default_value = "data/tariff.yaml")]
        tariff: PathBuf,

        /// Output file for result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Spread several items over pallets
    Multi {
        /// Request file with an item list (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Tariff file with pallets, rates and surcharges
        #[arg(short, long, default_value = "data/tariff.yaml")]
        tariff: PathBuf,

        /// Output file for result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate SVG visualization from a multi-item result
    Generate {
        /// Input result file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output SVG file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Single {
            input,
            tariff,
            output,
        } => {
            single_command(input, tariff, output)?;
        }
        Commands::Multi {
            input,
            tariff,
            output,
        } => {
            multi_command(input, tariff, output)?;
        }
        Commands::Generate { input, output } => {
            generate_command(input, output)?;
        }
    }

    Ok(())
}

/// Reads YAML for `.yaml`/`.yml` files, JSON otherwise.
fn read_input<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    let value = match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    Ok(value)
}

fn load_tariff(path: &Path) -> Result<Tariff> {
    println!("{}", "🔍 Loading tariff...".bright_blue());
    let tariff = Tariff::from_path(path)?;
    println!(
        "  {} pallet types available",
        tariff.pallets.len().to_string().bright_white().bold()
    );
    Ok(tariff)
}

fn write_output<T: Serialize>(result: &T, output: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    if let Some(output_path) = output {
        std::fs::write(&output_path, json)?;
        println!(
            "💾 Saved result to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        println!("{}", json);
    }
    Ok(())
}

fn print_quote(quote: &PalletQuote) {
    println!(
        "    • {}: {} gross ({})",
        quote.pallet.display_name().bright_white(),
        format!("{:.2}", quote.price.gross_total).bright_white().bold(),
        quote.orientation_label
    );
    for warning in &quote.warnings {
        println!("      ⚠ {}", warning.yellow());
    }
}

fn single_command(input: PathBuf, tariff: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let tariff = load_tariff(&tariff)?;
    let request: SingleItemRequest = read_input(&input)?;
    println!();

    println!("{}", "🚀 Evaluating pallets...".bright_blue());
    let optimizer = Optimizer::new(&tariff, request.context)?;
    let result: OptimizerResult = optimizer.optimize(&request.item)?;
    println!();

    match &result.recommended {
        Some(quote) => {
            println!("{}", "✅ Recommendation:".bright_green().bold());
            print_quote(quote);
        }
        None => println!("{}", "❌ No pallet can carry this item".bright_red().bold()),
    }

    if !result.alternatives.is_empty() {
        println!("{}", "📊 Alternatives:".bright_yellow().bold());
        for quote in &result.alternatives {
            print_quote(quote);
        }
    }

    if !result.rejected.is_empty() {
        println!("{}", "🚫 Rejected:".bright_yellow().bold());
        for rejected in &result.rejected {
            let reasons: Vec<String> = rejected
                .reasons
                .iter()
                .map(|r| format!("{:?}", r))
                .collect();
            println!(
                "    • {}: {}",
                rejected.pallet_name.bright_white(),
                reasons.join(", ").bright_red()
            );
        }
    }
    println!();

    write_output(&result, output)
}

fn multi_command(input: PathBuf, tariff: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let tariff = load_tariff(&tariff)?;
    let request: MultiItemRequest = read_input(&input)?;
    println!(
        "  {} items to ship",
        request.items.len().to_string().bright_white().bold()
    );
    println!();

    println!("{}", "🚀 Running allocation...".bright_blue());
    let optimizer = Optimizer::new(&tariff, request.context)?;
    let result = optimizer.optimize_multi_item(&request.items)?;

    println!();
    println!("{}", "✅ Allocation complete!".bright_green().bold());
    println!();

    println!("{}", "📊 Results:".bright_yellow().bold());
    println!("  Pallets required:");
    for (pallet_id, count) in &result.pallets_required {
        println!("    • {}: {} pallets", pallet_id.bright_white(), count);
    }
    println!();
    println!(
        "  Total pallets: {}",
        result.pallet_count.to_string().bright_white().bold()
    );
    println!(
        "  Total gross: {}",
        format!("{:.2}", result.total_gross).bright_white().bold()
    );

    if !result.unallocated.is_empty() {
        println!();
        println!("  Not shipped:");
        for item in &result.unallocated {
            println!("    • {}", item.item_name.bright_red());
        }
    }

    if !result.warnings.is_empty() {
        println!();
        println!("  Warnings:");
        for warning in &result.warnings {
            println!("    ⚠ {}", warning.yellow());
        }
    }
    println!();

    write_output(&result, output)
}

fn generate_command(input: PathBuf, output: PathBuf) -> Result<()> {
    println!("{}", "🔍 Loading result...".bright_blue());

    let content = std::fs::read_to_string(&input)?;
    let result: MultiItemResult = serde_json::from_str(&content)?;

    println!("{}", "🎨 Generating SVG...".bright_blue());

    let svg = render_svg(&result)?;
    std::fs::write(&output, svg)?;

    println!();
    println!(
        "{} Saved SVG to {}",
        "✅".bright_green(),
        output.display().to_string().bright_white()
    );

    Ok(())
}
