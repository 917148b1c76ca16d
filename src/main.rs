mod calories;
mod config;
mod db;
mod error;
mod fetch;
mod import;
mod parser;
mod recipe;
mod sitemap;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::Settings;
use crate::import::{ImportResult, ImportService};
use crate::parser::extract::ExtractMode;
use crate::recipe::RecipeDraft;

#[derive(Parser)]
#[command(name = "recipe_importer", about = "Import recipes and food articles from any web page")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a single page through the proxy
    Import {
        url: String,
        #[arg(short, long, value_enum, default_value_t = ExtractMode::Recipe)]
        mode: ExtractMode,
        /// Store the result in the local database
        #[arg(long)]
        save: bool,
        /// Print the raw ImportResult as JSON
        #[arg(long)]
        json: bool,
    },
    /// Import every URL listed in a file (one per line) and store the results
    Batch {
        file: PathBuf,
        #[arg(short, long, value_enum, default_value_t = ExtractMode::Recipe)]
        mode: ExtractMode,
        /// Max URLs to import
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Extract from saved HTML files without touching the network
    Extract {
        files: Vec<PathBuf>,
        /// Page URL the files were saved from (used to resolve links)
        #[arg(long)]
        url: String,
        #[arg(short, long, value_enum, default_value_t = ExtractMode::Recipe)]
        mode: ExtractMode,
    },
    /// List recipe URLs found in a sitemap
    Discover {
        sitemap: String,
        /// Regex a URL must match to count as a recipe page
        #[arg(short, long, default_value = sitemap::DEFAULT_RECIPE_PATTERN)]
        pattern: String,
    },
    /// Show stored recipes
    List {
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Show import statistics
    Stats,
    /// Merge the ingredients of stored recipes into one shopping list
    ShoppingList {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Calorie needs of a household (JSON array of family members)
    Calories {
        #[arg(short, long)]
        family: PathBuf,
        /// Split a meal of this many kcal across the household
        #[arg(long)]
        meal: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let result = match cli.command {
        Commands::Import {
            url,
            mode,
            save,
            json,
        } => {
            let service = ImportService::new(fetch::build_fetcher(&settings)?);
            let result = service.import(&url, mode).await;
            if save {
                let conn = db::connect(&settings.db_path)?;
                db::init_schema(&conn)?;
                match (&result.data, &result.error) {
                    (Some(data), _) => {
                        let id = db::save_recipe(&conn, &url, mode, data)?;
                        eprintln!("Saved as #{}", id);
                    }
                    (None, error) => {
                        db::log_failure(&conn, &url, error.as_deref().unwrap_or("unknown error"))?
                    }
                }
            }
            print_result(&result, json)?;
            if result.success {
                Ok(())
            } else {
                Err(anyhow::anyhow!("Import failed"))
            }
        }
        Commands::Batch { file, mode, limit } => {
            let mut urls = read_url_list(&file)?;
            if let Some(n) = limit {
                urls.truncate(n);
            }
            if urls.is_empty() {
                println!("No URLs in {}.", file.display());
                return Ok(());
            }
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let service = Arc::new(ImportService::new(fetch::build_fetcher(&settings)?));

            println!("Importing {} pages (streaming to DB)...", urls.len());
            let stats =
                import::run_batch(&conn, service, urls, mode, settings.concurrency).await?;
            println!(
                "Done: {} imported ({} ok, {} errors).",
                stats.total, stats.ok, stats.errors
            );
            if stats.unsaved > 0 {
                println!("{} results could not be stored, see log.", stats.unsaved);
            }
            Ok(())
        }
        Commands::Extract { files, url, mode } => {
            let results = extract_files(&files, &url, mode);
            for (path, result) in files.iter().zip(results) {
                println!("== {}", path.display());
                match result {
                    Ok(r) => print_result(&r, false)?,
                    Err(e) => println!("  error: {:#}", e),
                }
            }
            Ok(())
        }
        Commands::Discover { sitemap, pattern } => {
            let fetcher = fetch::build_fetcher(&settings)?;
            let urls = sitemap::discover_recipe_urls(&fetcher, &sitemap, &pattern).await?;
            for u in &urls {
                println!("{}", u);
            }
            eprintln!("{} recipe URLs", urls.len());
            Ok(())
        }
        Commands::List { category, limit } => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let rows = db::list_recipes(&conn, category.as_deref(), limit)?;
            if rows.is_empty() {
                println!("No recipes stored. Run 'import --save' or 'batch' first.");
                return Ok(());
            }

            println!(
                "{:>4} | {:<32} | {:<12} | {:<6} | {:<12} | {:>5}",
                "#", "Title", "Category", "Mode", "Time", "Serv"
            );
            println!("{}", "-".repeat(88));
            for r in &rows {
                let time = r.cooking_time.as_deref().filter(|t| !t.is_empty()).unwrap_or("-");
                let serv = r
                    .servings
                    .filter(|&n| n > 0)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "-".into());
                println!(
                    "{:>4} | {:<32} | {:<12} | {:<6} | {:<12} | {:>5}",
                    r.id,
                    truncate(&r.title, 32),
                    truncate(&r.category, 12),
                    r.mode,
                    truncate(time, 12),
                    serv
                );
            }
            println!("\n{} recipes", rows.len());
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Total:    {}", s.total);
            println!("Recipes:  {}", s.recipes);
            println!("News:     {}", s.news);
            println!("Failures: {}", s.failures);
            if !s.categories.is_empty() {
                println!("\n--- Categories ---");
                for (name, n) in &s.categories {
                    println!("  {:<16} {}", name, n);
                }
            }
            Ok(())
        }
        Commands::ShoppingList { ids } => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let stored = db::fetch_recipes(&conn, &ids)?;
            if stored.is_empty() {
                println!("None of the given ids exist.");
                return Ok(());
            }
            let drafts: Vec<RecipeDraft> = stored
                .iter()
                .map(|r| RecipeDraft::from_extracted(&r.data))
                .collect();
            for (r, d) in stored.iter().zip(&drafts) {
                println!("#{} {} ({}, {} người)", r.id, d.title, d.cooking_time, d.servings);
            }
            println!();
            for item in recipe::shopping_list(&drafts) {
                if item.count > 1 {
                    println!("[ ] {}  (x{}: {})", item.item, item.count, item.recipes.join(", "));
                } else {
                    println!("[ ] {}", item.item);
                }
            }
            Ok(())
        }
        Commands::Calories { family, meal } => {
            let raw = std::fs::read_to_string(&family)
                .with_context(|| format!("Failed to read {}", family.display()))?;
            let members: Vec<calories::FamilyMember> =
                serde_json::from_str(&raw).context("Invalid family JSON")?;

            println!(
                "{:<16} | {:>8} | {:>8} | {:>9} | {:>5} | {:>6} | {:>5}",
                "Name", "BMR", "TDEE", "Breakfast", "Lunch", "Dinner", "Snack"
            );
            println!("{}", "-".repeat(76));
            for m in &members {
                let tdee = calories::tdee(m);
                let split = calories::daily_meal_split(tdee);
                println!(
                    "{:<16} | {:>8.0} | {:>8.0} | {:>9} | {:>5} | {:>6} | {:>5}",
                    truncate(&m.name, 16),
                    calories::bmr(m),
                    tdee,
                    split.breakfast,
                    split.lunch,
                    split.dinner,
                    split.snacks
                );
            }

            if let Some(kcal) = meal {
                println!("\n--- Meal of {:.0} kcal ---", kcal);
                for share in calories::distribute_meal_calories(&members, kcal) {
                    println!(
                        "  {:<16} {:>5} kcal ({}%)",
                        truncate(&share.name, 16),
                        share.calories,
                        share.percentage
                    );
                }
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn print_result(result: &ImportResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    let Some(data) = &result.data else {
        println!("  error: {}", result.error.as_deref().unwrap_or("unknown error"));
        return Ok(());
    };

    let draft = RecipeDraft::from_extracted(data);
    println!("Title:     {}", draft.title);
    println!("Category:  {}", draft.category);
    if !draft.author.is_empty() {
        println!("Author:    {}", draft.author);
    }
    if !draft.image.is_empty() {
        println!("Image:     {}", draft.image);
    }
    if data.content.is_some() {
        println!("\n{}", draft.description);
        return Ok(());
    }
    println!("Time:      {}", draft.cooking_time);
    println!("Servings:  {}", draft.servings);
    if !draft.description.is_empty() {
        println!("\n{}", draft.description);
    }
    if !draft.ingredients.is_empty() {
        println!("\nNguyên liệu:");
        for i in &draft.ingredients {
            println!("  - {}", i);
        }
    }
    if !draft.steps.is_empty() {
        println!("\nCách làm:");
        for (n, s) in draft.steps.iter().enumerate() {
            println!("  {}. {}", n + 1, s);
        }
    }
    Ok(())
}

/// Parse saved pages in parallel; each file is independent.
fn extract_files(
    files: &[PathBuf],
    url: &str,
    mode: ExtractMode,
) -> Vec<anyhow::Result<ImportResult>> {
    use rayon::prelude::*;

    files
        .par_iter()
        .map(|path| {
            let html = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(import::import_html(&html, url, mode))
        })
        .collect()
}

fn read_url_list(path: &Path) -> anyhow::Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
