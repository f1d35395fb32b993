use std::fmt;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dashboard_core::{
    Config, DeliveryOutcome, PageKind, PageRenderPlanner, RequestCoordinator, source_from_config,
};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "dashboard", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key and the default city.
    Configure,

    /// Render a single page.
    Show {
        /// One of: today, hourly, 10day, monthly, air, allergy.
        #[arg(default_value = "today", value_parser = parse_page)]
        page: PageKind,

        /// City to show; defaults to the configured city.
        #[arg(long)]
        city: Option<String>,

        /// Print the render descriptor as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Switch between pages and cities interactively.
    Browse {
        /// Starting city; defaults to the configured city.
        #[arg(long)]
        city: Option<String>,
    },
}

fn parse_page(value: &str) -> Result<PageKind, String> {
    PageKind::try_from(value).map_err(|e| e.to_string())
}

/// Works without an API key; weather pages then carry the configuration hint.
fn planner_from_config(config: &Config) -> anyhow::Result<PageRenderPlanner> {
    Ok(PageRenderPlanner::new(source_from_config(config)?))
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { page, city, json } => show(page, city, json).await,
            Command::Browse { city } => browse(city).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;
    let current_city = config.default_city().to_string();

    let api_key = Password::new("WeatherAPI.com key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    let city = Text::new("Default city:").with_default(&current_city).prompt()?;

    config.set_api_key(api_key);
    config.set_default_city(&city);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(page: PageKind, city: Option<String>, json: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    print!("{}", show_page(&config, page, city, json).await?);
    Ok(())
}

async fn show_page(
    config: &Config,
    page: PageKind,
    city: Option<String>,
    json: bool,
) -> anyhow::Result<String> {
    let city = city.unwrap_or_else(|| config.default_city().to_string());
    let planner = planner_from_config(config)?;

    let descriptor = planner.plan(page, &city).await;

    if json {
        let text = serde_json::to_string_pretty(&descriptor)
            .context("Failed to serialize render descriptor")?;
        Ok(format!("{text}\n"))
    } else {
        Ok(render::render(&descriptor))
    }
}

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    Page(PageKind),
    SearchCity,
    Quit,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuItem::Page(page) => f.write_str(render::page_title(*page)),
            MenuItem::SearchCity => f.write_str("Search city…"),
            MenuItem::Quit => f.write_str("Quit"),
        }
    }
}

fn menu(active: PageKind) -> Result<MenuItem, InquireError> {
    let mut items: Vec<MenuItem> = PageKind::all().iter().copied().map(MenuItem::Page).collect();
    items.push(MenuItem::SearchCity);
    items.push(MenuItem::Quit);

    let cursor = PageKind::all().iter().position(|p| *p == active).unwrap_or(0);
    Select::new("Page:", items).with_starting_cursor(cursor).prompt()
}

/// Esc and Ctrl-C end the session instead of failing it.
fn cancelled<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

async fn browse(city: Option<String>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let city = city.unwrap_or_else(|| config.default_city().to_string());
    let planner = planner_from_config(&config)?;
    let (coordinator, mut deliveries) = RequestCoordinator::new(planner, city);

    let mut pending = Some(coordinator.start());

    loop {
        if let Some(handle) = pending.take() {
            let outcome = handle.await.context("Render task failed")?;
            if outcome != DeliveryOutcome::Delivered {
                debug!(?outcome, "render not delivered");
            }
        }
        while let Ok(delivery) = deliveries.try_recv() {
            println!("{}", render::render_delivery(&delivery));
        }

        let active = coordinator.active_page();
        let Some(item) = cancelled(tokio::task::spawn_blocking(move || menu(active)).await?)? else {
            break;
        };

        match item {
            MenuItem::Page(page) => pending = Some(coordinator.navigate(page)),
            MenuItem::SearchCity => {
                let prompt = tokio::task::spawn_blocking(|| Text::new("City:").prompt()).await?;
                let Some(city) = cancelled(prompt)? else {
                    continue;
                };

                pending = coordinator.search(&city);
                if pending.is_none() {
                    println!("Please enter a city name.");
                }
            }
            MenuItem::Quit => break,
        }
    }

    Ok(())
}
