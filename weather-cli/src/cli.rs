use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tracing::debug;
use weather_core::{Config, HttpBackend, WeatherView, config::OPENWEATHER};

use crate::terminal::{TerminalPanel, TextChart, format_panel};

type TerminalView = WeatherView<HttpBackend, TerminalPanel, TextChart>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and today's hourly temperatures")]
pub struct Cli {
    /// Backend base URL; overrides the configured one for this run.
    #[arg(long, global = true)]
    pub backend: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set backend URL, default city and the OpenWeather key used by `weather-server`.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name; the configured default city when absent.
        city: Option<String>,
    },

    /// Show the default city, then prompt for more cities until Esc.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Show { city } => {
                if let Some(url) = self.backend {
                    config.set_backend_url(url);
                }
                let city = city.unwrap_or_else(|| config.default_city().to_string());

                let view = terminal_view(&config);
                view.render_clock();
                lookup(&view, &city).await;
                Ok(())
            }
            Command::Interactive => {
                if let Some(url) = self.backend {
                    config.set_backend_url(url);
                }
                interactive(&config).await
            }
        }
    }
}

fn terminal_view(config: &Config) -> TerminalView {
    debug!(backend = config.backend_url(), "using backend");
    WeatherView::new(
        HttpBackend::from_config(config),
        TerminalPanel::stderr(),
        TextChart::default(),
    )
}

async fn lookup(view: &TerminalView, city: &str) {
    let outcome = view.lookup_and_render(city).await;
    debug!(city, ?outcome, "lookup finished");

    let text = view.with_surface(|target, chart| format_panel(target.panel(), chart.current()));
    println!("{text}");
}

async fn interactive(config: &Config) -> anyhow::Result<()> {
    let view = terminal_view(config);
    view.render_clock();
    lookup(&view, config.default_city()).await;

    loop {
        let city = match Text::new("City:").with_help_message("Esc to quit").prompt() {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city"),
        };

        if city.trim().is_empty() {
            continue;
        }
        lookup(&view, &city).await;
    }

    Ok(())
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let current_backend = config.backend_url().to_string();
    let current_city = config.default_city().to_string();

    let backend = Text::new("Backend URL:")
        .with_default(&current_backend)
        .prompt()
        .context("Failed to read backend URL")?;

    let city = Text::new("Default city:")
        .with_default(&current_city)
        .prompt()
        .context("Failed to read default city")?;

    let api_key = Password::new("OpenWeather API key (blank keeps the current one):")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    config.set_backend_url(backend.trim().to_string());
    config.set_default_city(city.trim().to_string());
    if !api_key.trim().is_empty() {
        config.upsert_provider_api_key(OPENWEATHER, api_key.trim().to_string());
    }

    config.save()?;
    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );

    Ok(())
}
