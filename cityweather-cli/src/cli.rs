use std::{fmt, path::Path};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use cityweather_core::{
    Config, TimezoneCatalog, TimezoneId, TimezoneResolver, config::API_KEY_ENV, current_time_in,
    lookup_city, provider::is_usable_api_key, provider_from_config,
};
use inquire::{
    CustomType, CustomUserError, Password, PasswordDisplayMode, Select, Text, validator::Validation,
};
use tracing::{debug, info};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "City weather and timezone CLI")]
pub struct Cli {
    /// OpenWeatherMap API key; takes precedence over WEATHER_API_KEY and the config file.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// More log output on stderr (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively store the API key, default timezone and timeout.
    Configure,

    /// Show weather and local time for a city.
    Show {
        /// City name, e.g. "Mumbai" or "New York".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,

        /// Also show the current time in this timezone.
        #[arg(long, conflicts_with = "pick_zone")]
        zone: Option<String>,

        /// Pick the extra timezone interactively.
        #[arg(long)]
        pick_zone: bool,

        /// Restrict the timezones offered, e.g. "Asia" or "america".
        #[arg(long)]
        filter: Option<String>,

        /// Print the provider's raw JSON payload.
        #[arg(long)]
        raw: bool,
    },

    /// List known timezones.
    Zones {
        /// Case-insensitive substring to filter by.
        #[arg(long)]
        filter: Option<String>,
    },

    /// Show the current time in a timezone.
    Time {
        /// IANA timezone name, e.g. "Europe/Paris".
        zone: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                city,
                zone,
                pick_zone,
                filter,
                raw,
            } => {
                let config = load_config(
                    &Config::config_file_path()?,
                    std::env::var(API_KEY_ENV).ok(),
                    self.api_key,
                )?;
                let extra = match zone {
                    Some(name) => ZoneChoice::Named(name),
                    None => ZoneChoice::Filtered {
                        filter: filter.unwrap_or_default(),
                        interactive: pick_zone,
                    },
                };
                show(&config, &city.join(" "), extra, raw).await
            }
            Command::Zones { filter } => {
                let config = Config::load()?;
                let filtered = TimezoneCatalog::all()
                    .filter(filter.as_deref().unwrap_or(""), config.default_timezone_id()?);

                if filtered.zones.is_empty() {
                    bail!("No timezones match the filter");
                }
                print!("{}", render::zone_list(&filtered));
                Ok(())
            }
            Command::Time { zone } => {
                let time = current_time_in(&zone)?;
                println!("{}", render::zone_time(TimezoneId::from(time.timezone()), &time));
                Ok(())
            }
        }
    }
}

/// Config file, then `WEATHER_API_KEY`, then `--api-key`; later sources win.
fn load_config(
    path: &Path,
    env_api_key: Option<String>,
    cli_api_key: Option<String>,
) -> anyhow::Result<Config> {
    let config = Config::load_with_env(path, env_api_key)?.with_api_key_override(cli_api_key);
    debug!(path = %path.display(), timeout_secs = config.timeout_secs, "configuration loaded");
    Ok(config)
}

/// How the additional timezone for `show` is chosen.
#[derive(Debug, Clone, PartialEq)]
enum ZoneChoice {
    Named(String),
    Filtered { filter: String, interactive: bool },
}

async fn show(config: &Config, city: &str, extra: ZoneChoice, raw: bool) -> anyhow::Result<()> {
    if city.trim().is_empty() {
        bail!("Please enter a city name");
    }

    let provider = provider_from_config(config)?;
    let default_zone = config.default_timezone_id()?;
    let resolver = TimezoneResolver::new(default_zone);

    info!(city = city.trim(), "fetching weather data");
    // A timezone fallback is reported by the resolver's own warning.
    let report = lookup_city(provider.as_ref(), &resolver, city).await?;

    print!("{}", render::report(&report));
    println!();

    match extra {
        ZoneChoice::Named(name) => {
            let time = current_time_in(&name)?;
            println!("{}", render::zone_time(TimezoneId::from(time.timezone()), &time));
        }
        ZoneChoice::Filtered {
            filter,
            interactive,
        } => {
            let filtered = TimezoneCatalog::all().filter(&filter, default_zone);

            let picked = if interactive && !filtered.zones.is_empty() {
                let options: Vec<ZoneOption> =
                    filtered.zones.iter().copied().map(ZoneOption).collect();
                let choice = Select::new("Select timezone:", options)
                    .with_starting_cursor(filtered.selected.unwrap_or(0))
                    .with_page_size(15)
                    .prompt()
                    .context("Timezone selection cancelled")?;
                Some(choice.0)
            } else {
                filtered.selected_zone()
            };

            match picked {
                Some(zone) => println!("{}", render::zone_time(zone, &zone.now())),
                None => eprintln!("No timezones match '{filter}'"),
            }
        }
    }

    println!();
    print!("{}", render::location(&report.reading));

    if raw {
        println!();
        println!("{}", serde_json::to_string_pretty(&report.raw)?);
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_from(&Config::config_file_path()?)?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_help_message("Get a free API key at https://openweathermap.org/api")
        .prompt()?;

    if !is_usable_api_key(&api_key) {
        bail!("Please enter a valid API key");
    }

    let default_timezone = Text::new("Default timezone:")
        .with_default(&config.default_timezone)
        .with_validator(|input: &str| {
            Ok::<_, CustomUserError>(match TimezoneId::parse(input) {
                Ok(_) => Validation::Valid,
                Err(e) => Validation::Invalid(e.to_string().into()),
            })
        })
        .prompt()?;

    let timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.timeout_secs.max(1))
        .with_error_message("Please enter a whole number of seconds")
        .with_validator(validate_timeout)
        .prompt()?;

    config.api_key = Some(api_key.trim().to_string());
    config.default_timezone = default_timezone;
    config.timeout_secs = timeout_secs;

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

/// A zero timeout would fail every request immediately.
fn validate_timeout(secs: &u64) -> Result<Validation, CustomUserError> {
    Ok(if *secs >= 1 {
        Validation::Valid
    } else {
        Validation::Invalid("Timeout must be at least 1 second".into())
    })
}

/// Select entry showing the zone's display name.
struct ZoneOption(TimezoneId);

impl fmt::Display for ZoneOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.display_name())
    }
}
