use crate::api::{DirectoryClient, FeedTarget, WaqiClient};
use crate::cli::prompts::{self, MenuAction};
use crate::cli::{render_dashboard, ChartStyle, SessionState};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::CityDirectory;
use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::info;

/// Track the Air Quality Index of any city in the world using the WAQI API.
///
/// Without a subcommand an interactive dashboard is started.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Chart style for both charts (overrides AQI_CHART_STYLE)
    #[arg(long, value_enum, global = true)]
    pub chart: Option<ChartStyle>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the current AQI once and print the dashboard
    Check(CheckArgs),

    /// List the country codes known to the city directory
    Countries,

    /// List the cities of one country
    Cities(CitiesArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// City name as understood by the provider (e.g. "Delhi")
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub city: Option<String>,

    /// Latitude of the place; the nearest station is used
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the place
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

impl CheckArgs {
    pub fn target(&self) -> Result<FeedTarget> {
        match (&self.city, self.lat, self.lon) {
            (Some(city), _, _) if !city.trim().is_empty() => Ok(FeedTarget::City(city.clone())),
            (_, Some(latitude), Some(longitude)) => Ok(FeedTarget::Geo {
                latitude,
                longitude,
            }),
            _ => Err(AppError::Cli(
                "Provide either --city or both --lat and --lon".to_string(),
            )),
        }
    }
}

#[derive(Args, Debug)]
pub struct CitiesArgs {
    /// 2-letter ISO country code (e.g. IN, GB, US)
    #[arg(short, long)]
    pub country: String,
}

/// Location picked in the interactive dashboard.
#[derive(Debug, Clone, PartialEq)]
struct Location {
    country: String,
    city: String,
    /// Directory position of the city, when the source has one.
    position: Option<(f64, f64)>,
}

impl Location {
    fn target(&self) -> FeedTarget {
        FeedTarget::City(self.city.clone())
    }

    fn nearest_station_target(&self) -> Option<FeedTarget> {
        self.position.map(|(latitude, longitude)| FeedTarget::Geo {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.country)
    }
}

/// CLI application
pub struct App {
    config: Config,
    waqi: WaqiClient,
    directory_client: DirectoryClient,
    directory: OnceCell<CityDirectory>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let waqi = WaqiClient::new(config.waqi_token.clone(), &config.waqi_base_url);
        let directory_client = DirectoryClient::new(&config.city_directory_url);
        Self {
            config,
            waqi,
            directory_client,
            directory: OnceCell::new(),
        }
    }

    /// The city directory, downloaded on first use and kept for the life of the process.
    pub async fn directory(&self) -> Result<&CityDirectory> {
        self.directory
            .get_or_try_init(|| self.directory_client.fetch())
            .await
    }

    /// Fetches `target` and turns the outcome into the next dashboard state.
    pub async fn fetch_state(&self, target: &FeedTarget) -> SessionState {
        let fetched = self.waqi.fetch_feed(target).await;
        SessionState::from_fetch(&target.to_string(), fetched)
    }

    /// Run the CLI application
    pub async fn run(&self, cli: Cli) -> Result<()> {
        let style = cli.chart.unwrap_or(self.config.chart_style);

        match cli.command {
            Some(Commands::Check(args)) => {
                let target = args.target()?;
                let state =
                    with_spinner(&format!("Fetching AQI for {}...", target), self.fetch_state(&target))
                        .await?;
                println!("{}", render_dashboard(&state, style));
            },
            Some(Commands::Countries) => {
                let directory = with_spinner("Loading city directory...", self.directory()).await??;
                println!("{}", directory.countries().join("\n"));
            },
            Some(Commands::Cities(args)) => {
                let cities = self.list_cities(&args.country).await?;
                println!("{}", cities.join("\n"));
            },
            None => self.interactive(style).await?,
        }

        Ok(())
    }

    async fn list_cities(&self, country: &str) -> Result<Vec<String>> {
        let country_code = country.trim().to_uppercase();
        let directory = with_spinner("Loading city directory...", self.directory()).await??;
        let cities = directory.cities(&country_code);
        if cities.is_empty() {
            return Err(AppError::Cli(format!(
                "Invalid country code '{}'. Use `countries` to list the known codes.",
                country
            )));
        }
        Ok(cities)
    }

    /// The dashboard loop: the view is re-rendered from the session state after every action.
    async fn interactive(&self, mut style: ChartStyle) -> Result<()> {
        println!(
            "{}",
            "🌍 Air Quality Index (AQI) Tracker".cyan().bold()
        );
        println!("Track AQI of any city in the world (India, UK, US, etc.) using the free WAQI API.\n");

        let directory = with_spinner("Loading city directory...", self.directory()).await??;

        let Some(mut location) = choose_location(directory, None)? else {
            println!("{}", "No location selected. Goodbye!".green());
            return Ok(());
        };
        let mut state = SessionState::Empty;

        loop {
            println!("\n{}", render_dashboard(&state, style));

            match prompts::prompt_action(&location.to_string())? {
                MenuAction::CheckAqi => {
                    state = with_spinner(
                        &format!("Fetching AQI for {}...", location),
                        self.fetch_state(&location.target()),
                    )
                    .await?;
                },
                MenuAction::CheckNearestStation => match location.nearest_station_target() {
                    Some(target) => {
                        state = with_spinner(
                            &format!("Fetching AQI near {}...", location),
                            self.fetch_state(&target),
                        )
                        .await?;
                    },
                    None => println!(
                        "{}",
                        format!("No coordinates known for {}.", location).yellow()
                    ),
                },
                MenuAction::ChangeLocation => {
                    if let Some(picked) = choose_location(directory, Some(&location))? {
                        info!("Location changed to {}", picked);
                        location = picked;
                    }
                },
                MenuAction::ChangeChartStyle => {
                    if let Some(picked) = prompts::prompt_chart_style(style)? {
                        style = picked;
                    }
                },
                MenuAction::Exit => {
                    println!("{}", "Exiting application. Goodbye!".green());
                    break;
                },
            }

            println!("\n---\n");
        }

        Ok(())
    }
}

/// Country first, then a city of that country.
fn choose_location(directory: &CityDirectory, current: Option<&Location>) -> Result<Option<Location>> {
    let countries = directory.countries();
    let Some(country) = prompts::prompt_country(&countries, current.map(|l| l.country.as_str()))?
    else {
        return Ok(None);
    };

    let cities = directory.cities(&country);
    let current_city = current
        .filter(|l| l.country == country)
        .map(|l| l.city.as_str());
    let Some(city) = prompts::prompt_city(&cities, current_city)? else {
        return Ok(None);
    };

    let position = directory
        .lookup(&country, &city)
        .and_then(|entry| entry.latitude.zip(entry.longitude));
    Ok(Some(Location {
        country,
        city,
        position,
    }))
}

/// Shows a spinner on stderr while `fut` runs.
async fn with_spinner<F, T>(message: &str, fut: F) -> Result<T>
where
    F: Future<Output = T>,
{
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let output = fut.await;
    spinner.finish_and_clear();
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SeverityBand;
    use crate::cli::Notice;
    use mockito::{Matcher, ServerGuard};
    use serde_json::json;

    const DIRECTORY_BODY: &str = r#"[
        {"country":"IN","name":"Mumbai","lat":"19.07283","lng":"72.88261"},
        {"country":"IN","name":"Delhi","lat":"28.65195","lng":"77.23149"},
        {"country":"GB","name":"London","lat":"51.50853","lng":"-0.12574"}
    ]"#;

    fn test_config(server: &ServerGuard) -> Config {
        Config {
            waqi_token: "test_token".to_string(),
            waqi_base_url: server.url(),
            city_directory_url: format!("{}/cities.json", server.url()),
            chart_style: ChartStyle::Bar,
            log_dir: None,
        }
    }

    #[tokio::test]
    async fn test_directory_is_fetched_once() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/cities.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(DIRECTORY_BODY)
            .expect(1)
            .create_async()
            .await;

        let app = App::new(test_config(&server));
        assert_eq!(app.directory().await?.cities("IN"), vec!["Delhi", "Mumbai"]);
        assert_eq!(app.directory().await?.countries(), vec!["GB", "IN"]);

        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_directory_failure_is_fatal_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/cities.json")
            .with_status(500)
            .create_async()
            .await;

        let app = App::new(test_config(&server));
        assert!(matches!(app.directory().await, Err(AppError::Directory(_))));
    }

    #[tokio::test]
    async fn test_list_cities_rejects_unknown_country() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/cities.json")
            .with_status(200)
            .with_body(DIRECTORY_BODY)
            .create_async()
            .await;

        let app = App::new(test_config(&server));
        assert_eq!(app.list_cities("in").await?, vec!["Delhi", "Mumbai"]);
        match app.list_cities("XX").await {
            Err(AppError::Cli(msg)) => assert!(msg.contains("Invalid country code")),
            other => panic!("Expected CliError, got {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_state_loaded() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/feed/Delhi/")
            .match_query(Matcher::UrlEncoded("token".into(), "test_token".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"status": "ok", "data": {
                    "aqi": 275,
                    "city": {"name": "Delhi", "geo": [28.65, 77.23]},
                    "iaqi": {"pm25": {"v": 275}}
                }})
                .to_string(),
            )
            .create_async()
            .await;

        let app = App::new(test_config(&server));
        let state = app
            .fetch_state(&FeedTarget::City("Delhi".to_string()))
            .await;

        match state {
            SessionState::Loaded(snapshot) => {
                assert_eq!(snapshot.band, SeverityBand::VeryUnhealthy);
                assert!(snapshot.trend.is_none());
            },
            other => panic!("Expected Loaded, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_state_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/feed/Atlantis/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status":"error","data":"Unknown station"}"#)
            .create_async()
            .await;

        let app = App::new(test_config(&server));
        let state = app
            .fetch_state(&FeedTarget::City("Atlantis".to_string()))
            .await;

        assert!(matches!(state, SessionState::Failed(Notice::NoData { .. })));
    }

    #[tokio::test]
    async fn test_fetch_state_unreachable_provider() {
        let server = mockito::Server::new_async().await;
        let mut config = test_config(&server);
        // Nothing listens on port 9 (discard) in the test environment.
        config.waqi_base_url = "http://127.0.0.1:9".to_string();

        let app = App::new(config);
        let state = app
            .fetch_state(&FeedTarget::City("Delhi".to_string()))
            .await;

        assert!(matches!(state, SessionState::Failed(Notice::Unavailable(_))));
    }

    #[test]
    fn test_location_targets() {
        let located = Location {
            country: "IN".to_string(),
            city: "Delhi".to_string(),
            position: Some((28.65, 77.23)),
        };
        assert_eq!(located.target(), FeedTarget::City("Delhi".to_string()));
        assert_eq!(
            located.nearest_station_target(),
            Some(FeedTarget::Geo {
                latitude: 28.65,
                longitude: 77.23
            })
        );
        assert_eq!(located.to_string(), "Delhi, IN");

        let unlocated = Location {
            position: None,
            ..located
        };
        assert_eq!(unlocated.nearest_station_target(), None);
    }

    #[test]
    fn test_check_args_target() {
        let by_city = CheckArgs {
            city: Some("Delhi".to_string()),
            lat: None,
            lon: None,
        };
        assert_eq!(
            by_city.target().unwrap(),
            FeedTarget::City("Delhi".to_string())
        );

        let by_geo = CheckArgs {
            city: None,
            lat: Some(-33.86),
            lon: Some(151.2),
        };
        assert_eq!(
            by_geo.target().unwrap(),
            FeedTarget::Geo {
                latitude: -33.86,
                longitude: 151.2
            }
        );

        let neither = CheckArgs {
            city: None,
            lat: None,
            lon: None,
        };
        assert!(matches!(neither.target(), Err(AppError::Cli(_))));
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["aqi-tracker", "check", "--city", "Delhi", "--chart", "area"])
            .unwrap();
        assert_eq!(cli.chart, Some(ChartStyle::Area));
        assert!(matches!(cli.command, Some(Commands::Check(_))));

        let cli = Cli::try_parse_from(["aqi-tracker"]).unwrap();
        assert!(cli.command.is_none());

        assert!(Cli::try_parse_from(["aqi-tracker", "check", "--lat", "10.0"]).is_err());
        assert!(
            Cli::try_parse_from(["aqi-tracker", "check", "--city", "X", "--lat", "1", "--lon", "2"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["aqi-tracker", "--chart", "donut"]).is_err());
    }
}
