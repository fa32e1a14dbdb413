use crate::components::room_summary::MeridiemPolicy;
use crate::error::{config_error, env_error, AppResult, Error};
use chrono_tz::Tz;
use dotenvy::dotenv;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Timezone every summary is computed in
pub const DEFAULT_TIMEZONE: &str = "US/Pacific";

/// Room shown by a display that has no ROOM_NAME override
pub const DEFAULT_ROOM_NAME: &str = "oak";

/// Default location of the room name to calendar id table
pub const DEFAULT_ROOMS_FILE: &str = "config/rooms.toml";

/// Default location of the stored OAuth token
pub const DEFAULT_TOKEN_PATH: &str = ".credentials/calendar-token.json";

/// Paths the summary server answers itself, so no room may use them
pub const RESERVED_ROOM_NAMES: &[&str] = &["health"];

/// Case-insensitive mapping from room name to provider calendar id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomDirectory {
    rooms: HashMap<String, String>,
}

impl RoomDirectory {
    /// Build a directory, folding room names to lowercase
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let rooms = entries
            .into_iter()
            .map(|(name, id)| (name.as_ref().to_lowercase(), id.into()))
            .collect();
        Self { rooms }
    }

    /// Parse a TOML table of `room = "calendar id"` pairs
    pub fn from_toml(content: &str) -> AppResult<Self> {
        let table: HashMap<String, String> = toml::from_str(content)?;
        if table.is_empty() {
            return Err(config_error("Rooms file does not define any rooms"));
        }
        if let Some(name) = table
            .keys()
            .find(|name| RESERVED_ROOM_NAMES.contains(&name.to_lowercase().as_str()))
        {
            return Err(config_error(&format!(
                "Room name '{}' is reserved by the server",
                name
            )));
        }
        Ok(Self::new(table))
    }

    /// Look up the calendar id for a room
    pub fn resolve(&self, room: &str) -> AppResult<&str> {
        self.rooms
            .get(&room.to_lowercase())
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownRoom(room.to_string()))
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

/// Configuration for the summary server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Google Calendar API client ID
    pub google_client_id: String,
    /// Google Calendar API client secret
    pub google_client_secret: String,
    /// File holding the OAuth token
    pub token_path: PathBuf,
    /// Room name to calendar id table
    pub rooms: RoomDirectory,
    /// Fixed timezone for "now" and "end of today"
    pub timezone: Tz,
    /// How 24-hour times are labelled am/pm
    pub meridiem_policy: MeridiemPolicy,
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Port the HTTP server listens on
    pub port: u16,
}

impl ServerConfig {
    /// Load configuration from environment and the rooms file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
        let google_client_secret =
            env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;

        let token_path = env::var("GOOGLE_TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKEN_PATH));

        let rooms_file =
            env::var("ROOMS_FILE").unwrap_or_else(|_| String::from(DEFAULT_ROOMS_FILE));
        let content = fs::read_to_string(&rooms_file)
            .map_err(|e| config_error(&format!("Failed to read {}: {}", rooms_file, e)))?;
        let rooms = RoomDirectory::from_toml(&content)?;

        let timezone = parse_timezone(
            &env::var("TIMEZONE").unwrap_or_else(|_| String::from(DEFAULT_TIMEZONE)),
        )?;

        let meridiem_policy = match env::var("MERIDIEM_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => MeridiemPolicy::default(),
        };

        let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| String::from("0.0.0.0"));
        let port = env_or("PORT", 5000u16)?;

        Ok(ServerConfig {
            google_client_id,
            google_client_secret,
            token_path,
            rooms,
            timezone,
            meridiem_policy,
            bind_address,
            port,
        })
    }
}

/// Configuration for the display agent
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub wifi_ssid: String,
    pub wifi_password: String,
    /// Base URL of the summary server
    pub server_address: Url,
    /// Room this display belongs to
    pub room_name: String,
    /// Deep sleep length between wake cycles
    pub sleep_interval: Duration,
    /// Give up joining the network after this long
    pub connect_timeout: Duration,
    /// First delay between connection polls, doubled on each poll
    pub connect_poll_initial: Duration,
    /// Upper bound for the connection poll delay
    pub connect_poll_max: Duration,
    /// Request timeout for the summary fetch
    pub fetch_timeout: Duration,
    /// Keep the last rendered summary here across sleeps; None keeps it in memory only
    pub state_path: Option<PathBuf>,
    /// TrueType font for the PNG surface
    pub font_path: Option<PathBuf>,
    /// Where the PNG surface writes each frame
    pub output_path: PathBuf,
}

impl AgentConfig {
    /// Build a config with the default timings
    pub fn new(wifi_ssid: &str, wifi_password: &str, server_address: Url, room_name: &str) -> Self {
        Self {
            wifi_ssid: wifi_ssid.to_string(),
            wifi_password: wifi_password.to_string(),
            server_address,
            room_name: room_name.to_string(),
            sleep_interval: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(15),
            connect_poll_initial: Duration::from_millis(250),
            connect_poll_max: Duration::from_secs(2),
            fetch_timeout: Duration::from_secs(10),
            state_path: None,
            font_path: None,
            output_path: PathBuf::from("display.png"),
        }
    }

    /// Load configuration from environment
    pub fn load() -> AppResult<Self> {
        dotenv().ok();

        let wifi_ssid = env::var("WIFI_SSID").map_err(|_| env_error("WIFI_SSID"))?;
        let wifi_password = env::var("WIFI_PASS").map_err(|_| env_error("WIFI_PASS"))?;
        let server_address = env::var("SERVER_ADDRESS").map_err(|_| env_error("SERVER_ADDRESS"))?;
        let server_address = Url::parse(&server_address)
            .map_err(|e| config_error(&format!("Invalid SERVER_ADDRESS: {}", e)))?;
        let room_name = env::var("ROOM_NAME").unwrap_or_else(|_| String::from(DEFAULT_ROOM_NAME));

        let mut config = Self::new(&wifi_ssid, &wifi_password, server_address, &room_name);
        config.sleep_interval = nonzero_secs("SLEEP_SECONDS", env_or("SLEEP_SECONDS", 60u64)?)?;
        config.connect_timeout = nonzero_secs(
            "CONNECT_TIMEOUT_SECONDS",
            env_or("CONNECT_TIMEOUT_SECONDS", 15u64)?,
        )?;
        config.fetch_timeout = nonzero_secs(
            "FETCH_TIMEOUT_SECONDS",
            env_or("FETCH_TIMEOUT_SECONDS", 10u64)?,
        )?;
        config.state_path = env::var("AGENT_STATE_PATH").ok().map(PathBuf::from);
        config.font_path = env::var("DISPLAY_FONT_PATH").ok().map(PathBuf::from);
        if let Ok(path) = env::var("DISPLAY_OUTPUT_PATH") {
            config.output_path = PathBuf::from(path);
        }

        Ok(config)
    }
}

/// Parse an IANA timezone name
pub fn parse_timezone(name: &str) -> AppResult<Tz> {
    name.parse::<Tz>()
        .map_err(|e| config_error(&format!("Invalid TIMEZONE '{}': {}", name, e)))
}

/// Interval setting that must be at least one second
fn nonzero_secs(var: &str, secs: u64) -> AppResult<Duration> {
    if secs == 0 {
        return Err(config_error(&format!("{} must be greater than zero", var)));
    }
    Ok(Duration::from_secs(secs))
}

/// Read an optional variable, falling back to a default when unset
fn env_or<T: FromStr>(var: &str, default: T) -> AppResult<T> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| config_error(&format!("Invalid {} value: {}", var, value))),
        Err(_) => Ok(default),
    }
}
