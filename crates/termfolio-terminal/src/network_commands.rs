//! Network-backed commands: github, projects, weather.
//!
//! The engine performs no I/O itself. Hosts hand the dispatcher a
//! [`DataService`]; each command validates its arguments synchronously and
//! then returns a [`Deferred`] job that performs the request off the UI
//! thread.

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use termfolio_types::error::Result;

use crate::interpreter::{Command, CommandOutput, Deferred, Environment};
use crate::scrollback::RecordOutput;

const GITHUB_API: &str = "https://api.github.com";
const WEATHER_API: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Longest repository description shown in the `projects` table.
const MAX_DESCRIPTION: usize = 50;

// ---------------------------------------------------------------------------
// Data service
// ---------------------------------------------------------------------------

/// HTTP response from a data service.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    /// HTTP status code (e.g. 200, 404).
    pub status_code: u16,
    /// Response headers, in the order received.
    pub headers: Vec<(String, String)>,
    /// Response body as bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Blocking HTTP transport supplied by the host.
///
/// Called from worker threads, never from the thread driving the REPL.
/// Transport failures (DNS, TLS, timeouts) are returned as `Err`; any
/// response the server actually sent, whatever its status, is `Ok`.
pub trait DataService: Send + Sync {
    fn http_get(&self, url: &str) -> Result<HttpResponse>;
}

/// Why a remote lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {code}")]
    Status { code: u16, message: Option<String> },

    #[error("bad response: {0}")]
    BadResponse(String),
}

type FetchResult<T> = std::result::Result<T, FetchError>;

/// Map a GitHub API response status to an error, if it is one.
///
/// A 403 only counts as rate limiting when GitHub says no requests remain.
pub fn classify_github(resp: &HttpResponse, subject: &str) -> Option<FetchError> {
    if resp.is_success() {
        return None;
    }
    let exhausted = resp
        .header("X-RateLimit-Remaining")
        .is_some_and(|v| v.trim() == "0");
    Some(match resp.status_code {
        404 => FetchError::NotFound(subject.to_string()),
        403 if exhausted => FetchError::RateLimited,
        429 => FetchError::RateLimited,
        code => FetchError::Status {
            code,
            message: service_message(resp),
        },
    })
}

/// The `message` field most JSON APIs put in error bodies.
fn service_message(resp: &HttpResponse) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<serde_json::Value>,
    }
    let body: ErrorBody = serde_json::from_slice(&resp.body).ok()?;
    match body.message? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::String(_) | serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn get(net: &dyn DataService, url: &str) -> FetchResult<HttpResponse> {
    // Query strings may carry credentials.
    log::debug!("GET {}", url.split('?').next().unwrap_or(url));
    net.http_get(url).map_err(|e| FetchError::Network(e.to_string()))
}

fn decode<T: DeserializeOwned>(resp: &HttpResponse) -> FetchResult<T> {
    serde_json::from_slice(&resp.body).map_err(|e| FetchError::BadResponse(e.to_string()))
}

fn fetch_github<T: DeserializeOwned>(
    net: &dyn DataService,
    url: &str,
    user: &str,
) -> FetchResult<T> {
    let resp = get(net, url)?;
    if let Some(err) = classify_github(&resp, user) {
        return Err(err);
    }
    decode(&resp)
}

/// Percent-encode a query parameter value (RFC 3986 unreserved set kept).
pub fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(b as char);
            },
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

fn reason_phrase(code: u16) -> &'static str {
    match code {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "",
    }
}

fn status_text(code: u16) -> String {
    match reason_phrase(code) {
        "" => code.to_string(),
        reason => format!("{code} {reason}"),
    }
}

fn no_service(cmd: &str) -> CommandOutput {
    CommandOutput::Text(format!("{cmd}: no network service available"))
}

// ---------------------------------------------------------------------------
// github
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GithubUser {
    #[serde(default)]
    login: String,
    followers: u64,
    following: u64,
    public_repos: u64,
    public_gists: u64,
}

pub(crate) struct GithubCmd;
impl Command for GithubCmd {
    fn name(&self) -> &str {
        "github"
    }
    fn description(&self) -> &str {
        "Displays my GitHub stats."
    }
    fn usage(&self) -> &str {
        "github"
    }
    fn category(&self) -> &str {
        "About Me"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let Some(net) = env.network else {
            return Ok(no_service(self.name()));
        };
        let net = Arc::clone(net);
        let user = env.config.github_username.clone();
        Ok(CommandOutput::Deferred(Deferred::new(
            "Loading GitHub stats...",
            move || github_stats(net.as_ref(), &user),
        )))
    }
}

fn github_stats(net: &dyn DataService, user: &str) -> RecordOutput {
    let url = format!("{GITHUB_API}/users/{}", percent_encode(user));
    match fetch_github::<GithubUser>(net, &url, user) {
        Ok(stats) => {
            let login = if stats.login.is_empty() {
                user
            } else {
                stats.login.as_str()
            };
            RecordOutput::Text(format!(
                "GitHub stats for {login}\n  Followers:    {}\n  Following:    {}\n  Public repos: {}\n  Public gists: {}",
                stats.followers, stats.following, stats.public_repos, stats.public_gists
            ))
        },
        Err(e) => {
            log::warn!("github: {e}");
            RecordOutput::Text(github_error_text(&e, user, "GitHub stats"))
        },
    }
}

/// User-visible text for a failed GitHub lookup of `what`.
fn github_error_text(err: &FetchError, user: &str, what: &str) -> String {
    match err {
        FetchError::NotFound(_) => format!("GitHub user '{user}' not found."),
        FetchError::RateLimited => {
            "GitHub API rate limit exceeded. Please try again later.".to_string()
        },
        FetchError::Status { code, .. } => {
            format!("Error fetching {what}: {}", status_text(*code))
        },
        FetchError::Network(_) | FetchError::BadResponse(_) | FetchError::MissingCredential(_) => {
            format!("Network error or unable to fetch {what}.")
        },
    }
}

// ---------------------------------------------------------------------------
// projects
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Repo {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    html_url: Option<String>,
}

pub(crate) struct ProjectsCmd;
impl Command for ProjectsCmd {
    fn name(&self) -> &str {
        "projects"
    }
    fn description(&self) -> &str {
        "Displays my projects."
    }
    fn usage(&self) -> &str {
        "projects"
    }
    fn category(&self) -> &str {
        "About Me"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let Some(net) = env.network else {
            return Ok(no_service(self.name()));
        };
        let net = Arc::clone(net);
        let user = env.config.github_username.clone();
        Ok(CommandOutput::Deferred(Deferred::new(
            "Loading projects...",
            move || project_table(net.as_ref(), &user),
        )))
    }
}

fn project_table(net: &dyn DataService, user: &str) -> RecordOutput {
    let url = format!("{GITHUB_API}/users/{}/repos", percent_encode(user));
    let repos = match fetch_github::<Vec<Repo>>(net, &url, user) {
        Ok(repos) => repos,
        Err(e) => {
            log::warn!("projects: {e}");
            return RecordOutput::Text(github_error_text(&e, user, "projects"));
        },
    };
    if repos.is_empty() {
        return RecordOutput::Text(format!("No public repositories found for {user}."));
    }

    let headers = ["Name", "Language", "Stars", "Forks", "Description", "URL"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let rows = repos
        .into_iter()
        .map(|r| {
            let link = r
                .html_url
                .unwrap_or_else(|| format!("https://github.com/{user}/{}", r.name));
            vec![
                r.name,
                r.language.unwrap_or_else(|| "-".to_string()),
                r.stargazers_count.to_string(),
                r.forks_count.to_string(),
                shorten(r.description.as_deref().unwrap_or(""), MAX_DESCRIPTION),
                link,
            ]
        })
        .collect();
    RecordOutput::Table { headers, rows }
}

fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

// ---------------------------------------------------------------------------
// weather
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct WeatherReport {
    name: String,
    main: WeatherMain,
    #[serde(default)]
    weather: Vec<WeatherCondition>,
    wind: WeatherWind,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct WeatherWind {
    speed: f64,
}

const WEATHER_FAILED: &str = "Error fetching weather data.";

pub(crate) struct WeatherCmd;
impl Command for WeatherCmd {
    fn name(&self) -> &str {
        "weather"
    }
    fn description(&self) -> &str {
        "Displays the weather for a location."
    }
    fn usage(&self) -> &str {
        "weather [location]"
    }
    fn category(&self) -> &str {
        "System"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        if args.is_empty() {
            return Ok(CommandOutput::Text(format!(
                "Please specify a location. Usage: {}",
                self.usage()
            )));
        }
        let Some(key) = env.config.weather_api_key.clone() else {
            return Ok(CommandOutput::Text(weather_error_text(
                &FetchError::MissingCredential("weather_api_key"),
            )));
        };
        let Some(net) = env.network else {
            return Ok(no_service(self.name()));
        };
        let net = Arc::clone(net);
        let location = args.join(" ");
        Ok(CommandOutput::Deferred(Deferred::new(
            "Loading weather...",
            move || weather_report(net.as_ref(), &location, &key),
        )))
    }
}

fn fetch_weather(net: &dyn DataService, location: &str, key: &str) -> FetchResult<WeatherReport> {
    let url = format!(
        "{WEATHER_API}?q={}&appid={}&units=metric",
        percent_encode(location),
        percent_encode(key)
    );
    let resp = get(net, &url)?;
    if !resp.is_success() {
        return Err(FetchError::Status {
            code: resp.status_code,
            message: service_message(&resp),
        });
    }
    decode(&resp)
}

fn weather_report(net: &dyn DataService, location: &str, key: &str) -> RecordOutput {
    match fetch_weather(net, location, key) {
        Ok(w) => {
            let description = w
                .weather
                .first()
                .map(|c| c.description.as_str())
                .unwrap_or("unknown");
            RecordOutput::Text(format!(
                "Weather in {}\n  Temperature: {}°C\n  Feels like:  {}°C\n  Humidity:    {}%\n  Wind speed:  {} m/s\n  Description: {description}",
                w.name, w.main.temp, w.main.feels_like, w.main.humidity, w.wind.speed
            ))
        },
        Err(e) => {
            log::warn!("weather: {e}");
            RecordOutput::Text(weather_error_text(&e))
        },
    }
}

fn weather_error_text(err: &FetchError) -> String {
    match err {
        FetchError::MissingCredential(_) => format!(
            "OpenWeatherMap API key not found. Set {} or weather_api_key in termfolio.toml.",
            termfolio_types::config::ENV_WEATHER_API_KEY
        ),
        FetchError::Status {
            message: Some(msg), ..
        } => msg.clone(),
        _ => WEATHER_FAILED.to_string(),
    }
}
