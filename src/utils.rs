use chrono::format::{Item, StrftimeItems};
use chrono::{Local, NaiveDateTime, TimeZone};
use directories::{BaseDirs, ProjectDirs};
use std::fmt::Write;
use std::path::PathBuf;

/// Display format for entry timestamps, e.g. "Monday, 1 January 2024, 12:00:00 PM"
pub const DEFAULT_DATETIME_FORMAT: &str = "%A, %-d %B %Y, %I:%M:%S %p";

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    fn app_name(self) -> &'static str {
        match self {
            Profile::Dev => "diary-dev",
            Profile::Prod => "diary",
        }
    }
}

/// Get the configuration directory path
/// If profile is Dev, uses "diary-dev" instead of "diary"
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "diary", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path (where diaries and indexes live)
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "diary", profile.app_name())
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Current wall-clock time as a Unix timestamp (seconds)
pub fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Check that a strftime format contains only specifiers chrono understands
pub fn is_valid_datetime_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Format a Unix timestamp in local time.
/// Out-of-range timestamps and unusable formats fall back to the raw number.
pub fn format_timestamp(timestamp: i64, format: &str) -> String {
    let Some(datetime) = Local.timestamp_opt(timestamp, 0).earliest() else {
        return timestamp.to_string();
    };
    let mut formatted = String::new();
    match write!(formatted, "{}", datetime.format(format)) {
        Ok(()) => formatted,
        Err(_) => timestamp.to_string(),
    }
}

/// Parse a display string produced by `format_timestamp` back into a Unix timestamp
pub fn parse_display_datetime(display: &str, format: &str) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(display, format).ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|datetime| datetime.timestamp())
}

/// Split user tag input on ", " (the separator the prompt asks for).
/// Blank pieces are dropped; empty input yields no tags.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(", ")
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
