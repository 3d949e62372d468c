use clap::{Parser, Subcommand};
use std::io::Write;
use thiserror::Error;

use crate::models::Entry;
use crate::store::{Store, StoreError};
use crate::utils::parse_tags;

#[derive(Parser)]
#[command(name = "diary")]
#[command(about = "Personal diaries with tagged, timestamped entries")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the data folder for this run
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Use development mode (uses separate dev config/data folders)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Menu-driven prompt (default if no subcommand)
    Interactive,
    /// Append an entry to a diary, creating the diary if needed
    Add {
        /// Diary name
        diary: String,
        /// Entry content
        content: String,
        /// Tags separated by ", "
        #[arg(long)]
        tags: Option<String>,
        /// Number of productive activities worked on
        #[arg(long, default_value_t = 0)]
        productive: u32,
    },
    /// Print every entry of a diary
    View {
        /// Diary name
        diary: String,
    },
    /// List known diaries
    Diaries,
    /// List known tags
    Tags,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Storage error: {0}")]
    StoreError(#[from] StoreError),
    #[error("Output error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Diary '{0}' does not exist. Please create it by adding a first entry.")]
    UnknownDiary(String),
}

/// Handle the add command
pub fn handle_add<W: Write>(
    diary_name: &str,
    content: String,
    tags: Option<String>,
    productive: u32,
    store: &Store,
    out: &mut W,
) -> Result<(), CliError> {
    let tags = tags.as_deref().map(parse_tags).unwrap_or_default();

    let entry = Entry::create(content, tags, productive, None, store.tags())?
        .with_datetime_format(store.datetime_format());
    store.diary(diary_name).append_entry(&entry, store.diaries())?;

    writeln!(out, "Diary entry added:\n{}", entry)?;
    Ok(())
}

/// Handle the view command
pub fn handle_view<W: Write>(diary_name: &str, store: &Store, out: &mut W) -> Result<(), CliError> {
    if !store.diaries().contains(diary_name)? {
        return Err(CliError::UnknownDiary(diary_name.to_string()));
    }

    writeln!(out, "{}", store.diary(diary_name).render()?)?;
    Ok(())
}

/// Handle the diaries command
pub fn handle_list_diaries<W: Write>(store: &Store, out: &mut W) -> Result<(), CliError> {
    writeln!(out, "{}", store.diaries().formatted()?)?;
    Ok(())
}

/// Handle the tags command
pub fn handle_list_tags<W: Write>(store: &Store, out: &mut W) -> Result<(), CliError> {
    writeln!(out, "{}", store.tags().formatted()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_add_command() {
        let cli = Cli::try_parse_from([
            "diary", "add", "Daily", "Went for a run", "--tags", "health, Exercise", "--productive", "2",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Add { diary, content, tags, productive }) => {
                assert_eq!(diary, "Daily");
                assert_eq!(content, "Went for a run");
                assert_eq!(tags.as_deref(), Some("health, Exercise"));
                assert_eq!(productive, 2);
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["diary", "--dev"]).unwrap();
        assert!(cli.dev);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_add_then_view() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path());
        let mut out = Vec::new();

        handle_add("Daily", "Went for a run".to_string(), Some("health, Exercise".to_string()), 1, &store, &mut out)
            .unwrap();
        handle_view("Daily", &store, &mut out).unwrap();
        handle_list_tags(&store, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Diary entry added:"));
        assert!(text.contains("Diary name: Daily"));
        assert!(text.contains("- exercise\n- health"));

        let entries = store.diary("Daily").list_entries().unwrap();
        assert_eq!(entries[0].productive_activities_count(), 1);
    }

    #[test]
    fn test_add_with_unusable_datetime_format_does_not_panic() {
        let dir = tempdir().unwrap();
        let store = Store::with_datetime_format(dir.path(), "%Q bad");
        let mut out = Vec::new();

        handle_add("Daily", "x".to_string(), None, 0, &store, &mut out).unwrap();
        handle_view("Daily", &store, &mut out).unwrap();

        let entries = store.diary("Daily").list_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].datetime_created(), entries[0].timestamp().to_string());
    }

    #[test]
    fn test_view_unknown_diary_is_error() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path());
        let mut out = Vec::new();

        let err = handle_view("Nope", &store, &mut out).unwrap_err();
        assert!(matches!(err, CliError::UnknownDiary(name) if name == "Nope"));
    }

    #[test]
    fn test_list_diaries_empty() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path());
        let mut out = Vec::new();

        handle_list_diaries(&store, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No existing diaries found.\n");
    }
}
