use clap::Parser;
use color_eyre::Result;
use diary::{
    Config, Profile, Store,
    cli::{self, Cli, Commands},
    interactive, utils,
};
use log::debug;
use std::io;

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    // Warnings by default, RUST_LOG overrides
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from_path(&utils::expand_path(path))?,
        None => Config::load_with_profile(profile)?,
    };

    let data_dir = match cli.data_dir.as_deref() {
        Some(dir) => utils::expand_path(dir),
        None => config.get_data_path(),
    };
    debug!("using data folder {}", data_dir.display());

    let store = Store::with_datetime_format(&data_dir, &config.datetime_format);
    run(cli.command.unwrap_or(Commands::Interactive), &store)?;

    Ok(())
}

fn run(command: Commands, store: &Store) -> Result<()> {
    let mut out = io::stdout().lock();

    match command {
        Commands::Interactive => {
            interactive::run(store, io::stdin().lock(), &mut out)?;
        }
        Commands::Add { diary, content, tags, productive } => {
            cli::handle_add(&diary, content, tags, productive, store, &mut out)?;
        }
        Commands::View { diary } => {
            cli::handle_view(&diary, store, &mut out)?;
        }
        Commands::Diaries => {
            cli::handle_list_diaries(store, &mut out)?;
        }
        Commands::Tags => {
            cli::handle_list_tags(store, &mut out)?;
        }
    }

    Ok(())
}
