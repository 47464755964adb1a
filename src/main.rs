//! tldr - offline tldr-pages viewer
//!
//! Builds the page store on first use, then shows pages from it.

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command as Cli};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use tldr_pack::{Application, Command, Platform, Settings, TitleMode};

fn parse_platform(value: &str) -> std::result::Result<Platform, String> {
    Platform::parse(value).map_err(|e| e.to_string())
}

fn cli() -> Cli {
    Cli::new("tldr")
        .version(tldr_pack::VERSION)
        .about("Display simple help pages for command-line tools from the tldr-pages project")
        .long_about(
            "Display simple help pages for command-line tools from the tldr-pages project.\n\
             Pages are downloaded once and kept in a compressed store next to the executable.\n\
             More information: https://tldr.sh.",
        )
        .disable_version_flag(true)
        .arg(
            Arg::new("command")
                .help("Command to show the page for, e.g. `tar` or `git commit`")
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .help("Display version")
                .action(ArgAction::Version),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List all commands for the current platform")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-all")
                .short('a')
                .long("list-all")
                .help("List all commands for any platform (also `-la`)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("random")
                .short('r')
                .long("random")
                .help("Show a random command")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("platform")
                .short('p')
                .long("platform")
                .value_name("PLATFORM")
                .help("Platform to use: common, linux, osx (macos), windows (win)")
                .value_parser(parse_platform),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("heading")
                .long("heading-toggle")
                .help("Highlight `#` headings instead of the first line")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("pages-dir")
                .long("pages-dir")
                .value_name("DIR")
                .help("Build the store from a local tldr checkout instead of downloading")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("store")
                .long("store")
                .value_name("FILE")
                .help("Page store location (default: pages.dat next to the executable)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

fn settings_from(matches: &ArgMatches) -> Settings {
    let mut settings = Settings::load().unwrap_or_else(|err| {
        eprintln!("{err}");
        Settings::default()
    });
    if let Some(store) = matches.get_one::<PathBuf>("store") {
        settings.store_path = store.clone();
    }
    if let Some(dir) = matches.get_one::<PathBuf>("pages-dir") {
        settings.pages_dir = Some(dir.clone());
    }
    if matches.get_flag("no-color") || !std::io::stdout().is_terminal() {
        settings.color = false;
    }
    if matches.get_flag("heading") {
        settings.title_mode = TitleMode::HeadingToggle;
    }
    settings
}

fn command_from(matches: &ArgMatches) -> Option<Command> {
    if matches.get_flag("list-all") {
        return Some(Command::List { all: true });
    }
    if matches.get_flag("list") {
        return Some(Command::List { all: false });
    }
    if matches.get_flag("random") {
        return Some(Command::Random);
    }
    let words: Vec<&str> = matches
        .get_many::<String>("command")?
        .map(String::as_str)
        .collect();
    Some(Command::Lookup {
        name: words.join("-"),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; RUST_LOG controls verbosity
    env_logger::init();

    let matches = match cli().try_get_matches() {
        Ok(matches) => matches,
        // Help, version, and bad arguments all end with a message and a clean exit
        Err(err) => {
            err.print()?;
            return Ok(());
        }
    };

    let Some(command) = command_from(&matches) else {
        cli().print_help()?;
        println!();
        return Ok(());
    };

    let settings = settings_from(&matches);
    let platform = matches.get_one::<Platform>("platform").copied();
    let app = Application::new(settings, platform);

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    app.run(command, &mut out).await?;
    out.flush()?;

    Ok(())
}
