//! CLI entry point for `emlview`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use emlview::config::Config;
use emlview::convert;
use emlview::i18n;
use emlview::viewer;

#[derive(Parser)]
#[command(name = "emlview", version, disable_version_flag = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// .eml file to convert
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Output filename
    #[arg(long = "o", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Suppress the automatic browser launch
    #[arg(long = "s")]
    suppress: bool,

    /// Delete the HTML file once launched
    #[arg(long = "d")]
    delete: bool,

    /// Seconds to wait before deleting
    #[arg(long = "t", value_name = "SECONDS")]
    delay: Option<u64>,

    /// Print version
    #[arg(long = "version", visible_alias = "v", action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// Verbose logging (repeat for debug and trace)
    #[arg(long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Language (en, es). Defaults to system locale.
    #[arg(long, value_name = "LANG", global = true)]
    lang: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
    /// Show the configuration file location
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

/// Flags that shape a single conversion run.
struct RunOptions<'a> {
    output: Option<&'a Path>,
    suppress: bool,
    delete: bool,
    delay: Option<u64>,
}

/// Detect language early from --lang arg or system env, before clap processes --help.
fn detect_lang_early() -> i18n::Lang {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .enumerate()
        .find_map(|(i, arg)| match arg.strip_prefix("--lang=") {
            Some(code) => Some(code),
            None if arg == "--lang" => args.get(i + 1).map(String::as_str),
            None => None,
        })
        .and_then(i18n::Lang::from_code)
        .unwrap_or_else(i18n::detect_system_lang)
}

/// Build a localized clap Command using i18n strings.
fn build_localized_command() -> clap::Command {
    let mut cmd = Cli::command()
        .about(i18n::app_about())
        .long_about(i18n::app_long_about())
        .after_help(i18n::app_after_help())
        .mut_arg("file", |a| a.help(i18n::help_file_arg()))
        .mut_arg("output", |a| a.help(i18n::help_output()))
        .mut_arg("suppress", |a| a.help(i18n::help_suppress()))
        .mut_arg("delete", |a| a.help(i18n::help_delete()))
        .mut_arg("delay", |a| a.help(i18n::help_delay()))
        .mut_arg("version", |a| a.help(i18n::help_version()))
        .mut_arg("verbose", |a| a.help(i18n::help_verbose()))
        .mut_arg("lang", |a| a.help(i18n::help_lang()));

    let subcommands: Vec<clap::Command> = cmd
        .get_subcommands()
        .map(|sub| {
            let s = sub.clone();
            match s.get_name() {
                "completions" => s.about(i18n::help_cmd_completions()),
                "manpage" => s.about(i18n::help_cmd_manpage()),
                "config" => s
                    .about(i18n::help_cmd_config())
                    .mut_arg("init", |a| a.help(i18n::help_config_init())),
                _ => s,
            }
        })
        .collect();

    for sub in subcommands {
        cmd = cmd.mut_subcommand(sub.get_name(), |_| sub.clone());
    }

    cmd
}

fn main() -> anyhow::Result<()> {
    // Detect language BEFORE clap parsing so --help is localized
    let lang = detect_lang_early();
    i18n::set_lang(lang);

    let matches = build_localized_command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    // Logging depends on the config, so a bad config is reported once the
    // subscriber exists.
    let (config, config_error) = match emlview::config::load_config() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);
    if let Some(e) = config_error {
        tracing::debug!(error = %e, "Falling back to default config");
        eprintln!("{}: {e}", i18n::msg_config_ignored());
    }
    tracing::debug!(lang = i18n::lang().code(), "Starting {}", i18n::app_name());

    match cli.command {
        Some(Commands::Completions { shell }) => cmd_completions(shell),
        Some(Commands::Manpage) => cmd_manpage(),
        Some(Commands::Config { init }) => cmd_config(&config, init),
        None => match cli.file {
            Some(ref path) => {
                let opts = RunOptions {
                    output: cli.output.as_deref(),
                    suppress: cli.suppress,
                    delete: cli.delete,
                    delay: cli.delay,
                };
                cmd_convert(path, &opts, &config)
            }
            None => {
                // Nothing to convert: show usage and succeed
                build_localized_command().print_help()?;
                println!();
                Ok(())
            }
        },
    }
}

/// Set up tracing to stderr, plus `emlview.log` when file logging is enabled.
///
/// A log file that cannot be opened only disables the file layer.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_appender, file_error) = if config.general.log_to_file {
        match open_log_file(config) {
            Ok(appender) => (Some(appender), None),
            Err(e) => (None, Some(e)),
        }
    } else {
        (None, None)
    };
    let file_layer = file_appender.map(|appender| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(appender)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!(
            path = %emlview::config::log_file_path(config).display(),
            error = %e,
            "File logging disabled"
        );
    }
}

fn open_log_file(config: &Config) -> anyhow::Result<RollingFileAppender> {
    let log_dir = emlview::config::cache_dir(config);
    std::fs::create_dir_all(&log_dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("emlview.log")
        .build(&log_dir)?;
    Ok(appender)
}

/// Convert one message, then run the best-effort browser and cleanup steps.
fn cmd_convert(input: &Path, opts: &RunOptions<'_>, config: &Config) -> anyhow::Result<()> {
    convert::validate_input(input, &config.convert.input_extension)?;

    let cwd = std::env::current_dir()?;
    let output = convert::resolve_output_path(
        opts.output,
        input,
        &cwd,
        &config.convert.output_extension,
    );

    let conversion = convert::convert_file(input, &output)?;

    use humansize::{format_size, BINARY};
    println!(
        "{} {} ({})",
        i18n::msg_success(),
        conversion.output.display(),
        format_size(conversion.bytes_written, BINARY)
    );

    if !opts.suppress && config.viewer.open_browser {
        if let Err(e) = viewer::open_in_browser(&conversion.output, config.viewer.browser.as_deref())
        {
            eprintln!("{}: {e}", i18n::msg_browser_failed());
        }
    }

    if opts.delete {
        let delay = opts
            .delay
            .map(Duration::from_secs)
            .unwrap_or_else(|| config.viewer.delete_delay());
        match viewer::remove_after(&conversion.output, delay) {
            Ok(()) => println!("{} {}", i18n::msg_removed(), conversion.output.display()),
            Err(e) => eprintln!("{}: {e}", i18n::msg_remove_failed()),
        }
    } else if opts.delay.is_some() {
        tracing::debug!("--t has no effect without --d");
    }

    Ok(())
}

/// Print the config and log file locations, optionally writing defaults.
fn cmd_config(config: &Config, init: bool) -> anyhow::Result<()> {
    if init {
        let written = emlview::config::save_config(&Config::default())?;
        println!("{} {}", i18n::msg_config_written(), written.display());
        return Ok(());
    }

    let path = emlview::config::config_file_path()
        .ok_or_else(|| anyhow::anyhow!("{}", i18n::err_no_config_dir()))?;

    let marker = if path.exists() {
        ""
    } else {
        i18n::msg_not_found()
    };
    println!("  {:<20} {} {}", i18n::msg_config_file(), path.display(), marker);
    println!(
        "  {:<20} {}",
        i18n::msg_log_file(),
        emlview::config::log_file_path(config).display()
    );
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "emlview", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}
