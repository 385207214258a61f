//! GSI Checker: reports an Android device's system-image properties,
//! recommends a Generic System Image and optionally inspects the root setup.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{error, warn};

use gsi_checker::{config, logging};
use gsi_checker::analyzer::gsi::DSU_SIDELOADER_URL;
use gsi_checker::collector::props::{DumpStore, GetpropStore, PropertyStore};
use gsi_checker::collector::shell::{SuShell, DEFAULT_SU};
use gsi_checker::config::{Preferences, THEME_PALETTE};
use gsi_checker::error::{Error, Result};
use gsi_checker::report::text::Lang;
use gsi_checker::session::Session;
use gsi_checker::types::{DeviceReport, RootReport};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "gsi-checker", about = "Android GSI compatibility checker")]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect the device and print the GSI recommendation
    Run(RunArgs),
    /// Show or change the theme colour
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Print the DSU Sideloader download link
    Dsu,
    /// Show version information
    Version,
}

#[derive(Args)]
struct RunArgs {
    /// Append root diagnostics (needs a working su)
    #[arg(long)]
    root: bool,

    /// Emit JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Report language; defaults to the locale
    #[arg(long, value_enum)]
    lang: Option<Lang>,

    /// Read properties from a `getprop` dump instead of the live device
    #[arg(long, value_name = "FILE")]
    props: Option<PathBuf>,

    /// Privileged interpreter used for root diagnostics
    #[arg(long, env = "GSI_CHECKER_SU", default_value = DEFAULT_SU)]
    su: String,

    /// Per-command timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum ThemeAction {
    /// List the built-in colours
    List,
    /// Print the current colour
    Show,
    /// Set the colour by name or #RRGGBB
    Set { color: String },
}

#[derive(Serialize)]
struct JsonReport<'a> {
    device: Option<&'a DeviceReport>,
    root: Option<&'a RootReport>,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(err) = dispatch(cli.command) {
        error!(error = %err, "startup failed");
        eprintln!("启动失败: {err}");
        process::exit(1);
    }
}

fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => run_cmd(args),
        Command::Theme { action } => theme_cmd(action.unwrap_or(ThemeAction::Show)),
        Command::Dsu => {
            println!("{DSU_SIDELOADER_URL}");
            Ok(())
        }
        Command::Version => {
            println!("GSI Checker v{VERSION}");
            Ok(())
        }
    }
}

fn run_cmd(args: RunArgs) -> Result<()> {
    let prefs = config::load_prefs()?;
    let lang = args.lang.unwrap_or_else(Lang::from_env);
    let timeout = Duration::from_secs(args.timeout_secs.max(1));

    let store: Box<dyn PropertyStore> = match &args.props {
        Some(path) => Box::new(DumpStore::from_file(path)?),
        None => Box::new(GetpropStore::new(timeout)),
    };

    let mut session = Session::new(lang);
    session.detect(store.as_ref())?;

    if args.root {
        if args.props.is_some() {
            warn!("root diagnostics describe this host, not the device in the dump");
        }
        let shell = Arc::new(SuShell::new(args.su, timeout));
        match session.request_root(shell) {
            Ok(()) => {
                session.wait_root()?;
            }
            Err(Error::ShellUnavailable) => eprintln!("{}", lang.not_rooted_notice()),
            Err(err) => return Err(err),
        }
    }

    if args.json {
        let report = JsonReport {
            device: session.device(),
            root: session.root(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", title(&prefs));
        println!();
        println!("{}", session.rendered());
    }
    Ok(())
}

fn theme_cmd(action: ThemeAction) -> Result<()> {
    let mut prefs = config::load_prefs()?;
    match action {
        ThemeAction::List => {
            for (name, color) in THEME_PALETTE {
                let marker = if *color == prefs.theme_color { "*" } else { " " };
                println!("{marker} {name:<8} {}", hex(*color));
            }
        }
        ThemeAction::Show => println!("{}", hex(prefs.theme_color)),
        ThemeAction::Set { color } => {
            prefs.theme_color = config::parse_color(&color)?;
            config::save_prefs(&prefs)?;
            println!("{}", Lang::from_env().theme_changed_notice());
        }
    }
    Ok(())
}

fn hex(color: u32) -> String {
    format!("#{:06X}", color & 0x00FF_FFFF)
}

/// Title line, tinted with the theme colour on a terminal.
fn title(prefs: &Preferences) -> String {
    let text = format!("GSI Checker v{VERSION}");
    if !std::io::stdout().is_terminal() {
        return text;
    }
    let (r, g, b) = prefs.rgb();
    format!("\x1b[1;38;2;{r};{g};{b}m{text}\x1b[0m")
}
