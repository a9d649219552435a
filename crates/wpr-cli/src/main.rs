#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use cmd::Session;
use output::{CliError, OutputMode, fail, fail_store, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use wpr_core::config::{UserConfig, load_user_config, resolve_store_root};
use wpr_core::{CalendarDate, StoreConfig};

#[derive(Parser, Debug)]
#[command(
    name = "wpr",
    author,
    version,
    about = "wpr: weekly planner of tasks and memos",
    long_about = None
)]
struct Cli {
    /// Select the week containing this date (YYYY-MM-DD).
    #[arg(long, global = true, value_name = "YYYY-MM-DD")]
    date: Option<CalendarDate>,

    /// Select last week.
    #[arg(long, global = true, conflicts_with = "date")]
    previous_week: bool,

    /// Task group (a separate namespace under the store root).
    #[arg(long, global = true)]
    group: Option<String>,

    /// Store directory (overrides WPR_STORE and the config file).
    #[arg(long, global = true, value_parser = existing_dir)]
    store: Option<PathBuf>,

    /// Print informational notices to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(allow_external_subcommands = true)]
enum Commands {
    #[command(
        next_help_heading = "Read",
        about = "List every task of the week",
        after_help = "EXAMPLES:\n    # This week\n    wpr weekly\n\n    # The week of a given day\n    wpr weekly --date 2024-03-20"
    )]
    Weekly,

    #[command(
        next_help_heading = "Read",
        about = "Summarize open and completed tasks"
    )]
    Summary,

    #[command(next_help_heading = "Read", about = "Open tasks created today")]
    Today,

    #[command(
        next_help_heading = "Read",
        about = "Open tasks created on or before today"
    )]
    Daily,

    #[command(next_help_heading = "Read", about = "Print the week's memo")]
    Memo,

    #[command(
        next_help_heading = "Edit",
        about = "Replace the week's memo",
        after_help = "EXAMPLES:\n    # Set the memo\n    wpr set-memo focus on the tax return\n\n    # Clear it\n    wpr set-memo"
    )]
    SetMemo(cmd::memo::SetMemoArgs),

    #[command(
        next_help_heading = "Edit",
        about = "Add a task to this week",
        after_help = "EXAMPLES:\n    # Add a task\n    wpr add renew passport\n\n    # Add to a group\n    wpr --group work add review release notes"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        next_help_heading = "Edit",
        about = "Mark a task as completed",
        after_help = "EXAMPLES:\n    # Complete task 2 as listed by `wpr weekly`\n    wpr complete 2"
    )]
    Complete(cmd::complete::CompleteArgs),

    #[command(next_help_heading = "Store", about = "List task groups")]
    Groups,

    #[command(
        next_help_heading = "Store",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    wpr completions bash"
    )]
    Completions(cmd::completions::CompletionsArgs),

    #[command(external_subcommand)]
    External(Vec<String>),
}

fn existing_dir(raw: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(raw);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("'{raw}' is not an existing directory"))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("WPR_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "wpr=debug,wpr_core=debug,info"
        } else {
            "wpr=info,wpr_core=info,warn"
        })
    });

    let format = env::var("WPR_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

impl Cli {
    /// Day inside the selected week, `None` for the current week.
    fn selected_date(&self) -> Option<CalendarDate> {
        if self.previous_week {
            Some(CalendarDate::today().shift(-7))
        } else {
            self.date
        }
    }

    /// Day the reports treat as today: the `--date` value, last Sunday
    /// with `--previous-week`, otherwise the real today.
    fn reference_day(&self, today: CalendarDate) -> CalendarDate {
        if self.previous_week {
            today.week_start().shift(-1)
        } else {
            self.date.unwrap_or(today)
        }
    }

    fn session(&self, user: &UserConfig, output: OutputMode) -> anyhow::Result<Session> {
        let env_store = env::var("WPR_STORE").ok();
        let Some(root) = resolve_store_root(self.store.as_deref(), env_store.as_deref(), user)
        else {
            return Err(fail(
                output,
                &CliError::new("cannot determine the store directory")
                    .with_suggestion("Pass --store or set WPR_STORE."),
            ));
        };

        let mut config = StoreConfig::new(root);
        if let Some(group) = self.group.clone().or_else(|| user.group.clone()) {
            config = config
                .with_group(group)
                .map_err(|err| fail_store(output, &err))?;
        }

        Ok(Session {
            config,
            date: self.selected_date(),
            reference_day: self.reference_day(CalendarDate::today()),
            verbose: self.verbose || user.verbose,
            output,
        })
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let user = load_user_config();
    let config_output = user.as_ref().ok().and_then(|u| u.output.clone());
    let output = resolve_output_mode(cli.format, cli.json, config_output.as_deref());
    let user = user.map_err(|err| fail_store(output, &err))?;

    // Resolved per command so unknown commands never touch the store.
    let session = || -> anyhow::Result<Session> {
        let session = cli.session(&user, output)?;
        debug!(root = %session.config.root.display(), group = ?session.config.group, "resolved store");
        Ok(session)
    };

    match &cli.command {
        Commands::Weekly => cmd::week::run_weekly(&session()?),
        Commands::Summary => cmd::week::run_summary(&session()?),
        Commands::Today => cmd::week::run_today(&session()?),
        Commands::Daily => cmd::week::run_daily(&session()?),
        Commands::Memo => cmd::memo::run_memo(&session()?),
        Commands::SetMemo(args) => cmd::memo::run_set_memo(args, &session()?),
        Commands::Add(args) => cmd::add::run_add(args, &session()?),
        Commands::Complete(args) => cmd::complete::run_complete(args, &session()?),
        Commands::Groups => cmd::groups::run_groups(&session()?),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
        Commands::External(args) => Err(cmd::unknown::run_unknown(args, output)),
    }
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) if err.is::<output::Reported>() => Ok(ExitCode::FAILURE),
        Err(err) => Err(err),
    }
}
