use crate::{
    client::ApiClient,
    communicator, config,
    contest::{listing, selection, store::ContestStore, task},
    rating,
    report::Reporter,
    submission::{self, CodeSource, SubmitRequest},
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct CLIArgs {
    /// Path to config.toml [default: $XDG_CONFIG_HOME/sort-me/config.toml]
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Where the statements of the current contest are cached
    #[clap(long, default_value = ".sm")]
    pub cache_dir: PathBuf,

    /// Log what is going on to stderr
    #[clap(short, long)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Choose the current contest and cache its statements
    Contest {
        /// Position in the list of upcoming contests; asked interactively when missing
        #[clap(short, long)]
        index: Option<usize>,
    },
    /// List the tasks of the current contest
    Tasks,
    /// List the languages accepted in the current contest
    Langs,
    /// Submit a solution and wait for the verdict
    Submit {
        /// Task number (0-based) or letter
        task: String,
        /// Source file; standard input is read when missing
        file: Option<PathBuf>,
        /// Language code; guessed from the file extension when missing
        #[clap(short, long)]
        lang: Option<String>,
        /// Show compiler log and per-subtask results
        #[clap(short, long)]
        detailed: bool,
    },
    /// Show the rating table of the current contest
    Rating {
        /// Show submission time next to points
        #[clap(short, long)]
        time: bool,
        /// Print every page
        #[clap(short, long)]
        all: bool,
        #[clap(short, long, default_value = "1")]
        page: u64,
        #[clap(short, long, default_value = "0")]
        label: u64,
        /// List the labels the table can be filtered by
        #[clap(long)]
        labels: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "sortme_client=debug,warn"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<PathBuf>) -> Result<config::Config> {
    let path = match path {
        Some(path) => path,
        None => config::Config::default_path()?,
    };
    config::Config::load(&path).with_context(|| {
        format!("Failed to load configuration (create {path:?} with at least a token field)")
    })
}

pub fn main() -> Result<()> {
    let cli_args = CLIArgs::parse();
    init_logging(cli_args.verbose);
    run(cli_args)
}

#[tokio::main]
async fn run(cli_args: CLIArgs) -> Result<()> {
    let store = ContestStore::new(&cli_args.cache_dir);
    let mut stdout = std::io::stdout();

    match cli_args.command {
        Command::Contest { index } => {
            let client = ApiClient::new(load_config(cli_args.config)?)?;
            let stdin = std::io::stdin();
            selection::change_contest(&client, &store, index, &mut stdin.lock(), &mut stdout)
                .await?;
        }
        Command::Tasks => {
            let contest = store.load()?;
            stdout.write_all(listing::render_tasks(&contest).as_bytes())?;
        }
        Command::Langs => {
            let contest = store.load()?;
            stdout.write_all(listing::render_languages(&contest).as_bytes())?;
        }
        Command::Submit {
            task,
            file,
            lang,
            detailed,
        } => {
            let contest = store.load()?;
            let request = SubmitRequest {
                task_index: task::parse_task_ref(&task)?,
                source: file.map_or(CodeSource::Stdin, CodeSource::File),
                language: lang,
            };
            let submission = submission::build(request, &contest)?;

            let client = ApiClient::new(load_config(cli_args.config)?)?;
            let submission_id = client.submit(&submission).await?;
            info!("Submitted as #{submission_id}, waiting for the verdict");

            let mut reporter = Reporter::stdout(detailed);
            communicator::listen(client.config(), submission_id, &mut reporter).await?;
        }
        Command::Rating {
            time,
            all,
            page,
            label,
            labels,
        } => {
            let contest = store.load()?;
            let client = ApiClient::new(load_config(cli_args.config)?)?;
            if labels {
                rating::print_labels(&client, contest.id, &mut stdout).await?;
            } else {
                let request = rating::RatingRequest {
                    page,
                    label,
                    all,
                    show_time: time,
                };
                rating::print_rating(&client, contest.id, request, &mut stdout).await?;
            }
        }
    }

    Ok(())
}
