use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use jyut_types::SinkKind;

pub mod commands;
pub mod controller;
pub mod logging;
pub mod profile;
pub mod state;

use self::state::AppState;

#[derive(Parser)]
#[command(name = "jyut")]
#[command(version)]
#[command(about = "Generate Mandarin and Cantonese example sentences for vocabulary lists")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON config profile; environment variables are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SinkArg {
    Tsv,
    Firestore,
}

impl From<SinkArg> for SinkKind {
    fn from(arg: SinkArg) -> Self {
        match arg {
            SinkArg::Tsv => SinkKind::Tsv,
            SinkArg::Firestore => SinkKind::Firestore,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Split a Words.hk dictionary dump into one file per entry
    Split {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, default_value = "dictionary_entries")]
        output: PathBuf,
    },

    /// Upload entry files to the RAG corpus, resuming from the progress file
    Upload {
        #[arg(short, long, default_value = "dictionary_entries")]
        entries: PathBuf,
        /// Defaults to the configured progress file
        #[arg(short, long)]
        progress: Option<PathBuf>,
    },

    /// Move already-uploaded entry files into `done/`
    MoveProcessed {
        #[arg(short, long, default_value = "dictionary_entries")]
        entries: PathBuf,
        #[arg(short, long)]
        progress: Option<PathBuf>,
        /// Show what would be moved without moving anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate sentences for every word in a file
    Generate {
        #[arg(short, long, default_value = "input.txt")]
        input: PathBuf,
        /// TSV output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "tsv")]
        sink: SinkArg,
    },

    /// Generate sentences for a single word and print them as JSON
    Word {
        word: String,
        /// Also store the result in Firestore
        #[arg(long)]
        store: bool,
    },

    /// Replace the Firestore vocabulary collection with an Anki export
    ImportVocab {
        #[arg(short, long, default_value = "vocab.txt")]
        input: PathBuf,
    },

    /// Stamp a server timestamp on every vocabulary document
    AddTimestamps,

    /// Reduce an input file to its first column
    CleanInput {
        #[arg(short, long, default_value = "input.txt")]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real env vars still apply
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init(cli.log_json);

    let config = profile::load_config(cli.config.as_deref())?;

    if let Err(e) = run(cli.command, config).await {
        tracing::error!("{e:#}");
        return Err(e);
    }

    Ok(())
}

async fn run(command: Command, config: jyut_config::Config) -> anyhow::Result<()> {
    let progress_default = PathBuf::from(&config.upload.progress_file);

    // Only commands that talk to Google Cloud need credentials and an HTTP client
    let cloud = move || -> anyhow::Result<Arc<AppState>> {
        profile::require_cloud(&config)?;
        Ok(Arc::new(AppState::new(config)?))
    };

    match command {
        Command::Split { input, output } => commands::split::handle_split(&input, &output),
        Command::MoveProcessed {
            entries,
            progress,
            dry_run,
        } => {
            let progress = progress.unwrap_or(progress_default);
            commands::move_processed::handle_move_processed(&entries, &progress, dry_run)
                .map(|_| ())
        }
        Command::CleanInput { input } => commands::vocab::handle_clean_input(&input),
        Command::Upload { entries, progress } => {
            let progress = progress.unwrap_or(progress_default);
            commands::upload::handle_upload(cloud()?, &entries, &progress).await
        }
        Command::Generate {
            input,
            output,
            sink,
        } => {
            commands::generate::handle_generate(cloud()?, &input, output.as_deref(), sink.into())
                .await
        }
        Command::Word { word, store } => {
            commands::generate::handle_word(cloud()?, &word, store).await
        }
        Command::ImportVocab { input } => {
            commands::vocab::handle_import_vocab(cloud()?, &input).await
        }
        Command::AddTimestamps => commands::vocab::handle_add_timestamps(cloud()?).await,
    }
}

#[cfg(test)]
mod tests {
    mod cli_tests;
    mod move_processed_tests;
    mod upload_controller_tests;
}
