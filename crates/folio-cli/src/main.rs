use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Sheet-music catalog browser with local drafts", long_about = None)]
struct Cli {
    /// Layered config paths in merge order (base -> local -> ...)
    #[arg(long = "config", global = true)]
    config_paths: Vec<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the merged catalog (hosted + local drafts)
    Catalog {
        /// Emit JSON instead of key=value lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print one merged catalog entry
    Show {
        slug: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print the merged site configuration
    Site {
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Local draft management
    Draft {
        #[command(subcommand)]
        cmd: DraftCmd,
    },
}

#[derive(Subcommand)]
enum DraftCmd {
    /// Stage a catalog draft from a JSON object
    Put {
        slug: String,

        /// Draft JSON text
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        json: Option<String>,

        /// Path to a draft JSON file
        #[arg(long)]
        file: Option<String>,
    },

    /// Attach a local file as the entry's content (seeds the draft from hosted if needed)
    Attach { slug: String, path: String },

    /// Discard a catalog draft and its attached file
    Rm { slug: String },

    /// List local drafts
    Ls,

    /// Collect redundant drafts and orphaned attached files
    Gc,

    /// Stage a site configuration draft from a JSON object
    Site {
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        json: Option<String>,

        #[arg(long)]
        file: Option<String>,
    },

    /// Discard the site configuration draft
    SiteRm,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Dev convenience: pick up FOLIO_* from .env.local when present.
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();

    let config_paths = cli.config_paths;
    let cfg = || commands::load_browser_config(&config_paths);

    match cli.cmd {
        Commands::Catalog { json } => commands::view::catalog(&cfg()?, json).await?,
        Commands::Show { slug, json } => commands::view::show(&cfg()?, &slug, json).await?,
        Commands::Site { json } => commands::view::site(&cfg()?, json).await?,
        Commands::Draft { cmd } => match cmd {
            DraftCmd::Put { slug, json, file } => commands::draft::put(&cfg()?, &slug, json, file)?,
            DraftCmd::Attach { slug, path } => {
                commands::draft::attach(&cfg()?, &slug, &path).await?
            }
            DraftCmd::Rm { slug } => commands::draft::rm(&cfg()?, &slug)?,
            DraftCmd::Ls => commands::draft::ls(&cfg()?)?,
            DraftCmd::Gc => commands::draft::gc(&cfg()?).await?,
            DraftCmd::Site { json, file } => commands::draft::site(&cfg()?, json, file)?,
            DraftCmd::SiteRm => commands::draft::site_rm(&cfg()?)?,
        },
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
