use clap::{Parser, Subcommand};
use git_testament::{git_testament, render_testament};
use qualquant::quantize::command::QuantizeArgs;
use qualquant::requantize::command::RequantizeArgs;

git_testament!(TESTAMENT);

#[derive(Parser)]
#[command(author, version = render_testament!(TESTAMENT), propagate_version = true, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Only errors are printed to the stderr stream.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// All available information, including debug information, is printed to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Builds a quality score quantization from recalibration observations.
    Quantize(QuantizeArgs),

    /// Recomputes a quantization from an existing report with a new number of
    /// levels.
    Requantize(RequantizeArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut level = tracing::Level::INFO;
    if cli.quiet {
        level = tracing::Level::ERROR;
    } else if cli.verbose {
        level = tracing::Level::DEBUG;
    }

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    match cli.command {
        Commands::Quantize(args) => qualquant::quantize::command::quantize(args)?,
        Commands::Requantize(args) => qualquant::requantize::command::requantize(args)?,
    }

    Ok(())
}
