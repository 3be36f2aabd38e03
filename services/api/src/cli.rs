use crate::demo::{run_demo, run_evaluate, run_versions, DemoArgs, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ecoprofile::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ecoprofile",
    about = "Evaluate the life-cycle CO2e footprint of a product and serve the evaluation API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate a product snapshot stored as JSON
    Evaluate(EvaluateArgs),
    /// List the formula versions that can be evaluated
    Versions(CatalogArgs),
    /// Walk through the steel cabinet + PCB worked example
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
}

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct CatalogArgs {
    /// Directory of `<version>.csv` factor tables (defaults to ECO_CATALOG_DIR or the builtin tables)
    #[arg(long)]
    pub(crate) catalog_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args).await,
        Command::Versions(args) => run_versions(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["ecoprofile"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_evaluate_flags() {
        let cli = Cli::try_parse_from([
            "ecoprofile",
            "evaluate",
            "--product",
            "cabinet.json",
            "--version",
            "1.0.0",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Evaluate(args)) => {
                assert_eq!(args.product, PathBuf::from("cabinet.json"));
                assert_eq!(args.version.as_deref(), Some("1.0.0"));
                assert!(args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn evaluate_requires_a_product() {
        assert!(Cli::try_parse_from(["ecoprofile", "evaluate"]).is_err());
    }
}
