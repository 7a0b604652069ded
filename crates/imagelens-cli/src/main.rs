// ImageLens CLI Entry Point

use clap::Parser;
use imagelens_cli::error::{CliError, EXIT_CONFIG};
use imagelens_cli::{logging, output, Cli, CommandRouter};
use imagelens_config::SettingsLoader;
use imagelens_pipeline::ImageTools;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    let mut loader = SettingsLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }

    let tools = match loader
        .load()
        .map_err(CliError::from)
        .and_then(|settings| ImageTools::new(settings).map_err(CliError::from))
    {
        Ok(tools) => tools,
        Err(e) => {
            output::print_error(&e.to_string());
            std::process::exit(EXIT_CONFIG);
        }
    };

    let code = match CommandRouter::execute(&cli, &tools).await {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&e.to_string());
            e.exit_code()
        }
    };

    std::process::exit(code);
}
