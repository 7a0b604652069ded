// Command routing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use imagelens_pipeline::{BatchEnvelope, ImageTools, NoopProgress, ProcessingEnvelope, ToolOptions};
use tracing::debug;

use crate::error::{CliResult, EXIT_FAILURE, EXIT_SUCCESS};
use crate::output;
use crate::progress::ProgressReporter;

/// ImageLens - image analysis through pluggable vision providers
#[derive(Parser, Debug)]
#[command(name = "imagelens")]
#[command(about = "Analyze images with pluggable vision providers")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vision provider (openai, anthropic, google, azure)
    #[arg(long, global = true, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// API key overriding the configured credential
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// TOML settings file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Analyze one image
    #[command(about = "Analyze a single image from a URL, base64 data or a file path")]
    Process {
        #[arg(value_name = "SOURCE")]
        source: String,

        /// description, objects, text or comprehensive
        #[arg(short, long, value_name = "KIND")]
        analysis: Option<String>,

        /// Custom prompt; replaces the analysis kind
        #[arg(short, long, value_name = "TEXT")]
        prompt: Option<String>,
    },

    /// Analyze several images
    #[command(about = "Analyze several images; results keep the input order")]
    Batch {
        #[arg(value_name = "SOURCE", required = true)]
        sources: Vec<String>,

        #[arg(short, long, value_name = "KIND")]
        analysis: Option<String>,

        #[arg(short, long, value_name = "TEXT")]
        prompt: Option<String>,
    },

    #[command(about = "Extract text from an image")]
    Text {
        #[arg(value_name = "SOURCE")]
        source: String,
    },

    #[command(about = "Detect objects in an image")]
    Objects {
        #[arg(value_name = "SOURCE")]
        source: String,
    },

    #[command(about = "List providers and whether a credential is configured")]
    Providers,

    #[command(about = "Show the capabilities of every provider")]
    Capabilities,
}

impl Commands {
    /// Subcommand name; sources stay out of logs
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Process { .. } => "process",
            Commands::Batch { .. } => "batch",
            Commands::Text { .. } => "text",
            Commands::Objects { .. } => "objects",
            Commands::Providers => "providers",
            Commands::Capabilities => "capabilities",
        }
    }
}

impl Cli {
    /// Tool options built from the global flags
    pub fn tool_options(&self) -> ToolOptions {
        ToolOptions {
            provider: self.provider.clone(),
            api_key: self.api_key.clone(),
            analysis_type: None,
            custom_prompt: None,
        }
    }
}

/// Exit code for a set of envelopes; a success flag that disagrees with its
/// payload counts as a failure
pub fn exit_code_for<'a>(envelopes: impl IntoIterator<Item = &'a ProcessingEnvelope>) -> i32 {
    if envelopes.into_iter().all(|e| e.success && e.is_consistent()) {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    }
}

/// Routes parsed commands to the image tools
pub struct CommandRouter;

impl CommandRouter {
    /// Run `cli.command`, print its JSON result and return the exit code
    pub async fn execute(cli: &Cli, tools: &ImageTools) -> CliResult<i32> {
        let options = cli.tool_options();
        debug!("Executing command: {}", cli.command.name());

        match &cli.command {
            Commands::Process {
                source,
                analysis,
                prompt,
            } => {
                let options = ToolOptions {
                    analysis_type: analysis.clone(),
                    custom_prompt: prompt.clone(),
                    ..options
                };
                let envelope = tools.process_image(source, &options).await;
                Self::emit_single(&envelope)
            }
            Commands::Batch {
                sources,
                analysis,
                prompt,
            } => {
                let options = ToolOptions {
                    analysis_type: analysis.clone(),
                    custom_prompt: prompt.clone(),
                    ..options
                };
                let batch = if cli.quiet {
                    tools.analyze_batch(sources, &options, &NoopProgress).await
                } else {
                    let reporter = ProgressReporter::new(sources.len());
                    tools.analyze_batch(sources, &options, &reporter).await
                };
                Self::emit_batch(&batch)
            }
            Commands::Text { source } => {
                let envelope = tools.extract_text(source, &options).await;
                Self::emit_single(&envelope)
            }
            Commands::Objects { source } => {
                let envelope = tools.detect_objects(source, &options).await;
                Self::emit_single(&envelope)
            }
            Commands::Providers => {
                output::print_json(&tools.supported_apis())?;
                Ok(EXIT_SUCCESS)
            }
            Commands::Capabilities => {
                output::print_json(&tools.api_capabilities())?;
                Ok(EXIT_SUCCESS)
            }
        }
    }

    fn emit_single(envelope: &ProcessingEnvelope) -> CliResult<i32> {
        output::print_json(envelope)?;
        Ok(exit_code_for([envelope]))
    }

    fn emit_batch(batch: &BatchEnvelope) -> CliResult<i32> {
        output::print_json(batch)?;
        if batch.all_succeeded() {
            Ok(EXIT_SUCCESS)
        } else {
            Ok(EXIT_FAILURE)
        }
    }
}
