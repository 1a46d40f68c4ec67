//! CLI argument parsing and run loop (ambient, not part of the core contract).

use crate::config::DendriteConfig;
use crate::pipeline::{self, ProcessedDocument, Source};
use crate::tokenizer::WordTokenizer;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use url::Url;

/// dendrite CLI - document preprocessing tool
#[derive(Parser, Debug)]
#[command(name = "dendrite")]
#[command(about = "Parse and chunk a document for retrieval-augmented generation", long_about = None)]
#[command(version)]
pub struct CliArgs {
    /// Input file path
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output format
    #[arg(short = 't', long = "to", value_name = "FORMAT", default_value = "json")]
    pub output_format: OutputFormat,

    /// Maximum tokens per chunk
    #[arg(long = "max-tokens", value_name = "N", default_value = "512")]
    pub max_tokens: usize,

    /// Minimum tokens per chunk (post-filtering)
    #[arg(long = "min-tokens", value_name = "N", default_value = "32")]
    pub min_tokens: usize,

    /// Quality threshold in [0, 1] (post-filtering)
    #[arg(long = "quality-threshold", value_name = "F", default_value = "0.7")]
    pub quality_threshold: f64,
}

/// Output format for the chunk listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Thin driver: builds a [`DendriteConfig`] from [`CliArgs`], runs
/// [`pipeline::process`], and prints the result.
pub struct Runner {
    args: CliArgs,
}

impl Runner {
    pub fn new(args: CliArgs) -> Self {
        Self { args }
    }

    pub fn run(&self) -> Result<(), anyhow::Error> {
        let absolute_input = self.args.input.canonicalize()?;
        let url = file_url(&absolute_input)?;

        let chunking = crate::config::ChunkingConfig::default()
            .with_max_tokens_per_chunk(self.args.max_tokens)
            .with_min_tokens_per_chunk(self.args.min_tokens)
            .with_quality_threshold(self.args.quality_threshold);
        let config = DendriteConfig::new(chunking, DendriteConfig::default().parsers);

        let tokenizer = WordTokenizer::new(self.args.max_tokens * 4);
        let source = Source::Url(url);
        let document = pipeline::process(source, None, &config, &tokenizer)?;

        match self.args.output_format {
            OutputFormat::Json => self.print_json(&document)?,
            OutputFormat::Text => self.print_text(&document),
        }
        Ok(())
    }

    fn print_json(&self, document: &ProcessedDocument) -> Result<(), anyhow::Error> {
        println!("{}", serde_json::to_string_pretty(document)?);
        Ok(())
    }

    fn print_text(&self, document: &ProcessedDocument) {
        println!(
            "document {} - {} chunks, {} tokens",
            document.document_id, document.statistics.chunk_count, document.statistics.total_token_count
        );
        for chunk in &document.chunks {
            println!("[{}] {}", chunk.breadcrumb().joined(), chunk.content());
        }
    }
}

/// Build a [`Source::Url`] from a local path. `path` must be absolute;
/// [`Runner::run`] canonicalizes the CLI's input path before calling this.
pub fn file_url(path: &PathBuf) -> Result<Url, anyhow::Error> {
    Url::from_file_path(path).map_err(|_| anyhow::anyhow!("not an absolute file path: {}", path.display()))
}
