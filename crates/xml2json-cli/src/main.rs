use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use xml2json::{ConvertOptions, MapOptions, ParserConfig, Style, Whitespace};

#[derive(Debug, Parser)]
#[command(name = "xml2json", version, about = "Convert XML documents to JSON")]
struct Args {
    /// Input file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
    /// Emit compact JSON instead of pretty-printed
    #[arg(short, long)]
    compact: bool,
    /// Spaces per indentation level for pretty output
    #[arg(long, default_value_t = 2)]
    indent: usize,
    /// Maximum element nesting depth, capped at 256 (0 for the cap)
    #[arg(long, default_value_t = ParserConfig::default().max_depth)]
    max_depth: u16,
    /// Maximum input size in bytes (0 for unlimited)
    #[arg(long, default_value_t = ParserConfig::default().max_size)]
    max_size: usize,
    /// Treatment of whitespace around text content
    #[arg(long, value_enum, default_value_t = WhitespaceArg::Preserve)]
    whitespace: WhitespaceArg,
    /// Prefix for attribute keys
    #[arg(long, default_value = "@")]
    attr_prefix: String,
    /// Key for text next to attributes
    #[arg(long, default_value = "#text")]
    text_key: String,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WhitespaceArg {
    Preserve,
    Trim,
}

impl From<WhitespaceArg> for Whitespace {
    fn from(value: WhitespaceArg) -> Self {
        match value {
            WhitespaceArg::Preserve => Whitespace::Preserve,
            WhitespaceArg::Trim => Whitespace::Trim,
        }
    }
}

impl Args {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            parser: ParserConfig::new(self.max_depth, self.max_size),
            mapper: MapOptions {
                whitespace: self.whitespace.into(),
                attribute_prefix: self.attr_prefix.clone(),
                text_key: self.text_key.clone(),
            },
        }
    }

    fn style(&self) -> Style {
        if self.compact {
            Style::Compact
        } else {
            Style::Pretty {
                indent: self.indent,
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let input_data = read_input(&args.input)?;
    debug!(bytes = input_data.len(), "input read");

    let mut output = xml2json::to_json_string(&input_data, &args.options(), args.style())
        .context("failed to convert xml")?;
    output.push('\n');

    write_output(&args.output, output.as_bytes())?;
    info!("conversion finished");
    Ok(())
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn write_output(path: &Option<PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            Ok(())
        }
    }
}
