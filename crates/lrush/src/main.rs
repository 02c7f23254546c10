//! lrush - line-oriented shell for inspecting an LRU cache

mod handler;
mod reply;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lrucore::{Cache, CacheConfig, DEFAULT_MAX_SIZE};
use tracing::{info, warn};

use crate::handler::CommandHandler;
use crate::reply::{Command, Reply};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Maximum number of cached entries
    #[arg(short, long, default_value_t = DEFAULT_MAX_SIZE)]
    capacity: usize,

    /// Read commands from a file instead of stdin
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Do not print the prompt
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so replies on stdout stay parseable
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let config = CacheConfig::new(args.capacity)?;
    info!("Starting lrush v{}", env!("CARGO_PKG_VERSION"));
    info!("Cache capacity: {}", config.max_size());

    let mut handler = CommandHandler::new(Cache::with_config(config));

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => {
            info!("Reading commands from {:?}", path);
            let file = File::open(path).with_context(|| format!("opening {:?}", path))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };
    let prompt = !args.quiet && args.script.is_none();

    run(input, io::stdout().lock(), &mut handler, prompt)
}

fn run<R: BufRead, W: Write>(
    input: R,
    mut out: W,
    handler: &mut CommandHandler,
    prompt: bool,
) -> Result<()> {
    if prompt {
        write!(out, "lru> ")?;
        out.flush()?;
    }

    for line in input.lines() {
        let line = line?;
        match Command::parse(&line) {
            Ok(Some(cmd)) => writeln!(out, "{}", handler.handle(cmd))?,
            Ok(None) => {}
            Err(e) => {
                warn!("Parse error: {}", e);
                writeln!(out, "{}", Reply::Error(None, e))?;
            }
        }
        if prompt {
            write!(out, "lru> ")?;
            out.flush()?;
        }
    }

    info!("Input closed, {} entries cached", handler.cache().len());
    Ok(())
}
