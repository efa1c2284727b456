use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use wordsort::{sort_lines, LongLinePolicy, PipelineOptions};

/// wordsort — sort the words of each input line into a CRLF-terminated record.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Input text file; reads stdin when omitted or `-`
    input: Option<PathBuf>,

    /// Output file; writes stdout when omitted
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Truncate lines longer than 200 bytes instead of failing
    #[arg(long)]
    truncate: bool,

    /// Log and skip failing lines instead of stopping at the first one
    #[arg(long)]
    keep_going: bool,
}

impl Cli {
    fn options(&self) -> PipelineOptions {
        PipelineOptions {
            long_lines: if self.truncate {
                LongLinePolicy::Truncate
            } else {
                LongLinePolicy::Reject
            },
            keep_going: self.keep_going,
        }
    }

    fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != "-")
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let options = cli.options();

    let summary = match cli.input_path() {
        Some(path) => {
            info!("wordsort: sorting {}", path.display());
            let file =
                File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            run(BufReader::new(file), cli.output.as_ref(), &options)
        }
        None => {
            info!("wordsort: sorting stdin");
            run(io::stdin().lock(), cli.output.as_ref(), &options)
        }
    }?;

    info!(
        "wordsort: {} records, {} words, {} skipped",
        summary.records, summary.words, summary.skipped
    );
    Ok(())
}

fn run<R: io::BufRead>(
    reader: R,
    output: Option<&PathBuf>,
    options: &PipelineOptions,
) -> Result<wordsort::RunSummary> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let summary = sort_lines(reader, BufWriter::new(file), options)
                .with_context(|| format!("failed to sort into {}", path.display()))?;
            info!("wordsort: wrote {}", path.display());
            Ok(summary)
        }
        None => sort_lines(reader, BufWriter::new(io::stdout().lock()), options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["wordsort"]);
        assert!(cli.input.is_none());
        assert!(cli.output.is_none());
        assert_eq!(cli.options().long_lines, LongLinePolicy::Reject);
        assert!(!cli.options().keep_going);
    }

    #[test]
    fn dash_means_stdin() {
        let cli = Cli::parse_from(["wordsort", "-"]);
        assert!(cli.input_path().is_none());
        let cli = Cli::parse_from(["wordsort", "words.txt"]);
        assert_eq!(cli.input_path(), Some(&PathBuf::from("words.txt")));
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from([
            "wordsort",
            "in.txt",
            "-o",
            "out.txt",
            "--truncate",
            "--keep-going",
        ]);
        assert_eq!(cli.output, Some(PathBuf::from("out.txt")));
        assert_eq!(cli.options().long_lines, LongLinePolicy::Truncate);
        assert!(cli.options().keep_going);
    }
}
