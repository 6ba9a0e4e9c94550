use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use roster_cleaner::{normalize_roster, FormattingOptions, OptionsStore, RosterError};

#[derive(Parser, Debug)]
#[command(name = "roster-cleaner")]
#[command(about = "Clean exported army lists into short, shareable text")]
struct Args {
    /// Roster text file(s); stdin when omitted
    inputs: Vec<PathBuf>,

    /// Write the cleaned roster here instead of stdout
    #[arg(short, long, conflicts_with = "batch")]
    output: Option<PathBuf>,

    /// Write `<stem>.cleaned.txt` for every input into this directory
    #[arg(long)]
    batch: Option<PathBuf>,

    /// Drop points costs
    #[arg(long)]
    hide_points: bool,

    /// Keep unit names exactly as exported
    #[arg(long)]
    no_smart_format: bool,

    /// Prefix units with their model count
    #[arg(long)]
    show_models: bool,

    /// Collapse consecutive identical lines into "N line"
    #[arg(long)]
    consolidate_duplicates: bool,

    /// Join everything into a single comma-separated line
    #[arg(long)]
    one_liner: bool,

    /// Put enhancements in brackets on the unit line
    #[arg(long)]
    inline_enhancements: bool,

    /// Leave out the roster title and faction line
    #[arg(long)]
    hide_header: bool,

    /// Remove blank lines
    #[arg(long)]
    no_empty_lines: bool,

    /// Start from the saved options instead of the defaults
    #[arg(long)]
    use_saved: bool,

    /// Save the effective options for later runs
    #[arg(long)]
    save_options: bool,

    /// Options file (.json, .yaml or .yml) used by --use-saved and --save-options
    #[arg(long)]
    options_file: Option<PathBuf>,

    /// Quiet mode - no progress bar
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// Flags only ever switch a toggle away from its default.
    fn apply(&self, mut options: FormattingOptions) -> FormattingOptions {
        if self.hide_points {
            options.show_points = false;
        }
        if self.no_smart_format {
            options.smart_format = false;
        }
        if self.show_models {
            options.show_models = true;
        }
        if self.consolidate_duplicates {
            options.consolidate_duplicates = true;
        }
        if self.one_liner {
            options.one_liner = true;
        }
        if self.inline_enhancements {
            options.inline_enhancements = true;
        }
        if self.hide_header {
            options.show_header = false;
        }
        if self.no_empty_lines {
            options.no_empty_lines = true;
        }
        options
    }

    fn store(&self) -> OptionsStore {
        match &self.options_file {
            Some(path) => OptionsStore::new(path),
            None => OptionsStore::at_default_location(),
        }
    }
}

fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn cleaned_path(dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "roster".to_string());
    dir.join(format!("{}.cleaned.txt", stem))
}

fn run_batch(args: &Args, dir: &Path, options: &FormattingOptions) -> Result<(), RosterError> {
    fs::create_dir_all(dir)?;

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(args.inputs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    };

    for input in &args.inputs {
        pb.set_message(input.display().to_string());
        let text = fs::read_to_string(input)?;
        let target = cleaned_path(dir, input);
        fs::write(&target, normalize_roster(&text, options))?;
        info!(input = %input.display(), output = %target.display(), "cleaned roster");
        pb.inc(1);
    }

    pb.finish_with_message(format!("{} rosters", args.inputs.len()));
    Ok(())
}

fn run(args: &Args) -> Result<(), RosterError> {
    let store = args.store();
    let base = if args.use_saved {
        store.load()
    } else {
        FormattingOptions::default()
    };
    let options = args.apply(base);

    if args.save_options {
        store.save(&options)?;
        info!(path = %store.path().display(), "saved options");
    }

    if let Some(dir) = &args.batch {
        return run_batch(args, dir, &options);
    }

    let mut output = String::new();
    if args.inputs.is_empty() {
        output.push_str(&normalize_roster(&read_input(None)?, &options));
    } else {
        let cleaned: Vec<String> = args
            .inputs
            .iter()
            .map(|path| read_input(Some(path)).map(|text| normalize_roster(&text, &options)))
            .collect::<io::Result<_>>()?;
        output.push_str(&cleaned.join("\n\n"));
    }

    match &args.output {
        Some(path) => fs::write(path, output)?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", output)?;
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    if args.batch.is_some() && args.inputs.is_empty() {
        error!("--batch needs at least one input file");
        std::process::exit(2);
    }

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
