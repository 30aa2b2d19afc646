use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use sigfooter_core::{
    process_file, validate_package, RelocationReport, RelocationSettings, ValidationWarning,
};
use std::path::{Path, PathBuf};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

#[derive(Parser)]
#[command(name = "sigfooter")]
#[command(version = VERSION)]
#[command(about = "Move the signature table of Word documents into the page footer", long_about = None)]
struct Cli {
    /// A .docx file, or a directory whose .docx files are all processed
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Output file, or output directory when PATH is a directory.
    /// Files are rewritten in place when omitted.
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// JSON file with relocation settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only process files whose name starts with PREFIX
    #[arg(long, value_name = "PREFIX")]
    pattern: Option<String>,

    /// Number of files processed in parallel
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// Skip the checks run on every written file
    #[arg(long)]
    no_validate: bool,

    /// Print a JSON summary instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FileOutcome {
    input: PathBuf,
    output: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<RelocationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    warnings: Vec<ValidationWarning>,
}

#[derive(Serialize)]
struct Summary {
    processed: usize,
    failed: usize,
    files: Vec<FileOutcome>,
}

type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(summary) if summary.failed == 0 => {}
        Ok(_) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> CliResult<Summary> {
    let settings = match &cli.config {
        Some(path) => RelocationSettings::from_json_file(path)?,
        None => RelocationSettings::default(),
    };

    let directory_input = cli.path.is_dir();
    let inputs = collect_inputs(&cli.path, cli.pattern.as_deref())?;
    if inputs.is_empty() {
        log::warn!("no .docx files found in {}", cli.path.display());
    }
    if directory_input {
        if let Some(dir) = &cli.output {
            std::fs::create_dir_all(dir)?;
        }
    }

    let jobs: Vec<(PathBuf, PathBuf)> = inputs
        .into_iter()
        .map(|input| {
            let output = output_path(&input, cli.output.as_deref(), directory_input);
            (input, output)
        })
        .collect();

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(n) = cli.jobs {
        pool = pool.num_threads(n);
    }
    let pool = pool.build()?;
    let files: Vec<FileOutcome> = pool.install(|| {
        jobs.par_iter()
            .map(|(input, output)| process_one(input, output, &settings, !cli.no_validate))
            .collect()
    });

    let failed = files.iter().filter(|f| f.error.is_some()).count();
    let summary = Summary {
        processed: files.len() - failed,
        failed,
        files,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(summary)
}

fn process_one(
    input: &Path,
    output: &Path,
    settings: &RelocationSettings,
    validate: bool,
) -> FileOutcome {
    let mut outcome = FileOutcome {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        report: None,
        error: None,
        warnings: Vec::new(),
    };

    match process_file(input, output, settings) {
        Ok(report) => outcome.report = Some(report),
        Err(e) => {
            log::error!("{}: {}", input.display(), e);
            outcome.error = Some(e.to_string());
            return outcome;
        }
    }

    if validate {
        let checked = std::fs::read(output)
            .map_err(sigfooter_core::SigFooterError::from)
            .and_then(|bytes| validate_package(&bytes, settings));
        match checked {
            Ok(warnings) => outcome.warnings = warnings,
            Err(e) => outcome.warnings.push(ValidationWarning {
                part: output.display().to_string(),
                message: format!("could not be checked: {}", e),
            }),
        }
    }
    outcome
}

/// `.docx` files under `path` (or `path` itself), sorted by name. Word's
/// `~$` lock files are skipped.
fn collect_inputs(path: &Path, prefix: Option<&str>) -> CliResult<Vec<PathBuf>> {
    if !path.is_dir() {
        if !path.exists() {
            return Err(format!("{} does not exist", path.display()).into());
        }
        return Ok(vec![path.to_path_buf()]);
    }

    let mut inputs = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let candidate = entry.path();
        if !candidate.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_docx = candidate
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"));
        if is_docx
            && !name.starts_with("~$")
            && prefix.map_or(true, |p| name.starts_with(p))
        {
            inputs.push(candidate);
        }
    }
    inputs.sort();
    Ok(inputs)
}

fn output_path(input: &Path, output: Option<&Path>, directory_input: bool) -> PathBuf {
    match output {
        None => input.to_path_buf(),
        Some(out) if directory_input || out.is_dir() => match input.file_name() {
            Some(name) => out.join(name),
            None => out.to_path_buf(),
        },
        Some(out) => out.to_path_buf(),
    }
}

fn print_summary(summary: &Summary) {
    for file in &summary.files {
        match (&file.report, &file.error) {
            (Some(report), _) => {
                let action = if report.already_relocated {
                    "footer already present"
                } else {
                    "footer created"
                };
                println!(
                    "OK      {} ({}, {} {}, {} section(s), {} empty paragraph(s) removed)",
                    file.input.display(),
                    action,
                    report.footer_part,
                    report.footer_relationship_id,
                    report.sections.sections,
                    report.empty_paragraphs_removed
                );
            }
            (None, Some(error)) => println!("FAILED  {}: {}", file.input.display(), error),
            (None, None) => {}
        }
        for warning in &file.warnings {
            println!("  warning: {}: {}", warning.part, warning.message);
        }
    }
    println!(
        "\n{} processed, {} failed",
        summary.processed, summary.failed
    );
}
