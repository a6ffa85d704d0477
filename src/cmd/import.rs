use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use sql_doc_loader::config::{ImportConfig, ImportYamlConfig};
use sql_doc_loader::importer::{ImportStats, Importer};
use sql_doc_loader::input::Compression;
use sql_doc_loader::sink::{DocumentSink, JsonLinesSink, MongoSink, NullSink};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::inputs::{resolve_inputs, BatchRunTally};

/// Settings given on the command line; `None` keeps the YAML/default value.
pub struct Overrides {
    pub uri: Option<String>,
    pub database: Option<String>,
    pub collection: Option<String>,
    pub source_label: Option<String>,
    pub branch: Option<String>,
    pub batch_size: Option<usize>,
    pub ordered: bool,
}

pub struct ImportArgs {
    pub file: Option<PathBuf>,
    pub overrides: Overrides,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub dry_run: bool,
    pub progress: bool,
    pub json: bool,
    pub fail_fast: bool,
}

/// JSON output for a single dump
#[derive(Serialize)]
pub(crate) struct ImportJsonOutput {
    input_file: String,
    target: String,
    dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    compression: Option<String>,
    statistics: ImportStatistics,
}

#[derive(Serialize)]
pub(crate) struct ImportStatistics {
    lines_read: u64,
    insert_lines: u64,
    rows_imported: u64,
    batches_flushed: u64,
    bytes_processed: u64,
    elapsed_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    throughput_mb_per_sec: Option<f64>,
}

impl ImportStatistics {
    fn new(stats: &ImportStats, elapsed: Duration) -> Self {
        Self {
            lines_read: stats.lines_read,
            insert_lines: stats.insert_lines,
            rows_imported: stats.rows_imported,
            batches_flushed: stats.batches_flushed,
            bytes_processed: stats.bytes_processed,
            elapsed_secs: elapsed.as_secs_f64(),
            throughput_mb_per_sec: throughput(stats.bytes_processed, elapsed),
        }
    }
}

/// JSON output for a glob import
#[derive(Serialize)]
pub(crate) struct MultiImportJsonOutput {
    total_files: usize,
    succeeded: usize,
    failed: usize,
    rows_imported: u64,
    elapsed_secs: f64,
    results: Vec<ImportFileResult>,
}

#[derive(Serialize)]
pub(crate) struct ImportFileResult {
    file: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows_imported: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(args: ImportArgs) -> anyhow::Result<()> {
    let yaml = match &args.config {
        Some(path) => Some(
            ImportYamlConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
        ),
        None => None,
    };

    let pattern = args
        .file
        .clone()
        .or_else(|| yaml.as_ref().and_then(|y| y.input.clone()))
        .context("no input file given (pass FILE or set `input` in the config file)")?;

    let files = resolve_inputs(&pattern)?;
    let base = build_config(&files[0], yaml.as_ref(), &args.overrides)?;

    if files.len() == 1 {
        run_single(base, &args)
    } else {
        let mut sink = open_sink(&args, &base)?;
        run_multi(files, base, sink.as_mut(), &args)
    }
}

fn build_config(
    input: &Path,
    yaml: Option<&ImportYamlConfig>,
    overrides: &Overrides,
) -> anyhow::Result<ImportConfig> {
    let mut config = ImportConfig::new(input);
    if let Some(yaml) = yaml {
        config.apply_yaml(yaml);
        config.input = input.to_path_buf();
    }

    if let Some(uri) = &overrides.uri {
        config.store.uri = uri.clone();
    }
    if let Some(database) = &overrides.database {
        config.store.database = database.clone();
    }
    if let Some(collection) = &overrides.collection {
        config.store.collection = collection.clone();
    }
    if let Some(source) = &overrides.source_label {
        config.metadata.source = source.clone();
    }
    if let Some(branch) = &overrides.branch {
        config.metadata.branch = branch.clone();
    }
    if let Some(batch_size) = overrides.batch_size {
        config.batch_size = batch_size;
    }
    if overrides.ordered {
        config.store.ordered = true;
    }

    config.validate()?;
    Ok(config)
}

fn open_sink(args: &ImportArgs, config: &ImportConfig) -> anyhow::Result<Box<dyn DocumentSink>> {
    if args.dry_run {
        return Ok(Box::new(NullSink::new()));
    }
    if let Some(output) = &args.output {
        return Ok(Box::new(JsonLinesSink::create(output)?));
    }
    Ok(Box::new(MongoSink::connect(&config.store)?))
}

fn progress_bar(file_size: u64, template: &str) -> ProgressBar {
    let pb = ProgressBar::new(file_size);
    if let Ok(style) = ProgressStyle::with_template(template) {
        pb.set_style(style.progress_chars("█▓▒░  ").tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Wire the console side of an import: byte bar and flush messages.
fn attach_reporting(mut importer: Importer, pb: Option<&ProgressBar>, json: bool) -> Importer {
    if let Some(pb) = pb {
        let bar = pb.clone();
        importer = importer.with_progress(move |bytes| bar.set_position(bytes));
    }

    if !json {
        let bar = pb.cloned();
        importer = importer.on_flush(move |total| {
            let msg = format!("Processed {} records...", total);
            match &bar {
                Some(bar) => bar.println(msg),
                None => println!("{}", msg),
            }
        });
    }
    importer
}

/// Heading printed before the store is contacted; `None` for dry runs.
fn start_banner(config: &ImportConfig, output: Option<&Path>, dry_run: bool) -> Option<String> {
    if dry_run {
        return None;
    }
    let label = match output {
        Some(path) => path.display().to_string(),
        None => config.store.collection.clone(),
    };
    Some(format!("--- Starting Import to {} ---", label))
}

fn run_single(config: ImportConfig, args: &ImportArgs) -> anyhow::Result<()> {
    let file = config.input.clone();
    let file_size = std::fs::metadata(&file)
        .with_context(|| format!("cannot stat {}", file.display()))?
        .len();
    let compression = Compression::from_path(&file);

    if !args.json {
        match start_banner(&config, args.output.as_deref(), args.dry_run) {
            Some(banner) => {
                println!("{}", banner);
                println!(
                    "Input: {} ({:.2} MB)",
                    file.display(),
                    file_size as f64 / (1024.0 * 1024.0)
                );
            }
            None => println!(
                "Dry run: scanning SQL file: {} ({:.2} MB)",
                file.display(),
                file_size as f64 / (1024.0 * 1024.0)
            ),
        }
    }

    let mut sink = open_sink(args, &config)?;
    let target = sink.describe();

    if !args.json {
        if !args.dry_run {
            println!("Target: {}", target);
        }
        if compression != Compression::None {
            println!("Detected compression: {}", compression);
        }
        println!();
    }

    let pb = (args.progress && !args.json).then(|| {
        progress_bar(
            file_size,
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {msg}",
        )
    });

    let start_time = Instant::now();
    let importer = attach_reporting(Importer::new(config), pb.as_ref(), args.json);
    let result = importer.run(sink.as_mut());
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    let stats = result?;
    let elapsed = start_time.elapsed();

    if args.json {
        let output = ImportJsonOutput {
            input_file: file.display().to_string(),
            target,
            dry_run: args.dry_run,
            compression: (compression != Compression::None).then(|| compression.to_string()),
            statistics: ImportStatistics::new(&stats, elapsed),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if args.dry_run {
        println!("\n✓ Dry run completed!");
        println!("Would import {} records.", stats.rows_imported);
    } else {
        println!("\nSUCCESS: Imported {} total records.", stats.rows_imported);
    }
    print_statistics(&stats, elapsed);
    Ok(())
}

fn print_statistics(stats: &ImportStats, elapsed: Duration) {
    println!("\nStatistics:");
    println!("  Lines read: {}", stats.lines_read);
    println!("  INSERT lines: {}", stats.insert_lines);
    println!("  Records: {}", stats.rows_imported);
    println!("  Bulk writes: {}", stats.batches_flushed);
    println!(
        "  Bytes processed: {:.2} MB",
        stats.bytes_processed as f64 / (1024.0 * 1024.0)
    );
    println!("  Elapsed time: {:.3?}", elapsed);
    if let Some(mbps) = throughput(stats.bytes_processed, elapsed) {
        println!("  Throughput: {:.2} MB/s", mbps);
    }
}

fn throughput(bytes: u64, elapsed: Duration) -> Option<f64> {
    let secs = elapsed.as_secs_f64();
    (secs > 0.0).then(|| bytes as f64 / (1024.0 * 1024.0) / secs)
}

fn run_multi(
    files: Vec<PathBuf>,
    base: ImportConfig,
    sink: &mut dyn DocumentSink,
    args: &ImportArgs,
) -> anyhow::Result<()> {
    let total = files.len();
    let mut tally = BatchRunTally::default();
    let mut json_results = Vec::new();

    if !args.json {
        println!("Importing {} files into {}...\n", total, sink.describe());
    }

    let start_time = Instant::now();

    for (idx, file) in files.into_iter().enumerate() {
        if !args.json {
            println!(
                "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n[{}/{}] {}",
                idx + 1,
                total,
                file.display()
            );
        }

        let mut config = base.clone();
        config.input = file.clone();

        let pb = if args.progress && !args.json {
            std::fs::metadata(&file).ok().map(|m| {
                progress_bar(
                    m.len(),
                    "  {spinner:.green} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({percent}%)",
                )
            })
        } else {
            None
        };

        let importer = attach_reporting(Importer::new(config), pb.as_ref(), args.json);
        let result = importer.run(sink);
        if let Some(pb) = &pb {
            pb.finish_and_clear();
        }

        match result {
            Ok(stats) => {
                if !args.json {
                    println!(
                        "  Records: {} | Bulk writes: {} | {}\n",
                        stats.rows_imported,
                        stats.batches_flushed,
                        if args.dry_run { "(dry run)" } else { "✓" }
                    );
                }
                json_results.push(ImportFileResult {
                    file: file.display().to_string(),
                    status: "success".to_string(),
                    rows_imported: Some(stats.rows_imported),
                    error: None,
                });
                tally.record_success(stats.rows_imported);
            }
            Err(e) => {
                let e = format!("{:#}", anyhow::Error::from(e));
                if !args.json {
                    println!("  Error: {}\n", e);
                }
                json_results.push(ImportFileResult {
                    file: file.display().to_string(),
                    status: "failed".to_string(),
                    rows_imported: None,
                    error: Some(e.clone()),
                });
                tally.record_failure(file, e);
                if args.fail_fast {
                    break;
                }
            }
        }
    }

    let elapsed = start_time.elapsed();

    if args.json {
        let output = MultiImportJsonOutput {
            total_files: total,
            succeeded: tally.succeeded,
            failed: tally.failed(),
            rows_imported: tally.rows_imported,
            elapsed_secs: elapsed.as_secs_f64(),
            results: json_results,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("Import Summary:");
        println!("  Total files: {}", total);
        println!("  Succeeded: {}", tally.succeeded);
        println!("  Failed: {}", tally.failed());
        println!("  Records: {}", tally.rows_imported);
        println!("  Time: {:.3?}", elapsed);

        if !tally.failures.is_empty() {
            println!();
            println!("Failed files:");
            for (path, error) in &tally.failures {
                println!("  - {}: {}", path.display(), error);
            }
        }
    }

    if !tally.failures.is_empty() {
        anyhow::bail!("{} of {} files failed to import", tally.failed(), total);
    }
    if !args.json && !args.dry_run {
        println!("\nSUCCESS: Imported {} total records.", tally.rows_imported);
    }
    Ok(())
}
