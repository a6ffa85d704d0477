mod import;
mod inputs;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sql-doc-loader")]
#[command(version)]
#[command(about = "Load INSERT rows from SQL dumps into a document database", long_about = None)]
pub struct Cli {
    /// Debug-level diagnostics on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import every INSERT row of a SQL dump as an envelope document
    Import {
        /// Input SQL file or glob pattern (e.g., backup.sql, dumps/*.sql)
        /// Supports .gz, .bz2, .xz, .zst compression. Falls back to `input` in --config
        file: Option<PathBuf>,

        /// MongoDB connection string [default: mongodb://127.0.0.1:27017/]
        #[arg(long)]
        uri: Option<String>,

        /// Target database [default: fayda-omo-db]
        #[arg(long)]
        database: Option<String>,

        /// Target collection [default: mCBS]
        #[arg(long)]
        collection: Option<String>,

        /// Value of metadata.source on every document [default: CoreBanking_Backup_2022]
        #[arg(long)]
        source_label: Option<String>,

        /// Value of metadata.branch on every document [default: Shebedino]
        #[arg(long)]
        branch: Option<String>,

        /// Documents per bulk insert [default: 1000]
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// Stop each bulk insert at the first rejected document
        #[arg(long)]
        ordered: bool,

        /// YAML config file (CLI flags override its values)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write JSON lines to this file instead of MongoDB
        #[arg(short, long, conflicts_with = "dry_run")]
        output: Option<PathBuf>,

        /// Scan and count rows without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Show progress during import
        #[arg(short, long)]
        progress: bool,

        /// Print a JSON summary instead of text
        #[arg(long)]
        json: bool,

        /// Stop on first file that fails (for glob patterns)
        #[arg(long)]
        fail_fast: bool,
    },

    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Failure line printed on stdout before exiting with status 1.
pub fn critical_error_line(err: &anyhow::Error) -> String {
    format!("\nCRITICAL ERROR: {err:#}")
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Import {
            file,
            uri,
            database,
            collection,
            source_label,
            branch,
            batch_size,
            ordered,
            config,
            output,
            dry_run,
            progress,
            json,
            fail_fast,
        } => import::run(import::ImportArgs {
            file,
            overrides: import::Overrides {
                uri,
                database,
                collection,
                source_label,
                branch,
                batch_size,
                ordered,
            },
            config,
            output,
            dry_run,
            progress,
            json,
            fail_fast,
        }),
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "sql-doc-loader",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_error_line_includes_causes() {
        let err = anyhow::anyhow!("connection refused")
            .context("cannot connect to mongodb://db:27017/");
        assert_eq!(
            critical_error_line(&err),
            "\nCRITICAL ERROR: cannot connect to mongodb://db:27017/: connection refused"
        );
    }

    #[test]
    fn test_cli_parses_import_flags() {
        let cli = Cli::try_parse_from([
            "sql-doc-loader",
            "import",
            "backup.sql",
            "--batch-size",
            "500",
            "--ordered",
        ])
        .unwrap();
        match cli.command {
            Commands::Import {
                file,
                batch_size,
                ordered,
                ..
            } => {
                assert_eq!(file, Some(PathBuf::from("backup.sql")));
                assert_eq!(batch_size, Some(500));
                assert!(ordered);
            }
            Commands::Completions { .. } => panic!("expected import"),
        }
    }
}
