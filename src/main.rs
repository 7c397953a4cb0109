//! tabkit - inspect and transform delimited tables

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tabkit::output::{terminal::build_grid, JsonOutput, TerminalOutput};
use tabkit::{CompareOp, LoadOptions, SaveOptions, Scalar, Table};

/// Inspect and transform delimited tables
#[derive(Parser, Debug)]
#[command(name = "tabkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Field delimiter of the input file
    #[arg(long, global = true, default_value = ",", value_parser = parse_delimiter)]
    delimiter: u8,

    /// Trim whitespace around input fields
    #[arg(long, global = true)]
    trim: bool,

    /// Extra token(s) read as missing values (comma-separated)
    #[arg(long, global = true, value_delimiter = ',')]
    null_value: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a table as a grid
    Show {
        file: PathBuf,

        /// Only the first N rows
        #[arg(long, conflicts_with = "tail")]
        head: Option<usize>,

        /// Only the last N rows
        #[arg(long)]
        tail: Option<usize>,
    },

    /// Print per-column type and statistics
    Describe {
        file: PathBuf,

        /// Emit JSON instead of a grid
        #[arg(long)]
        json: bool,
    },

    /// Transform a table and write it back as delimited text
    Convert {
        input: PathBuf,
        output: PathBuf,

        /// Output field separator
        #[arg(long, default_value = ",", value_parser = parse_delimiter)]
        separator: u8,

        /// Omit the header line
        #[arg(long)]
        no_header: bool,

        /// Omit the leading row-index column
        #[arg(long)]
        no_row_index: bool,

        /// Text written for missing cells
        #[arg(long, default_value = "")]
        na: String,

        /// Column(s) to write (comma-separated)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Rename a column, as old=new (repeatable, applied in order)
        #[arg(long, value_parser = parse_rename)]
        rename: Vec<(String, String)>,

        /// Drop rows where this column is missing
        #[arg(long)]
        drop_missing: Option<String>,

        /// Fill every missing cell with this value
        #[arg(long)]
        fill: Option<String>,

        /// Keep rows matching <column><op><value>, op one of == != >= <= > < =
        #[arg(long = "where")]
        filter: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let load_options = LoadOptions::default()
        .with_delimiter(cli.delimiter)
        .with_trim(cli.trim)
        .with_null_values(cli.null_value);

    match cli.command {
        Command::Show { file, head, tail } => {
            let table = load(&file, &load_options)?;
            let (view, title) = match (head, tail) {
                (Some(n), _) => (table.head(n), format!("First {} rows of {}", n, file.display())),
                (None, Some(n)) => (table.tail(n), format!("Last {} rows of {}", n, file.display())),
                (None, None) => (table, file.display().to_string()),
            };
            TerminalOutput::new().print(&view, Some(&title))?;
        }
        Command::Describe { file, json } => {
            let table = load(&file, &load_options)?;
            if json {
                JsonOutput::new().render_summary(&table, &mut std::io::stdout().lock())?;
            } else {
                print_summary(&table);
            }
        }
        Command::Convert {
            input,
            output,
            separator,
            no_header,
            no_row_index,
            na,
            columns,
            rename,
            drop_missing,
            fill,
            filter,
        } => {
            let mut table = load(&input, &load_options)?;

            if !rename.is_empty() {
                table.rename(&rename)?;
            }
            if let Some(column) = drop_missing {
                table.drop_missing(&column)?;
            }
            if let Some(value) = fill {
                table.fill_missing(Scalar::from(value))?;
            }
            if let Some(expr) = filter {
                let (column, op, key) = parse_filter(&expr)?;
                let mask = table.column(&column)?.compare(op, key);
                table = table.filter(&mask)?;
            }

            let mut save_options = SaveOptions::default()
                .with_delimiter(separator)
                .with_header(!no_header)
                .with_row_index(!no_row_index)
                .with_missing_placeholder(na);
            if !columns.is_empty() {
                save_options = save_options.with_columns(columns);
            }

            table
                .save(&output, &save_options)
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }
    }

    Ok(())
}

fn load(path: &Path, options: &LoadOptions) -> Result<Table> {
    Table::load(path, options).with_context(|| format!("Failed to load {}", path.display()))
}

fn print_summary(table: &Table) {
    let header: Vec<String> = ["column", "type", "count", "missing", "mean", "min", "max"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let fmt = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();

    let rows: Vec<Vec<String>> = table
        .describe()
        .into_iter()
        .map(|s| {
            vec![
                s.name,
                s.column_type.to_string(),
                s.count.to_string(),
                s.missing.to_string(),
                fmt(s.mean),
                fmt(s.min),
                fmt(s.max),
            ]
        })
        .collect();

    print!("{}", build_grid(&header, &rows));
    println!("[{} rows]", table.row_count());
}

fn parse_delimiter(s: &str) -> std::result::Result<u8, String> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(format!("delimiter must be a single ASCII character, got '{}'", s)),
    }
}

fn parse_rename(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((old, new)) if !old.is_empty() && !new.is_empty() => {
            Ok((old.to_string(), new.to_string()))
        }
        _ => Err(format!("expected old=new, got '{}'", s)),
    }
}

fn parse_filter(expr: &str) -> Result<(String, CompareOp, Scalar)> {
    let Some(start) = expr.find(['=', '!', '<', '>']) else {
        bail!("No comparison operator in filter: {}", expr);
    };

    let rest = &expr[start..];
    let (op, len) = match rest.get(..2).and_then(|s| s.parse::<CompareOp>().ok()) {
        Some(op) => (op, 2),
        None => match rest.get(..1).map(str::parse::<CompareOp>) {
            Some(Ok(op)) => (op, 1),
            _ => bail!("Invalid comparison operator in filter: {}", expr),
        },
    };

    let column = expr[..start].trim();
    if column.is_empty() {
        bail!("Missing column name in filter: {}", expr);
    }
    let value = rest[len..].trim();

    Ok((column.to_string(), op, Scalar::infer(value)))
}
