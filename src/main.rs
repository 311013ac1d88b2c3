// Entry point and CLI flow.
//
// `analyze` runs the whole pipeline once and exports the report.
// `menu` is the interactive loop:
// - Option [1] loads and validates the source sheet, printing diagnostics.
// - Option [2] ranks the loaded data, previews the table and exports the report.
// - After generating, the user can go back to the menu or exit.
use clap::{Parser, Subcommand};
use once_cell::sync::Lazy;
use pareto_report::config::AnalysisConfig;
use pareto_report::types::SupplierRecord;
use pareto_report::validate::ValidationReport;
use pareto_report::{loader, output, ranker, util, validate, Analysis, ParetoError};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "pareto_report")]
#[command(about = "Supplier nonconformance Pareto analysis")]
#[command(version)]
struct Cli {
    /// YAML configuration file (columns, chart styling, export names)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a source sheet and export the report
    Analyze {
        /// CSV sheet, or a directory holding `<sheet>.csv`
        input: PathBuf,

        /// Output directory for the report
        #[arg(short, long, default_value = "relatorio_pareto")]
        out: PathBuf,

        /// Draw the raw nonconforming count above each bar
        #[arg(long)]
        annotate_counts: bool,

        /// Rows shown in the console preview
        #[arg(long, default_value = "20")]
        preview: usize,
    },

    /// Interactive load / generate loop
    Menu {
        /// CSV sheet, or a directory holding `<sheet>.csv`
        #[arg(default_value = "Entrada.csv")]
        input: PathBuf,

        /// Output directory for the report
        #[arg(short, long, default_value = "relatorio_pareto")]
        out: PathBuf,

        /// Rows shown in the console preview
        #[arg(long, default_value = "20")]
        preview: usize,
    },
}

// Loaded records survive between menu choices so the sheet is read once
// but the report can be generated several times in a run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<(Vec<SupplierRecord>, ValidationReport)>,
}

fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("PARETO_LOG_JSON", false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn report_error(e: &ParetoError, config: &AnalysisConfig) {
    eprintln!("Error: {}", e);
    eprintln!("{}", e.hint(&config.source.sheet, &config.source.required_columns()));
}

/// Preview the ranked table and the headline numbers.
fn print_analysis(analysis: &Analysis, preview: usize) {
    println!("Pareto Analysis");
    println!(
        "({} suppliers, {} nonconforming units)\n",
        util::format_int(analysis.summary.total_suppliers),
        util::format_count(analysis.summary.total_nonconforming)
    );
    output::preview_table_rows(&output::report_rows(&analysis.table), preview);
    if analysis.table.len() > preview {
        println!("({} more rows in the exported sheet)\n", analysis.table.len() - preview);
    }
    println!(
        "Vital few: {} supplier(s) account for {:.0}% of nonconforming units: {}",
        analysis.summary.vital_few_count,
        analysis.summary.vital_few_threshold,
        analysis.summary.vital_few.join(", ")
    );
    if analysis.summary.undefined_rate_rows > 0 {
        println!(
            "Note: {} supplier(s) have an undefined NC rate (zero deliveries or out of range).",
            analysis.summary.undefined_rate_rows
        );
    }
}

fn export(out: &Path, analysis: &Analysis, config: &AnalysisConfig) -> Result<(), ParetoError> {
    let files = output::export_report(out, analysis, config)?;
    println!("\nReport exported:");
    for path in [&files.table, &files.chart, &files.series, &files.summary] {
        println!("  {}", path.display());
    }
    println!();
    Ok(())
}

fn cmd_analyze(input: &Path, out: &Path, preview: usize, config: &AnalysisConfig) -> Result<(), ParetoError> {
    let rows = loader::load_source(input, &config.source)?;
    let analysis = pareto_report::analyze(&rows, config.vital_few_threshold)?;
    if analysis.validation.dropped_rows() > 0 {
        println!(
            "Note: {} of {} rows skipped due to missing names or non-numeric counts.\n",
            util::format_int(analysis.validation.dropped_rows()),
            util::format_int(analysis.validation.total_rows)
        );
    }
    print_analysis(&analysis, preview);
    export(out, &analysis, config)
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    read_line()
}

/// `None` once stdin is closed.
fn read_line() -> Option<String> {
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Ask whether to go back to the menu after generating a report.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to menu (Y/N): ");
        let _ = io::stdout().flush();
        let Some(resp) = read_line() else {
            return false;
        };
        match resp.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Option [1]: load and validate the sheet, keeping the records in `APP_STATE`.
fn handle_load(input: &Path, config: &AnalysisConfig) {
    let loaded = loader::load_source(input, &config.source).and_then(|rows| validate::validate(&rows));
    match loaded {
        Ok((records, report)) => {
            println!(
                "Processing dataset... ({} rows loaded, {} valid)",
                util::format_int(report.total_rows),
                util::format_int(report.valid_rows)
            );
            if report.dropped_rows() > 0 {
                println!(
                    "Note: {} rows skipped ({} without supplier name, {} with non-numeric counts).",
                    util::format_int(report.dropped_rows()),
                    util::format_int(report.missing_name),
                    util::format_int(report.invalid_numbers)
                );
            }
            println!();
            let mut state = APP_STATE.lock().unwrap_or_else(|e| e.into_inner());
            state.data = Some((records, report));
        }
        Err(e) => {
            report_error(&e, config);
            println!();
        }
    }
}

/// Option [2]: rank the loaded records, preview and export.
fn handle_generate(out: &Path, preview: usize, config: &AnalysisConfig) {
    let data = {
        let state = APP_STATE.lock().unwrap_or_else(|e| e.into_inner());
        state.data.clone()
    };
    let Some((records, validation)) = data else {
        println!("Error: No data loaded. Please load the sheet first (option 1).\n");
        return;
    };

    let result = ranker::rank(&records).and_then(|table| {
        let summary = ranker::summarize(&table, config.vital_few_threshold);
        let analysis = Analysis {
            validation,
            table,
            summary,
        };
        print_analysis(&analysis, preview);
        export(out, &analysis, config)
    });
    if let Err(e) = result {
        report_error(&e, config);
        println!();
    }
}

fn run_menu(input: &Path, out: &Path, preview: usize, config: &AnalysisConfig) {
    loop {
        println!("Pareto Analysis");
        println!("[1] Load the sheet ({})", input.display());
        println!("[2] Generate Report\n");
        let Some(choice) = read_choice() else {
            println!("Exiting the program.");
            break;
        };
        match choice.as_str() {
            "1" => handle_load(input, config),
            "2" => {
                println!();
                handle_generate(out, preview, config);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => println!("Invalid choice. Please enter 1 or 2.\n"),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let mut config = match cli.config.as_deref() {
        Some(path) => match AnalysisConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {}: {}", path.display(), e);
                return e.exit_code();
            }
        },
        None => AnalysisConfig::default(),
    };

    match cli.command {
        Commands::Analyze {
            input,
            out,
            annotate_counts,
            preview,
        } => {
            config.chart.annotate_counts |= annotate_counts;
            match cmd_analyze(&input, &out, preview, &config) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    report_error(&e, &config);
                    e.exit_code()
                }
            }
        }
        Commands::Menu {
            input,
            out,
            preview,
        } => {
            run_menu(&input, &out, preview, &config);
            ExitCode::SUCCESS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_and_analyze_share_preview_option() {
        let cli = Cli::try_parse_from(["pareto_report", "menu", "data.csv", "--preview", "5"]).unwrap();
        match cli.command {
            Commands::Menu { input, preview, .. } => {
                assert_eq!(input, PathBuf::from("data.csv"));
                assert_eq!(preview, 5);
            }
            _ => panic!("expected menu"),
        }
        let cli = Cli::try_parse_from(["pareto_report", "menu"]).unwrap();
        assert!(matches!(cli.command, Commands::Menu { preview: 20, .. }));
        let cli = Cli::try_parse_from(["pareto_report", "analyze", "in.csv", "--preview", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Analyze { preview: 3, .. }));
    }
}
