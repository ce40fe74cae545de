use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::error;

use matsya_invoices::{desktop, logging, Converter, Deployment};

/// Converts a Sales Order Report export into an invoice import file.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Sales Order Report (.xlsx); opens a file picker when omitted
    input: Option<PathBuf>,

    /// Deployment file with the customer registry and account id
    #[arg(short, long, env = "MATSYA_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the rotated JSON log file
    #[arg(long, env = "MATSYA_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Exit right away instead of waiting for Enter
    #[arg(long)]
    no_wait: bool,
}

fn pick_input_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select Sales Order Report Excel File")
        .add_filter("Excel files", &["xlsx"])
        .add_filter("All files", &["*"])
        .pick_file()
}

fn prompt(question: &str) -> io::Result<String> {
    print!("{question}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

fn process(input: &Path, converter: &Converter) -> anyhow::Result<()> {
    let now = chrono::Local::now().naive_local();
    println!("Starting process at {}", now.format("%Y-%m-%d %H:%M:%S"));
    println!("Selected file: {}", input.display());

    let mut console = io::stdout();
    desktop::process_file(input, converter, now, &mut console)
        .map(|_| ())
        .map_err(|err| {
            error!(error = %err, file = %input.display(), "conversion failed");
            err.into()
        })
}

fn run(args: &Args) -> anyhow::Result<()> {
    let deployment = Deployment::load(args.config.as_deref()).context("failed to load deployment")?;
    let converter = Converter::for_deployment(&deployment)?;

    if let Some(input) = &args.input {
        return process(input, &converter);
    }

    loop {
        let Some(input) = pick_input_file() else {
            println!("No file selected. Exiting...");
            return Ok(());
        };

        match process(&input, &converter) {
            Ok(()) => return Ok(()),
            Err(err) => {
                println!("\nError: {err:#}");
                let answer = prompt("Select another file? [y/N] ")?;
                if !answer.eq_ignore_ascii_case("y") {
                    return Ok(());
                }
            }
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let _guard = match logging::init_logging(args.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Warning: logging disabled: {err}");
            None
        }
    };

    println!("Sales Order Processing Tool");
    println!("==========================");

    let code = match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("\nError: {err:#}");
            ExitCode::FAILURE
        }
    };

    if !args.no_wait {
        let _ = prompt("\nPress Enter to exit...");
    }
    code
}
