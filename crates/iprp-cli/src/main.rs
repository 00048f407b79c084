//! iprp-gen CLI
//!
//! Finds spells in spells.2da that have no iprp_spells.2da entry and writes
//! the rows to append to iprp_spells.2da.

use clap::Parser;
use iprp_core::{
    exclude_existing, select_candidates, write_rows, IniFile, ResourceManager, ResourceProvider,
    RunReport, Settings, DEFAULT_OUTPUT_FILE, DEFAULT_SETTINGS_FILE,
};
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "iprp-gen")]
#[command(about = "Generate missing iprp_spells.2da rows", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file
    #[arg(short, long, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,

    /// Module to load (overrides settings.module)
    #[arg(short, long)]
    module: Option<String>,

    /// NWN2 install directory (overrides paths.nwn2-install)
    #[arg(long)]
    nwn2_install: Option<PathBuf>,

    /// NWN2 user files directory (overrides paths.nwn2-home)
    #[arg(long)]
    nwn2_home: Option<PathBuf>,

    /// Output file for the new rows
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Also write a JSON summary of the run
    #[arg(long)]
    report: Option<PathBuf>,

    /// Exit immediately on error instead of waiting for Enter
    #[arg(long)]
    no_pause: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        println!("\nError: {}\n", e);
        if !cli.no_pause {
            pause();
        }
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_settings(cli: &Cli) -> iprp_core::Result<Settings> {
    let mut ini = if cli.config.exists() {
        IniFile::load(&cli.config)?
    } else {
        tracing::warn!(path = %cli.config.display(), "settings file not found");
        IniFile::default()
    };

    if let Some(module) = &cli.module {
        ini.set("settings.module", module.as_str());
    }
    if let Some(path) = &cli.nwn2_install {
        ini.set("paths.nwn2-install", path.display().to_string());
    }
    if let Some(path) = &cli.nwn2_home {
        ini.set("paths.nwn2-home", path.display().to_string());
    }

    Settings::from_ini(&ini)
}

fn run(cli: &Cli) -> iprp_core::Result<()> {
    let settings = load_settings(cli)?;

    println!("Loading resources and module ...");
    let mut resources = ResourceManager::new();
    resources.load_module(&settings.module, &settings.nwn2_home, &settings.nwn2_install)?;
    println!();

    let selection = select_candidates(&resources)?;
    for warning in &selection.warnings {
        println!("{}", warning);
    }

    println!("Finding missing iprp_spells spells...");
    let exclusion = exclude_existing(&resources, selection.candidates.clone())?;
    tracing::info!(
        before = exclusion.candidates_before,
        after = exclusion.missing.len(),
        "filtered candidates"
    );
    println!(
        "Checked {} candidate spells against {} iprp_spells rows.",
        exclusion.candidates_before, exclusion.existing_rows
    );
    println!("Found {} missing spells.", exclusion.missing.len());

    println!("Writing new rows.");
    let file = File::create(&cli.output)?;
    write_rows(
        &resources,
        &exclusion.missing,
        exclusion.existing_rows,
        BufWriter::new(file),
    )?;
    println!(
        "Process complete. Wrote {} new rows.",
        exclusion.missing.len()
    );

    if let Some(report_path) = &cli.report {
        let report = RunReport::new(
            settings.module.as_str(),
            &selection,
            &exclusion,
            exclusion.missing.len(),
            cli.output.clone(),
        );
        report.save(report_path)?;
        println!("Wrote report to {}", report_path.display());
    }

    Ok(())
}

/// Wait for Enter so the console window stays open after an error
fn pause() {
    print!("Press Enter to continue . . . ");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
