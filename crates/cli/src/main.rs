//! Command line interface to the tofchop spectrometer engine
//!
//! ```text
//! tofchop merlin --chopper G --freq 400 --ei 25 resolution --etrans 0,5,10
//! tofchop --config instrument.json --ei 3.7 reps
//! ```

// standard library
use std::path::PathBuf;
use std::process::ExitCode;

// external crates
use clap::{ArgAction, Parser, Subcommand};
use log::debug;

// tofchop modules
use tofchop_instrument::InstrumentConfig;
use tofchop_spectrometer::Spectrometer;

// internal modules
mod commands;
mod error;

use error::Result;

/// Transmission, resolution and flux of direct-geometry chopper spectrometers
#[derive(Parser, Debug)]
#[command(name = "tofchop", author, version, about, long_about = None)]
struct Cli {
    /// Built-in instrument (let, merlin)
    #[arg(required_unless_present = "config", conflicts_with = "config")]
    instrument: Option<String>,

    /// Instrument definition file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Fermi package or variant name
    #[arg(long, global = true)]
    chopper: Option<String>,

    /// User frequencies (Hz), comma separated
    #[arg(long, global = true, value_delimiter = ',')]
    freq: Option<Vec<f64>>,

    /// Phase of every chopper (µs), comma separated
    #[arg(long, global = true, value_delimiter = ',', allow_negative_numbers = true)]
    phase: Option<Vec<f64>>,

    /// Incident energy the choppers are focused on (meV)
    #[arg(long, global = true)]
    ei: Option<f64>,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Command {
    /// List every transmitted incident energy
    Reps,

    /// Energy resolution against energy transfer
    Resolution {
        /// Energy transfers (meV), or fractions of Ei with --all-reps
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        etrans: Vec<f64>,

        /// One curve for every transmitted energy
        #[arg(long)]
        all_reps: bool,
    },

    /// Flux at the sample
    Flux {
        /// Flux for every transmitted energy
        #[arg(long)]
        all_reps: bool,
    },

    /// Elastic time width of each component
    Widths,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    // warnings are on by default so soft failures are visible
    stderrlog::new()
        .modules([
            module_path!(),
            "tofchop_cascade",
            "tofchop_instrument",
            "tofchop_spectrometer",
        ])
        .quiet(cli.quiet)
        .verbosity(cli.verbose as usize + 1)
        .show_module_names(cli.verbose > 1)
        .init()?;
    Ok(())
}

/// Apply the selection in the order the facade validates it
fn spectrometer(cli: &Cli) -> Result<Spectrometer> {
    let mut spectrometer = match &cli.config {
        Some(path) => Spectrometer::new(InstrumentConfig::from_path(path)?)?,
        None => Spectrometer::from_builtin(cli.instrument.as_deref().unwrap_or_default())?,
    };

    if let Some(chopper) = &cli.chopper {
        spectrometer.set_chopper(chopper, None)?;
    }
    if let Some(freq) = &cli.freq {
        spectrometer.set_frequency(freq, None)?;
    }
    if let Some(phase) = &cli.phase {
        spectrometer.set_phase(phase)?;
    }
    if let Some(ei) = cli.ei {
        spectrometer.set_ei(ei)?;
    }

    debug!("{:?}", spectrometer.selection());
    Ok(spectrometer)
}

fn run(cli: Cli) -> Result<String> {
    let mut spectrometer = spectrometer(&cli)?;
    match cli.command {
        Command::Reps => commands::reps(&mut spectrometer),
        Command::Resolution { etrans, all_reps } => {
            commands::resolution(&mut spectrometer, &etrans, all_reps)
        }
        Command::Flux { all_reps } => commands::flux(&mut spectrometer, all_reps),
        Command::Widths => commands::widths(&spectrometer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn options_before_and_after_the_command() {
        let cli = parse(&[
            "tofchop", "merlin", "--ei", "25", "resolution", "--etrans", "0,-2.5,10", "--freq", "350",
        ]);
        assert_eq!(cli.instrument.as_deref(), Some("merlin"));
        assert_eq!(cli.ei, Some(25.0));
        assert_eq!(cli.freq, Some(vec![350.0]));
        assert_eq!(
            cli.command,
            Command::Resolution {
                etrans: vec![0.0, -2.5, 10.0],
                all_reps: false
            }
        );
    }

    #[rstest]
    #[case(&["tofchop", "--ei", "25", "reps"])] // case 1: no instrument
    #[case(&["tofchop", "merlin", "--config", "x.json", "--ei", "25", "reps"])] // case 2: both
    #[case(&["tofchop", "merlin", "--ei", "25"])] // case 3: no command
    #[case(&["tofchop", "merlin", "--ei", "25", "--verbose=x", "reps"])] // case 4: bad flag
    fn rejected(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn selection_is_applied() {
        let cli = parse(&[
            "tofchop", "let", "--chopper", "High Resolution", "--freq", "200,100", "--ei", "3.7", "reps",
        ]);
        let spectrometer = spectrometer(&cli).unwrap();
        assert_eq!(spectrometer.variant(), Some("High Resolution"));
        assert_eq!(spectrometer.frequency(), &[200.0, 100.0]);
        assert_eq!(spectrometer.ei(), Some(3.7));
    }

    #[test]
    fn invalid_selection_is_an_error() {
        let cli = parse(&["tofchop", "merlin", "--freq", "375", "--ei", "25", "reps"]);
        let error = run(cli).unwrap_err();
        assert!(error.to_string().contains("not a multiple"), "{error}");
    }

    #[test]
    fn queries_need_an_energy() {
        let cli = parse(&["tofchop", "merlin", "reps"]);
        let error = run(cli).unwrap_err();
        assert!(error.to_string().contains("has not been set"), "{error}");
    }

    #[test]
    fn widths_command() {
        let cli = parse(&["tofchop", "merlin", "--ei", "25", "widths"]);
        let text = run(cli).unwrap();
        assert!(text.starts_with("MERLIN"));
    }
}
