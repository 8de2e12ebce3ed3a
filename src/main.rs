//! # Main — Sieve Driver Entry Point
//!
//! Parses the command line and hands off to [`cli::execute`]. The argument
//! grammar follows the original driver: positional tokens are classified by
//! type — integers fill `x, y, dx, dy` in order, decimals fill
//! `alpha, beta` — and flags pick the sieve flavor and the output form.
//!
//! Exit codes: 0 on success, 1 on argument errors, fatal sieve errors, and
//! `--help` (the help text is a usage diagnostic, not a result).

mod cli;

use clap::Parser;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Generate Gaussian primes with norm up to x using sieving methods.
#[derive(Parser)]
#[command(
    name = "gintsieve",
    about = "Generate Gaussian primes with norm up to x using sieving methods",
    after_help = "Positional arguments:\n  \
        x       Norm bound of the generated primes\n  \
        y       Coordinate of the SW corner of the array in block mode\n  \
        dx      Horizontal side length in block mode\n  \
        dy      Vertical side length in block mode\n  \
        alpha   Start angle in sector mode (decimal)\n  \
        beta    Terminal angle in sector mode (decimal)"
)]
pub struct Cli {
    /// x [y dx dy] [alpha beta] — integers and decimals, classified by type
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// Display sieving progress on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the real and imaginary parts of the primes found
    #[arg(short, long)]
    pub printprimes: bool,

    /// Print a text representation of the sieve array
    #[arg(short = 'a', long)]
    pub printarray: bool,

    /// Write primes to a csv file in the current directory
    #[arg(short, long)]
    pub write: bool,

    /// Count the primes found and exit
    #[arg(short, long)]
    pub count: bool,

    /// Sieve the first octant (the default region)
    #[arg(short, long)]
    pub octant: bool,

    /// Sieve the sector with start angle alpha and terminal angle beta
    #[arg(short, long)]
    pub sector: bool,

    /// Sieve the block x <= real < x + dx, y <= imag < y + dy
    #[arg(short, long)]
    pub block: bool,

    /// Use the donut variant of the sieve array where one exists
    #[arg(short, long)]
    pub donut: bool,
}

fn main() {
    // LOG_FORMAT=json switches to machine-readable logs; human otherwise.
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt().json().with_target(false).init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and argument errors are both usage diagnostics: stderr, exit 1.
            eprintln!("{}", err.render());
            std::process::exit(1);
        }
    };

    if let Err(err) = cli::execute(&cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
