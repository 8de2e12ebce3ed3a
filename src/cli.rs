//! # CLI Execution
//!
//! Extracted from `main.rs` to keep the entry point slim: positional
//! type-heuristic parsing, sieve flavor resolution, and the output switches
//! (print, array render, csv write, count).

use anyhow::{bail, Result};
use gintsieve::block::BlockSieve;
use gintsieve::donut::{BlockDonutSieve, OctantDonutSieve};
use gintsieve::octant::OctantSieve;
use gintsieve::sector::SectorSieve;
use gintsieve::sieve::Sieve;
use std::io::{BufWriter, Write};
use tracing::info;

use super::Cli;

/// Positional parameters recovered from the free arguments.
#[derive(Default)]
struct Positionals {
    x: Option<u64>,
    y: Option<u64>,
    dx: Option<u64>,
    dy: Option<u64>,
    alpha: Option<f64>,
    beta: Option<f64>,
}

/// Classify free arguments by type: integer tokens fill `x, y, dx, dy` in
/// order, decimal tokens fill `alpha, beta`.
fn parse_positionals(args: &[String]) -> Result<Positionals> {
    let mut p = Positionals::default();
    for arg in args {
        if arg.contains('.') {
            let value: f64 = arg
                .parse()
                .map_err(|_| anyhow::anyhow!("cannot understand argument '{}'", arg))?;
            match (p.alpha, p.beta) {
                (None, _) => p.alpha = Some(value),
                (_, None) => p.beta = Some(value),
                _ => bail!("too many decimal arguments: '{}'", arg),
            }
        } else {
            let value: u64 = arg
                .parse()
                .map_err(|_| anyhow::anyhow!("cannot understand argument '{}'", arg))?;
            match (p.x, p.y, p.dx, p.dy) {
                (None, ..) => p.x = Some(value),
                (_, None, ..) => p.y = Some(value),
                (_, _, None, _) => p.dx = Some(value),
                (_, _, _, None) => p.dy = Some(value),
                _ => bail!("too many integer arguments: '{}'", arg),
            }
        }
    }
    Ok(p)
}

/// The sieve flavor picked by the flags, mirroring the original driver:
/// the donut octant is the default; `--octant` without `--donut` forces the
/// plain octant.
enum Flavor {
    OctantDonut,
    Octant,
    Sector,
    Block,
    BlockDonut,
}

fn resolve_flavor(cli: &Cli) -> Flavor {
    if cli.sector {
        Flavor::Sector
    } else if cli.block && cli.donut {
        Flavor::BlockDonut
    } else if cli.block {
        Flavor::Block
    } else if cli.octant && !cli.donut {
        Flavor::Octant
    } else {
        Flavor::OctantDonut
    }
}

pub fn execute(cli: &Cli) -> Result<()> {
    let p = parse_positionals(&cli.args)?;
    let Some(x) = p.x else {
        bail!("no norm bound given; use --help for usage");
    };
    let verbose = cli.verbose;

    let mut sieve: Box<dyn Sieve> = match resolve_flavor(cli) {
        Flavor::OctantDonut => {
            if verbose {
                info!("calling the octant donut sieve");
            }
            Box::new(OctantDonutSieve::new(x, verbose)?)
        }
        Flavor::Octant => {
            if verbose {
                info!("calling the octant sieve");
            }
            Box::new(OctantSieve::new(x, verbose)?)
        }
        Flavor::Sector => {
            let (Some(alpha), Some(beta)) = (p.alpha, p.beta) else {
                bail!("provide angle values alpha and beta to use the sector sieve");
            };
            if verbose {
                info!(alpha, beta, "calling the sector sieve");
            }
            Box::new(SectorSieve::new(x, alpha, beta, verbose)?)
        }
        Flavor::Block | Flavor::BlockDonut => {
            let (Some(y), Some(dx), Some(dy)) = (p.y, p.dx, p.dy) else {
                bail!("provide coordinates x, y, dx, and dy to use the block sieve");
            };
            if cli.donut {
                if verbose {
                    info!(x, y, dx, dy, "calling the block donut sieve");
                }
                Box::new(BlockDonutSieve::new(x as i64, y as i64, dx as i64, dy as i64, verbose)?)
            } else {
                if verbose {
                    info!(x, y, dx, dy, "calling the block sieve");
                }
                Box::new(BlockSieve::new(x as i64, y as i64, dx as i64, dy as i64, verbose)?)
            }
        }
    };

    sieve.run()?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if cli.printarray {
        out.write_all(sieve.render_sieve_array().as_bytes())?;
    }

    sieve.collect_big_primes();
    if cli.count {
        writeln!(out, "{}", sieve.big_primes().len())?;
        out.flush()?;
        return Ok(());
    }
    sieve.sort_big_primes();

    if cli.write {
        let name = sieve.write_big_primes_csv()?;
        info!(file = %name, "wrote primes");
    }

    // Default action when no other output was requested: print the primes.
    if cli.printprimes || !(cli.printarray || cli.write) {
        for g in sieve.big_primes() {
            writeln!(out, "{} {}", g.a, g.b)?;
        }
    }
    out.flush()?;
    Ok(())
}
