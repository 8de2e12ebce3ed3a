//! # Moat Main — Moat Explorer Entry Point
//!
//! Drives the three moat explorers: the bounded octant flood fill, the
//! vertical sliding-block walk, and the segmented origin-component counter.

use anyhow::{bail, Result};
use clap::Parser;
use gintsieve::moat::{OctantMoat, SegmentedMoat, VerticalMoat};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Explore connected components of the Gaussian prime graph under hops of
/// bounded length.
#[derive(Parser)]
#[command(name = "gintmoat")]
struct Cli {
    /// Maximum Euclidean hop length between primes
    jump_size: f64,

    /// Explore the component of 1+i in the octant with this norm bound
    #[arg(long, value_name = "NORM_BOUND")]
    octant: Option<u64>,

    /// Look for a vertical moat starting at this real part
    #[arg(long, value_name = "REAL_PART")]
    vertical: Option<i64>,

    /// Count the origin component with the segmented explorer
    #[arg(long)]
    segmented: bool,

    /// Segment width for the segmented explorer
    #[arg(long, default_value_t = 1_000)]
    width: i64,

    /// Real-part cap before the segmented explorer gives up
    #[arg(long, default_value_t = 20_000)]
    max_real: i64,

    /// Display exploration progress on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
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
            eprintln!("{}", err.render());
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match (cli.octant, cli.vertical, cli.segmented) {
        (Some(norm_bound), None, false) => {
            let mut moat = OctantMoat::new(norm_bound, cli.jump_size, cli.verbose)?;
            let component = moat.explore_component(1, 1);
            println!("component size: {}", component.len());
            if let Some(g) = moat.component_max_element() {
                println!("component max element: {} {}", g.a, g.b);
            }
            println!("unexplored primes: {}", moat.unexplored().len());
            Ok(())
        }
        (None, Some(real_part), false) => {
            let moat = VerticalMoat::new(real_part, cli.jump_size, cli.verbose)?;
            moat.run()
        }
        (None, None, true) => {
            let mut moat = SegmentedMoat::with_segment_width(
                cli.jump_size,
                cli.verbose,
                cli.width,
                cli.max_real,
            )?;
            let size = moat.run()?;
            println!("origin component size: {}", size);
            Ok(())
        }
        _ => bail!("choose exactly one of --octant, --vertical, --segmented"),
    }
}
