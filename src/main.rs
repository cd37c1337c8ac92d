use clap::Parser;
use pallet_packer::config::{SearchConfig, validate_dimensions};
use pallet_packer::optimize::{auto_optimize_box_count, solve_with_scaling};
use pallet_packer::render;
use pallet_packer::solver::Solver;
use pallet_packer::types::{BoxDims, Pallet, Solution};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "pallet_packer",
    about = "Arranges identical boxes on a pallet in a rows x columns grid"
)]
struct Cli {
    /// Box dimensions (WxL, e.g. 8x10)
    #[arg(long = "box")]
    box_dims: String,

    /// Number of boxes; omit to find the most that fit
    #[arg(long)]
    count: Option<usize>,

    /// Pallet dimensions (WxL)
    #[arg(long, default_value = "40x48")]
    pallet: String,

    /// Grow the pallet if the boxes do not fit
    #[arg(long)]
    scale: bool,

    /// Show ASCII layout of the pallet
    #[arg(long)]
    layout: bool,

    /// Preferred rows:columns ratio (default: 1.2)
    #[arg(long)]
    target_ratio: Option<f64>,

    /// Log every search step to stderr
    #[arg(long)]
    verbose: bool,
}

fn parse_dimensions(s: &str) -> Result<(f64, f64), String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected WxL", s));
    }
    let width = parts[0]
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let length = parts[1]
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid length in '{}'", s))?;
    Ok((width, length))
}

fn parse_box(s: &str, max_dimension: f64) -> Result<BoxDims, String> {
    let (width, length) = parse_dimensions(s)?;
    validate_dimensions(width, length, max_dimension).map_err(|e| format!("box {}", e))?;
    if width > length {
        eprintln!(
            "Warning: box width {} is greater than length {}, swapping",
            width, length
        );
    }
    Ok(BoxDims::new(width, length))
}

fn parse_pallet(s: &str, max_dimension: f64) -> Result<Pallet, String> {
    let (width, length) = parse_dimensions(s)?;
    validate_dimensions(width, length, max_dimension).map_err(|e| format!("pallet {}", e))?;
    Ok(Pallet::new(width, length))
}

fn exit_with(message: String) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn print_solution(solution: &Solution, layout: bool) {
    let footprint = solution.footprint();
    let pallet_note = if solution.pallet.is_standard() {
        " (standard)"
    } else {
        ""
    };

    println!("Strategy: {}", solution.strategy);
    println!("Boxes: {} x {}", solution.count(), solution.box_dims);
    println!("Grid: {}", solution.arrangement.shape());
    println!("Pallet: {}{}", solution.pallet, pallet_note);
    println!(
        "Footprint: {:.1}x{:.1}, {:.1}% efficient",
        footprint.width,
        footprint.length,
        solution.efficiency() * 100.0
    );
    println!();
    print!("{}", solution.arrangement);

    if layout {
        println!();
        print!(
            "{}",
            render::render_layout(&solution.pallet, &solution.placements())
        );
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let mut config = SearchConfig::default();
    if let Some(ratio) = cli.target_ratio {
        config.target_ratio = ratio;
    }
    config.validate().unwrap_or_else(|e| exit_with(e));

    let box_dims = parse_box(&cli.box_dims, config.max_dimension).unwrap_or_else(|e| exit_with(e));
    let pallet = parse_pallet(&cli.pallet, config.max_dimension).unwrap_or_else(|e| exit_with(e));

    let solution = match cli.count {
        Some(0) => exit_with("count must be at least 1".to_string()),
        Some(count) if cli.scale => solve_with_scaling(&box_dims, count, &pallet, &config),
        Some(count) => Solver::new(box_dims, pallet, config).solve(count),
        None => auto_optimize_box_count(&Solver::new(box_dims, pallet, config)),
    };

    let Some(solution) = solution else {
        let what = match cli.count {
            Some(count) => format!("{} boxes", count),
            None => "any number of boxes".to_string(),
        };
        exit_with(format!(
            "no arrangement of {} of {} fits on pallet {}",
            what, box_dims, pallet
        ));
    };

    print_solution(&solution, cli.layout);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(parse_dimensions("8x10"), Ok((8.0, 10.0)));
        assert_eq!(parse_dimensions("12.5x 20"), Ok((12.5, 20.0)));
        assert!(parse_dimensions("8").is_err());
        assert!(parse_dimensions("8x10x12").is_err());
        assert!(parse_dimensions("axb").is_err());
    }

    #[test]
    fn test_parse_box_swaps_sides() {
        let b = parse_box("10x8", 1000.0).unwrap();
        assert_eq!(b, BoxDims::new(8.0, 10.0));
        assert_eq!(b.width, 8.0);
    }

    #[test]
    fn test_parse_box_rejects_bad_sizes() {
        assert!(parse_box("0x10", 1000.0).is_err());
        assert!(parse_box("-2x10", 1000.0).is_err());
        assert!(parse_box("8x2000", 1000.0).is_err());
    }

    #[test]
    fn test_parse_pallet_keeps_orientation() {
        assert_eq!(parse_pallet("48x40", 1000.0), Ok(Pallet::new(48.0, 40.0)));
        assert!(parse_pallet("40", 1000.0).is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["pallet_packer", "--box", "8x10"]);
        assert_eq!(cli.pallet, "40x48");
        assert_eq!(cli.count, None);
        assert!(!cli.scale && !cli.layout && !cli.verbose);
    }
}
