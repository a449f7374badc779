use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cube_core::classifier::rgb_to_hsl;
use cube_core::sampling::{auto_detect, load_rgb};
use cube_core::{ColorClassifier, CubeState, Rgb, Strategy, facelet, notation, validate};
use cube_solver::config::parse_timeout;
use cube_solver::solver::UNEXPECTED_FAILURE_MESSAGE;
use cube_solver::{SolutionSource, Solver, SolverConfig};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "cube-solver")]
#[command(about = "Validate, encode and solve a 3x3 cube from its sticker colors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that every sticker is set and each color appears nine times
    Validate {
        /// 54 color letters (W Y R O G B, ? for unset) in U R F D L B order, or - for stdin
        cube: String,
    },
    /// Print the facelet string sent to solving services
    Encode {
        /// 54 color letters in U R F D L B order, or - for stdin
        cube: String,
    },
    /// Validate the cube, then ask the solving services for a solution
    Solve {
        /// 54 color letters in U R F D L B order, or - for stdin
        cube: String,

        /// Solver endpoint URL, in priority order (repeatable; overrides CUBE_SOLVER_ENDPOINTS)
        #[arg(long = "endpoint")]
        endpoints: Vec<String>,

        /// Per-endpoint timeout in seconds (overrides CUBE_SOLVER_TIMEOUT_SECS)
        #[arg(long)]
        timeout: Option<String>,
    },
    /// Classify an averaged RGB sample as a sticker color
    Classify {
        r: u8,
        g: u8,
        b: u8,

        #[arg(long, default_value_t = Strategy::Hsl)]
        strategy: Strategy,
    },
    /// Read a cube from two corner photos (Up/Front/Right and Down/Back/Left)
    Detect {
        corner1: PathBuf,
        corner2: PathBuf,

        #[arg(long, default_value_t = Strategy::Hsl)]
        strategy: Strategy,
    },
    /// Show the move notation legend
    Notation,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { cube } => {
            let cube = read_cube(&cube)?;
            let validation = validate(&cube);
            print!("{}", cube);
            println!();
            for (color, count) in &validation.color_counts {
                println!("  {:<7} {}", color.name(), count);
            }
            if validation.is_valid {
                println!("Cube is valid.");
                Ok(ExitCode::SUCCESS)
            } else {
                for error in &validation.errors {
                    println!("Error: {}", error);
                }
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Encode { cube } => {
            let cube = read_cube(&cube)?;
            println!("{}", facelet::encode(&cube));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Solve {
            cube,
            endpoints,
            timeout,
        } => {
            let cube = read_cube(&cube)?;
            let validation = validate(&cube);
            if !validation.is_valid {
                println!("Error: {}", validation.summary());
                return Ok(ExitCode::FAILURE);
            }

            let config = build_config(endpoints, timeout).context(UNEXPECTED_FAILURE_MESSAGE)?;
            let solver = Solver::from_config(&config).context(UNEXPECTED_FAILURE_MESSAGE)?;
            println!("Facelets: {}", facelet::encode(&cube));
            println!("Endpoints: {}", config.endpoints.join(", "));
            println!();

            let result = solver.solve(&cube).await;
            if let Some(error) = &result.error {
                println!("Error: {}", error);
                return Ok(ExitCode::FAILURE);
            }

            match &result.source {
                SolutionSource::AlreadySolved => println!("{}", result.solution),
                SolutionSource::Endpoint(name) => {
                    println!("Solution from {} ({} moves):", name, result.moves.len());
                    println!("{}", result.solution);
                }
                SolutionSource::Placeholder => {
                    if let Some(notice) = result.notice() {
                        println!("Warning: {}", notice);
                    }
                    println!("{}", result.solution);
                }
                SolutionSource::Incomplete => {}
            }
            for (i, mv) in result.moves.iter().enumerate() {
                println!("  {:>2}. {:<3} {}", i + 1, mv.to_string(), mv.describe());
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Classify { r, g, b, strategy } => {
            let rgb = Rgb::new(r, g, b);
            let hsl = rgb_to_hsl(rgb);
            let color = strategy.classify(rgb);
            println!(
                "{} (hsl {:.0}°, {:.0}%, {:.0}%) -> {} [{}]",
                rgb.hex(),
                hsl.h,
                hsl.s,
                hsl.l,
                color,
                strategy
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Detect {
            corner1,
            corner2,
            strategy,
        } => {
            let img1 = load_rgb(&corner1)?;
            let img2 = load_rgb(&corner2)?;
            let cube = auto_detect(&img1, &img2, &strategy);
            print!("{}", cube);
            println!();
            println!("{}", cube.to_color_string());
            let validation = validate(&cube);
            if validation.is_valid {
                println!("Detected cube is valid.");
            } else {
                println!("Check the detected colors: {}", validation.summary());
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Notation => {
            for (symbol, meaning) in notation::LEGEND {
                println!("  {:<2} {}", symbol, meaning);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_cube(arg: &str) -> Result<CubeState> {
    let text = if arg == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read cube from stdin")?;
        buf
    } else {
        arg.to_string()
    };
    CubeState::from_color_string(&text).context("Invalid cube input")
}

fn build_config(endpoints: Vec<String>, timeout: Option<String>) -> Result<SolverConfig> {
    let mut config = SolverConfig::from_env()?.with_endpoints(endpoints);
    if let Some(raw) = timeout {
        config = config.with_timeout(parse_timeout(&raw)?);
    }
    Ok(config)
}
