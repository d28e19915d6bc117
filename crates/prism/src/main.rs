use clap::{Parser, Subcommand};
use prism::command::{NavCommand, SOCKET_PATH};
use prism::config;
use prism::geometry::{DEFAULT_SELECTOR, Layout};
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "prism", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Rotate the carousel to the next facet
    Next,
    /// Rotate the carousel to the previous facet
    Prev,
    /// Rotate the carousel to a facet (negative indices count from the end)
    Show {
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
    /// Print the ring layout computed for a configuration
    Layout {
        /// Configuration file (defaults to the user config)
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Selector prefixed to every generated placement rule
        #[arg(short = 's', long, default_value = DEFAULT_SELECTOR)]
        selector: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Next => send_command(NavCommand::Next),
        Commands::Prev => send_command(NavCommand::Prev),
        Commands::Show { index } => send_command(NavCommand::Show(index)),
        Commands::Layout { config, selector } => print_layout(config, &selector),
    }
}

fn print_layout(path: Option<PathBuf>, selector: &str) -> anyhow::Result<()> {
    let config = match path {
        Some(path) => config::load_from(&path)?,
        None => config::load_config()?,
    };
    config.validate()?;
    let layout = Layout::compute(config.images.len(), config.width, config.gap)?;

    println!("facets:     {}", layout.facets);
    println!("radius:     {}px", layout.radius);
    println!("angle step: {}deg", layout.angle_step);
    for (slide, angle) in layout.slides.iter() {
        println!("slide {slide:>3}:  {angle}deg  {}", config.images[slide]);
    }
    println!();
    println!("{}", layout.stylesheet(selector));
    Ok(())
}

fn send_command(cmd: NavCommand) -> anyhow::Result<()> {
    log::debug!("Sending '{}' to {}", cmd, SOCKET_PATH);
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to prism daemon at {}: {}. Is the carousel running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", cmd)?;
    Ok(())
}
