mod app;
mod config;
mod scene;

use std::path::PathBuf;
use std::process::ExitCode;

use autostash_chunk::VoxelCoord;
use clap::{Parser, Subcommand};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "autostash", version, about = "Deposit items into nearby chests")]
pub struct Cli {
    /// Settings file; created with defaults if missing
    #[arg(long, default_value = "autostash.toml")]
    pub config: PathBuf,

    /// Block table overriding the bundled one
    #[arg(long)]
    pub blocks: Option<PathBuf>,

    /// Item table overriding the bundled one
    #[arg(long)]
    pub items: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,

    /// Give up after this many ticks
    #[arg(long, default_value_t = 200)]
    pub max_ticks: u64,

    /// Requester id; defaults to the first player in the scene
    #[arg(long)]
    pub player: Option<u32>,

    /// Scene file describing the world
    pub scene: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search around the player and fill matching chests
    DepositAll,
    /// Deposit into one container, hotbar included
    QuickDeposit {
        #[arg(long, value_parser = parse_coord)]
        at: VoxelCoord,
    },
}

fn parse_coord(s: &str) -> Result<VoxelCoord, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts[..] else {
        return Err(format!("expected X,Y,Z, got `{s}`"));
    };
    let num = |v: &str| v.parse::<i32>().map_err(|e| format!("`{v}`: {e}"));
    Ok(VoxelCoord::new(num(x)?, num(y)?, num(z)?))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let log_cfg = simplelog::ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .build();
    let _ = simplelog::TermLogger::init(
        cli.log_level,
        log_cfg,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );

    match app::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_parse_with_spaces_and_negatives() {
        assert_eq!(parse_coord("3, -1,20"), Ok(VoxelCoord::new(3, -1, 20)));
        assert!(parse_coord("1,2").is_err());
        assert!(parse_coord("a,2,3").is_err());
    }

    #[test]
    fn command_defaults_to_none() {
        let cli = Cli::try_parse_from(["autostash", "scene.toml"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, LevelFilter::Info);
        let cli = Cli::try_parse_from(["autostash", "s.toml", "quick-deposit", "--at", "1,2,3"]).unwrap();
        assert!(matches!(cli.command, Some(Command::QuickDeposit { at }) if at == VoxelCoord::new(1, 2, 3)));
    }
}
