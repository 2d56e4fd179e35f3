use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(
    name = "uvm",
    version,
    about = "Accumulator byte-machine: assemble and run load/write/read/sgn scripts"
)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv per-instruction trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a script, a YAML program (.yaml/.yml) or a binary image (.bin)
    Run {
        file: PathBuf,
        /// Write a JSON memory dump to this file
        #[arg(long, value_name = "JSON")]
        dump: Option<PathBuf>,
        /// Half-open address range for --dump
        #[arg(long, num_args = 2, value_names = ["START", "END"], requires = "dump")]
        range: Option<Vec<u64>>,
    },
    /// Assemble a script or YAML program into a binary image
    Assemble {
        file: PathBuf,
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: PathBuf,
        /// Print the per-instruction listing
        #[arg(long)]
        listing: bool,
        /// Print the image as a flat list of hex bytes
        #[arg(long)]
        hex: bool,
    },
    /// Print the listing of a binary image
    Disasm { file: PathBuf },
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_with_range() {
        let cli = Cli::parse_from(["uvm", "-vv", "run", "prog.asm", "--dump", "out.json", "--range", "190", "210"]);
        assert_eq!(cli.log_level(), LevelFilter::Debug);
        match cli.command {
            Command::Run { file, dump, range } => {
                assert_eq!(file, PathBuf::from("prog.asm"));
                assert_eq!(dump, Some(PathBuf::from("out.json")));
                assert_eq!(range, Some(vec![190, 210]));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_assemble_flags() {
        let cli = Cli::parse_from(["uvm", "assemble", "prog.asm", "-o", "prog.bin", "--listing"]);
        assert_eq!(cli.log_level(), LevelFilter::Warn);
        assert!(matches!(cli.command, Command::Assemble { listing: true, hex: false, .. }));
    }

    #[test]
    fn test_range_requires_dump() {
        assert!(Cli::try_parse_from(["uvm", "run", "p.asm", "--range", "0", "4"]).is_err());
    }
}
