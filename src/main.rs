mod cli;

use std::fs;
use std::path::Path;
use std::process;

use clap::Parser;
use log::info;
use simple_logger::SimpleLogger;

use cli::{Cli, Command};
use uvm::assembler::{disassemble, hex_bytes, listing, Assembler};
use uvm::dump::{MemoryDump, DEFAULT_RANGE};
use uvm::{parse_program, parse_yaml_program, Program, Result, Vm};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = SimpleLogger::new().with_level(cli.log_level()).init() {
        eprintln!("Warning: logger not installed: {}", e);
    }

    if let Err(e) = dispatch(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Run { file, dump, range } => run(&file, dump.as_deref(), range),
        Command::Assemble {
            file,
            output,
            listing,
            hex,
        } => assemble(&file, &output, listing, hex),
        Command::Disasm { file } => disasm(&file),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    Image,
    Yaml,
    Script,
}

fn input_format(path: &Path) -> InputFormat {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("bin") => InputFormat::Image,
        Some("yaml") | Some("yml") => InputFormat::Yaml,
        _ => InputFormat::Script,
    }
}

fn load_program(path: &Path) -> Result<Program> {
    match input_format(path) {
        InputFormat::Image => {
            let bytes = fs::read(path)?;
            info!("reading image {} ({} bytes)", path.display(), bytes.len());
            disassemble(&bytes)
        }
        InputFormat::Yaml => {
            let source = fs::read_to_string(path)?;
            info!("reading YAML program {}", path.display());
            parse_yaml_program(&source)
        }
        InputFormat::Script => {
            let source = fs::read_to_string(path)?;
            info!("reading script {}", path.display());
            parse_program(&source)
        }
    }
}

fn run(path: &Path, dump: Option<&Path>, range: Option<Vec<u64>>) -> Result<()> {
    let program = load_program(path)?;

    let mut vm = Vm::new();
    vm.run(&program)?;
    info!("executed {} instructions", vm.executed());

    if let Some(dump_path) = dump {
        let (start, end) = match range.as_deref() {
            Some([start, end]) => (*start, *end),
            _ => DEFAULT_RANGE,
        };
        MemoryDump::capture(vm.machine(), start, end)?.save(dump_path)?;
    }

    println!("Accumulator: {}", vm.machine().accumulator());
    Ok(())
}

fn assemble(path: &Path, output: &Path, show_listing: bool, show_hex: bool) -> Result<()> {
    let program = load_program(path)?;
    let image = Assembler::assemble(&program)?;

    println!("Assembled instructions: {}", program.len());
    println!("Total program size: {} bytes", image.len());

    if show_listing {
        println!("=== Listing ===");
        print!("{}", listing(&program, &image));
    }
    if show_hex {
        println!("=== Bytes ===");
        println!("{}", hex_bytes(&image.bytes));
    }

    fs::write(output, &image.bytes)?;
    eprintln!("Wrote {} bytes to {}", image.len(), output.display());
    Ok(())
}

fn disasm(path: &Path) -> Result<()> {
    let bytes = fs::read(path)?;
    let program = disassemble(&bytes)?;
    let image = Assembler::assemble(&program)?;
    print!("{}", listing(&program, &image));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_format() {
        assert_eq!(input_format(Path::new("prog.bin")), InputFormat::Image);
        assert_eq!(input_format(Path::new("prog.BIN")), InputFormat::Image);
        assert_eq!(input_format(Path::new("prog.yaml")), InputFormat::Yaml);
        assert_eq!(input_format(Path::new("dir/prog.yml")), InputFormat::Yaml);
        assert_eq!(input_format(Path::new("prog.asm")), InputFormat::Script);
        assert_eq!(input_format(Path::new("prog")), InputFormat::Script);
    }
}
