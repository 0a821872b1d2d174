//! # XSVF to CSVF Converter
//!
//! Command line front-end of [`csvf_format`]. Converts XSVF programs produced by Xilinx
//! tools (or `svf2xsvf`) into CSVF files that can be stored on and played by an embedded
//! JTAG programmer, and expands CSVF files back for inspection.
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use clap_num::maybe_hex;
use csvf_format::convert::{Builder, Config};
use env_logger::Env;

#[derive(Subcommand, Eq, PartialEq, Clone, Debug)]
enum Command {
    /// Convert an XSVF program into a CSVF file
    Convert {
        input: PathBuf,
        #[arg(short, long, help = "Output file [default: <input>.csvf]")]
        output: Option<PathBuf>,
        #[arg(long, help = "Keep bit-sequences in their original byte order")]
        no_swap: bool,
        #[arg(
            short,
            long,
            value_parser = maybe_hex::<u16>,
            help = "Playback buffer size of the target in bytes, decimal or 0x-prefixed hex"
        )]
        max_buffer: Option<u16>,
    },
    /// Expand a CSVF file back into the swapped XSVF command stream
    Expand {
        input: PathBuf,
        #[arg(short, long, help = "Output file [default: <input>.swapped]")]
        output: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(about = "Convert XSVF JTAG programs into forward-playable CSVF", long_about=None)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

fn convert_config(no_swap: bool, max_buffer: Option<u16>) -> Config {
    let builder = Builder::new().swap(!no_swap);
    match max_buffer {
        Some(size) => builder.max_buffer_size(size).build(),
        None => builder.build(),
    }
}

fn output_path(input: &Path, output: Option<PathBuf>, extension: &str) -> PathBuf {
    output.unwrap_or_else(|| input.with_extension(extension))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::debug!("Parsed arguments: {:?}", args.command);

    match args.command {
        Command::Convert {
            input,
            output,
            no_swap,
            max_buffer,
        } => {
            let config = convert_config(no_swap, max_buffer);
            log::debug!(
                "Conversion config: swap={}, max_buffer_size={:?}",
                config.swap,
                config.max_buffer_size
            );
            let output = output_path(&input, output, "csvf");

            log::info!("Converting {}", input.display());
            let conversion = match csvf_format::convert_file(&input, &config) {
                Ok(conversion) => conversion,
                Err(e) => {
                    log::error!("Conversion failed ({:?}): {}", e.kind(), e);
                    return Err(e.into());
                }
            };
            fs::write(&output, &conversion.csvf)?;
            log::info!(
                "Wrote {} bytes to {}",
                conversion.csvf.len(),
                output.display()
            );
            println!("Max buffer size: {}", conversion.max_buffer_size);
        }
        Command::Expand { input, output } => {
            let output = output_path(&input, output, "swapped");
            let body = fs::read(&input)?;
            let swapped = csvf_format::expand(&body)?;
            fs::write(&output, &swapped)?;
            log::info!(
                "Expanded {} bytes into {} bytes at {}",
                body.len(),
                swapped.len(),
                output.display()
            );
        }
    }
    Ok(())
}
