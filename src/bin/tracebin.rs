//! tracebin CLI: a compression/decompression tool for working with trace
//! binary files.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use tracebin::{CompressionType, FileProcessor, Transcoder};

#[derive(Parser)]
#[command(
    name = "tracebin",
    version,
    about = "A compression/decompression tool for working with trace binary files"
)]
struct Cli {
    /// The incoming binary trace file to manipulate
    input: PathBuf,

    /// The resulting binary trace file to generate
    output: PathBuf,

    /// The compression to use when generating the output file.
    /// Possible values: NONE, LZ4, LZ77
    #[arg(value_name = "COMPRESSION")]
    compression: CompressionType,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("ERROR: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), tracebin::TracebinError> {
    let mut processor = FileProcessor::open(&cli.input)?;
    let src_compression = processor.compression_type();

    let mut transcoder = Transcoder::create(
        &cli.output,
        processor.header(),
        processor.options(),
        cli.compression,
    )?;
    processor.add_decoder(&mut transcoder);
    processor.process_all_frames()?;

    let bytes_read = processor.num_bytes_read();
    drop(processor);
    transcoder.finish()?;
    let bytes_written = transcoder.num_bytes_written();

    if cli.compression != CompressionType::None {
        let percent_reduction = 100.0 * (1.0 - bytes_written as f64 / bytes_read as f64);
        println!("Compression Results:");
        println!(
            "  Original Size   [Compression: {:>5}] = {} bytes",
            src_compression, bytes_read
        );
        println!(
            "  Compressed Size [Compression: {:>5}] = {} bytes",
            cli.compression, bytes_written
        );
        println!(
            "  Percent Reduction                    = {:.2}%",
            percent_reduction
        );
    } else {
        let percent_increase = 100.0 * (bytes_written as f64 / bytes_read as f64 - 1.0);
        println!("Uncompression Results:");
        println!(
            "  Original Size   [Compression: {:>5}] = {} bytes",
            src_compression, bytes_read
        );
        println!(
            "  Uncompressed Size                    = {} bytes",
            bytes_written
        );
        println!(
            "  Percent Increase                     = {:.2}%",
            percent_increase
        );
    }

    Ok(())
}
