use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jsonlog::{CodecConfig, CodecError, Compression, JsonFileFactory, Record};

#[derive(clap::Parser, Debug)]
#[command(name = "jsonlog-cli", version, about = "Inspect and produce jsonlog streams")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args, Debug, Clone, Copy)]
struct CompressionArgs {
    /// zstd level; omit for an uncompressed stream
    #[arg(long)]
    zstd: Option<i32>,
}

impl CompressionArgs {
    fn config(self) -> CodecConfig {
        let compression = match self.zstd {
            Some(level) => Compression::Zstd { level },
            None => Compression::None,
        };
        CodecConfig::builder().compression(compression).build()
    }
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// write <path>: one JSON value per stdin line, offsets counting up from --first-offset
    Write {
        path: PathBuf,
        #[arg(long, default_value_t = 0)]
        first_offset: i64,
        #[command(flatten)]
        compression: CompressionArgs,
    },
    /// read <path>: print "<offset> <value>" per record
    Read {
        path: PathBuf,
        /// Optional number of records to print (default = all)
        #[arg(short)]
        n: Option<u64>,
        #[command(flatten)]
        compression: CompressionArgs,
    },
    /// verify <path>: scan the whole stream and report whether it ends cleanly
    Verify {
        path: PathBuf,
        #[command(flatten)]
        compression: CompressionArgs,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Write {
            path,
            first_offset,
            compression,
        } => cmd_write(path, first_offset, compression.config())?,
        Cmd::Read {
            path,
            n,
            compression,
        } => cmd_read(path, n, compression.config())?,
        Cmd::Verify { path, compression } => cmd_verify(path, compression.config())?,
    }

    Ok(())
}

fn cmd_write(
    path: PathBuf,
    first_offset: i64,
    cfg: CodecConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let factory = JsonFileFactory::local(cfg);
    let mut writer = factory.build_writer(&path)?;
    let started = Instant::now();

    let stdin = std::io::stdin();
    let mut offset = first_offset;
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        writer.write(&Record::new(offset, line))?;
        offset = offset.saturating_add(1);
    }
    writer.close()?;

    eprintln!(
        "wrote {} records, {} bytes in {:.2}s",
        writer.records_written(),
        writer.length(),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn cmd_read(
    path: PathBuf,
    n: Option<u64>,
    cfg: CodecConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let factory = JsonFileFactory::local(cfg);
    let mut reader = factory.build_reader(&path)?;
    let max = n.unwrap_or(u64::MAX);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut i = 0u64;
    while i < max {
        let Some(record) = reader.next_record()? else {
            break;
        };
        out.write_all(record.offset.to_string().as_bytes())?;
        out.write_all(b" ")?;
        out.write_all(&record.value)?;
        out.write_all(b"\n")?;
        i += 1;
    }
    out.flush()?;
    reader.close();
    Ok(())
}

fn cmd_verify(path: PathBuf, cfg: CodecConfig) -> Result<(), Box<dyn std::error::Error>> {
    let factory = JsonFileFactory::local(cfg);
    let mut reader = factory.build_reader(&path)?;

    let mut first: Option<i64> = None;
    let mut last: Option<i64> = None;
    let mut out_of_order = 0u64;
    let outcome = loop {
        match reader.next_record() {
            Ok(Some(record)) => {
                if last.is_some_and(|prev| record.offset <= prev) {
                    out_of_order += 1;
                }
                first.get_or_insert(record.offset);
                last = Some(record.offset);
            }
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        }
    };

    println!(
        "records: {}  first offset: {}  last offset: {}  non-increasing: {}",
        reader.records_read(),
        first.map_or_else(|| "-".to_string(), |o| o.to_string()),
        last.map_or_else(|| "-".to_string(), |o| o.to_string()),
        out_of_order
    );
    match outcome {
        Ok(()) => {
            println!("clean end of stream");
            Ok(())
        }
        Err(e @ CodecError::TruncatedFrame { .. }) => {
            println!("torn tail after {} good records", reader.records_read());
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
