//! txdecode - print the contents of a raw Bitcoin transaction

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use txdecode::{DecodeOptions, Result, TrailingData, Transaction, VarintPolicy, decode_with};

/// Decoded when no input is given
const SAMPLE_TX: &str = "0200000000010131811cd355c357e0e01437d9bcf690df824e9ff785012b6115dfae3d8e8b36c10100000000fdffffff0220a107000000000016001485d78eb795bd9c8a21afefc8b6fdaedf718368094c08100000000000160014840ab165c9c2555d4a31b9208ad806f89d2535e20247304402207bce86d430b58bb6b79e8c1bbecdf67a530eff3bc61581a1399e0b28a741c0ee0220303d5ce926c60bf15577f2e407f28a2ef8fe8453abd4048b716e97dbb1e3a85c01210260828bc77486a55e3bc6032ccbeda915d9494eda17b4a54dbe3b24506d40e4ff43030e00";

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "txdecode", version, about = "Decode a raw Bitcoin transaction")]
struct Args {
    /// Transaction hex; read from --file or stdin when omitted
    hex: Option<String>,

    /// Read the transaction hex from a file
    #[arg(long, conflicts_with = "hex")]
    file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Load decoder options from a TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fail if bytes follow the locktime
    #[arg(long)]
    reject_trailing: bool,

    /// Fail on varints that are not in their shortest form
    #[arg(long)]
    minimal_varints: bool,
}

impl Args {
    fn options(&self) -> Result<DecodeOptions> {
        let mut opts = match &self.config {
            Some(path) => DecodeOptions::load(path)?,
            None => DecodeOptions::default(),
        };
        if self.reject_trailing {
            opts.trailing = TrailingData::Reject;
        }
        if self.minimal_varints {
            opts.varints = VarintPolicy::Minimal;
        }
        Ok(opts)
    }

    fn input(&self) -> Result<String> {
        if let Some(hex) = &self.hex {
            debug!(len = hex.len(), "reading transaction from argument");
            return Ok(hex.clone());
        }
        if let Some(path) = &self.file {
            debug!(path = %path.display(), "reading transaction from file");
            return Ok(fs::read_to_string(path)?);
        }

        let stdin = io::stdin();
        if !stdin.is_terminal() {
            let mut buf = String::new();
            stdin.lock().read_to_string(&mut buf)?;
            if !buf.trim().is_empty() {
                debug!(len = buf.len(), "reading transaction from stdin");
                return Ok(buf);
            }
        }

        info!("no input given, decoding built-in sample");
        Ok(SAMPLE_TX.to_string())
    }
}

fn run(args: &Args) -> Result<Transaction> {
    let opts = args.options()?;
    debug!(?opts, "decoder options");
    let tx = decode_with(&args.input()?, &opts)?;
    info!(txid = %tx.txid(), segwit = tx.segwit, "decoded transaction");
    Ok(tx)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let tx = match run(&args) {
        Ok(tx) => tx,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match args.format {
        Format::Text => println!("{tx}"),
        Format::Json => match serde_json::to_string_pretty(&tx) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("failed to serialize transaction: {e}");
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}
