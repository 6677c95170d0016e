// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! `ancilla` command-line front end.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ancilla_core::{
    decrypt, embed_binary, encrypt, extract_binary, inspect, DecryptConfig, EmbeddingPlan,
    EncryptConfig, KeyDerivation,
};

#[derive(Parser, Debug)]
#[command(name = "ancilla", version, about = "Hide files in MP3 ancillary bytes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report frames and estimated ancillary space
    Inspect {
        input: PathBuf,
        /// Number of frames to list
        #[arg(long, default_value_t = 20)]
        frames: usize,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Embed raw bytes (no metadata, no cipher)
    Embed {
        input: PathBuf,
        output: PathBuf,
        /// File to embed
        #[arg(long, conflicts_with = "text", required_unless_present = "text")]
        file: Option<PathBuf>,
        /// UTF-8 text to embed
        #[arg(long)]
        text: Option<String>,
        #[command(flatten)]
        layout: Layout,
    },
    /// Extract raw bytes written by `embed`
    Extract {
        input: PathBuf,
        /// Where to write the payload
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print the payload as text
        #[arg(long)]
        text: bool,
        #[command(flatten)]
        layout: Layout,
    },
    /// Embed a file with metadata, optional obfuscation and frame scrambling
    Encrypt {
        input: PathBuf,
        secret: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        keying: Keying,
        #[command(flatten)]
        layout: Layout,
    },
    /// Recover a file written by `encrypt`
    Decrypt {
        input: PathBuf,
        /// Output directory; the embedded file name is used inside it
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        #[command(flatten)]
        keying: Keying,
        #[command(flatten)]
        layout: Layout,
    },
}

/// Parameters that must match between embedding and extraction.
#[derive(Args, Debug, Clone)]
struct Layout {
    /// Low bits per ancillary byte (1-4)
    #[arg(long, default_value_t = 1)]
    bits_per_byte: u8,
    /// Use every N-th frame
    #[arg(long, default_value_t = 1)]
    step: usize,
    /// First frame index used
    #[arg(long, default_value_t = 0)]
    start_frame: usize,
    /// Cap on ancillary bytes used overall
    #[arg(long)]
    max_bytes: Option<usize>,
}

#[derive(Args, Debug, Clone)]
struct Keying {
    #[arg(long, env = "ANCILLA_KEY", hide_env_values = true)]
    key: Option<String>,
    /// Obfuscate metadata and secret with the key
    #[arg(long)]
    encrypt: bool,
    /// Scramble frame order with the key
    #[arg(long)]
    scramble: bool,
    /// Use the single-seed derivation of older carriers
    #[arg(long)]
    legacy_keys: bool,
}

impl Layout {
    fn plan(&self) -> EmbeddingPlan {
        EmbeddingPlan::default()
            .with_bits_per_byte(self.bits_per_byte)
            .with_step(self.step)
            .with_start_frame(self.start_frame)
            .with_max_bytes(self.max_bytes)
    }
}

impl Keying {
    fn derivation(&self) -> KeyDerivation {
        if self.legacy_keys {
            KeyDerivation::Legacy
        } else {
            KeyDerivation::Separated
        }
    }
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn write(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).with_context(|| format!("writing {}", path.display()))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "secret.bin".to_string())
}

fn run_inspect(input: &Path, limit: usize, json: bool) -> Result<()> {
    let report = inspect(&read(input)?);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!("Frames found: {}", report.frame_count);
    println!("Frames with ancillary bytes: {}", report.frames_with_ancillary);
    println!("Total ancillary bytes (est): {}", report.total_ancillary_bytes);
    if report.unparsed_side_info > 0 {
        println!("Frames with unparsed side info: {}", report.unparsed_side_info);
    }
    let caps: Vec<String> = (1..=4)
        .map(|k| format!("{k}: {}", report.capacity_bits(k)))
        .collect();
    println!("Capacity in bits per LSB depth: {}", caps.join(", "));
    for f in report.frames.iter().take(limit) {
        println!(
            " frame {:5} at {:9} size={:5} anc_at={:9} anc_len={:4}",
            f.index, f.header_offset, f.frame_size, f.ancillary_offset, f.ancillary_len
        );
    }
    println!("Ancillary regions are estimated from part2_3_length and ignore the bit reservoir.");
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Inspect { input, frames, json } => run_inspect(&input, frames, json)?,

        Command::Embed { input, output, file, text, layout } => {
            let payload = match (file, text) {
                (Some(path), _) => read(&path)?,
                (None, Some(text)) => text.into_bytes(),
                (None, None) => bail!("either --file or --text is required"),
            };
            let (out, report) = embed_binary(&read(&input)?, &payload, &layout.plan())?;
            write(&output, &out)?;
            println!(
                "Embedded {} bits in {} ancillary bytes (capacity {} bits)",
                report.bits_written, report.bytes_touched, report.capacity_bits
            );
        }

        Command::Extract { input, output, text, layout } => {
            let payload = extract_binary(&read(&input)?, &layout.plan())?;
            if text {
                println!("{}", String::from_utf8_lossy(&payload));
            }
            match output {
                Some(path) => write(&path, &payload)?,
                None if !text => {
                    println!("Recovered {} bytes; pass --output to save them", payload.len())
                }
                None => {}
            }
        }

        Command::Encrypt { input, secret, output, keying, layout } => {
            let config = EncryptConfig {
                original_file_name: Some(file_name(&input)),
                embedded_file_name: file_name(&secret),
                use_encryption: keying.encrypt,
                random_embedding: keying.scramble,
                lsb_bits: layout.bits_per_byte,
                encryption_key: keying.key.clone(),
                key_derivation: keying.derivation(),
                step: layout.step,
                start_frame: layout.start_frame,
                max_bytes: layout.max_bytes,
            };
            let out = encrypt(&config, &read(&input)?, &read(&secret)?)?;
            write(&output, &out.carrier)?;
            println!(
                "Embedded {} ({} bits, {} ancillary bytes), PSNR {:.2} dB",
                config.embedded_file_name,
                out.report.bits_written,
                out.report.bytes_touched,
                out.psnr
            );
        }

        Command::Decrypt { input, out_dir, keying, layout } => {
            let config = DecryptConfig::new(
                keying.key.as_deref(),
                keying.scramble,
                keying.encrypt,
                layout.bits_per_byte,
            )
            .with_key_derivation(keying.derivation())
            .with_step(layout.step)
            .with_start_frame(layout.start_frame)
            .with_max_bytes(layout.max_bytes);
            let got = decrypt(&read(&input)?, &config)?;
            // Only the final path component of the recorded name is trusted.
            let name = file_name(Path::new(&got.metadata.file_name));
            let path = out_dir.join(name);
            write(&path, &got.secret)?;
            println!("Recovered {} ({} bytes)", path.display(), got.secret.len());
        }
    }
    Ok(())
}
