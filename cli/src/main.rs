use clap::{Parser, Subcommand};
use hound::{SampleFormat, WavSpec};
use log::{info, warn};
use phonetone_core::generator::{DEFAULT_GAP_MS, DEFAULT_TONE_MS};
use phonetone_core::{
    Decoder, DetectorConfig, SampleEncoding, Symbol, ToneGenerator, TonePlan, SAMPLE_RATE,
};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("Unsupported WAV format: {0}")]
    UnsupportedWav(String),

    #[error("Unknown MF symbol '{0}'")]
    UnknownMfSymbol(String),
}

#[derive(Parser)]
#[command(name = "phonetone")]
#[command(about = "Decode DTMF, MF and call-progress tones from 8-bit PCM audio")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode raw 8 kHz 8-bit samples (or an 8-bit WAV file) to text
    Decode {
        /// Input samples, stdin if omitted
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        /// Output text file, stdout if omitted
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Raw input is unsigned (zero at 128) instead of signed
        #[arg(short, long)]
        unsigned: bool,

        /// Silent frames (30 ms each) before a line break
        #[arg(long, default_value_t = phonetone_core::config::DEFAULT_FLUSH_FRAMES)]
        flush_frames: usize,

        /// Fraction of the loudest tone another tone must reach to count
        #[arg(long, default_value_t = phonetone_core::config::DEFAULT_RANGE_FRACTION)]
        range: f32,

        /// Minimum power of the loudest tone before a frame is not silence
        #[arg(long, default_value_t = phonetone_core::config::DEFAULT_SILENCE_FLOOR)]
        threshold: f32,

        /// Do not flush output after every symbol
        #[arg(long)]
        no_flush: bool,
    },

    /// Synthesize a tone sequence
    Generate {
        /// Keys to dial (0-9 * # A-D), or space separated MF codes with --mf
        #[arg(value_name = "NUMBER")]
        number: String,

        /// Output file (raw samples, or WAV with --wav)
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Write a WAV container instead of raw samples
        #[arg(long)]
        wav: bool,

        /// Use the MF plan (e.g. "KP1 5 5 5 ST")
        #[arg(long)]
        mf: bool,

        /// Write unsigned raw samples
        #[arg(short, long)]
        unsigned: bool,

        /// Tone length in milliseconds
        #[arg(long, default_value_t = DEFAULT_TONE_MS)]
        tone_ms: u32,

        /// Gap after each tone in milliseconds
        #[arg(long, default_value_t = DEFAULT_GAP_MS)]
        gap_ms: u32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decode {
            input,
            output,
            unsigned,
            flush_frames,
            range,
            threshold,
            no_flush,
        } => {
            let config = DetectorConfig::new()
                .with_encoding(encoding(unsigned))
                .with_flush_frames(flush_frames)
                .with_range_fraction(range)
                .with_silence_floor(threshold)
                .with_flush_each_token(!no_flush);
            decode_command(input.as_deref(), output.as_deref(), config)?
        }
        Commands::Generate {
            number,
            output,
            wav,
            mf,
            unsigned,
            tone_ms,
            gap_ms,
        } => {
            let generator =
                ToneGenerator::new(encoding(unsigned && !wav)).with_timing(tone_ms, gap_ms);
            generate_command(&generator, &number, &output, wav, mf)?
        }
    }

    Ok(())
}

fn encoding(unsigned: bool) -> SampleEncoding {
    if unsigned {
        SampleEncoding::Unsigned
    } else {
        SampleEncoding::Signed
    }
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}

fn decode_command(
    input_path: Option<&Path>,
    output_path: Option<&Path>,
    mut config: DetectorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    // Validate before touching any file
    let mut decoder = Decoder::new(config.clone())?;

    let source: Box<dyn Read> = match input_path {
        Some(path) if is_wav(path) => {
            let samples = read_wav_samples(path)?;
            if config.encoding != SampleEncoding::Signed {
                warn!("WAV input is always read as signed samples, ignoring --unsigned");
            }
            config.encoding = SampleEncoding::Signed;
            decoder = Decoder::new(config)?;
            Box::new(io::Cursor::new(samples))
        }
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };

    let sink: Box<dyn Write> = match output_path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    let summary = decoder.run(source, sink)?;
    info!("Done. {} frames, {} symbols", summary.frames, summary.tokens);
    Ok(())
}

/// Load an 8-bit mono 8 kHz WAV file as signed sample bytes.
fn read_wav_samples(path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    info!(
        "Read WAV: {} Hz, {} channels, {} bits",
        spec.sample_rate, spec.channels, spec.bits_per_sample
    );

    if spec.sample_rate as usize != SAMPLE_RATE
        || spec.channels != 1
        || spec.bits_per_sample != 8
        || spec.sample_format != SampleFormat::Int
    {
        return Err(CliError::UnsupportedWav(format!(
            "expected {} Hz mono 8-bit PCM, got {} Hz {} channels {} bits",
            SAMPLE_RATE, spec.sample_rate, spec.channels, spec.bits_per_sample
        ))
        .into());
    }

    let samples: Result<Vec<i8>, _> = reader.samples::<i8>().collect();
    Ok(samples?.into_iter().map(|s| s as u8).collect())
}

fn parse_mf_symbols(text: &str) -> Result<Vec<Symbol>, CliError> {
    text.split_whitespace()
        .map(|token| {
            let symbol = match token.to_ascii_uppercase().as_str() {
                "KP" | "KP1" => Symbol::Kp1,
                "KP2" => Symbol::Kp2,
                "ST" => Symbol::St,
                "C11" => Symbol::C11,
                "C12" => Symbol::C12,
                "2400" => Symbol::Tone2400,
                "2600" => Symbol::Tone2600,
                "2400+2600" => Symbol::Tone2400And2600,
                digit if digit.len() == 1 && digit.as_bytes()[0].is_ascii_digit() => {
                    Symbol::Digit(digit.as_bytes()[0] - b'0')
                }
                _ => return Err(CliError::UnknownMfSymbol(token.to_string())),
            };
            Ok(symbol)
        })
        .collect()
}

fn generate_command(
    generator: &ToneGenerator,
    number: &str,
    output_path: &Path,
    wav: bool,
    mf: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let samples = if mf {
        let symbols = parse_mf_symbols(number)?;
        generator.sequence(&symbols, TonePlan::Mf)?
    } else {
        generator.dial_strict(number)?
    };
    info!("Generated {} samples", samples.len());

    if wav {
        let spec = WavSpec {
            channels: 1,
            sample_rate: SAMPLE_RATE as u32,
            bits_per_sample: 8,
            sample_format: SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(output_path, spec)?;
        for sample in samples {
            writer.write_sample(sample as i8)?;
        }
        writer.finalize()?;
    } else {
        let mut file = BufWriter::new(File::create(output_path)?);
        file.write_all(&samples)?;
        file.flush()?;
    }

    info!("Wrote {}", output_path.display());
    Ok(())
}
