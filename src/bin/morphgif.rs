use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sha2::Digest as _;

#[derive(Parser, Debug)]
#[command(name = "morphgif", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a transition GIF from two images.
    Generate(GenerateArgs),
    /// Print the default pipeline configuration as JSON.
    DefaultConfig,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// First image (shown at the start of the loop).
    #[arg(long)]
    start: PathBuf,

    /// Second image (shown at the end of the loop).
    #[arg(long)]
    end: PathBuf,

    /// Transition kind: `default` (slide) or `rotate`. Unknown values fall back to slide.
    #[arg(long, default_value = "default")]
    transition: String,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// Also write the unquantized frames as an MP4 (requires `ffmpeg` on PATH).
    #[arg(long)]
    mp4: Option<PathBuf>,

    /// Pipeline configuration JSON; missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let res = match cli.cmd {
        Command::Generate(args) => {
            setup_logging(&args.log_level);
            cmd_generate(args)
        }
        Command::DefaultConfig => cmd_default_config(),
    };

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let payload = match err.downcast_ref::<morphgif::GifError>() {
                Some(gif_err) => morphgif::ErrorPayload::from_error(gif_err),
                None => morphgif::ErrorPayload {
                    error: format!("{err:#}"),
                },
            };
            let json = serde_json::to_string(&payload)
                .unwrap_or_else(|_| format!("{{\"error\":{:?}}}", payload.error));
            eprintln!("{json}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn cmd_default_config() -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&morphgif::PipelineConfig::default())
        .context("serialize default config")?;
    println!("{json}");
    Ok(())
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let cfg = match &args.config {
        Some(path) => morphgif::PipelineConfig::from_json_file(path)?,
        None => morphgif::PipelineConfig::default(),
    };

    let start = read_bytes(&args.start)?;
    let end = read_bytes(&args.end)?;
    let req =
        morphgif::AnimationRequest::from_form(vec![start, end], Some(args.transition.as_str()))?;

    let mut pipeline = morphgif::Pipeline::new(&cfg);
    let out = match &args.mp4 {
        Some(mp4_path) => pipeline.run_with_frames(req, |frames| {
            morphgif::encode::ffmpeg::write_mp4(frames, mp4_path, cfg.background)?;
            eprintln!("wrote {}", mp4_path.display());
            Ok(())
        })?,
        None => pipeline.run(req)?,
    };

    morphgif::encode::ffmpeg::ensure_parent_dir(&args.out)?;
    std::fs::write(&args.out, &out.bytes)
        .with_context(|| format!("write gif '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} bytes, sha256 {})",
        args.out.display(),
        out.bytes.len(),
        sha256_hex(&out.bytes)
    );
    Ok(())
}

fn read_bytes(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{b:02x}"));
    }
    out
}
