use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use glitchfx::GlitchOptions;

#[derive(Parser, Debug)]
#[command(name = "glitchfx", version, about = "Glitch effects for images and videos")]
struct Cli {
    /// Log every effect roll.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Glitch a still image (PNG/JPEG, format from the output extension).
    Image(RunArgs),
    /// Glitch a video (requires `ffmpeg` and `ffprobe` on PATH).
    Video(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Input file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output file.
    #[arg(long)]
    out: PathBuf,

    /// JSON options file; flags below override its fields.
    #[arg(long)]
    options: Option<PathBuf>,

    #[command(flatten)]
    knobs: Knobs,
}

#[derive(Args, Debug, Default)]
struct Knobs {
    /// Salt-and-pepper blend strength [0, 1].
    #[arg(long)]
    noise_intensity: Option<f64>,
    /// Fraction of pixels hit by noise [0, 1].
    #[arg(long)]
    noise_amount: Option<f64>,
    /// Per-channel displacement scale [0, 1].
    #[arg(long)]
    channels_movement: Option<f64>,
    /// Block size scale [0, 1].
    #[arg(long)]
    block_size: Option<f64>,
    /// Block swaps per application.
    #[arg(long)]
    block_count: Option<u32>,
    /// Shortest effect run in frames (video).
    #[arg(long)]
    min_effect_length: Option<u32>,
    /// Exclusive upper bound of an effect run in frames (video).
    #[arg(long)]
    max_effect_length: Option<u32>,
    /// Scanline strength [0, 1]; 0 disables (video).
    #[arg(long)]
    scanlines_intensity: Option<f64>,
    /// Scanline band height in rows (video).
    #[arg(long)]
    scanlines_size: Option<u32>,
    /// Rows between scanline bands (video).
    #[arg(long)]
    scanlines_spacing: Option<u32>,
    /// Random-byte scanlines instead of darkened ones (video).
    #[arg(long)]
    scanlines_noisy: bool,
    /// Seed for a reproducible result.
    #[arg(long)]
    seed: Option<u64>,
}

impl Knobs {
    fn apply(&self, opts: &mut GlitchOptions) {
        macro_rules! set {
            ($($field:ident),*) => {
                $(if let Some(v) = self.$field {
                    opts.$field = v;
                })*
            };
        }
        set!(
            noise_intensity,
            noise_amount,
            channels_movement,
            block_size,
            block_count,
            min_effect_length,
            max_effect_length,
            scanlines_intensity,
            scanlines_size,
            scanlines_spacing
        );
        if self.scanlines_noisy {
            opts.scanlines_noisy = true;
        }
        if self.seed.is_some() {
            opts.seed = self.seed;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    match cli.cmd {
        Command::Image(args) => cmd_image(args),
        Command::Video(args) => cmd_video(args),
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else if cli.quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_options(args: &RunArgs) -> anyhow::Result<GlitchOptions> {
    let mut opts = match &args.options {
        Some(path) => GlitchOptions::from_path(path)?,
        None => GlitchOptions::default(),
    };
    args.knobs.apply(&mut opts);
    opts.validate()?;
    Ok(opts)
}

fn cmd_image(args: RunArgs) -> anyhow::Result<()> {
    let opts = load_options(&args)?;
    glitchfx::process_image(&args.in_path, &args.out, &opts)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_video(args: RunArgs) -> anyhow::Result<()> {
    let opts = load_options(&args)?;
    let stats = glitchfx::process_video(&args.in_path, &args.out, &opts)?;
    eprintln!("wrote {} ({} frames)", args.out.display(), stats.frames);
    Ok(())
}
