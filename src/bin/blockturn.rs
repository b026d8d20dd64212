use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use blockturn::{
    AnimationSettings, AssetSource, BlockKey, BuiltinAssetPack, CompositeAssetPack, EncoderKind,
    LogObserver, ProgressBarObserver, ProgressObserver, RawBlockDefinitions, RenderThreading,
    TurntableOpts, compile, open_resource_pack, render_turntable,
};

#[derive(Parser, Debug)]
#[command(
    name = "blockturn",
    version,
    about = "Render one block as a rotating turntable GIF"
)]
struct Cli {
    /// Block type id.
    blockid: u16,

    /// Block data value.
    #[arg(default_value_t = 0)]
    data: u8,

    /// Resource pack (directory or zip) layered over the built-in textures.
    #[arg(long)]
    texturepath: Option<PathBuf>,

    /// Block definitions JSON replacing the built-in set.
    #[arg(long)]
    blockdefs: Option<PathBuf>,

    /// Number of frames in one turn.
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Pixels per block unit.
    #[arg(long, default_value_t = 500.0)]
    scale: f64,

    /// Frame delay in hundredths of a second.
    #[arg(long, default_value_t = 5)]
    delay: u16,

    /// Play the animation once instead of looping.
    #[arg(long, default_value_t = false)]
    no_loop: bool,

    /// Output animation path.
    #[arg(long, default_value = "output.gif")]
    out: PathBuf,

    /// Animation encoder: `gif` (built in) or `convert` (ImageMagick on PATH).
    #[arg(long, default_value = "gif")]
    encoder: EncoderKind,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Render frames one at a time on the main thread.
    #[arg(long, default_value_t = false)]
    serial: bool,

    /// Log progress instead of drawing a progress bar.
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut assets: Arc<dyn AssetSource> = Arc::new(BuiltinAssetPack::new());
    if let Some(dir) = &cli.texturepath {
        let pack = open_resource_pack(dir)
            .with_context(|| format!("open texture path '{}'", dir.display()))?;
        assets = Arc::new(CompositeAssetPack::new(vec![assets]).with_overlay(pack));
    }

    let raw = match &cli.blockdefs {
        Some(path) => RawBlockDefinitions::from_path(path)?,
        None => RawBlockDefinitions::builtin()?,
    };
    let blocks = compile(assets.as_ref(), &raw)?;

    let opts = TurntableOpts {
        block: BlockKey::new(cli.blockid, cli.data),
        frames: cli.frames,
        scale: cli.scale,
        out_path: cli.out.clone(),
        animation: AnimationSettings {
            delay_cs: cli.delay,
            looping: !cli.no_loop,
            ..AnimationSettings::default()
        },
        workdir_parent: None,
    };
    let dispatcher = RenderThreading {
        parallel: !cli.serial,
        threads: cli.threads,
    }
    .dispatcher()?;
    let observer: Box<dyn ProgressObserver> = if cli.quiet {
        Box::new(LogObserver)
    } else {
        Box::new(ProgressBarObserver::default())
    };
    let encoder = cli.encoder.create();

    let summary = render_turntable(
        &opts,
        &blocks,
        dispatcher.as_ref(),
        observer.as_ref(),
        encoder.as_ref(),
    )?;

    eprintln!("wrote {}", summary.path.display());
    Ok(())
}
