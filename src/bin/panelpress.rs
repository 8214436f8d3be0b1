use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use image::RgbaImage;

use panelpress::{
    FsAssetLoader, FsSink, GridSpec, NamedLayer, PublishOpts, VariantPanels, VariantSpec,
    WatermarkAssets, WatermarkPolicy, build_variant, compose_closeups, draw_comic, publish,
    save_all, slice_panels, standard_variants,
};

#[derive(Parser, Debug)]
#[command(name = "panelpress", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose panels onto a grid and write a single PNG.
    Compose(ComposeArgs),
    /// Export each panel as its own composite.
    Closeups(CloseupArgs),
    /// Slice a wide sheet into numbered panel PNGs.
    Slice(SliceArgs),
    /// Render the full published output set for one page.
    Publish(PublishArgs),
    /// Build per-variant sheets from named layer PNGs.
    Variants(VariantArgs),
}

#[derive(Parser, Debug)]
struct PanelInput {
    /// Individual panel PNGs, in order. Mutually exclusive with --sheet.
    #[arg(long = "panel", conflicts_with = "sheet")]
    panels: Vec<PathBuf>,

    /// Wide sheet to slice at fixed-width steps.
    #[arg(long)]
    sheet: Option<PathBuf>,

    /// Slice width when reading a sheet.
    #[arg(long, default_value_t = 1080)]
    panel_width: u32,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    #[command(flatten)]
    input: PanelInput,

    #[arg(long)]
    rows: u32,

    #[arg(long)]
    cols: u32,

    #[arg(long, default_value_t = 1080)]
    canvas_width: u32,

    #[arg(long, default_value_t = 1080)]
    canvas_height: u32,

    #[arg(long, default_value_t = 35)]
    padding: u32,

    /// Directory holding watermark.png and signature.png; enables stamping.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct CloseupArgs {
    #[command(flatten)]
    input: PanelInput,

    #[arg(long, default_value_t = 1080)]
    canvas_width: u32,

    #[arg(long, default_value_t = 1080)]
    canvas_height: u32,

    #[arg(long, default_value_t = 35)]
    padding: u32,

    /// Which panels get the watermark (requires --assets).
    #[arg(long, value_enum, default_value_t = PolicyChoice::None)]
    policy: PolicyChoice,

    #[arg(long)]
    assets: Option<PathBuf>,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Output name prefix (`<name>-1.png`, ...).
    #[arg(long, default_value = "Closeup")]
    name: String,
}

#[derive(Parser, Debug)]
struct SliceArgs {
    /// Wide sheet PNG.
    #[arg(long)]
    sheet: PathBuf,

    #[arg(long, default_value_t = 1080)]
    panel_width: u32,

    #[arg(long)]
    out_dir: PathBuf,

    #[arg(long, default_value = "Panel")]
    name: String,
}

#[derive(Parser, Debug)]
struct PublishArgs {
    /// Raw artwork sheet PNG.
    #[arg(long)]
    raw: PathBuf,

    /// Optional variant sheets; each defaults to the raw sheet when absent.
    #[arg(long)]
    sketch: Option<PathBuf>,

    #[arg(long)]
    lineart: Option<PathBuf>,

    #[arg(long)]
    no_text: Option<PathBuf>,

    #[arg(long)]
    no_text_no_bubble: Option<PathBuf>,

    #[arg(long, default_value_t = 1080)]
    panel_width: u32,

    #[arg(long, default_value_t = 35)]
    padding: u32,

    /// Directory holding the watermark marks and strip header/footer.
    #[arg(long)]
    assets: Option<PathBuf>,

    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct VariantArgs {
    /// Layer PNGs in stacking order, bottom first. The layer name is the
    /// file stem.
    #[arg(long = "layer", required = true)]
    layers: Vec<PathBuf>,

    /// JSON rule table (a list of variants); defaults to the standard set.
    #[arg(long)]
    rules: Option<PathBuf>,

    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyChoice {
    Normal,
    Last,
    None,
}

impl From<PolicyChoice> for WatermarkPolicy {
    fn from(choice: PolicyChoice) -> Self {
        match choice {
            PolicyChoice::Normal => WatermarkPolicy::Normal,
            PolicyChoice::Last => WatermarkPolicy::Last,
            PolicyChoice::None => WatermarkPolicy::None,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Closeups(args) => cmd_closeups(args),
        Command::Slice(args) => cmd_slice(args),
        Command::Publish(args) => cmd_publish(args),
        Command::Variants(args) => cmd_variants(args),
    }
}

fn read_raster(path: &PathBuf) -> anyhow::Result<RgbaImage> {
    let img = image::open(path).with_context(|| format!("open image '{}'", path.display()))?;
    Ok(img.to_rgba8())
}

fn read_panels(input: &PanelInput) -> anyhow::Result<Vec<RgbaImage>> {
    if let Some(sheet) = &input.sheet {
        let sheet = read_raster(sheet)?;
        return Ok(slice_panels(&sheet, input.panel_width)?);
    }
    if input.panels.is_empty() {
        anyhow::bail!("provide --sheet or at least one --panel");
    }
    input.panels.iter().map(read_raster).collect()
}

fn load_watermark(dir: &Option<PathBuf>) -> anyhow::Result<Option<WatermarkAssets>> {
    match dir {
        Some(dir) => Ok(Some(WatermarkAssets::load(&FsAssetLoader::new(dir))?)),
        None => Ok(None),
    }
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let panels = read_panels(&args.input)?;
    let spec = GridSpec::new(
        args.canvas_width,
        args.canvas_height,
        args.rows,
        args.cols,
        args.padding,
    )?;
    let watermark = load_watermark(&args.assets)?;

    let comic = draw_comic(&panels, &spec, watermark.as_ref())?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    comic
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_closeups(args: CloseupArgs) -> anyhow::Result<()> {
    let panels = read_panels(&args.input)?;
    let watermark = load_watermark(&args.assets)?;

    let closeups = compose_closeups(
        &panels,
        args.padding,
        args.canvas_width,
        args.canvas_height,
        args.policy.into(),
        watermark.as_ref(),
    )?;

    let mut sink = FsSink::new(&args.out_dir);
    let outputs: Vec<_> = closeups
        .into_iter()
        .enumerate()
        .map(|(i, image)| panelpress::RenderedOutput::indexed(&args.name, i as u32 + 1, image))
        .collect();
    save_all(&outputs, &mut sink)?;

    eprintln!("wrote {} closeups to {}", outputs.len(), args.out_dir.display());
    Ok(())
}

fn cmd_slice(args: SliceArgs) -> anyhow::Result<()> {
    let sheet = read_raster(&args.sheet)?;
    let panels = slice_panels(&sheet, args.panel_width)?;

    let mut sink = FsSink::new(&args.out_dir);
    let outputs: Vec<_> = panels
        .into_iter()
        .enumerate()
        .map(|(i, image)| panelpress::RenderedOutput::indexed(&args.name, i as u32 + 1, image))
        .collect();
    save_all(&outputs, &mut sink)?;

    eprintln!("wrote {} panels to {}", outputs.len(), args.out_dir.display());
    Ok(())
}

fn cmd_publish(args: PublishArgs) -> anyhow::Result<()> {
    let raw = read_raster(&args.raw)?;
    let raw_panels = slice_panels(&raw, args.panel_width)?;

    let variant_panels = |path: &Option<PathBuf>| -> anyhow::Result<Vec<RgbaImage>> {
        match path {
            Some(path) => Ok(slice_panels(&read_raster(path)?, args.panel_width)?),
            None => Ok(raw_panels.clone()),
        }
    };

    let sets = VariantPanels {
        sketch: variant_panels(&args.sketch)?,
        lineart: variant_panels(&args.lineart)?,
        no_text: variant_panels(&args.no_text)?,
        no_text_no_bubble: variant_panels(&args.no_text_no_bubble)?,
        raw: raw_panels,
    };

    let opts = PublishOpts {
        panel_size: args.panel_width,
        padding: args.padding,
        ..PublishOpts::default()
    };

    let loader = args.assets.as_ref().map(FsAssetLoader::new);
    let watermark = match &loader {
        Some(loader) => Some(WatermarkAssets::load(loader)?),
        None => None,
    };

    let outputs = publish(
        &sets,
        &opts,
        watermark.as_ref(),
        loader.as_ref().map(|l| l as &dyn panelpress::AssetLoader),
    )?;

    let mut sink = FsSink::new(&args.out_dir);
    save_all(&outputs, &mut sink)?;

    eprintln!("wrote {} outputs to {}", outputs.len(), args.out_dir.display());
    Ok(())
}

fn load_rules(path: &Option<PathBuf>) -> anyhow::Result<Vec<VariantSpec>> {
    match path {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("open rules '{}'", path.display()))?;
            let rules = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parse rules '{}'", path.display()))?;
            Ok(rules)
        }
        None => Ok(standard_variants()),
    }
}

fn cmd_variants(args: VariantArgs) -> anyhow::Result<()> {
    let rules = load_rules(&args.rules)?;

    let mut layers = Vec::with_capacity(args.layers.len());
    for path in &args.layers {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("layer path '{}' has no usable stem", path.display()))?;
        layers.push(NamedLayer::new(name, read_raster(path)?));
    }
    let (width, height) = layers[0].image.dimensions();

    let mut sink = FsSink::new(&args.out_dir);
    let outputs: Vec<_> = rules
        .iter()
        .map(|spec| {
            build_variant(&layers, spec, width, height)
                .map(|sheet| panelpress::RenderedOutput::single(spec.name.clone(), sheet))
        })
        .collect::<Result<_, _>>()?;
    save_all(&outputs, &mut sink)?;

    eprintln!("wrote {} variants to {}", outputs.len(), args.out_dir.display());
    Ok(())
}
