use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cardsmith", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every card against a template, one PNG per card.
    Render(RenderArgs),
    /// Re-emit a (lenient) JSON document as normalized JSON on stdout.
    Fmt(FmtArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Template XML.
    #[arg(long)]
    template: PathBuf,

    /// Cards JSON: one card object or an array of them.
    #[arg(long)]
    cards: PathBuf,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// JSON object merged into every card before rendering.
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// Directory relative art paths resolve against (defaults to the cards file's directory).
    #[arg(long)]
    assets_root: Option<PathBuf>,

    /// Uniform scale applied to the template.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Background color as straight RGBA hex (`#rrggbbaa` or `0xrrggbbaa`).
    #[arg(long)]
    background: Option<String>,

    /// Render cards in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,

    /// Fail on the first layer error.
    #[arg(long)]
    strict: bool,
}

#[derive(Parser, Debug)]
struct FmtArgs {
    /// Input document.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Emit compact JSON instead of indented.
    #[arg(long)]
    compact: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Fmt(args) => cmd_fmt(args),
    }
}

fn read_object(path: &Path) -> anyhow::Result<cardsmith::Object> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read document '{}'", path.display()))?;
    let element = cardsmith::Element::from_json_str(&text)
        .with_context(|| format!("parse document '{}'", path.display()))?;
    cardsmith::Object::try_from(element)
        .with_context(|| format!("'{}' must hold an object", path.display()))
}

fn parse_background(raw: &str) -> anyhow::Result<[u8; 4]> {
    let value = cardsmith::decode_int(raw)
        .and_then(|v| u32::try_from(v).ok())
        .with_context(|| format!("invalid background color '{raw}'"))?;
    Ok(value.to_be_bytes())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let template = cardsmith::Template::from_path(&args.template)?;
    let mut cards = cardsmith::RenderableCard::load_all(&args.cards)?;

    if let Some(path) = &args.overrides {
        let overrides = read_object(path)?;
        for card in &mut cards {
            card.data_mut().copy_all(&overrides);
        }
    }

    let assets_root = match &args.assets_root {
        Some(root) => root.clone(),
        None => args
            .cards
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };
    let fetcher = cardsmith::ResourceFetcher::new(assets_root)?;
    let registry = cardsmith::LayerRegistry::with_defaults(Arc::new(fetcher));

    let settings = cardsmith::RenderSettings {
        scale: args.scale,
        clear_rgba: args.background.as_deref().map(parse_background).transpose()?,
        parallel: args.parallel,
        threads: args.threads,
        strict: args.strict,
    };
    let renderer = cardsmith::CardRenderer::new(template, registry, settings)?;
    let rendered = renderer.render_all(&cards)?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let mut failed_layers = 0usize;
    for (idx, (card, out)) in cards.iter().zip(&rendered).enumerate() {
        let path = args.out.join(format!("{idx}-{}.png", card.slug()));
        out.surface.save_png(&path)?;
        failed_layers += out.failures.len();
        eprintln!("wrote {}", path.display());
    }

    if failed_layers > 0 {
        tracing::warn!(failed_layers, "some layers failed to render");
    }
    Ok(())
}

fn cmd_fmt(args: FmtArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read document '{}'", args.in_path.display()))?;
    let element = cardsmith::Element::from_json_str(&text)
        .with_context(|| format!("parse document '{}'", args.in_path.display()))?;
    println!("{}", element.to_json_string(!args.compact)?);
    Ok(())
}
