use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};

use crate::cli::{Cli, Command};
use crate::config::{self, SkelConfig};
use crate::layouts::{self, DEFAULT_LAYOUT, LayoutSource};
use crate::{materialize, util};

const DEFAULT_BASE: &str = "lib";

pub fn run(cli: Cli) -> Result<()> {
    let ctx = CliContext::from(&cli);
    let command = cli.command.unwrap_or(Command::Generate);

    if command == Command::Layouts {
        return handle_layouts();
    }

    let cwd = current_dir()?;
    let home = dirs::home_dir().and_then(|path| Utf8PathBuf::from_path_buf(path).ok());
    let settings = Settings::resolve(&ctx, &cwd, home.as_deref())?;

    match command {
        Command::Generate => handle_generate(&ctx, &settings),
        Command::Tree => handle_tree(&settings),
        Command::Export { path, force } => handle_export(&ctx, &settings, path, force),
        Command::Layouts => unreachable!("layouts handled earlier"),
    }
}

fn handle_generate(ctx: &CliContext, settings: &Settings) -> Result<()> {
    let tree = settings.layout.load()?;
    if tree.is_empty() {
        warn!("layout {} has no entries", settings.layout);
    }

    if ctx.dry_run {
        println!(
            "Entries that would be created under '{}' (dry-run):",
            settings.base
        );
        for entry in materialize::plan(&settings.base, &tree) {
            println!("  {:<4} {}", entry.kind.as_str(), entry.path);
        }
        return Ok(());
    }

    materialize::materialize(&settings.base, &tree)?;
    println!(
        "Directory structure created successfully under '{}'",
        settings.base
    );
    Ok(())
}

fn handle_tree(settings: &Settings) -> Result<()> {
    let tree = settings.layout.load()?;
    let (dirs, files) = tree.counts();
    println!("Layout {} (generated under '{}'):", settings.layout, settings.base);
    print!("{}", tree.render());
    println!("{} directories, {} files", dirs, files);
    Ok(())
}

fn handle_layouts() -> Result<()> {
    println!("Built-in layouts:");
    for name in layouts::names() {
        let marker = if name == DEFAULT_LAYOUT { " (default)" } else { "" };
        println!("  - {}{}", name, marker);
    }
    Ok(())
}

fn handle_export(ctx: &CliContext, settings: &Settings, path: PathBuf, force: bool) -> Result<()> {
    let path = utf8(path)?;
    if path.exists() && !force {
        bail!("{} already exists; rerun with --force to overwrite", path);
    }

    let raw = settings.layout.read_source()?;
    println!("Exporting layout {} to {}", settings.layout, path);
    if ctx.dry_run {
        println!("    (dry-run) skipped");
        return Ok(());
    }
    util::fs::write(&path, &raw)
}

#[derive(Clone, Debug)]
struct CliContext {
    base: Option<PathBuf>,
    layout: Option<String>,
    config: Option<PathBuf>,
    dry_run: bool,
}

impl From<&Cli> for CliContext {
    fn from(cli: &Cli) -> Self {
        Self {
            base: cli.base.clone(),
            layout: cli.layout.clone(),
            config: cli.config.clone(),
            dry_run: cli.dry_run,
        }
    }
}

/// Effective base path and layout: flag, then config file, then default.
#[derive(Debug)]
struct Settings {
    base: Utf8PathBuf,
    layout: LayoutSource,
}

impl Settings {
    fn resolve(ctx: &CliContext, cwd: &Utf8Path, home: Option<&Utf8Path>) -> Result<Self> {
        let explicit = ctx
            .config
            .clone()
            .map(|path| utf8(path).map(|path| cwd.join(path)))
            .transpose()?;
        let resolved = config::resolve_path(explicit.as_deref(), cwd, home)?;
        let config = match &resolved {
            Some(found) => {
                debug!("using config {} ({})", found.path, found.source.as_str());
                config::load_from_path(&found.path)?
            }
            None => SkelConfig::default(),
        };

        let base = match (&ctx.base, &config.base_dir) {
            (Some(flag), _) => utf8(flag.clone())?,
            (None, Some(configured)) => Utf8PathBuf::from(configured),
            (None, None) => Utf8PathBuf::from(DEFAULT_BASE),
        };

        let layout = match (&ctx.layout, config.layout.as_deref(), &resolved) {
            (Some(flag), _, _) => LayoutSource::resolve(flag, cwd),
            (None, Some(configured), Some(found)) => LayoutSource::resolve(configured, found.dir()),
            _ => LayoutSource::Builtin(DEFAULT_LAYOUT.to_owned()),
        };

        debug!("base {} layout {}", base, layout);
        Ok(Self { base, layout })
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().context("determining current directory")?;
    utf8(cwd)
}

fn utf8(path: PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path)
        .map_err(|path| anyhow!("path {} is not valid UTF-8", path.display()))
}
