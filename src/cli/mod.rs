//! Command-line driver: read a directory, revision it, write the result.

mod args;

pub use args::Cli;

use anyhow::{Context, Result, bail};
use jwalk::WalkDir;
use std::fs;
use std::path::{Path, PathBuf};

use revmark::config::{CONFIG_FILE, IgnoreEntry, RevConfig, find_config_file};
use revmark::{Revisioner, debug, log};

/// Files never registered as assets.
const IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db"];

pub fn run(cli: &Cli) -> Result<()> {
    revmark::logger::set_verbose(cli.verbose);

    if !cli.input.is_dir() {
        bail!("input directory `{}` does not exist", cli.input.display());
    }

    let config = load_config(cli)?;
    let manifest = config.manifest.clone();
    let options = apply_overrides(config, cli).into_options()?;
    let mut rev = Revisioner::new(options)?;

    let files = collect_files(&cli.input);
    log!("rev"; "revisioning {} files from {}", files.len(), cli.input.display());
    for path in &files {
        let contents =
            fs::read(path).with_context(|| format!("failed to read `{}`", path.display()))?;
        rev.register(&asset_path(&cli.input, path), contents)?;
    }

    let report = rev.run();
    if !report.converged {
        log!(
            "warning";
            "reference cycles: hashes of assets that reference each other were not fully propagated"
        );
    }

    let manifest_path = cli.output.join(&manifest.path);
    if cli.dry_run {
        for (original, revisioned) in rev.manifest().iter() {
            log!("rev"; "{} → {}", original, revisioned);
        }
    } else {
        write_outputs(&rev, &cli.output)?;
        if cli.manifest || manifest.enable {
            write_manifest(&rev, &manifest_path)?;
        }
    }

    report.summary().print();
    Ok(())
}

/// Explicit `-C` file, else `revmark.toml` found upward from cwd, else defaults.
fn load_config(cli: &Cli) -> Result<RevConfig> {
    if let Some(path) = &cli.config {
        if !path.is_file() {
            bail!("config file `{}` not found", path.display());
        }
        debug!("config"; "using {}", path.display());
        return Ok(RevConfig::from_path(path)?);
    }

    let cwd = std::env::current_dir().context("Failed to get current working directory")?;
    match find_config_file(&cwd, Path::new(CONFIG_FILE)) {
        Some(path) => {
            debug!("config"; "using {}", path.display());
            Ok(RevConfig::from_path(&path)?)
        }
        None => Ok(RevConfig::default()),
    }
}

/// Command-line options take precedence; ignore rules are appended to the
/// configured list, or to the default one when the config sets none.
fn apply_overrides(mut config: RevConfig, cli: &Cli) -> RevConfig {
    if let Some(hash_length) = cli.hash_length {
        config.hash_length = hash_length;
    }
    if let Some(prefix) = &cli.prefix {
        config.prefix = Some(prefix.clone());
    }
    if cli.has_ignore_rules() {
        config.extend_ignore(cli.ignore.iter().cloned().map(IgnoreEntry::Suffix));
        config.extend_ignore(
            cli.ignore_regex
                .iter()
                .map(|regex| IgnoreEntry::Pattern { regex: regex.clone() }),
        );
    }
    config
}

/// Collect all files below `dir`, sorted so registration order is stable.
fn collect_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(|e| e.path())
        .collect();
    files.sort();
    files
}

/// Root-relative asset path of a file below `root` (`/css/style.css`).
fn asset_path(root: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(root).unwrap_or(file);
    let segments: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    format!("/{}", segments.join("/"))
}

fn write_outputs(rev: &Revisioner, output: &Path) -> Result<()> {
    for (path, contents) in rev.outputs() {
        let dest = output.join(path.trim_start_matches('/'));
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create `{}`", parent.display()))?;
        }
        fs::write(&dest, contents)
            .with_context(|| format!("failed to write `{}`", dest.display()))?;
        debug!("write"; "{}", path);
    }
    Ok(())
}

fn write_manifest(rev: &Revisioner, path: &Path) -> Result<()> {
    let json = rev.manifest().to_json()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json).with_context(|| format!("failed to write `{}`", path.display()))?;
    log!("write"; "manifest {}", path.display());
    Ok(())
}
