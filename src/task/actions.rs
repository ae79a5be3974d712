// Task execution
use super::TaskData;
use super::queue::TaskContext;
use crate::config::constants::{MANIFEST_FILE, VERSION_HASH_LEN};
use crate::error::{MixError, Result};
use crate::manifest::AssetManifest;
use crate::util::file::{hash_file, relative_to, resolve, to_slash};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Execute one task against the read-only build state
pub fn execute(data: &TaskData, ctx: &TaskContext<'_>) -> Result<()> {
    let outcome = match data {
        TaskData::Version { files } => version(files, ctx),
        TaskData::Copy { from, to } => copy(from, to, ctx),
        TaskData::CopyDirectory { from, to } => copy_directory(from, to, ctx),
        TaskData::Combine {
            sources,
            output,
            babel,
        } => combine(sources, output, *babel, ctx),
        TaskData::Minify { files } => minify(files, ctx),
    };

    outcome.map_err(|e| match e {
        MixError::Task { .. } => e,
        other => MixError::task(data.kind(), other.to_string()),
    })
}

fn version(files: &[PathBuf], ctx: &TaskContext<'_>) -> Result<()> {
    let public_path = &ctx.config.public_path;
    let manifest_path = resolve(ctx.root, public_path).join(MANIFEST_FILE);
    let mut manifest = AssetManifest::load(manifest_path)?;

    for file in files {
        let hash = hash_file(&resolve(ctx.root, file))?;
        let key = format!("/{}", to_slash(&relative_to(file, public_path)));
        let versioned = format!("{}?id={}", key, &hash[..VERSION_HASH_LEN]);
        debug!("Versioned {} -> {}", key, versioned);
        manifest.insert(key, versioned);
    }

    manifest.save()?;
    info!("Versioned {} files", files.len());
    Ok(())
}

fn copy(from: &[PathBuf], to: &Path, ctx: &TaskContext<'_>) -> Result<()> {
    let destination = resolve(ctx.root, to);
    // A lone source copied to a path with an extension is a rename
    let to_file = from.len() == 1 && to.extension().is_some();

    for source in from {
        let target = if to_file {
            destination.clone()
        } else {
            let name = source
                .file_name()
                .ok_or_else(|| MixError::other(format!("{} has no file name", source.display())))?;
            destination.join(name)
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(resolve(ctx.root, source), &target)?;
        debug!("Copied {:?} -> {:?}", source, target);
    }
    Ok(())
}

fn copy_directory(from: &Path, to: &Path, ctx: &TaskContext<'_>) -> Result<()> {
    let source = resolve(ctx.root, from);
    let destination = resolve(ctx.root, to);
    let mut count = 0;

    for entry in WalkDir::new(&source) {
        let entry = entry.map_err(|e| MixError::other(e.to_string()))?;
        let target = destination.join(relative_to(entry.path(), &source));

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            count += 1;
        }
    }

    debug!("Copied {} files from {:?} to {:?}", count, from, to);
    Ok(())
}

fn combine(sources: &[PathBuf], output: &Path, babel: bool, ctx: &TaskContext<'_>) -> Result<()> {
    let mut parts = Vec::with_capacity(sources.len());
    for source in sources {
        parts.push(fs::read_to_string(resolve(ctx.root, source))?);
    }

    let target = resolve(ctx.root, output);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, parts.join("\n"))?;

    debug!(
        "Combined {} files into {:?} (babel: {})",
        sources.len(),
        output,
        babel
    );
    Ok(())
}

fn minify(files: &[PathBuf], ctx: &TaskContext<'_>) -> Result<()> {
    for file in files {
        let source = resolve(ctx.root, file);
        let content = fs::read_to_string(&source)?;
        let target = minified_path(&source);
        fs::write(&target, reduce_whitespace(&content))?;
        debug!("Minified {:?} -> {:?}", source, target);
    }
    Ok(())
}

/// `app.js` -> `app.min.js`
fn minified_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    match path.extension() {
        Some(ext) => path.with_file_name(format!("{}.min.{}", stem, ext.to_string_lossy())),
        None => path.with_file_name(format!("{stem}.min")),
    }
}

/// Trim every line and drop blank ones; line breaks are kept so statement
/// boundaries survive
fn reduce_whitespace(content: &str) -> String {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
