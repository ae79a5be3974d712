//! Shipped capabilities

mod browser_sync;
mod extract;
mod manifest;
mod notifications;
mod output;
mod purify;
mod scripts;
mod styles;

pub use browser_sync::BrowserSync;
pub use extract::Extract;
pub use manifest::Manifest;
pub use notifications::Notifications;
pub use output::{Minification, Versioning};
pub use purify::PurifyCss;
pub use scripts::{JavaScript, Preact, React, TypeScript};
pub use styles::{Preprocessor, StyleLang};

use crate::config::EntryOutput;
use crate::util::file::{relative_to, to_slash};
use std::path::{Path, PathBuf};

/// Bundle name for a declared pair: the output file relative to the public
/// path, without extension
///
/// A directory output takes the first entry's file name.
pub(crate) fn bundle_name(public_path: &Path, pair: &EntryOutput) -> String {
    let output = if pair.output.is_file() {
        pair.output.path.clone()
    } else {
        let stem = pair.entry.first().map(|e| e.stem()).unwrap_or_default();
        pair.output.path.join(stem)
    };

    let relative = relative_to(&output, public_path);
    to_slash(&strip_extension(&relative))
}

fn strip_extension(path: &Path) -> PathBuf {
    match path.file_stem() {
        Some(stem) => path.with_file_name(stem),
        None => path.to_path_buf(),
    }
}
