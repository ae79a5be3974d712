//! Stable ordering for captured file listings

use std::cmp::Ordering;
use std::path::Path;

/// Compare two paths by their forward-slash text, byte by byte
///
/// Matches the order glob matchers and sorted directory listings report, so
/// `views/home.php` precedes `views/partials/nav.php` and `file10.js`
/// precedes `file2.js`.
pub fn compare_paths<P: AsRef<Path>>(a: P, b: P) -> Ordering {
    let a = a.as_ref().to_string_lossy().replace('\\', "/");
    let b = b.as_ref().to_string_lossy().replace('\\', "/");
    a.cmp(&b)
}

/// Sort a file listing in place using [`compare_paths`]
pub fn sort_paths<P: AsRef<Path>>(paths: &mut [P]) {
    paths.sort_by(|a, b| compare_paths(a, b));
}
