//! Disk usage helpers for the data and backup directories

use std::fs;
use std::path::Path;

/// Total size in bytes of every file under `path`
///
/// A missing path counts as empty; unreadable entries are skipped.
pub fn directory_size(path: &Path) -> u64 {
    if path.is_file() {
        return fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    }

    let Ok(entries) = fs::read_dir(path) else {
        return 0;
    };

    entries
        .filter_map(Result::ok)
        .map(|entry| {
            let entry_path = entry.path();
            if entry_path.is_dir() {
                directory_size(&entry_path)
            } else {
                entry.metadata().map(|m| m.len()).unwrap_or(0)
            }
        })
        .sum()
}

/// Indented listing of `path`: `[DIR] name` for directories and
/// `[FILE] name (n bytes)` for files, two spaces per level
pub fn directory_tree(path: &Path) -> String {
    let mut out = String::new();
    if path.exists() {
        write_tree(path, 0, &mut out);
    }
    out
}

fn write_tree(path: &Path, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    if !path.is_dir() {
        let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        out.push_str(&format!("{}[FILE] {} ({} bytes)\n", indent, name, size));
        return;
    }

    out.push_str(&format!("{}[DIR] {}\n", indent, name));

    let mut children: Vec<_> = match fs::read_dir(path) {
        Ok(entries) => entries.filter_map(Result::ok).map(|e| e.path()).collect(),
        Err(_) => return,
    };
    children.sort();
    for child in children {
        write_tree(&child, depth + 1, out);
    }
}
