use crate::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, trace};
use walkdir::WalkDir;

/// A directory entry captured once during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub name: String,
    pub full_path: PathBuf,
    pub is_directory: bool,
}

/// List the entries under `root`, descending into subdirectories when
/// `recursive` is set. The root itself is not included.
///
/// Failing to read `root` aborts with [`Error::Scan`]. Unreadable
/// subdirectories are logged and skipped so one bad folder does not stop
/// the rest of the tree from being processed.
pub fn collect_entries(root: &Path, recursive: bool) -> Result<Vec<ScanEntry>, Error> {
    fs::read_dir(root).map_err(|source| Error::Scan {
        path: root.to_path_buf(),
        source,
    })?;

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut entries = Vec::new();

    for entry_result in WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(Error::Scan {
                    path: root.to_path_buf(),
                    source: walk_error_to_io(err),
                });
            }
            Err(err) => {
                let path = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                error!("Error reading entry {}: {}", path, err);
                continue;
            }
        };

        trace!("Found {}", entry.path().display());
        entries.push(ScanEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            full_path: entry.path().to_path_buf(),
            is_directory: entry.file_type().is_dir(),
        });
    }

    Ok(entries)
}

fn walk_error_to_io(err: walkdir::Error) -> io::Error {
    let message = err.to_string();
    err.into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message))
}
