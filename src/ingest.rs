use crate::error::{DataLakeError, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Copy a file or directory into `dest_dir`, keeping its base name.
///
/// Directories are copied recursively and merged into an existing destination
/// directory. Returns the path of the copy.
pub fn ingest_data(src: &Path, dest_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dest_dir)?;

    if !src.exists() {
        return Err(DataLakeError::SourceNotFound(src.to_path_buf()));
    }
    let name = src
        .file_name()
        .ok_or_else(|| DataLakeError::NotFileOrDirectory(src.to_path_buf()))?;
    let target = dest_dir.join(name);

    if src.is_file() {
        fs::copy(src, &target)?;
        info!("Copied file: {} to {}", src.display(), target.display());
        println!("Copied file: {} to {}", src.display(), target.display());
    } else if src.is_dir() {
        copy_tree(src, &target)?;
        info!("Copied directory: {} to {}", src.display(), target.display());
        println!("Copied directory: {} to {}", src.display(), target.display());
    } else {
        return Err(DataLakeError::NotFileOrDirectory(src.to_path_buf()));
    }
    Ok(target)
}

fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let from = entry.path();
        let to = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&from, &to)?;
        } else {
            debug!("copy {} -> {}", from.display(), to.display());
            fs::copy(&from, &to)?;
        }
    }
    Ok(())
}

/// Hex-encoded SHA-256 of a file's bytes
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
