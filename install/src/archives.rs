use std::fs::File;
use std::io;
use std::path::Path;

use log::info;
use walkdir::WalkDir;

use crate::error::InstallError;

/// Walks `root` and extracts every `.zip`/`.rar` found into its own
/// containing directory, deleting the archive on success (spec.md §4.4
/// step 2). Archives created by a prior extraction pass (none should
/// remain, but a crashed worker may have left one half-extracted) are
/// simply re-extracted; extraction always overwrites.
pub fn extract_all_archives(root: &Path) -> Result<(), InstallError> {
    let mut archives = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let ext = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if matches!(ext.as_deref(), Some("zip") | Some("rar")) {
            archives.push(entry.path().to_path_buf());
        }
    }

    for archive in archives {
        let dest = archive
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| root.to_path_buf());
        let ext = archive
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        info!("extracting {} into {}", archive.display(), dest.display());
        match ext.as_str() {
            "zip" => extract_zip(&archive, &dest)?,
            "rar" => extract_rar(&archive, &dest)?,
            other => return Err(InstallError::UnsupportedArchive(other.to_string())),
        }
        std::fs::remove_file(&archive)?;
    }

    Ok(())
}

fn extract_zip(archive: &Path, dest: &Path) -> Result<(), InstallError> {
    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file)?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out_file = File::create(&out_path)?;
        io::copy(&mut entry, &mut out_file)?;
    }

    Ok(())
}

#[cfg(windows)]
fn extract_rar(archive: &Path, dest: &Path) -> Result<(), InstallError> {
    std::fs::create_dir_all(dest)?;
    let archive = unrar::Archive::new(archive).extract_to(dest)?;
    for entry in archive {
        entry?;
    }
    Ok(())
}

#[cfg(not(windows))]
fn extract_rar(archive: &Path, dest: &Path) -> Result<(), InstallError> {
    std::fs::create_dir_all(dest)?;
    sevenz_rust::decompress_file(archive, dest)
        .map_err(|e| InstallError::SevenZip(e.to_string()))
}
