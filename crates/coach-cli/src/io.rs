use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileIoError {
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("file {path} is not valid JSON: {source}")]
    ParseJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path}: {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub fn read_json<T>(path: &Path) -> Result<T, FileIoError>
where
    T: DeserializeOwned,
{
    let raw = fs::read_to_string(path).map_err(|source| FileIoError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str::<T>(&raw).map_err(|source| FileIoError::ParseJson {
        path: path.display().to_string(),
        source,
    })
}

/// Writes `contents` to `dir/file_name`, creating `dir` if needed.
pub fn write_text(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf, FileIoError> {
    fs::create_dir_all(dir).map_err(|source| FileIoError::CreateDir {
        path: dir.display().to_string(),
        source,
    })?;

    let path = dir.join(file_name);
    fs::write(&path, contents).map_err(|source| FileIoError::WriteFile {
        path: path.display().to_string(),
        source,
    })?;

    Ok(path)
}
