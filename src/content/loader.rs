//! Loader for RON and JSON data files at startup.

use bevy::prelude::*;
use ron::Options;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Error type for content loading failures.
#[derive(Debug)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

impl std::error::Error for ContentLoadError {}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

fn read_file(path: &Path) -> Result<String, ContentLoadError> {
    fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: path.display().to_string(),
        message: format!("IO error: {}", e),
    })
}

/// Parse RON text. `file` only labels errors.
pub fn parse_ron<T>(file: &str, contents: &str) -> Result<T, ContentLoadError>
where
    T: DeserializeOwned,
{
    ron_options().from_str(contents).map_err(|e| ContentLoadError {
        file: file.to_string(),
        message: format!("Parse error: {}", e),
    })
}

/// Parse JSON text. `file` only labels errors.
pub fn parse_json<T>(file: &str, contents: &str) -> Result<T, ContentLoadError>
where
    T: DeserializeOwned,
{
    serde_json::from_str(contents).map_err(|e| ContentLoadError {
        file: file.to_string(),
        message: format!("Parse error: {}", e),
    })
}

/// Load a single RON struct.
pub fn load_ron_file<T>(path: &Path) -> Result<T, ContentLoadError>
where
    T: DeserializeOwned,
{
    let contents = read_file(path)?;
    parse_ron(&path.display().to_string(), &contents)
}

/// Load a single JSON document.
pub fn load_json_file<T>(path: &Path) -> Result<T, ContentLoadError>
where
    T: DeserializeOwned,
{
    let contents = read_file(path)?;
    parse_json(&path.display().to_string(), &contents)
}

/// Unwrap a load result, falling back to `T::default()` with a warning.
pub fn or_default<T>(result: Result<T, ContentLoadError>) -> T
where
    T: Default,
{
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("[CONTENT] {}; using built-in defaults", e);
            T::default()
        }
    }
}
