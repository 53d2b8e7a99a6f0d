//! Keyword file persistence. See [`tally_core::dictionary`] for the format.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tally_core::KeywordDictionary;
use tracing::{info, warn};

/// Load the keyword dictionary. An unreadable file is fatal to the caller.
pub fn load_keywords(path: impl AsRef<Path>) -> Result<KeywordDictionary> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading keyword file {}", path.display()))?;
    let dictionary = KeywordDictionary::parse(&text);
    if dictionary.is_empty() {
        warn!(path = %path.display(), "keyword file has no usable token:category pairs");
    }
    info!(
        path = %path.display(),
        keywords = dictionary.len(),
        categories = dictionary.known_categories().len(),
        "keywords loaded"
    );
    Ok(dictionary)
}

/// Overwrite the keyword file with `dictionary`.
pub fn save_keywords(path: impl AsRef<Path>, dictionary: &KeywordDictionary) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, dictionary.to_config_string())
        .with_context(|| format!("writing keyword file {}", path.display()))?;
    info!(path = %path.display(), keywords = dictionary.len(), "keywords saved");
    Ok(())
}
