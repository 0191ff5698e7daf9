use crate::error::{ImportError, Result};
use crate::types::AllianceInput;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Read and parse the alliances file. Fails before anything touches the store
/// if the file is missing or is not a JSON array of alliances.
pub fn load_alliances(path: &Path) -> Result<Vec<AllianceInput>> {
    let content = fs::read_to_string(path).map_err(|source| ImportError::InputRead {
        path: path.to_path_buf(),
        source,
    })?;

    let alliances = parse_alliances(&content).map_err(|source| ImportError::InputParse {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        path = %path.display(),
        alliances = alliances.len(),
        "Loaded alliances file"
    );
    Ok(alliances)
}

pub fn parse_alliances(content: &str) -> std::result::Result<Vec<AllianceInput>, serde_json::Error> {
    let alliances: Vec<AllianceInput> = serde_json::from_str(content)?;
    for alliance in &alliances {
        debug!(alliance = %alliance.name, members = alliance.airlines.len(), "Parsed alliance");
    }
    Ok(alliances)
}
