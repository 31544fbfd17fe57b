//! Loading a dataset snapshot from disk.
//!
//! A snapshot is either one JSON document holding every collection, or a
//! directory with one JSON array per backend endpoint (`daire.json`,
//! `users.json`, `usta.json`, `kontrat.json`, `ariza.json`).

use std::fs;
use std::path::Path;

use color_eyre::eyre::{WrapErr, eyre};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::data::Dataset;

const APARTMENTS_FILE: &str = "daire.json";
const USERS_FILE: &str = "users.json";
const CRAFTSMEN_FILE: &str = "usta.json";
const CONTRACTS_FILE: &str = "kontrat.json";
const ISSUES_FILE: &str = "ariza.json";

pub fn load(path: &Path) -> color_eyre::Result<Dataset> {
    if !path.exists() {
        return Err(eyre!("Dataset not found: {}", path.display()));
    }

    let dataset = if path.is_dir() {
        load_dir(path)?
    } else {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read dataset {}", path.display()))?;
        serde_json::from_str(&content)
            .wrap_err_with(|| format!("Invalid dataset {}", path.display()))?
    };

    info!(
        path = %path.display(),
        apartments = dataset.apartments.len(),
        users = dataset.users.len(),
        craftsmen = dataset.craftsmen.len(),
        contracts = dataset.contracts.len(),
        issues = dataset.issues.len(),
        "Loaded dataset"
    );
    Ok(dataset)
}

fn load_dir(dir: &Path) -> color_eyre::Result<Dataset> {
    Ok(Dataset {
        apartments: load_collection(dir, APARTMENTS_FILE)?,
        users: load_collection(dir, USERS_FILE)?,
        craftsmen: load_collection(dir, CRAFTSMEN_FILE)?,
        contracts: load_collection(dir, CONTRACTS_FILE)?,
        issues: load_collection(dir, ISSUES_FILE)?,
    })
}

fn load_collection<T: DeserializeOwned>(dir: &Path, file: &str) -> color_eyre::Result<Vec<T>> {
    let path = dir.join(file);
    if !path.exists() {
        warn!(path = %path.display(), "Collection file missing, treating as empty");
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(&path)
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).wrap_err_with(|| format!("Invalid {}", path.display()))
}
