use std::fs;
use std::path::Path;

use schemars::schema_for;
use serde::Serialize;
use serde_json::Value;

use crate::error::ConfigError;
use crate::options::InvocationOptions;

/// Default file name for a project's invocation options.
pub const OPTIONS_FILE: &str = "compass-options.json";

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let data = fs::read_to_string(path)?;
    let value = serde_json::from_str(&data)?;
    Ok(value)
}

/// Load options from a JSON file. Missing fields take their defaults.
pub fn load_options(path: &Path) -> Result<InvocationOptions, ConfigError> {
    read_json(path)
}

/// Load `compass-options.json` from `project` if it exists, with `project`
/// as the project root unless the file names one.
pub fn load_project_options(project: &Path) -> Result<Option<InvocationOptions>, ConfigError> {
    let path = project.join(OPTIONS_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let raw: Value = read_json(&path)?;
    let names_project = raw.get("project").is_some();
    let mut opts: InvocationOptions = serde_json::from_value(raw)?;
    if !names_project {
        opts.project = project.to_path_buf();
    }
    Ok(Some(opts))
}

/// Save options as pretty JSON, creating the parent directory if needed.
pub fn save_options(path: &Path, opts: &InvocationOptions) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_json(path, opts)
}

/// JSON Schema describing an options file.
pub fn options_schema() -> Value {
    let root = schema_for!(InvocationOptions);
    serde_json::to_value(root).unwrap_or_else(|_| serde_json::json!({ "type": "object" }))
}
