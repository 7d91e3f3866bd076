pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Read typed input from `--input <file>` or, failing that, piped stdin.
/// Returns `None` when neither source supplied anything.
pub fn read_structured<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_json(path)?));
    }
    match stdin::read_stdin()? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}
