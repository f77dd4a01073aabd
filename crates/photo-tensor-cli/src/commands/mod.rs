pub mod batch;
pub mod encode;
pub mod inspect;
pub mod preprocess;

use anyhow::{Context as _, Result};
use std::path::Path;

/// Read a payload file, trimming surrounding whitespace
pub fn read_payload(path: &Path) -> Result<String> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read payload: {}", path.display()))?;
    Ok(contents.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_payload_trims_newline() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "AAECAwQF").unwrap();
        assert_eq!(read_payload(file.path()).unwrap(), "AAECAwQF");
    }

    #[test]
    fn test_read_payload_missing_file() {
        let err = read_payload(Path::new("/nonexistent/payload.b64")).unwrap_err();
        assert!(err.to_string().contains("Failed to read payload"));
    }
}
