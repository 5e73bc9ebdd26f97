//! Model library loading and validation.

use crate::error::ArchError;
use crate::model::ModelLibrary;
use std::collections::HashSet;
use std::path::Path;

/// Loads and validates a model library from a TOML file.
pub fn load_models(path: &Path) -> Result<ModelLibrary, ArchError> {
    let content = std::fs::read_to_string(path)?;
    load_models_from_str(&content)
}

/// Parses and validates a model library from a TOML string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_models_from_str(content: &str) -> Result<ModelLibrary, ArchError> {
    let library: ModelLibrary =
        toml::from_str(content).map_err(|e| ArchError::ParseError(e.to_string()))?;
    validate_library(&library)?;
    Ok(library)
}

/// Checks name uniqueness and port widths across the whole library.
fn validate_library(library: &ModelLibrary) -> Result<(), ArchError> {
    let mut model_names = HashSet::new();
    for model in library.iter() {
        if !model_names.insert(model.name.as_str()) {
            return Err(ArchError::DuplicateModel(model.name.clone()));
        }
        let mut port_names = HashSet::new();
        for port in &model.ports {
            if !port_names.insert(port.name.as_str()) {
                return Err(ArchError::DuplicatePort {
                    model: model.name.clone(),
                    port: port.name.clone(),
                });
            }
            if port.width == 0 {
                return Err(ArchError::ZeroWidth {
                    model: model.name.clone(),
                    port: port.name.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PortClass, PortDirection};

    const LIBRARY: &str = r#"
[[model]]
name = "lut4"
ports = [
  { name = "in",  direction = "input",  width = 4 },
  { name = "out", direction = "output", width = 1 },
]

[[model]]
name = "dff"
ports = [
  { name = "D",   direction = "input",  width = 1 },
  { name = "Q",   direction = "output", width = 1 },
  { name = "clk", direction = "input",  width = 1, clock = true },
]

[[model]]
name = ".input"
ports = [{ name = "inpad", direction = "output", width = 1 }]
"#;

    #[test]
    fn parse_library() {
        let lib = load_models_from_str(LIBRARY).unwrap();
        assert_eq!(lib.len(), 3);
        let lut = lib.get("lut4").unwrap();
        assert_eq!(lut.find_port("in").unwrap().width, 4);
        assert_eq!(lut.find_port("out").unwrap().direction, PortDirection::Output);
        let dff = lib.get("dff").unwrap();
        assert_eq!(dff.find_port("clk").unwrap().class(), PortClass::Clock);
        assert!(!dff.find_port("D").unwrap().clock);
    }

    #[test]
    fn empty_library() {
        let lib = load_models_from_str("").unwrap();
        assert!(lib.is_empty());
    }

    #[test]
    fn reject_duplicate_model() {
        let toml = r#"
[[model]]
name = "lut4"
[[model]]
name = "lut4"
"#;
        let err = load_models_from_str(toml).unwrap_err();
        assert!(matches!(err, ArchError::DuplicateModel(name) if name == "lut4"));
    }

    #[test]
    fn reject_duplicate_port() {
        let toml = r#"
[[model]]
name = "dff"
ports = [
  { name = "D", direction = "input", width = 1 },
  { name = "D", direction = "output", width = 1 },
]
"#;
        let err = load_models_from_str(toml).unwrap_err();
        assert!(matches!(err, ArchError::DuplicatePort { .. }));
    }

    #[test]
    fn reject_zero_width() {
        let toml = r#"
[[model]]
name = "lut0"
ports = [{ name = "in", direction = "input", width = 0 }]
"#;
        let err = load_models_from_str(toml).unwrap_err();
        assert!(matches!(err, ArchError::ZeroWidth { .. }));
    }

    #[test]
    fn reject_bad_direction() {
        let toml = r#"
[[model]]
name = "buf"
ports = [{ name = "io", direction = "inout", width = 1 }]
"#;
        let err = load_models_from_str(toml).unwrap_err();
        assert!(matches!(err, ArchError::ParseError(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.toml");
        std::fs::write(&path, LIBRARY).unwrap();
        let lib = load_models(&path).unwrap();
        assert!(lib.get(".input").is_some());
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_models(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ArchError::IoError(_)));
    }
}
