//! services/web/src/prompt.rs
//!
//! Loads the system instruction for the lesson-material generator.

use std::path::Path;

use lessonflow_core::lesson::DEFAULT_SYSTEM_INSTRUCTION;
use tracing::{error, info, warn};

/// Reads the base prompt from `path`, trimmed.
///
/// A missing file or a read failure falls back to the built-in instruction. This never
/// fails: the generator must still start without a prompt file.
pub fn load_base_prompt(path: &Path) -> String {
    if !path.exists() {
        warn!(path = %path.display(), "Prompt file not found; using the default prompt");
        return DEFAULT_SYSTEM_INSTRUCTION.to_string();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => {
            info!(path = %path.display(), "Base prompt loaded");
            contents.trim().to_string()
        }
        Err(e) => {
            error!(
                path = %path.display(),
                error = %e,
                "Failed to read the prompt file; using the default prompt"
            );
            DEFAULT_SYSTEM_INSTRUCTION.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(kind: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lessonflow-{}-{}.txt", kind, uuid::Uuid::new_v4()))
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let path = temp_path("missing");
        assert_eq!(load_base_prompt(&path), DEFAULT_SYSTEM_INSTRUCTION);
    }

    #[test]
    fn file_contents_are_trimmed() {
        let path = temp_path("prompt");
        std::fs::write(&path, "\n  Be a strict methodologist.  \n\n").unwrap();

        assert_eq!(load_base_prompt(&path), "Be a strict methodologist.");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unreadable_path_falls_back_to_default() {
        // A directory exists but cannot be read as a file.
        let dir = std::env::temp_dir();
        assert_eq!(load_base_prompt(&dir), DEFAULT_SYSTEM_INSTRUCTION);
    }
}
