use super::Tone;
use thiserror::Error;

/// Recoverable console failures; each one is rendered into the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabError {
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("{0} is read-only in this lab.")]
    ReadOnly(String),
    #[error("Unknown command: {0}. Type 'help' for the supported commands.")]
    UnknownCommand(String),
    #[error("No file is open in the editor.")]
    NoEditor,
}

impl LabError {
    pub fn tone(&self) -> Tone {
        match self {
            LabError::NotFound(_) => Tone::Danger,
            LabError::Usage(_)
            | LabError::ReadOnly(_)
            | LabError::UnknownCommand(_)
            | LabError::NoEditor => Tone::Warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_transcript_wording() {
        assert_eq!(
            LabError::NotFound("nope.txt".to_string()).to_string(),
            "File not found: nope.txt"
        );
        assert_eq!(
            LabError::Usage("cat <path>").to_string(),
            "Usage: cat <path>"
        );
        assert_eq!(
            LabError::ReadOnly("docs/log.md".to_string()).to_string(),
            "docs/log.md is read-only in this lab."
        );
    }

    #[test]
    fn missing_files_are_danger_everything_else_warns() {
        assert_eq!(LabError::NotFound("x".to_string()).tone(), Tone::Danger);
        assert_eq!(LabError::Usage("edit <path>").tone(), Tone::Warning);
        assert_eq!(LabError::UnknownCommand("rm".to_string()).tone(), Tone::Warning);
    }
}
