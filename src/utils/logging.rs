use crate::core::message::{ChatMessage, Origin};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Optional append-only transcript of an AI chat.
pub struct TranscriptLog {
    file_path: Option<PathBuf>,
    is_active: bool,
}

impl TranscriptLog {
    pub fn new(log_file: Option<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut log = TranscriptLog {
            file_path: None,
            is_active: false,
        };
        if let Some(path) = log_file {
            log.set_log_file(path)?;
        }
        Ok(log)
    }

    pub fn set_log_file(&mut self, path: PathBuf) -> Result<String, Box<dyn std::error::Error>> {
        // Fail now rather than on the first message
        OpenOptions::new().create(true).append(true).open(&path)?;

        let message = format!("Logging enabled to: {}", path.display());
        self.file_path = Some(path);
        self.is_active = true;
        Ok(message)
    }

    pub fn toggle_logging(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        let Some(path) = self.file_path.clone() else {
            return Err("No log file specified. Use /log <filename> to enable logging first.".into());
        };
        if self.is_active {
            self.write_lines(&format!("## Logging paused {}", timestamp()))?;
            self.is_active = false;
            Ok(format!("Logging paused (file: {})", path.display()))
        } else {
            self.is_active = true;
            self.write_lines(&format!("## Logging resumed {}", timestamp()))?;
            Ok(format!("Logging resumed to: {}", path.display()))
        }
    }

    /// Header written once a session is known.
    pub fn log_session_start(&self, session_id: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.log_raw(&format!("## Session {session_id} {}", timestamp()))
    }

    pub fn log_message(&self, message: &ChatMessage) -> Result<(), Box<dyn std::error::Error>> {
        let line = match message.origin {
            Origin::User => format!("You: {}", message.text),
            Origin::Assistant => message.text.clone(),
            Origin::Error => format!("## {}", message.text),
        };
        self.log_raw(&line)
    }

    fn log_raw(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        if !self.is_active {
            return Ok(());
        }
        self.write_lines(content)
    }

    fn write_lines(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        let Some(file_path) = self.file_path.as_ref() else {
            return Ok(());
        };
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Short state for the chat `/status` line.
    pub fn status_label(&self) -> String {
        let name = |path: &Path| {
            path.file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned()
        };
        match (&self.file_path, self.is_active) {
            (None, _) => "disabled".to_string(),
            (Some(path), true) => format!("active ({})", name(path.as_path())),
            (Some(path), false) => format!("paused ({})", name(path.as_path())),
        }
    }
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn writes_messages_with_origin_prefixes() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("chat.log");
        let log = TranscriptLog::new(Some(path.clone())).expect("log opens");

        log.log_message(&ChatMessage::user("hello")).expect("write");
        log.log_message(&ChatMessage::assistant("hi there\nhow are you?"))
            .expect("write");
        log.log_message(&ChatMessage::error("network down")).expect("write");

        let contents = fs::read_to_string(&path).expect("read log");
        assert_eq!(
            contents,
            "You: hello\n\nhi there\nhow are you?\n\n## network down\n\n"
        );
    }

    #[test]
    fn disabled_log_writes_nothing() {
        let log = TranscriptLog::new(None).expect("log");
        assert!(!log.is_active());
        assert_eq!(log.status_label(), "disabled");
        log.log_message(&ChatMessage::user("ignored")).expect("no-op");
    }

    #[test]
    fn toggle_pauses_and_resumes() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("chat.log");
        let mut log = TranscriptLog::new(Some(path.clone())).expect("log opens");

        log.toggle_logging().expect("pause");
        assert_eq!(log.status_label(), "paused (chat.log)");
        log.log_message(&ChatMessage::user("while paused")).expect("no-op");

        log.toggle_logging().expect("resume");
        assert!(log.is_active());

        let contents = fs::read_to_string(&path).expect("read log");
        assert!(contents.contains("## Logging paused"));
        assert!(contents.contains("## Logging resumed"));
        assert!(!contents.contains("while paused"));
    }

    #[test]
    fn toggle_without_file_is_an_error() {
        let mut log = TranscriptLog::new(None).expect("log");
        assert!(log.toggle_logging().is_err());
    }
}
