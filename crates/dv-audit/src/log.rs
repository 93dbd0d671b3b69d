// log.rs — Append-only JSONL audit log.
//
// One JSON object per line, append-only, flushed per event. Each line
// carries the SHA-256 of the previous line in `previous_hash`, so
// insertion, deletion, or edits anywhere in the file break verification.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::AuditError;
use crate::event::AuditEvent;
use crate::hasher;

/// An append-only audit log backed by a JSONL file.
pub struct AuditLog {
    writer: BufWriter<File>,
    path: PathBuf,
    /// Hash of the last line written — becomes `previous_hash` on the next event.
    last_hash: Option<String>,
}

impl AuditLog {
    /// Open (or create) an audit log at the given path.
    ///
    /// If the file already has events, the chain tail is recovered so new
    /// events link correctly across process restarts.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();

        let last_hash = if path.exists() {
            Self::read_last_hash(&path)?
        } else {
            None
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| AuditError::OpenFailed {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
            last_hash,
        })
    }

    /// Append an event, linking it to the previous one and flushing to disk.
    pub fn append(&mut self, event: &mut AuditEvent) -> Result<(), AuditError> {
        event.previous_hash = self.last_hash.clone();

        let json = serde_json::to_string(event)?;
        self.last_hash = Some(hasher::hash_str(&json));

        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;

        tracing::debug!(event_id = %event.event_id, kind = ?event.kind, "audit event appended");
        Ok(())
    }

    /// Read all events from a log file, oldest first. Blank lines are skipped.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<AuditEvent>, AuditError> {
        let file = File::open(path.as_ref()).map_err(|source| AuditError::OpenFailed {
            path: path.as_ref().to_path_buf(),
            source,
        })?;

        let mut events = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            events.push(serde_json::from_str(&line)?);
        }
        Ok(events)
    }

    /// Verify a log file's hash chain, returning the number of events checked.
    ///
    /// Hashes the raw lines rather than re-serialized events, so field
    /// ordering can never produce a false violation.
    pub fn verify_chain(path: impl AsRef<Path>) -> Result<usize, AuditError> {
        let file = File::open(path.as_ref()).map_err(|source| AuditError::OpenFailed {
            path: path.as_ref().to_path_buf(),
            source,
        })?;

        let mut previous_hash: Option<String> = None;
        let mut verified = 0;

        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let event: AuditEvent = serde_json::from_str(&line)?;
            if event.previous_hash != previous_hash {
                return Err(AuditError::IntegrityViolation {
                    line: line_num + 1,
                    expected: previous_hash.unwrap_or_else(|| "None".to_string()),
                    actual: event.previous_hash.unwrap_or_else(|| "None".to_string()),
                });
            }

            previous_hash = Some(hasher::hash_str(&line));
            verified += 1;
        }

        Ok(verified)
    }

    /// Path to the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Recover the hash of the last non-blank line of an existing log.
    fn read_last_hash(path: &Path) -> Result<Option<String>, AuditError> {
        let file = File::open(path).map_err(|source| AuditError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let mut last_line: Option<String> = None;
        for line in BufReader::new(file).lines() {
            let line = line?;
            if !line.trim().is_empty() {
                last_line = Some(line);
            }
        }
        Ok(last_line.map(|line| hasher::hash_str(&line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::VaultAction;
    use std::fs;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn sample_event(account: Uuid) -> AuditEvent {
        AuditEvent::new(account, VaultAction::Deposit).with_amount(100)
    }

    #[test]
    fn append_and_read_round_trip() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.jsonl");
        let account = Uuid::new_v4();

        {
            let mut log = AuditLog::open(&log_path).unwrap();
            let mut e1 = sample_event(account);
            let mut e2 = AuditEvent::new(account, VaultAction::DelegatedWithdrawal)
                .with_amount(5)
                .with_action(0);
            log.append(&mut e1).unwrap();
            log.append(&mut e2).unwrap();
        }

        let events = AuditLog::read_all(&log_path).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, VaultAction::Deposit);
        assert_eq!(events[1].kind, VaultAction::DelegatedWithdrawal);
        assert!(events[0].previous_hash.is_none());
        assert!(events[1].previous_hash.is_some());
    }

    #[test]
    fn chain_verifies_clean_log() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.jsonl");
        let account = Uuid::new_v4();

        {
            let mut log = AuditLog::open(&log_path).unwrap();
            for _ in 0..5 {
                log.append(&mut sample_event(account)).unwrap();
            }
        }

        assert_eq!(AuditLog::verify_chain(&log_path).unwrap(), 5);
    }

    #[test]
    fn reopen_continues_the_chain() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.jsonl");
        let account = Uuid::new_v4();

        {
            let mut log = AuditLog::open(&log_path).unwrap();
            log.append(&mut sample_event(account)).unwrap();
        }
        {
            let mut log = AuditLog::open(&log_path).unwrap();
            log.append(&mut sample_event(account)).unwrap();
        }

        assert_eq!(AuditLog::verify_chain(&log_path).unwrap(), 2);
    }

    #[test]
    fn tampering_breaks_verification() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.jsonl");
        let account = Uuid::new_v4();

        {
            let mut log = AuditLog::open(&log_path).unwrap();
            for _ in 0..3 {
                log.append(&mut sample_event(account)).unwrap();
            }
        }

        // Flip the amount on the middle line.
        let content = fs::read_to_string(&log_path).unwrap();
        let tampered: Vec<String> = content
            .lines()
            .enumerate()
            .map(|(i, l)| {
                if i == 1 {
                    l.replace("\"amount\":100", "\"amount\":999")
                } else {
                    l.to_string()
                }
            })
            .collect();
        fs::write(&log_path, tampered.join("\n") + "\n").unwrap();

        match AuditLog::verify_chain(&log_path) {
            Err(AuditError::IntegrityViolation { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected IntegrityViolation, got {:?}", other.map(|_| ())),
        }
    }
}
