use std::fs;
use std::path::PathBuf;

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::config::config_directory;
use crate::domain::ticket::Ticket;
use crate::error::{AppError, AppResult};

const BATCH_FILE_NAME: &str = "last_batch.json";

/// The last analyzed batch, kept so a later `publish` can pick it up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBatch {
    pub id: String,
    pub tickets: Vec<Ticket>,
}

impl StoredBatch {
    pub fn new(tickets: Vec<Ticket>) -> Self {
        Self {
            id: Self::compute_id(&tickets),
            tickets,
        }
    }

    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(12) {
            Some((end, _)) => &self.id[..end],
            None => &self.id,
        }
    }

    pub fn compute_id(tickets: &[Ticket]) -> String {
        let mut hasher = Hasher::new();
        for ticket in tickets {
            hasher.update(ticket.kind.as_str().as_bytes());
            hasher.update(&[0]);
            hasher.update(ticket.title.as_bytes());
            hasher.update(&[0]);
            hasher.update(ticket.description.as_bytes());
            hasher.update(&[0]);
        }
        hasher.finalize().to_hex().to_string()
    }
}

pub struct TicketBatchStore {
    file_path: PathBuf,
}

impl TicketBatchStore {
    pub fn open() -> AppResult<Self> {
        Ok(Self::at(config_directory()?.join(BATCH_FILE_NAME)))
    }

    pub fn at(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn load(&self) -> AppResult<Option<StoredBatch>> {
        match fs::read_to_string(&self.file_path) {
            Ok(contents) => {
                let batch = serde_json::from_str::<StoredBatch>(&contents)
                    .map_err(|err| AppError::Configuration(format!("invalid batch file: {err}")))?;
                if batch.id != StoredBatch::compute_id(&batch.tickets) {
                    return Err(AppError::Configuration(
                        "batch file was modified after analysis; run `storyscribe analyze` again"
                            .to_string(),
                    ));
                }
                Ok(Some(batch))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    /// Replaces whatever batch was stored before.
    pub fn save(&self, batch: &StoredBatch) -> AppResult<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.file_path, serde_json::to_string_pretty(batch)?)?;
        Ok(())
    }
}
