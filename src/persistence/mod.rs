use crate::schedule::ScheduleRecord;
use serde_json::Error as SerdeJsonError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("cannot open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub trait ScheduleStore {
    fn save_schedule(&self, records: &[ScheduleRecord]) -> PersistenceResult<()>;
    fn load_schedule(&self) -> PersistenceResult<Vec<ScheduleRecord>>;
}

pub mod file;
pub mod lines;

pub use file::{load_course, load_lessons, load_semester_info, save_json, write_json};
pub use lines::{ScheduleFile, load_schedule, read_schedule, save_schedule, write_schedule};
