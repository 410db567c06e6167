use super::{PersistenceError, PersistenceResult};
use crate::lesson::{Course, Lesson, LessonSource};
use crate::semester::SemesterInfo;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

fn open(path: &Path) -> PersistenceResult<File> {
    File::open(path).map_err(|source| PersistenceError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> PersistenceResult<T> {
    let reader = BufReader::new(open(path)?);
    serde_json::from_reader(reader).map_err(|err| {
        PersistenceError::InvalidData(format!("{}: {err}", path.display()))
    })
}

/// Loads and validates a semester description.
pub fn load_semester_info<P: AsRef<Path>>(path: P) -> PersistenceResult<SemesterInfo> {
    let path = path.as_ref();
    let semester: SemesterInfo = read_json(path)?;
    semester
        .validate()
        .map_err(|err| PersistenceError::InvalidData(format!("{}: {err}", path.display())))?;
    debug!(path = %path.display(), days = %semester.days, "loaded semester info");
    Ok(semester)
}

pub fn load_lessons<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Lesson>> {
    read_json(path.as_ref())
}

/// Loads a course, pulling in an external lesson file when `lessons` names
/// one. The returned course always holds its lessons inline.
pub fn load_course<P: AsRef<Path>>(path: P) -> PersistenceResult<Course> {
    let path = path.as_ref();
    let mut course: Course = read_json(path)?;
    if let LessonSource::File(lesson_path) = &course.lessons {
        let resolved = match path.parent() {
            Some(dir) if lesson_path.is_relative() => dir.join(lesson_path),
            _ => lesson_path.clone(),
        };
        debug!(path = %resolved.display(), "loading external lesson list");
        course.lessons = LessonSource::Inline(load_lessons(&resolved)?);
    }
    Ok(course)
}

/// Pretty-printed JSON followed by a newline.
pub fn write_json<T: Serialize, W: Write>(value: &T, mut writer: W) -> PersistenceResult<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn save_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    write_json(value, BufWriter::new(file))
}
