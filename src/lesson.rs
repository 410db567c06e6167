use serde::de::{self, SeqAccess, Visitor, value::SeqAccessDeserializer};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("lesson must have either a 'part' or a 'topic' key")]
pub struct LessonShapeError;

/// A class meeting's worth of material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicLesson {
    pub topic: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slides: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reading: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exercises: Vec<String>,
}

impl TopicLesson {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            assignments: Vec::new(),
            slides: None,
            reading: Vec::new(),
            videos: Vec::new(),
            exercises: Vec::new(),
        }
    }

    pub fn with_assignments<I, S>(mut self, assignments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assignments = assignments.into_iter().map(Into::into).collect();
        self
    }

    /// Display title for rendered pages; falls back to the topic name.
    pub fn slides(&self) -> &str {
        self.slides.as_deref().unwrap_or(&self.topic)
    }

    /// Reading list followed by one `Video: ...` entry per video.
    pub fn readings(&self) -> Vec<String> {
        self.reading
            .iter()
            .cloned()
            .chain(self.videos.iter().map(|video| format!("Video: {video}")))
            .collect()
    }
}

/// One entry of a course's ordered lesson stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LessonRecord", into = "LessonRecord")]
pub enum Lesson {
    /// Section header; occupies no class date.
    Part(String),
    /// Occupies exactly one class date.
    Topic(TopicLesson),
    /// Marked `include_semester: false`; skipped when building a term calendar.
    Excluded(Box<Lesson>),
}

impl Lesson {
    pub fn part(title: impl Into<String>) -> Self {
        Lesson::Part(title.into())
    }

    pub fn topic(topic: impl Into<String>) -> Self {
        Lesson::Topic(TopicLesson::new(topic))
    }

    pub fn excluded(self) -> Self {
        match self {
            Lesson::Excluded(_) => self,
            other => Lesson::Excluded(Box::new(other)),
        }
    }

    pub fn is_included(&self) -> bool {
        !matches!(self, Lesson::Excluded(_))
    }

    pub fn as_topic(&self) -> Option<&TopicLesson> {
        match self {
            Lesson::Topic(lesson) => Some(lesson),
            _ => None,
        }
    }
}

/// Wire shape of a lesson: key presence decides the variant.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LessonRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    part: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    assignments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    include_semester: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    slides: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reading: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    videos: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exercises: Option<Vec<String>>,
}

impl TryFrom<LessonRecord> for Lesson {
    type Error = LessonShapeError;

    fn try_from(record: LessonRecord) -> Result<Self, Self::Error> {
        let excluded = record.include_semester == Some(false);
        let lesson = match (record.part, record.topic) {
            (Some(part), _) => Lesson::Part(part),
            (None, Some(topic)) => Lesson::Topic(TopicLesson {
                topic,
                assignments: record.assignments.unwrap_or_default(),
                slides: record.slides,
                reading: record.reading.unwrap_or_default(),
                videos: record.videos.unwrap_or_default(),
                exercises: record.exercises.unwrap_or_default(),
            }),
            (None, None) => return Err(LessonShapeError),
        };
        Ok(if excluded { lesson.excluded() } else { lesson })
    }
}

impl From<Lesson> for LessonRecord {
    fn from(lesson: Lesson) -> Self {
        match lesson {
            Lesson::Part(part) => LessonRecord {
                part: Some(part),
                ..Default::default()
            },
            Lesson::Topic(topic) => LessonRecord {
                topic: Some(topic.topic),
                assignments: Some(topic.assignments).filter(|v| !v.is_empty()),
                slides: topic.slides,
                reading: Some(topic.reading).filter(|v| !v.is_empty()),
                videos: Some(topic.videos).filter(|v| !v.is_empty()),
                exercises: Some(topic.exercises).filter(|v| !v.is_empty()),
                ..Default::default()
            },
            Lesson::Excluded(inner) => LessonRecord {
                include_semester: Some(false),
                ..LessonRecord::from(*inner)
            },
        }
    }
}

/// Where a course keeps its lesson list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LessonSource {
    Inline(Vec<Lesson>),
    /// Path to a JSON file holding the list, relative to the course file.
    File(PathBuf),
}

/// Dispatches on the JSON shape so that a bad lesson inside an inline list
/// reports its own error.
impl<'de> Deserialize<'de> for LessonSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SourceVisitor;

        impl<'de> Visitor<'de> for SourceVisitor {
            type Value = LessonSource;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of lessons or a path to a lesson file")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
                Vec::deserialize(SeqAccessDeserializer::new(seq)).map(LessonSource::Inline)
            }

            fn visit_str<E: de::Error>(self, path: &str) -> Result<Self::Value, E> {
                Ok(LessonSource::File(PathBuf::from(path)))
            }
        }

        deserializer.deserialize_any(SourceVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub lessons: LessonSource,
    #[serde(default)]
    pub required_materials: Vec<String>,
    #[serde(default)]
    pub recommended_materials: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Course {
    pub fn with_lessons(lessons: Vec<Lesson>) -> Self {
        Self {
            lessons: LessonSource::Inline(lessons),
            required_materials: Vec::new(),
            recommended_materials: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Inline lessons, or an empty slice while the source is still a file path.
    pub fn inline_lessons(&self) -> &[Lesson] {
        match &self.lessons {
            LessonSource::Inline(lessons) => lessons,
            LessonSource::File(_) => &[],
        }
    }
}

/// Number of topic lessons a term calendar can draw from.
pub fn count_included_topics(lessons: &[Lesson]) -> usize {
    lessons
        .iter()
        .filter(|lesson| lesson.as_topic().is_some())
        .count()
}
