use crate::lesson::{Lesson, count_included_topics};
use crate::persistence::{PersistenceError, PersistenceResult, write_schedule};
use crate::semester::{DateMap, SemesterInfo};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Bound::{Excluded, Included};
use tracing::{debug, info, warn};

pub const FINAL_EXAM_TOPIC: &str = "Final Exam";

/// A dated line of the schedule artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRow {
    pub date: NaiveDate,
    pub topic: String,
    pub assignments: Vec<String>,
    pub reminders: Vec<String>,
}

impl ClassRow {
    pub fn new(date: NaiveDate, topic: impl Into<String>) -> Self {
        Self {
            date,
            topic: topic.into(),
            assignments: Vec::new(),
            reminders: Vec::new(),
        }
    }

    /// The four fields of a data line, sub-lists joined with `,`.
    pub fn fields(&self) -> [String; 4] {
        [
            self.date.format("%Y-%m-%d").to_string(),
            self.topic.clone(),
            self.assignments.join(","),
            self.reminders.join(","),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleRecord {
    PartHeader { text: String },
    WeekHeader { week_number: u32 },
    ClassRow(ClassRow),
}

impl ScheduleRecord {
    pub fn is_header(&self) -> bool {
        !matches!(self, ScheduleRecord::ClassRow(_))
    }

    pub fn as_class_row(&self) -> Option<&ClassRow> {
        match self {
            ScheduleRecord::ClassRow(row) => Some(row),
            _ => None,
        }
    }
}

/// The record's line in the schedule artifact, without a terminator.
impl fmt::Display for ScheduleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleRecord::PartHeader { text } => f.write_str(text),
            ScheduleRecord::WeekHeader { week_number } => write!(f, "Week {week_number}"),
            ScheduleRecord::ClassRow(row) => f.write_str(&row.fields().join(";")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileSummary {
    pub class_dates: usize,
    pub weeks: u32,
    pub topics_consumed: usize,
    pub topics_available: usize,
    /// Included lessons (topics and parts) left after the last class date.
    pub lessons_unconsumed: usize,
}

impl CompileSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("class_dates={}", self.class_dates));
        parts.push(format!("weeks={}", self.weeks));
        parts.push(format!(
            "topics={}/{}",
            self.topics_consumed, self.topics_available
        ));
        if self.lessons_unconsumed > 0 {
            parts.push(format!("unconsumed={}", self.lessons_unconsumed));
        }
        parts.join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledSchedule {
    pub records: Vec<ScheduleRecord>,
    pub summary: CompileSummary,
}

impl CompiledSchedule {
    /// Appends one `Final Exam` row per entry, in date order. The exam time
    /// goes in the reminders field untouched.
    pub fn append_final_exams(&mut self, final_exams: &DateMap) {
        for (date, time) in final_exams {
            let mut row = ClassRow::new(*date, FINAL_EXAM_TOPIC);
            row.reminders.push(time.clone());
            self.records.push(ScheduleRecord::ClassRow(row));
        }
    }

    pub fn class_rows(&self) -> impl Iterator<Item = &ClassRow> {
        self.records.iter().filter_map(ScheduleRecord::as_class_row)
    }

    /// The schedule artifact as text, exactly as [`write_schedule`] puts it
    /// on disk.
    pub fn to_lines(&self) -> PersistenceResult<String> {
        let mut out = Vec::new();
        write_schedule(&self.records, &mut out)?;
        String::from_utf8(out).map_err(|err| PersistenceError::InvalidData(err.to_string()))
    }
}

/// Read position in the lesson stream.
struct LessonCursor<'a> {
    lessons: &'a [Lesson],
    position: usize,
}

impl<'a> LessonCursor<'a> {
    fn new(lessons: &'a [Lesson]) -> Self {
        Self {
            lessons,
            position: 0,
        }
    }

    fn peek(&self) -> Option<&'a Lesson> {
        self.lessons.get(self.position)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Consumes part markers and excluded lessons up to the next topic (or the
    /// end of the stream), returning the part titles passed on the way.
    fn skip_to_topic(&mut self) -> Vec<&'a str> {
        let mut parts = Vec::new();
        while let Some(lesson) = self.peek() {
            match lesson {
                Lesson::Part(title) => parts.push(title.as_str()),
                Lesson::Excluded(_) => {}
                Lesson::Topic(_) => break,
            }
            self.advance();
        }
        parts
    }

    fn remaining_included(&self) -> usize {
        self.lessons[self.position.min(self.lessons.len())..]
            .iter()
            .filter(|lesson| lesson.is_included())
            .count()
    }
}

/// Reminders dated after `from` up to and including `to`, each tagged with
/// its date.
fn reminders_between(from: NaiveDate, to: NaiveDate, reminders: &DateMap) -> Vec<String> {
    if to <= from {
        return Vec::new();
    }
    reminders
        .range((Excluded(from), Included(to)))
        .flat_map(|(date, text)| {
            text.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(move |item| format!("{item} ({date})"))
        })
        .collect()
}

/// Lays an ordered lesson stream onto the class calendar.
///
/// Part markers emit a header before the date they precede, a `Week N`
/// header opens whenever the weekday index drops (Friday to Monday, say),
/// a break replaces the date's topic without consuming the pending lesson,
/// and reminders dated after a class up to and including the next class are
/// listed on the earlier row. Lessons left over once the calendar runs out
/// are only counted.
pub fn compile_schedule(
    class_dates: &[NaiveDate],
    lessons: &[Lesson],
    breaks: &DateMap,
    reminders: &DateMap,
) -> CompiledSchedule {
    let mut records = Vec::with_capacity(class_dates.len() * 2);
    let mut cursor = LessonCursor::new(lessons);
    let mut week = 1u32;
    let mut previous: Option<NaiveDate> = None;
    let mut topics_consumed = 0usize;

    for (idx, &date) in class_dates.iter().enumerate() {
        for title in cursor.skip_to_topic() {
            records.push(ScheduleRecord::PartHeader {
                text: title.to_string(),
            });
        }

        let new_week = previous.is_none_or(|prev| {
            date.weekday().num_days_from_monday() < prev.weekday().num_days_from_monday()
        });
        if new_week {
            records.push(ScheduleRecord::WeekHeader { week_number: week });
            week += 1;
        }

        let mut row = ClassRow::new(date, "");
        if let Some(label) = breaks.get(&date) {
            row.topic = format!("{label} - No Class");
        } else if let Some(lesson) = cursor.peek().and_then(Lesson::as_topic) {
            row.topic = lesson.topic.clone();
            row.assignments = lesson.assignments.clone();
            topics_consumed += 1;
            cursor.advance();
        }

        if let Some(&next) = class_dates.get(idx + 1) {
            row.reminders = reminders_between(date, next, reminders);
        }

        records.push(ScheduleRecord::ClassRow(row));
        previous = Some(date);
    }

    let summary = CompileSummary {
        class_dates: class_dates.len(),
        weeks: week - 1,
        topics_consumed,
        topics_available: count_included_topics(lessons),
        lessons_unconsumed: cursor.remaining_included(),
    };
    debug!(records = records.len(), "compiled schedule records");
    info!(
        consumed = summary.topics_consumed,
        available = summary.topics_available,
        "topic lessons placed on the calendar"
    );
    if summary.lessons_unconsumed > 0 {
        warn!(
            unconsumed = summary.lessons_unconsumed,
            "lessons left over after the last class date"
        );
    }

    CompiledSchedule { records, summary }
}

/// Calendar, lessons, breaks, reminders and final exams for one term.
pub fn compile_semester(semester: &SemesterInfo, lessons: &[Lesson]) -> CompiledSchedule {
    let class_dates = semester.class_dates();
    let mut schedule = compile_schedule(
        &class_dates,
        lessons,
        &semester.breaks,
        &semester.reminders,
    );
    schedule.append_final_exams(&semester.final_exam);
    schedule
}
