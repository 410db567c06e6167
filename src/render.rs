//! Template contexts for the pages built from a schedule artifact.
//!
//! Nothing here produces HTML. Each function returns a serializable value
//! that an external template stage consumes; text passes through verbatim.

use crate::lesson::{Course, Lesson, TopicLesson};
use crate::schedule::{ClassRow, ScheduleRecord};
use crate::semester::SemesterInfo;
use serde::Serialize;
use std::collections::HashMap;

/// Topic lessons by name. Excluded lessons are still listed so that an
/// older schedule artifact can refer to them.
pub fn lesson_index(lessons: &[Lesson]) -> HashMap<&str, &TopicLesson> {
    let mut index = HashMap::new();
    for lesson in lessons {
        let lesson = match lesson {
            Lesson::Excluded(inner) => &**inner,
            other => other,
        };
        if let Lesson::Topic(topic) = lesson {
            index.insert(topic.topic.as_str(), topic);
        }
    }
    index
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TableRow {
    Header {
        internal_header: String,
    },
    Class {
        date: String,
        slides: Vec<String>,
        reading: Vec<String>,
        exercises: Vec<String>,
        assignments: Vec<String>,
        reminders: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct SchedulePage {
    pub frontmatter: Vec<[String; 2]>,
    pub required_materials: Vec<String>,
    pub recommended_materials: Vec<String>,
    pub table: Vec<TableRow>,
}

/// Empty lists render as a single blank cell.
fn or_blank(items: Vec<String>) -> Vec<String> {
    if items.is_empty() {
        vec![String::new()]
    } else {
        items
    }
}

fn class_table_row(row: &ClassRow, index: &HashMap<&str, &TopicLesson>) -> TableRow {
    let date = row.date.format("%Y-%m-%d").to_string();
    let reminders = or_blank(row.reminders.clone());
    let lessons: Vec<&TopicLesson> = row
        .topic
        .split(',')
        .filter_map(|name| index.get(name.trim()).copied())
        .collect();

    if lessons.is_empty() {
        return TableRow::Class {
            date,
            slides: vec![row.topic.clone()],
            reading: vec![String::new()],
            exercises: vec![String::new()],
            assignments: vec![String::new()],
            reminders,
        };
    }

    TableRow::Class {
        date,
        slides: lessons.iter().map(|l| l.slides().to_string()).collect(),
        reading: or_blank(lessons.iter().flat_map(|l| l.readings()).collect()),
        exercises: or_blank(lessons.iter().flat_map(|l| l.exercises.clone()).collect()),
        assignments: or_blank(row.assignments.clone()),
        reminders,
    }
}

pub fn schedule_page(
    records: &[ScheduleRecord],
    course: &Course,
    semester: &SemesterInfo,
) -> SchedulePage {
    let index = lesson_index(course.inline_lessons());
    let mut frontmatter = Vec::new();
    if let Some(times) = &semester.meeting_times {
        frontmatter.push(["Meeting times".to_string(), times.clone()]);
    }
    if let Some(room) = &semester.room {
        frontmatter.push(["Room".to_string(), room.clone()]);
    }

    let table = records
        .iter()
        .map(|record| match record {
            ScheduleRecord::ClassRow(row) => class_table_row(row, &index),
            header => TableRow::Header {
                internal_header: header.to_string(),
            },
        })
        .collect();

    SchedulePage {
        frontmatter,
        required_materials: course.required_materials.clone(),
        recommended_materials: course.recommended_materials.clone(),
        table,
    }
}

/// One row of the syllabus's week-by-week table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeekSummary {
    /// `Week N: ` followed by the `MM-DD` of each class that week.
    pub week: String,
    pub content: Vec<String>,
    pub assignments: Vec<String>,
    pub exams: String,
}

impl WeekSummary {
    fn open(week_number: u32) -> Self {
        Self {
            week: format!("Week {week_number}: "),
            ..Default::default()
        }
    }

    fn add_class(&mut self, row: &ClassRow, index: &HashMap<&str, &TopicLesson>) {
        if !self.week.ends_with(": ") {
            self.week.push(',');
        }
        self.week.push_str(&row.date.format("%m-%d").to_string());

        match index.get(row.topic.as_str()) {
            Some(lesson) => {
                let title = lesson.slides().to_string();
                let lowered = title.to_lowercase();
                if lowered.contains("exam") && !lowered.contains("review") {
                    self.exams = title;
                } else if !self.content.contains(&title) {
                    self.content.push(title);
                }
            }
            None if !row.topic.is_empty() && !self.content.contains(&row.topic) => {
                self.content.push(row.topic.clone());
            }
            None => {}
        }

        if !row.assignments.is_empty() {
            self.assignments.push(row.assignments.join(","));
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyllabusPage<'a> {
    pub course: &'a Course,
    pub semester_info: &'a SemesterInfo,
    pub schedule: Vec<WeekSummary>,
}

/// Folds the schedule into one summary per `Week N` header. Part headers are
/// dropped and rows after the last header land in the last week.
pub fn weekly_summary(records: &[ScheduleRecord], lessons: &[Lesson]) -> Vec<WeekSummary> {
    let index = lesson_index(lessons);
    let mut weeks: Vec<WeekSummary> = Vec::new();
    for record in records {
        match record {
            ScheduleRecord::WeekHeader { week_number } => weeks.push(WeekSummary::open(*week_number)),
            ScheduleRecord::PartHeader { .. } => {}
            ScheduleRecord::ClassRow(row) => {
                if weeks.is_empty() {
                    weeks.push(WeekSummary::open(1));
                }
                if let Some(current) = weeks.last_mut() {
                    current.add_class(row, &index);
                }
            }
        }
    }
    weeks
}

pub fn syllabus<'a>(
    records: &[ScheduleRecord],
    course: &'a Course,
    semester: &'a SemesterInfo,
) -> SyllabusPage<'a> {
    SyllabusPage {
        course,
        semester_info: semester,
        schedule: weekly_summary(records, course.inline_lessons()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutlineRow {
    Header {
        internal_header: String,
    },
    Lesson {
        date: usize,
        slides: String,
        reading: Vec<String>,
        exercises: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct LessonOutline {
    pub required_materials: Vec<String>,
    pub recommended_materials: Vec<String>,
    pub table: Vec<OutlineRow>,
}

fn is_assessment(topic: &str) -> bool {
    let lowered = topic.to_lowercase();
    lowered.contains("review") || lowered.contains("exam")
}

/// Numbers every teaching lesson of the course, whether or not this term
/// includes it. Review and exam sessions get no number.
pub fn lesson_outline(course: &Course) -> LessonOutline {
    let mut table = Vec::new();
    let mut number = 1;
    for lesson in course.inline_lessons() {
        let lesson = match lesson {
            Lesson::Excluded(inner) => &**inner,
            other => other,
        };
        match lesson {
            Lesson::Part(title) => table.push(OutlineRow::Header {
                internal_header: title.clone(),
            }),
            Lesson::Topic(topic) if !is_assessment(&topic.topic) => {
                table.push(OutlineRow::Lesson {
                    date: number,
                    slides: topic.slides().to_string(),
                    reading: or_blank(topic.readings()),
                    exercises: or_blank(topic.exercises.clone()),
                });
                number += 1;
            }
            _ => {}
        }
    }

    LessonOutline {
        required_materials: course.required_materials.clone(),
        recommended_materials: course.recommended_materials.clone(),
        table,
    }
}
