pub mod calendar;
pub mod lesson;
pub mod persistence;
pub mod render;
pub mod schedule;
pub mod semester;

pub use calendar::{SemesterWindow, WeekdayMask, generate_class_dates};
pub use lesson::{Course, Lesson, LessonShapeError, LessonSource, TopicLesson};
pub use persistence::{
    PersistenceError, PersistenceResult, ScheduleFile, ScheduleStore, load_course, load_lessons,
    load_schedule, load_semester_info, read_schedule, save_json, save_schedule, write_json,
    write_schedule,
};
pub use render::{
    LessonOutline, OutlineRow, SchedulePage, SyllabusPage, TableRow, WeekSummary, lesson_outline,
    schedule_page, syllabus, weekly_summary,
};
pub use schedule::{
    ClassRow, CompileSummary, CompiledSchedule, FINAL_EXAM_TOPIC, ScheduleRecord,
    compile_schedule, compile_semester,
};
pub use semester::{DateMap, SemesterError, SemesterInfo};
