use chrono::NaiveDate;
use course_calendar::{
    ClassRow, DateMap, Lesson, ScheduleRecord, SemesterInfo, TopicLesson, WeekdayMask,
    compile_schedule, compile_semester,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dates(mnemonic: &str, first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    course_calendar::generate_class_dates(first, last, &WeekdayMask::from_mnemonic(mnemonic))
}

fn rows(records: &[ScheduleRecord]) -> Vec<&ClassRow> {
    records.iter().filter_map(ScheduleRecord::as_class_row).collect()
}

fn week(n: u32) -> ScheduleRecord {
    ScheduleRecord::WeekHeader { week_number: n }
}

fn part(text: &str) -> ScheduleRecord {
    ScheduleRecord::PartHeader { text: text.into() }
}

fn topics(names: &[&str]) -> Vec<Lesson> {
    names.iter().map(|name| Lesson::topic(*name)).collect()
}

#[test]
fn break_keeps_pending_lesson_for_next_date() {
    let class_dates = [d(2016, 9, 5), d(2016, 9, 7)];
    let mut breaks = DateMap::new();
    breaks.insert(d(2016, 9, 5), "Labor Day".into());

    let compiled = compile_schedule(&class_dates, &topics(&["Intro", "Review"]), &breaks, &DateMap::new());
    let rows = rows(&compiled.records);

    assert_eq!(rows[0].topic, "Labor Day - No Class");
    assert!(rows[0].assignments.is_empty());
    assert_eq!(rows[1].topic, "Intro");
    assert_eq!(compiled.summary.topics_consumed, 1);
    assert_eq!(compiled.summary.topics_available, 2);
    assert_eq!(compiled.summary.lessons_unconsumed, 1);
}

#[test]
fn break_wins_over_pending_assignments() {
    let class_dates = [d(2016, 11, 24), d(2016, 11, 29)];
    let mut breaks = DateMap::new();
    breaks.insert(d(2016, 11, 24), "Thanksgiving".into());
    let lessons = vec![Lesson::Topic(
        TopicLesson::new("Graphs").with_assignments(["HW7"]),
    )];

    let compiled = compile_schedule(&class_dates, &lessons, &breaks, &DateMap::new());
    let rows = rows(&compiled.records);
    assert_eq!(rows[0].topic, "Thanksgiving - No Class");
    assert!(rows[0].assignments.is_empty());
    assert_eq!(rows[1].topic, "Graphs");
    assert_eq!(rows[1].assignments, vec!["HW7"]);
}

#[test]
fn reminder_between_classes_lands_on_earlier_row() {
    let class_dates = [d(2016, 8, 23), d(2016, 8, 25)];
    let mut reminders = DateMap::new();
    reminders.insert(d(2016, 8, 24), "HW1 due".into());

    let compiled = compile_schedule(&class_dates, &[], &DateMap::new(), &reminders);
    let rows = rows(&compiled.records);
    assert_eq!(rows[0].reminders, vec!["HW1 due (2016-08-24)"]);
    assert!(rows[1].reminders.is_empty());
}

#[test]
fn reminder_on_class_date_attaches_to_previous_row() {
    let class_dates = [d(2016, 8, 23), d(2016, 8, 25), d(2016, 8, 30)];
    let mut reminders = DateMap::new();
    reminders.insert(d(2016, 8, 25), "Quiz 1".into());
    reminders.insert(d(2016, 8, 27), "Project proposal,Lab 1".into());

    let compiled = compile_schedule(&class_dates, &[], &DateMap::new(), &reminders);
    let rows = rows(&compiled.records);
    assert_eq!(rows[0].reminders, vec!["Quiz 1 (2016-08-25)"]);
    assert_eq!(
        rows[1].reminders,
        vec!["Project proposal (2016-08-27)", "Lab 1 (2016-08-27)"]
    );
    assert!(rows[2].reminders.is_empty());
}

#[test]
fn reminders_outside_class_span_are_dropped() {
    let class_dates = [d(2016, 8, 23), d(2016, 8, 25)];
    let mut reminders = DateMap::new();
    reminders.insert(d(2016, 8, 22), "Before".into());
    reminders.insert(d(2016, 8, 26), "After".into());

    let compiled = compile_schedule(&class_dates, &[], &DateMap::new(), &reminders);
    assert!(rows(&compiled.records).iter().all(|row| row.reminders.is_empty()));
}

#[test]
fn week_headers_open_when_weekday_index_drops() {
    let class_dates = dates("MWF", d(2016, 8, 24), d(2016, 9, 2));
    let compiled = compile_schedule(&class_dates, &[], &DateMap::new(), &DateMap::new());

    let headers: Vec<&ScheduleRecord> = compiled.records.iter().filter(|r| r.is_header()).collect();
    assert_eq!(headers, vec![&week(1), &week(2)]);
    // Wed, Fri | Mon, Wed, Fri
    assert_eq!(compiled.records[0], week(1));
    assert_eq!(compiled.records[3], week(2));
    assert_eq!(compiled.summary.weeks, 2);
}

#[test]
fn single_weekday_mask_never_reopens_a_week() {
    let class_dates = dates("W", d(2016, 8, 22), d(2016, 10, 1));
    assert_eq!(class_dates.len(), 6);
    let compiled = compile_schedule(&class_dates, &[], &DateMap::new(), &DateMap::new());

    let week_headers = compiled
        .records
        .iter()
        .filter(|r| matches!(r, ScheduleRecord::WeekHeader { .. }))
        .count();
    assert_eq!(week_headers, 1);
}

#[test]
fn part_before_break_flushes_and_topic_waits() {
    let class_dates = dates("TR", d(2016, 8, 22), d(2016, 9, 2));
    let mut breaks = DateMap::new();
    breaks.insert(d(2016, 8, 30), "Convocation".into());
    let lessons = vec![
        Lesson::topic("Intro"),
        Lesson::topic("Types"),
        Lesson::part("Part II"),
        Lesson::topic("Functions"),
    ];

    let compiled = compile_schedule(&class_dates, &lessons, &breaks, &DateMap::new());
    let lines: Vec<String> = compiled.records.iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "Week 1",
            "2016-08-23;Intro;;",
            "2016-08-25;Types;;",
            "Part II",
            "Week 2",
            "2016-08-30;Convocation - No Class;;",
            "2016-09-01;Functions;;",
        ]
    );
    assert_eq!(compiled.summary.topics_consumed, 3);
    assert_eq!(compiled.summary.lessons_unconsumed, 0);
}

#[test]
fn blank_part_title_is_kept_in_records_but_not_written() {
    let lessons = vec![Lesson::part(" "), Lesson::topic("A")];
    let compiled = compile_schedule(&[d(2016, 8, 23)], &lessons, &DateMap::new(), &DateMap::new());

    assert_eq!(compiled.records[0], part(" "));
    assert_eq!(compiled.to_lines().unwrap(), "Week 1\n2016-08-23;A;;\n");
}

#[test]
fn parts_emit_before_week_header_without_consuming_dates() {
    let class_dates = dates("TR", d(2016, 8, 22), d(2016, 9, 2));
    let lessons = vec![
        Lesson::part("Part I"),
        Lesson::part("Foundations"),
        Lesson::topic("Intro"),
        Lesson::topic("Types"),
        Lesson::part("Part II"),
        Lesson::topic("Functions"),
    ];

    let compiled = compile_schedule(&class_dates, &lessons, &DateMap::new(), &DateMap::new());
    let lines: Vec<String> = compiled.records.iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "Part I",
            "Foundations",
            "Week 1",
            "2016-08-23;Intro;;",
            "2016-08-25;Types;;",
            "Part II",
            "Week 2",
            "2016-08-30;Functions;;",
            "2016-09-01;;;",
        ]
    );
    assert_eq!(compiled.records[0], part("Part I"));
}

#[test]
fn excluded_lessons_never_appear_and_consume_nothing() {
    let class_dates = dates("TR", d(2016, 8, 22), d(2016, 8, 25));
    let lessons = vec![
        Lesson::topic("Skipped").excluded(),
        Lesson::topic("Intro"),
        Lesson::part("Hidden part").excluded(),
        Lesson::topic("Also skipped").excluded(),
        Lesson::topic("Types"),
    ];

    let compiled = compile_schedule(&class_dates, &lessons, &DateMap::new(), &DateMap::new());
    let text = compiled.to_lines().unwrap();
    assert!(!text.contains("Skipped"));
    assert!(!text.contains("skipped"));
    assert!(!text.contains("Hidden part"));
    let rows = rows(&compiled.records);
    assert_eq!(rows[0].topic, "Intro");
    assert_eq!(rows[1].topic, "Types");
    assert_eq!(compiled.summary.topics_available, 2);
    assert_eq!(compiled.summary.topics_consumed, 2);
}

#[test]
fn longer_lesson_stream_is_counted_not_rejected() {
    let class_dates = [d(2016, 8, 23)];
    let lessons = topics(&["A", "B", "C"]);
    let compiled = compile_schedule(&class_dates, &lessons, &DateMap::new(), &DateMap::new());
    assert_eq!(rows(&compiled.records).len(), 1);
    assert_eq!(compiled.summary.topics_consumed, 1);
    assert_eq!(compiled.summary.lessons_unconsumed, 2);
}

#[test]
fn empty_calendar_produces_no_records() {
    let compiled = compile_schedule(&[], &topics(&["A"]), &DateMap::new(), &DateMap::new());
    assert!(compiled.records.is_empty());
    assert_eq!(compiled.summary.weeks, 0);
    assert_eq!(compiled.summary.topics_consumed, 0);
}

#[test]
fn compile_is_deterministic() {
    let mut semester = SemesterInfo::new(d(2016, 8, 22), d(2016, 12, 9), WeekdayMask::from_mnemonic("MWF"));
    semester.breaks.insert(d(2016, 9, 5), "Labor Day".into());
    semester.reminders.insert(d(2016, 9, 10), "HW1 due,Quiz".into());
    semester.final_exam.insert(d(2016, 12, 14), "8:00 AM".into());
    let lessons = topics(&["A", "B", "C", "D"]);

    let first = compile_semester(&semester, &lessons).to_lines().unwrap();
    let second = compile_semester(&semester, &lessons).to_lines().unwrap();
    assert_eq!(first, second);
}

#[test]
fn semester_compile_appends_final_exams_after_calendar() {
    let mut semester = SemesterInfo::new(d(2016, 8, 22), d(2016, 8, 25), WeekdayMask::from_mnemonic("TR"));
    semester.breaks.insert(d(2016, 8, 25), "Fall Break".into());
    semester.reminders.insert(d(2016, 8, 24), "HW1 due".into());
    semester.final_exam.insert(d(2016, 12, 15), "10:30-1:00".into());
    semester.final_exam.insert(d(2016, 12, 13), "8:00-10:30".into());

    let compiled = compile_semester(&semester, &topics(&["Intro", "Review"]));
    assert_eq!(
        compiled.to_lines().unwrap(),
        "Week 1\n\
         2016-08-23;Intro;;HW1 due (2016-08-24)\n\
         2016-08-25;Fall Break - No Class;;\n\
         2016-12-13;Final Exam;;8:00-10:30\n\
         2016-12-15;Final Exam;;10:30-1:00\n"
    );
    assert_eq!(compiled.summary.class_dates, 2);
}
