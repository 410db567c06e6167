use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use course_calendar::{
    ScheduleFile, ScheduleRecord, ScheduleStore, WeekdayMask, compile_semester,
    generate_class_dates, lesson_outline, load_course, load_semester_info, save_json,
    schedule_page, syllabus, write_json, write_schedule,
};
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn print_help() {
    println!(
        "Usage: course-cal <command> [options]\n\nCommands:\n  help                                   Show this help\n  calendar <first> <last> <days>         List class dates (YYYY-MM-DD, days like MWF or TR)\n  schedule -i <semester> [-c <course>] [-o <out>]\n                                         Build the schedule file (blank without a course)\n  render-schedule -s <schedule> -c <course> -i <semester> [-o <out>]\n                                         Schedule page context as JSON\n  render-syllabus -s <schedule> -c <course> -i <semester> [-o <out>]\n                                         Syllabus context as JSON\n  render-lessons -c <course> [-o <out>]  Lesson outline context as JSON\n\nOptions:\n  -i, --semester-info <path>   Semester JSON (first_day, last_day, days, breaks, reminders, final_exam)\n  -c, --course <path>          Course JSON (lessons inline or as a path)\n  -s, --schedule <path>        Schedule file produced by 'schedule'\n  -o, --output <path>          Write here instead of stdout\n\nSet RUST_LOG=info to see diagnostics."
    );
}

/// Command arguments: `-x value` / `--long value` options plus positionals.
struct Args {
    options: HashMap<&'static str, String>,
    positional: Vec<String>,
}

impl Args {
    fn parse(raw: &[String]) -> Result<Self> {
        let mut options = HashMap::new();
        let mut positional = Vec::new();
        let mut iter = raw.iter();
        while let Some(arg) = iter.next() {
            let key = match arg.as_str() {
                "-i" | "--semester-info" | "--semester_info" => "semester_info",
                "-c" | "--course" => "course",
                "-s" | "--schedule" => "schedule",
                "-o" | "--output" => "output",
                other if other.starts_with('-') => bail!("unknown option '{other}'"),
                other => {
                    positional.push(other.to_string());
                    continue;
                }
            };
            let value = iter
                .next()
                .ok_or_else(|| anyhow!("option '{arg}' requires a value"))?;
            options.insert(key, value.clone());
        }
        Ok(Self {
            options,
            positional,
        })
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    fn require(&self, key: &str, flag: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| anyhow!("missing required option {flag}"))
    }
}

fn open_output(path: Option<&str>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {path}"))?,
        )),
        None => Box::new(io::stdout().lock()),
    })
}

fn emit_json<T: Serialize>(value: &T, output: Option<&str>) -> Result<()> {
    match output {
        Some(path) => save_json(value, path).with_context(|| format!("cannot write {path}"))?,
        None => write_json(value, io::stdout().lock())?,
    }
    Ok(())
}

fn read_schedule_file(args: &Args) -> Result<Vec<ScheduleRecord>> {
    Ok(ScheduleFile::new(args.require("schedule", "-s")?).load_schedule()?)
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{input}' (expected YYYY-MM-DD)"))
}

fn run_calendar(args: &Args) -> Result<()> {
    let [first, last, days] = args.positional.as_slice() else {
        bail!("usage: calendar <first> <last> <days>");
    };
    let mask = WeekdayMask::from_mnemonic(days);
    let mut out = open_output(args.get("output"))?;
    for day in generate_class_dates(parse_date(first)?, parse_date(last)?, &mask) {
        writeln!(out, "{day}")?;
    }
    out.flush()?;
    Ok(())
}

fn run_schedule(args: &Args) -> Result<()> {
    let semester = load_semester_info(args.require("semester_info", "-i")?)?;
    let lessons = match args.get("course") {
        Some(path) => load_course(path)?.inline_lessons().to_vec(),
        None => Vec::new(),
    };
    let compiled = compile_semester(&semester, &lessons);
    match args.get("output") {
        Some(path) => ScheduleFile::new(path).save_schedule(&compiled.records)?,
        None => write_schedule(&compiled.records, io::stdout().lock())?,
    }
    eprintln!("Schedule compiled ({})", compiled.summary.to_cli_summary());
    Ok(())
}

fn run_render_schedule(args: &Args) -> Result<()> {
    let records = read_schedule_file(args)?;
    let course = load_course(args.require("course", "-c")?)?;
    let semester = load_semester_info(args.require("semester_info", "-i")?)?;
    emit_json(&schedule_page(&records, &course, &semester), args.get("output"))
}

fn run_render_syllabus(args: &Args) -> Result<()> {
    let records = read_schedule_file(args)?;
    let course = load_course(args.require("course", "-c")?)?;
    let semester = load_semester_info(args.require("semester_info", "-i")?)?;
    emit_json(&syllabus(&records, &course, &semester), args.get("output"))
}

fn run_render_lessons(args: &Args) -> Result<()> {
    let course = load_course(args.require("course", "-c")?)?;
    emit_json(&lesson_outline(&course), args.get("output"))
}

fn run(argv: &[String]) -> Result<()> {
    let Some((cmd, rest)) = argv.split_first() else {
        print_help();
        return Ok(());
    };
    let args = Args::parse(rest)?;
    match cmd.as_str() {
        "help" | "-h" | "--help" => {
            print_help();
            Ok(())
        }
        "calendar" => run_calendar(&args),
        "schedule" => run_schedule(&args),
        "render-schedule" => run_render_schedule(&args),
        "render-syllabus" => run_render_syllabus(&args),
        "render-lessons" => run_render_lessons(&args),
        other => bail!("unknown command '{other}' (try 'help')"),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let argv: Vec<String> = env::args().skip(1).collect();
    match run(&argv) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
