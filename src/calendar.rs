use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Set of weekdays on which a course meets.
///
/// Written as a compact mnemonic with one letter per weekday, Monday first:
/// `M T W R F S U`. `"MWF"` is Monday/Wednesday/Friday, `"TR"` is
/// Tuesday/Thursday. Letters outside that alphabet are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekdayMask {
    days: [bool; 7],
}

impl WeekdayMask {
    const LETTERS: [(char, Weekday); 7] = [
        ('M', Weekday::Mon),
        ('T', Weekday::Tue),
        ('W', Weekday::Wed),
        ('R', Weekday::Thu),
        ('F', Weekday::Fri),
        ('S', Weekday::Sat),
        ('U', Weekday::Sun),
    ];

    pub fn from_mnemonic(mnemonic: &str) -> Self {
        let mut days = [false; 7];
        for (letter, weekday) in Self::LETTERS {
            if mnemonic.contains(letter) {
                days[weekday.num_days_from_monday() as usize] = true;
            }
        }
        Self { days }
    }

    pub fn from_weekdays<I>(weekdays: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        let mut days = [false; 7];
        for weekday in weekdays {
            days[weekday.num_days_from_monday() as usize] = true;
        }
        Self { days }
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.days[weekday.num_days_from_monday() as usize]
    }

    pub fn is_empty(&self) -> bool {
        !self.days.iter().any(|enabled| *enabled)
    }

    /// Enabled weekdays, Monday first.
    pub fn weekdays(&self) -> Vec<Weekday> {
        Self::LETTERS
            .iter()
            .filter(|(_, weekday)| self.contains(*weekday))
            .map(|(_, weekday)| *weekday)
            .collect()
    }

    /// Canonical mnemonic, e.g. `"TR"` for a mask built from `"RTx"`.
    pub fn to_mnemonic(&self) -> String {
        Self::LETTERS
            .iter()
            .filter(|(_, weekday)| self.contains(*weekday))
            .map(|(letter, _)| *letter)
            .collect()
    }
}

impl fmt::Display for WeekdayMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_mnemonic())
    }
}

impl Serialize for WeekdayMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_mnemonic())
    }
}

impl<'de> Deserialize<'de> for WeekdayMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mnemonic = String::deserialize(deserializer)?;
        Ok(Self::from_mnemonic(&mnemonic))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemesterWindow {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub weekday_mask: WeekdayMask,
}

impl SemesterWindow {
    pub fn new(first_day: NaiveDate, last_day: NaiveDate, weekday_mask: WeekdayMask) -> Self {
        Self {
            first_day,
            last_day,
            weekday_mask,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first_day <= date && date <= self.last_day
    }

    pub fn class_dates(&self) -> Vec<NaiveDate> {
        generate_class_dates(self.first_day, self.last_day, &self.weekday_mask)
    }
}

/// Every date in `first..=last` whose weekday is enabled in `mask`, ascending.
///
/// An inverted range or an empty mask yields no dates.
pub fn generate_class_dates(first: NaiveDate, last: NaiveDate, mask: &WeekdayMask) -> Vec<NaiveDate> {
    if mask.is_empty() {
        return Vec::new();
    }
    // `iter_days` ends at `NaiveDate::MAX` instead of overflowing.
    first
        .iter_days()
        .take_while(|day| *day <= last)
        .filter(|day| mask.contains(day.weekday()))
        .collect()
}
