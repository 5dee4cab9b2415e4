//! Values submitted through view forms, used as targets for decoding a
//! view webhook's `data`.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use time::Date;
use time::macros::format_description;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormValueError {
    #[error("invalid date {0:?}")]
    InvalidDate(String),
    #[error("invalid time format {0:?}")]
    InvalidTimeFormat(String),
    #[error("invalid hour value \"{0}\"")]
    InvalidHour(String),
    #[error("invalid minute value \"{0}\"")]
    InvalidMinute(String),
}

/// Value of a date block; accepts `YYYY-MM-DD` and `DD.MM.YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormDate(pub Date);

impl FromStr for FormDate {
    type Err = FormValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let iso = format_description!("[year]-[month]-[day]");
        let dotted = format_description!("[day].[month].[year]");

        Date::parse(s, &iso)
            .or_else(|_| Date::parse(s, &dotted))
            .map(FormDate)
            .map_err(|_| FormValueError::InvalidDate(s.to_string()))
    }
}

impl fmt::Display for FormDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl Deref for FormDate {
    type Target = Date;

    fn deref(&self) -> &Date {
        &self.0
    }
}

impl<'de> Deserialize<'de> for FormDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Value of a time block (`HH:MM`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormTime {
    pub hour: u8,
    pub minute: u8,
}

impl FromStr for FormTime {
    type Err = FormValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = s
            .split_once(':')
            .ok_or_else(|| FormValueError::InvalidTimeFormat(s.to_string()))?;

        let hour = hour
            .parse::<u8>()
            .ok()
            .filter(|h| *h <= 23)
            .ok_or_else(|| FormValueError::InvalidHour(hour.to_string()))?;
        let minute = minute
            .parse::<u8>()
            .ok()
            .filter(|m| *m <= 59)
            .ok_or_else(|| FormValueError::InvalidMinute(minute.to_string()))?;

        Ok(Self { hour, minute })
    }
}

impl fmt::Display for FormTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl<'de> Deserialize<'de> for FormTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// File uploaded through a file block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FormFile {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub size: u64,
}

/// Files uploaded through a file block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FormFiles(pub Vec<FormFile>);

impl FormFiles {
    pub fn get(&self, index: usize) -> Option<&FormFile> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Options ticked in a checkbox block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FormOptions(pub Vec<String>);

impl FormOptions {
    pub fn has(&self, option: &str) -> bool {
        self.0.iter().any(|o| o == option)
    }
}
