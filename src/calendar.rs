//! Scheduling a cooking session as a calendar event.
//!
//! Writes are one-way: an event is created and never read back.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::recipe::Recipe;

pub const DEEP_LINK_SCHEME: &str = "cooknow";
const SESSION_LENGTH_MINUTES: i64 = 60;
const ICS_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const MAX_LINE_OCTETS: usize = 75;

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("calendar access was not granted")]
    PermissionDenied,
    #[error("no editable calendar found")]
    NoWritableCalendar,
    #[error("failed to write calendar: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub notes: String,
    pub url: String,
    pub time_zone: String,
}

impl CalendarEvent {
    pub fn for_recipe(recipe: &Recipe, start: DateTime<Utc>) -> Self {
        Self {
            title: format!("Cook: {}", recipe.name),
            start,
            end: start + Duration::minutes(SESSION_LENGTH_MINUTES),
            notes: recipe
                .ingredients
                .iter()
                .map(|i| format!("• {}", i.name))
                .collect::<Vec<_>>()
                .join("\n"),
            url: format!("{}://recipe/{}", DEEP_LINK_SCHEME, recipe.id),
            time_zone: "UTC".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarInfo {
    pub id: String,
    pub title: String,
    pub allows_modifications: bool,
}

/// A device or file calendar that events can be written to.
pub trait CalendarSink {
    fn request_permission(&mut self) -> bool;
    fn calendars(&self) -> Vec<CalendarInfo>;
    /// Returns the id of the created event.
    fn create_event(&mut self, calendar_id: &str, event: &CalendarEvent) -> Result<String, CalendarError>;
}

/// Asks for access, picks the first editable calendar and creates the cooking event.
pub fn schedule_recipe<S: CalendarSink>(
    sink: &mut S,
    recipe: &Recipe,
    start: DateTime<Utc>,
) -> Result<(String, CalendarEvent), CalendarError> {
    if !sink.request_permission() {
        return Err(CalendarError::PermissionDenied);
    }
    let calendar = sink
        .calendars()
        .into_iter()
        .find(|c| c.allows_modifications)
        .ok_or(CalendarError::NoWritableCalendar)?;

    let event = CalendarEvent::for_recipe(recipe, start);
    let event_id = sink.create_event(&calendar.id, &event)?;
    info!(recipe = %recipe.id, calendar = %calendar.id, %start, "cooking session scheduled");
    Ok((event_id, event))
}

/// Calendar backed by an iCalendar (.ics) file. Events already in the file are kept.
#[derive(Debug)]
pub struct IcsCalendar {
    path: PathBuf,
    events: Vec<Vec<String>>, // VEVENT blocks, lines as written to the file
}

impl IcsCalendar {
    pub const CALENDAR_ID: &'static str = "ics";

    /// Opens `path`, reading any VEVENTs it already holds. A missing file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CalendarError> {
        let path = path.into();
        let events = if path.exists() {
            read_event_blocks(&std::fs::read_to_string(&path)?)
        } else {
            Vec::new()
        };
        debug!(count = events.len(), path = ?path, "ics calendar opened");
        Ok(Self { path, events })
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn render(&self) -> String {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:-//{}//EN", DEEP_LINK_SCHEME),
        ];
        for block in &self.events {
            lines.extend(block.iter().cloned());
        }
        lines.push("END:VCALENDAR".to_string());
        let mut out = lines.join("\r\n");
        out.push_str("\r\n");
        out
    }
}

impl CalendarSink for IcsCalendar {
    fn request_permission(&mut self) -> bool {
        true
    }

    fn calendars(&self) -> Vec<CalendarInfo> {
        vec![CalendarInfo {
            id: Self::CALENDAR_ID.to_string(),
            title: self.path.display().to_string(),
            allows_modifications: true,
        }]
    }

    fn create_event(&mut self, _calendar_id: &str, event: &CalendarEvent) -> Result<String, CalendarError> {
        let uid = format!("{}@{}", Uuid::new_v4(), DEEP_LINK_SCHEME);
        self.events.push(render_event(&uid, event, Utc::now()));
        std::fs::write(&self.path, self.render())?;
        Ok(uid)
    }
}

/// Physical lines of every VEVENT in `content`, folded continuations included.
fn read_event_blocks(content: &str) -> Vec<Vec<String>> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<String>> = None;
    for line in content.lines() {
        if line == "BEGIN:VEVENT" {
            current = Some(Vec::new());
        }
        if let Some(block) = current.as_mut() {
            block.push(line.to_string());
        }
        if line == "END:VEVENT" {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
        }
    }
    blocks
}

fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

/// Splits a content line into physical lines of at most 75 octets, continuations
/// starting with a single space. Never splits inside a UTF-8 sequence.
fn fold_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut width = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(ch);
        width += len;
    }
    out
}

fn render_event(uid: &str, event: &CalendarEvent, stamp: DateTime<Utc>) -> Vec<String> {
    [
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", uid),
        format!("DTSTAMP:{}", stamp.format(ICS_DATE_FORMAT)),
        format!("DTSTART:{}", event.start.format(ICS_DATE_FORMAT)),
        format!("DTEND:{}", event.end.format(ICS_DATE_FORMAT)),
        format!("SUMMARY:{}", escape_text(&event.title)),
        format!("DESCRIPTION:{}", escape_text(&event.notes)),
        format!("URL:{}", event.url),
        "END:VEVENT".to_string(),
    ]
    .iter()
    .map(|line| fold_line(line))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{Ingredient, RecipeSource};
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn recipe() -> Recipe {
        Recipe {
            id: "user-42".to_string(),
            name: "Risotto".to_string(),
            ingredients: vec![Ingredient::new("Arborio rice"), Ingredient::owned("Thyme")],
            instructions: String::new(),
            link: None,
            image: None,
            source: RecipeSource::User,
        }
    }

    struct FakeDevice {
        granted: bool,
        calendars: Vec<CalendarInfo>,
        created: Vec<(String, CalendarEvent)>,
    }

    impl CalendarSink for FakeDevice {
        fn request_permission(&mut self) -> bool {
            self.granted
        }

        fn calendars(&self) -> Vec<CalendarInfo> {
            self.calendars.clone()
        }

        fn create_event(&mut self, calendar_id: &str, event: &CalendarEvent) -> Result<String, CalendarError> {
            self.created.push((calendar_id.to_string(), event.clone()));
            Ok(format!("evt-{}", self.created.len()))
        }
    }

    fn calendar(id: &str, writable: bool) -> CalendarInfo {
        CalendarInfo {
            id: id.to_string(),
            title: id.to_string(),
            allows_modifications: writable,
        }
    }

    #[test]
    fn test_event_for_recipe() {
        let start = Utc.with_ymd_and_hms(2026, 3, 14, 18, 30, 0).unwrap();
        let event = CalendarEvent::for_recipe(&recipe(), start);
        assert_eq!(event.title, "Cook: Risotto");
        assert_eq!(event.end, Utc.with_ymd_and_hms(2026, 3, 14, 19, 30, 0).unwrap());
        assert_eq!(event.notes, "• Arborio rice\n• Thyme");
        assert_eq!(event.url, "cooknow://recipe/user-42");
        assert_eq!(event.time_zone, "UTC");
    }

    #[test]
    fn test_schedule_picks_first_writable_calendar() {
        let mut device = FakeDevice {
            granted: true,
            calendars: vec![calendar("holidays", false), calendar("home", true), calendar("work", true)],
            created: Vec::new(),
        };
        let (id, _) = schedule_recipe(&mut device, &recipe(), Utc::now()).unwrap();
        assert_eq!(id, "evt-1");
        assert_eq!(device.created[0].0, "home");
    }

    #[test]
    fn test_schedule_permission_denied() {
        let mut device = FakeDevice {
            granted: false,
            calendars: vec![calendar("home", true)],
            created: Vec::new(),
        };
        let result = schedule_recipe(&mut device, &recipe(), Utc::now());
        assert!(matches!(result, Err(CalendarError::PermissionDenied)));
        assert!(device.created.is_empty());
    }

    #[test]
    fn test_schedule_without_writable_calendar() {
        let mut device = FakeDevice {
            granted: true,
            calendars: vec![calendar("holidays", false)],
            created: Vec::new(),
        };
        let result = schedule_recipe(&mut device, &recipe(), Utc::now());
        assert!(matches!(result, Err(CalendarError::NoWritableCalendar)));
    }

    #[test]
    fn test_ics_file_written() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("cook.ics");
        let mut ics = IcsCalendar::open(&path)?;
        let start = Utc.with_ymd_and_hms(2026, 3, 14, 18, 30, 0).unwrap();
        schedule_recipe(&mut ics, &recipe(), start)?;

        let written = std::fs::read_to_string(&path)?;
        assert!(written.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(written.contains("DTSTART:20260314T183000Z\r\n"));
        assert!(written.contains("DTEND:20260314T193000Z\r\n"));
        assert!(written.contains("SUMMARY:Cook: Risotto\r\n"));
        assert!(written.contains("DESCRIPTION:• Arborio rice\\n• Thyme\r\n"));
        assert!(written.ends_with("END:VCALENDAR\r\n"));
        Ok(())
    }

    #[test]
    fn test_ics_keeps_events_across_sessions() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("cook.ics");
        let first = Utc.with_ymd_and_hms(2026, 3, 14, 18, 30, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2026, 3, 21, 12, 0, 0).unwrap();

        schedule_recipe(&mut IcsCalendar::open(&path)?, &recipe(), first)?;
        let mut reopened = IcsCalendar::open(&path)?;
        assert_eq!(reopened.event_count(), 1);
        schedule_recipe(&mut reopened, &recipe(), second)?;

        let written = std::fs::read_to_string(&path)?;
        assert_eq!(written.matches("BEGIN:VEVENT\r\n").count(), 2);
        assert_eq!(written.matches("BEGIN:VCALENDAR").count(), 1);
        assert!(written.contains("DTSTART:20260314T183000Z\r\n"));
        assert!(written.contains("DTSTART:20260321T120000Z\r\n"));
        assert_eq!(IcsCalendar::open(&path)?.event_count(), 2);
        Ok(())
    }

    #[test]
    fn test_long_lines_are_folded() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("cook.ics");
        let mut long = recipe();
        long.ingredients = (1..=12)
            .map(|n| Ingredient::new(format!("Crème fraîche, batch {}", n)))
            .collect();
        let start = Utc.with_ymd_and_hms(2026, 3, 14, 18, 30, 0).unwrap();
        let (_, event) = schedule_recipe(&mut IcsCalendar::open(&path)?, &long, start)?;

        let written = std::fs::read_to_string(&path)?;
        assert!(written.split("\r\n").all(|line| line.len() <= MAX_LINE_OCTETS));
        let unfolded = written.replace("\r\n ", "");
        assert!(unfolded.contains(&format!("DESCRIPTION:{}\r\n", escape_text(&event.notes))));
        Ok(())
    }

    #[test]
    fn test_fold_line_respects_char_boundaries() {
        let line = format!("SUMMARY:{}", "é".repeat(60));
        let folded = fold_line(&line);
        for physical in folded.split("\r\n") {
            assert!(physical.len() <= MAX_LINE_OCTETS);
        }
        assert_eq!(folded.replace("\r\n ", ""), line);
        assert_eq!(fold_line("SUMMARY:short"), "SUMMARY:short");
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a,b;c\\d\ne"), "a\\,b\\;c\\\\d\\ne");
    }
}
