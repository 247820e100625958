/*
 *  ctfbot - Discord bot for browsing CTFtime events and teams.
 *  Copyright (C) 2025  ctfbot contributors
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */
use crate::error::ParseError;
use chrono::{DateTime, FixedOffset};
use getset::{CopyGetters, Getters};
use serde::Deserialize;
use std::fmt;

/// Placeholder shown for any value CTFtime did not provide.
pub const NOT_AVAILABLE: &str = "N/A";
/// Placeholder for missing descriptions.
pub const NO_DESCRIPTION: &str = "No description available.";
/// Layout of the timestamps returned by the CTFtime API (e.g. `2025-06-01T00:00:00+00:00`).
pub const CTFTIME_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// An event object, as returned by `/api/v1/events/`. Every field may be missing.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawEvent {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub start: Option<String>,
    pub finish: Option<String>,
    pub duration: Option<RawDuration>,
    pub onsite: Option<bool>,
    pub location: Option<String>,
    pub format: Option<String>,
    pub logo: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct RawDuration {
    pub days: Option<u32>,
    pub hours: Option<u32>,
    pub minutes: Option<u32>,
}

/// How long an event runs, as announced by its organizers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventDuration {
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
}

impl From<RawDuration> for EventDuration {
    fn from(raw: RawDuration) -> Self {
        Self {
            days: raw.days.unwrap_or(0),
            hours: raw.hours.unwrap_or(0),
            minutes: raw.minutes.unwrap_or(0),
        }
    }
}

impl fmt::Display for EventDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d {}h {}m", self.days, self.hours, self.minutes)
    }
}

/// A CTF event, with every field resolved to a value that can be displayed as is.
#[cfg_attr(test, derive(Debug))]
#[derive(Clone, PartialEq, Getters, CopyGetters)]
pub struct EventSummary {
    /// CTFtime identifier, if the record carried one.
    #[getset(get_copy = "pub")]
    id: Option<u64>,
    #[getset(get = "pub")]
    title: String,
    /// The event's own website (not its CTFtime page).
    #[getset(get = "pub")]
    url: String,
    #[getset(get = "pub")]
    description: String,
    #[getset(get_copy = "pub")]
    start: Option<DateTime<FixedOffset>>,
    #[getset(get_copy = "pub")]
    finish: Option<DateTime<FixedOffset>>,
    #[getset(get_copy = "pub")]
    duration: EventDuration,
    /// Competition format, e.g. "Jeopardy" or "Attack-Defense".
    #[getset(get = "pub")]
    format: String,
    #[getset(get = "pub")]
    location: String,
    #[getset(get = "pub")]
    logo: Option<String>,
}

impl EventSummary {
    /// Resolves a raw API record, substituting placeholders for missing fields.
    ///
    /// Fails only when a timestamp is present but cannot be parsed.
    pub fn from_record(raw: RawEvent) -> Result<Self, ParseError> {
        let start = parse_instant("start", raw.start.as_deref())?;
        let finish = parse_instant("finish", raw.finish.as_deref())?;

        // TODO: ask the CTF admins whether onsite events should really be the ones showing the
        // upstream location; this keeps the behavior the server has always had.
        let location = if raw.onsite.unwrap_or(false) {
            text_or(raw.location, NOT_AVAILABLE)
        } else {
            String::from("Online")
        };

        Ok(Self {
            id: raw.id,
            title: text_or(raw.title, NOT_AVAILABLE),
            url: text_or(raw.url, NOT_AVAILABLE),
            description: text_or(raw.description, NO_DESCRIPTION),
            start,
            finish,
            duration: raw.duration.map(EventDuration::from).unwrap_or_default(),
            format: text_or(raw.format, NOT_AVAILABLE),
            location,
            logo: raw.logo.filter(|logo| !logo.trim().is_empty()),
        })
    }

    /// Discord timestamp token for the start of the event, or `N/A`.
    pub fn start_token(&self) -> String {
        instant_token(self.start)
    }

    /// Discord timestamp token for the end of the event, or `N/A`.
    pub fn finish_token(&self) -> String {
        instant_token(self.finish)
    }
}

/// Returns the value, or `default` if it is missing or blank.
pub fn text_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}

/// Parses a CTFtime timestamp. Missing values and the `N/A` placeholder are never parsed.
pub fn parse_instant(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<DateTime<FixedOffset>>, ParseError> {
    let Some(text) = value.map(str::trim) else {
        return Ok(None);
    };
    if text.is_empty() || text == NOT_AVAILABLE {
        return Ok(None);
    }

    DateTime::parse_from_str(text, CTFTIME_TIME_FORMAT)
        .or_else(|e| DateTime::parse_from_rfc3339(text).map_err(|_| e))
        .map(Some)
        .map_err(|source| ParseError::Timestamp {
            field,
            value: text.to_owned(),
            source,
        })
}

/// Formats an instant as a Discord timestamp token (`<t:UNIX:F>`), which every client renders
/// in its own timezone.
pub fn discord_timestamp(instant: &DateTime<FixedOffset>) -> String {
    format!("<t:{}:F>", instant.timestamp())
}

fn instant_token(instant: Option<DateTime<FixedOffset>>) -> String {
    instant
        .as_ref()
        .map(discord_timestamp)
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned())
}
