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

/* Plain text listing of the upcoming events, for use outside of Discord (`ctfbot list`). */

use crate::ctftime::CtfSource;
use crate::error::CommandError;
use crate::event::{EventSummary, NOT_AVAILABLE};
use chrono::{DateTime, FixedOffset, Utc};
use log::warn;
use std::io::{self, Write};

pub const DEFAULT_LIMIT: u8 = 10;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/**
 * Fetches up to `limit` upcoming events and prints them to `out`.
 *
 * Upstream failures are printed too, and then handled as if there were no events. Only errors
 * writing to `out` are returned.
 */
pub async fn run<S: CtfSource, W: Write>(source: &S, limit: u8, out: &mut W) -> io::Result<()> {
    let events = match fetch(source, limit).await {
        Ok(events) => events,
        Err(e) => {
            warn!("Could not list the upcoming events: {}", e);
            writeln!(out, "An error occurred: {}", e)?;
            Vec::new()
        }
    };

    write_events(&events, out)
}

async fn fetch<S: CtfSource>(source: &S, limit: u8) -> Result<Vec<EventSummary>, CommandError> {
    let records = source
        .upcoming_events(limit.max(1), Utc::now().timestamp())
        .await?;

    Ok(records
        .into_iter()
        .map(EventSummary::from_record)
        .collect::<Result<Vec<_>, _>>()?)
}

pub fn write_events<W: Write>(events: &[EventSummary], out: &mut W) -> io::Result<()> {
    if events.is_empty() {
        return writeln!(out, "No upcoming events found.");
    }

    for event in events {
        writeln!(out, "Title: {}", event.title())?;
        writeln!(out, "Start: {}", utc_time(event.start()))?;
        writeln!(out, "Finish: {}", utc_time(event.finish()))?;
        writeln!(out, "URL: {}", event.url())?;
        writeln!(out, "{}", "-".repeat(40))?;
    }

    Ok(())
}

/// Renders an instant in UTC, which is what CTFtime publishes.
fn utc_time(instant: Option<DateTime<FixedOffset>>) -> String {
    match instant {
        Some(instant) => instant
            .with_timezone(&Utc)
            .format(TIME_FORMAT)
            .to_string(),
        None => String::from(NOT_AVAILABLE),
    }
}
