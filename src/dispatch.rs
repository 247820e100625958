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
/* Command pipeline, independent of Discord: checks the caller, fetches, parses, renders and
 * answers through a `Responder`. */

use crate::ctftime::{CtfSource, TeamPageSource};
use crate::embed::{self, DisplayMessage};
use crate::error::CommandError;
use crate::event::EventSummary;
use crate::team::TeamProfile;
use crate::Error;
use chrono::Utc;
use log::{debug, warn};
use serenity::async_trait;

pub const PERMISSION_DENIED: &str = "❌ You do not have permission to use this command!";
pub const GUILD_ONLY: &str = "This command must be used in a server.";
pub const INVALID_RESPONSE: &str = "Invalid response received from CTFtime API.";
pub const NO_UPCOMING_EVENTS: &str = "No upcoming CTF events found.";

/// Discord does not accept more fields in a single embed.
pub const MAX_LIMIT: u8 = 25;

/// A command, with its arguments already resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    UpcomingCtfs { limit: u8 },
    TeamInfo { team_id: u64 },
    CtfInfo { event_id: u64 },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::UpcomingCtfs { .. } => "upcoming_ctfs",
            Command::TeamInfo { .. } => "team_info",
            Command::CtfInfo { .. } => "ctf_info",
        }
    }

    /// What the command fetches, for the error replies.
    fn subject(&self) -> &'static str {
        match self {
            Command::UpcomingCtfs { .. } => "CTF events",
            Command::TeamInfo { .. } => "team information",
            Command::CtfInfo { .. } => "event information",
        }
    }
}

/// Who triggered a command.
#[derive(Clone, Debug, Default)]
pub struct Caller {
    pub name: String,
    /// Whether the command was used in a guild, as opposed to a DM.
    pub in_guild: bool,
    /// Names of the caller's roles in that guild.
    pub roles: Vec<String>,
}

/// A received command and its caller.
#[derive(Clone, Debug)]
pub struct Invocation {
    pub command: Command,
    pub caller: Caller,
}

/// An answer to an interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Embed(DisplayMessage),
    Text { content: String, ephemeral: bool },
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Reply::Text {
            content: content.into(),
            ephemeral: false,
        }
    }

    /// A text only visible to the caller.
    pub fn private(content: impl Into<String>) -> Self {
        Reply::Text {
            content: content.into(),
            ephemeral: true,
        }
    }
}

/// The ways a command can answer the interaction that triggered it.
#[async_trait]
pub trait Responder: Send {
    /// Answers right away.
    async fn reply(&mut self, reply: Reply) -> Result<(), Error>;

    /// Acknowledges the interaction, to answer later with [`Responder::followup`].
    async fn defer(&mut self) -> Result<(), Error>;

    /// Answers an interaction that was deferred.
    async fn followup(&mut self, reply: Reply) -> Result<(), Error>;
}

/// Runs the commands against a CTFtime source.
pub struct Dispatcher<S> {
    source: S,
    required_role: String,
}

impl<S> Dispatcher<S>
where
    S: CtfSource + TeamPageSource,
{
    pub fn new(source: S, required_role: impl Into<String>) -> Self {
        Self {
            source,
            required_role: required_role.into(),
        }
    }

    /**
     * Runs an invocation to completion, sending exactly one answer (plus the deferral for
     * `ctf_info`).
     *
     * Command errors are turned into replies here. Only failures to talk to Discord are
     * returned.
     */
    pub async fn dispatch<R: Responder>(
        &self,
        invocation: Invocation,
        responder: &mut R,
    ) -> Result<(), Error> {
        let command = invocation.command;
        debug!("Dispatching {:?} for {}", command, invocation.caller.name);

        match command {
            Command::UpcomingCtfs { limit } => {
                let reply = match self.upcoming_ctfs(limit).await {
                    Ok(Some(message)) => Reply::Embed(message),
                    Ok(None) => Reply::text(NO_UPCOMING_EVENTS),
                    Err(e) => error_reply(&command, &e),
                };
                responder.reply(reply).await
            }
            Command::TeamInfo { team_id } => {
                let reply = match self.team_info(team_id).await {
                    Ok(message) => Reply::Embed(message),
                    Err(e) => error_reply(&command, &e),
                };
                responder.reply(reply).await
            }
            Command::CtfInfo { event_id } => {
                if let Err(e) = self.authorize(&invocation.caller) {
                    return responder.reply(error_reply(&command, &e)).await;
                }

                // CTFtime can be slow to answer single events; don't let the interaction expire.
                responder.defer().await?;
                let reply = match self.ctf_info(event_id).await {
                    Ok(message) => Reply::Embed(message),
                    Err(e) => error_reply(&command, &e),
                };
                responder.followup(reply).await
            }
        }
    }

    /// Checks that the caller may use administrative commands.
    pub fn authorize(&self, caller: &Caller) -> Result<(), CommandError> {
        if !caller.in_guild {
            return Err(CommandError::GuildOnly);
        }
        if !caller.roles.iter().any(|role| *role == self.required_role) {
            return Err(CommandError::PermissionDenied {
                role: self.required_role.clone(),
            });
        }
        Ok(())
    }

    /// Upcoming events, or `None` if there are none.
    pub async fn upcoming_ctfs(&self, limit: u8) -> Result<Option<DisplayMessage>, CommandError> {
        let limit = limit.clamp(1, MAX_LIMIT);
        let now = Utc::now().timestamp();

        let records = self.source.upcoming_events(limit, now).await?;
        debug!("Received {} upcoming events", records.len());
        if records.is_empty() {
            return Ok(None);
        }

        let events = records
            .into_iter()
            .map(EventSummary::from_record)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(embed::render_upcoming(&events)))
    }

    pub async fn team_info(&self, team_id: u64) -> Result<DisplayMessage, CommandError> {
        // The page is only requested once the API call succeeded.
        let record = self.source.team(team_id).await?;
        let page = self.source.team_page(team_id).await?;
        debug!(
            "Scraped {} members and {} planned events for team {}",
            page.members.len(),
            page.planned_events.len(),
            team_id
        );

        Ok(embed::render_team(&TeamProfile::from_record(record, page)))
    }

    pub async fn ctf_info(&self, event_id: u64) -> Result<DisplayMessage, CommandError> {
        let record = self.source.event(event_id).await?;
        let event = EventSummary::from_record(record)?;

        Ok(embed::render_event(&event))
    }
}

/// The reply shown to the user when `command` fails with `error`.
pub fn error_reply(command: &Command, error: &CommandError) -> Reply {
    warn!("[{}] {}", command.name(), error);

    match error {
        CommandError::PermissionDenied { .. } => Reply::private(PERMISSION_DENIED),
        CommandError::GuildOnly => Reply::private(GUILD_ONLY),
        e if e.is_schema() => Reply::text(INVALID_RESPONSE),
        _ => Reply::text(format!(
            "An error occurred while fetching {}.",
            command.subject()
        )),
    }
}
