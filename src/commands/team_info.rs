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
use crate::commands;
use crate::dispatch::Command;
use crate::{Context, Error};

#[poise::command(
    slash_command,
    description_localized(
        "en-US",
        "Displays information about a specific CTF team, including members and upcoming events."
    )
)]
#[ctfbot::log_cmd]
pub async fn team_info(
    ctx: Context<'_>,
    #[description = "The CTFtime ID of the team (defaults to our own team)."] team_id: Option<
        u64,
    >,
) -> Result<(), Error> {
    let team_id = team_id.unwrap_or(ctx.data().config.default_team_id);

    commands::run(ctx, Command::TeamInfo { team_id }, commands::author(ctx)).await
}
