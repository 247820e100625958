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
    description_localized("en-US", "Displays upcoming CTF events.")
)]
#[ctfbot::log_cmd]
pub async fn upcoming_ctfs(
    ctx: Context<'_>,
    #[description = "The number of events to display (default is 5)."]
    #[min = 1]
    #[max = 25]
    limit: Option<u8>,
) -> Result<(), Error> {
    let limit = limit.unwrap_or(ctx.data().config.default_limit);

    commands::run(ctx, Command::UpcomingCtfs { limit }, commands::author(ctx)).await
}
