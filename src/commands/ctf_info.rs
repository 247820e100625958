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

// Guild only, and restricted to the configured admin role (checked by the dispatcher).
#[poise::command(
    slash_command,
    description_localized("en-US", "Announces a CTF event in the current channel.")
)]
#[ctfbot::log_cmd]
pub async fn ctf_info(
    ctx: Context<'_>,
    #[description = "The CTFtime Event ID"] event_id: u64,
) -> Result<(), Error> {
    let caller = commands::author_with_roles(ctx).await?;

    commands::run(ctx, Command::CtfInfo { event_id }, caller).await
}
