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
pub mod ctf_info;
pub mod team_info;
pub mod upcoming_ctfs;

use crate::dispatch::{Caller, Command, Invocation, Reply, Responder};
use crate::{Context, Error};
use poise::serenity_prelude as serenity;
use poise::CreateReply;
use ::serenity::async_trait;
use std::collections::HashMap;

/// Every slash command of the bot, to be registered in the framework.
pub fn all() -> Vec<poise::Command<crate::Data, Error>> {
    vec![
        ctf_info::ctf_info(),
        team_info::team_info(),
        upcoming_ctfs::upcoming_ctfs(),
    ]
}

/**
 * Answers an interaction through poise. Replies sent after `defer` are turned into followups by
 * poise itself.
 */
pub struct PoiseResponder<'a> {
    ctx: Context<'a>,
}

#[async_trait]
impl<'a> Responder for PoiseResponder<'a> {
    async fn reply(&mut self, reply: Reply) -> Result<(), Error> {
        self.ctx.send(create_reply(reply)).await?;
        Ok(())
    }

    async fn defer(&mut self) -> Result<(), Error> {
        self.ctx.defer().await?;
        Ok(())
    }

    async fn followup(&mut self, reply: Reply) -> Result<(), Error> {
        self.ctx.send(create_reply(reply)).await?;
        Ok(())
    }
}

fn create_reply(reply: Reply) -> CreateReply {
    match reply {
        Reply::Embed(message) => CreateReply::default().embed(message.to_embed()),
        Reply::Text { content, ephemeral } => {
            CreateReply::default().content(content).ephemeral(ephemeral)
        }
    }
}

/**
 * Hands a command over to the dispatcher, answering through the invoking context.
 */
async fn run(ctx: Context<'_>, command: Command, caller: Caller) -> Result<(), Error> {
    let mut responder = PoiseResponder { ctx };
    ctx.data()
        .dispatcher
        .dispatch(Invocation { command, caller }, &mut responder)
        .await
}

/**
 * Describes the author of the command, without their roles.
 */
fn author(ctx: Context<'_>) -> Caller {
    Caller {
        name: ctx.author().name.clone(),
        in_guild: ctx.guild_id().is_some(),
        roles: Vec::new(),
    }
}

/**
 * Describes the author of the command, including the names of their roles in the guild.
 *
 * Role names are taken from the cache when the guild is cached, and requested from Discord
 * otherwise.
 */
async fn author_with_roles(ctx: Context<'_>) -> Result<Caller, Error> {
    let mut caller = author(ctx);
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(caller);
    };
    let Some(member) = ctx.author_member().await else {
        return Ok(caller);
    };

    let cached = ctx
        .guild()
        .map(|guild| role_names(&guild.roles, &member.roles));
    caller.roles = match cached {
        Some(roles) => roles,
        None => role_names(&guild_id.roles(ctx.http()).await?, &member.roles),
    };

    Ok(caller)
}

fn role_names(
    guild_roles: &HashMap<serenity::RoleId, serenity::Role>,
    member_roles: &[serenity::RoleId],
) -> Vec<String> {
    member_roles
        .iter()
        .filter_map(|id| guild_roles.get(id))
        .map(|role| role.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(id: u64, name: &str) -> serenity::Role {
        serde_json::from_value(serde_json::json!({
            "id": id.to_string(),
            "guild_id": "10",
            "name": name,
            "color": 0,
            "hoist": false,
            "icon": null,
            "unicode_emoji": null,
            "position": 1,
            "permissions": "0",
            "managed": false,
            "mentionable": false,
            "flags": 0
        }))
        .unwrap()
    }

    fn guild_roles() -> HashMap<serenity::RoleId, serenity::Role> {
        HashMap::from([
            (serenity::RoleId::new(1), role(1, "CTF Admin")),
            (serenity::RoleId::new(2), role(2, "Member")),
        ])
    }

    #[test]
    fn role_ids_are_resolved_to_names() {
        let names = role_names(
            &guild_roles(),
            &[serenity::RoleId::new(2), serenity::RoleId::new(1)],
        );
        assert_eq!(names, vec!["Member", "CTF Admin"]);
    }

    #[test]
    fn unknown_roles_are_skipped() {
        let names = role_names(&guild_roles(), &[serenity::RoleId::new(3)]);
        assert!(names.is_empty());
        assert!(role_names(&guild_roles(), &[]).is_empty());
    }
}
