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
mod commands;
mod ctftime;
mod dispatch;
mod embed;
mod error;
mod event;
mod fetch;
mod listing;
mod scrape;
mod team;
mod utils;

use crate::ctftime::CtftimeClient;
use crate::dispatch::Dispatcher;
use crate::utils::BotConfig;
use dotenv::dotenv;
use log::{error, info, warn};
use poise::serenity_prelude as serenity;
use poise::CreateReply;
use std::{env, io};

/// Shown when a command fails in a way the command itself did not report.
const GENERIC_ERROR: &str = "⚠️ An error occurred while processing the command.";

/* Poise-required data types: */

pub type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;
// User data:
pub struct Data {
    dispatcher: Dispatcher<CtftimeClient>,
    config: BotConfig,
}

async fn ready(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    _data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Ready { data_about_bot, .. } = event {
        info!(
            "{} is connected to {} guild(s).",
            data_about_bot.user.tag(),
            data_about_bot.guilds.len()
        );
        ctx.set_presence(
            Some(serenity::ActivityData::watching("CTFtime")),
            serenity::OnlineStatus::Online,
        );
    }

    Ok(())
}

/**
 * Last resort for the errors that commands did not turn into a reply themselves (mostly failures
 * to talk to Discord).
 */
async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Could not set up the bot: {}", error)
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Command `{}` failed: {}", ctx.command().name, error);
            report(ctx).await;
        }
        error => match error.ctx() {
            // Argument parsing, checks, panics...
            Some(ctx) => {
                error!("Command `{}` failed: {}", ctx.command().name, error);
                report(ctx).await;
            }
            None => {
                if let Err(e) = poise::builtins::on_error(error).await {
                    error!("Error while handling an error: {}", e);
                }
            }
        },
    }
}

async fn report(ctx: Context<'_>) {
    let reply = CreateReply::default()
        .content(GENERIC_ERROR)
        .ephemeral(true);
    if let Err(e) = ctx.send(reply).await {
        error!("Could not report the error to the user: {}", e);
    }
}

/**
 * Runs `ctfbot list [limit]`: prints the upcoming events and exits, without connecting to Discord.
 */
async fn list(config: &BotConfig, limit: Option<String>) -> io::Result<()> {
    let limit = match limit.map(|limit| limit.parse::<u8>()) {
        Some(Ok(limit)) => limit,
        Some(Err(e)) => {
            warn!("Invalid limit ({}), using {}.", e, listing::DEFAULT_LIMIT);
            listing::DEFAULT_LIMIT
        }
        None => listing::DEFAULT_LIMIT,
    };

    let client = CtftimeClient::from_config(config);
    listing::run(&client, limit, &mut io::stdout().lock()).await
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let config = utils::load_config().expect("Could not load the configuration.");
    utils::init_logging(&config).expect("Could not initialize the logger.");

    let mut args = env::args().skip(1);
    if args.next().as_deref() == Some("list") {
        list(&config, args.next())
            .await
            .expect("Could not write the event list.");
        return;
    }

    let token = env::var("DISCORD_TOKEN")
        .expect("Discord token not provided (in DISCORD_TOKEN environmental variable).");
    let intents = serenity::GatewayIntents::non_privileged();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            event_handler: |ctx, event, framwework, data| {
                Box::pin(ready(ctx, event, framwework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!(
                    "Registered {} commands.",
                    framework.options().commands.len()
                );

                let client = CtftimeClient::from_config(&config);
                Ok(Data {
                    dispatcher: Dispatcher::new(client, config.required_role.clone()),
                    config,
                })
            })
        })
        .build();

    info!("Starting the bot...");
    let mut client = serenity::Client::builder(token, intents)
        .framework(framework) // For command handling, using poise.
        .await
        .expect("Could not create the Discord bot client object.");

    client.start().await.expect("The Discord bot crashed.");
}
