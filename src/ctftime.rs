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
use crate::error::FetchError;
use crate::event::RawEvent;
use crate::fetch::Fetcher;
use crate::scrape::{self, TeamPage};
use crate::team::RawTeam;
use crate::utils::BotConfig;
use serenity::async_trait;

/// Read access to the CTFtime REST API.
#[async_trait]
pub trait CtfSource: Send + Sync {
    /// Events starting at or after `start` (UNIX seconds), at most `limit` of them.
    async fn upcoming_events(&self, limit: u8, start: i64) -> Result<Vec<RawEvent>, FetchError>;

    async fn event(&self, event_id: u64) -> Result<RawEvent, FetchError>;

    async fn team(&self, team_id: u64) -> Result<RawTeam, FetchError>;
}

/// Read access to the data only published on a team's HTML page.
#[async_trait]
pub trait TeamPageSource: Send + Sync {
    async fn team_page(&self, team_id: u64) -> Result<TeamPage, FetchError>;
}

/// CTFtime client backed by HTTP: JSON for the API, scraping for the team pages.
#[derive(Clone)]
pub struct CtftimeClient {
    fetcher: Fetcher,
    base_url: String,
}

impl CtftimeClient {
    pub fn new(fetcher: Fetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Client using the URL and `User-Agent` of the configuration.
    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(Fetcher::new(config.user_agent.clone()), config.api_url.clone())
    }

    pub fn upcoming_events_url(&self, limit: u8, start: i64) -> String {
        format!(
            "{}/api/v1/events/?limit={}&start={}",
            self.base_url, limit, start
        )
    }

    pub fn event_url(&self, event_id: u64) -> String {
        format!("{}/api/v1/events/{}/", self.base_url, event_id)
    }

    pub fn team_url(&self, team_id: u64) -> String {
        format!("{}/api/v1/teams/{}/", self.base_url, team_id)
    }

    pub fn team_page_url(&self, team_id: u64) -> String {
        format!("{}/team/{}/", self.base_url, team_id)
    }
}

#[async_trait]
impl CtfSource for CtftimeClient {
    async fn upcoming_events(&self, limit: u8, start: i64) -> Result<Vec<RawEvent>, FetchError> {
        self.fetcher
            .get_json(&self.upcoming_events_url(limit, start))
            .await
    }

    async fn event(&self, event_id: u64) -> Result<RawEvent, FetchError> {
        self.fetcher.get_json(&self.event_url(event_id)).await
    }

    async fn team(&self, team_id: u64) -> Result<RawTeam, FetchError> {
        self.fetcher.get_json(&self.team_url(team_id)).await
    }
}

#[async_trait]
impl TeamPageSource for CtftimeClient {
    async fn team_page(&self, team_id: u64) -> Result<TeamPage, FetchError> {
        let html = self.fetcher.get_text(&self.team_page_url(team_id)).await?;
        Ok(scrape::scrape_team_page(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_ctftime_urls() {
        let client = CtftimeClient::new(Fetcher::new("test-agent"), "https://ctftime.org/");

        assert_eq!(
            client.upcoming_events_url(5, 1748736000),
            "https://ctftime.org/api/v1/events/?limit=5&start=1748736000"
        );
        assert_eq!(
            client.event_url(2771),
            "https://ctftime.org/api/v1/events/2771/"
        );
        assert_eq!(
            client.team_url(370924),
            "https://ctftime.org/api/v1/teams/370924/"
        );
        assert_eq!(
            client.team_page_url(370924),
            "https://ctftime.org/team/370924/"
        );
    }

    #[test]
    fn default_config_points_to_ctftime() {
        let client = CtftimeClient::from_config(&BotConfig::default());
        assert_eq!(client.event_url(1), "https://ctftime.org/api/v1/events/1/");
    }
}
