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
use crate::event::{text_or, NOT_AVAILABLE, NO_DESCRIPTION};
use crate::scrape::{PlannedEvent, TeamPage};
use getset::Getters;
use serde::Deserialize;

/// A team object, as returned by `/api/v1/teams/{id}/`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawTeam {
    pub name: Option<String>,
    pub country: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub aliases: Option<Vec<String>>,
}

/// Data structure describing a CTFtime team: what the API returns, plus the roster and planned
/// events scraped from the team's page.
#[cfg_attr(test, derive(Debug))]
#[derive(Clone, PartialEq, Getters)]
pub struct TeamProfile {
    #[getset(get = "pub")]
    name: String,
    /// Country code, as chosen by the team (may be `N/A`).
    #[getset(get = "pub")]
    country: String,
    #[getset(get = "pub")]
    logo: Option<String>,
    #[getset(get = "pub")]
    description: String,
    #[getset(get = "pub")]
    website: String,
    /// Previous names of the team.
    #[getset(get = "pub")]
    aliases: Vec<String>,
    #[getset(get = "pub")]
    members: Vec<String>,
    #[getset(get = "pub")]
    planned_events: Vec<PlannedEvent>,
}

impl TeamProfile {
    /// Merges the API record with the scraped team page.
    pub fn from_record(raw: RawTeam, page: TeamPage) -> Self {
        Self {
            name: text_or(raw.name, NOT_AVAILABLE),
            country: text_or(raw.country, NOT_AVAILABLE),
            logo: raw.logo.filter(|logo| !logo.trim().is_empty()),
            description: text_or(raw.description, NO_DESCRIPTION),
            website: text_or(raw.website, NOT_AVAILABLE),
            aliases: raw
                .aliases
                .unwrap_or_default()
                .into_iter()
                .filter(|alias| !alias.trim().is_empty())
                .collect(),
            members: page.members,
            planned_events: page.planned_events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_record_and_page() {
        let raw: RawTeam = serde_json::from_str(
            r#"{"id": 370924, "name": "Team Rocket", "country": "FR", "logo": "https://ctftime.org/media/team/logo.png",
                "aliases": ["Rockets", "TR"], "academic": false, "rating": {}}"#,
        )
        .unwrap();
        let page = TeamPage {
            members: vec![String::from("alice")],
            planned_events: vec![PlannedEvent {
                name: String::from("FooCTF"),
                date: String::from("June 1, 2025"),
            }],
        };

        let team = TeamProfile::from_record(raw, page.clone());

        assert_eq!(team.name(), "Team Rocket");
        assert_eq!(team.country(), "FR");
        assert_eq!(
            team.logo().as_deref(),
            Some("https://ctftime.org/media/team/logo.png")
        );
        assert_eq!(team.description(), NO_DESCRIPTION);
        assert_eq!(team.website(), NOT_AVAILABLE);
        assert_eq!(team.aliases(), &vec![String::from("Rockets"), String::from("TR")]);
        assert_eq!(team.members(), &page.members);
        assert_eq!(team.planned_events(), &page.planned_events);
    }

    #[test]
    fn empty_record_takes_placeholders() {
        let team = TeamProfile::from_record(RawTeam::default(), TeamPage::default());

        assert_eq!(team.name(), NOT_AVAILABLE);
        assert_eq!(team.country(), NOT_AVAILABLE);
        assert_eq!(team.logo(), &None);
        assert_eq!(team.website(), NOT_AVAILABLE);
        assert!(team.aliases().is_empty());
        assert!(team.members().is_empty());
        assert!(team.planned_events().is_empty());
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let raw: RawTeam = serde_json::from_str(
            r#"{"name": "x", "country": "", "logo": "", "website": " ", "aliases": ["", "TR", "  "]}"#,
        )
        .unwrap();
        let team = TeamProfile::from_record(raw, TeamPage::default());

        assert_eq!(team.country(), NOT_AVAILABLE);
        assert_eq!(team.logo(), &None);
        assert_eq!(team.website(), NOT_AVAILABLE);
        assert_eq!(team.aliases(), &vec![String::from("TR")]);
    }
}
