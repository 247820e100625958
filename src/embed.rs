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
use crate::event::EventSummary;
use crate::team::TeamProfile;
use poise::serenity_prelude as serenity;

/// Discord's "blue" preset.
pub const EMBED_COLOR: u32 = 0x3498DB;
pub const FOOTER: &str = "Data provided by CTFtime.org";
/// Shown in place of an empty list.
pub const NONE: &str = "None";

// Discord embed limits, in characters.
const TITLE_LIMIT: usize = 256;
const DESCRIPTION_LIMIT: usize = 4096;
const FIELD_NAME_LIMIT: usize = 256;
const FIELD_VALUE_LIMIT: usize = 1024;
/// Title, description, field names and values and footer, all together.
const TOTAL_LIMIT: usize = 6000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/**
 * Platform-independent description of an embed. Built by the `render_*` functions, and turned
 * into a serenity embed only when it is sent.
 */
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayMessage {
    pub title: String,
    pub url: Option<String>,
    pub description: String,
    pub color: u32,
    pub thumbnail: Option<String>,
    pub fields: Vec<EmbedField>,
    pub footer: String,
}

impl DisplayMessage {
    fn new(title: &str, description: &str) -> Self {
        Self {
            title: truncate(title, TITLE_LIMIT),
            url: None,
            description: truncate(description, DESCRIPTION_LIMIT),
            color: EMBED_COLOR,
            thumbnail: None,
            fields: Vec::new(),
            footer: String::from(FOOTER),
        }
    }

    fn url(mut self, url: &str) -> Self {
        self.url = web_url(url);
        self
    }

    fn thumbnail(mut self, logo: Option<&String>) -> Self {
        self.thumbnail = logo.and_then(|logo| web_url(logo));
        self
    }

    fn field(mut self, name: &str, value: &str, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: truncate(name, FIELD_NAME_LIMIT),
            value: truncate(value, FIELD_VALUE_LIMIT),
            inline,
        });
        self
    }

    /// Characters counted by Discord against [`TOTAL_LIMIT`].
    pub fn total_len(&self) -> usize {
        self.title.chars().count()
            + self.description.chars().count()
            + self.footer.chars().count()
            + self
                .fields
                .iter()
                .map(|field| field.name.chars().count() + field.value.chars().count())
                .sum::<usize>()
    }

    /**
     * Shortens the message until it fits in a single embed. The description gives way first, then
     * the field values, starting with the last one.
     */
    fn fit(mut self) -> Self {
        let excess = self.total_len().saturating_sub(TOTAL_LIMIT);
        if excess == 0 {
            return self;
        }

        let description_len = self.description.chars().count();
        let keep = description_len.saturating_sub(excess).max(1);
        if keep < description_len {
            self.description = truncate(&self.description, keep);
        }

        let mut excess = self.total_len().saturating_sub(TOTAL_LIMIT);
        for field in self.fields.iter_mut().rev() {
            if excess == 0 {
                break;
            }
            let value_len = field.value.chars().count();
            let keep = value_len.saturating_sub(excess).max(1);
            if keep < value_len {
                field.value = truncate(&field.value, keep);
                excess -= value_len - keep;
            }
        }

        self
    }

    /// Converts the message into a serenity embed.
    pub fn to_embed(&self) -> serenity::CreateEmbed {
        let mut embed = serenity::CreateEmbed::new()
            .title(&self.title)
            .description(&self.description)
            .color(self.color)
            .footer(serenity::CreateEmbedFooter::new(&self.footer));

        if let Some(url) = &self.url {
            embed = embed.url(url);
        }
        if let Some(thumbnail) = &self.thumbnail {
            embed = embed.thumbnail(thumbnail);
        }
        for field in &self.fields {
            embed = embed.field(&field.name, &field.value, field.inline);
        }

        embed
    }
}

/// One message listing every event, one field each.
pub fn render_upcoming(events: &[EventSummary]) -> DisplayMessage {
    events
        .iter()
        .fold(
            DisplayMessage::new(
                "Upcoming CTF Events",
                "Here are the upcoming CTF competitions from CTFtime:",
            ),
            |message, event| {
                message.field(
                    &format!("🔹 [{}]({})", event.title(), event.url()),
                    &format!(
                        "**Start:** {}\n**End:** {}",
                        event.start_token(),
                        event.finish_token()
                    ),
                    false,
                )
            },
        )
        .fit()
}

/// Announcement of a single event.
pub fn render_event(event: &EventSummary) -> DisplayMessage {
    DisplayMessage::new(event.title(), event.description())
        .url(event.url())
        .thumbnail(event.logo().as_ref())
        .field("Start Time", &event.start_token(), true)
        .field("Finish Time", &event.finish_token(), true)
        .field("Duration", &event.duration().to_string(), true)
        .field("Format", event.format(), true)
        .field("Location", event.location(), true)
        .fit()
}

pub fn render_team(team: &TeamProfile) -> DisplayMessage {
    let planned: Vec<String> = team
        .planned_events()
        .iter()
        .map(|event| format!("{} - {}", event.name, event.date))
        .collect();

    DisplayMessage::new(team.name(), team.description())
        .thumbnail(team.logo().as_ref())
        .field("Country", team.country(), true)
        .field("Website", team.website(), true)
        .field("Aliases", &join_or_none(team.aliases(), ", "), false)
        .field("Current Members", &join_or_none(team.members(), ", "), false)
        .field(
            "Planned CTF Participation",
            &join_or_none(&planned, "\n"),
            false,
        )
        .fit()
}

/// Joins the items, or `None` if that leaves nothing to show (Discord rejects empty values).
fn join_or_none(items: &[String], separator: &str) -> String {
    let joined = items.join(separator);
    if joined.trim().is_empty() {
        String::from(NONE)
    } else {
        joined
    }
}

/// Only absolute web URLs are accepted by Discord in embeds.
fn web_url(url: &str) -> Option<String> {
    (url.starts_with("https://") || url.starts_with("http://")).then(|| url.to_owned())
}

/// Cuts `text` to at most `limit` characters, marking the cut with an ellipsis.
fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(limit.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RawEvent;
    use crate::scrape::{PlannedEvent, TeamPage};
    use crate::team::RawTeam;

    fn event(json: &str) -> EventSummary {
        let raw: RawEvent = serde_json::from_str(json).unwrap();
        EventSummary::from_record(raw).unwrap()
    }

    const FOO_CTF: &str = r#"{"title":"FooCTF","start":"2025-06-01T00:00:00+00:00","finish":"2025-06-02T00:00:00+00:00","url":"http://x","onsite":false,"location":"Paris"}"#;

    #[test]
    fn upcoming_lists_one_field_per_event() {
        let events = vec![event(FOO_CTF), event(r#"{"title":"BarCTF"}"#)];
        let message = render_upcoming(&events);

        assert_eq!(message.title, "Upcoming CTF Events");
        assert_eq!(message.footer, FOOTER);
        assert_eq!(message.color, EMBED_COLOR);
        assert_eq!(
            message.fields,
            vec![
                EmbedField {
                    name: String::from("🔹 [FooCTF](http://x)"),
                    value: String::from("**Start:** <t:1748736000:F>\n**End:** <t:1748822400:F>"),
                    inline: false,
                },
                EmbedField {
                    name: String::from("🔹 [BarCTF](N/A)"),
                    value: String::from("**Start:** N/A\n**End:** N/A"),
                    inline: false,
                },
            ]
        );
    }

    #[test]
    fn event_announcement_fields() {
        let message = render_event(&event(FOO_CTF));

        assert_eq!(message.title, "FooCTF");
        assert_eq!(message.url.as_deref(), Some("http://x"));
        assert_eq!(message.description, "No description available.");
        assert_eq!(message.thumbnail, None);

        let fields: Vec<(&str, &str, bool)> = message
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.value.as_str(), f.inline))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("Start Time", "<t:1748736000:F>", true),
                ("Finish Time", "<t:1748822400:F>", true),
                ("Duration", "0d 0h 0m", true),
                ("Format", "N/A", true),
                ("Location", "Online", true),
            ]
        );
    }

    #[test]
    fn placeholder_urls_are_not_linked() {
        let message = render_event(&event(r#"{"title":"NoSite","logo":"/media/logo.png"}"#));
        assert_eq!(message.url, None);
        assert_eq!(message.thumbnail, None);
    }

    #[test]
    fn rendering_is_deterministic() {
        let summary = event(FOO_CTF);
        assert_eq!(render_event(&summary), render_event(&summary));
        assert_eq!(
            render_upcoming(std::slice::from_ref(&summary)),
            render_upcoming(std::slice::from_ref(&summary))
        );
    }

    #[test]
    fn team_lists_are_joined() {
        let raw: RawTeam = serde_json::from_str(
            r#"{"name":"Team Rocket","country":"FR","logo":"https://ctftime.org/logo.png","aliases":["Rockets","TR"]}"#,
        )
        .unwrap();
        let page = TeamPage {
            members: vec![String::from("alice"), String::from("bob")],
            planned_events: vec![
                PlannedEvent {
                    name: String::from("FooCTF"),
                    date: String::from("June 1"),
                },
                PlannedEvent {
                    name: String::from("BarCTF"),
                    date: String::from("June 8"),
                },
            ],
        };
        let message = render_team(&TeamProfile::from_record(raw, page));

        assert_eq!(message.title, "Team Rocket");
        assert_eq!(message.thumbnail.as_deref(), Some("https://ctftime.org/logo.png"));
        let values: Vec<&str> = message.fields.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(
            values,
            vec![
                "FR",
                "N/A",
                "Rockets, TR",
                "alice, bob",
                "FooCTF - June 1\nBarCTF - June 8"
            ]
        );
    }

    #[test]
    fn empty_team_lists_show_none() {
        let message = render_team(&TeamProfile::from_record(
            RawTeam::default(),
            TeamPage::default(),
        ));
        let values: Vec<&str> = message.fields.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, vec!["N/A", "N/A", NONE, NONE, NONE]);
    }

    #[test]
    fn long_values_are_truncated() {
        let members: Vec<String> = (0..500).map(|i| format!("member{i}")).collect();
        let page = TeamPage {
            members,
            planned_events: Vec::new(),
        };
        let message = render_team(&TeamProfile::from_record(RawTeam::default(), page));

        let roster = &message.fields[3].value;
        assert_eq!(roster.chars().count(), FIELD_VALUE_LIMIT);
        assert!(roster.ends_with('…'));
    }

    #[test]
    fn large_team_fits_in_one_embed() {
        let raw = RawTeam {
            name: Some(String::from("Team Rocket")),
            description: Some("x".repeat(3500)),
            aliases: Some((0..200).map(|i| format!("alias{i}")).collect()),
            ..RawTeam::default()
        };
        let page = TeamPage {
            members: (0..300).map(|i| format!("member{i}")).collect(),
            planned_events: (0..60)
                .map(|i| PlannedEvent {
                    name: format!("Some CTF {i}"),
                    date: String::from("June 1, 2025 12:00 UTC"),
                })
                .collect(),
        };
        let message = render_team(&TeamProfile::from_record(raw, page));

        let total: usize = message.title.chars().count()
            + message.description.chars().count()
            + message.footer.chars().count()
            + message
                .fields
                .iter()
                .map(|f| f.name.chars().count() + f.value.chars().count())
                .sum::<usize>();
        assert!(total <= 6000, "{total} characters");
        assert_eq!(total, message.total_len());
        // The description is shortened, the fields are kept.
        assert!(message.description.ends_with('…'));
        assert_eq!(message.fields[0].value, "N/A");
        assert!(message.fields[2].value.starts_with("alias0, alias1"));
        assert_eq!(message.fields[3].value.chars().count(), FIELD_VALUE_LIMIT);
    }

    #[test]
    fn small_messages_are_left_alone() {
        let message = render_event(&event(FOO_CTF));
        assert_eq!(message.description, "No description available.");
        assert!(message.total_len() < TOTAL_LIMIT);
    }

    #[test]
    fn blank_aliases_show_none() {
        let raw: RawTeam = serde_json::from_str(r#"{"name":"Team Rocket","aliases":[""]}"#).unwrap();
        let message = render_team(&TeamProfile::from_record(raw, TeamPage::default()));
        assert_eq!(message.fields[2].value, NONE);
        assert_eq!(join_or_none(&[String::from(" ")], ", "), NONE);
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("héllo", 5), "héllo");
        assert_eq!(truncate("héllo wörld", 6), "héllo…");
    }
}
