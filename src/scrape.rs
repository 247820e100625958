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
/*
 * Extraction of the team data that the CTFtime API does not expose, from the public team page.
 * Both sections are optional on the page: when a section cannot be found, its list is empty.
 */

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

macro_rules! selector {
    ($query:expr) => {{
        static SELECTOR: Lazy<Selector> =
            Lazy::new(|| Selector::parse($query).expect("invalid static selector"));
        &SELECTOR
    }};
}

/// Heading that introduces the table of events the team registered for.
pub const PLANNED_EVENTS_HEADING: &str = "Plan to participate in CTF events";

/// An upcoming event a team plans to play.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlannedEvent {
    pub name: String,
    pub date: String,
}

/// Everything scraped from a team page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TeamPage {
    /// One entry per row of the roster table, in page order.
    pub members: Vec<String>,
    pub planned_events: Vec<PlannedEvent>,
}

/// Scrapes the member roster and the planned participations from a team page.
pub fn scrape_team_page(html: &str) -> TeamPage {
    let document = Html::parse_document(html);

    TeamPage {
        members: scrape_members(&document),
        planned_events: scrape_planned_events(&document),
    }
}

fn scrape_members(document: &Html) -> Vec<String> {
    let Some(section) = document.select(selector!("div#recent_members")).next() else {
        return Vec::new();
    };
    let Some(table) = section
        .select(selector!("table.table.table-striped"))
        .next()
    else {
        return Vec::new();
    };

    // The whole row is one member; cells are not split. Rows without text (spacers, and the
    // empty header of some layouts) are dropped, since Discord would show them as blank names.
    table
        .select(selector!("tr"))
        .map(|row| stripped_text(&row))
        .filter(|text| !text.is_empty())
        .collect()
}

fn scrape_planned_events(document: &Html) -> Vec<PlannedEvent> {
    let Some(heading) = document
        .select(selector!("h3"))
        .find(|h3| h3.text().collect::<String>().trim() == PLANNED_EVENTS_HEADING)
    else {
        return Vec::new();
    };
    let Some(table) = next_table(document, heading) else {
        return Vec::new();
    };

    table
        .select(selector!("tr"))
        .skip(1) // Header.
        .filter_map(|row| {
            let cells: Vec<ElementRef> = row.select(selector!("td")).collect();
            match cells.as_slice() {
                [name, date] => Some(PlannedEvent {
                    name: stripped_text(name),
                    date: stripped_text(date),
                }),
                _ => None,
            }
        })
        .collect()
}

/// First striped table that comes after `heading` in document order.
fn next_table<'a>(document: &'a Html, heading: ElementRef<'a>) -> Option<ElementRef<'a>> {
    document
        .root_element()
        .descendants()
        .skip_while(|node| node.id() != heading.id())
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|element| selector!("table.table.table-striped").matches(element))
}

/// Concatenates the trimmed, non-empty text nodes of an element.
fn stripped_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEAM_PAGE: &str = r#"
        <html><body>
        <div class="container">
          <h2>Team Rocket</h2>
          <div id="recent_members">
            <table class="table table-striped">
              <tr><td><a href="/user/1">alice</a></td></tr>
              <tr><td><a href="/user/2">bob</a></td><td> (captain) </td></tr>
              <tr><td>   </td></tr>
            </table>
          </div>
          <h3>Plan to participate in CTF events</h3>
          <p>Some unrelated paragraph.</p>
          <table class="table table-striped">
            <tr><th>Event</th><th>Date</th></tr>
            <tr><td><a href="/event/1">FooCTF 2025</a></td><td>June 1, 2025</td></tr>
            <tr><td>Broken row</td></tr>
            <tr><td>BarCTF</td><td>June 8, 2025</td><td>extra</td></tr>
            <tr><td> BazCTF </td><td> June 15, 2025 </td></tr>
          </table>
        </div>
        </body></html>
    "#;

    #[test]
    fn scrapes_members_one_per_row() {
        let page = scrape_team_page(TEAM_PAGE);
        assert_eq!(page.members, vec!["alice", "bob(captain)"]);
    }

    #[test]
    fn keeps_only_two_cell_rows_in_order() {
        let page = scrape_team_page(TEAM_PAGE);
        assert_eq!(
            page.planned_events,
            vec![
                PlannedEvent {
                    name: String::from("FooCTF 2025"),
                    date: String::from("June 1, 2025"),
                },
                PlannedEvent {
                    name: String::from("BazCTF"),
                    date: String::from("June 15, 2025"),
                },
            ]
        );
    }

    #[test]
    fn missing_heading_yields_no_planned_events() {
        let html = r#"
            <div id="recent_members">
              <table class="table table-striped"><tr><td>alice</td></tr></table>
            </div>
            <table class="table table-striped">
              <tr><th>Event</th><th>Date</th></tr>
              <tr><td>FooCTF</td><td>June 1, 2025</td></tr>
            </table>
        "#;
        let page = scrape_team_page(html);
        assert_eq!(page.members, vec!["alice"]);
        assert!(page.planned_events.is_empty());
    }

    #[test]
    fn tables_before_the_heading_are_ignored() {
        let html = r#"
            <table class="table table-striped">
              <tr><th>Event</th><th>Date</th></tr>
              <tr><td>Old CTF</td><td>2019</td></tr>
            </table>
            <h3>Plan to participate in CTF events</h3>
            <table class="table table-striped">
              <tr><th>Event</th><th>Date</th></tr>
              <tr><td>New CTF</td><td>2025</td></tr>
            </table>
        "#;
        let page = scrape_team_page(html);
        assert_eq!(page.planned_events.len(), 1);
        assert_eq!(page.planned_events[0].name, "New CTF");
    }

    #[test]
    fn page_without_sections_is_empty() {
        let page = scrape_team_page("<html><body><p>Team not found</p></body></html>");
        assert_eq!(page, TeamPage::default());
    }

    #[test]
    fn members_section_without_table_is_empty() {
        let page = scrape_team_page(r#"<div id="recent_members"><p>alice</p></div>"#);
        assert!(page.members.is_empty());
    }
}
