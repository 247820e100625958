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

/// Errors raised while talking to CTFtime.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// The request could not be sent (DNS, TLS, connection reset...).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// CTFtime answered with a non-2xx status.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// The body is not JSON of the expected shape.
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
}

/// Errors raised while turning an upstream record into a display structure.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("invalid timestamp {value:?} in field `{field}`: {source}")]
    Timestamp {
        field: &'static str,
        value: String,
        source: chrono::ParseError,
    },
}

/// Everything that can stop a command before its result is rendered.
#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The caller does not hold the role configured for administrative commands.
    #[error("missing required role `{role}`")]
    PermissionDenied { role: String },

    /// The command was used outside of a guild.
    #[error("command used outside of a guild")]
    GuildOnly,
}

impl CommandError {
    /// Whether the error comes from an upstream answer we could not understand, as opposed to a
    /// request that failed.
    pub fn is_schema(&self) -> bool {
        matches!(
            self,
            CommandError::Fetch(FetchError::Decode { .. }) | CommandError::Parse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_and_parse_errors_are_schema_errors() {
        let decode = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err = CommandError::from(FetchError::Decode {
            url: String::from("https://ctftime.org/api/v1/teams/1/"),
            source: decode,
        });
        assert!(err.is_schema());

        let date = chrono::DateTime::parse_from_rfc3339("yesterday").unwrap_err();
        let err = CommandError::from(ParseError::Timestamp {
            field: "start",
            value: String::from("yesterday"),
            source: date,
        });
        assert!(err.is_schema());
    }

    #[test]
    fn status_errors_are_not_schema_errors() {
        let err = CommandError::from(FetchError::UnexpectedStatus {
            url: String::from("https://ctftime.org/api/v1/teams/1/"),
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        });
        assert!(!err.is_schema());
        assert_eq!(
            err.to_string(),
            "unexpected status 500 Internal Server Error for https://ctftime.org/api/v1/teams/1/"
        );
    }
}
