//! Share link and message formatting.
//!
//! Pure string builders; the QR renderer and messaging integrations
//! consume these outputs elsewhere.

use crate::token::{JoinToken, TOKEN_TTL_HOURS};
use scorebook_core::Group;

/// Build a join URL: `<origin>/?join=<opaque-token>`.
pub fn build_join_link(origin: &str, group: &Group) -> String {
    let token = JoinToken::issue(group).encode();
    format!("{}/?join={}", origin.trim_end_matches('/'), token)
}

/// Extract the opaque token from a join URL, if one is present.
pub fn parse_join_link(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("?join=")?;
    let token = rest.split('&').next()?;
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Build a shareable invitation message including the manual code.
pub fn build_share_message(origin: &str, group: &Group) -> String {
    format!(
        "Join {} on Scorebook!\n{}\nOr enter the code {} by hand. \
         The link expires in {} hours.",
        group.name,
        build_join_link(origin, group),
        group.invite_code,
        TOKEN_TTL_HOURS
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorebook_core::{InviteCode, UserId};

    fn group() -> Group {
        Group::new(
            "g-1",
            "Northside CC",
            UserId::new("u-1"),
            InviteCode::new("AB12CD"),
        )
    }

    #[test]
    fn test_link_round_trips_through_decode() {
        let group = group();
        let link = build_join_link("https://scorebook.example", &group);
        assert!(link.starts_with("https://scorebook.example/?join="));

        let token = parse_join_link(&link).unwrap();
        let decoded = JoinToken::decode(token).unwrap();
        assert_eq!(decoded.group_id, group.id);
        assert_eq!(decoded.invite_code, group.invite_code);
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let link = build_join_link("https://scorebook.example/", &group());
        assert!(!link.contains("//?join="));
    }

    #[test]
    fn test_parse_rejects_urls_without_token() {
        assert!(parse_join_link("https://scorebook.example/").is_none());
        assert!(parse_join_link("https://scorebook.example/?join=").is_none());
    }

    #[test]
    fn test_parse_stops_at_next_query_param() {
        let link = format!("{}&utm=share", build_join_link("https://x.example", &group()));
        let token = parse_join_link(&link).unwrap();
        assert!(JoinToken::decode(token).is_ok());
    }

    #[test]
    fn test_share_message_carries_the_code() {
        let message = build_share_message("https://scorebook.example", &group());
        assert!(message.contains("AB12CD"));
        assert!(message.contains("?join="));
        assert!(message.contains("24 hours"));
    }
}
