//! Request path parser
//!
//! Decomposes `/<prefix>/<control>/<presence>` into a control and a pressed
//! flag. Empty segments are skipped, so `//x///a` reads the same as `/x/a`.

use crate::catalog::{self, Control};
use thiserror::Error;

/// A parsed control request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandRequest {
    pub control: Control,
    pub pressed: bool,
}

/// Why a path did not name a control
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("no control named in path")]
    MissingControl,
    #[error("unknown control \"{0}\"")]
    UnknownControl(String),
}

/// Parse a request path
///
/// The first segment is a route prefix and is ignored. The optional third
/// segment is read like C `atoi`: it releases the control when its leading
/// integer is zero, including when it has no leading digits at all.
pub fn parse(path: &str) -> Result<CommandRequest, ParseFailure> {
    let mut segments = path.split('/').filter(|s| !s.is_empty());

    // route prefix
    segments.next();

    let name = segments.next().ok_or(ParseFailure::MissingControl)?;
    let control =
        catalog::lookup(name).ok_or_else(|| ParseFailure::UnknownControl(name.to_string()))?;

    let pressed = segments
        .next()
        .map_or(true, |presence| leading_int(presence) != 0);

    Ok(CommandRequest { control, pressed })
}

/// Leading integer of `segment`, 0 when there are no digits
fn leading_int(segment: &str) -> i64 {
    let s = segment.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Button, Direction};

    fn req(control: Control, pressed: bool) -> CommandRequest {
        CommandRequest { control, pressed }
    }

    #[test]
    fn test_explicit_press() {
        assert_eq!(parse("/x/a/1"), Ok(req(Control::Button(Button::A), true)));
    }

    #[test]
    fn test_explicit_release() {
        assert_eq!(parse("/x/a/0"), Ok(req(Control::Button(Button::A), false)));
    }

    #[test]
    fn test_missing_presence_defaults_to_pressed() {
        assert_eq!(parse("/x/a"), Ok(req(Control::Button(Button::A), true)));
        assert_eq!(parse("/x/a/"), Ok(req(Control::Button(Button::A), true)));
    }

    #[test]
    fn test_unknown_control() {
        assert_eq!(
            parse("/x/unknown/1"),
            Err(ParseFailure::UnknownControl("unknown".to_string()))
        );
    }

    #[test]
    fn test_missing_control() {
        assert_eq!(parse("/x"), Err(ParseFailure::MissingControl));
        assert_eq!(parse("/"), Err(ParseFailure::MissingControl));
        assert_eq!(parse(""), Err(ParseFailure::MissingControl));
    }

    #[test]
    fn test_non_zero_values_press() {
        for presence in ["1", "2", "-1", "12abc", " 7", "+3"] {
            let path = format!("/pad/up/{presence}");
            assert!(parse(&path).unwrap().pressed, "{presence} should press");
        }
    }

    #[test]
    fn test_zero_spellings_release() {
        for presence in ["0", "00", "-0", "+0", "0abc"] {
            let path = format!("/pad/left/{presence}");
            let parsed = parse(&path).unwrap();
            assert_eq!(parsed.control, Control::Direction(Direction::Left));
            assert!(!parsed.pressed, "{presence} should release");
        }
    }

    #[test]
    fn test_text_without_digits_releases() {
        for presence in ["off", "false", "no", "yes", "true", "-"] {
            let path = format!("/pad/a/{presence}");
            assert!(!parse(&path).unwrap().pressed, "{presence} should release");
        }
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("42"), 42);
        assert_eq!(leading_int("  -8x"), -8);
        assert_eq!(leading_int("abc"), 0);
        assert_eq!(leading_int("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn test_extra_segments_ignored() {
        assert_eq!(
            parse("/pad/start/0/extra"),
            Ok(req(Control::Button(Button::Start), false))
        );
    }

    #[test]
    fn test_repeated_separators_collapse() {
        assert_eq!(
            parse("//pad///select"),
            Ok(req(Control::Button(Button::Select), true))
        );
    }

    #[test]
    fn test_case_sensitive() {
        assert!(parse("/pad/Start/1").is_err());
    }
}
