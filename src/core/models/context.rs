//! Campus/session context and detail-page deep links

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default academic session when nothing else is configured
pub const DEFAULT_SESSION: &str = "2023W";

/// Campus whose datasets are active
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Campus {
    /// Main campus (token `v`)
    #[default]
    Main,
    /// Satellite campus (token `o`)
    Satellite,
}

impl Campus {
    /// Short token used in deep links and stored preferences
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Main => "v",
            Self::Satellite => "o",
        }
    }

    /// Display name, e.g. `UBCV`
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Main => "UBCV",
            Self::Satellite => "UBCO",
        }
    }
}

impl FromStr for Campus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v" | "main" | "ubcv" => Ok(Self::Main),
            "o" | "satellite" | "ubco" => Ok(Self::Satellite),
            _ => Err(format!("Unknown campus: '{s}' (expected v or o)")),
        }
    }
}

impl fmt::Display for Campus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Academic session token such as `2023W` (winter) or `2023S` (summer)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Session(String);

impl Session {
    /// The session token
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Session {
    fn default() -> Self {
        Self(DEFAULT_SESSION.to_string())
    }
}

impl FromStr for Session {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_uppercase();
        let bytes = token.as_bytes();
        let valid = bytes.len() == 5
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && matches!(bytes[4], b'W' | b'S');
        if valid {
            Ok(Self(token))
        } else {
            Err(format!("Invalid session: '{s}' (expected e.g. 2023W or 2023S)"))
        }
    }
}

impl TryFrom<String> for Session {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Session> for String {
    fn from(session: Session) -> Self {
        session.0
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The active (campus, session) pair.
///
/// Datasets are scoped by this pair, so it doubles as the memoization key of
/// the data service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Context {
    /// Active campus
    pub campus: Campus,
    /// Active session
    pub session: Session,
}

impl Context {
    /// Create a new context
    #[must_use]
    pub const fn new(campus: Campus, session: Session) -> Self {
        Self { campus, session }
    }

    /// Same campus, different session
    #[must_use]
    pub fn with_session(&self, session: Session) -> Self {
        Self {
            campus: self.campus,
            session,
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.campus, self.session)
    }
}

/// A deep link into a course detail page: `code=…&campus=…&session=…`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailQuery {
    /// Course code, e.g. `CPSC 110`
    pub code: String,
    /// Campus the code belongs to
    pub campus: Campus,
    /// Session to show; `None` means the default session
    pub session: Option<Session>,
}

impl DetailQuery {
    /// Create a query for a course in a specific context
    #[must_use]
    pub fn for_course(code: &str, context: &Context) -> Self {
        Self {
            code: code.to_string(),
            campus: context.campus,
            session: Some(context.session.clone()),
        }
    }

    /// Parse a query string (with or without a leading `?`).
    ///
    /// # Errors
    /// Returns an error when `code` or `campus` is missing, or when a value
    /// cannot be decoded or parsed.
    pub fn parse(query: &str) -> Result<Self, String> {
        let mut code = None;
        let mut campus = None;
        let mut session = None;

        for pair in query.trim_start_matches('?').split('&') {
            let Some((name, raw)) = pair.split_once('=') else {
                continue;
            };
            let value = urlencoding::decode(&raw.replace('+', " "))
                .map_err(|e| format!("Invalid encoding for '{name}': {e}"))?
                .into_owned();
            match name {
                "code" if !value.trim().is_empty() => code = Some(value.trim().to_string()),
                "campus" => campus = Some(value.parse::<Campus>()?),
                "session" if !value.is_empty() => session = Some(value.parse::<Session>()?),
                _ => {}
            }
        }

        Ok(Self {
            code: code.ok_or("Missing 'code' parameter")?,
            campus: campus.ok_or("Missing 'campus' parameter")?,
            session,
        })
    }

    /// Render as a query string (no leading `?`)
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut query = format!(
            "code={}&campus={}",
            urlencoding::encode(&self.code),
            self.campus.token()
        );
        if let Some(session) = &self.session {
            query.push_str("&session=");
            query.push_str(session.as_str());
        }
        query
    }

    /// The context this query resolves to, falling back to `default_session`
    #[must_use]
    pub fn context(&self, default_session: &Session) -> Context {
        Context::new(
            self.campus,
            self.session.clone().unwrap_or_else(|| default_session.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campus_tokens() {
        assert_eq!("v".parse::<Campus>().unwrap(), Campus::Main);
        assert_eq!("O".parse::<Campus>().unwrap(), Campus::Satellite);
        assert_eq!("ubcv".parse::<Campus>().unwrap(), Campus::Main);
        assert!("x".parse::<Campus>().is_err());
    }

    #[test]
    fn test_session_validation() {
        let session: Session = "2022s".parse().unwrap();
        assert_eq!(session.as_str(), "2022S");
        assert!("2022".parse::<Session>().is_err());
        assert!("2022X".parse::<Session>().is_err());
        assert!("W2022".parse::<Session>().is_err());
    }

    #[test]
    fn test_detail_query_roundtrip_encoding() {
        let context = Context::new(Campus::Main, "2023W".parse().unwrap());
        let query = DetailQuery::for_course("CPSC 110", &context);
        let text = query.to_query_string();
        assert_eq!(text, "code=CPSC%20110&campus=v&session=2023W");
        assert_eq!(DetailQuery::parse(&text).unwrap(), query);
    }

    #[test]
    fn test_detail_query_plus_and_missing_session() {
        let query = DetailQuery::parse("?code=MATH+100&campus=o").unwrap();
        assert_eq!(query.code, "MATH 100");
        assert_eq!(query.campus, Campus::Satellite);
        assert!(query.session.is_none());

        let context = query.context(&Session::default());
        assert_eq!(context.session.as_str(), DEFAULT_SESSION);
    }

    #[test]
    fn test_detail_query_requires_code_and_campus() {
        assert!(DetailQuery::parse("campus=v").is_err());
        assert!(DetailQuery::parse("code=CPSC%20110").is_err());
        assert!(DetailQuery::parse("code=&campus=v").is_err());
    }
}
