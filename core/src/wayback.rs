use crate::timestamp::Timestamp;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use url::Url;

pub const DEFAULT_ROOT: &str = "http://web.archive.org";

const WEB_PATH: &str = "/web/";
const SAVE_PATH: &str = "/save/";

const WAYBACK_URL_PATTERN: &str =
    r"^http(:?s)?://web(?:-beta)?\.archive\.org/web/(?P<timestamp>\d{14})(?:id_)?/(?P<url>.+)$";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid URL: {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unexpected Wayback Machine URL: {0}")]
    UnexpectedUrl(String),
    #[error("Invalid timestamp")]
    InvalidTimestamp(#[from] crate::timestamp::Error),
}

/// One of the host prefixes that identify a link as already pointing into the
/// Wayback Machine.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaybackHost {
    Http,
    HttpBeta,
    Https,
    HttpsBeta,
}

impl WaybackHost {
    pub const ALL: [Self; 4] = [Self::Http, Self::HttpBeta, Self::Https, Self::HttpsBeta];

    pub fn prefix(self) -> &'static str {
        match self {
            Self::Http => "http://web.archive.org",
            Self::HttpBeta => "http://web-beta.archive.org",
            Self::Https => "https://web.archive.org",
            Self::HttpsBeta => "https://web-beta.archive.org",
        }
    }
}

/// Return the recognized host prefix contained in the link, if any.
pub fn wayback_host(link: &str) -> Option<WaybackHost> {
    WaybackHost::ALL
        .into_iter()
        .find(|host| link.contains(host.prefix()))
}

pub fn is_wayback_url(link: &str) -> bool {
    wayback_host(link).is_some()
}

/// Best-effort extraction of the capture date from a Wayback Machine URL.
///
/// The date comes from the outermost capture, i.e. the `<host>/web/` prefix
/// that starts earliest in the link. Returns an empty string when there is no
/// recognized prefix or the following path segment isn't a timestamp.
pub fn human_date(link: &str) -> String {
    WaybackHost::ALL
        .into_iter()
        .filter_map(|host| {
            let prefix = format!("{}{}", host.prefix(), WEB_PATH);

            link.find(&prefix).map(|start| start + prefix.len())
        })
        .min()
        .and_then(|start| link[start..].split('/').next())
        .and_then(|slug| slug.parse::<Timestamp>().ok())
        .map(|timestamp| timestamp.human_date())
        .unwrap_or_default()
}

/// Builds lookup and save-now URLs relative to an archive root.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UrlBuilder {
    root: String,
}

impl UrlBuilder {
    pub fn new<S: Into<String>>(root: S) -> Self {
        let mut root = root.into();

        while root.ends_with('/') {
            root.pop();
        }

        Self { root }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// `<root>/web/<timestamp>/<target>`
    pub fn lookup_url(&self, target: &str, timestamp: Timestamp) -> Result<Url, Error> {
        let url = format!("{}{}{}/{}", self.root, WEB_PATH, timestamp, target);

        Url::parse(&url).map_err(|source| Error::InvalidUrl { url, source })
    }

    pub fn earliest_lookup_url(&self, target: &str) -> Result<Url, Error> {
        self.lookup_url(target, Timestamp::earliest())
    }

    pub fn latest_lookup_url(&self, target: &str) -> Result<Url, Error> {
        self.lookup_url(target, Timestamp::now())
    }

    /// `<root>/save/<target>`, with the target left exactly as given.
    pub fn save_url(&self, target: &str) -> String {
        format!("{}{}{}", self.root, SAVE_PATH, target)
    }

    /// Resolve a `Location` or `Content-Location` value against the root.
    ///
    /// Absolute values are returned as they are.
    pub fn resolve_location(&self, location: &str) -> Result<Url, Error> {
        Url::parse(&self.root)
            .and_then(|root| root.join(location))
            .map_err(|source| Error::InvalidUrl {
                url: location.to_string(),
                source,
            })
    }
}

impl Default for UrlBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

/// A capture URL split into the archived URL and its capture timestamp.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Ord, PartialOrd, Serialize)]
pub struct UrlParts {
    pub url: String,
    pub timestamp: Timestamp,
}

impl UrlParts {
    pub fn new(url: String, timestamp: Timestamp) -> Self {
        Self { url, timestamp }
    }

    pub fn to_wb_url(&self, https: bool, original: bool) -> String {
        format!(
            "http{}://web.archive.org/web/{}{}/{}",
            if https { "s" } else { "" },
            self.timestamp,
            if original { "id_" } else { "" },
            self.url
        )
    }
}

impl FromStr for UrlParts {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static WAYBACK_URL_RE: Lazy<regex::Regex> =
            Lazy::new(|| regex::Regex::new(WAYBACK_URL_PATTERN).unwrap());

        let captures = WAYBACK_URL_RE
            .captures(s)
            .ok_or_else(|| Error::UnexpectedUrl(s.to_string()))?;

        Ok(Self::new(
            captures["url"].to_string(),
            captures["timestamp"].parse()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection() {
        assert!(!is_wayback_url("http://www.bbc.co.uk/news"));
        assert!(is_wayback_url(
            "http://web.archive.org/web/20170101000000/http://example.com"
        ));
        assert_eq!(
            wayback_host("https://web-beta.archive.org/web/20170101000000/http://example.com"),
            Some(WaybackHost::HttpsBeta)
        );
        assert_eq!(
            wayback_host("https://web.archive.org/save/http://example.com"),
            Some(WaybackHost::Https)
        );
        assert_eq!(wayback_host("http://archive.org/details/foo"), None);
    }

    #[test]
    fn earliest_lookup_url() {
        let url = UrlBuilder::default()
            .earliest_lookup_url("http://www.bbc.co.uk/news")
            .unwrap();

        assert_eq!(
            url.as_str(),
            "http://web.archive.org/web/19000831231300/http://www.bbc.co.uk/news"
        );
    }

    #[test]
    fn latest_lookup_url() {
        let before = Timestamp::now();
        let url = UrlBuilder::default()
            .latest_lookup_url("http://www.bbc.co.uk/news")
            .unwrap();

        let parts: UrlParts = url.as_str().parse().unwrap();

        assert!(parts.timestamp >= before);
        assert!(parts.timestamp <= Timestamp::now());
        assert_eq!(parts.url, "http://www.bbc.co.uk/news");
    }

    #[test]
    fn invalid_root() {
        let builder = UrlBuilder::new("web.archive.org");

        assert!(matches!(
            builder.earliest_lookup_url("http://www.bbc.co.uk/news"),
            Err(Error::InvalidUrl { .. })
        ));
    }

    #[test]
    fn save_url() {
        assert_eq!(
            UrlBuilder::default().save_url("http://www.bbc.com/news?a=b%20c"),
            "http://web.archive.org/save/http://www.bbc.com/news?a=b%20c"
        );
        assert_eq!(
            UrlBuilder::new("https://web.archive.org/").save_url("http://www.bbc.com/news"),
            "https://web.archive.org/save/http://www.bbc.com/news"
        );
    }

    #[test]
    fn resolve_location() {
        let builder = UrlBuilder::default();

        assert_eq!(
            builder
                .resolve_location("/web/20170314100523/http://www.bbc.co.uk/news")
                .unwrap()
                .as_str(),
            "http://web.archive.org/web/20170314100523/http://www.bbc.co.uk/news"
        );
        assert_eq!(
            builder
                .resolve_location("https://web.archive.org/web/20170314100523/http://a.org/")
                .unwrap()
                .as_str(),
            "https://web.archive.org/web/20170314100523/http://a.org/"
        );
    }

    #[test]
    fn human_dates() {
        let cases = [
            (
                "http://web.archive.org/web/20170413225815/http://www.nationalarchives.gov.uk/",
                "13 April 2017",
            ),
            (
                "http://web.archive.org/web/20030415174607/http://www.nationalarchives.gov.uk:80/",
                "15 April 2003",
            ),
            (
                "http://web.archive.org/web/19961221203254/http://www0.bbc.co.uk:80/",
                "21 December 1996",
            ),
            (
                "https://web-beta.archive.org/web/19961221203254/http://www0.bbc.co.uk:80/",
                "21 December 1996",
            ),
            (
                "https://web.archive.org/web/20170413225815/http://web.archive.org/web/19961221203254/http://example.com/",
                "13 April 2017",
            ),
            (
                "http://web-beta.archive.org/web/20030415174607/https://web.archive.org/web/19961221203254/http://example.com/",
                "15 April 2003",
            ),
            ("http://www.nationalarchives.gov.uk/", ""),
            ("http://web.archive.org/web/2017/http://www.nationalarchives.gov.uk/", ""),
            ("http://web.archive.org/web/*/http://www.nationalarchives.gov.uk/", ""),
        ];

        for (link, expected) in cases {
            assert_eq!(human_date(link), expected, "{}", link);
        }
    }

    #[test]
    fn human_date_of_lookup_url() {
        let timestamp: Timestamp = "20080229120000".parse().unwrap();
        let url = UrlBuilder::default()
            .lookup_url("http://example.com/", timestamp)
            .unwrap();

        assert_eq!(human_date(url.as_str()), timestamp.human_date());
        assert_eq!(human_date(url.as_str()), "29 February 2008");
    }

    #[test]
    fn parse_url_parts() {
        let url = "https://web.archive.org/web/20160508215503/https://twitter.com/roman_dmowski99/status/725877225686454272";
        let expected = UrlParts::new(
            "https://twitter.com/roman_dmowski99/status/725877225686454272".to_string(),
            "20160508215503".parse().unwrap(),
        );

        let parsed: UrlParts = url.parse().unwrap();

        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_wb_url(true, false), url);
    }
}
