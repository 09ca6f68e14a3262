use reqwest::{
    header::{HeaderName, ACCEPT, CONTENT_LOCATION, LINK, LOCATION},
    redirect, Response, StatusCode,
};
use thiserror::Error;
use wbp_core::{
    memento::{Boundaries, Mementos},
    wayback::{wayback_host, UrlBuilder, UrlParts},
};

pub mod config;
pub mod record;

pub use config::{ClientConfig, Discovery};
pub use record::{CaptureRecord, Outcome, ProbeStatus, SubmitResult};

const ACCEPT_ANY: &str = "*/*";

#[derive(Error, Debug)]
pub enum Error {
    #[error("URL construction error")]
    UrlConstruction(#[from] wbp_core::wayback::Error),
    #[error("HTTP client construction error: {0:?}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("HTTP request error: {0:?}")]
    Request(#[from] reqwest::Error),
    #[error("Invalid location header")]
    InvalidLocation(#[source] wbp_core::wayback::Error),
    #[error("Save forbidden: {0}")]
    SaveForbidden(String),
    #[error("Save gone: {0}")]
    SaveGone(String),
    #[error("Save failed: {0}")]
    SaveFailed(StatusCode),
}

/// Wayback Machine lookup and save-now client.
#[derive(Clone, Debug)]
pub struct Client {
    probe_client: reqwest::Client,
    save_client: reqwest::Client,
    urls: UrlBuilder,
    discovery: Discovery,
}

impl Client {
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        // Lookups need to see the archive's redirects rather than follow them.
        let probe_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .redirect(redirect::Policy::none())
            .build()
            .map_err(Error::ClientBuild)?;

        let save_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .build()
            .map_err(Error::ClientBuild)?;

        Ok(Self {
            probe_client,
            save_client,
            urls: UrlBuilder::new(config.root.clone()),
            discovery: config.discovery,
        })
    }

    pub fn new_default() -> Result<Self, Error> {
        Self::new(&ClientConfig::default())
    }

    pub fn urls(&self) -> &UrlBuilder {
        &self.urls
    }

    /// Look up the earliest and latest captures of a URL.
    ///
    /// Links that already point into the Wayback Machine are reported as such
    /// without any request being made. A 404 without any discovery header means
    /// the archive has no captures.
    pub async fn resolve(&self, target: &str) -> Result<CaptureRecord, Error> {
        let save_url = self.urls.save_url(target);

        if let Some(host) = wayback_host(target) {
            log::info!("Already a Wayback Machine URL: {}", target);

            return Ok(CaptureRecord {
                target: target.to_string(),
                outcome: Outcome::AlreadyArchived { host },
                save_url,
                response: None,
            });
        }

        let response = self.probe(self.urls.earliest_lookup_url(target)?).await?;
        let status = response.status();
        let link = header_value(&response, LINK);
        let location = header_value(&response, LOCATION);

        let outcome = if status == StatusCode::NOT_FOUND && link.is_none() && location.is_none()
        {
            log::info!("No captures: {}", target);

            Outcome::NotInArchive
        } else {
            let mementos = link.map(Mementos::parse).unwrap_or_default();

            let boundaries = match self.discovery {
                Discovery::Link => mementos.boundaries(),
                Discovery::Location => Boundaries {
                    earliest: self.resolve_location(location)?,
                    latest: self.probe_latest(target, false).await?,
                },
                Discovery::Auto => {
                    let earliest = match mementos.earliest() {
                        Some(earliest) => Some(earliest.to_string()),
                        None => self.resolve_location(location)?,
                    };

                    let latest = match mementos.latest() {
                        Some(latest) => Some(latest.to_string()),
                        None => self.probe_latest(target, true).await?,
                    };

                    Boundaries { earliest, latest }
                }
            };

            if boundaries.is_empty() {
                log::warn!("No capture boundaries in {} response for {}", status, target);
            }

            Outcome::Fresh(boundaries)
        };

        Ok(CaptureRecord {
            target: target.to_string(),
            outcome,
            save_url,
            response: Some(status.into()),
        })
    }

    /// Ask the archive to capture a URL now.
    pub async fn submit(&self, target: &str) -> Result<SubmitResult, Error> {
        let save_url = self.urls.save_url(target);

        log::debug!("GET {}", save_url);

        let response = self
            .save_client
            .get(&save_url)
            .header(ACCEPT, ACCEPT_ANY)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let location = match header_value(&response, CONTENT_LOCATION) {
                    Some(value) => Some(
                        self.urls
                            .resolve_location(value)
                            .map_err(Error::InvalidLocation)?
                            .to_string(),
                    ),
                    None => Some(response.url().as_str())
                        .filter(|url| url.parse::<UrlParts>().is_ok())
                        .map(str::to_string),
                };

                log::info!("Saved {}: {:?}", target, location);

                Ok(SubmitResult {
                    target: target.to_string(),
                    save_url,
                    response: status.into(),
                    location,
                })
            }
            StatusCode::FORBIDDEN => Err(Error::SaveForbidden(target.to_string())),
            StatusCode::GONE => Err(Error::SaveGone(target.to_string())),
            other => Err(Error::SaveFailed(other)),
        }
    }

    async fn probe(&self, url: url::Url) -> Result<Response, Error> {
        log::debug!("HEAD {}", url);

        Ok(self
            .probe_client
            .head(url)
            .header(ACCEPT, ACCEPT_ANY)
            .send()
            .await?)
    }

    /// Second probe against the latest-lookup URL.
    async fn probe_latest(&self, target: &str, use_link: bool) -> Result<Option<String>, Error> {
        let response = self.probe(self.urls.latest_lookup_url(target)?).await?;

        let from_link = header_value(&response, LINK)
            .filter(|_| use_link)
            .and_then(|link| Mementos::parse(link).latest().map(str::to_string));

        match from_link {
            Some(latest) => Ok(Some(latest)),
            None => self.resolve_location(header_value(&response, LOCATION)),
        }
    }

    fn resolve_location(&self, location: Option<&str>) -> Result<Option<String>, Error> {
        location
            .map(|value| {
                self.urls
                    .resolve_location(value)
                    .map(|url| url.to_string())
                    .map_err(Error::InvalidLocation)
            })
            .transpose()
    }
}

/// Look up a URL with the default configuration and an optional user agent.
pub async fn lookup(target: &str, user_agent: Option<&str>) -> Result<CaptureRecord, Error> {
    let config = ClientConfig {
        user_agent: user_agent.map(str::to_string),
        ..ClientConfig::default()
    };

    Client::new(&config)?.resolve(target).await
}

/// Submit a URL to save-now with the default configuration and an optional
/// user agent.
pub async fn save(target: &str, user_agent: Option<&str>) -> Result<SubmitResult, Error> {
    let config = ClientConfig {
        user_agent: user_agent.map(str::to_string),
        ..ClientConfig::default()
    };

    Client::new(&config)?.submit(target).await
}

fn header_value(response: &Response, name: HeaderName) -> Option<&str> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
}
