//! Server directory lookup
//!
//! The directory is an external collaborator: the core only needs an
//! ordered list of candidate servers. The production implementation
//! fetches the public listing XML over HTTP and extracts the `<server>`
//! element attributes.

use crate::error::{AppError, Result};
use crate::models::{Config, Server};
use async_trait::async_trait;
use regex::Regex;

/// Source of candidate test servers
#[async_trait]
pub trait ServerDirectory: Send + Sync {
    /// Retrieve all candidate servers, in listing order.
    ///
    /// Failure here is fatal to the run; there is no partial result.
    async fn get_all_servers(&self) -> Result<Vec<Server>>;
}

/// Directory backed by the public HTTP server listing
pub struct HttpServerDirectory {
    client: reqwest::Client,
    list_url: String,
}

impl HttpServerDirectory {
    pub fn new<S: Into<String>>(list_url: S) -> Self {
        Self {
            client: reqwest::Client::new(),
            list_url: list_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.list_url.clone())
    }
}

#[async_trait]
impl ServerDirectory for HttpServerDirectory {
    async fn get_all_servers(&self) -> Result<Vec<Server>> {
        let response = self.client.get(&self.list_url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::directory(format!(
                "Server listing request to {} returned {}",
                self.list_url,
                response.status()
            )));
        }

        let body = response.text().await?;
        let servers = parse_server_listing(&body)?;

        if servers.is_empty() {
            return Err(AppError::directory(format!(
                "Server listing from {} contained no usable servers",
                self.list_url
            )));
        }
        Ok(servers)
    }
}

/// Extract servers from the listing XML, preserving document order.
///
/// Entries without both an `id` and a `host` attribute are dropped; the
/// remaining metadata attributes are optional.
pub fn parse_server_listing(xml: &str) -> Result<Vec<Server>> {
    let element_re = Regex::new(r"<server\s+([^>]*?)/?>")
        .map_err(|e| AppError::internal(format!("Bad server element pattern: {}", e)))?;
    let attr_re = Regex::new(r#"([a-z]+)="([^"]*)""#)
        .map_err(|e| AppError::internal(format!("Bad attribute pattern: {}", e)))?;

    let mut servers = Vec::new();
    for element in element_re.captures_iter(xml) {
        let attrs = &element[1];

        let mut id = None;
        let mut host = None;
        let mut name = String::new();
        let mut sponsor = String::new();
        let mut country = String::new();

        for attr in attr_re.captures_iter(attrs) {
            let value = attr[2].to_string();
            match &attr[1] {
                "id" => id = Some(value),
                "host" => host = Some(value),
                "name" => name = value,
                "sponsor" => sponsor = value,
                "country" => country = value,
                _ => {}
            }
        }

        if let (Some(id), Some(host)) = (id, host) {
            servers.push(Server {
                id,
                host,
                name,
                sponsor,
                country,
            });
        }
    }
    Ok(servers)
}
