use crate::config::LoaderConfig;
use crate::error::{ExplorerError, Result};
use crate::session::LoadedSpec;
use apiscope_stream_parser::{DocumentFormat, StreamParser};
use reqwest::Client;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Where a document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    Url(String),
    Inline(String),
    File(PathBuf),
}

impl SpecSource {
    /// URL if it looks like one, inline text if it looks like a document,
    /// otherwise a file path
    pub fn classify(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ExplorerError::InvalidSource("empty source".to_string()));
        }
        let single_line = !trimmed.contains('\n');
        if single_line && (trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Ok(Self::Url(trimmed.to_string()));
        }
        if !single_line || DocumentFormat::looks_like_document(trimmed) {
            return Ok(Self::Inline(input.to_string()));
        }
        Ok(Self::File(PathBuf::from(trimmed)))
    }
}

impl fmt::Display for SpecSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Inline(text) => write!(f, "inline document ({} bytes)", text.len()),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolves a source to text or a file and runs the stream parser on it.
///
/// The size ceiling is enforced here, before the parser sees any input.
#[derive(Debug, Clone)]
pub struct SpecLoader {
    config: LoaderConfig,
    client: Client,
}

impl SpecLoader {
    pub fn new(config: LoaderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Fresh parser configured from this loader's parse options
    pub fn parser(&self) -> Result<StreamParser> {
        Ok(StreamParser::new(self.config.parse.clone())?)
    }

    pub async fn load(&self, source: &SpecSource) -> Result<LoadedSpec> {
        let parser = self.parser()?;
        self.load_with(source, parser).await
    }

    /// Load using a caller-prepared parser (progress sink, cancellation)
    pub async fn load_with(
        &self,
        source: &SpecSource,
        mut parser: StreamParser,
    ) -> Result<LoadedSpec> {
        log::info!("loading {source}");
        let result = match source {
            SpecSource::Url(url) => {
                let text = self.fetch(url).await?;
                parser.parse_text(&text).await?
            }
            SpecSource::Inline(text) => {
                self.check_size(text.len() as u64)?;
                parser.parse_text(text).await?
            }
            SpecSource::File(path) => {
                let size = tokio::fs::metadata(path).await?.len();
                self.check_size(size)?;
                parser.parse_file(path).await?
            }
        };
        Ok(LoadedSpec::new(source.to_string(), result))
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExplorerError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        if let Some(length) = response.content_length() {
            self.check_size(length)?;
        }
        let text = response.text().await?;
        self.check_size(text.len() as u64)?;
        log::debug!("fetched {} bytes from {url}", text.len());
        Ok(text)
    }

    fn check_size(&self, size: u64) -> Result<()> {
        if size > self.config.max_file_size {
            return Err(ExplorerError::TooLarge {
                size,
                limit: self.config.max_file_size,
            });
        }
        Ok(())
    }
}
