use apiscope_protocol::ParseMetadata;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// Top-level document key the scanner emits as a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Info,
    Paths,
    Components,
    /// Swagger 2.0 schema map, merged into `components.schemas`
    Definitions,
    Servers,
    Security,
    Tags,
}

impl SectionKind {
    pub const ALL: [Self; 7] = [
        Self::Info,
        Self::Paths,
        Self::Components,
        Self::Definitions,
        Self::Servers,
        Self::Security,
        Self::Tags,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == key)
    }

    /// Assembly order when endpoints are prioritized (lower first)
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Info => 0,
            Self::Paths => 1,
            Self::Components => 2,
            Self::Definitions => 3,
            Self::Servers => 4,
            Self::Security => 5,
            Self::Tags => 6,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Paths => "paths",
            Self::Components => "components",
            Self::Definitions => "definitions",
            Self::Servers => "servers",
            Self::Security => "security",
            Self::Tags => "tags",
        }
    }
}

/// A fully closed top-level section produced by a scanner
#[derive(Debug, Clone)]
pub struct ParsedSection {
    pub kind: SectionKind,
    pub payload: Value,
    /// Size of the section's source text in bytes
    pub byte_size: usize,
    /// Arrival order within one scan session
    pub sequence: usize,
    pub emitted_at: Instant,
}

impl ParsedSection {
    pub fn new(kind: SectionKind, payload: Value, byte_size: usize, sequence: usize) -> Self {
        Self {
            kind,
            payload,
            byte_size,
            sequence,
            emitted_at: Instant::now(),
        }
    }
}

/// Merged view of all sections of one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledSpecification {
    pub openapi_version: Option<String>,
    pub info: Map<String, Value>,
    pub paths: Map<String, Value>,
    pub components: Map<String, Value>,
    pub servers: Vec<Value>,
    pub security: Vec<Value>,
    pub tags: Vec<Value>,
}

impl AssembledSpecification {
    pub fn title(&self) -> Option<&str> {
        self.info.get("title").and_then(Value::as_str)
    }

    pub fn api_version(&self) -> Option<&str> {
        self.info.get("version").and_then(Value::as_str)
    }

    /// Named schema map (`components.schemas`)
    pub fn schemas(&self) -> Option<&Map<String, Value>> {
        self.components.get("schemas").and_then(Value::as_object)
    }

    pub fn schema_count(&self) -> usize {
        self.schemas().map_or(0, Map::len)
    }
}

/// HTTP methods recognised under a path item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub const ALL: [Self; 8] = [
        Self::Get,
        Self::Put,
        Self::Post,
        Self::Delete,
        Self::Options,
        Self::Head,
        Self::Patch,
        Self::Trace,
    ];

    /// Key used under an OpenAPI path item
    #[must_use]
    pub const fn as_key(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
            Self::Trace => "trace",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|method| method.as_key() == lowered)
            .ok_or_else(|| format!("unknown HTTP method: {s}"))
    }
}

/// Coarse endpoint complexity bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    /// Highest score still classified as `low`
    pub const LOW_MAX: usize = 3;
    /// Highest score still classified as `medium`
    pub const MEDIUM_MAX: usize = 8;

    #[must_use]
    pub const fn from_score(score: usize) -> Self {
        if score <= Self::LOW_MAX {
            Self::Low
        } else if score <= Self::MEDIUM_MAX {
            Self::Medium
        } else {
            Self::High
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Complexity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown complexity: {other}")),
        }
    }
}

/// Heuristic latency label for UI display; never measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseTime {
    Fast,
    Medium,
    Slow,
}

impl ResponseTime {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
        }
    }
}

/// One operation on one path, annotated with heuristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRecord {
    pub method: HttpMethod,
    pub path: String,
    pub summary: String,
    pub description: String,
    pub tags: BTreeSet<String>,
    pub operation_id: Option<String>,
    pub parameters: Vec<Value>,
    pub request_body: Option<Value>,
    pub responses: Map<String, Value>,
    pub security: Option<Vec<Value>>,
    pub deprecated: bool,
    pub complexity: Complexity,
    pub business_context: String,
    pub estimated_response_time: ResponseTime,
}

impl EndpointRecord {
    /// `"GET /pets"` style identifier
    pub fn key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// Output of one orchestrated parse run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub spec: AssembledSpecification,
    pub endpoints: Vec<EndpointRecord>,
    pub metadata: ParseMetadata,
}
