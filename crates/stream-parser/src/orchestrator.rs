use crate::assembler::DocumentAssembler;
use crate::config::ParseOptions;
use crate::error::{Result, StreamError};
use crate::format::DocumentFormat;
use crate::ring::SectionRing;
use crate::scanner::ScanSession;
use crate::types::ParseResult;
use apiscope_protocol::{ParseMetadata, ProgressEvent, ProgressStage};
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::sync::CancellationToken;

/// Progress sink invoked synchronously from the parse task
pub type ProgressFn = dyn FnMut(&ProgressEvent) + Send;

/// Share of the percentage range covered by the `parsing` stage
const PARSING_SPAN: f64 = 90.0;
const ASSEMBLING_PERCENTAGE: f64 = 95.0;

/// Drives one document through scanner, ring and assembler.
///
/// Input is read in fixed-size slices on a single task. After every slice
/// the task yields to the runtime and checks its cancellation token, so a
/// long parse never monopolises a current-thread executor.
pub struct StreamParser {
    options: ParseOptions,
    progress: Option<Box<ProgressFn>>,
    cancel: CancellationToken,
}

impl fmt::Debug for StreamParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamParser")
            .field("options", &self.options)
            .field("progress", &self.progress.is_some())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

impl StreamParser {
    pub fn new(options: ParseOptions) -> Result<Self> {
        options.validate().map_err(StreamError::invalid_config)?;
        Ok(Self {
            options,
            progress: None,
            cancel: CancellationToken::new(),
        })
    }

    #[must_use]
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&ProgressEvent) + Send + 'static,
    {
        self.progress = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse an in-memory document; format is sniffed unless forced
    pub async fn parse_text(&mut self, text: &str) -> Result<ParseResult> {
        let bytes = text.as_bytes();
        self.parse_reader(bytes, bytes.len() as u64, None).await
    }

    /// Parse a file; format comes from the extension, then from content
    pub async fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<ParseResult> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await?;
        let total_size = file.metadata().await?.len();
        log::debug!("parsing {} ({total_size} bytes)", path.display());
        self.parse_reader(file, total_size, DocumentFormat::from_path(path))
            .await
    }

    /// Parse any sequential byte source.
    ///
    /// `total_size` only drives the progress percentage; reading always
    /// continues to end of stream.
    pub async fn parse_reader<R>(
        &mut self,
        mut reader: R,
        total_size: u64,
        format_hint: Option<DocumentFormat>,
    ) -> Result<ParseResult>
    where
        R: AsyncRead + Unpin,
    {
        let started = Instant::now();
        let options = self.options.clone();
        let cancel = self.cancel.clone();
        let forced_format = options.format.or(format_hint);
        let mut reporter = ProgressReporter::new(
            self.progress.as_deref_mut(),
            Duration::from_millis(options.progress_interval_ms),
        );

        reporter.stage(
            ProgressStage::Initialization,
            0.0,
            format!("Starting parse of {total_size} bytes"),
        );

        let mut buf = vec![0u8; options.chunk_size];
        let mut session: Option<ScanSession> = None;
        let mut prefix: Vec<u8> = Vec::new();
        let mut ring = SectionRing::with_capacity(options.retained_sections_under_pressure);
        let pressure_threshold = options.pressure_threshold();
        let mut processed: u64 = 0;
        let mut chunks = 0usize;
        let mut peak_memory: u64 = 0;

        loop {
            if cancel.is_cancelled() {
                log::info!("parse cancelled after {chunks} chunks");
                return Err(StreamError::Cancelled);
            }

            let filled = read_slice(&mut reader, &mut buf).await?;
            if filled == 0 {
                break;
            }
            let slice = &buf[..filled];
            if let Some(scanner) = session.as_mut() {
                for section in scanner.scan(slice) {
                    ring.push(section);
                }
            } else {
                // leading whitespace and BOM bytes are held until the format is known
                prefix.extend_from_slice(slice);
                let detected = forced_format.or_else(|| DocumentFormat::sniff_prefix(&prefix));
                if let Some(format) = detected {
                    log::debug!("scanning as {}", format.as_str());
                    let mut scanner = ScanSession::open(format);
                    for section in scanner.scan(&prefix) {
                        ring.push(section);
                    }
                    prefix.clear();
                    session = Some(scanner);
                }
            }
            processed += filled as u64;
            chunks += 1;

            let buffered = session
                .as_ref()
                .map_or(prefix.len(), ScanSession::buffered_bytes);
            let resident = (buffered + ring.retained_bytes()) as u64;
            peak_memory = peak_memory.max(resident);
            if resident >= pressure_threshold {
                let dropped = ring.trim_to_capacity();
                if dropped > 0 {
                    log::warn!(
                        "memory pressure ({resident} bytes): evicted {dropped} sections, kept {}",
                        ring.len()
                    );
                }
            }

            let fraction = if total_size > 0 {
                (processed as f64 / total_size as f64).min(1.0)
            } else {
                1.0
            };
            reporter.parsing(
                fraction * PARSING_SPAN,
                format!("Processed {chunks} chunks ({processed}/{total_size} bytes)"),
            );

            tokio::task::yield_now().await;
        }

        let mut scanner = match session {
            Some(scanner) => scanner,
            None => {
                let format = forced_format.unwrap_or(if prefix.is_empty() {
                    DocumentFormat::Json
                } else {
                    DocumentFormat::sniff_bytes(&prefix)
                });
                let mut scanner = ScanSession::open(format);
                for section in scanner.scan(&prefix) {
                    ring.push(section);
                }
                scanner
            }
        };
        for section in scanner.finish() {
            ring.push(section);
        }

        reporter.stage(
            ProgressStage::Assembling,
            ASSEMBLING_PERCENTAGE,
            format!("Assembling {} sections", ring.len()),
        );
        tokio::task::yield_now().await;
        if cancel.is_cancelled() {
            log::info!("parse cancelled before assembly");
            return Err(StreamError::Cancelled);
        }

        let sections_evicted = ring.evicted();
        let (mut spec, endpoints) =
            DocumentAssembler::new(options.prioritize_endpoints).assemble(ring.into_sections());
        spec.openapi_version = scanner.openapi_version().map(str::to_string);

        let warnings = scanner.diagnostics().warnings();
        for warning in &warnings {
            log::warn!("{warning}");
        }

        let compression_ratio = if processed > 0 {
            serde_json::to_vec(&spec)
                .ok()
                .map(|encoded| encoded.len() as f64 / processed as f64)
        } else {
            None
        };

        let metadata = ParseMetadata {
            total_size: processed,
            parse_time: started.elapsed().as_secs_f64() * 1000.0,
            chunks_processed: chunks,
            memory_used: peak_memory,
            compression_ratio,
            sections_evicted,
            warnings,
        };

        reporter.stage(
            ProgressStage::Complete,
            100.0,
            format!("Parsed {} endpoints", endpoints.len()),
        );
        log::info!(
            "parsed {} bytes in {:.1}ms: {} endpoints, {} schemas, {} chunks",
            metadata.total_size,
            metadata.parse_time,
            endpoints.len(),
            spec.schema_count(),
            metadata.chunks_processed
        );

        Ok(ParseResult {
            spec,
            endpoints,
            metadata,
        })
    }
}

/// Fill `buf` from `reader`; short only at end of stream
async fn read_slice<R>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Throttled, monotonic progress delivery.
///
/// Only `parsing` events are throttled; stage transitions always fire.
struct ProgressReporter<'a> {
    callback: Option<&'a mut ProgressFn>,
    interval: Duration,
    last_parsing: Option<Instant>,
    last_percentage: f64,
}

impl<'a> ProgressReporter<'a> {
    fn new(callback: Option<&'a mut ProgressFn>, interval: Duration) -> Self {
        Self {
            callback,
            interval,
            last_parsing: None,
            last_percentage: 0.0,
        }
    }

    fn stage(&mut self, stage: ProgressStage, percentage: f64, message: String) {
        self.emit(stage, percentage, message);
    }

    fn parsing(&mut self, percentage: f64, message: String) {
        let now = Instant::now();
        if let Some(last) = self.last_parsing {
            if now.duration_since(last) < self.interval {
                return;
            }
        }
        self.last_parsing = Some(now);
        self.emit(ProgressStage::Parsing, percentage, message);
    }

    fn emit(&mut self, stage: ProgressStage, percentage: f64, message: String) {
        let percentage = percentage.max(self.last_percentage);
        self.last_percentage = percentage;
        log::debug!("progress {percentage:.1}% [{}] {message}", stage.as_str());
        if let Some(callback) = self.callback.as_mut() {
            callback(&ProgressEvent::new(stage, percentage, message));
        }
    }
}
