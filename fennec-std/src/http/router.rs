//! Route template parsing and matching.
//!
//! Templates are `/`-separated segments. A segment of the form `{name}` is a
//! dynamic capture matching any non-empty, URL-decoded path segment; every
//! other segment is a literal matched case-insensitively.
//!
//! Matching runs in two passes over the table: first a segment-count filter,
//! then a declaration-order scan where the first fully matching template
//! wins. Because literals compare case-insensitively, two templates that
//! differ only in case collide; declaration order decides between them and
//! nothing else does.

use fennec_core::{BuildError, HandlerSpec, HttpError};
use indexmap::IndexMap;

/// One parsed template segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A literal segment, matched case-insensitively.
    Literal(String),
    /// A named dynamic capture.
    Capture(String),
}

/// A parsed route template.
#[derive(Debug, Clone)]
pub struct RouteTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl RouteTemplate {
    /// Parse a template string.
    pub fn parse(template: &str) -> Result<Self, BuildError> {
        if template.is_empty() {
            return Err(BuildError::InvalidRoute {
                template: template.to_string(),
                reason: "template is empty".to_string(),
            });
        }

        let mut segments = Vec::new();
        for part in template.split('/') {
            if let Some(stripped) = part.strip_prefix('{') {
                let name = stripped
                    .strip_suffix('}')
                    .ok_or_else(|| BuildError::InvalidRoute {
                        template: template.to_string(),
                        reason: format!("unterminated capture '{part}'"),
                    })?;
                if name.is_empty() {
                    return Err(BuildError::InvalidRoute {
                        template: template.to_string(),
                        reason: "capture has no name".to_string(),
                    });
                }
                segments.push(Segment::Capture(name.to_string()));
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        Ok(Self {
            raw: template.to_string(),
            segments,
        })
    }

    /// The original template string.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The number of `/`-separated segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Match against pre-split path segments of equal count.
    ///
    /// Captures come back in route order. Returns `None` on the first
    /// non-matching segment.
    fn matches(&self, path_segments: &[&str]) -> Option<IndexMap<String, String>> {
        let mut captures = IndexMap::new();
        for (segment, given) in self.segments.iter().zip(path_segments) {
            match segment {
                Segment::Literal(literal) => {
                    if !literal.eq_ignore_ascii_case(given) {
                        return None;
                    }
                }
                Segment::Capture(name) => {
                    let decoded = url_decode(given);
                    if decoded.is_empty() {
                        return None;
                    }
                    captures.insert(name.clone(), decoded);
                }
            }
        }
        Some(captures)
    }
}

/// One registered route.
pub struct RouteEntry {
    /// The parsed template.
    pub template: RouteTemplate,
    /// The controller's service id.
    pub service_id: String,
    /// Verb name (lowercased) to handler.
    pub handlers: IndexMap<String, HandlerSpec>,
}

/// A successful route match.
pub struct RouteMatch<'a> {
    /// The matched route.
    pub entry: &'a RouteEntry,
    /// Named captures, in route order, URL-decoded.
    pub captures: IndexMap<String, String>,
}

impl std::fmt::Debug for RouteMatch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteMatch")
            .field("template", &self.entry.template.raw())
            .field("service_id", &self.entry.service_id)
            .field("captures", &self.captures)
            .finish()
    }
}

/// The route table, scanned in declaration order.
#[derive(Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route. Duplicate templates are a wiring error.
    pub fn insert(&mut self, entry: RouteEntry) -> Result<(), BuildError> {
        if self
            .entries
            .iter()
            .any(|existing| existing.template.raw() == entry.template.raw())
        {
            return Err(BuildError::DuplicateRoute(entry.template.raw().to_string()));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// The number of registered routes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match a request path (query string still attached) against the table.
    pub fn match_path(&self, path: &str) -> Result<RouteMatch<'_>, HttpError> {
        let path = path.split('?').next().unwrap_or(path);
        let segments: Vec<&str> = path.split('/').collect();

        let mut saw_candidate = false;
        for entry in &self.entries {
            if entry.template.segment_count() != segments.len() {
                continue;
            }
            saw_candidate = true;
            if let Some(captures) = entry.template.matches(&segments) {
                tracing::trace!(route = entry.template.raw(), path, "route matched");
                return Ok(RouteMatch { entry, captures });
            }
        }

        if !saw_candidate {
            tracing::trace!(path, "no route with matching segment count");
        }
        Err(HttpError::NotFound)
    }
}

/// Decode a percent-encoded path segment; `+` decodes to a space.
///
/// Invalid escape sequences pass through untouched. No crate in our stack
/// covers bare percent-decoding, so this stays local.
pub fn url_decode(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                let high = (bytes[i + 1] as char).to_digit(16);
                let low = (bytes[i + 2] as char).to_digit(16);
                match (high, low) {
                    (Some(high), Some(low)) => {
                        out.push((high * 16 + low) as u8);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
