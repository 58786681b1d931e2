//! Image URL classification shared by the db and api checks.

/// Where an image URL points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// Absolute URL on the CDN host.
    Cdn,
    /// Path under the local uploads prefix.
    Local,
    /// Neither; worth a human look.
    Unknown,
}

impl UrlKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cdn => "CDN",
            Self::Local => "local",
            Self::Unknown => "unknown",
        }
    }
}

/// Classify one URL against the configured CDN host and local prefix.
pub fn classify(url: &str, cdn_host: &str, local_prefix: &str) -> UrlKind {
    if url.starts_with("http") && url.contains(cdn_host) {
        UrlKind::Cdn
    } else if url.starts_with(local_prefix) {
        UrlKind::Local
    } else {
        UrlKind::Unknown
    }
}

/// Running counts per classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub cdn: usize,
    pub local: usize,
    pub unknown: usize,
}

impl Tally {
    pub fn add(&mut self, kind: UrlKind) {
        match kind {
            UrlKind::Cdn => self.cdn += 1,
            UrlKind::Local => self.local += 1,
            UrlKind::Unknown => self.unknown += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.cdn + self.local + self.unknown
    }
}
