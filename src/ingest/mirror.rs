// src/ingest/mirror.rs
//
// Routing state for the one well-known upstream hub (RSSHub). Prefer the
// self-hosted primary, fail over to public mirrors on fetch failure, and
// self-heal back to the primary on the next process start.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use url::Url;

/// Well-known public hub address; also the default primary when no override
/// is configured.
pub const WELL_KNOWN_HUB: &str = "https://rsshub.app";

/// Backup mirrors, ordered by observed stability. Compiled in.
pub const BACKUP_MIRRORS: &[&str] = &["https://rsshub.app"];

const ENV_HUB_URL: &str = "RSSHUB_URL";

/// Shared by all fetch tasks of a run. `active == 0` means the primary;
/// `active == i > 0` means `backups[i - 1]`. Relaxed atomics on purpose:
/// concurrent failover decisions may interleave and one source's switch can
/// change the mirror another source reads mid-flight. Failover is a
/// best-effort signal, not a consensus.
#[derive(Debug)]
pub struct MirrorRouter {
    primary: Url,
    backups: Vec<Url>,
    active: AtomicUsize,
}

impl MirrorRouter {
    pub fn new(primary: Url, backups: Vec<Url>) -> Self {
        Self {
            primary,
            backups,
            active: AtomicUsize::new(0),
        }
    }

    /// Primary from the `RSSHUB_URL` override (default: the public hub),
    /// backups from the compiled-in list.
    pub fn from_env() -> Result<Self> {
        let primary = std::env::var(ENV_HUB_URL)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| WELL_KNOWN_HUB.to_string());
        let primary = Url::parse(&primary)
            .with_context(|| format!("parsing {ENV_HUB_URL} value {primary:?}"))?;

        let mut backups = Vec::with_capacity(BACKUP_MIRRORS.len());
        for m in BACKUP_MIRRORS {
            backups.push(Url::parse(m).with_context(|| format!("parsing backup mirror {m:?}"))?);
        }

        Ok(Self::new(primary, backups))
    }

    pub fn primary(&self) -> &Url {
        &self.primary
    }

    pub fn is_primary(&self) -> bool {
        self.active.load(Ordering::Relaxed) == 0
    }

    pub fn current_endpoint(&self) -> Url {
        let idx = self.active.load(Ordering::Relaxed);
        if idx == 0 || idx > self.backups.len() {
            self.primary.clone()
        } else {
            self.backups[idx - 1].clone()
        }
    }

    /// Rotate to the next mirror, wrapping back to the primary after the last
    /// backup. Returns the newly active endpoint.
    pub fn switch_to_next(&self) -> Url {
        let idx = self.active.load(Ordering::Relaxed);
        let next = if idx >= self.backups.len() { 0 } else { idx + 1 };
        self.active.store(next, Ordering::Relaxed);

        let endpoint = self.current_endpoint();
        tracing::info!(mirror = %endpoint, "switching feed hub mirror");
        endpoint
    }

    /// Does this URL target the hub (well-known address, configured primary,
    /// or any backup)? Only such URLs are rewritten or failed over.
    pub fn routes(&self, url: &Url) -> bool {
        let host = match url.host_str() {
            Some(h) => h,
            None => return false,
        };
        if self.primary.host_str() == Some(host) {
            return true;
        }
        if self.backups.iter().any(|b| b.host_str() == Some(host)) {
            return true;
        }
        Url::parse(WELL_KNOWN_HUB)
            .ok()
            .and_then(|u| u.host_str().map(|h| h == host))
            .unwrap_or(false)
    }

    /// Substitute the active endpoint's authority into a hub URL, preserving
    /// path and query. Non-hub URLs pass through untouched. Structured
    /// composition, not substring replacement.
    pub fn rewrite_to_active(&self, url: &Url) -> Url {
        if !self.routes(url) {
            return url.clone();
        }
        with_authority(url, &self.current_endpoint())
    }
}

fn with_authority(url: &Url, base: &Url) -> Url {
    let mut out = url.clone();
    if out.set_scheme(base.scheme()).is_err() {
        return url.clone();
    }
    if out.set_host(base.host_str()).is_err() {
        return url.clone();
    }
    if out.set_port(base.port()).is_err() {
        return url.clone();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn rewrite_preserves_path_and_query() {
        let router = MirrorRouter::new(u("https://hub.example.com:8443"), vec![]);
        let out = router.rewrite_to_active(&u("https://rsshub.app/hackernews?mode=best"));
        assert_eq!(out.as_str(), "https://hub.example.com:8443/hackernews?mode=best");
    }

    #[test]
    fn non_hub_urls_pass_through() {
        let router = MirrorRouter::new(u("https://hub.example.com"), vec![]);
        let url = u("https://blog.example.org/feed.xml");
        assert_eq!(router.rewrite_to_active(&url), url);
        assert!(!router.routes(&url));
    }

    #[test]
    fn switch_wraps_back_to_primary() {
        let router = MirrorRouter::new(
            u("https://primary.example.com"),
            vec![u("https://b1.example.com")],
        );
        assert!(router.is_primary());

        let first = router.switch_to_next();
        assert_eq!(first.host_str(), Some("b1.example.com"));
        assert!(!router.is_primary());

        let second = router.switch_to_next();
        assert_eq!(second.host_str(), Some("primary.example.com"));
        assert!(router.is_primary());
    }
}
