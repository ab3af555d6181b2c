//! Target address resolution.
//!
//! Turns the user-supplied host string into a single connectable address.
//! A failed forward lookup aborts the scan; the follow-up reverse lookup is
//! cosmetic and never fails the run.

use crate::error::{ResolveError, ResolveResult};
use std::fmt;
use std::net::IpAddr;
use tracing::debug;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// A scan target resolved to one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    /// The original user input (hostname or IP string).
    pub host: String,
    /// The resolved address; probes connect here.
    pub addr: IpAddr,
    /// Reverse (PTR) name of the address, when one exists.
    pub reverse_name: Option<String>,
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host == self.addr.to_string() {
            write!(f, "{}", self.addr)
        } else {
            write!(f, "{} ({})", self.host, self.addr)
        }
    }
}

/// Resolve a hostname or IP literal into a [`ScanTarget`].
///
/// Literal addresses skip DNS entirely. Hostnames resolve through the
/// platform's default resolver configuration; the first returned address
/// is used. Reverse lookup runs afterward in both cases.
pub async fn resolve(host: &str) -> ResolveResult<ScanTarget> {
    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

    let addr = match host.parse::<IpAddr>() {
        Ok(addr) => addr,
        Err(_) => forward_lookup(&resolver, host).await?,
    };
    debug!(host, %addr, "target resolved");

    let reverse_name = reverse_lookup(&resolver, addr).await;

    Ok(ScanTarget {
        host: host.to_string(),
        addr,
        reverse_name,
    })
}

async fn forward_lookup(resolver: &TokioAsyncResolver, host: &str) -> ResolveResult<IpAddr> {
    let response = resolver
        .lookup_ip(host)
        .await
        .map_err(|e| ResolveError::Lookup {
            host: host.to_string(),
            reason: e.to_string(),
        })?;

    response.iter().next().ok_or_else(|| ResolveError::NoAddresses {
        host: host.to_string(),
    })
}

/// Best-effort PTR lookup. Any failure is just "no reverse name".
async fn reverse_lookup(resolver: &TokioAsyncResolver, addr: IpAddr) -> Option<String> {
    match resolver.reverse_lookup(addr).await {
        Ok(lookup) => lookup.iter().next().map(|name| {
            let name = name.to_utf8();
            name.trim_end_matches('.').to_string()
        }),
        Err(e) => {
            debug!(%addr, reason = %e, "reverse lookup failed");
            None
        }
    }
}
