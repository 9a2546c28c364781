//! IP canonicalization

use std::net::IpAddr;

/// Parse a textual IP and return its canonical form
///
/// The ledger and the remote store are keyed by the canonical text, so
/// every address entering the system passes through here. Returns `None`
/// for anything that is not a valid IPv4/IPv6 address.
pub fn canonical_ip(text: &str) -> Option<String> {
    text.trim().parse::<IpAddr>().ok().map(|ip| ip.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn canonicalizes_ipv6_forms() {
        assert_eq!(
            canonical_ip("2001:0db8:0000:0000:0000:0000:0000:0001"),
            Some("2001:db8::1".to_string())
        );
    }

    #[test]
    fn trims_and_keeps_ipv4() {
        assert_eq!(canonical_ip(" 192.0.2.1 "), Some("192.0.2.1".to_string()));
    }

    #[test]
    fn rejects_non_addresses() {
        assert_eq!(canonical_ip("not-an-ip"), None);
        assert_eq!(canonical_ip(""), None);
        assert_eq!(canonical_ip("192.0.2.0/24"), None);
    }
}
