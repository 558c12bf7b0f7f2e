//! Local address discovery
//!
//! Lists the host's IPv4 addresses so operators can see where the listing
//! is reachable. Informational only; serving never depends on it.

use std::io;
use std::net::{IpAddr, Ipv4Addr};

/// Non-loopback IPv4 addresses bound to any network interface
pub fn local_ipv4_addrs() -> io::Result<Vec<Ipv4Addr>> {
    let interfaces = if_addrs::get_if_addrs()?;
    Ok(select_ipv4(interfaces.iter().map(if_addrs::Interface::ip)))
}

fn select_ipv4(addrs: impl IntoIterator<Item = IpAddr>) -> Vec<Ipv4Addr> {
    let mut out = Vec::new();
    for addr in addrs {
        if let IpAddr::V4(v4) = addr {
            if !v4.is_loopback() && !out.contains(&v4) {
                out.push(v4);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv6Addr;

    #[test]
    fn test_select_ipv4_skips_loopback_and_v6() {
        let addrs = [
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V4(Ipv4Addr::new(192, 168, 65, 3)),
            IpAddr::V6(Ipv6Addr::LOCALHOST),
            IpAddr::V6("fe80::1".parse().unwrap()),
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)),
            IpAddr::V4(Ipv4Addr::new(192, 168, 65, 3)),
        ];
        assert_eq!(
            select_ipv4(addrs),
            vec![Ipv4Addr::new(192, 168, 65, 3), Ipv4Addr::new(10, 0, 0, 2)]
        );
    }

    #[test]
    fn test_local_addrs_never_loopback() {
        if let Ok(addrs) = local_ipv4_addrs() {
            assert!(addrs.iter().all(|a| !a.is_loopback()));
        }
    }
}
