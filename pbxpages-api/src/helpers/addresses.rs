use std::net::IpAddr;

/// Shown in place of anything that does not parse as an IP literal.
pub const NOT_AN_IP: &str = "Not an IP";

/// Host portion after the last `@`, or the whole string when there is
/// none (Call-IDs from most softphones have no host part at all).
pub fn host_after_at(s: &str) -> &str {
    s.rsplit('@').next().unwrap_or(s)
}

/// Prefix before the first `:`. Strips a port, but also truncates bare
/// IPv6 literals to their first group, which then fail validation.
pub fn host_before_colon(s: &str) -> &str {
    s.split(':').next().unwrap_or(s)
}

pub fn ip_or_sentinel(s: &str) -> &str {
    if s.parse::<IpAddr>().is_ok() {
        s
    } else {
        NOT_AN_IP
    }
}

/// Call-IDs carry the host directly after the `@`, with no port.
pub fn call_id_host(call_id: &str) -> &str {
    ip_or_sentinel(host_after_at(call_id))
}

/// Via addresses are `host:port`.
pub fn via_host(via_address: &str) -> &str {
    ip_or_sentinel(host_before_colon(via_address))
}

/// Contact URIs are `sip:ext@host:port;params`.
pub fn uri_host(uri: &str) -> &str {
    ip_or_sentinel(host_before_colon(host_after_at(uri)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_id_with_host() {
        assert_eq!(call_id_host("0_1362581122@192.168.101.161"), "192.168.101.161");
    }

    #[test]
    fn test_call_id_without_host() {
        assert_eq!(call_id_host("5nw8H9tLIoXbkewN-pn_1w.."), NOT_AN_IP);
        assert_eq!(call_id_host("341cec212e1747b692e5663b2023b123"), NOT_AN_IP);
    }

    #[test]
    fn test_call_id_with_hostname_not_ip() {
        assert_eq!(call_id_host("1893618396-5060-2@BJC.BGI.BAC.HA"), NOT_AN_IP);
    }

    #[test]
    fn test_via_strips_port() {
        assert_eq!(via_host("10.0.1.131:57017"), "10.0.1.131");
        assert_eq!(via_host("192.168.7.50"), "192.168.7.50");
    }

    #[test]
    fn test_via_ipv6_with_port_truncates_to_first_group() {
        // "host:port" splitting predates IPv6 clients; the first group is
        // not an address on its own
        assert_eq!(
            via_host("2607:fb90:e120:b95f:c91c:ebd4:e11f:f45e:53362"),
            NOT_AN_IP
        );
    }

    #[test]
    fn test_uri_host_with_params() {
        assert_eq!(
            uri_host("sip:4272@64.53.207.74:33980;ob;x-ast-orig-host=10.0.1.131:57017"),
            "64.53.207.74"
        );
        assert_eq!(uri_host("sip:416@66.66.22.22:5060"), "66.66.22.22");
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(call_id_host(""), NOT_AN_IP);
        assert_eq!(via_host(""), NOT_AN_IP);
        assert_eq!(uri_host(""), NOT_AN_IP);
    }

    #[test]
    fn test_bare_ipv6_passes_validation() {
        assert_eq!(
            ip_or_sentinel("2607:fb90:e120:b95f:c91c:ebd4:e11f:f45e"),
            "2607:fb90:e120:b95f:c91c:ebd4:e11f:f45e"
        );
    }
}
