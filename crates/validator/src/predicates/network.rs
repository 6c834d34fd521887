//! Network address predicates.
//!
//! Candidates go through the std address parsers untouched: surrounding
//! whitespace, zone suffixes and shortened IPv4 forms are all invalid.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::schema::IpFamily;

#[must_use]
pub fn is_ip(s: &str, family: IpFamily) -> bool {
    match family {
        IpFamily::V4 => s.parse::<Ipv4Addr>().is_ok(),
        IpFamily::V6 => s.parse::<Ipv6Addr>().is_ok(),
        IpFamily::Any => s.parse::<IpAddr>().is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("192.168.0.1", IpFamily::V4, true)]
    #[case("192.168.0.1", IpFamily::V6, false)]
    #[case("::1", IpFamily::V6, true)]
    #[case("::ffff:10.0.0.1", IpFamily::Any, true)]
    #[case(" 10.0.0.1", IpFamily::V4, false)]
    #[case("10.0.0.1\n", IpFamily::Any, false)]
    #[case("10.1", IpFamily::V4, false)]
    #[case("256.0.0.1", IpFamily::V4, false)]
    #[case("fe80::1%eth0", IpFamily::V6, false)]
    #[case("010.0.0.1", IpFamily::V4, false)]
    fn parses_strictly(#[case] input: &str, #[case] family: IpFamily, #[case] expected: bool) {
        assert_eq!(is_ip(input, family), expected);
    }
}
