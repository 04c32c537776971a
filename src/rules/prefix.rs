//! IPv4 prefixes (`a.b.c.d/len`).

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Errors that can occur while parsing or building a prefix
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PrefixError {
    #[error("Mask length {0} exceeds 32")]
    MaskTooLong(u8),

    #[error("Invalid prefix '{0}', expected a.b.c.d/len")]
    Malformed(String),
}

/// An IPv4 address with a mask length in `0..=32`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prefix {
    addr: u32,
    len: u8,
}

impl Prefix {
    pub fn new(addr: u32, len: u8) -> Result<Self, PrefixError> {
        if len > 32 {
            return Err(PrefixError::MaskTooLong(len));
        }
        Ok(Self { addr, len })
    }

    /// Exact-match prefix for a single address
    pub fn host(addr: u32) -> Self {
        Self { addr, len: 32 }
    }

    pub fn addr(&self) -> u32 {
        self.addr
    }

    pub fn mask(&self) -> u8 {
        self.len
    }
}

impl FromStr for Prefix {
    type Err = PrefixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PrefixError::Malformed(s.to_string());

        let (addr, len) = s.split_once('/').ok_or_else(malformed)?;
        let addr: Ipv4Addr = addr.parse().map_err(|_| malformed())?;
        let len: u8 = len.parse().map_err(|_| malformed())?;
        Prefix::new(u32::from(addr), len)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", Ipv4Addr::from(self.addr), self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cidr() {
        let prefix: Prefix = "10.1.2.0/24".parse().unwrap();
        assert_eq!(prefix.addr(), 0x0A01_0200);
        assert_eq!(prefix.mask(), 24);
        assert_eq!(prefix.to_string(), "10.1.2.0/24");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("10.0.0.0/33".parse::<Prefix>(), Err(PrefixError::MaskTooLong(33)));
        assert!(matches!("10.0.0.0".parse::<Prefix>(), Err(PrefixError::Malformed(_))));
        assert!(matches!("10.0.0/8".parse::<Prefix>(), Err(PrefixError::Malformed(_))));
        assert!(matches!("10.0.0.0/x".parse::<Prefix>(), Err(PrefixError::Malformed(_))));
    }

    #[test]
    fn test_host_prefix() {
        let prefix = Prefix::host(0xC0A8_0101);
        assert_eq!(prefix.mask(), 32);
        assert_eq!(prefix.to_string(), "192.168.1.1/32");
    }
}
