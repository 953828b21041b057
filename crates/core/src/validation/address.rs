//! IP address, CIDR, and range classification
//!
//! Pure, side-effect-free predicates over string input. These decide whether
//! a tagged entity is uploaded as type `ip` or type `string`; they are
//! deliberately stricter than a general-purpose parser (no leading zeros in
//! octets, no zone indices, network-aligned IPv4 CIDR bases).

use std::net::Ipv6Addr;

use tagstream_domain::EntityType;

/// Strict dotted-quad check.
///
/// No trimming: any whitespace anywhere invalidates (callers trim once,
/// before classification). Each of the four octets must be numeric, in
/// `[0, 255]`, and free of leading zeros (`"0"` is fine, `"01"` is not).
pub fn is_ipv4(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    let octets: Vec<&str> = value.split('.').collect();
    octets.len() == 4 && octets.iter().all(|octet| is_ipv4_octet(octet))
}

fn is_ipv4_octet(octet: &str) -> bool {
    if octet.is_empty() || octet.len() > 3 {
        return false;
    }
    if octet.len() > 1 && octet.starts_with('0') {
        return false;
    }
    if !octet.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    octet.parse::<u16>().is_ok_and(|n| n <= 255)
}

/// Standards-compliant IPv6 syntax check, minus zone indices.
///
/// Like [`is_ipv4`], whitespace anywhere invalidates; a `%` (zone index)
/// also invalidates.
pub fn is_ipv6(value: &str) -> bool {
    if value.is_empty() || value.contains('%') || value.chars().any(char::is_whitespace) {
        return false;
    }
    value.parse::<Ipv6Addr>().is_ok()
}

/// IPv4 CIDR block check: `<address>/<prefix>` with prefix in `[0, 32]` and
/// the address being the network base for that prefix (host bits zero).
pub fn is_ipv4_cidr(value: &str) -> bool {
    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() != 2 {
        return false;
    }
    let Some(prefix) = parse_prefix(parts[1]) else {
        return false;
    };
    if prefix > 32 || !is_ipv4(parts[0]) {
        return false;
    }
    let Some(octets) = parse_octets(parts[0]) else {
        return false;
    };
    is_network_base(octets, prefix)
}

/// IPv6 CIDR block check: `<address>/<prefix>` with prefix in `[0, 128]`.
/// Syntax only; no network-alignment requirement, unlike IPv4.
pub fn is_ipv6_cidr(value: &str) -> bool {
    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() != 2 {
        return false;
    }
    let Some(prefix) = parse_prefix(parts[1]) else {
        return false;
    };
    prefix <= 128 && is_ipv6(parts[0])
}

/// IPv4 range check: `<start>-<end>` where both sides are valid addresses.
/// No requirement that start <= end.
pub fn is_ipv4_range(value: &str) -> bool {
    let parts: Vec<&str> = value.split('-').collect();
    parts.len() == 2 && is_ipv4(parts[0]) && is_ipv4(parts[1])
}

/// IPv6 range check: `<start>-<end>` where both sides are valid addresses.
pub fn is_ipv6_range(value: &str) -> bool {
    let parts: Vec<&str> = value.split('-').collect();
    parts.len() == 2 && is_ipv6(parts[0]) && is_ipv6(parts[1])
}

/// Digits only; `parse` alone would admit a leading `+`.
fn parse_prefix(part: &str) -> Option<u8> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse::<u8>().ok()
}

/// True when the value is an address, CIDR block, or range for either IP
/// version. This is the `ip` vs `string` entity classifier.
pub fn is_address_or_range_or_cidr(value: &str) -> bool {
    is_ipv4(value)
        || is_ipv6(value)
        || is_ipv4_cidr(value)
        || is_ipv6_cidr(value)
        || is_ipv4_range(value)
        || is_ipv6_range(value)
}

/// Derive the upload type for an entity value.
pub fn classify_entity(value: &str) -> EntityType {
    if is_address_or_range_or_cidr(value) {
        EntityType::Ip
    } else {
        EntityType::String
    }
}

fn parse_octets(address: &str) -> Option<[u32; 4]> {
    let mut octets = [0u32; 4];
    for (i, part) in address.split('.').enumerate() {
        if i >= 4 {
            return None;
        }
        octets[i] = part.parse::<u32>().ok()?;
    }
    Some(octets)
}

/// Host bits must be zero for the given prefix, checked per classful
/// boundary: the octet the prefix lands in must be a multiple of the block
/// size, and every octet to its right must be zero.
fn is_network_base(octets: [u32; 4], prefix: u8) -> bool {
    match prefix {
        0 => octets == [0, 0, 0, 0],
        1..=8 => {
            octets[1] == 0
                && octets[2] == 0
                && octets[3] == 0
                && octets[0] % (1u32 << (8 - prefix)) == 0
        }
        9..=16 => {
            octets[2] == 0 && octets[3] == 0 && octets[1] % (1u32 << (16 - prefix)) == 0
        }
        17..=24 => octets[3] == 0 && octets[2] % (1u32 << (24 - prefix)) == 0,
        // 25..=32; a /32 divides by 1 and always aligns
        _ => octets[3] % (1u32 << (32 - u32::from(prefix))) == 0,
    }
}
