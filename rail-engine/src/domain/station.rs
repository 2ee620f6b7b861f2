//! Station identity and attribute types.

use std::fmt;

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidCode {
    reason: &'static str,
}

/// A short station code (e.g. a CRS or similar operator code).
///
/// Per spec.md §3, a code is 3–4 ASCII uppercase characters in well-formed
/// data, but §4.L rule 5 relaxes the *loader's* acceptance pattern to
/// `^[A-Z0-9]{2,5}$` since shipped documents are not perfectly consistent.
/// Unlike the stricter 3-letter CRS code this type generalizes, a `Code` is
/// not guaranteed to map to exactly one station network-wide — see
/// `CODE_COLLISION` in the assembly report.
///
/// # Examples
///
/// ```
/// use rail_engine::domain::Code;
///
/// let wat = Code::parse("WAT").unwrap();
/// assert_eq!(wat.as_str(), "WAT");
///
/// assert!(Code::parse("wat").is_err());
/// assert!(Code::parse("W").is_err());
/// assert!(Code::parse("TOOLONGCODE").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    bytes: [u8; 5],
    len: u8,
}

impl Code {
    /// Parse a station code from a string.
    ///
    /// Accepts 2–5 uppercase ASCII letters or digits, per the loader's
    /// validation rule (`^[A-Z0-9]{2,5}$`).
    pub fn parse(s: &str) -> Result<Self, InvalidCode> {
        let bytes = s.as_bytes();

        if bytes.len() < 2 || bytes.len() > 5 {
            return Err(InvalidCode {
                reason: "must be 2 to 5 characters",
            });
        }

        for &b in bytes {
            if !(b.is_ascii_uppercase() || b.is_ascii_digit()) {
                return Err(InvalidCode {
                    reason: "must be uppercase ASCII letters or digits",
                });
            }
        }

        let mut out = [0u8; 5];
        out[..bytes.len()].copy_from_slice(bytes);
        Ok(Code {
            bytes: out,
            len: bytes.len() as u8,
        })
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // SAFETY: we only ever store valid ASCII uppercase/digit bytes.
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap()
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({})", self.as_str())
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic position in decimal degrees, WGS84.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    /// Great-circle distance to another position, in kilometres, using the
    /// haversine formula. Used by the Network Assembler both to detect
    /// coordinate-unification anomalies (§4.N step 1) and as a weight
    /// fallback for intra-line edges (§4.N step 3c).
    pub fn haversine_km(&self, other: &Position) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();
        EARTH_RADIUS_KM * c
    }
}

/// A station: the network's node type.
///
/// Stable identity is the canonical name (see
/// `crate::network::canonicalize_name`); a [`Code`] is optional and may be
/// ambiguous (§7 `CODE_COLLISION`). Two `Station` values with the same name
/// across different line documents are unified into one node by the Network
/// Assembler (§3 "Station" invariant).
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Canonical display name, as first encountered (or the assembler's
    /// chosen representative — see §4.N step 1).
    pub name: String,
    /// Short code, if any line document supplied one for this station.
    pub code: Option<Code>,
    pub position: Position,
    /// Fare zone, if known.
    pub zone: Option<u16>,
    /// Free-form interchange tags naming other lines/operators reachable
    /// here (§3 "Station").
    pub interchange: Vec<String>,
}

impl Station {
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            code: None,
            position,
            zone: None,
            interchange: Vec::new(),
        }
    }
}
