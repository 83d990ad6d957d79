/// Latency unit declared on a `clat percentiles (...)` header.
///
/// Only `usec` is recognised by name; every other header is treated as
/// `Msec`, whose row values are scaled down by 1000 to reach microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyUnit {
    Usec,
    Msec,
}

impl LatencyUnit {
    pub fn from_header(line: &str) -> Self {
        if line.contains("usec") {
            LatencyUnit::Usec
        } else {
            LatencyUnit::Msec
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            LatencyUnit::Usec => "usec",
            LatencyUnit::Msec => "msec",
        }
    }

    /// Convert a row value in this unit to canonical microseconds.
    pub fn to_usec(self, value: f64) -> f64 {
        match self {
            LatencyUnit::Usec => value,
            LatencyUnit::Msec => value / 1000.0,
        }
    }

    /// Inverse of `to_usec`.
    pub fn in_unit(self, usec: f64) -> f64 {
        match self {
            LatencyUnit::Usec => usec,
            LatencyUnit::Msec => usec * 1000.0,
        }
    }
}
