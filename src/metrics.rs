/*
 *  metrics.rs
 *
 *  vestaglove - controller log display
 *	(c) 2026 vestaglove contributors
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */
//! Free memory reporting from /proc/meminfo. Advisory only.

use std::fmt;
use std::fs;
use std::io;

const MEMINFO: &str = "/proc/meminfo";

/// Memory snapshot in bytes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStats {
    pub total: u64,
    pub free: u64,
}

impl MemoryStats {
    /// Read the current figures from /proc/meminfo.
    pub fn sample() -> io::Result<Self> {
        let content = fs::read_to_string(MEMINFO)?;
        Self::parse(&content)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "MemTotal/MemAvailable missing"))
    }

    /// Parse meminfo text; `MemAvailable` counts as free.
    pub fn parse(content: &str) -> Option<Self> {
        let mut total = None;
        let mut free = None;
        for line in content.lines() {
            let mut parts = line.split_whitespace();
            let key = parts.next();
            let kib = parts.next().and_then(|v| v.parse::<u64>().ok());
            match (key, kib) {
                (Some("MemTotal:"), Some(v)) => total = Some(v * 1024),
                (Some("MemAvailable:"), Some(v)) => free = Some(v * 1024),
                _ => {}
            }
        }
        Some(Self { total: total?, free: free? })
    }

    pub fn free_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.free as f64 / self.total as f64 * 100.0
        }
    }
}

impl fmt::Display for MemoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total:{} Free:{} ({:.2}%)", self.total, self.free, self.free_pct())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "MemTotal:        1000 kB\nMemFree:          100 kB\nMemAvailable:     250 kB\n";

    #[test]
    fn test_parse_meminfo() {
        let stats = MemoryStats::parse(SAMPLE).unwrap();
        assert_eq!(stats, MemoryStats { total: 1_024_000, free: 256_000 });
        assert_eq!(stats.to_string(), "Total:1024000 Free:256000 (25.00%)");
    }

    #[test]
    fn test_parse_requires_both_fields() {
        assert!(MemoryStats::parse("MemTotal: 10 kB\n").is_none());
    }

    #[test]
    fn test_zero_total_does_not_divide() {
        assert_eq!(MemoryStats::default().free_pct(), 0.0);
    }
}
