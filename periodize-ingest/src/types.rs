use anyhow::{bail, Result};
use periodize_core::Zone;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Where each baseline field lives in a spreadsheet-style header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineColumns {
    pub date: usize,
    /// Detected zone columns (column index, zone). Zones without a column read as 0.
    pub zones: Vec<(usize, Zone)>,
    /// Optional "Type" column marking competition days.
    pub kind: Option<usize>,
}

impl BaselineColumns {
    /// Detect columns by name: `Date` (required), `Zone 1`..`Zone 5` / `Z1`..`Z5`,
    /// `Strength`, and `Type`. Matching is case-insensitive.
    pub fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let zone_re = Regex::new(r"(?i)^(?:zone\s*([1-5])\b.*|z([1-5]))$")?;
        let strength_re = Regex::new(r"(?i)^strength\b")?;

        let mut date = None;
        let mut zones = Vec::new();
        let mut kind = None;

        for (i, raw) in headers.into_iter().enumerate() {
            let name = raw.trim();
            if name.eq_ignore_ascii_case("date") {
                date.get_or_insert(i);
            } else if name.eq_ignore_ascii_case("type") {
                kind.get_or_insert(i);
            } else if strength_re.is_match(name) {
                if !zones.iter().any(|(_, z)| *z == Zone::Strength) {
                    zones.push((i, Zone::Strength));
                }
            } else if let Some(caps) = zone_re.captures(name) {
                let n: u32 = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .and_then(|m| m.as_str().parse().ok())
                    .unwrap_or(0);
                if let Some(zone) = Zone::from_number(n) {
                    if !zones.iter().any(|(_, z)| *z == zone) {
                        zones.push((i, zone));
                    }
                }
            }
        }

        let Some(date) = date else {
            bail!("missing required column: Date");
        };

        Ok(Self { date, zones, kind })
    }
}
