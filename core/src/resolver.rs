//! Comuna resolution: which district, and what to call it.
//!
//! Source codes conflate the district number and the stratum block into one
//! string ("13123" is district 13, block 123), so the pipeline derives the
//! district and the stratum group independently from the same raw code.
//! Free-text names resolve through an explicit ordered pattern list:
//! longest pattern first, first match wins.

use log::warn;
use regex::Regex;

/// District number used when nothing resolves. Sorts after every real
/// district.
pub const UNKNOWN_DISTRICT: &str = "00";

/// Known district names, longest first so that fuzzy containment can never
/// pick a shorter name that happens to be a substring probe of a longer
/// one. Ties keep ascending district order.
fn district_patterns() -> &'static [(&'static str, &'static str)] {
    &[
        ("SAN SEBASTIAN DE PALMITAS", "50"),
        ("SAN ANTONIO DE PRADO", "80"),
        ("LAURELES/ESTADIO", "11"),
        ("DOCE DE OCTUBRE", "06"),
        ("VILLA HERMOSA", "08"),
        ("LA CANDELARIA", "10"),
        ("SAN CRISTOBAL", "60"),
        ("BUENOS AIRES", "09"),
        ("SANTA ELENA", "90"),
        ("SANTA CRUZ", "02"),
        ("LA AMERICA", "12"),
        ("SAN JAVIER", "13"),
        ("ALTAVISTA", "70"),
        ("MANRIQUE", "03"),
        ("ARANJUEZ", "04"),
        ("CASTILLA", "05"),
        ("GUAYABAL", "15"),
        ("POPULAR", "01"),
        ("ROBLEDO", "07"),
        ("POBLADO", "14"),
        ("BELEN", "16"),
    ]
}

/// Raw comuna code to "NN - NAME" display. Low-stratum (..123) and
/// high-stratum (..456) variants of one district are distinct codes.
fn code_display_names() -> &'static [(&'static str, &'static str)] {
    &[
        ("90456", "90 - SANTA ELENA"),
        ("16456", "16 - BELEN"),
        ("15456", "15 - GUAYABAL"),
        ("14456", "14 - POBLADO"),
        ("12456", "12 - LA AMERICA"),
        ("11456", "11 - LAURELES/ESTADIO"),
        ("10456", "10 - LA CANDELARIA"),
        ("8456", "08 - VILLA HERMOSA"),
        ("90123", "90 - SANTA ELENA"),
        ("80123", "80 - SAN ANTONIO DE PRADO"),
        ("70123", "70 - ALTAVISTA"),
        ("60123", "60 - SAN CRISTOBAL"),
        ("50123", "50 - SAN SEBASTIAN DE PALMITAS"),
        ("16123", "16 - BELEN"),
        ("15123", "15 - GUAYABAL"),
        ("14123", "14 - POBLADO"),
        ("13123", "13 - SAN JAVIER"),
        ("12123", "12 - LA AMERICA"),
        ("11123", "11 - LAURELES/ESTADIO"),
        ("10123", "10 - LA CANDELARIA"),
        ("9123", "09 - BUENOS AIRES"),
        ("8123", "08 - VILLA HERMOSA"),
        ("7123", "07 - ROBLEDO"),
        ("7456", "07 - ROBLEDO"),
        ("6123", "06 - DOCE DE OCTUBRE"),
        ("5123", "05 - CASTILLA"),
        ("4123", "04 - ARANJUEZ"),
        ("3123", "03 - MANRIQUE"),
        ("2123", "02 - SANTA CRUZ"),
        ("1123", "01 - POPULAR"),
    ]
}

pub struct ComunaResolver {
    digit_run: Regex,
}

impl ComunaResolver {
    pub fn new() -> Self {
        // A literal pattern always compiles.
        let digit_run = Regex::new(r"\d{2}").unwrap();
        Self { digit_run }
    }

    /// Resolve any district identifier or name to a two-digit number.
    ///
    /// Total: tries the name table first (case-insensitive containment in
    /// both directions), then the first two-digit run in the input, and
    /// finally [`UNKNOWN_DISTRICT`]. Empty input resolves to unknown
    /// directly so it cannot fuzzy-match everything.
    pub fn district_number(&self, raw: &str) -> String {
        let probe = raw.trim().to_uppercase();
        if !probe.is_empty() {
            for (pattern, number) in district_patterns() {
                if probe.contains(pattern) || pattern.contains(probe.as_str()) {
                    return (*number).to_string();
                }
            }
            if let Some(m) = self.digit_run.find(&probe) {
                return m.as_str().to_string();
            }
        }
        warn!("district number unresolved for '{raw}'");
        UNKNOWN_DISTRICT.to_string()
    }
}

impl Default for ComunaResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Display name for a raw comuna code ("13123" resolves to
/// "13 - SAN JAVIER"). Unmapped codes fall back to "Comuna {code}".
pub fn canonical_display_name(code: &str) -> String {
    let trimmed = code.trim();
    for (known, display) in code_display_names() {
        if *known == trimmed {
            return (*display).to_string();
        }
    }
    format!("Comuna {trimmed}")
}

/// Strip the "NN - " prefix from a display name ("13 - SAN JAVIER" becomes
/// "SAN JAVIER"). Names without the prefix pass through.
pub fn base_name(display: &str) -> String {
    match display.split_once(" - ") {
        Some((_, rest)) => rest.to_string(),
        None => display.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_table_is_ordered_longest_first() {
        let patterns = district_patterns();
        for pair in patterns.windows(2) {
            assert!(
                pair[0].0.len() >= pair[1].0.len(),
                "'{}' must not come before the longer '{}'",
                pair[0].0,
                pair[1].0
            );
        }
    }

    #[test]
    fn every_pattern_number_is_two_digits() {
        for (pattern, number) in district_patterns() {
            assert_eq!(number.len(), 2, "bad number for {pattern}");
            assert!(number.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn every_code_maps_to_prefixed_display() {
        for (code, display) in code_display_names() {
            assert!(
                display.split_once(" - ").is_some(),
                "display '{display}' for code {code} lacks the NN - prefix"
            );
        }
    }

    #[test]
    fn display_prefix_matches_pattern_table() {
        let resolver = ComunaResolver::new();
        for (_, display) in code_display_names() {
            let name = base_name(display);
            let number = resolver.district_number(&name);
            assert!(
                display.starts_with(&number),
                "'{display}' does not start with resolved number {number}"
            );
        }
    }
}
