//! District resolution tests: containment, digit-run fallback, defaults.

use panel_core::resolver::{base_name, canonical_display_name, ComunaResolver, UNKNOWN_DISTRICT};

/// A raw label that contains a known comuna name resolves by containment.
#[test]
fn label_containing_name_resolves() {
    let resolver = ComunaResolver::new();
    assert_eq!(resolver.district_number("COMUNA SAN JAVIER ZONA 4"), "13");
    assert_eq!(resolver.district_number("PRESUPUESTO BELEN 2024"), "16");
}

/// Containment also works the other way: a short raw label that sits
/// inside a known name still resolves to that name's district.
#[test]
fn label_inside_name_resolves() {
    let resolver = ComunaResolver::new();
    // "LAURELES" is a substring of the pattern "LAURELES/ESTADIO".
    assert_eq!(resolver.district_number("LAURELES"), "11");
}

/// Matching is case-insensitive on the raw side.
#[test]
fn matching_ignores_case() {
    let resolver = ComunaResolver::new();
    assert_eq!(resolver.district_number("comuna san javier"), "13");
    assert_eq!(resolver.district_number("  Popular  "), "01");
}

/// Longer names win over shorter ones that they contain pieces of:
/// "SAN ANTONIO DE PRADO" must not stop at a shorter SAN-prefixed name.
#[test]
fn longest_name_wins() {
    let resolver = ComunaResolver::new();
    assert_eq!(resolver.district_number("SAN ANTONIO DE PRADO"), "80");
    assert_eq!(resolver.district_number("SAN SEBASTIAN DE PALMITAS"), "50");
}

/// Labels with no name match fall back to the first two-digit run.
#[test]
fn digit_run_fallback() {
    let resolver = ComunaResolver::new();
    assert_eq!(resolver.district_number("ZONA 07"), "07");
    // First run wins: "13123" starts with "13".
    assert_eq!(resolver.district_number("13123"), "13");
}

/// Resolution is total: every input, including the empty string, yields
/// some two-digit code, defaulting to "00".
#[test]
fn unresolvable_inputs_default() {
    let resolver = ComunaResolver::new();
    assert_eq!(resolver.district_number(""), UNKNOWN_DISTRICT);
    assert_eq!(resolver.district_number("   "), UNKNOWN_DISTRICT);
    assert_eq!(resolver.district_number("ZONA X"), UNKNOWN_DISTRICT);
    assert_eq!(resolver.district_number("9"), UNKNOWN_DISTRICT, "a single digit is not a run of two");
}

/// Known codes map to their canonical "NN - NAME" display entry.
#[test]
fn display_name_for_known_codes() {
    assert_eq!(canonical_display_name("13123"), "13 - SAN JAVIER");
    assert_eq!(canonical_display_name("16456"), "16 - BELEN");
    assert_eq!(canonical_display_name("1123"), "01 - POPULAR");
}

/// Unknown codes degrade to a generic prefixed label instead of failing.
#[test]
fn display_name_falls_back() {
    assert_eq!(canonical_display_name("9999"), "Comuna 9999");
    assert_eq!(canonical_display_name(""), "Comuna ");
}

/// The base name is everything after the first " - " separator; names
/// without one pass through whole.
#[test]
fn base_name_strips_prefix() {
    assert_eq!(base_name("13 - SAN JAVIER"), "SAN JAVIER");
    assert_eq!(base_name("11 - LAURELES/ESTADIO"), "LAURELES/ESTADIO");
    assert_eq!(base_name("SANTA ELENA"), "SANTA ELENA");
}
