#![no_main]

use libfuzzer_sys::fuzz_target;
use mailframe_core::StyleMap;

fuzz_target!(|data: &[u8]| {
    let Ok(css) = std::str::from_utf8(data) else {
        return;
    };
    let style = StyleMap::parse(css);

    // Names are trimmed, lowercase and unique.
    let mut names: Vec<&str> = style.iter().map(|(n, _)| n).collect();
    assert!(names.iter().all(|n| !n.is_empty() && *n == n.trim()));
    assert!(names.iter().all(|n| !n.chars().any(|c| c.is_ascii_uppercase())));
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), style.len(), "duplicate property names");

    // Serializing is stable once parsed.
    let once = style.to_css();
    assert_eq!(StyleMap::parse(&once).to_css(), once);
});
