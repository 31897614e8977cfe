use uuid::Uuid;

/// Length of a hyphenated 8-4-4-4-12 identifier.
pub const IDENTIFIER_LEN: usize = 36;

const SEPARATOR_POSITIONS: [usize; 4] = [8, 13, 18, 23];

/// Split a base name into `(stem, extension)`. The extension starts at the
/// last `.` and keeps it, so `archive.tar.gz` gives `("archive.tar", ".gz")`
/// and `README` gives `("README", "")`.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) => name.split_at(idx),
        None => (name, ""),
    }
}

/// Shape check only: the stem is 36 bytes with `-` at 8, 13, 18 and 23.
/// The other characters are not checked for hex digits.
pub fn looks_like_generated(name: &str) -> bool {
    let (stem, _) = split_extension(name);
    let bytes = stem.as_bytes();
    if bytes.len() != IDENTIFIER_LEN {
        return false;
    }
    SEPARATOR_POSITIONS.iter().all(|&pos| bytes[pos] == b'-')
}

/// Fresh random identifier followed by the original extension.
pub fn generate_name(original_name: &str) -> String {
    let (_, ext) = split_extension(original_name);
    format!("{}{}", Uuid::new_v4().hyphenated(), ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "123e4567-e89b-12d3-a456-426614174000";

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("report.PDF"), ("report", ".PDF"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension("README"), ("README", ""));
        assert_eq!(split_extension(".bashrc"), ("", ".bashrc"));
        assert_eq!(split_extension(""), ("", ""));
    }

    #[test]
    fn test_generated_names_round_trip() {
        for original in ["alpha.txt", "README", "report.PDF", "a.b.c", ".hidden", ""] {
            let generated = generate_name(original);
            assert!(
                looks_like_generated(&generated),
                "{} -> {} should classify as generated",
                original,
                generated
            );
        }
    }

    #[test]
    fn test_extension_preserved() {
        let pdf = generate_name("report.PDF");
        assert!(pdf.ends_with(".PDF"));
        assert_eq!(pdf.len(), IDENTIFIER_LEN + 4);

        let bare = generate_name("README");
        assert_eq!(bare.len(), IDENTIFIER_LEN);
        assert!(!bare.contains('.'));
    }

    #[test]
    fn test_generated_names_differ() {
        assert_ne!(generate_name("a.txt"), generate_name("a.txt"));
    }

    #[test]
    fn test_classifier_accepts_identifier_shape() {
        assert!(looks_like_generated(SAMPLE));
        assert!(looks_like_generated(&format!("{}.jpg", SAMPLE)));
        // Shape only, hex digits are not required.
        assert!(looks_like_generated("zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz.txt"));
    }

    #[test]
    fn test_classifier_boundary() {
        for pos in SEPARATOR_POSITIONS {
            let mut moved: Vec<u8> = SAMPLE.as_bytes().to_vec();
            moved[pos] = b'0';
            moved[pos + 1] = b'-';
            let moved = String::from_utf8(moved).unwrap();
            assert!(!looks_like_generated(&moved), "{}", moved);
        }

        let longer = format!("{}0", SAMPLE);
        assert!(!looks_like_generated(&longer));
        let shorter = &SAMPLE[..IDENTIFIER_LEN - 1];
        assert!(!looks_like_generated(shorter));
    }

    #[test]
    fn test_classifier_short_and_odd_input() {
        assert!(!looks_like_generated(""));
        assert!(!looks_like_generated("."));
        assert!(!looks_like_generated("alpha.txt"));
        assert!(!looks_like_generated("a-b-c-d"));
        // 36 bytes but multi-byte characters must not panic.
        let wide = "ééééééééééééééééé-zz";
        assert!(!looks_like_generated(wide));
    }
}
