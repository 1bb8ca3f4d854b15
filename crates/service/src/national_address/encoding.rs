//! Response body decoding.
//!
//! The provider sends JSON encoded as windows-1256 (Arabic single-byte), not
//! UTF-8. Bodies must be transcoded before parsing or Arabic place names come
//! out as mojibake.

use std::borrow::Cow;

use encoding_rs::WINDOWS_1256;
use tracing::warn;

/// Decode a windows-1256 body to UTF-8.
///
/// ASCII-only bodies are returned borrowed. Undecodable bytes become U+FFFD;
/// windows-1256 maps every byte, so that only happens on corrupted input.
pub fn decode_body(body: &[u8]) -> Cow<'_, str> {
    let (text, had_errors) = WINDOWS_1256.decode_without_bom_handling(body);
    if had_errors {
        warn!(len = body.len(), "National address response had undecodable bytes");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_is_borrowed() {
        let decoded = decode_body(br#"{"Regions":[]}"#);
        assert!(matches!(decoded, Cow::Borrowed(_)));
        assert_eq!(decoded, r#"{"Regions":[]}"#);
    }

    #[test]
    fn test_riyadh_region_name() {
        // "منطقة الرياض" in windows-1256
        let body = [
            0xE3, 0xE4, 0xD8, 0xDE, 0xC9, 0x20, 0xC7, 0xE1, 0xD1, 0xED, 0xC7, 0xD6,
        ];
        assert_eq!(decode_body(&body), "منطقة الرياض");
    }

    #[test]
    fn test_diacritics_survive() {
        // "حي العُلَيّا": damma, fatha and shadda are single bytes in windows-1256
        let body = [
            0xCD, 0xED, 0x20, 0xC7, 0xE1, 0xDA, 0xF5, 0xE1, 0xF3, 0xED, 0xF8, 0xC7,
        ];
        let decoded = decode_body(&body);
        assert_eq!(decoded, "حي العُلَيّا");
        let code_points: Vec<u32> = decoded.chars().map(u32::from).collect();
        assert_eq!(
            code_points,
            vec![
                0x62D, 0x64A, 0x20, 0x627, 0x644, 0x639, 0x64F, 0x644, 0x64E, 0x64A, 0x651, 0x627,
            ]
        );
    }

    #[test]
    fn test_utf8_input_is_not_passed_through() {
        // Bytes that happen to be valid UTF-8 are still read as windows-1256.
        let utf8 = "ر".as_bytes();
        assert_ne!(decode_body(utf8), "ر");
    }
}
