//! Base64URL codec for URL query strings and fragments.
//!
//! Output uses the RFC 4648 URL-safe alphabet without padding. Input may be
//! padded or unpadded, and links that went through a tool which rewrote the
//! alphabet back to `+`/`/` are still accepted.

use crate::error::{CryptoError, CryptoResult};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Encodes raw bytes as unpadded Base64URL.
pub fn encode_url_safe(bytes: &[u8]) -> String {
    URL_SAFE_LENIENT.encode(bytes)
}

/// Decodes Base64URL text back into raw bytes.
///
/// Fails with [`CryptoError::Decode`] on characters outside the alphabet or
/// on a length that no encoder can produce. Unused bits in the final
/// character are ignored, as browsers' `atob` does.
pub fn decode_url_safe(input: &str) -> CryptoResult<Vec<u8>> {
    let normalized: String = input
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    URL_SAFE_LENIENT
        .decode(normalized.as_bytes())
        .map_err(|e| CryptoError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_encodes_to_empty_string() {
        assert_eq!(encode_url_safe(&[]), "");
        assert!(decode_url_safe("").unwrap().is_empty());
    }

    #[test]
    fn output_has_no_padding_or_standard_symbols() {
        // 0xfb 0xff produce '+' and '/' in the standard alphabet
        let encoded = encode_url_safe(&[0xfb, 0xff, 0xbf]);
        assert_eq!(encoded, "-_-_");
        let encoded = encode_url_safe(&[0xfb]);
        assert!(!encoded.contains('='));
        assert_eq!(encoded, "-w");
    }

    #[test]
    fn padded_and_standard_alphabet_input_is_accepted() {
        assert_eq!(decode_url_safe("-w==").unwrap(), vec![0xfb]);
        assert_eq!(decode_url_safe("+/+/").unwrap(), vec![0xfb, 0xff, 0xbf]);
    }

    #[test]
    fn nonzero_trailing_bits_are_ignored() {
        // 'x' differs from 'w' only in bits past the last full byte
        assert_eq!(decode_url_safe("-x").unwrap(), vec![0xfb]);
        assert_eq!(decode_url_safe("-_-").unwrap(), decode_url_safe("-_8").unwrap());
    }

    #[test]
    fn impossible_length_is_rejected() {
        assert!(matches!(decode_url_safe("abcde"), Err(CryptoError::Decode(_))));
    }

    #[test]
    fn foreign_characters_are_rejected() {
        assert!(matches!(decode_url_safe("ab$d"), Err(CryptoError::Decode(_))));
        assert!(matches!(decode_url_safe("ab d"), Err(CryptoError::Decode(_))));
    }
}
