use sanctuary_crypto::{
    decode_url_safe, decrypt, decrypt_json, derive_key, encode_url_safe, encrypt, encrypt_json,
    export_key, generate_master_key, import_key, CryptoError, KdfParams, Salt,
};
use std::collections::HashSet;

// ── Codec ────────────────────────────────────────────────────────

#[test]
fn codec_roundtrip_padding_boundaries() {
    for len in [0usize, 1, 2, 3, 15, 16, 17, 31, 32, 33] {
        let bytes: Vec<u8> = (0..len).map(|i| (i * 37 % 256) as u8).collect();
        let encoded = encode_url_safe(&bytes);
        assert!(!encoded.contains('='), "len {len} produced padding");
        assert_eq!(decode_url_safe(&encoded).unwrap(), bytes, "len {len}");
    }
}

// ── Cipher ───────────────────────────────────────────────────────

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = generate_master_key();
    let sealed = encrypt(&key, b"sanctuary").unwrap();
    let plaintext = decrypt(&key, &sealed).unwrap();
    assert_eq!(plaintext.as_slice(), b"sanctuary");
}

#[test]
fn different_key_fails_with_decryption_error() {
    let k1 = generate_master_key();
    let k2 = generate_master_key();
    let sealed = encrypt_json(&k1, &vec!["note"]).unwrap();
    let result: Result<Vec<String>, _> = decrypt_json(&k2, &sealed);
    assert!(matches!(result, Err(CryptoError::Decryption)));
}

#[test]
fn nonces_are_never_repeated() {
    let key = generate_master_key();
    let mut nonces = HashSet::new();
    let mut ciphertexts = HashSet::new();
    for _ in 0..500 {
        let sealed = encrypt_json(&key, "same payload").unwrap();
        assert!(nonces.insert(sealed.iv));
        assert!(ciphertexts.insert(sealed.ciphertext));
    }
}

#[test]
fn tampered_ciphertext_fails() {
    let key = generate_master_key();
    let mut sealed = encrypt(&key, b"do not touch").unwrap();
    let mut raw = decode_url_safe(&sealed.ciphertext).unwrap();
    raw[0] ^= 0x01;
    sealed.ciphertext = encode_url_safe(&raw);
    assert!(matches!(decrypt(&key, &sealed), Err(CryptoError::Decryption)));
}

#[test]
fn tampered_nonce_fails() {
    let key = generate_master_key();
    let mut sealed = encrypt(&key, b"do not touch").unwrap();
    let mut raw = decode_url_safe(&sealed.iv).unwrap();
    raw[11] ^= 0x80;
    sealed.iv = encode_url_safe(&raw);
    assert!(matches!(decrypt(&key, &sealed), Err(CryptoError::Decryption)));
}

#[test]
fn undecodable_ciphertext_is_a_decode_error() {
    let key = generate_master_key();
    let mut sealed = encrypt(&key, b"x").unwrap();
    sealed.ciphertext.push('!');
    assert!(matches!(decrypt(&key, &sealed), Err(CryptoError::Decode(_))));
}

// ── Keys ─────────────────────────────────────────────────────────

#[test]
fn imported_key_decrypts_what_exported_key_encrypted() {
    let key = generate_master_key();
    let sealed = encrypt_json(&key, &42u32).unwrap();
    let reimported = import_key(&export_key(&key)).unwrap();
    let value: u32 = decrypt_json(&reimported, &sealed).unwrap();
    assert_eq!(value, 42);
}

#[test]
fn passcode_key_unlocks_only_with_same_passcode() {
    let params = KdfParams::new(2_000).unwrap();
    let salt = Salt::random();
    let key = derive_key("1402", &salt, &params);
    let sealed = encrypt_json(&key, "video").unwrap();

    let same = derive_key("1402", &salt, &params);
    let value: String = decrypt_json(&same, &sealed).unwrap();
    assert_eq!(value, "video");

    let wrong = derive_key("0000", &salt, &params);
    let result: Result<String, _> = decrypt_json(&wrong, &sealed);
    assert!(matches!(result, Err(CryptoError::Decryption)));
}

// ── Error display ────────────────────────────────────────────────

#[test]
fn decryption_error_is_generic() {
    assert_eq!(CryptoError::Decryption.to_string(), "decryption failed");
}

#[test]
fn key_import_error_display() {
    let err = CryptoError::KeyImport { expected: 32, actual: 5 };
    assert_eq!(err.to_string(), "invalid key length: expected 32, got 5");
}

// Property-based tests
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn codec_always_roundtrips(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let encoded = encode_url_safe(&bytes);
            prop_assert!(encoded.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
            prop_assert_eq!(decode_url_safe(&encoded).unwrap(), bytes);
        }

        #[test]
        fn cipher_always_roundtrips(text in ".{0,200}") {
            let key = generate_master_key();
            let sealed = encrypt_json(&key, &text).unwrap();
            let back: String = decrypt_json(&key, &sealed).unwrap();
            prop_assert_eq!(back, text);
        }
    }
}
