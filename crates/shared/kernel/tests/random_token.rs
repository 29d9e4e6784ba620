use caphub_kernel::{SAFE_ALPHABET, TOKEN_LENGTH, random_token};

#[test]
fn generates_expected_length_and_charset() {
    let token = random_token!();
    assert_eq!(token.len(), TOKEN_LENGTH);

    for ch in token.chars() {
        assert!(SAFE_ALPHABET.contains(&ch), "unexpected character in token: {ch}");
    }
}

#[test]
fn custom_length() {
    assert_eq!(random_token!(16).len(), 16);
}

#[test]
fn tokens_do_not_repeat() {
    assert_ne!(random_token!(), random_token!());
}
