pub mod url_validator;

/// Generate a random lowercase-hex code of the given length.
///
/// Codes are drawn uniformly; uniqueness is the caller's concern
/// (generate, check the store, retry on collision).
pub fn generate_hex_code(length: usize) -> String {
    use std::iter;

    let chars = b"0123456789abcdef";

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// Shape check for origin codes arriving over HTTP or the admin API.
///
/// Accepts 1..=7 lowercase alphanumeric characters. Anything else cannot
/// exist in the store, so callers can skip the lookup.
pub fn is_well_formed_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= 7
        && code
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_hex_code_length_and_alphabet() {
        for len in [1, 7, 16] {
            let code = generate_hex_code(len);
            assert_eq!(code.len(), len);
            assert!(code.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_generate_hex_code_varies() {
        let a = generate_hex_code(16);
        let b = generate_hex_code(16);
        // 16 hex chars colliding by chance is not a thing
        assert_ne!(a, b);
    }

    #[test]
    fn test_is_well_formed_code() {
        assert!(is_well_formed_code("abc1234"));
        assert!(is_well_formed_code("a"));
        assert!(!is_well_formed_code(""));
        assert!(!is_well_formed_code("abcd1234"));
        assert!(!is_well_formed_code("ABC1234"));
        assert!(!is_well_formed_code("abc 123"));
        assert!(!is_well_formed_code("abc!234"));
    }
}
