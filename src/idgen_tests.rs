#[cfg(test)]
mod tests {
    use crate::error::ScopeError;
    use crate::idgen::{encode, IdGenerator, IdOptions};

    fn generator(prefix: &str, alphabet: &str) -> IdGenerator {
        IdGenerator::new(&IdOptions {
            prefix: prefix.to_string(),
            suffix: String::new(),
            alphabet: alphabet.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_decimal_rollover() {
        let mut ids = IdGenerator::default();
        let produced: Vec<String> = (0..11).map(|_| ids.next_id()).collect();
        assert_eq!(produced[0], "pp_0");
        assert_eq!(produced[9], "pp_9");
        assert_eq!(produced[10], "pp_10");
        assert_eq!(ids.issued(), 11);
    }

    #[test]
    fn test_binary_alphabet_is_positional() {
        let mut ids = generator("x", "ab");
        let produced: Vec<String> = (0..6).map(|_| ids.next_id()).collect();
        assert_eq!(produced, vec!["xa", "xb", "xba", "xbb", "xbaa", "xbab"]);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut ids = IdGenerator::default();
        assert_eq!(ids.peek(), "pp_0");
        assert_eq!(ids.peek(), "pp_0");
        assert_eq!(ids.next_id(), "pp_0");
        assert_eq!(ids.peek(), "pp_1");
    }

    #[test]
    fn test_suffix_is_appended() {
        let mut ids = IdGenerator::new(&IdOptions {
            prefix: "c-".to_string(),
            suffix: "_s".to_string(),
            alphabet: "0123456789".to_string(),
        })
        .unwrap();
        assert_eq!(ids.next_id(), "c-0_s");
    }

    #[test]
    fn test_length_grows_only_on_rollover() {
        let symbols: Vec<char> = "0123456789abcdef".chars().collect();
        assert_eq!(encode(0, &symbols), "0");
        assert_eq!(encode(15, &symbols), "f");
        assert_eq!(encode(16, &symbols), "10");
        assert_eq!(encode(255, &symbols), "ff");
        assert_eq!(encode(256, &symbols), "100");
    }

    #[test]
    fn test_rejects_short_alphabet() {
        let result = IdGenerator::new(&IdOptions {
            alphabet: "a".to_string(),
            ..IdOptions::default()
        });
        assert!(matches!(result, Err(ScopeError::InvalidAlphabet { .. })));
    }

    #[test]
    fn test_rejects_duplicate_symbols() {
        let result = IdGenerator::new(&IdOptions {
            alphabet: "abca".to_string(),
            ..IdOptions::default()
        });
        assert!(matches!(result, Err(ScopeError::InvalidAlphabet { .. })));
    }

    #[test]
    fn test_rejects_prefix_starting_with_digit() {
        let result = IdGenerator::new(&IdOptions {
            prefix: "9x".to_string(),
            ..IdOptions::default()
        });
        assert!(matches!(result, Err(ScopeError::InvalidPrefix(_))));

        let empty = IdGenerator::new(&IdOptions {
            prefix: String::new(),
            ..IdOptions::default()
        });
        assert!(matches!(empty, Err(ScopeError::InvalidPrefix(_))));
    }
}
