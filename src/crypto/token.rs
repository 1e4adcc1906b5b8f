use crate::crypto::entropy::EntropySource;
use crate::error::Result;

/// The size of a session token in bytes.
pub const TOKEN_SIZE: usize = 16;

/// The length of a hex-encoded session token.
pub const TOKEN_HEX_LEN: usize = TOKEN_SIZE * 2;

/// Generates a new session token.
///
/// # Returns
///
/// 16 random bytes as a 32-character lowercase hex string.
pub fn generate_token(entropy: &dyn EntropySource) -> Result<String> {
    let mut token = [0u8; TOKEN_SIZE];
    entropy.fill(&mut token)?;

    Ok(hex::encode(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::entropy::OsEntropy;
    use crate::error::AppError;
    use std::collections::HashSet;

    struct NoEntropy;

    impl EntropySource for NoEntropy {
        fn fill(&self, _buf: &mut [u8]) -> Result<()> {
            Err(AppError::RandomSourceUnavailable("getrandom failed".to_string()))
        }
    }

    #[test]
    fn test_token_is_lowercase_hex() {
        let token = generate_token(&OsEntropy).unwrap();
        assert_eq!(token.len(), TOKEN_HEX_LEN);
        assert!(token.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn test_tokens_do_not_repeat() {
        let tokens: HashSet<String> = (0..1_000)
            .map(|_| generate_token(&OsEntropy).unwrap())
            .collect();
        assert_eq!(tokens.len(), 1_000);
    }

    #[test]
    fn test_entropy_failure_is_reported() {
        assert!(matches!(
            generate_token(&NoEntropy),
            Err(AppError::RandomSourceUnavailable(_))
        ));
    }
}
