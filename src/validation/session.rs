use crate::crypto::token::TOKEN_HEX_LEN;
use crate::error::{AppError, Result};

/// Validates a session token taken from a request path.
///
/// # Arguments
///
/// * `token` - The token to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the token is well formed.
pub fn validate_token(token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(AppError::InvalidInput("Token not provided".to_string()));
    }

    if token.len() != TOKEN_HEX_LEN
        || !token.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    {
        return Err(AppError::InvalidInput(format!(
            "Token must be {} lowercase hexadecimal characters",
            TOKEN_HEX_LEN
        )));
    }

    Ok(())
}
