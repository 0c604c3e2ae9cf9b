/// Input validators for users and chirps
///
/// - Email format and length limits
/// - Password presence
/// - Chirp length limit and profanity masking

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MIN_EMAIL_LENGTH: usize = 5;
pub const MAX_CHIRP_LENGTH: usize = 140;

/// Words replaced with `****` in chirp bodies (compared case-insensitively)
const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
const MASK: &str = "****";

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).expect("email regex is valid");
}

/// Validates an email address and returns it trimmed
pub fn is_valid_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("email".to_string()));
    }

    if trimmed.len() < MIN_EMAIL_LENGTH {
        return Err(ValidationError::TooShort("email".to_string(), MIN_EMAIL_LENGTH));
    }

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("email".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Rejects empty passwords. Strength is left to the client.
pub fn is_valid_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()));
    }
    Ok(())
}

/// Checks the chirp length and returns the body with profanity masked
pub fn validate_chirp_body(body: &str) -> Result<String, ValidationError> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ValidationError::TooLong("chirp".to_string(), MAX_CHIRP_LENGTH));
    }
    Ok(clean_body(body))
}

/// Masks profane words. Only whole space-separated words are matched, so
/// `Kerfuffle!` survives while `KERFUFFLE` does not.
pub fn clean_body(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lowered = word.to_lowercase();
            if PROFANE_WORDS.contains(&lowered.as_str()) {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("user@example.com").is_ok());
        assert!(is_valid_email("test.email@domain.co.uk").is_ok());
        assert!(is_valid_email("user+tag@example.com").is_ok());
    }

    #[test]
    fn test_email_is_trimmed() {
        assert_eq!(is_valid_email("  walt@breakingbad.com ").unwrap(), "walt@breakingbad.com");
    }

    #[test]
    fn test_invalid_email_format() {
        assert!(is_valid_email("invalid").is_err());
        assert!(is_valid_email("user@").is_err());
        assert!(is_valid_email("@example.com").is_err());
        assert!(is_valid_email("user@@example.com").is_err());
        assert!(is_valid_email("").is_err());
    }

    #[test]
    fn test_email_length_limits() {
        let too_long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            is_valid_email(&too_long),
            Err(ValidationError::TooLong(_, MAX_EMAIL_LENGTH))
        ));
        assert!(matches!(is_valid_email("a@b"), Err(ValidationError::TooShort(_, _))));
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(is_valid_password("").is_err());
        assert!(is_valid_password("04234").is_ok());
    }

    #[test]
    fn test_chirp_length_limit() {
        let exactly = "a".repeat(MAX_CHIRP_LENGTH);
        assert!(validate_chirp_body(&exactly).is_ok());

        let too_long = "a".repeat(MAX_CHIRP_LENGTH + 1);
        assert!(validate_chirp_body(&too_long).is_err());
    }

    #[test]
    fn test_clean_body_masks_profanity() {
        assert_eq!(
            clean_body("This is a kerfuffle opinion I need to share with the world"),
            "This is a **** opinion I need to share with the world"
        );
        assert_eq!(clean_body("I hear Mastodon is better than Chirpy. sharbert I need to migrate"),
            "I hear Mastodon is better than Chirpy. **** I need to migrate");
        assert_eq!(clean_body("Fornax and SHARBERT"), "**** and ****");
    }

    #[test]
    fn test_clean_body_keeps_punctuated_words() {
        assert_eq!(clean_body("Sharbert! is fine"), "Sharbert! is fine");
    }
}
