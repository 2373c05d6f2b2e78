/// Input validators for signup and login fields
/// Features:
/// 1. DoS Protection: input length limits
/// 2. Data Theft Protection: control-character screening
/// 3. Injection Prevention: suspicious-pattern screening

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_USERNAME_LENGTH: usize = 32;
const MIN_USERNAME_LENGTH: usize = 4;
const MAX_NAME_LENGTH: usize = 256;
const MIN_NAME_LENGTH: usize = 1;

lazy_static! {
    // Letter first, then letters/digits/._- (login identifier rules)
    static ref USERNAME_REGEX: Regex =
        Regex::new(r"^[a-zA-Z][a-zA-Z0-9._-]*$").unwrap();

    // Patterns that never belong in an identifier or display name
    static ref INJECTION_PATTERNS: [Regex; 3] = [
        Regex::new(r"(--|;|/\*|\*/)").unwrap(),
        Regex::new(r"(?i)\s+UNION\s+").unwrap(),
        Regex::new(r"(?i);\s*(INSERT|UPDATE|DELETE|DROP|CREATE|ALTER)").unwrap(),
    ];
}

/// Validates a login username
/// - Length constraints
/// - Identifier format
/// - Suspicious-pattern screening
pub fn is_valid_username(username: &str) -> Result<String, ValidationError> {
    let trimmed = username.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("username".to_string()));
    }

    if trimmed.len() < MIN_USERNAME_LENGTH {
        return Err(ValidationError::TooShort(
            "username".to_string(),
            MIN_USERNAME_LENGTH,
        ));
    }

    if trimmed.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong(
            "username".to_string(),
            MAX_USERNAME_LENGTH,
        ));
    }

    if !USERNAME_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("username".to_string()));
    }

    if contains_injection_patterns(trimmed) {
        return Err(ValidationError::SuspiciousContent("username".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Validates a member display name
/// - Length constraints
/// - Control-character screening
/// - Suspicious-pattern screening
pub fn is_valid_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("name".to_string()));
    }

    if trimmed.len() < MIN_NAME_LENGTH {
        return Err(ValidationError::TooShort("name".to_string(), MIN_NAME_LENGTH));
    }

    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong("name".to_string(), MAX_NAME_LENGTH));
    }

    if has_suspicious_name_patterns(trimmed) {
        return Err(ValidationError::SuspiciousContent("name".to_string()));
    }

    if contains_injection_patterns(trimmed) {
        return Err(ValidationError::SuspiciousContent("name".to_string()));
    }

    Ok(trimmed.to_string())
}

fn has_suspicious_name_patterns(name: &str) -> bool {
    if name.contains('\0') {
        return true;
    }

    if name.chars().any(|c| c.is_control()) {
        return true;
    }

    // Excessive special characters (potential injection)
    let special_char_count = name
        .chars()
        .filter(|c| {
            !c.is_alphanumeric() && !c.is_whitespace() && *c != '-' && *c != '.' && *c != '_' && *c != '\''
        })
        .count();

    special_char_count > 5
}

fn contains_injection_patterns(input: &str) -> bool {
    INJECTION_PATTERNS.iter().any(|pattern| pattern.is_match(input))
}
