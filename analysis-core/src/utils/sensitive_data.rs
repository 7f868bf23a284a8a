//! Utilities for keeping credential material out of logs

/// Mask sensitive data with asterisks while preserving some information
///
/// # Returns
/// A masked version of the value according to these rules:
/// - For values < 12 chars: Last 2 chars visible, rest masked
/// - For values >= 12 chars: Last 4 chars visible, rest masked
/// - Dashes ('-') and dots ('.') are preserved in their original positions,
///   so the shape of a JWT stays recognizable
pub fn mask_sensitive_value(value: &str) -> String {
    let value_len = value.chars().count();
    let visible_suffix_len = if value_len >= 12 { 4 } else { 2.min(value_len) };
    let prefix_len = value_len.saturating_sub(visible_suffix_len);

    value
        .chars()
        .enumerate()
        .map(|(i, c)| match c {
            '-' | '.' => c,
            _ if i < prefix_len => '*',
            _ => c,
        })
        .collect()
}

/// Mask the credential part of an `Authorization` header value.
///
/// The scheme (everything up to the first whitespace) stays readable, the
/// remainder is masked with [`mask_sensitive_value`].
pub fn mask_authorization_header(value: &str) -> String {
    match value.split_once(char::is_whitespace) {
        Some((scheme, credential)) => {
            format!("{} {}", scheme, mask_sensitive_value(credential.trim()))
        }
        None => mask_sensitive_value(value),
    }
}
