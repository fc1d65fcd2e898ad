//! Variable Resolver (spec §4.3): built-in value generators a `change`
//! action can request instead of a literal `value`.

use rand::Rng;
use soulbrowser_core_types::VariableDescriptor;

const DEFAULT_LENGTH: usize = 10;
const ALPHANUMERIC: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Resolves `variable` to a concrete string. `fallback` is the action's own
/// `value`, returned as-is for any `name` outside the built-in set.
pub fn resolve(variable: &VariableDescriptor, fallback: &str) -> String {
    let length = variable.length.unwrap_or(DEFAULT_LENGTH);
    match variable.name.as_str() {
        "randomName" => random_name(length),
        "randomNumber" => random_number(length),
        "randomAlphaNumeric" => random_alphanumeric(length),
        "randomEmail" => random_email(length),
        _ => fallback.to_string(),
    }
}

fn random_name(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| (b'a' + rng.gen_range(0..26u8)) as char)
        .collect()
}

fn random_number(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| std::char::from_digit(rng.gen_range(0..10u32), 10).unwrap())
        .collect()
}

fn random_alphanumeric(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| ALPHANUMERIC[rng.gen_range(0..ALPHANUMERIC.len())] as char)
        .collect()
}

fn random_email(length: usize) -> String {
    let local_len = length.max(4);
    format!("{}@example.com", random_alphanumeric(local_len))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, length: Option<usize>) -> VariableDescriptor {
        VariableDescriptor {
            name: name.to_string(),
            length,
        }
    }

    #[test]
    fn random_name_is_lowercase_ascii_of_requested_length() {
        let value = resolve(&var("randomName", Some(16)), "fallback");
        assert_eq!(value.len(), 16);
        assert!(value.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn random_number_is_decimal_digits() {
        let value = resolve(&var("randomNumber", Some(8)), "fallback");
        assert_eq!(value.len(), 8);
        assert!(value.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn random_alphanumeric_mixes_letters_and_digits() {
        let value = resolve(&var("randomAlphaNumeric", Some(12)), "fallback");
        assert_eq!(value.len(), 12);
        assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn random_email_enforces_minimum_local_part_length() {
        let value = resolve(&var("randomEmail", Some(2)), "fallback");
        let local = value.strip_suffix("@example.com").unwrap();
        assert_eq!(local.len(), 4);
        assert!(value.ends_with("@example.com"));
    }

    #[test]
    fn default_length_is_ten() {
        let value = resolve(&var("randomName", None), "fallback");
        assert_eq!(value.len(), 10);
    }

    #[test]
    fn unknown_name_falls_back_to_actions_value() {
        let value = resolve(&var("totallyUnknown", Some(5)), "fallback-value");
        assert_eq!(value, "fallback-value");
    }
}
