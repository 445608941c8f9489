//! Identifier casing helpers shared by the templates

/// Scope under which generated capsule packages are published
pub const PACKAGE_SCOPE: &str = "@capsules";

fn words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in input.chars() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_ascii_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// `email-sender` becomes `EmailSender`
pub fn to_pascal_case(input: &str) -> String {
    words(input).iter().map(|w| capitalize(w)).collect()
}

/// `email-sender` becomes `emailSender`
pub fn to_camel_case(input: &str) -> String {
    let pascal = to_pascal_case(input);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// `email-sender` becomes `EMAIL_SENDER`
pub fn to_constant_case(input: &str) -> String {
    words(input)
        .iter()
        .map(|w| w.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Class-name stem for a capsule id; never starts with a digit
pub fn class_name(capsule_id: &str) -> String {
    let pascal = to_pascal_case(capsule_id);
    match pascal.chars().next() {
        None => "Capsule".to_string(),
        Some(first) if first.is_ascii_digit() => format!("Capsule{pascal}"),
        Some(_) => pascal,
    }
}

/// npm package name for a capsule id
pub fn package_name(capsule_id: &str) -> String {
    format!("{PACKAGE_SCOPE}/{capsule_id}")
}

/// Valid TypeScript identifier (ASCII subset)
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// Escape text for a single-quoted TypeScript string literal
pub fn quote(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "");
    format!("'{escaped}'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("email-sender", "EmailSender", "emailSender", "EMAIL_SENDER")]
    #[case("redis_cache", "RedisCache", "redisCache", "REDIS_CACHE")]
    #[case("httpClient", "HttpClient", "httpClient", "HTTP_CLIENT")]
    #[case("s3-uploader", "S3Uploader", "s3Uploader", "S3_UPLOADER")]
    fn test_casing(
        #[case] input: &str,
        #[case] pascal: &str,
        #[case] camel: &str,
        #[case] constant: &str,
    ) {
        assert_eq!(to_pascal_case(input), pascal);
        assert_eq!(to_camel_case(input), camel);
        assert_eq!(to_constant_case(input), constant);
    }

    #[test]
    fn test_class_and_package_names() {
        assert_eq!(class_name("email-sender"), "EmailSender");
        assert_eq!(class_name("3d-renderer"), "Capsule3dRenderer");
        assert_eq!(class_name("---"), "Capsule");
        assert_eq!(package_name("email-sender"), "@capsules/email-sender");
    }

    #[test]
    fn test_identifier_and_quote() {
        assert!(is_identifier("EmailSender"));
        assert!(is_identifier("_private$"));
        assert!(!is_identifier("3d"));
        assert!(!is_identifier(""));
        assert_eq!(quote("it's"), "'it\\'s'");
    }
}
