//! The boolean-flag grammar shared by every worker's positional argument
//! list (spec.md §6): `true|1|yes` and `false|0|no`, case-insensitive.

/// A `clap` `value_parser` for the `online`/`dlc`/`isVr`/`is_custom_game`
/// style positional booleans every worker takes.
pub fn parse_spec_bool(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(format!(
            "expected one of true/1/yes or false/0/no, got \"{other}\""
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_documented_spelling() {
        for truthy in ["true", "TRUE", "1", "yes", "YES"] {
            assert_eq!(parse_spec_bool(truthy), Ok(true));
        }
        for falsy in ["false", "FALSE", "0", "no", "No"] {
            assert_eq!(parse_spec_bool(falsy), Ok(false));
        }
    }

    #[test]
    fn rejects_anything_else() {
        assert!(parse_spec_bool("maybe").is_err());
    }
}
