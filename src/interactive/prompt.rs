//
//  sourcecraft-cli
//  interactive/prompt.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::{bail, Result};
use dialoguer::{Input, Password};

/// Whether prompting is allowed: not disabled by flag and attached to a
/// terminal.
pub fn can_prompt(no_prompt: bool) -> bool {
    !no_prompt && console::user_attended()
}

pub fn prompt_input_with_default(message: &str, default: &str) -> Result<String> {
    let input: String = Input::new()
        .with_prompt(message)
        .default(default.to_string())
        .interact_text()?;
    Ok(input)
}

pub fn prompt_input_optional(message: &str) -> Result<Option<String>> {
    let input: String = Input::new()
        .with_prompt(message)
        .allow_empty(true)
        .interact_text()?;
    if input.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(input))
    }
}

pub fn prompt_password(message: &str) -> Result<String> {
    let password = Password::new().with_prompt(message).interact()?;
    Ok(password)
}

/// Returns `value`, or asks for it with `default` prefilled when allowed.
///
/// Without a terminal the default is used; an empty result is an error
/// naming `flag`.
pub fn value_or_prompt(
    value: Option<&str>,
    message: &str,
    default: Option<&str>,
    no_prompt: bool,
    flag: &str,
) -> Result<String> {
    let resolved = match value {
        Some(v) => v.to_string(),
        None if can_prompt(no_prompt) => {
            prompt_input_with_default(message, default.unwrap_or_default())?
        }
        None => default.unwrap_or_default().to_string(),
    };

    let resolved = resolved.trim().to_string();
    if resolved.is_empty() {
        bail!("{} is required", flag);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_value_skips_prompt() {
        let v = value_or_prompt(Some(" Title "), "Title", None, true, "--title").unwrap();
        assert_eq!(v, "Title");
    }

    #[test]
    fn test_default_used_without_prompt() {
        let v = value_or_prompt(None, "Title", Some("Last commit"), true, "--title").unwrap();
        assert_eq!(v, "Last commit");
    }

    #[test]
    fn test_missing_value_names_flag() {
        let err = value_or_prompt(None, "Title", None, true, "--title").unwrap_err();
        assert_eq!(err.to_string(), "--title is required");
    }
}
