use crate::{
    error::{AppError, Result},
    services::wish::types::{WishDraft, WishPayload},
};

/// Checks a draft and produces the payload sent to the pixel service. Pure: the same draft
/// always yields the same payload or the same error.
pub fn validate(draft: &WishDraft) -> Result<WishPayload> {
    let wish_text = draft.wish_text.trim();
    if wish_text.is_empty() {
        return Err(AppError::EmptyWishText);
    }

    let wallet_address = draft.wallet_address.trim();
    if wallet_address.is_empty() {
        return Err(AppError::MissingWalletAddress);
    }

    let color =
        normalize_color(&draft.color).ok_or_else(|| AppError::InvalidColor(draft.color.clone()))?;

    Ok(WishPayload {
        wish_text: wish_text.to_string(),
        color,
        wallet_address: wallet_address.to_string(),
        image: draft.image.clone(),
    })
}

/// Accepts `#rrggbb`, `rrggbb` and the `#rgb` shorthand; returns lowercase `#rrggbb`.
pub fn normalize_color(color: &str) -> Option<String> {
    let hex = color.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded = match hex.len() {
        6 => hex.to_ascii_lowercase(),
        3 => hex
            .chars()
            .flat_map(|c| [c, c])
            .collect::<String>()
            .to_ascii_lowercase(),
        _ => return None,
    };

    Some(format!("#{expanded}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::wish::types::ImageRef;

    fn draft(text: &str, color: &str, address: &str) -> WishDraft {
        WishDraft {
            wish_text: text.into(),
            color: color.into(),
            wallet_address: address.into(),
            image: None,
        }
    }

    #[test]
    fn whitespace_only_wish_is_empty() {
        assert!(matches!(
            validate(&draft("  ", "#abcdef", "0xdeadbeef")),
            Err(AppError::EmptyWishText)
        ));
    }

    #[test]
    fn blank_address_is_missing() {
        assert!(matches!(
            validate(&draft("peace", "#abcdef", " \t")),
            Err(AppError::MissingWalletAddress)
        ));
    }

    #[test]
    fn text_is_checked_before_address() {
        assert!(matches!(
            validate(&draft("", "#abcdef", "")),
            Err(AppError::EmptyWishText)
        ));
    }

    #[test]
    fn payload_is_trimmed_and_normalized() {
        let mut input = draft("  peace  ", "#ABCDEF", " 0xdeadbeef ");
        input.image = Some(ImageRef("uploads/42.png".into()));

        let payload = validate(&input).unwrap();
        assert_eq!(payload.wish_text, "peace");
        assert_eq!(payload.color, "#abcdef");
        assert_eq!(payload.wallet_address, "0xdeadbeef");
        assert_eq!(payload.image, Some(ImageRef("uploads/42.png".into())));
    }

    #[test]
    fn validate_is_idempotent() {
        let ok = draft("peace", "abc", "0xdeadbeef");
        assert_eq!(validate(&ok).unwrap(), validate(&ok).unwrap());

        let bad = draft("peace", "#abcdef", "");
        assert_eq!(
            validate(&bad).unwrap_err().code(),
            validate(&bad).unwrap_err().code()
        );
    }

    #[test]
    fn colors() {
        assert_eq!(normalize_color("#6366F1").as_deref(), Some("#6366f1"));
        assert_eq!(normalize_color("fa0").as_deref(), Some("#ffaa00"));
        assert_eq!(normalize_color("#12345"), None);
        assert_eq!(normalize_color("#ggg"), None);
        assert_eq!(normalize_color(""), None);
    }
}
