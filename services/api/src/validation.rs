//! Input validation for book payloads

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{BookUpdate, NewBook};

/// Validate book title
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title is required".to_string());
    }

    if title.chars().count() > 200 {
        return Err("Title must be at most 200 characters long".to_string());
    }

    Ok(())
}

/// Validate price
pub fn validate_price(price: f64) -> Result<(), String> {
    if !price.is_finite() {
        return Err("Price must be a number".to_string());
    }

    if price < 0.0 {
        return Err("Price cannot be negative".to_string());
    }

    Ok(())
}

/// Validate cover image URL
pub fn validate_cover_image(cover_image: &str) -> Result<(), String> {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = URL_REGEX.get_or_init(|| {
        Regex::new(r"^https?://[^\s/?#]+[^\s]*$").expect("Failed to compile cover image regex")
    });

    if !regex.is_match(cover_image) {
        return Err("Cover image must be an http(s) URL".to_string());
    }

    Ok(())
}

/// Validate a publish payload
pub fn validate_new_book(new_book: &NewBook) -> Result<(), String> {
    validate_title(&new_book.title)?;
    validate_price(new_book.price)?;
    if let Some(cover_image) = &new_book.cover_image {
        validate_cover_image(cover_image)?;
    }
    Ok(())
}

/// Validate every present field of a partial update
pub fn validate_book_update(update: &BookUpdate) -> Result<(), String> {
    if let Some(title) = &update.title {
        validate_title(title)?;
    }
    if let Some(price) = update.price {
        validate_price(price)?;
    }
    if let Some(cover_image) = &update.cover_image {
        validate_cover_image(cover_image)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_must_be_finite_and_non_negative() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(16.5).is_ok());
        assert!(validate_price(-0.01).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }

    #[test]
    fn test_cover_image_must_be_http_url() {
        assert!(validate_cover_image("http://example.com/covers/endor.jpg").is_ok());
        assert!(
            validate_cover_image(
                "https://static.wikia.nocookie.net/starwars/images/7/73/WookieeTrio.png?cb=20230810013600"
            )
            .is_ok()
        );
        assert!(validate_cover_image("covers/endor.jpg").is_err());
        assert!(validate_cover_image("ftp://example.com/a.jpg").is_err());
        assert!(validate_cover_image("http://").is_err());
    }

    #[test]
    fn test_update_checks_only_present_fields() {
        assert!(validate_book_update(&BookUpdate::default()).is_ok());

        let update = BookUpdate {
            title: Some(" ".to_string()),
            ..BookUpdate::default()
        };
        assert_eq!(validate_book_update(&update), Err("Title is required".to_string()));
    }
}
