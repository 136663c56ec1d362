//! Alt-art detection
//!
//! Standard prints are hosted as `<card_number>.png`. Alternate artworks get
//! extra text after the card number (`OP01-001_p1.png`, `OP01-001_r1.png`, ...).

use optcg_common::CardRecord;

/// File extension that follows the card number for a standard print
const STANDARD_SUFFIX: &str = ".png";

/// True if the card's image is not the standard print
///
/// Looks at the text between the first occurrence of the card number in the
/// image URL and the next one (or the end). Anything other than exactly
/// `.png` is alt art, and so is a URL that does not contain the card number.
pub fn is_alt_art(card: &CardRecord) -> bool {
    suffix_after_card_number(&card.image_url, &card.card_number)
        .map_or(true, |suffix| suffix != STANDARD_SUFFIX)
}

fn suffix_after_card_number<'a>(image_url: &'a str, card_number: &str) -> Option<&'a str> {
    if card_number.is_empty() {
        return None;
    }
    image_url.split(card_number).nth(1)
}
