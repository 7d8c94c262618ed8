use super::{IngredientMatch, ListingMatch, VendorListing};

/// Split a recipe's free-text ingredient block into cleaned lookup terms.
///
/// The text is split on newlines and commas; each piece is trimmed and has
/// leading bullet markers (`-`, `*`, `•`) and enumeration markers
/// (`1.`, `2)`) stripped. Empty pieces are dropped. Source order is kept.
pub fn parse_ingredient_lines(text: &str) -> Vec<String> {
    text.split(['\n', ','])
        .map(strip_list_markers)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip leading whitespace, bullet markers, and enumeration markers from
/// a single ingredient line.
fn strip_list_markers(line: &str) -> &str {
    let mut rest = line.trim();

    // Bullet markers: "- butter", "* butter", "• butter"
    for marker in ["-", "*", "•"] {
        if let Some(stripped) = rest.strip_prefix(marker) {
            rest = stripped.trim_start();
        }
    }

    // Enumeration markers: "1. butter", "12) butter"
    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let after_digits = &rest[digits..];
        if let Some(stripped) = after_digits
            .strip_prefix('.')
            .or_else(|| after_digits.strip_prefix(')'))
        {
            rest = stripped.trim_start();
        }
    }

    rest.trim_end()
}

/// Cross-reference parsed ingredient lines against available vendor listings.
///
/// A listing matches a line when either string contains the other,
/// case-insensitively. Listings keep their input order; there is no
/// ranking or tie-break.
pub fn match_ingredients(lines: &[String], listings: &[VendorListing]) -> Vec<IngredientMatch> {
    lines
        .iter()
        .map(|line| {
            let term_lower = line.to_lowercase();
            let matches = listings
                .iter()
                .filter(|listing| {
                    let name_lower = listing.ingredient.name.to_lowercase();
                    term_lower.contains(&name_lower) || name_lower.contains(&term_lower)
                })
                .map(|listing| ListingMatch {
                    ingredient_id: listing.ingredient.id,
                    ingredient_name: listing.ingredient.name.clone(),
                    vendor_id: listing.ingredient.vendor_id,
                    vendor_name: listing.vendor_name.clone(),
                    price: listing.ingredient.price,
                    size: listing.ingredient.size.clone(),
                })
                .collect();

            IngredientMatch {
                term: line.clone(),
                matches,
            }
        })
        .collect()
}
