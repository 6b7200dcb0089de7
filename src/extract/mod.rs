//! Profile page extraction
//!
//! Turns a parsed profile page into a `TherapistRecord`. The display name is
//! the only required field; everything else is looked up independently and
//! falls back to its default when the markup is missing.

mod locate;
mod price;
mod record;

pub use price::{FreeTextFees, PriceSource};
pub use record::TherapistRecord;

use crate::{ExtractError, ExtractResult};
use locate::{
    collect_list, first_text, first_text_in, select_all, ADDRESS_BLOCK, ADDRESS_LINE,
    ADDRESS_POSTAL, BREADCRUMB_LOCALITY, CLIENT_AGES, CREDENTIALS, DISPLAY_NAME, INSURANCE,
    SPECIALTIES, TELEPHONE, THERAPY_TYPES,
};
use scraper::Html;

/// Extracts a record using the free-text fee parser
///
/// # Errors
///
/// `ExtractError::MissingRequiredField` when the profile has no display name.
///
/// # Example
///
/// ```
/// use scraper::Html;
/// use therapist_crawler::extract_record;
///
/// let html = r#"<h1 class="profile-title">Jane Doe</h1>"#;
/// let record = extract_record(&Html::parse_document(html), "on").unwrap();
/// assert_eq!(record.display_name, "Jane Doe");
/// assert_eq!(record.region_code, "on");
/// ```
pub fn extract_record(document: &Html, region_code: &str) -> ExtractResult<TherapistRecord> {
    extract_record_with(document, region_code, &FreeTextFees)
}

/// Extracts a record with an explicit price source
pub fn extract_record_with<P: PriceSource>(
    document: &Html,
    region_code: &str,
    prices: &P,
) -> ExtractResult<TherapistRecord> {
    let display_name = first_text(document, &DISPLAY_NAME).ok_or(
        ExtractError::MissingRequiredField {
            field: "display_name",
        },
    )?;

    let addresses = address_blocks(document);
    let (street_address_1, street_address_2) =
        first_two_distinct(addresses.iter().filter_map(|a| a.street.clone()));
    let (zip_1, zip_2) = first_two_distinct(addresses.iter().filter_map(|a| a.postal_code.clone()));

    let title = collect_list(document, &CREDENTIALS)
        .unwrap_or_default()
        .join(", ");

    Ok(TherapistRecord {
        region_code: region_code.to_string(),
        locality_name: first_text(document, &BREADCRUMB_LOCALITY),
        street_address_1,
        street_address_2,
        zip_1,
        zip_2,
        display_name,
        title,
        telephone: first_text(document, &TELEPHONE),
        insurance_providers: collect_list(document, &INSURANCE),
        specialties: collect_list(document, &SPECIALTIES).unwrap_or_default(),
        individual_session_price: prices.individual(document),
        couple_session_price: prices.couple(document),
        therapy_types: collect_list(document, &THERAPY_TYPES).unwrap_or_default(),
        client_ages_served: collect_list(document, &CLIENT_AGES).unwrap_or_default(),
    })
}

/// One `div.address` block of a profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct AddressBlock {
    street: Option<String>,
    postal_code: Option<String>,
}

fn address_blocks(document: &Html) -> Vec<AddressBlock> {
    select_all(document, &ADDRESS_BLOCK)
        .into_iter()
        .map(|block| AddressBlock {
            street: first_text_in(block, &ADDRESS_LINE),
            // "Ottawa, ON K1P 5G4" -> "5G4": the last token of the locality line
            postal_code: first_text_in(block, &ADDRESS_POSTAL)
                .and_then(|line| line.split_whitespace().last().map(str::to_string)),
        })
        .collect()
}

/// The first value, and the second one only if it differs from the first
fn first_two_distinct(mut values: impl Iterator<Item = String>) -> (Option<String>, Option<String>) {
    let first = values.next();
    let second = values.next().filter(|second| Some(second) != first.as_ref());
    (first, second)
}
