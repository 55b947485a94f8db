#![forbid(unsafe_code)]

//! The offer used when no `--offer` file is given.

use dropneg_core::{OfferError, RawOffer};

/// A text clipping that can be dropped as plain text, HTML, or a file.
pub const SAMPLE_OFFER_JSON: &str = include_str!("../offers/clipping.json");

pub fn sample_offer() -> Result<RawOffer, OfferError> {
    RawOffer::from_json(SAMPLE_OFFER_JSON)
}
