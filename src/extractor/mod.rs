pub mod detail;
pub mod email;
pub mod listing;

pub use detail::{JobDetail, parse_detail};
pub use email::{EmailDecodeError, decode_obfuscated, extract_vendor_email};
pub use listing::{Listing, ListingRow, ParseError, UNKNOWN_VENDOR, parse_listing};
