//! GST state code utilities.
//!
//! The first two characters of every GSTIN are the numeric code of the
//! state or union territory the taxpayer is registered in. This module maps
//! those codes to jurisdiction names.

/// Every recognized two-digit GST state code.
pub const REGION_CODES: &[&str] = &[
    "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12", "13", "14", "15", "16",
    "17", "18", "19", "20", "21", "22", "23", "24", "26", "27", "29", "30", "31", "32", "33", "34",
    "35", "36", "37", "38", "97", "99",
];

/// Name returned for any code outside [`REGION_CODES`].
pub const UNKNOWN_REGION: &str = "Unknown";

/// Maps a two-digit GST state code to the state or territory name.
///
/// Returns [`UNKNOWN_REGION`] for unrecognized codes.
#[must_use]
pub fn region_name(code: &str) -> &'static str {
    match code {
        "01" => "Jammu and Kashmir",
        "02" => "Himachal Pradesh",
        "03" => "Punjab",
        "04" => "Chandigarh",
        "05" => "Uttarakhand",
        "06" => "Haryana",
        "07" => "Delhi",
        "08" => "Rajasthan",
        "09" => "Uttar Pradesh",
        "10" => "Bihar",
        "11" => "Sikkim",
        "12" => "Arunachal Pradesh",
        "13" => "Nagaland",
        "14" => "Manipur",
        "15" => "Mizoram",
        "16" => "Tripura",
        "17" => "Meghalaya",
        "18" => "Assam",
        "19" => "West Bengal",
        "20" => "Jharkhand",
        "21" => "Odisha",
        "22" => "Chhattisgarh",
        "23" => "Madhya Pradesh",
        "24" => "Gujarat",
        "26" => "Dadra and Nagar Haveli and Daman and Diu",
        "27" => "Maharashtra",
        "29" => "Karnataka",
        "30" => "Goa",
        "31" => "Lakshadweep",
        "32" => "Kerala",
        "33" => "Tamil Nadu",
        "34" => "Puducherry",
        "35" => "Andaman and Nicobar Islands",
        "36" => "Telangana",
        "37" => "Andhra Pradesh",
        "38" => "Ladakh",
        "97" => "Other Territory",
        "99" => "Centre Jurisdiction",
        _ => UNKNOWN_REGION,
    }
}

/// Derives the region name from a GSTIN's two-character prefix.
///
/// Identifiers shorter than two characters, or whose prefix is not a known
/// state code, resolve to [`UNKNOWN_REGION`].
#[must_use]
pub fn region_for_gstin(gstin: &str) -> &'static str {
    gstin.trim().get(..2).map_or(UNKNOWN_REGION, region_name)
}
