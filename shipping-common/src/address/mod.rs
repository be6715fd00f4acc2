//! Per-country address field rules.
//!
//! Carriers validate addresses differently per destination: several reject a
//! request outright when a state/province is present for a country whose
//! postal system has none. The table below records, per ISO-style country
//! code (including the non-standard sub-codes carriers use for dependent
//! territories), which optional fields must be omitted.
//!
//! Unknown country codes default to accepting every field. Failing open is
//! deliberate: an unmodeled territory should still receive shipments, and a
//! spurious state field is rejected loudly by the carrier while a silently
//! stripped one is unrecoverable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Optional address fields a carrier may refuse per destination country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressField {
    /// State / province / region line
    State,
    /// Postal code
    PostalCode,
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressField::State => write!(f, "state"),
            AddressField::PostalCode => write!(f, "postal_code"),
        }
    }
}

/// Countries (and dependent-territory sub-codes) whose carrier validation
/// rejects a state/province field.
const NO_STATE_COUNTRIES: &[&str] = &[
    "AE", // United Arab Emirates
    "BE", // Belgium
    "DK", // Denmark
    "FR", // France
    "DE", // Germany
    "HK", // Hong Kong
    "IL", // Israel
    "KW", // Kuwait
    "NL", // Netherlands
    "NZ", // New Zealand
    "NO", // Norway
    "QA", // Qatar
    "SA", // Saudi Arabia
    "SG", // Singapore
    "SE", // Sweden
    "CH", // Switzerland
    "GB", // United Kingdom
    "IC", // Canary Islands (carrier sub-code)
    "XY", // Saint Barthelemy (carrier sub-code)
];

/// Countries whose postal systems have no postal code; carriers expect the
/// field to be absent, not empty.
const NO_POSTAL_CODE_COUNTRIES: &[&str] = &[
    "AO", // Angola
    "AW", // Aruba
    "BS", // Bahamas
    "BZ", // Belize
    "BJ", // Benin
    "BW", // Botswana
    "BF", // Burkina Faso
    "CM", // Cameroon
    "CF", // Central African Republic
    "KM", // Comoros
    "CG", // Congo
    "CD", // Congo, Democratic Republic
    "CK", // Cook Islands
    "CI", // Cote d'Ivoire
    "DJ", // Djibouti
    "DM", // Dominica
    "GQ", // Equatorial Guinea
    "ER", // Eritrea
    "FJ", // Fiji
    "GM", // Gambia
    "GH", // Ghana
    "GD", // Grenada
    "GY", // Guyana
    "HK", // Hong Kong
    "KI", // Kiribati
    "MW", // Malawi
    "ML", // Mali
    "MR", // Mauritania
    "NR", // Nauru
    "AN", // Netherlands Antilles (legacy carrier sub-code)
    "NU", // Niue
    "QA", // Qatar
    "RW", // Rwanda
    "KN", // Saint Kitts and Nevis
    "LC", // Saint Lucia
    "ST", // Sao Tome and Principe
    "SC", // Seychelles
    "SL", // Sierra Leone
    "SB", // Solomon Islands
    "SO", // Somalia
    "SR", // Suriname
    "SY", // Syria
    "TZ", // Tanzania
    "TL", // Timor-Leste
    "TK", // Tokelau
    "TO", // Tonga
    "TT", // Trinidad and Tobago
    "TV", // Tuvalu
    "UG", // Uganda
    "AE", // United Arab Emirates
    "VU", // Vanuatu
    "YE", // Yemen
    "ZW", // Zimbabwe
];

/// Returns true if carriers accept `field` for the given destination
/// country code. Matching is case-insensitive; unknown codes accept
/// everything.
pub fn accepts_field(country_code: &str, field: AddressField) -> bool {
    let code = country_code.trim().to_ascii_uppercase();
    let rejected = match field {
        AddressField::State => NO_STATE_COUNTRIES,
        AddressField::PostalCode => NO_POSTAL_CODE_COUNTRIES,
    };
    !rejected.iter().any(|c| *c == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_rejected_for_known_countries() {
        assert!(!accepts_field("GB", AddressField::State));
        assert!(!accepts_field("SG", AddressField::State));
        assert!(!accepts_field("AE", AddressField::State));
    }

    #[test]
    fn test_state_accepted_for_us_and_ca() {
        assert!(accepts_field("US", AddressField::State));
        assert!(accepts_field("CA", AddressField::State));
        assert!(accepts_field("AU", AddressField::State));
    }

    #[test]
    fn test_dependent_territory_sub_codes() {
        assert!(!accepts_field("IC", AddressField::State));
        assert!(!accepts_field("XY", AddressField::State));
    }

    #[test]
    fn test_postal_code_rules() {
        assert!(!accepts_field("HK", AddressField::PostalCode));
        assert!(!accepts_field("FJ", AddressField::PostalCode));
        assert!(accepts_field("US", AddressField::PostalCode));
        assert!(accepts_field("DE", AddressField::PostalCode));
    }

    #[test]
    fn test_unknown_country_defaults_to_accept() {
        assert!(accepts_field("ZZ", AddressField::State));
        assert!(accepts_field("ZZ", AddressField::PostalCode));
    }

    #[test]
    fn test_case_insensitive_lookup() {
        assert!(!accepts_field("gb", AddressField::State));
        assert!(!accepts_field(" gb ", AddressField::State));
    }
}
