//! Bidding zones and code tables of the transparency platform.
//!
//! Areas carry their EIC code and the IANA zone their data is reported in.
//! The remaining tables translate document codes into readable names.

use std::fmt;

use chrono_tz::{Europe, Tz};

use crate::error::{Result, TransparencyError};

/// A bidding zone, control area or country.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Area {
    /// Short name, e.g. `DE_LU`.
    pub name: &'static str,
    /// Energy Identification Code.
    pub code: &'static str,
    /// Human readable description.
    pub description: &'static str,
    /// Zone local data is reported in.
    pub tz: Tz,
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

const fn area(name: &'static str, code: &'static str, description: &'static str, tz: Tz) -> Area {
    Area {
        name,
        code,
        description,
        tz,
    }
}

/// Every known area.
pub const AREAS: &[Area] = &[
    area("AT", "10YAT-APG------L", "Austria, APG BZ / CA / MBA", Europe::Vienna),
    area("BE", "10YBE----------2", "Belgium, Elia BZ / CA / MBA", Europe::Brussels),
    area("CH", "10YCH-SWISSGRIDZ", "Switzerland, Swissgrid BZ / CA / MBA", Europe::Zurich),
    area("CZ", "10YCZ-CEPS-----N", "Czech Republic, CEPS BZ / CA / MBA", Europe::Prague),
    area("DE_LU", "10Y1001A1001A82H", "DE-LU MBA", Europe::Berlin),
    area("DK_1", "10YDK-1--------W", "DK1 BZ / MBA", Europe::Copenhagen),
    area("DK_2", "10YDK-2--------M", "DK2 BZ / MBA", Europe::Copenhagen),
    area("ES", "10YES-REE------0", "Spain, REE BZ / CA / MBA", Europe::Madrid),
    area("FR", "10YFR-RTE------C", "France, RTE BZ / CA / MBA", Europe::Paris),
    area("GB", "10YGB----------A", "National Grid BZ / CA / MBA", Europe::London),
    area("IT_NORD", "10Y1001A1001A73I", "IT-North BZ", Europe::Rome),
    area("NL", "10YNL----------L", "Netherlands, TenneT NL BZ / CA / MBA", Europe::Amsterdam),
    area("NO_2", "10YNO-2--------T", "NO2 BZ / MBA", Europe::Oslo),
    area("PL", "10YPL-AREA-----S", "Poland, PSE SA BZ / BZA / CA / MBA", Europe::Warsaw),
    area("PT", "10YPT-REN------W", "Portugal, REN BZ / CA / MBA", Europe::Lisbon),
    area("SE_4", "10Y1001A1001A47J", "SE4 BZ / MBA", Europe::Stockholm),
];

/// Looks up an area by short name (case-insensitive) or EIC code.
///
/// # Errors
///
/// Returns [`TransparencyError::UnknownArea`] if nothing matches.
pub fn lookup_area(key: &str) -> Result<&'static Area> {
    let key = key.trim();
    AREAS
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(key) || a.code == key)
        .ok_or_else(|| TransparencyError::UnknownArea(key.to_string()))
}

/// Returns the short names of the areas sharing a border with `area`.
#[must_use]
pub fn neighbours(area: &Area) -> &'static [&'static str] {
    match area.name {
        "AT" => &["CH", "CZ", "DE_LU", "IT_NORD"],
        "BE" => &["DE_LU", "FR", "GB", "NL"],
        "CH" => &["AT", "DE_LU", "FR", "IT_NORD"],
        "CZ" => &["AT", "DE_LU", "PL"],
        "DE_LU" => &[
            "AT", "BE", "CH", "CZ", "DK_1", "DK_2", "FR", "NL", "NO_2", "PL", "SE_4",
        ],
        "DK_1" => &["DE_LU", "DK_2", "NL", "NO_2"],
        "DK_2" => &["DE_LU", "DK_1", "SE_4"],
        "ES" => &["FR", "PT"],
        "FR" => &["BE", "CH", "DE_LU", "ES", "GB", "IT_NORD"],
        "GB" => &["BE", "FR", "NL", "NO_2"],
        "IT_NORD" => &["AT", "CH", "FR"],
        "NL" => &["BE", "DE_LU", "DK_1", "GB", "NO_2"],
        "NO_2" => &["DE_LU", "DK_1", "GB", "NL"],
        "PL" => &["CZ", "DE_LU", "SE_4"],
        "PT" => &["ES"],
        "SE_4" => &["DE_LU", "DK_2", "PL"],
        _ => &[],
    }
}

/// Returns the production type name for a PSR type code.
#[must_use]
pub fn psr_type_name(code: &str) -> Option<&'static str> {
    Some(match code {
        "A03" => "Mixed",
        "A04" => "Generation",
        "A05" => "Load",
        "B01" => "Biomass",
        "B02" => "Fossil Brown coal/Lignite",
        "B03" => "Fossil Coal-derived gas",
        "B04" => "Fossil Gas",
        "B05" => "Fossil Hard coal",
        "B06" => "Fossil Oil",
        "B07" => "Fossil Oil shale",
        "B08" => "Fossil Peat",
        "B09" => "Geothermal",
        "B10" => "Hydro Pumped Storage",
        "B11" => "Hydro Run-of-river and poundage",
        "B12" => "Hydro Water Reservoir",
        "B13" => "Marine",
        "B14" => "Nuclear",
        "B15" => "Other renewable",
        "B16" => "Solar",
        "B17" => "Waste",
        "B18" => "Wind Offshore",
        "B19" => "Wind Onshore",
        "B20" => "Other",
        "B21" => "AC Link",
        "B22" => "DC Link",
        "B23" => "Substation",
        "B24" => "Transformer",
        "B25" => "Energy storage",
        _ => return None,
    })
}

/// Returns the business type name for a business type code.
#[must_use]
pub fn business_type_name(code: &str) -> Option<&'static str> {
    Some(match code {
        "A25" => "General Capacity Information",
        "A29" => "Already allocated capacity (AAC)",
        "A43" => "Requested capacity (without price)",
        "A46" => "System Operator redispatching",
        "A53" => "Planned maintenance",
        "A54" => "Unplanned outage",
        "A85" => "Internal redispatch",
        "A95" => "Frequency containment reserve",
        "A96" => "Automatic frequency restoration reserve",
        "A97" => "Manual frequency restoration reserve",
        "A98" => "Replacement reserve",
        "B01" => "Interconnector network evolution",
        "B02" => "Interconnector network dismantling",
        "B03" => "Counter trade",
        "B04" => "Congestion costs",
        "B05" => "Capacity allocated (including price)",
        "B07" => "Auction revenue",
        "B08" => "Total nominated capacity",
        "B09" => "Net position",
        "B10" => "Congestion income",
        "B11" => "Production unit",
        _ => return None,
    })
}

/// Returns the document status name for a status code.
#[must_use]
pub fn doc_status_name(code: &str) -> Option<&'static str> {
    Some(match code {
        "A01" => "Intermediate",
        "A02" => "Final",
        "A05" => "Active",
        "A09" => "Cancelled",
        "A13" => "Withdrawn",
        "X01" => "Estimated",
        _ => return None,
    })
}
