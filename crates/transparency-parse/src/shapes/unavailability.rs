//! Outage records for production units and transmission assets.

use chrono_tz::Tz;
use tracing::{debug, warn};
use transparency_core::mappings::{business_type_name, doc_status_name, psr_type_name};
use transparency_core::{
    Asset, Resolution, Result, TransparencyError, UnavailabilityRecord, UnavailabilityTable,
};

use crate::archive::parse_archive;
use crate::points::{parse_position, parse_value};
use crate::xml::{Element, parse_xml, parse_timestamp};

/// Kind of asset an unavailability document describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnavailabilityKind {
    /// Generation or production units.
    Production,
    /// Transmission infrastructure.
    Transmission,
}

impl UnavailabilityKind {
    /// Maps a document type code to the asset kind it carries.
    ///
    /// # Errors
    ///
    /// Returns [`TransparencyError::InvalidParameter`] for codes that are not
    /// unavailability documents.
    pub fn for_document_type(code: &str) -> Result<Self> {
        match code {
            "A76" | "A77" | "A80" => Ok(Self::Production),
            "A78" => Ok(Self::Transmission),
            other => Err(TransparencyError::InvalidParameter(format!(
                "{other} is not an unavailability document type"
            ))),
        }
    }
}

fn named(code: String, lookup: fn(&str) -> Option<&'static str>, what: &str) -> String {
    match lookup(&code) {
        Some(name) => name.to_string(),
        None => {
            warn!(%code, what, "unknown code, keeping it as is");
            code
        }
    }
}

fn text(series: &Element, name: &str) -> String {
    series.find_text(name).unwrap_or_default()
}

fn asset(series: &Element, kind: UnavailabilityKind) -> Result<Asset> {
    Ok(match kind {
        UnavailabilityKind::Production => {
            let plant_type = series
                .find_text("production_registeredresource.psrtype.psrtype")
                .map(|code| named(code, psr_type_name, "production type"))
                .unwrap_or_default();
            let nominal_power = series
                .find_text("production_registeredresource.psrtype.powersystemresources.nominalp")
                .map(|v| parse_value(&v))
                .transpose()?;
            Asset::Production {
                bidding_zone: text(series, "biddingzone_domain.mrid"),
                resource_id: text(series, "production_registeredresource.mrid"),
                resource_name: text(series, "production_registeredresource.name"),
                location: text(series, "production_registeredresource.location.name"),
                plant_type,
                nominal_power,
            }
        }
        UnavailabilityKind::Transmission => Asset::Transmission {
            in_domain: text(series, "in_domain.mrid"),
            out_domain: text(series, "out_domain.mrid"),
        },
    })
}

/// Parses one unavailability document into a record per available period.
///
/// Header fields (identifier, revision, creation time, status) are copied
/// onto every record. Each record takes its period's interval and the
/// position and quantity of the period's first point.
///
/// # Errors
///
/// Returns a schema error when the identifier, revision, a period's interval
/// or its first point is missing, or a parse error.
pub fn unavailability_document(
    xml: &str,
    kind: UnavailabilityKind,
) -> Result<Vec<UnavailabilityRecord>> {
    let doc = parse_xml(xml)?;
    let mrid = doc.require_text("mrid")?;
    let revision_text = doc.require_text("revisionnumber")?;
    let revision = revision_text
        .parse::<u32>()
        .map_err(|_| TransparencyError::Schema(format!("invalid revision number {revision_text:?}")))?;
    let created = doc
        .find_text("createddatetime")
        .map(|t| parse_timestamp(&t))
        .transpose()?
        .map(|t| t.with_timezone(&Tz::UTC));
    let doc_status = doc
        .find("docstatus")
        .and_then(|status| status.find_text("value"))
        .map(|code| named(code, doc_status_name, "document status"));

    let mut records = Vec::new();
    for series in doc.find_all("timeseries") {
        let business_type = series
            .find_text("businesstype")
            .map(|code| named(code, business_type_name, "business type"))
            .unwrap_or_default();
        let unit = text(series, "quantity_measure_unit.name");
        let curve_type = text(series, "curvetype");
        let asset = asset(series, kind)?;

        for period in series.find_all("available_period") {
            let point = period.require("point")?;
            records.push(UnavailabilityRecord {
                created,
                doc_status: doc_status.clone(),
                mrid: mrid.clone(),
                revision,
                business_type: business_type.clone(),
                unit: unit.clone(),
                curve_type: curve_type.clone(),
                asset: asset.clone(),
                start: period.require_timestamp("start")?.with_timezone(&Tz::UTC),
                end: period.require_timestamp("end")?.with_timezone(&Tz::UTC),
                resolution: Resolution::from_code(&period.require_text("resolution")?)?,
                position: parse_position(&point.require_text("position")?)?,
                available_quantity: parse_value(&point.require_text("quantity")?)?,
            });
        }
    }
    debug!(%mrid, revision, records = records.len(), "parsed unavailability document");
    Ok(records)
}

/// Parses an archive of unavailability documents into one table ordered by
/// creation time.
///
/// # Errors
///
/// Returns an archive or parse error.
pub fn unavailabilities(bytes: &[u8], kind: UnavailabilityKind) -> Result<UnavailabilityTable> {
    let documents = parse_archive(bytes, |xml| unavailability_document(xml, kind))?;
    Ok(UnavailabilityTable::new(documents.into_iter().flatten().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::tests::build_zip;
    use chrono::{TimeZone, Utc};

    fn production_document(mrid: &str, created: &str, status: Option<&str>) -> String {
        let status = status
            .map(|s| format!("<docStatus><value>{s}</value></docStatus>"))
            .unwrap_or_default();
        format!(
            "<Unavailability_MarketDocument><mRID>{mrid}</mRID><revisionNumber>2</revisionNumber>\
             <createdDateTime>{created}</createdDateTime>{status}\
             <TimeSeries><mRID>1</mRID><businessType>A53</businessType>\
             <biddingZone_Domain.mRID>10YBE----------2</biddingZone_Domain.mRID>\
             <quantity_Measure_Unit.name>MAW</quantity_Measure_Unit.name><curveType>A03</curveType>\
             <production_RegisteredResource.mRID>22WDOEL</production_RegisteredResource.mRID>\
             <production_RegisteredResource.name>Doel 3</production_RegisteredResource.name>\
             <production_RegisteredResource.location.name>Doel</production_RegisteredResource.location.name>\
             <production_RegisteredResource.pSRType.psrType>B14</production_RegisteredResource.pSRType.psrType>\
             <production_RegisteredResource.pSRType.powerSystemResources.nominalP>1006</production_RegisteredResource.pSRType.powerSystemResources.nominalP>\
             <Available_Period><timeInterval><start>2023-01-10T00:00Z</start><end>2023-01-12T00:00Z</end></timeInterval>\
             <resolution>PT60M</resolution><Point><position>1</position><quantity>0</quantity></Point></Available_Period>\
             <Available_Period><timeInterval><start>2023-01-12T00:00Z</start><end>2023-01-13T00:00Z</end></timeInterval>\
             <resolution>PT60M</resolution><Point><position>1</position><quantity>500</quantity></Point></Available_Period>\
             </TimeSeries></Unavailability_MarketDocument>"
        )
    }

    #[test]
    fn test_document_type_kinds() {
        assert_eq!(UnavailabilityKind::for_document_type("A80").unwrap(), UnavailabilityKind::Production);
        assert_eq!(UnavailabilityKind::for_document_type("A78").unwrap(), UnavailabilityKind::Transmission);
        assert!(UnavailabilityKind::for_document_type("A44").is_err());
    }

    #[test]
    fn test_production_record_per_period() {
        let xml = production_document("doc-a", "2023-01-01T10:00:00Z", Some("A05"));
        let records = unavailability_document(&xml, UnavailabilityKind::Production).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.mrid, "doc-a");
        assert_eq!(first.revision, 2);
        assert_eq!(first.business_type, "Planned maintenance");
        assert_eq!(first.doc_status.as_deref(), Some("Active"));
        assert_eq!(first.unit, "MAW");
        assert_eq!(first.resolution, Resolution::Hour);
        assert_eq!(first.start, Utc.with_ymd_and_hms(2023, 1, 10, 0, 0, 0).unwrap());
        match &first.asset {
            Asset::Production { resource_name, plant_type, nominal_power, .. } => {
                assert_eq!(resource_name, "Doel 3");
                assert_eq!(plant_type, "Nuclear");
                assert_eq!(*nominal_power, Some(1006.0));
            }
            Asset::Transmission { .. } => panic!("expected a production asset"),
        }
        assert_eq!(records[1].available_quantity, 500.0);
    }

    #[test]
    fn test_transmission_domains() {
        let xml = "<Unavailability_MarketDocument><mRID>t-1</mRID><revisionNumber>1</revisionNumber>\
                   <TimeSeries><businessType>A54</businessType>\
                   <in_Domain.mRID>10YFR-RTE------C</in_Domain.mRID><out_Domain.mRID>10YBE----------2</out_Domain.mRID>\
                   <Available_Period><timeInterval><start>2023-01-10T00:00Z</start><end>2023-01-11T00:00Z</end></timeInterval>\
                   <resolution>PT60M</resolution><Point><position>1</position><quantity>1200</quantity></Point></Available_Period>\
                   </TimeSeries></Unavailability_MarketDocument>";
        let records = unavailability_document(xml, UnavailabilityKind::Transmission).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].created.is_none());
        assert!(records[0].doc_status.is_none());
        assert_eq!(
            records[0].asset,
            Asset::Transmission {
                in_domain: "10YFR-RTE------C".to_string(),
                out_domain: "10YBE----------2".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_revision_is_a_schema_error() {
        let xml = "<Unavailability_MarketDocument><mRID>x</mRID></Unavailability_MarketDocument>";
        assert!(unavailability_document(xml, UnavailabilityKind::Production).is_err());
    }

    #[test]
    fn test_archive_is_ordered_by_creation() {
        let late = production_document("late", "2023-01-05T00:00:00Z", None);
        let early = production_document("early", "2023-01-02T00:00:00Z", None);
        let bytes = build_zip(&[("late.xml", late.as_str()), ("early.xml", early.as_str())]);
        let table = unavailabilities(&bytes, UnavailabilityKind::Production).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.records()[0].mrid, "early");
        assert_eq!(table.records()[3].mrid, "late");
    }
}
