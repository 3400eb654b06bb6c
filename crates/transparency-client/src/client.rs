//! Query methods per document family.

use std::fmt;
use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use futures::future::join_all;
use tracing::{debug, instrument};
use transparency_core::{
    Area, ColumnKey, Frame, Params, Resolution, Response, Result, TimeSeries, Timestamp, Transport,
    TransparencyError, UnavailabilityTable, lookup_area, neighbours,
};
use transparency_parse::{
    GenerationOptions, LoadKind, UnavailabilityKind, aggregated_bids, crossborder_flows,
    generation, imbalance_prices, imbalance_prices_zip, imbalance_volumes, imbalance_volumes_zip,
    loads, net_positions, prices, select, unavailabilities, unavailability_document,
};

use crate::http::HttpTransport;

/// Client for the transparency platform.
///
/// Every query resolves the area, requests the window `[start, end]` from
/// the transport, parses the document and returns it in the area's local
/// time, truncated to the window (both ends inclusive).
#[derive(Clone)]
pub struct TransparencyClient {
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for TransparencyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransparencyClient")
            .field("transport", &self.transport)
            .finish()
    }
}

impl TransparencyClient {
    /// Creates a client over `transport`.
    #[must_use]
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Creates a client over a shared transport.
    #[must_use]
    pub fn from_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Creates an HTTP client with the given security token.
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self::new(HttpTransport::new(api_key))
    }

    /// Creates an HTTP client with the token from `ENTSOE_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns an error when the variable is unset.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(HttpTransport::from_env()?))
    }

    /// Returns the underlying transport.
    #[must_use]
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    async fn fetch(&self, params: Params, start: Timestamp, end: Timestamp) -> Result<Response> {
        let params =
            params.with_period(&start.with_timezone(&Utc), &end.with_timezone(&Utc))?;
        debug!(transport = self.transport.name(), ?params, "fetching document");
        self.transport.get(&params).await
    }

    async fn fetch_text(&self, params: Params, start: Timestamp, end: Timestamp) -> Result<String> {
        let response = self.fetch(params, start, end).await?;
        Ok(response.text()?.to_string())
    }

    /// Day-ahead prices at `resolution`.
    ///
    /// The request is padded by a day on both sides so that the local
    /// window is fully covered.
    ///
    /// # Errors
    ///
    /// Returns [`TransparencyError::NoMatchingData`] when nothing falls in
    /// the window, or a transport or parse error.
    #[instrument(skip(self))]
    pub async fn day_ahead_prices(
        &self,
        area: &str,
        start: Timestamp,
        end: Timestamp,
        resolution: Resolution,
    ) -> Result<TimeSeries> {
        let area = lookup_area(area)?;
        let params = Params::new()
            .with("documentType", "A44")
            .with("in_Domain", area.code)
            .with("out_Domain", area.code);
        let padding = TimeDelta::days(1);
        let text = self.fetch_text(params, start - padding, end + padding).await?;
        let series = select(prices(&text)?, resolution)?
            .tz_convert(area.tz)
            .truncate(&start, &end);
        if series.is_empty() {
            return Err(TransparencyError::NoMatchingData(format!(
                "no day-ahead prices for {area} in window"
            )));
        }
        Ok(series)
    }

    /// Net position, day-ahead or intraday.
    ///
    /// # Errors
    ///
    /// Returns [`TransparencyError::NoMatchingData`] when the document has
    /// no series at `resolution`, or a transport or parse error.
    #[instrument(skip(self))]
    pub async fn net_position(
        &self,
        area: &str,
        start: Timestamp,
        end: Timestamp,
        day_ahead: bool,
        resolution: Resolution,
    ) -> Result<TimeSeries> {
        let area = lookup_area(area)?;
        let params = Params::new()
            .with("documentType", "A25")
            .with("businessType", "B09")
            .with("Contract_MarketAgreement.Type", if day_ahead { "A01" } else { "A07" })
            .with("in_Domain", area.code)
            .with("out_Domain", area.code);
        let text = self.fetch_text(params, start, end).await?;
        Ok(net_positions(&text, resolution)?
            .tz_convert(area.tz)
            .truncate(&start, &end))
    }

    /// Realised total load.
    ///
    /// # Errors
    ///
    /// Returns a transport or parse error.
    #[instrument(skip(self))]
    pub async fn load(&self, area: &str, start: Timestamp, end: Timestamp) -> Result<Frame> {
        let area = lookup_area(area)?;
        let params = Params::new()
            .with("documentType", "A65")
            .with("processType", LoadKind::Actual.process_type())
            .with("outBiddingZone_Domain", area.code)
            .with("out_Domain", area.code);
        let text = self.fetch_text(params, start, end).await?;
        Ok(localize(loads(&text, LoadKind::Actual)?, area, start, end))
    }

    /// Load forecast for the horizon of `kind`.
    ///
    /// # Errors
    ///
    /// Returns a transport or parse error.
    #[instrument(skip(self))]
    pub async fn load_forecast(
        &self,
        area: &str,
        start: Timestamp,
        end: Timestamp,
        kind: LoadKind,
    ) -> Result<Frame> {
        let area = lookup_area(area)?;
        let params = Params::new()
            .with("documentType", "A65")
            .with("processType", kind.process_type())
            .with("outBiddingZone_Domain", area.code);
        let text = self.fetch_text(params, start, end).await?;
        Ok(localize(loads(&text, kind)?, area, start, end))
    }

    /// Actual generation per production type, optionally restricted to
    /// one `psr_type` code.
    ///
    /// # Errors
    ///
    /// Returns a transport or parse error.
    #[instrument(skip(self))]
    pub async fn generation(
        &self,
        area: &str,
        start: Timestamp,
        end: Timestamp,
        psr_type: Option<&str>,
        nett: bool,
    ) -> Result<Frame> {
        let area = lookup_area(area)?;
        let params = with_psr_type(
            Params::new()
                .with("documentType", "A75")
                .with("processType", "A16")
                .with("in_Domain", area.code),
            psr_type,
        );
        let text = self.fetch_text(params, start, end).await?;
        let options = GenerationOptions::default().with_nett(nett);
        Ok(localize(generation(&text, options)?, area, start, end))
    }

    /// Actual generation per plant.
    ///
    /// # Errors
    ///
    /// Returns a transport or parse error.
    #[instrument(skip(self))]
    pub async fn generation_per_plant(
        &self,
        area: &str,
        start: Timestamp,
        end: Timestamp,
        psr_type: Option<&str>,
        include_eic: bool,
    ) -> Result<Frame> {
        let area = lookup_area(area)?;
        let params = with_psr_type(
            Params::new()
                .with("documentType", "A73")
                .with("processType", "A16")
                .with("in_Domain", area.code),
            psr_type,
        );
        let text = self.fetch_text(params, start, end).await?;
        let options = GenerationOptions::default()
            .with_per_plant(true)
            .with_include_eic(include_eic);
        Ok(localize(generation(&text, options)?, area, start, end))
    }

    /// Installed generation capacity per production type.
    ///
    /// # Errors
    ///
    /// Returns a transport or parse error.
    #[instrument(skip(self))]
    pub async fn installed_capacity(
        &self,
        area: &str,
        start: Timestamp,
        end: Timestamp,
        psr_type: Option<&str>,
    ) -> Result<Frame> {
        let area = lookup_area(area)?;
        let params = with_psr_type(
            Params::new()
                .with("documentType", "A68")
                .with("processType", "A33")
                .with("in_Domain", area.code),
            psr_type,
        );
        let text = self.fetch_text(params, start, end).await?;
        Ok(localize(generation(&text, GenerationOptions::default())?, area, start, end))
    }

    /// Physical flows from `from` into `to`, in the local time of `from`.
    ///
    /// # Errors
    ///
    /// Returns a transport or parse error.
    #[instrument(skip(self))]
    pub async fn crossborder_flows(
        &self,
        from: &str,
        to: &str,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<TimeSeries> {
        let from = lookup_area(from)?;
        let to = lookup_area(to)?;
        let params = Params::new()
            .with("documentType", "A11")
            .with("in_Domain", to.code)
            .with("out_Domain", from.code);
        let text = self.fetch_text(params, start, end).await?;
        Ok(crossborder_flows(&text)?
            .tz_convert(from.tz)
            .truncate(&start, &end))
    }

    /// Physical flows over every border of `area`, one column per
    /// neighbour plus a `sum` column.
    ///
    /// Neighbours are queried concurrently. Borders without data and
    /// columns that are zero throughout are left out.
    ///
    /// # Errors
    ///
    /// Returns the first error other than
    /// [`TransparencyError::NoMatchingData`].
    #[instrument(skip(self))]
    pub async fn physical_crossborder_allborders(
        &self,
        area: &str,
        start: Timestamp,
        end: Timestamp,
        export: bool,
    ) -> Result<Frame> {
        let area = lookup_area(area)?;
        let borders = neighbours(area);
        let queries = borders.iter().map(|neighbour| async move {
            let flows = if export {
                self.crossborder_flows(area.name, neighbour, start, end).await
            } else {
                self.crossborder_flows(neighbour, area.name, start, end).await
            };
            (*neighbour, flows)
        });

        let mut frames = Vec::with_capacity(borders.len());
        for (neighbour, flows) in join_all(queries).await {
            match flows {
                Ok(series) => frames.push(Frame::from_series(ColumnKey::single(neighbour), &series)),
                Err(e) if e.is_no_matching_data() => {
                    debug!(%neighbour, "no flows on border");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(localize(Frame::join(frames), area, start, end)
            .retain_columns(|_, cells| cells.iter().any(|c| *c != Some(0.0)))
            .with_row_sums(ColumnKey::single("sum")))
    }

    async fn unavailability(
        &self,
        params: Params,
        kind: UnavailabilityKind,
        area: &Area,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<UnavailabilityTable> {
        let response = self.fetch(params, start, end).await?;
        let table = if response.is_zip() {
            unavailabilities(&response.body, kind)?
        } else {
            UnavailabilityTable::new(unavailability_document(response.text()?, kind)?)
        };
        debug!(records = table.len(), "unavailability records");
        Ok(table.tz_convert(area.tz).overlapping(&start, &end))
    }

    fn unavailability_params(
        document_type: &str,
        area: &Area,
        doc_status: Option<&str>,
    ) -> Params {
        let mut params = Params::new()
            .with("documentType", document_type)
            .with("biddingZone_Domain", area.code);
        if let Some(status) = doc_status {
            params.set("docStatus", status);
        }
        params
    }

    /// Outages of generation units, optionally filtered by document status.
    ///
    /// # Errors
    ///
    /// Returns a transport or parse error.
    #[instrument(skip(self))]
    pub async fn unavailability_of_generation_units(
        &self,
        area: &str,
        start: Timestamp,
        end: Timestamp,
        doc_status: Option<&str>,
    ) -> Result<UnavailabilityTable> {
        let area = lookup_area(area)?;
        let params = Self::unavailability_params("A80", area, doc_status);
        self.unavailability(params, UnavailabilityKind::Production, area, start, end)
            .await
    }

    /// Outages of production units, optionally filtered by document status.
    ///
    /// # Errors
    ///
    /// Returns a transport or parse error.
    #[instrument(skip(self))]
    pub async fn unavailability_of_production_units(
        &self,
        area: &str,
        start: Timestamp,
        end: Timestamp,
        doc_status: Option<&str>,
    ) -> Result<UnavailabilityTable> {
        let area = lookup_area(area)?;
        let params = Self::unavailability_params("A77", area, doc_status);
        self.unavailability(params, UnavailabilityKind::Production, area, start, end)
            .await
    }

    /// Withdrawn outages of generation units.
    ///
    /// # Errors
    ///
    /// Returns a transport or parse error.
    #[instrument(skip(self))]
    pub async fn withdrawn_unavailability_of_generation_units(
        &self,
        area: &str,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<UnavailabilityTable> {
        self.unavailability_of_generation_units(area, start, end, Some("A13"))
            .await
    }

    /// Outages of transmission assets between `from` and `to`, in the local
    /// time of `from`.
    ///
    /// # Errors
    ///
    /// Returns a transport or parse error.
    #[instrument(skip(self))]
    pub async fn unavailability_transmission(
        &self,
        from: &str,
        to: &str,
        start: Timestamp,
        end: Timestamp,
        doc_status: Option<&str>,
    ) -> Result<UnavailabilityTable> {
        let from = lookup_area(from)?;
        let to = lookup_area(to)?;
        let mut params = Params::new()
            .with("documentType", "A78")
            .with("in_Domain", to.code)
            .with("out_Domain", from.code);
        if let Some(status) = doc_status {
            params.set("docStatus", status);
        }
        self.unavailability(params, UnavailabilityKind::Transmission, from, start, end)
            .await
    }

    /// Aggregated balancing energy bids for process type `A51` (aFRR) or
    /// `A47` (mFRR).
    ///
    /// # Errors
    ///
    /// Returns [`TransparencyError::InvalidParameter`] for other process
    /// types, or a transport or parse error.
    #[instrument(skip(self))]
    pub async fn aggregated_bids(
        &self,
        area: &str,
        start: Timestamp,
        end: Timestamp,
        process_type: &str,
    ) -> Result<Frame> {
        if !matches!(process_type, "A51" | "A47") {
            return Err(TransparencyError::InvalidParameter(format!(
                "aggregated bids need process type A51 or A47, got {process_type}"
            )));
        }
        let area = lookup_area(area)?;
        let params = Params::new()
            .with("documentType", "A24")
            .with("area_Domain", area.code)
            .with("processType", process_type);
        let text = self.fetch_text(params, start, end).await?;
        Ok(localize(aggregated_bids(&text)?, area, start, end))
    }

    /// Imbalance prices.
    ///
    /// # Errors
    ///
    /// Returns a transport or parse error.
    #[instrument(skip(self))]
    pub async fn imbalance_prices(
        &self,
        area: &str,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Frame> {
        let area = lookup_area(area)?;
        let params = Params::new()
            .with("documentType", "A85")
            .with("controlArea_Domain", area.code);
        let response = self.fetch(params, start, end).await?;
        let frame = if response.is_zip() {
            imbalance_prices_zip(&response.body)?
        } else {
            imbalance_prices(response.text()?)?
        };
        Ok(localize(frame, area, start, end))
    }

    /// Total imbalance volumes.
    ///
    /// # Errors
    ///
    /// Returns a transport or parse error.
    #[instrument(skip(self))]
    pub async fn imbalance_volumes(
        &self,
        area: &str,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Frame> {
        let area = lookup_area(area)?;
        let params = Params::new()
            .with("documentType", "A86")
            .with("controlArea_Domain", area.code);
        let response = self.fetch(params, start, end).await?;
        let frame = if response.is_zip() {
            imbalance_volumes_zip(&response.body)?
        } else {
            imbalance_volumes(response.text()?)?
        };
        Ok(localize(frame, area, start, end))
    }
}

fn with_psr_type(params: Params, psr_type: Option<&str>) -> Params {
    match psr_type {
        Some(code) => params.with("psrType", code),
        None => params,
    }
}

fn localize(frame: Frame, area: &Area, start: Timestamp, end: Timestamp) -> Frame {
    frame.tz_convert(area.tz).truncate(&start, &end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    use chrono::TimeZone;
    use chrono_tz::Europe::Brussels;
    use zip::write::SimpleFileOptions;

    type Responder = Box<dyn Fn(&Params) -> Result<Response> + Send + Sync>;

    struct MockTransport {
        requests: Mutex<Vec<Params>>,
        respond: Responder,
    }

    impl fmt::Debug for MockTransport {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("MockTransport").finish_non_exhaustive()
        }
    }

    #[async_trait::async_trait]
    impl Transport for MockTransport {
        fn name(&self) -> &str {
            "mock"
        }

        async fn get(&self, params: &Params) -> Result<Response> {
            self.requests.lock().unwrap().push(params.clone());
            (self.respond)(params)
        }
    }

    fn mock(
        respond: impl Fn(&Params) -> Result<Response> + Send + Sync + 'static,
    ) -> (TransparencyClient, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport {
            requests: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        });
        (TransparencyClient::from_transport(transport.clone()), transport)
    }

    fn hourly_document(label: &str, start: &str, end: &str, values: &[&str]) -> String {
        let points: String = values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("<Point><position>{}</position><{label}>{v}</{label}></Point>", i + 1))
            .collect();
        format!(
            "<Publication_MarketDocument><TimeSeries><curveType>A01</curveType>\
             <Period><timeInterval><start>{start}</start><end>{end}</end></timeInterval>\
             <resolution>PT60M</resolution>{points}</Period></TimeSeries></Publication_MarketDocument>"
        )
    }

    fn local(day: u32, hour: u32) -> Timestamp {
        Brussels.with_ymd_and_hms(2023, 1, day, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_day_ahead_prices_pad_and_truncate() {
        let (client, transport) = mock(|_| {
            Ok(Response::xml(hourly_document(
                "price.amount",
                "2022-12-31T22:00Z",
                "2023-01-01T03:00Z",
                &["1", "2", "3", "4", "5"],
            )))
        });
        let series = client
            .day_ahead_prices("BE", local(1, 0), local(1, 2), Resolution::Hour)
            .await
            .unwrap();

        assert_eq!(series.values(), vec![2.0, 3.0, 4.0]);
        assert_eq!(series.timestamps().next().copied().unwrap(), local(1, 0));
        assert_eq!(series.timestamps().next().unwrap().timezone(), Brussels);

        let requests = transport.requests.lock().unwrap();
        let params = &requests[0];
        assert_eq!(params.get("documentType"), Some("A44"));
        assert_eq!(params.get("in_Domain"), Some("10YBE----------2"));
        assert_eq!(params.get("periodStart"), Some("202212302300"));
        assert_eq!(params.get("periodEnd"), Some("202301020100"));
    }

    #[tokio::test]
    async fn test_day_ahead_prices_outside_window() {
        let (client, _) = mock(|_| {
            Ok(Response::xml(hourly_document(
                "price.amount",
                "2022-12-30T00:00Z",
                "2022-12-30T02:00Z",
                &["1", "2"],
            )))
        });
        let err = client
            .day_ahead_prices("BE", local(1, 0), local(1, 2), Resolution::Hour)
            .await
            .unwrap_err();
        assert!(err.is_no_matching_data());
    }

    #[tokio::test]
    async fn test_unknown_area() {
        let (client, transport) = mock(|_| Ok(Response::default()));
        let err = client.load("XX", local(1, 0), local(2, 0)).await.unwrap_err();
        assert!(matches!(err, TransparencyError::UnknownArea(_)));
        assert!(transport.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_parameters() {
        let (client, transport) = mock(|_| {
            Ok(Response::xml(hourly_document(
                "quantity",
                "2022-12-31T23:00Z",
                "2023-01-01T01:00Z",
                &["900", "950"],
            )))
        });
        let frame = client.load("be", local(1, 0), local(1, 1)).await.unwrap();
        assert_eq!(frame.column(&"Actual Load".into()).unwrap(), &[Some(900.0), Some(950.0)]);

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].get("processType"), Some("A16"));
        assert_eq!(requests[0].get("outBiddingZone_Domain"), Some("10YBE----------2"));
    }

    #[tokio::test]
    async fn test_allborders_skips_missing_and_zero_borders() {
        let (client, transport) = mock(|params| {
            let values = match params.get("in_Domain") {
                Some("10YFR-RTE------C") => ["100", "200"],
                Some("10YNL----------L") => ["0", "0"],
                _ => return Err(TransparencyError::NoMatchingData("border".to_string())),
            };
            Ok(Response::xml(hourly_document(
                "quantity",
                "2022-12-31T23:00Z",
                "2023-01-01T01:00Z",
                &values,
            )))
        });
        let frame = client
            .physical_crossborder_allborders("BE", local(1, 0), local(1, 1), true)
            .await
            .unwrap();

        let keys: Vec<String> = frame.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["FR", "sum"]);
        assert_eq!(frame.column(&"sum".into()).unwrap(), &[Some(100.0), Some(200.0)]);
        assert_eq!(transport.requests.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_allborders_propagates_other_errors() {
        let (client, _) = mock(|_| Err(TransparencyError::Network("down".to_string())));
        let err = client
            .physical_crossborder_allborders("BE", local(1, 0), local(1, 1), false)
            .await
            .unwrap_err();
        assert!(matches!(err, TransparencyError::Network(_)));
    }

    fn outage(mrid: &str, start: &str, end: &str) -> String {
        format!(
            "<Unavailability_MarketDocument><mRID>{mrid}</mRID><revisionNumber>1</revisionNumber>\
             <createdDateTime>2022-12-01T00:00:00Z</createdDateTime>\
             <docStatus><value>A13</value></docStatus>\
             <TimeSeries><businessType>A53</businessType><curveType>A03</curveType>\
             <production_RegisteredResource.name>Unit</production_RegisteredResource.name>\
             <Available_Period><timeInterval><start>{start}</start><end>{end}</end></timeInterval>\
             <resolution>PT60M</resolution><Point><position>1</position><quantity>0</quantity></Point>\
             </Available_Period></TimeSeries></Unavailability_MarketDocument>"
        )
    }

    fn archive(entries: &[(&str, String)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[tokio::test]
    async fn test_withdrawn_unavailability_filters_overlap() {
        let bytes = archive(&[
            ("inside.xml", outage("inside", "2023-01-01T12:00Z", "2023-01-03T00:00Z")),
            ("before.xml", outage("before", "2022-12-20T00:00Z", "2022-12-21T00:00Z")),
        ]);
        let (client, transport) = mock(move |_| Ok(Response::zip(bytes.clone())));
        let table = client
            .withdrawn_unavailability_of_generation_units("BE", local(2, 0), local(4, 0))
            .await
            .unwrap();

        assert_eq!(table.len(), 1);
        let record = &table.records()[0];
        assert_eq!(record.mrid, "inside");
        assert_eq!(record.doc_status.as_deref(), Some("Withdrawn"));
        assert_eq!(record.start.timezone(), Brussels);

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].get("documentType"), Some("A80"));
        assert_eq!(requests[0].get("docStatus"), Some("A13"));
        assert_eq!(requests[0].get("biddingZone_Domain"), Some("10YBE----------2"));
    }

    #[tokio::test]
    async fn test_aggregated_bids_process_type() {
        let (client, transport) = mock(|_| Ok(Response::default()));
        let err = client
            .aggregated_bids("BE", local(1, 0), local(2, 0), "A16")
            .await
            .unwrap_err();
        assert!(matches!(err, TransparencyError::InvalidParameter(_)));
        assert!(transport.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generation_per_plant_parameters() {
        let (client, transport) = mock(|_| Err(TransparencyError::NoMatchingData("plants".to_string())));
        let err = client
            .generation_per_plant("DE_LU", local(1, 0), local(2, 0), Some("B14"), false)
            .await
            .unwrap_err();
        assert!(err.is_no_matching_data());

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].get("documentType"), Some("A73"));
        assert_eq!(requests[0].get("psrType"), Some("B14"));
        assert_eq!(requests[0].get("in_Domain"), Some("10Y1001A1001A82H"));
    }
}
