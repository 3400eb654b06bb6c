//! Per document-family parse configuration.

use transparency_core::Attribute;

/// Whether series of different resolutions are kept apart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MergeMode {
    /// One series per resolution.
    #[default]
    PerResolution,
    /// A single series across all resolutions.
    Merged,
}

/// Configuration for [`parse_document`](crate::parse_document) and
/// [`parse_timeseries`](crate::parse_timeseries).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Point element holding the value.
    pub value_label: String,
    /// Point element used when `value_label` is absent.
    pub fallback_label: Option<String>,
    /// Series attributes to broadcast as columns.
    pub attributes: Vec<Attribute>,
    /// How resolutions are combined.
    pub merge: MergeMode,
    /// Name of the period elements.
    pub period_label: String,
    /// Name of the series elements.
    pub series_label: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            value_label: "quantity".to_string(),
            fallback_label: None,
            attributes: Vec::new(),
            merge: MergeMode::PerResolution,
            period_label: "period".to_string(),
            series_label: "timeseries".to_string(),
        }
    }
}

impl ParseOptions {
    /// Options for quantity documents.
    #[must_use]
    pub fn quantity() -> Self {
        Self::default()
    }

    /// Options for price documents.
    #[must_use]
    pub fn prices() -> Self {
        Self::default().with_value_label("price.amount")
    }

    /// Sets the value element.
    #[must_use]
    pub fn with_value_label(mut self, label: impl Into<String>) -> Self {
        self.value_label = label.into().to_ascii_lowercase();
        self
    }

    /// Sets the fallback value element.
    #[must_use]
    pub fn with_fallback_label(mut self, label: impl Into<String>) -> Self {
        self.fallback_label = Some(label.into().to_ascii_lowercase());
        self
    }

    /// Adds an attribute column.
    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        if !self.attributes.contains(&attribute) {
            self.attributes.push(attribute);
        }
        self
    }

    /// Sets the merge mode.
    #[must_use]
    pub const fn with_merge(mut self, merge: MergeMode) -> Self {
        self.merge = merge;
        self
    }

    /// Sets the period element name.
    #[must_use]
    pub fn with_period_label(mut self, label: impl Into<String>) -> Self {
        self.period_label = label.into().to_ascii_lowercase();
        self
    }

    /// Sets the series element name.
    #[must_use]
    pub fn with_series_label(mut self, label: impl Into<String>) -> Self {
        self.series_label = label.into().to_ascii_lowercase();
        self
    }
}

/// Options for generation documents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GenerationOptions {
    /// Subtract consumption from production per production type.
    pub nett: bool,
    /// Key columns by plant name as well.
    pub per_plant: bool,
    /// Add the plant EIC code as a key level (per-plant only).
    pub include_eic: bool,
}

impl GenerationOptions {
    /// Sets nett mode.
    #[must_use]
    pub const fn with_nett(mut self, nett: bool) -> Self {
        self.nett = nett;
        self
    }

    /// Sets per-plant mode.
    #[must_use]
    pub const fn with_per_plant(mut self, per_plant: bool) -> Self {
        self.per_plant = per_plant;
        self
    }

    /// Sets whether plant EIC codes are included.
    #[must_use]
    pub const fn with_include_eic(mut self, include_eic: bool) -> Self {
        self.include_eic = include_eic;
        self
    }
}
