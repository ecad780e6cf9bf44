//! Configuration types for the product search component.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Default id of the visible query input.
pub const DEFAULT_SEARCH_INPUT_ID: &str = "product-search-input";
/// Default id of the results container.
pub const DEFAULT_RESULTS_CONTAINER_ID: &str = "search-results";
/// Default id of the hidden product id field.
pub const DEFAULT_SELECTED_PRODUCT_INPUT_ID: &str = "selected-product-id";
/// Default name attribute of the field focused after a commit.
pub const DEFAULT_QUANTITY_INPUT_NAME: &str = "totalsell";
/// Default search endpoint, relative to the page origin.
pub const DEFAULT_SEARCH_URL: &str = "/app/search-products-ajax/";

/// Resolved configuration for a product search component.
///
/// Built once via [`SearchConfig::resolve`] or [`SearchConfig::builder`] and
/// shared immutably by the component afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Id of the visible text input the user types into.
    pub search_input_id: String,

    /// Id of the element that holds the result rows.
    pub results_container_id: String,

    /// Id of the hidden input that receives the product id.
    pub selected_product_input_id: String,

    /// Name attribute of the field focused after a selection.
    pub quantity_input_name: String,

    /// Search endpoint; the query is appended as `q`.
    pub search_url: String,

    /// Minimum trimmed query length (in characters) before searching.
    pub min_search_length: usize,

    /// Quiet period after the last keystroke before a request is sent.
    pub debounce_time: Duration,

    /// Advisory maximum result count.
    pub max_results: usize,

    /// Truncate rendered results to `max_results` on the client.
    pub enforce_max_results: bool,

    /// How prices are rendered in result rows.
    pub price_format: PriceFormat,

    /// User-facing strings.
    pub text: DisplayText,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_input_id: DEFAULT_SEARCH_INPUT_ID.to_string(),
            results_container_id: DEFAULT_RESULTS_CONTAINER_ID.to_string(),
            selected_product_input_id: DEFAULT_SELECTED_PRODUCT_INPUT_ID.to_string(),
            quantity_input_name: DEFAULT_QUANTITY_INPUT_NAME.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            min_search_length: 2,
            debounce_time: Duration::from_millis(300),
            max_results: 10,
            enforce_max_results: false,
            price_format: PriceFormat::default(),
            text: DisplayText::default(),
        }
    }
}

impl SearchConfig {
    /// Merges caller overrides over the defaults.
    ///
    /// Every option that is set replaces its default; everything else keeps
    /// the default. This never fails.
    pub fn resolve(options: SearchOptions) -> Self {
        let defaults = Self::default();
        Self {
            search_input_id: options.search_input_id.unwrap_or(defaults.search_input_id),
            results_container_id: options
                .results_container_id
                .unwrap_or(defaults.results_container_id),
            selected_product_input_id: options
                .selected_product_input_id
                .unwrap_or(defaults.selected_product_input_id),
            quantity_input_name: options
                .quantity_input_name
                .unwrap_or(defaults.quantity_input_name),
            search_url: options.search_url.unwrap_or(defaults.search_url),
            min_search_length: options
                .min_search_length
                .unwrap_or(defaults.min_search_length),
            debounce_time: options
                .debounce_time_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.debounce_time),
            max_results: options.max_results.unwrap_or(defaults.max_results),
            ..defaults
        }
    }

    /// Resolves a configuration from a JSON object of camelCase options.
    pub fn from_json(overrides: &Value) -> Self {
        Self::resolve(SearchOptions::from_json(overrides))
    }

    /// Creates a builder starting from the defaults.
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::new()
    }

    /// Number of rows to render for `available` results.
    pub fn visible_result_count(&self, available: usize) -> usize {
        if self.enforce_max_results {
            available.min(self.max_results)
        } else {
            available
        }
    }
}

/// Partial set of caller-supplied options.
///
/// Unset fields fall back to the defaults in [`SearchConfig::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub search_input_id: Option<String>,
    pub results_container_id: Option<String>,
    pub selected_product_input_id: Option<String>,
    pub quantity_input_name: Option<String>,
    pub search_url: Option<String>,
    pub min_search_length: Option<usize>,
    pub debounce_time_ms: Option<u64>,
    pub max_results: Option<usize>,
}

impl SearchOptions {
    /// Reads recognized camelCase keys from a JSON object.
    ///
    /// Unknown keys are dropped. A recognized key with a value of the wrong
    /// type (including negative numbers) is logged and ignored.
    pub fn from_json(overrides: &Value) -> Self {
        let Some(map) = overrides.as_object() else {
            if !overrides.is_null() {
                tracing::warn!("Ignoring non-object product search options: {}", overrides);
            }
            return Self::default();
        };

        let mut options = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "searchInputId" => options.search_input_id = option_value(key, value),
                "resultsContainerId" => options.results_container_id = option_value(key, value),
                "selectedProductInputId" => {
                    options.selected_product_input_id = option_value(key, value)
                }
                "quantityInputName" => options.quantity_input_name = option_value(key, value),
                "searchUrl" => options.search_url = option_value(key, value),
                "minSearchLength" => options.min_search_length = option_value(key, value),
                "debounceTime" => options.debounce_time_ms = option_value(key, value),
                "maxResults" => options.max_results = option_value(key, value),
                other => tracing::debug!("Ignoring unrecognized product search option '{other}'"),
            }
        }
        options
    }
}

fn option_value<T: DeserializeOwned>(key: &str, value: &Value) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("Ignoring invalid value for option '{key}' ({value}): {e}");
            None
        }
    }
}

/// Number formatting used for prices in result rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFormat {
    /// Symbol printed before the amount
    pub currency_symbol: String,
    /// Separator between groups of three integer digits
    pub thousands_separator: char,
    /// Separator before the fraction
    pub decimal_separator: char,
    /// Fraction digits kept after rounding; trailing zeros are dropped
    pub max_fraction_digits: usize,
}

impl Default for PriceFormat {
    /// Colombian peso style: `$1.234,5`.
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            thousands_separator: '.',
            decimal_separator: ',',
            max_fraction_digits: 3,
        }
    }
}

impl PriceFormat {
    /// US style: `$1,234.5`.
    pub fn en_us() -> Self {
        Self {
            thousands_separator: ',',
            decimal_separator: '.',
            ..Self::default()
        }
    }
}

/// Strings shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayText {
    /// Placeholder row when a search matches nothing
    pub no_results: String,
    /// Label in front of the price in each row
    pub price_label: String,
    /// Prefix of the transient error row
    pub error_prefix: String,
    /// Used when a failed response carries no `error` field
    pub unknown_error: String,
}

impl Default for DisplayText {
    fn default() -> Self {
        Self {
            no_results: "No products found".to_string(),
            price_label: "Price".to_string(),
            error_prefix: "Error".to_string(),
            unknown_error: "Unknown error".to_string(),
        }
    }
}

/// Builder for creating `SearchConfig` instances.
#[derive(Debug, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the id of the visible query input.
    pub fn search_input_id(mut self, id: impl Into<String>) -> Self {
        self.config.search_input_id = id.into();
        self
    }

    /// Sets the id of the results container.
    pub fn results_container_id(mut self, id: impl Into<String>) -> Self {
        self.config.results_container_id = id.into();
        self
    }

    /// Sets the id of the hidden product id field.
    pub fn selected_product_input_id(mut self, id: impl Into<String>) -> Self {
        self.config.selected_product_input_id = id.into();
        self
    }

    /// Sets the name of the field focused after a selection.
    pub fn quantity_input_name(mut self, name: impl Into<String>) -> Self {
        self.config.quantity_input_name = name.into();
        self
    }

    /// Sets the search endpoint.
    pub fn search_url(mut self, url: impl Into<String>) -> Self {
        self.config.search_url = url.into();
        self
    }

    /// Sets the minimum query length.
    pub fn min_search_length(mut self, len: usize) -> Self {
        self.config.min_search_length = len;
        self
    }

    /// Sets the debounce interval.
    pub fn debounce_time(mut self, delay: Duration) -> Self {
        self.config.debounce_time = delay;
        self
    }

    /// Sets the advisory maximum result count.
    pub fn max_results(mut self, max: usize) -> Self {
        self.config.max_results = max;
        self
    }

    /// Truncates rendered results to `max_results`.
    pub fn enforce_max_results(mut self, enforce: bool) -> Self {
        self.config.enforce_max_results = enforce;
        self
    }

    /// Sets the price format.
    pub fn price_format(mut self, format: PriceFormat) -> Self {
        self.config.price_format = format;
        self
    }

    /// Sets the user-facing strings.
    pub fn text(mut self, text: DisplayText) -> Self {
        self.config.text = text;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> SearchConfig {
        self.config
    }
}
