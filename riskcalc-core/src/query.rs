//! Shareable URL query parameters
//!
//! Parameters: `vector`, `likelihoodConfig`, `impactConfig`, `mapping`.
//! The three configuration parameters travel together; none of them means
//! "use a named built-in configuration". Values are percent-encoded with
//! `application/x-www-form-urlencoded` rules.

use crate::error::{Result, RiskError};
use crate::resolver::{resolve, ClassificationResult, CustomConfiguration, Selection};
use crate::vector::Vector;
use url::Url;

pub const VECTOR_PARAM: &str = "vector";
pub const LIKELIHOOD_CONFIG_PARAM: &str = "likelihoodConfig";
pub const IMPACT_CONFIG_PARAM: &str = "impactConfig";
pub const MAPPING_PARAM: &str = "mapping";

/// Raw (decoded, unparsed) query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub vector: Option<String>,
    pub likelihood_config: Option<String>,
    pub impact_config: Option<String>,
    pub mapping: Option<String>,
}

impl QueryParams {
    /// Parse a raw query string, with or without the leading `?`
    ///
    /// Unknown parameters are ignored and blank values count as absent.
    /// A repeated parameter keeps its last value.
    pub fn parse(query: &str) -> Self {
        let query = query.trim();
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut params = QueryParams::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                VECTOR_PARAM => &mut params.vector,
                LIKELIHOOD_CONFIG_PARAM => &mut params.likelihood_config,
                IMPACT_CONFIG_PARAM => &mut params.impact_config,
                MAPPING_PARAM => &mut params.mapping,
                _ => continue,
            };
            *slot = Some(value.trim().to_string()).filter(|v| !v.is_empty());
        }
        params
    }

    /// Parse the query of an absolute URL
    pub fn from_url(input: &str) -> Result<Self> {
        let url = Url::parse(input.trim())
            .map_err(|e| RiskError::format(format!("invalid URL '{}': {}", input.trim(), e)))?;
        Ok(QueryParams::parse(url.query().unwrap_or("")))
    }

    /// Accept either a full URL or a bare query string
    pub fn from_input(input: &str) -> Result<Self> {
        if input.contains("://") {
            QueryParams::from_url(input)
        } else {
            Ok(QueryParams::parse(input))
        }
    }

    /// Parameters describing a vector and, optionally, a custom configuration
    pub fn from_state(vector: &Vector, custom: Option<&CustomConfiguration>) -> Self {
        QueryParams {
            vector: Some(vector.to_bare_string()),
            likelihood_config: custom.map(|c| c.likelihood().to_text()),
            impact_config: custom.map(|c| c.impact().to_text()),
            mapping: custom.map(|c| c.mapping().to_text()),
        }
    }

    /// Whether any of the three configuration parameters is present
    pub fn has_custom_parts(&self) -> bool {
        self.likelihood_config.is_some() || self.impact_config.is_some() || self.mapping.is_some()
    }

    /// The custom configuration, `None` when no configuration parameter is present
    pub fn custom(&self) -> Result<Option<CustomConfiguration>> {
        CustomConfiguration::from_parts(
            self.likelihood_config.as_deref(),
            self.impact_config.as_deref(),
            self.mapping.as_deref(),
        )
    }

    /// Custom configuration if present, else the named one
    pub fn selection(&self, name: &str) -> Result<Selection> {
        Ok(match self.custom()? {
            Some(custom) => Selection::Custom(custom),
            None => Selection::named(name),
        })
    }

    /// The vector, all zeros when the parameter is absent
    pub fn vector(&self) -> Result<Vector> {
        match &self.vector {
            Some(text) => Vector::parse(text),
            None => Ok(Vector::zero()),
        }
    }

    /// Encode present parameters in a fixed order
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.pairs() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    fn pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (VECTOR_PARAM, self.vector.as_deref()),
            (LIKELIHOOD_CONFIG_PARAM, self.likelihood_config.as_deref()),
            (IMPACT_CONFIG_PARAM, self.impact_config.as_deref()),
            (MAPPING_PARAM, self.mapping.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
    }
}

/// Build a shareable URL for a vector and optional custom configuration
///
/// Any existing query on `base` is replaced.
pub fn share_url(
    base: &str,
    vector: &Vector,
    custom: Option<&CustomConfiguration>,
) -> Result<String> {
    let mut url = Url::parse(base.trim())
        .map_err(|e| RiskError::format(format!("invalid base URL '{}': {}", base.trim(), e)))?;
    let params = QueryParams::from_state(vector, custom);
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in params.pairs() {
            pairs.append_pair(key, value);
        }
    }
    Ok(url.to_string())
}

/// Result of [`resolve_with_fallback`]
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackResolution {
    pub result: ClassificationResult,
    pub selection: Selection,
    pub vector: Vector,
    /// Errors that triggered a fallback; empty when the query was used as given
    pub errors: Vec<RiskError>,
}

impl FallbackResolution {
    pub fn fell_back(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Resolve query parameters, falling back instead of failing
///
/// A bad configuration is replaced by the named configuration `fallback`;
/// a bad vector is replaced by the zero vector. Each replacement is logged
/// and its error returned alongside the result.
pub fn resolve_with_fallback(params: &QueryParams, fallback: &str) -> FallbackResolution {
    let mut errors = Vec::new();

    let selection = params.selection(fallback).unwrap_or_else(|e| {
        tracing::warn!(error = %e, fallback, "custom configuration rejected, using named configuration");
        errors.push(e);
        Selection::named(fallback)
    });

    let vector = params.vector().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "vector rejected, using zero vector");
        errors.push(e);
        Vector::zero()
    });

    FallbackResolution {
        result: resolve(&vector, &selection),
        selection,
        vector,
        errors,
    }
}
