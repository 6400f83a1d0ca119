//! Client for the remote prediction API
//!
//! The pipeline pushes two kinds of artifacts back to the hosted REST
//! service: per-attribute model coefficients and per-character survival
//! predictions ("PLOD", probability of death). Both exist once per dataset
//! (`book`, `show`), addressed by the dataset segment in the URL path.
//!
//! The client is synchronous ([`ureq`]), mirroring the batch nature of the
//! pipeline: uploads are issued sequentially per character, and character
//! metadata (name to URL slug) is fetched once at connect time. Write
//! operations carry a static shared-secret token in the request body.
//!
//! Payloads are validated locally before anything goes on the wire; an
//! out-of-bounds survival probability is a [`ApiError::Validation`] and is
//! never sent.

use std::{collections::BTreeMap, time::Duration};

use serde::Deserialize;
use serde_json::json;
use valar_model::Dataset;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ApiError {
    /// Payload rejected locally; nothing was sent.
    #[display("invalid payload for `{name}`: {reason}")]
    Validation { name: String, reason: String },
    /// The server answered with a non-2xx status.
    #[display("server rejected `{name}`: status {status}")]
    Remote { name: String, status: u16 },
    /// The request never completed (connection, TLS, timeout).
    #[display("request for `{name}` failed: {source}")]
    Transport {
        name: String,
        source: Box<ureq::Error>,
    },
    /// The server response could not be decoded.
    #[display("failed to decode response for `{name}`: {source}")]
    Decode {
        name: String,
        source: std::io::Error,
    },
    #[display("unknown character `{name}` in the {dataset} dataset")]
    UnknownCharacter { name: String, dataset: Dataset },
}

/// Character metadata cached at connect time.
#[derive(Debug, Clone, Deserialize)]
struct CharacterRecord {
    name: String,
    #[serde(default)]
    slug: Option<String>,
}

/// Synchronous client bound to one API root and one auth token.
#[derive(Debug)]
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
    slugs: BTreeMap<Dataset, BTreeMap<String, String>>,
}

impl ApiClient {
    /// Connects to the API and caches the character name-to-slug mapping
    /// of both datasets.
    pub fn connect(base_url: &str, token: &str) -> Result<Self, ApiError> {
        let agent = ureq::AgentBuilder::new()
            .timeout_read(Duration::from_secs(60))
            .timeout_write(Duration::from_secs(60))
            .build();
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut slugs = BTreeMap::new();
        for dataset in [Dataset::Book, Dataset::Show] {
            slugs.insert(dataset, fetch_slugs(&agent, &base_url, dataset)?);
        }

        Ok(Self {
            agent,
            base_url,
            token: token.to_string(),
            slugs,
        })
    }

    /// Number of characters known to the remote dataset.
    #[must_use]
    pub fn character_count(&self, dataset: Dataset) -> usize {
        self.slugs.get(&dataset).map_or(0, BTreeMap::len)
    }

    /// Uploads a character's survival prediction.
    ///
    /// `longevity` is the survival-probability window starting at the year
    /// `longevity_start`; `plod` is the probability of death for the
    /// coming year. All probabilities must lie in `[0, 1]` — violations
    /// are reported locally and never reach the network.
    pub fn update_plod_longevity(
        &self,
        dataset: Dataset,
        name: &str,
        longevity: &[f64],
        longevity_start: u32,
        plod: f64,
    ) -> Result<(), ApiError> {
        validate_probabilities(name, longevity, plod)?;
        let slug = self
            .slugs
            .get(&dataset)
            .and_then(|slugs| slugs.get(name))
            .ok_or_else(|| ApiError::UnknownCharacter {
                name: name.to_string(),
                dataset,
            })?;

        let body = json!({
            "token": self.token,
            "slug": slug,
            "plod": plod,
            "longevity": longevity,
            "longevityStart": longevity_start,
        });
        self.post(
            name,
            &format!("{}/{dataset}/characters/updateGroupB", self.base_url),
            &body,
        )
    }

    /// Uploads the per-attribute model coefficients of a dataset.
    pub fn update_bayesean_attributes(
        &self,
        dataset: Dataset,
        coefficients: &BTreeMap<String, f64>,
    ) -> Result<(), ApiError> {
        let body = json!({
            "token": self.token,
            "attributes": coefficients,
        });
        self.post(
            &dataset.to_string(),
            &format!("{}/{dataset}/bayesean-attributes/update", self.base_url),
            &body,
        )
    }

    fn post(&self, name: &str, url: &str, body: &serde_json::Value) -> Result<(), ApiError> {
        match self.agent.post(url).send_json(body.clone()) {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(status, _)) => Err(ApiError::Remote {
                name: name.to_string(),
                status,
            }),
            Err(err) => Err(ApiError::Transport {
                name: name.to_string(),
                source: Box::new(err),
            }),
        }
    }
}

fn fetch_slugs(
    agent: &ureq::Agent,
    base_url: &str,
    dataset: Dataset,
) -> Result<BTreeMap<String, String>, ApiError> {
    let url = format!("{base_url}/{dataset}/characters");
    let response = match agent.get(&url).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(status, _)) => {
            return Err(ApiError::Remote {
                name: dataset.to_string(),
                status,
            });
        }
        Err(err) => {
            return Err(ApiError::Transport {
                name: dataset.to_string(),
                source: Box::new(err),
            });
        }
    };
    let records: Vec<CharacterRecord> =
        response.into_json().map_err(|source| ApiError::Decode {
            name: dataset.to_string(),
            source,
        })?;

    Ok(records
        .into_iter()
        .filter_map(|record| {
            let slug = record.slug?;
            Some((record.name, slug))
        })
        .collect())
}

/// Local bounds check for an upload payload: every probability in `[0, 1]`
/// and finite.
fn validate_probabilities(name: &str, longevity: &[f64], plod: f64) -> Result<(), ApiError> {
    let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
    if !in_unit(plod) {
        return Err(ApiError::Validation {
            name: name.to_string(),
            reason: format!("plod {plod} outside [0, 1]"),
        });
    }
    if let Some(bad) = longevity.iter().find(|v| !in_unit(**v)) {
        return Err(ApiError::Validation {
            name: name.to_string(),
            reason: format!("longevity value {bad} outside [0, 1]"),
        });
    }
    Ok(())
}
