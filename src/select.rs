//! Detector selection and model trimming.
//!
//! A selection keeps a subset of detectors and prunes the rest of the model
//! down to the hardware those detectors actually reference: wafers, then
//! tubes and readout cards, then telescopes and crates, plus the bands the
//! surviving wafers are sensitive to.

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::model::Hardware;

/// Detector properties that patterns may match against.
const MATCH_PROPS: [&str; 7] = [
    "name",
    "band",
    "wafer_slot",
    "pol",
    "handed",
    "pixel",
    "uid",
];

/// Errors raised while building a selection.
#[derive(Error, Debug)]
pub enum SelectError {
    #[error("unknown detector property {0}")]
    UnknownProperty(String),
    #[error("invalid pattern for {0}: {1}")]
    BadPattern(String, regex::Error),
}

/// Compiled per-property matchers. Patterns for the same property are
/// alternatives; distinct properties must all match.
struct Matchers(BTreeMap<String, Vec<Regex>>);

impl Matchers {
    fn compile(matchers: &[(String, String)]) -> Result<Self, SelectError> {
        let mut compiled: BTreeMap<String, Vec<Regex>> = BTreeMap::new();
        for (prop, pattern) in matchers {
            if !MATCH_PROPS.contains(&prop.as_str()) {
                return Err(SelectError::UnknownProperty(prop.clone()));
            }
            // anchor so patterns match the whole rendered value
            let re = Regex::new(&format!("^(?:{})$", pattern))
                .map_err(|e| SelectError::BadPattern(prop.clone(), e))?;
            compiled.entry(prop.clone()).or_default().push(re);
        }
        Ok(Self(compiled))
    }

    fn matches(&self, det: &crate::model::DetectorProps) -> bool {
        self.0.iter().all(|(prop, patterns)| {
            det.prop(prop)
                .map(|value| patterns.iter().any(|re| re.is_match(&value)))
                .unwrap_or(false)
        })
    }
}

impl Hardware {
    /// Return a reduced model containing only matching detectors and the
    /// hardware that supports them.
    ///
    /// `telescopes` and `tubes` are optional name lists; an explicit tube
    /// list wins over a telescope list. `matchers` pairs a detector
    /// property name with a regex; patterns are anchored to the whole
    /// value, repeated properties are alternatives, and distinct
    /// properties must all match.
    pub fn select(
        &self,
        telescopes: Option<&[String]>,
        tubes: Option<&[String]>,
        matchers: &[(String, String)],
    ) -> Result<Hardware, SelectError> {
        let matchers = Matchers::compile(matchers)?;

        let tube_filter: Option<BTreeSet<String>> = match (tubes, telescopes) {
            (Some(tubes), _) => Some(tubes.iter().cloned().collect()),
            (None, Some(teles)) => Some(
                teles
                    .iter()
                    .filter_map(|name| self.telescopes.get(name))
                    .flat_map(|tele| tele.tubes.iter().cloned())
                    .collect(),
            ),
            (None, None) => None,
        };

        let mut out = Hardware::new();

        for (name, det) in &self.detectors {
            if let Some(filter) = &tube_filter {
                let in_tube = self
                    .wafers
                    .get(&det.wafer_slot)
                    .map(|wafer| filter.contains(&wafer.tube))
                    .unwrap_or(false);
                if !in_tube {
                    continue;
                }
            }
            if !matchers.matches(det) {
                continue;
            }
            out.detectors.insert(name.clone(), det.clone());
        }

        // prune the component tables down to what the detectors reference
        let kept_wafers: BTreeSet<String> = out
            .detectors
            .values()
            .map(|d| d.wafer_slot.clone())
            .collect();
        for slot in &kept_wafers {
            if let Some(wafer) = self.wafers.get(slot) {
                out.wafers.insert(slot.clone(), wafer.clone());
            }
        }

        let kept_tubes: BTreeSet<String> =
            out.wafers.values().map(|w| w.tube.clone()).collect();
        for name in &kept_tubes {
            if let Some(tube) = self.tubes.get(name) {
                let mut tube = tube.clone();
                tube.wafer_slots.retain(|slot| kept_wafers.contains(slot));
                out.tubes.insert(name.clone(), tube);
            }
        }

        let kept_teles: BTreeSet<String> =
            out.tubes.values().map(|t| t.telescope.clone()).collect();
        for name in &kept_teles {
            if let Some(tele) = self.telescopes.get(name) {
                let mut tele = tele.clone();
                tele.tubes.retain(|tube| kept_tubes.contains(tube));
                out.telescopes.insert(name.clone(), tele);
            }
        }

        let kept_cards: BTreeSet<String> =
            out.wafers.values().map(|w| w.card.clone()).collect();
        for name in &kept_cards {
            if let Some(card) = self.cards.get(name) {
                out.cards.insert(name.clone(), card.clone());
            }
        }

        let kept_crates: BTreeSet<String> =
            out.cards.values().map(|c| c.crate_slot.clone()).collect();
        for name in &kept_crates {
            if let Some(crate_props) = self.crates.get(name) {
                let mut crate_props = crate_props.clone();
                crate_props.card_slots.retain(|card| kept_cards.contains(card));
                out.crates.insert(name.clone(), crate_props);
            }
        }

        // bands referenced by surviving wafers (a superset of the bands
        // referenced by surviving detectors)
        let kept_bands: BTreeSet<String> = out
            .wafers
            .values()
            .flat_map(|w| w.bands.iter().cloned())
            .collect();
        for name in &kept_bands {
            if let Some(band) = self.bands.get(name) {
                out.bands.insert(name.clone(), band.clone());
            }
        }

        Ok(out)
    }
}
