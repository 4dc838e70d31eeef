//! Item resolution as an explicit state machine.
//!
//! Every interactive step of the disambiguation flow is an enumerated state
//! with a pure transition function, so guard conditions (rarity-count check,
//! attribute-count check) are testable without any rendering or network
//! layer. Transitions are forward-only: a session that hits a dead end must
//! be restarted from the search term.

pub mod runner;

use crate::catalog::ItemCatalog;
use crate::domain::{AttributeRange, ItemVariant, ModifierFilter, Rarity};
use crate::error::{MarketError, Result};

pub use runner::{InputSource, SessionRunner, StdinSource, VariantResolver, execute_plan};

/// One selectable attribute, as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeChoice {
    pub key: String,
    pub display: String,
}

/// Everything the terminal step needs to run the analytics pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPlan {
    pub variant_id: String,
    pub name: String,
    pub rarity: Rarity,
    pub modifier: Option<ModifierFilter>,
}

impl FetchPlan {
    /// Summary text delivered alongside the chart artifact.
    pub fn summary(&self) -> String {
        let mut summary = format!("Item: {}\nRarity: {}\n", self.name, self.rarity);
        if let Some(filter) = &self.modifier {
            summary.push_str(&format!("Modifier: {}\n", filter.describe()));
        }
        summary
    }
}

/// What the driver must do to advance the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStep {
    /// Several distinct bases matched the search prefix
    ChooseBase { options: Vec<String> },
    /// Candidates span several rarity tiers
    ChooseRarity { options: Vec<Rarity> },
    /// Fetch the variant's schema and feed it back via [`ResolutionSession::resolve`]
    ResolveVariant { variant_id: String },
    /// Binary choice: apply a stat filter or skip it
    DecideModifier { variant_name: String },
    ChooseAttribute { options: Vec<AttributeChoice> },
    EnterValue { attribute: AttributeRange },
    /// Terminal: run the fetch/filter/aggregate/render pipeline
    Finalize(FetchPlan),
}

/// User input events, one per interactive step.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionInput {
    Base(String),
    Rarity(String),
    Modifier(bool),
    Attribute(String),
    Value(String),
}

enum State {
    BaseSelect { options: Vec<String> },
    RaritySelect { candidates: Vec<String>, options: Vec<Rarity> },
    AwaitSchema { variant_id: String },
    ModifierDecision { variant: ItemVariant },
    AttributeSelect { variant: ItemVariant },
    ValueEntry { variant: ItemVariant, attribute: AttributeRange },
    Finalizing,
}

/// Transient per-request resolution state. Owned by exactly one interactive
/// session and discarded when it finalizes or times out.
pub struct ResolutionSession<'a> {
    catalog: &'a ItemCatalog,
    state: State,
}

impl<'a> ResolutionSession<'a> {
    /// Open a session from a free-text search term.
    ///
    /// Fails with `Validation` when nothing matches. A single matching base
    /// skips the base-choice step entirely.
    pub fn open(catalog: &'a ItemCatalog, search_term: &str) -> Result<(Self, SessionStep)> {
        let bases = catalog.search_bases(search_term);
        if bases.is_empty() {
            return Err(MarketError::Validation(format!(
                "no items matching '{search_term}'"
            )));
        }

        if bases.len() == 1 {
            let (state, step) = after_base(catalog, bases.into_iter().next().unwrap());
            return Ok((Self { catalog, state }, step));
        }

        let step = SessionStep::ChooseBase {
            options: bases.clone(),
        };
        Ok((
            Self {
                catalog,
                state: State::BaseSelect { options: bases },
            },
            step,
        ))
    }

    /// Advance the machine with one user input.
    ///
    /// `Validation` errors leave the state untouched so the driver can
    /// re-prompt; every success moves strictly forward.
    pub fn handle(&mut self, input: SessionInput) -> Result<SessionStep> {
        let state = std::mem::replace(&mut self.state, State::Finalizing);
        match transition(self.catalog, state, input) {
            Ok((next, step)) => {
                self.state = next;
                Ok(step)
            }
            Err((previous, err)) => {
                self.state = previous;
                Err(err)
            }
        }
    }

    /// Supply the variant schema requested by [`SessionStep::ResolveVariant`].
    ///
    /// Decision rule: variants with no secondary attributes, or of a tier
    /// that never rolls them, skip the modifier flow entirely.
    pub fn resolve(&mut self, variant: ItemVariant) -> Result<SessionStep> {
        match &self.state {
            State::AwaitSchema { variant_id } => {
                debug_assert_eq!(variant_id, &variant.id);
                if variant.offers_modifier_step() {
                    let step = SessionStep::DecideModifier {
                        variant_name: variant.name.clone(),
                    };
                    self.state = State::ModifierDecision { variant };
                    Ok(step)
                } else {
                    self.state = State::Finalizing;
                    Ok(SessionStep::Finalize(plan(variant, None)))
                }
            }
            _ => Err(MarketError::Validation(
                "no variant resolution is pending".to_string(),
            )),
        }
    }
}

fn plan(variant: ItemVariant, modifier: Option<ModifierFilter>) -> FetchPlan {
    FetchPlan {
        variant_id: variant.id,
        name: variant.name,
        rarity: variant.rarity,
        modifier,
    }
}

/// Resolve a chosen base into candidates and pick the next step.
fn after_base(catalog: &ItemCatalog, base: String) -> (State, SessionStep) {
    let mut candidates = catalog.variants_of(&base);
    if candidates.is_empty() {
        // Untiered item: the base itself is the identifier
        candidates.push(base);
    }

    let rarities = ItemCatalog::rarities_of(&candidates);
    if rarities.len() > 1 {
        let step = SessionStep::ChooseRarity {
            options: rarities.clone(),
        };
        (
            State::RaritySelect {
                candidates,
                options: rarities,
            },
            step,
        )
    } else {
        let variant_id = candidates.into_iter().next().unwrap();
        let step = SessionStep::ResolveVariant {
            variant_id: variant_id.clone(),
        };
        (State::AwaitSchema { variant_id }, step)
    }
}

type Transition = std::result::Result<(State, SessionStep), (State, MarketError)>;

fn transition(catalog: &ItemCatalog, state: State, input: SessionInput) -> Transition {
    match (state, input) {
        (State::BaseSelect { options }, SessionInput::Base(choice)) => {
            match options.iter().find(|b| b.eq_ignore_ascii_case(&choice)) {
                Some(base) => Ok(after_base(catalog, base.clone())),
                None => {
                    let err = MarketError::Validation(format!(
                        "'{choice}' is not one of the offered items"
                    ));
                    Err((State::BaseSelect { options }, err))
                }
            }
        }

        (State::RaritySelect { candidates, options }, SessionInput::Rarity(label)) => {
            let chosen = label
                .trim()
                .parse::<Rarity>()
                .ok()
                .filter(|r| options.contains(r));
            let Some(rarity) = chosen else {
                let err = MarketError::Validation(format!(
                    "'{label}' is not an available rarity"
                ));
                return Err((State::RaritySelect { candidates, options }, err));
            };

            // The rarity came from the candidate set, so a match exists
            let variant_id = candidates
                .iter()
                .find(|id| ItemCatalog::split_id(id).1 == Some(rarity))
                .cloned()
                .expect("offered rarity is present among candidates");
            let step = SessionStep::ResolveVariant {
                variant_id: variant_id.clone(),
            };
            Ok((State::AwaitSchema { variant_id }, step))
        }

        (State::ModifierDecision { variant }, SessionInput::Modifier(false)) => Ok((
            State::Finalizing,
            SessionStep::Finalize(plan(variant, None)),
        )),

        (State::ModifierDecision { variant }, SessionInput::Modifier(true)) => {
            let options: Vec<AttributeChoice> = variant
                .attributes
                .iter()
                .map(|a| AttributeChoice {
                    key: a.key.clone(),
                    display: a.display.clone(),
                })
                .collect();
            if options.is_empty() {
                // Guarded against upstream, but a variant without usable
                // attributes still finalizes unfiltered
                return Ok((
                    State::Finalizing,
                    SessionStep::Finalize(plan(variant, None)),
                ));
            }
            let step = SessionStep::ChooseAttribute { options };
            Ok((State::AttributeSelect { variant }, step))
        }

        (State::AttributeSelect { variant }, SessionInput::Attribute(key)) => {
            match variant.attribute(key.trim()) {
                Some(attribute) => {
                    let attribute = attribute.clone();
                    let step = SessionStep::EnterValue {
                        attribute: attribute.clone(),
                    };
                    Ok((State::ValueEntry { variant, attribute }, step))
                }
                None => {
                    let err = MarketError::Validation(format!(
                        "'{key}' is not a declared attribute of this item"
                    ));
                    Err((State::AttributeSelect { variant }, err))
                }
            }
        }

        (State::ValueEntry { variant, attribute }, SessionInput::Value(text)) => {
            let value = match text.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    let err = MarketError::Validation(format!("'{text}' is not a number"));
                    return Err((State::ValueEntry { variant, attribute }, err));
                }
            };
            if !attribute.contains(value) {
                let err = MarketError::Validation(format!(
                    "value must be between {} and {}",
                    attribute.min, attribute.max
                ));
                return Err((State::ValueEntry { variant, attribute }, err));
            }
            let modifier = ModifierFilter { attribute, value };
            Ok((
                State::Finalizing,
                SessionStep::Finalize(plan(variant, Some(modifier))),
            ))
        }

        (state, input) => {
            let err = MarketError::Validation(format!(
                "{input:?} does not match the current step"
            ));
            Err((state, err))
        }
    }
}
