//! Async driver for one resolution session.
//!
//! The state machine itself is pure; this layer feeds it user input (with a
//! bounded wait per step), resolves variant schemas through the catalog
//! service, and runs the terminal fetch → filter → aggregate → render
//! pipeline. A timed-out session is abandoned: nothing is fetched, no
//! partial chart is produced.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::timeout;

use crate::analysis::{aggregate, filter_outliers};
use crate::catalog::{CatalogService, ItemCatalog};
use crate::chart::ChartRenderer;
use crate::config::SESSION;
use crate::data::HistoryFetcher;
use crate::domain::ItemVariant;
use crate::error::{MarketError, Result};
use crate::notify::Notifier;
use crate::session::{FetchPlan, ResolutionSession, SessionInput, SessionStep};
use crate::utils::time_utils;

/// Source of user input lines. `None` means the stream closed.
#[async_trait]
pub trait InputSource: Send {
    async fn next_input(&mut self, prompt: &str) -> Option<String>;
}

pub struct StdinSource {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinSource {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputSource for StdinSource {
    async fn next_input(&mut self, prompt: &str) -> Option<String> {
        println!("{prompt}");
        self.lines.next_line().await.ok().flatten()
    }
}

/// Seam over the catalog service so resolution flows are testable offline.
#[async_trait]
pub trait VariantResolver: Send + Sync {
    async fn variant(&self, id: &str) -> ItemVariant;
}

#[async_trait]
impl VariantResolver for CatalogService {
    async fn variant(&self, id: &str) -> ItemVariant {
        CatalogService::variant(self, id).await
    }
}

pub struct SessionRunner<'a, I> {
    catalog: &'a ItemCatalog,
    resolver: &'a dyn VariantResolver,
    input: I,
}

impl<'a, I: InputSource> SessionRunner<'a, I> {
    pub fn new(catalog: &'a ItemCatalog, resolver: &'a dyn VariantResolver, input: I) -> Self {
        Self {
            catalog,
            resolver,
            input,
        }
    }

    /// Drive the state machine to a fetch plan.
    ///
    /// Returns `Ok(None)` when the session is abandoned (timeout or closed
    /// input). Recoverable validation errors re-prompt the same step; any
    /// other error ends the session.
    pub async fn resolve_plan(&mut self, search_term: &str) -> Result<Option<FetchPlan>> {
        let (mut session, mut step) = ResolutionSession::open(self.catalog, search_term)?;
        let mut wait = Duration::from_secs(SESSION.search_timeout_secs);

        loop {
            step = match step {
                SessionStep::Finalize(plan) => return Ok(Some(plan)),

                SessionStep::ResolveVariant { variant_id } => {
                    let variant = self.resolver.variant(&variant_id).await;
                    session.resolve(variant)?
                }

                interactive => {
                    let prompt = render_prompt(&interactive);
                    let line = match timeout(wait, self.input.next_input(&prompt)).await {
                        Err(_) => {
                            log::info!("No input within {wait:?}, abandoning session");
                            return Ok(None);
                        }
                        Ok(None) => {
                            log::info!("Input closed, abandoning session");
                            return Ok(None);
                        }
                        Ok(Some(line)) => line,
                    };
                    wait = Duration::from_secs(SESSION.step_timeout_secs);

                    match parse_input(&interactive, line.trim()) {
                        Ok(input) => match session.handle(input) {
                            Ok(next) => next,
                            Err(e) if e.is_recoverable() => {
                                println!("{e}");
                                interactive
                            }
                            Err(e) => return Err(e),
                        },
                        Err(e) => {
                            println!("{e}");
                            interactive
                        }
                    }
                }
            };
        }
    }
}

/// Map a raw input line onto the input kind the pending step expects.
fn parse_input(step: &SessionStep, line: &str) -> Result<SessionInput> {
    match step {
        SessionStep::ChooseBase { .. } => Ok(SessionInput::Base(line.to_string())),
        SessionStep::ChooseRarity { .. } => Ok(SessionInput::Rarity(line.to_string())),
        SessionStep::DecideModifier { .. } => match line.to_lowercase().as_str() {
            "y" | "yes" => Ok(SessionInput::Modifier(true)),
            "" | "n" | "no" => Ok(SessionInput::Modifier(false)),
            other => Err(MarketError::Validation(format!(
                "'{other}' is not a yes/no answer"
            ))),
        },
        SessionStep::ChooseAttribute { .. } => Ok(SessionInput::Attribute(line.to_string())),
        SessionStep::EnterValue { .. } => Ok(SessionInput::Value(line.to_string())),
        SessionStep::ResolveVariant { .. } | SessionStep::Finalize(_) => Err(
            MarketError::Validation("no input expected for this step".to_string()),
        ),
    }
}

fn render_prompt(step: &SessionStep) -> String {
    match step {
        SessionStep::ChooseBase { options } => {
            format!("Select an item: {}", options.join(", "))
        }
        SessionStep::ChooseRarity { options } => {
            let labels: Vec<String> = options.iter().map(|r| r.to_string()).collect();
            format!("Select rarity: {}", labels.join(", "))
        }
        SessionStep::DecideModifier { variant_name } => {
            format!("Apply a secondary attribute filter to {variant_name}? [y/N]")
        }
        SessionStep::ChooseAttribute { options } => {
            let labels: Vec<String> = options
                .iter()
                .map(|o| format!("{} ({})", o.display, o.key))
                .collect();
            format!("Select secondary attribute: {}", labels.join(", "))
        }
        SessionStep::EnterValue { attribute } => format!(
            "Enter a value between {} and {} (step {})",
            attribute.min,
            attribute.max,
            attribute.suggested_step()
        ),
        SessionStep::ResolveVariant { .. } | SessionStep::Finalize(_) => String::new(),
    }
}

/// Terminal pipeline: fetch, clean, aggregate, render, deliver.
///
/// Any failure here is terminal for the session; `NoData` covers both an
/// empty fetch and a fully filtered-out window.
pub async fn execute_plan(
    plan: &FetchPlan,
    fetcher: &HistoryFetcher,
    renderer: &dyn ChartRenderer,
    notifier: &dyn Notifier,
    output: &Path,
) -> Result<()> {
    let now = time_utils::utc_now();
    let samples = fetcher
        .fetch(&plan.variant_id, plan.modifier.as_ref(), now)
        .await?;
    if samples.is_empty() {
        return Err(MarketError::NoData);
    }

    let filtered = filter_outliers(&samples);
    log::info!(
        "Outlier filter kept {}/{} buckets for {}",
        filtered.len(),
        samples.len(),
        plan.variant_id
    );
    if filtered.is_empty() {
        return Err(MarketError::NoData);
    }

    let model = aggregate(&filtered, Some(&plan.name));
    renderer.render(&model, output)?;

    notifier.deliver(&plan.summary(), output).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AttributeRange, Rarity};
    use std::collections::VecDeque;

    struct ScriptedSource {
        lines: VecDeque<String>,
    }

    impl ScriptedSource {
        fn new(lines: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl InputSource for ScriptedSource {
        async fn next_input(&mut self, _prompt: &str) -> Option<String> {
            self.lines.pop_front()
        }
    }

    /// Input source that never produces a line, for timeout behaviour.
    struct SilentSource;

    #[async_trait]
    impl InputSource for SilentSource {
        async fn next_input(&mut self, _prompt: &str) -> Option<String> {
            std::future::pending().await
        }
    }

    struct StubResolver;

    #[async_trait]
    impl VariantResolver for StubResolver {
        async fn variant(&self, id: &str) -> ItemVariant {
            let (base, rarity) = ItemCatalog::split_id(id);
            let attributes = if rarity.is_some_and(|r| r.supports_modifiers()) {
                vec![AttributeRange {
                    key: "strength".to_string(),
                    display: "Strength".to_string(),
                    min: 1.0,
                    max: 3.0,
                    is_percentage: false,
                }]
            } else {
                Vec::new()
            };
            ItemVariant {
                id: id.to_string(),
                base: base.to_string(),
                name: base.to_string(),
                rarity: rarity.unwrap_or(Rarity::Common),
                attributes,
            }
        }
    }

    fn catalog() -> ItemCatalog {
        ItemCatalog::from_ids(
            ["Falchion_2001", "Falchion_4001", "Kris_4001"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }

    #[tokio::test]
    async fn scripted_flow_reaches_a_filtered_plan() {
        let cat = catalog();
        let input = ScriptedSource::new(&["Rare", "y", "strength", "oops", "2"]);
        let mut runner = SessionRunner::new(&cat, &StubResolver, input);

        let plan = runner.resolve_plan("falchion").await.unwrap().unwrap();

        assert_eq!(plan.variant_id, "Falchion_4001");
        let modifier = plan.modifier.expect("modifier should be set");
        assert_eq!(modifier.value, 2.0);
    }

    #[tokio::test]
    async fn declining_the_modifier_finalizes_unfiltered() {
        let cat = catalog();
        let input = ScriptedSource::new(&["n"]);
        let mut runner = SessionRunner::new(&cat, &StubResolver, input);

        let plan = runner.resolve_plan("kris").await.unwrap().unwrap();
        assert_eq!(plan.variant_id, "Kris_4001");
        assert!(plan.modifier.is_none());
    }

    #[tokio::test]
    async fn exhausted_input_abandons_the_session() {
        let cat = catalog();
        let input = ScriptedSource::new(&[]);
        let mut runner = SessionRunner::new(&cat, &StubResolver, input);

        let outcome = runner.resolve_plan("falchion").await.unwrap();
        assert!(outcome.is_none(), "closed input must abandon, not error");
    }

    #[tokio::test(start_paused = true)]
    async fn silent_input_times_out_and_abandons() {
        let cat = catalog();
        let mut runner = SessionRunner::new(&cat, &StubResolver, SilentSource);

        let outcome = runner.resolve_plan("falchion").await.unwrap();
        assert!(outcome.is_none(), "timeout must abandon the session");
    }

    #[test]
    fn yes_no_parsing_defaults_to_skip() {
        let step = SessionStep::DecideModifier {
            variant_name: "Kris".into(),
        };
        assert_eq!(
            parse_input(&step, "").unwrap(),
            SessionInput::Modifier(false)
        );
        assert_eq!(
            parse_input(&step, "YES").unwrap(),
            SessionInput::Modifier(true)
        );
        assert!(parse_input(&step, "maybe").is_err());
    }
}
