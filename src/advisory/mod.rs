//! Advisory Engine - ordered threshold rules over one prediction
//!
//! A `RuleTable` is a declarative, ordered list of `(predicate, template)`
//! rules evaluated uniformly against an `AdvisoryContext`. Every matching rule
//! fires; there is no short-circuiting between bands on the same field.
//!
//! ## Output policy
//!
//! 1. Rules are evaluated in table order (operators read top-to-bottom).
//! 2. A message whose text was already emitted is dropped.
//! 3. Output stops at `max_messages` (never more than 50).
//! 4. If no conditional rule fired, the output is exactly one
//!    "all indicators optimal" sentinel.
//! 5. Otherwise the generic tips are appended under the same dedup/cap policy.

mod rules;

pub use rules::{default_rules, generic_tips};

use std::collections::HashSet;
use tracing::debug;

use crate::config::defaults::{ALL_OPTIMAL_MESSAGE, MAX_ADVISORY_MESSAGES};
use crate::config::PlantConfig;
use crate::error::EstimatorError;
use crate::types::{
    AdvisoryCategory, AdvisoryMessage, DerivedMetrics, OperatingInputs, PredictionResult,
};

// ============================================================================
// Context
// ============================================================================

/// Combined field set a rule predicate can reference.
#[derive(Debug, Clone, Copy)]
pub struct AdvisoryContext<'a> {
    pub inputs: &'a OperatingInputs,
    pub prediction: &'a PredictionResult,
    pub metrics: &'a DerivedMetrics,
}

impl<'a> AdvisoryContext<'a> {
    pub fn new(
        inputs: &'a OperatingInputs,
        prediction: &'a PredictionResult,
        metrics: &'a DerivedMetrics,
    ) -> Self {
        Self { inputs, prediction, metrics }
    }

    /// Emission intensity (tCO₂/MWh), `None` without generation.
    pub fn intensity(&self) -> Option<f64> {
        self.prediction.intensity_t_per_mwh()
    }

    /// PLF implied by predicted generation (%), `None` without capacity.
    pub fn implied_plf(&self) -> Option<f64> {
        self.prediction.implied_plf_pct(self.inputs.installed_capacity_mw)
    }
}

// ============================================================================
// Rule
// ============================================================================

type Predicate = Box<dyn Fn(&AdvisoryContext<'_>) -> bool + Send + Sync>;
type Template = Box<dyn Fn(&AdvisoryContext<'_>) -> String + Send + Sync>;

/// One `(predicate, message_template)` pair.
pub struct Rule {
    name: &'static str,
    category: AdvisoryCategory,
    predicate: Predicate,
    template: Template,
}

impl Rule {
    pub fn new(
        name: &'static str,
        category: AdvisoryCategory,
        predicate: impl Fn(&AdvisoryContext<'_>) -> bool + Send + Sync + 'static,
        template: impl Fn(&AdvisoryContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            category,
            predicate: Box::new(predicate),
            template: Box::new(template),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn category(&self) -> AdvisoryCategory {
        self.category
    }

    pub fn fires(&self, ctx: &AdvisoryContext<'_>) -> bool {
        (self.predicate)(ctx)
    }

    pub fn render(&self, ctx: &AdvisoryContext<'_>) -> AdvisoryMessage {
        AdvisoryMessage::new(self.category, (self.template)(ctx))
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Message Sink (dedup + cap)
// ============================================================================

struct MessageSink {
    seen: HashSet<String>,
    messages: Vec<AdvisoryMessage>,
    cap: usize,
    suppressed: usize,
}

impl MessageSink {
    fn new(cap: usize) -> Self {
        Self {
            seen: HashSet::new(),
            messages: Vec::new(),
            cap,
            suppressed: 0,
        }
    }

    fn is_full(&self) -> bool {
        self.messages.len() >= self.cap
    }

    fn push(&mut self, message: AdvisoryMessage) {
        if self.is_full() || self.seen.contains(&message.text) {
            self.suppressed += 1;
            return;
        }
        self.seen.insert(message.text.clone());
        self.messages.push(message);
    }
}

// ============================================================================
// Rule Table
// ============================================================================

/// Ordered rule table plus the output policy applied to its matches.
#[derive(Debug)]
pub struct RuleTable {
    rules: Vec<Rule>,
    tips: Vec<AdvisoryMessage>,
    max_messages: usize,
    include_tips: bool,
}

impl RuleTable {
    /// Build a table from explicit rules and tips, with the default policy
    /// (cap 50, tips enabled).
    pub fn new(rules: Vec<Rule>, tips: Vec<AdvisoryMessage>) -> Self {
        Self {
            rules,
            tips,
            max_messages: MAX_ADVISORY_MESSAGES,
            include_tips: true,
        }
    }

    /// The stock rule table with thresholds and policy from `config`.
    pub fn from_config(config: &PlantConfig) -> Self {
        Self::new(default_rules(&config.thresholds), generic_tips())
            .with_max_messages(config.advisory.max_messages)
            .with_tips(config.advisory.include_generic_tips)
    }

    /// Set the message cap, clamped to 1..=50.
    #[must_use]
    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.max_messages = max_messages.clamp(1, MAX_ADVISORY_MESSAGES);
        self
    }

    #[must_use]
    pub fn with_tips(mut self, include_tips: bool) -> Self {
        self.include_tips = include_tips;
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Evaluate the table for one prediction.
    ///
    /// Fails with `InvalidInput` only when a field is NaN/infinite;
    /// out-of-range values are advisory conditions, not errors.
    pub fn evaluate(
        &self,
        inputs: &OperatingInputs,
        prediction: &PredictionResult,
        metrics: &DerivedMetrics,
    ) -> Result<Vec<AdvisoryMessage>, EstimatorError> {
        inputs.ensure_finite()?;
        prediction.ensure_finite()?;
        metrics.ensure_finite()?;
        Ok(self.evaluate_context(&AdvisoryContext::new(inputs, prediction, metrics)))
    }

    /// Evaluate against an already-validated context.
    pub fn evaluate_context(&self, ctx: &AdvisoryContext<'_>) -> Vec<AdvisoryMessage> {
        let mut sink = MessageSink::new(self.max_messages);

        for rule in &self.rules {
            if rule.fires(ctx) {
                sink.push(rule.render(ctx));
            }
        }

        if sink.messages.is_empty() {
            debug!("No advisory rule fired, emitting all-optimal sentinel");
            return vec![AdvisoryMessage::new(AdvisoryCategory::AllOptimal, ALL_OPTIMAL_MESSAGE)];
        }

        if self.include_tips {
            for tip in &self.tips {
                sink.push(tip.clone());
            }
        }

        debug!(
            emitted = sink.messages.len(),
            suppressed = sink.suppressed,
            "Advisory evaluation complete"
        );
        sink.messages
    }
}
