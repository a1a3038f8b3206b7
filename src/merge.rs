//! Layer Merger.
//!
//! Layers are applied in declaration order. Scalars are last writer wins,
//! lists append without deduplication, and a nested object a layer leaves
//! out is skipped rather than cleared.

use tracing::{debug, trace};

use crate::{
    CombinedLogic, Corrections, FormatSpec, GeneralRules, LayerRole, LogicLayer,
    OpeningPhrase, PriorityLists, ReportFormatting, ReportLanguage, ReportRules, RuleLayer,
    SectionRules, ToggledList, Tone,
};

/// Combine layers into one [`CombinedLogic`].
///
/// A lone [`LayerRole::StudyOverride`] layer is a configuration authored
/// before layering existed and is taken as complete logic on its own.
#[must_use]
pub fn merge(layers: &[LogicLayer]) -> CombinedLogic {
    if let Some(logic) = legacy_study_logic(layers) {
        debug!("promoting lone study layer to combined logic");
        return logic.clone();
    }

    let mut combined = CombinedLogic::default();
    for layer in layers {
        trace!(role = %layer.role, "merging layer");
        combined.absorb(&layer.logic);
    }
    debug!(layers = layers.len(), "merged logic layers");
    combined
}

fn legacy_study_logic(layers: &[LogicLayer]) -> Option<&CombinedLogic> {
    match layers {
        [only] if only.role == LayerRole::StudyOverride => Some(&only.logic),
        _ => None,
    }
}

/// Ordered collection of layers, lowest precedence first.
///
/// ```
/// use radlogic::{LayerRole, LayerStack, RuleLayer};
///
/// let logic = LayerStack::new()
///     .rules(LayerRole::General, &RuleLayer::text("Exclusions:\n- cyst"))
///     .rules(LayerRole::StudyOverride, &RuleLayer::text("Exclusions:\n- osteophyte"))
///     .merge();
/// assert_eq!(logic.section_rules.unwrap().exclude_by_default.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    layers: Vec<LogicLayer>,
}

impl LayerStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn layer(mut self, layer: LogicLayer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Add a layer if the source supplied one. Absent layers are no-ops.
    #[must_use]
    pub fn maybe_layer(self, layer: Option<LogicLayer>) -> Self {
        match layer {
            Some(layer) => self.layer(layer),
            None => self,
        }
    }

    /// Parse a rule layer and add it as section rules.
    #[must_use]
    pub fn rules(self, role: LayerRole, rules: &RuleLayer) -> Self {
        self.layer(LogicLayer::from_rules(role, rules))
    }

    #[must_use]
    pub fn maybe_rules(self, role: LayerRole, rules: Option<&RuleLayer>) -> Self {
        match rules {
            Some(rules) => self.rules(role, rules),
            None => self,
        }
    }

    #[must_use]
    pub fn layers(&self) -> &[LogicLayer] {
        &self.layers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    #[must_use]
    pub fn merge(&self) -> CombinedLogic {
        merge(&self.layers)
    }
}

impl FromIterator<LogicLayer> for LayerStack {
    fn from_iter<T: IntoIterator<Item = LogicLayer>>(iter: T) -> Self {
        Self {
            layers: iter.into_iter().collect(),
        }
    }
}

// -- Field policies ---------------------------------------------------------

/// Fold a later layer's fields into the accumulated value.
trait Absorb {
    fn absorb(&mut self, later: &Self);
}

fn scalar<T: Clone>(acc: &mut Option<T>, later: &Option<T>) {
    if let Some(value) = later {
        *acc = Some(value.clone());
    }
}

fn append<T: Clone>(acc: &mut Vec<T>, later: &[T]) {
    acc.extend_from_slice(later);
}

fn nested<T: Absorb + Default>(acc: &mut Option<T>, later: &Option<T>) {
    if let Some(value) = later {
        acc.get_or_insert_with(T::default).absorb(value);
    }
}

impl Absorb for CombinedLogic {
    fn absorb(&mut self, later: &Self) {
        nested(&mut self.general, &later.general);
        nested(&mut self.section_rules, &later.section_rules);
        nested(&mut self.report, &later.report);
        append(&mut self.custom_instructions, &later.custom_instructions);
    }
}

impl Absorb for GeneralRules {
    fn absorb(&mut self, later: &Self) {
        nested(&mut self.tone, &later.tone);
        nested(&mut self.corrections, &later.corrections);
        self.disallowed_items.extend(
            later
                .disallowed_items
                .iter()
                .map(|(name, on)| (name.clone(), *on)),
        );
        nested(&mut self.disallowed_symbols, &later.disallowed_symbols);
    }
}

impl Absorb for Tone {
    fn absorb(&mut self, later: &Self) {
        scalar(&mut self.style, &later.style);
    }
}

impl Absorb for Corrections {
    fn absorb(&mut self, later: &Self) {
        scalar(&mut self.enabled, &later.enabled);
        append(&mut self.rules, &later.rules);
    }
}

impl Absorb for ToggledList {
    fn absorb(&mut self, later: &Self) {
        scalar(&mut self.enabled, &later.enabled);
        append(&mut self.items, &later.items);
    }
}

impl Absorb for SectionRules {
    fn absorb(&mut self, later: &Self) {
        nested(&mut self.format, &later.format);
        append(&mut self.exclude_by_default, &later.exclude_by_default);
        nested(
            &mut self.required_opening_phrase,
            &later.required_opening_phrase,
        );
        nested(&mut self.priority, &later.priority);
        append(&mut self.custom_rules, &later.custom_rules);
        scalar(
            &mut self.include_recommendations,
            &later.include_recommendations,
        );
        scalar(&mut self.differential_diagnosis, &later.differential_diagnosis);
    }
}

impl Absorb for FormatSpec {
    fn absorb(&mut self, later: &Self) {
        scalar(&mut self.style, &later.style);
        scalar(&mut self.spacing, &later.spacing);
    }
}

impl Absorb for OpeningPhrase {
    fn absorb(&mut self, later: &Self) {
        scalar(&mut self.enabled, &later.enabled);
        scalar(&mut self.phrase, &later.phrase);
    }
}

impl Absorb for PriorityLists {
    fn absorb(&mut self, later: &Self) {
        for (acc, list) in self.lists_mut().into_iter().zip(later.lists()) {
            append(acc, list);
        }
    }
}

impl Absorb for ReportRules {
    fn absorb(&mut self, later: &Self) {
        nested(&mut self.corrections, &later.corrections);
        nested(&mut self.formatting, &later.formatting);
        nested(&mut self.language, &later.language);
        append(
            &mut self.anatomic_routing_rules,
            &later.anatomic_routing_rules,
        );
        append(&mut self.custom_rules, &later.custom_rules);
    }
}

impl Absorb for ReportFormatting {
    fn absorb(&mut self, later: &Self) {
        scalar(&mut self.use_bullet_points, &later.use_bullet_points);
        scalar(
            &mut self.preserve_template_punctuation,
            &later.preserve_template_punctuation,
        );
        scalar(
            &mut self.prevent_unnecessary_capitalization,
            &later.prevent_unnecessary_capitalization,
        );
    }
}

impl Absorb for ReportLanguage {
    fn absorb(&mut self, later: &Self) {
        nested(&mut self.avoid_words, &later.avoid_words);
        nested(&mut self.avoid_phrases, &later.avoid_phrases);
        scalar(
            &mut self.expand_lesion_descriptions,
            &later.expand_lesion_descriptions,
        );
    }
}
