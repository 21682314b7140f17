use crate::core::analyzer::{analyze, observed_platforms, DEFAULT_MAX_DEPTH, ENVELOPE_KEY, PLATFORM_KEY};
use crate::core::presets::{
    all_columns_preset, builtin_presets, resolve, PresetMatch, ALL_PRESET_ID, DEFAULT_PRESET_ID,
};
use crate::core::synthesizer::synthesize;
use crate::core::tags::derive_tags;
use crate::domain::model::{Column, FieldObservation, InferredType, Preset, QuickFilterTag, Record};
use std::collections::BTreeSet;

pub const DEFAULT_MAX_COLUMNS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Columns shown when no preset is selected.
    pub max_default_columns: usize,
    pub initial_preset: Option<String>,
    /// Target of [`ColumnEngine::reset`].
    pub default_preset: String,
    pub max_depth: usize,
    pub preset_match: PresetMatch,
    /// Added to the built-in catalog; an entry with a built-in id replaces it.
    pub extra_presets: Vec<Preset>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_default_columns: DEFAULT_MAX_COLUMNS,
            initial_preset: None,
            default_preset: DEFAULT_PRESET_ID.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            preset_match: PresetMatch::default(),
            extra_presets: Vec::new(),
        }
    }
}

/// Owns the column set and its visibility state across data refreshes.
pub struct ColumnEngine {
    config: EngineConfig,
    catalog: Vec<Preset>,
    columns: Vec<Column>,
    platforms: BTreeSet<String>,
    selected_preset: Option<String>,
    /// Preset id used by the last resolution; `None` until one has run.
    last_applied: Option<Option<String>>,
}

impl ColumnEngine {
    pub fn new(config: EngineConfig) -> Self {
        let mut catalog = builtin_presets();
        for preset in &config.extra_presets {
            if preset.id == ALL_PRESET_ID {
                tracing::warn!("Ignoring custom preset with reserved id '{}'", ALL_PRESET_ID);
                continue;
            }
            match catalog.iter_mut().find(|p| p.id == preset.id) {
                Some(existing) => *existing = preset.clone(),
                None => catalog.push(preset.clone()),
            }
        }

        let mut engine = Self {
            config,
            catalog,
            columns: fallback_columns(),
            platforms: BTreeSet::new(),
            selected_preset: None,
            last_applied: None,
        };

        if let Some(initial) = engine.config.initial_preset.clone() {
            if engine.has_preset(&initial) {
                engine.selected_preset = Some(initial);
            } else {
                tracing::warn!("Unknown initial preset '{}', showing top columns", initial);
            }
        }

        engine
    }

    /// Rebuilds the column set from a new batch of records.
    ///
    /// Visibility toggles survive as long as the selected preset is the one
    /// applied last time. An empty batch falls back to a fixed column set.
    pub fn load(&mut self, records: &[Record]) {
        let fields = analyze(records, self.config.max_depth);
        self.platforms = observed_platforms(records);

        if fields.is_empty() {
            tracing::info!("No fields detected, using fallback columns");
            self.columns = fallback_columns();
            self.last_applied = None;
            return;
        }

        let mut columns: Vec<Column> = fields
            .iter()
            .map(|(path, observation)| synthesize(path, observation, &observation.platforms))
            .collect();
        columns.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.key.cmp(&b.key)));

        let force = self.last_applied.as_ref() != Some(&self.selected_preset);
        tracing::debug!(
            "Synthesized {} columns from {} records (force preset defaults: {})",
            columns.len(),
            records.len(),
            force
        );
        self.apply(columns, force);
    }

    /// Switches to `id` and resets visibility to that preset's defaults.
    /// Unknown ids leave the engine untouched and return `false`.
    pub fn select_preset(&mut self, id: &str) -> bool {
        if !self.has_preset(id) {
            tracing::debug!("Ignoring unknown preset '{}'", id);
            return false;
        }

        self.selected_preset = Some(id.to_string());
        let columns = std::mem::take(&mut self.columns);
        self.apply(columns, true);
        tracing::debug!(
            "Preset '{}' applied, {} of {} columns visible",
            id,
            self.visible_columns().len(),
            self.columns.len()
        );
        true
    }

    /// Flips one column and returns its new visibility.
    pub fn toggle_column(&mut self, key: &str) -> Option<bool> {
        let column = self.columns.iter_mut().find(|c| c.key == key)?;
        column.visible = !column.visible;
        Some(column.visible)
    }

    pub fn reset(&mut self) -> bool {
        let default = self.config.default_preset.clone();
        self.select_preset(&default)
    }

    pub fn has_preset(&self, id: &str) -> bool {
        id == ALL_PRESET_ID || self.catalog.iter().any(|p| p.id == id)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn visible_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.visible).collect()
    }

    /// The catalog, led by an `all` preset that lists the current keys.
    pub fn presets(&self) -> Vec<Preset> {
        std::iter::once(all_columns_preset(&self.columns))
            .chain(self.catalog.iter().cloned())
            .collect()
    }

    pub fn platforms(&self) -> &BTreeSet<String> {
        &self.platforms
    }

    pub fn tags(&self) -> Vec<QuickFilterTag> {
        derive_tags(&self.columns)
    }

    pub fn selected_preset(&self) -> Option<&str> {
        self.selected_preset.as_deref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn find_preset(&self, columns: &[Column]) -> Option<Preset> {
        let id = self.selected_preset.as_deref()?;
        if id == ALL_PRESET_ID {
            return Some(all_columns_preset(columns));
        }
        self.catalog.iter().find(|p| p.id == id).cloned()
    }

    fn apply(&mut self, columns: Vec<Column>, force: bool) {
        let preset = self.find_preset(&columns);
        let previous = self.last_applied.as_ref().map(|_| self.columns.as_slice());
        let resolved = resolve(
            &columns,
            preset.as_ref(),
            previous,
            force,
            self.config.max_default_columns,
            self.config.preset_match,
        );
        self.columns = resolved;
        self.last_applied = Some(self.selected_preset.clone());
    }
}

/// Shown when a batch yields no fields at all.
pub fn fallback_columns() -> Vec<Column> {
    [
        (PLATFORM_KEY, InferredType::String, true),
        ("created_at", InferredType::String, true),
        ("stage", InferredType::String, false),
        ("content_type", InferredType::String, false),
        (ENVELOPE_KEY, InferredType::Object, true),
    ]
    .into_iter()
    .map(|(key, inferred_type, visible)| {
        let observation = FieldObservation {
            inferred_type,
            ..FieldObservation::new(key)
        };
        Column {
            visible,
            ..synthesize(key, &observation, &BTreeSet::new())
        }
    })
    .collect()
}
