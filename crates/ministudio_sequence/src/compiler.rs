//! Deterministic prompt compilation.

use crate::CompilerConfig;
use ministudio_core::{
    AttributeMap, CompiledRequest, CompiledRequestBuilder, ContinuityHint, ContinuityPayload,
    ShotSpec, WorldState,
};
use ministudio_error::{CompilationError, CompilationErrorKind};
use tracing::debug;

/// Negative prompt terms applied to every shot unless configured otherwise.
pub const DEFAULT_STYLE_EXCLUSIONS: &[&str] = &[
    "blurry",
    "low quality",
    "distorted",
    "deformed",
    "disfigured",
    "bad anatomy",
    "wrong proportions",
    "extra limbs",
    "missing limbs",
    "floating limbs",
    "disconnected limbs",
    "mutation",
    "mutated",
    "ugly",
    "disgusting",
    "bad art",
    "amateur",
    "poorly drawn",
    "jpeg artifacts",
    "watermark",
    "text",
    "signature",
    "inconsistent lighting",
    "flickering",
    "temporal inconsistency",
];

/// Turns a world state and a shot into a provider-agnostic request.
///
/// Compilation is pure: the same state, shot, continuity payload and seed
/// always produce an equal [`CompiledRequest`].
///
/// The prompt is built from these parts, joined with `". "`:
///
/// 1. the shot's action text
/// 2. `Environment: key: value, ...` when the environment is not empty
/// 3. one `Name: key: value, ...` part per entity, in first-introduced order
/// 4. `Style: ...` when a style is configured
/// 5. the continuity descriptor, when continuity is required and available
///
/// # Examples
///
/// ```
/// use ministudio_core::{Entity, ShotSpec, WorldState};
/// use ministudio_sequence::PromptCompiler;
///
/// let state = WorldState::new()
///     .with_entity("Orb", Entity::new().with_attribute("color", "gold"))?
///     .with_environment("location", "library")?;
///
/// let request = PromptCompiler::default()
///     .compile(0, &state, &ShotSpec::new("Orb enters", 5.0), None, None)
///     .unwrap();
///
/// assert_eq!(request.prompt(), "Orb enters. Environment: location: library. Orb: color: gold");
/// # Ok::<(), ministudio_error::StateError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptCompiler {
    config: CompilerConfig,
}

impl PromptCompiler {
    /// Create a compiler with explicit settings.
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// The settings in use.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile one shot against a world state.
    ///
    /// `state` must already include the shot's delta. `continuity` is the
    /// most recent successful payload, if any. `seed` is the run's locked
    /// seed; the shot's own seed takes precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if the shot is malformed.
    pub fn compile(
        &self,
        shot_index: usize,
        state: &WorldState,
        shot: &ShotSpec,
        continuity: Option<&ContinuityPayload>,
        seed: Option<u64>,
    ) -> Result<CompiledRequest, CompilationError> {
        shot.validate()?;

        let mut parts = vec![shot.action_text().trim().to_string()];

        if !state.environment().is_empty() {
            parts.push(format!("Environment: {}", describe(state.environment())));
        }
        for (name, entity) in state.entities() {
            if entity.attributes().is_empty() {
                parts.push(name.to_string());
            } else {
                parts.push(format!("{}: {}", name, describe(entity.attributes())));
            }
        }
        if let Some(style) = self.config.style.as_deref().filter(|s| !s.trim().is_empty()) {
            parts.push(format!("Style: {}", style.trim()));
        }

        let hint = match (*shot.continuity_required(), continuity) {
            (false, _) => ContinuityHint::NotRequested,
            (true, Some(payload)) => {
                parts.push(payload.descriptor());
                ContinuityHint::Attached(payload.clone())
            }
            (true, None) => {
                debug!(shot = shot_index, "Continuity requested but unavailable");
                ContinuityHint::Degraded
            }
        };

        let prompt = parts.join(". ");
        let negative_prompt = self.negative_prompt(state);
        debug!(shot = shot_index, %prompt, %negative_prompt, "Compiled prompt");

        CompiledRequestBuilder::default()
            .shot_index(shot_index)
            .prompt(prompt)
            .negative_prompt(negative_prompt)
            .duration(*shot.duration())
            .aspect_ratio(
                shot.aspect_ratio()
                    .clone()
                    .unwrap_or_else(|| self.config.default_aspect_ratio.clone()),
            )
            .seed(shot.seed().or(seed))
            .continuity(hint)
            .build()
            .map_err(|e| CompilationError::new(CompilationErrorKind::Assembly(e.to_string())))
    }

    fn negative_prompt(&self, state: &WorldState) -> String {
        let mut terms: Vec<&str> = Vec::new();
        let entity_terms = state
            .entities()
            .flat_map(|(_, entity)| entity.negative_traits().iter().map(|t| t.as_str()));
        for term in self.config.style_exclusions.iter().map(|t| t.as_str()).chain(entity_terms) {
            let term = term.trim();
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        }
        terms.join(", ")
    }
}

fn describe(attributes: &AttributeMap) -> String {
    attributes
        .iter()
        .map(|(key, value)| format!("{}: {}", key, value))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ministudio_core::{AttributeValue, Color};

    #[test]
    fn test_describe_keeps_insertion_order() {
        let mut attributes = AttributeMap::new();
        attributes.insert("size".to_string(), AttributeValue::Number(3.0));
        attributes.insert("color".to_string(), AttributeValue::Color(Color::hex("#ffd700")));
        attributes.insert("mood".to_string(), AttributeValue::from("calm"));

        assert_eq!(describe(&attributes), "size: 3, color: #ffd700, mood: calm");
    }

    #[test]
    fn test_default_exclusions_are_unique() {
        let mut seen = std::collections::HashSet::new();
        assert!(DEFAULT_STYLE_EXCLUSIONS.iter().all(|t| seen.insert(*t)));
    }
}
