/// Output renderer — one loaded generator: draws expansions and renders them.
///
/// Wires together the shuffle bag, grammar expansion, and the variable pass.

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::core::grammar::Grammar;
use crate::core::shuffle::ShuffleBag;
use crate::core::substitute::{substitute, RenderMode};
use crate::schema::config::{ConfigError, GeneratorConfig, Variable, START_SYMBOL};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("unknown variable: {0}")]
    UnknownVariable(String),
}

/// Both renderings of the current expansion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rendered {
    pub plain: String,
    pub decorated: String,
}

/// A loaded generator. Built via `Generator::builder()`.
///
/// Owns its shuffle state and variable overrides; two generators built from
/// the same definition never affect each other's draws.
#[derive(Debug)]
pub struct Generator {
    config: GeneratorConfig,
    grammar: Grammar,
    bag: ShuffleBag,
    rng: StdRng,
    /// The last expansion, before variable substitution. `None` until the
    /// first `regenerate`.
    expansion: Option<String>,
    generation_count: u64,
}

/// Builder for constructing a `Generator`.
#[derive(Debug)]
pub struct GeneratorBuilder {
    config: Option<GeneratorConfig>,
    seed: Option<u64>,
    expand_on_build: bool,
}

impl Generator {
    pub fn builder() -> GeneratorBuilder {
        GeneratorBuilder {
            config: None,
            seed: None,
            expand_on_build: true,
        }
    }

    /// Draw a fresh expansion from the start symbol.
    ///
    /// Shuffle state carries over between calls, so consecutive expansions
    /// cycle through each pool before repeating anything.
    pub fn regenerate(&mut self) -> &str {
        let text = self
            .grammar
            .expand(START_SYMBOL, 0, &mut self.bag, &mut self.rng);
        self.generation_count += 1;
        tracing::debug!(
            generator = %self.config.id,
            generation = self.generation_count,
            len = text.len(),
            "regenerated expansion"
        );
        self.expansion.insert(text).as_str()
    }

    /// The current expansion with variable placeholders still in place.
    pub fn expansion(&self) -> Option<&str> {
        self.expansion.as_deref()
    }

    /// Render the current expansion with the current variable values.
    /// Before the first `regenerate` this is empty text.
    pub fn content(&self, mode: RenderMode) -> String {
        match self.expansion.as_deref() {
            Some(text) => substitute(text, &self.config.variables, mode),
            None => String::new(),
        }
    }

    pub fn render(&self) -> Rendered {
        Rendered {
            plain: self.content(RenderMode::Plain),
            decorated: self.content(RenderMode::Decorated),
        }
    }

    /// Set the user-entered value for a variable. An empty value falls back
    /// to the default on the next render.
    pub fn set_variable(&mut self, id: &str, value: &str) -> Result<(), RenderError> {
        let var = self
            .config
            .variable_mut(id)
            .ok_or_else(|| RenderError::UnknownVariable(id.to_string()))?;
        var.override_value = Some(value.to_string());
        Ok(())
    }

    pub fn clear_variable(&mut self, id: &str) -> Result<(), RenderError> {
        let var = self
            .config
            .variable_mut(id)
            .ok_or_else(|| RenderError::UnknownVariable(id.to_string()))?;
        var.override_value = None;
        Ok(())
    }

    pub fn variables(&self) -> &[Variable] {
        &self.config.variables
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Number of expansions drawn so far.
    pub fn generation_count(&self) -> u64 {
        self.generation_count
    }
}

impl GeneratorBuilder {
    pub fn config(mut self, config: GeneratorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Seed the random source for reproducible output.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Whether `build` draws the first expansion. Defaults to true.
    pub fn expand_on_build(mut self, expand: bool) -> Self {
        self.expand_on_build = expand;
        self
    }

    pub fn build(self) -> Result<Generator, RenderError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut generator = Generator {
            grammar: Grammar::from_config(&config),
            config,
            bag: ShuffleBag::new(),
            rng,
            expansion: None,
            generation_count: 0,
        };

        if self.expand_on_build {
            generator.regenerate();
        }

        Ok(generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_test_generator(seed: u64) -> Generator {
        let config = GeneratorConfig::from_toml_str(
            r#"
[[variables]]
id = "name"
description = "Name"
default = "World"

[[variables]]
id = "place"
description = "Place"
default = "here"

[templates]
main = ["Hello {name}, {mood} {place}.", "{name}? {mood}."]
mood = ["nice to see you", "long time no see", "welcome"]
"#,
        )
        .unwrap();

        Generator::builder().config(config).seed(seed).build().unwrap()
    }

    #[test]
    fn build_draws_first_expansion() {
        let generator = build_test_generator(1);
        assert_eq!(generator.generation_count(), 1);
        assert!(generator.expansion().is_some());
        assert!(!generator.content(RenderMode::Plain).is_empty());
    }

    #[test]
    fn build_without_expansion_renders_empty() {
        let config = build_test_generator(1).config().clone();
        let mut generator = Generator::builder()
            .config(config)
            .seed(1)
            .expand_on_build(false)
            .build()
            .unwrap();
        assert_eq!(generator.render(), Rendered::default());

        generator.regenerate();
        assert!(!generator.render().plain.is_empty());
    }

    #[test]
    fn build_rejects_invalid_config() {
        let result = Generator::builder().build();
        assert!(matches!(
            result,
            Err(RenderError::Config(ConfigError::MissingStartSymbol))
        ));
    }

    #[test]
    fn variable_edit_does_not_redraw() {
        let mut generator = build_test_generator(3);
        let before = generator.expansion().unwrap().to_string();

        generator.set_variable("name", "Alice").unwrap();
        assert_eq!(generator.expansion().unwrap(), before);
        assert!(generator.content(RenderMode::Plain).contains("Alice"));
        assert!(generator
            .content(RenderMode::Decorated)
            .contains("<strong>Alice</strong>"));
    }

    #[test]
    fn clearing_override_reverts_to_default() {
        let mut generator = build_test_generator(3);
        generator.set_variable("name", "Alice").unwrap();
        generator.set_variable("name", "").unwrap();
        assert!(generator.content(RenderMode::Plain).contains("World"));

        generator.set_variable("name", "Alice").unwrap();
        generator.clear_variable("name").unwrap();
        assert!(!generator.content(RenderMode::Plain).contains("Alice"));
    }

    #[test]
    fn unknown_variable_is_an_error() {
        let mut generator = build_test_generator(3);
        assert!(matches!(
            generator.set_variable("nope", "x"),
            Err(RenderError::UnknownVariable(id)) if id == "nope"
        ));
    }

    #[test]
    fn regenerate_keeps_overrides() {
        let mut generator = build_test_generator(5);
        generator.set_variable("name", "Alice").unwrap();
        for _ in 0..4 {
            generator.regenerate();
            let plain = generator.content(RenderMode::Plain);
            assert!(plain.contains("Alice"), "got {}", plain);
        }
        assert_eq!(generator.generation_count(), 5);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = build_test_generator(42);
        let mut b = build_test_generator(42);
        for _ in 0..6 {
            assert_eq!(a.regenerate(), b.regenerate());
        }
    }

    #[test]
    fn render_returns_both_modes() {
        let generator = build_test_generator(8);
        let rendered = generator.render();
        assert_eq!(rendered.plain, generator.content(RenderMode::Plain));
        assert_eq!(rendered.decorated, generator.content(RenderMode::Decorated));
        assert!(rendered.decorated.contains("<strong>World</strong>"));
    }
}
