//! WASM bindings for phrasegen — powers the published generator pages.

use wasm_bindgen::prelude::*;

use phrasegen::core::renderer::Generator;
use phrasegen::core::substitute::RenderMode;
use phrasegen::schema::config::GeneratorConfig;

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct VariableInfo<'a> {
    id: &'a str,
    description: &'a str,
    default: &'a str,
    value: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// PhraseGenerator — the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct PhraseGenerator {
    generator: Generator,
}

#[wasm_bindgen]
impl PhraseGenerator {
    /// Load a definition from its page-embedded JSON form and draw the first
    /// phrase.
    ///
    /// Expected JSON shape:
    /// ```json
    /// {
    ///   "variables": [{"id": "name", "description": "Name", "default": "World"}],
    ///   "templates": {"main": ["Hello {name}!"]}
    /// }
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, seed: u64) -> Result<PhraseGenerator, JsError> {
        let config = GeneratorConfig::from_json_str(config_json)
            .map_err(|e| JsError::new(&format!("Invalid definition: {e}")))?;
        let generator = Generator::builder()
            .config(config)
            .seed(seed)
            .build()
            .map_err(|e| JsError::new(&format!("Generator build error: {e}")))?;
        Ok(PhraseGenerator { generator })
    }

    /// Draw a new phrase. Variable overrides are kept.
    pub fn regenerate(&mut self) {
        self.generator.regenerate();
    }

    /// The current phrase as `"plain"` text or `"html"` / `"decorated"` markup.
    pub fn get_content(&self, mode: &str) -> Result<String, JsError> {
        let mode: RenderMode = mode.parse().map_err(|e: String| JsError::new(&e))?;
        Ok(self.generator.content(mode))
    }

    /// Override a variable; an empty value restores its default.
    pub fn set_variable(&mut self, id: &str, value: &str) -> Result<(), JsError> {
        self.generator
            .set_variable(id, value)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Plain text followed by an attribution line, for share links.
    pub fn share_text(&self, attribution: &str) -> String {
        format!("{}\n{}", self.generator.content(RenderMode::Plain), attribution)
    }

    /// Return a JSON array describing each variable and its current override.
    pub fn variables(&self) -> Result<String, JsError> {
        let info: Vec<VariableInfo<'_>> = self
            .generator
            .variables()
            .iter()
            .map(|v| VariableInfo {
                id: &v.id,
                description: &v.description,
                default: &v.default,
                value: v.override_value.as_deref(),
            })
            .collect();
        serde_json::to_string(&info)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }
}
