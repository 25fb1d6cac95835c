use vellum_highlight::DEFAULT_LANGUAGE;

/// Options for the code block extension. The language attribute is
/// free-form; the defaults here only govern parsing fallbacks and the CSS
/// class conventions on the rendered container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlockConfig {
    pub default_language: String,
    /// Class prefix carrying the language through HTML serialization,
    /// e.g. `language-rust`.
    pub language_class_prefix: String,
    /// Base class for the rendered wrapper, toolbar, and pre elements.
    pub class_prefix: String,
}

impl Default for CodeBlockConfig {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            language_class_prefix: "language-".to_string(),
            class_prefix: "vellum-code-block".to_string(),
        }
    }
}

impl CodeBlockConfig {
    pub fn language_class(&self, language: &str) -> String {
        format!("{}{}", self.language_class_prefix, language)
    }
}
