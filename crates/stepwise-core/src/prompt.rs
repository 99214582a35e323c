//! The prompt composer.
//!
//! A `PromptTemplate` is plain text with `{name}` placeholders (`{{` and
//! `}}` render literal braces). Static substitutions are bound once with
//! `partial()` and cached in the resulting `PartialPrompt`; runtime inputs
//! are supplied on every `render()`.
//!
//! Rendering is a pure function of its inputs. A placeholder with no value
//! fails with `StepwiseError::MissingPlaceholder` before anything reaches the
//! model.

use std::{collections::HashMap, sync::Arc};

use stepwise_contracts::error::{StepwiseError, StepwiseResult};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed prompt template.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    id: String,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse `source` into a template identified by `id` in error messages.
    ///
    /// Returns `ConfigError` for an unterminated `{`, a stray `}` or a
    /// placeholder name that is not `[A-Za-z0-9_]+`.
    pub fn new(id: impl Into<String>, source: &str) -> StepwiseResult<Self> {
        let id = id.into();
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) => name.push(ch),
                            None => {
                                return Err(StepwiseError::ConfigError {
                                    reason: format!("template '{id}': unterminated placeholder '{{{name}'"),
                                })
                            }
                        }
                    }
                    if name.is_empty() || !name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
                        return Err(StepwiseError::ConfigError {
                            reason: format!("template '{id}': invalid placeholder name '{name}'"),
                        });
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name));
                }
                '}' => {
                    return Err(StepwiseError::ConfigError {
                        reason: format!("template '{id}': unmatched '}}'"),
                    })
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { id, segments })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Placeholder names in first-appearance order, without duplicates.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Bind the static substitutions for one agent configuration.
    pub fn partial(self, statics: HashMap<String, String>) -> PartialPrompt {
        PartialPrompt { template: self, statics: Arc::new(statics) }
    }

    /// Render with two lookup layers; `runtime` shadows `statics`.
    pub fn render(
        &self,
        statics: &HashMap<String, String>,
        runtime: &HashMap<String, String>,
    ) -> StepwiseResult<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = runtime.get(name).or_else(|| statics.get(name)).ok_or_else(|| {
                        StepwiseError::MissingPlaceholder {
                            template: self.id.clone(),
                            placeholder: name.clone(),
                        }
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

/// A template with its static substitutions resolved and cached.
///
/// Cloning is cheap; the statics are shared.
#[derive(Debug, Clone)]
pub struct PartialPrompt {
    template: PromptTemplate,
    statics: Arc<HashMap<String, String>>,
}

impl PartialPrompt {
    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    pub fn statics(&self) -> &HashMap<String, String> {
        &self.statics
    }

    /// Check that every placeholder is covered by the statics or by one of
    /// `runtime_keys`, so a misconfigured agent fails at construction.
    pub fn validate(&self, runtime_keys: &[&str]) -> StepwiseResult<()> {
        for name in self.template.placeholders() {
            if !self.statics.contains_key(name) && !runtime_keys.contains(&name) {
                return Err(StepwiseError::MissingPlaceholder {
                    template: self.template.id.clone(),
                    placeholder: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Render the prompt for one turn.
    pub fn render(&self, runtime: &HashMap<String, String>) -> StepwiseResult<String> {
        self.template.render(&self.statics, runtime)
    }
}

/// One-shot composition of an unparsed template.
pub fn compose(
    template: &str,
    statics: &HashMap<String, String>,
    runtime: &HashMap<String, String>,
) -> StepwiseResult<String> {
    PromptTemplate::new("inline", template)?.render(statics, runtime)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use stepwise_contracts::error::StepwiseError;

    use super::{compose, PromptTemplate};

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn renders_statics_and_runtime() {
        let prompt = PromptTemplate::new("t", "Tools: {tool_names}\nQ: {input}\n{agent_scratchpad}")
            .unwrap()
            .partial(vars(&[("tool_names", "search, sql")]));

        let rendered = prompt
            .render(&vars(&[("input", "how many?"), ("agent_scratchpad", "")]))
            .unwrap();

        assert_eq!(rendered, "Tools: search, sql\nQ: how many?\n");
    }

    #[test]
    fn rendering_is_deterministic() {
        let statics = vars(&[("a", "1")]);
        let runtime = vars(&[("b", "2")]);
        let first = compose("{a}-{b}-{a}", &statics, &runtime).unwrap();
        let second = compose("{a}-{b}-{a}", &statics, &runtime).unwrap();
        assert_eq!(first, "1-2-1");
        assert_eq!(first, second);
    }

    #[test]
    fn missing_placeholder_is_reported() {
        let result = compose("Plan: {input}\n{agent_scratchpad}", &HashMap::new(), &vars(&[("input", "x")]));

        match result {
            Err(StepwiseError::MissingPlaceholder { placeholder, template }) => {
                assert_eq!(placeholder, "agent_scratchpad");
                assert_eq!(template, "inline");
            }
            other => panic!("expected MissingPlaceholder, got {:?}", other),
        }
    }

    #[test]
    fn escaped_braces_render_literally() {
        let rendered = compose(r#"{{"url": "{url}"}}"#, &vars(&[("url", "/x")]), &HashMap::new()).unwrap();
        assert_eq!(rendered, r#"{"url": "/x"}"#);
    }

    #[test]
    fn runtime_shadows_statics() {
        let rendered = compose("{input}", &vars(&[("input", "static")]), &vars(&[("input", "runtime")])).unwrap();
        assert_eq!(rendered, "runtime");
    }

    #[test]
    fn malformed_templates_are_config_errors() {
        for source in ["{unterminated", "stray }", "{bad name}", "{}"] {
            match PromptTemplate::new("bad", source) {
                Err(StepwiseError::ConfigError { .. }) => {}
                other => panic!("expected ConfigError for {source:?}, got {:?}", other),
            }
        }
    }

    #[test]
    fn placeholders_are_listed_once_in_order() {
        let template = PromptTemplate::new("t", "{b} {a} {b} {{c}}").unwrap();
        assert_eq!(template.placeholders(), vec!["b", "a"]);
    }

    #[test]
    fn validate_catches_uncovered_placeholders() {
        let prompt = PromptTemplate::new("controller", "{api_docs} {input} {agent_scratchpad}")
            .unwrap()
            .partial(HashMap::new());

        match prompt.validate(&["input", "agent_scratchpad"]) {
            Err(StepwiseError::MissingPlaceholder { placeholder, .. }) => {
                assert_eq!(placeholder, "api_docs");
            }
            other => panic!("expected MissingPlaceholder, got {:?}", other),
        }

        let covered = PromptTemplate::new("controller", "{api_docs} {input}")
            .unwrap()
            .partial(vars(&[("api_docs", "docs")]));
        assert!(covered.validate(&["input", "agent_scratchpad"]).is_ok());
    }
}
