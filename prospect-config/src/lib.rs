//! Loader for workspace configuration with YAML + environment overlays.
//!
//! Sources merge in order: config file (YAML/TOML/JSON by suffix), inline
//! snippets, then `PROSPECT_`-prefixed environment variables. `${VAR}`
//! placeholders in string values are expanded recursively (depth-capped)
//! after merging, so secrets like API keys stay out of config files.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAX_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct ProspectConfig {
    pub version: Option<String>,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub search: SearchConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub prompts: PromptConfig,
}

/// Budgets and token accounting for one research run.
#[derive(Debug, Deserialize)]
pub struct SessionConfig {
    /// Stop once this many document nodes were added. `None` = unbounded.
    #[serde(default)]
    pub max_documents: Option<usize>,
    /// Stop once document content consumed this many tokens.
    #[serde(default)]
    pub max_tokens: Option<usize>,
    /// Model whose tokenizer meters the run.
    #[serde(default = "default_token_model")]
    pub model: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_documents: None,
            max_tokens: None,
            model: default_token_model(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_engine")]
    pub engine: String,
    /// Required by keyed engines (brave); usually `${...}`-expanded.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Fetch each hit's page for full content instead of trusting the
    /// search snippet alone.
    #[serde(default = "default_fetch_pages")]
    pub fetch_pages: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            api_key: None,
            max_results: default_max_results(),
            fetch_pages: default_fetch_pages(),
        }
    }
}

/// The tag is `provider`; fields are provider-specific.
#[derive(Debug, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum LlmConfig {
    Openai {
        model: String,
        auth_token: String,
        #[serde(default = "default_openai_endpoint")]
        endpoint: String,
    },
    Ollama {
        model: String,
        #[serde(default = "default_ollama_endpoint")]
        endpoint: String,
    },
}

/// Optional overrides for the capability prompt templates; `{topic}` and
/// `{max_items}` placeholders are interpolated downstream.
#[derive(Debug, Default, Deserialize)]
pub struct PromptConfig {
    #[serde(default)]
    pub searcher: Option<String>,
    #[serde(default)]
    pub reader: Option<String>,
}

fn default_token_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_engine() -> String {
    "duckduckgo".into()
}
fn default_max_results() -> usize {
    5
}
fn default_fetch_pages() -> bool {
    true
}
fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1/".into()
}
fn default_ollama_endpoint() -> String {
    "http://localhost:11434".into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAX_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring.
pub struct ProspectConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ProspectConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ProspectConfigLoader {
    /// Start with the `PROSPECT_` env overlay attached.
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("PROSPECT").separator("__"));
        Self { builder }
    }

    /// Attach a config file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self.builder.add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Merge an inline YAML snippet (tests, CLI overrides).
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Build, expand `${VAR}` placeholders, and deserialize.
    pub fn load(self) -> Result<ProspectConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;

    const MINIMAL: &str = r#"
version: "1"
llm:
  provider: "ollama"
  model: "llama3"
"#;

    #[test]
    #[serial]
    fn minimal_config_gets_defaults() {
        let cfg = ProspectConfigLoader::new()
            .with_yaml_str(MINIMAL)
            .load()
            .expect("valid config");

        assert_eq!(cfg.version.as_deref(), Some("1"));
        assert_eq!(cfg.session.model, "gpt-3.5-turbo");
        assert_eq!(cfg.session.max_documents, None);
        assert_eq!(cfg.search.engine, "duckduckgo");
        assert_eq!(cfg.search.max_results, 5);
        assert!(cfg.search.fetch_pages);
        match cfg.llm {
            LlmConfig::Ollama { model, endpoint } => {
                assert_eq!(model, "llama3");
                assert_eq!(endpoint, "http://localhost:11434");
            }
            _ => panic!("expected ollama"),
        }
    }

    #[test]
    #[serial]
    fn env_placeholders_expand_into_typed_config() {
        temp_env::with_var("PROSPECT_TEST_KEY", Some("injected"), || {
            let cfg = ProspectConfigLoader::new()
                .with_yaml_str(
                    r#"
llm:
  provider: "openai"
  model: "gpt-4o"
  auth_token: "${PROSPECT_TEST_KEY}"
search:
  engine: "brave"
  api_key: "${PROSPECT_TEST_KEY}"
"#,
                )
                .load()
                .expect("valid config");

            assert_eq!(cfg.search.api_key.as_deref(), Some("injected"));
            match cfg.llm {
                LlmConfig::Openai {
                    auth_token,
                    endpoint,
                    ..
                } => {
                    assert_eq!(auth_token, "injected");
                    assert_eq!(endpoint, "https://api.openai.com/v1/");
                }
                _ => panic!("expected openai"),
            }
        });
    }

    #[test]
    #[serial]
    fn budgets_deserialize_as_numbers() {
        let cfg = ProspectConfigLoader::new()
            .with_yaml_str(
                r#"
session:
  max_documents: 12
  max_tokens: 40000
  model: "gpt-4o"
llm:
  provider: "ollama"
  model: "llama3"
"#,
            )
            .load()
            .unwrap();
        assert_eq!(cfg.session.max_documents, Some(12));
        assert_eq!(cfg.session.max_tokens, Some(40000));
        assert_eq!(cfg.session.model, "gpt-4o");
    }

    #[test]
    fn expansion_is_recursive_but_depth_capped() {
        temp_env::with_vars(
            [
                ("PROSPECT_BAZ", Some("qux")),
                ("PROSPECT_BAR", Some("mid-${PROSPECT_BAZ}")),
                ("PROSPECT_FOO", Some("start-${PROSPECT_BAR}-end")),
            ],
            || {
                let mut v = json!("X=${PROSPECT_FOO}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("X=start-mid-qux-end"));
            },
        );

        temp_env::with_vars(
            [("PROSPECT_A", Some("${PROSPECT_B}")), ("PROSPECT_B", Some("${PROSPECT_A}"))],
            || {
                let mut v = json!("x=${PROSPECT_A}-y");
                // must terminate despite the cycle
                expand_env_in_value(&mut v);
                assert!(v.as_str().unwrap().contains("${"));
            },
        );
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${PROSPECT_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${PROSPECT_DOES_NOT_EXIST}"));
    }

    #[test]
    #[serial]
    fn missing_llm_section_is_an_error() {
        assert!(ProspectConfigLoader::new()
            .with_yaml_str("version: '1'")
            .load()
            .is_err());
    }
}
