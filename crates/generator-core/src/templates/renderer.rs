//! Handlebars rendering of template files
//!
//! Placeholders are keyed by configuration fields ({{projectName}},
//! {{author}}, {{githubUrl}}, ...) and feature-conditional blocks use
//! {{#if features.searchBar}}...{{/if}}. Rendering is strict: a template
//! referencing a field the configuration does not carry fails the run
//! instead of emitting an empty string.

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::features::{Feature, FeatureSet};
use handlebars::{Handlebars, RenderErrorReason};
use serde_json::{json, Map, Value};

/// Substitution context built once per run from the configuration
#[derive(Debug, Clone)]
pub struct RenderContext {
    data: Value,
}

impl RenderContext {
    /// Build the context from the configuration and resolved feature set
    ///
    /// Empty fields are omitted entirely so that strict mode catches a
    /// template depending on a value the user never supplied. Two computed
    /// values are added: `author` ("name <email>") and `githubUrl`.
    pub fn new(config: &AppConfig, features: &FeatureSet) -> Self {
        let mut data = Map::new();

        insert_non_empty(&mut data, "projectName", &config.project_name);
        insert_non_empty(&mut data, "description", &config.description);
        insert_non_empty(&mut data, "githubAccount", &config.github_account);
        insert_non_empty(&mut data, "authorName", &config.author_name);
        insert_non_empty(&mut data, "authorEmail", &config.author_email);
        insert_non_empty(&mut data, "authorUrl", &config.author_url);
        insert_non_empty(&mut data, "license", &config.license);
        if let Some(host) = config.alfresco_server_host.as_deref() {
            insert_non_empty(&mut data, "alfrescoServerHost", host);
        }
        if let Some(host) = config.activiti_server_host.as_deref() {
            insert_non_empty(&mut data, "activitiServerHost", host);
        }

        data.insert("keywords".to_string(), json!(config.keywords));

        if !config.author_name.is_empty() && !config.author_email.is_empty() {
            data.insert(
                "author".to_string(),
                json!(format!("{} <{}>", config.author_name, config.author_email)),
            );
        }
        if !config.github_account.is_empty() && !config.project_name.is_empty() {
            data.insert(
                "githubUrl".to_string(),
                json!(format!(
                    "https://github.com/{}/{}",
                    config.github_account, config.project_name
                )),
            );
        }

        let mut flags = Map::new();
        for feature in Feature::ALL {
            flags.insert(feature.id().to_string(), json!(features.contains(&feature)));
        }
        data.insert("features".to_string(), Value::Object(flags));

        Self {
            data: Value::Object(data),
        }
    }
}

/// Template renderer; deterministic for identical inputs
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        // Output is source code, not HTML
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(true);
        Self { registry }
    }

    /// Render one template file's text with the run context
    pub fn render(&self, path: &str, source: &str, ctx: &RenderContext) -> Result<String> {
        self.registry
            .render_template(source, &ctx.data)
            .map_err(|err| classify_render_error(path, err))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A strict-mode miss is a configuration problem, everything else a template one
fn classify_render_error(path: &str, err: handlebars::RenderError) -> Error {
    if let RenderErrorReason::MissingVariable(Some(var)) = err.reason() {
        let field = var.clone();
        return Error::MissingField { field };
    }
    Error::Render {
        path: path.to_string(),
        source: err,
    }
}

fn insert_non_empty(data: &mut Map<String, Value>, key: &str, value: &str) {
    if !value.is_empty() {
        data.insert(key.to_string(), json!(value));
    }
}
