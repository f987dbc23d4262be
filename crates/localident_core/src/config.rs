//! Build configuration as plain data.
//!
//! Apart from CSS module naming, nothing in here has behaviour of its own: it
//! is the set of knobs a bundler reads, with defaults that depend on the
//! build [`Mode`]. Config files are JSON; fields left out take the defaults of
//! the mode the file names.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::deriver::{IdentifierDeriver, NamingRules, DEFAULT_TEMPLATE};
use crate::error::ConfigError;
use crate::hash::DigestOptions;
use crate::path;
use crate::template::{Interpolation, Template};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    pub fn is_production(self) -> bool {
        self == Mode::Production
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Mode::Development),
            "production" => Ok(Mode::Production),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Development => "development",
            Mode::Production => "production",
        })
    }
}

/// How style-module class names are renamed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalIdentConfig {
    pub template: String,
    pub digest: DigestOptions,
    pub rules: NamingRules,
}

impl Default for LocalIdentConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            digest: DigestOptions::default(),
            rules: NamingRules::default(),
        }
    }
}

impl LocalIdentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.template.is_empty() {
            return Err(ConfigError::EmptyTemplate);
        }
        self.digest.validate()
    }

    pub fn deriver(&self) -> Result<IdentifierDeriver, ConfigError> {
        self.validate()?;
        Ok(IdentifierDeriver::new(self.digest.clone(), self.rules.clone()))
    }

    pub fn parsed_template(&self) -> Template {
        Template::parse(&self.template)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File name template for emitted scripts.
    pub filename: String,
    pub path: String,
    /// Empty the output directory before each build.
    pub clean: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkScope {
    #[default]
    All,
    Async,
    Initial,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevServerConfig {
    pub port: u16,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlConfig {
    pub template: String,
    pub collapse_whitespace: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptConfig {
    /// Run the linter alongside compilation.
    pub lint: bool,
    pub exclude: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Name of the single extracted stylesheet.
    pub filename: String,
    pub source_maps: bool,
    pub css_modules: LocalIdentConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Font,
    Image,
}

/// Where a static asset is emitted, or whether it is inlined.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRule {
    pub kind: AssetKind,
    pub extensions: Vec<String>,
    pub output_path: String,
    /// Emitted file name; understands `[name]`, `[ext]` and `[path]`.
    pub filename: String,
    /// Files up to this many bytes become data URLs.
    pub inline_limit: Option<u64>,
}

impl AssetRule {
    pub fn fonts() -> Self {
        Self {
            kind: AssetKind::Font,
            extensions: ["woff", "woff2", "ttf", "eot"].map(String::from).to_vec(),
            output_path: "./assets/fonts/".to_string(),
            filename: "[name].[ext]".to_string(),
            inline_limit: None,
        }
    }

    pub fn images() -> Self {
        Self {
            kind: AssetKind::Image,
            extensions: ["bmp", "png", "jpg", "jpeg", "gif", "svg"]
                .map(String::from)
                .to_vec(),
            output_path: "./assets/images/".to_string(),
            filename: "[name].[ext]".to_string(),
            inline_limit: Some(10_000),
        }
    }

    /// Font URLs often carry a `?v=1.2.3` cache buster; it is ignored.
    pub fn matches(&self, resource_path: &str) -> bool {
        let clean = strip_query(resource_path);
        path::extension(clean)
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Output path of the asset, relative to the output directory.
    pub fn emit_path(&self, resource_path: &str, root_context: &str) -> String {
        let clean = strip_query(resource_path);
        let dir = path::relative_dir(&path::relative(root_context, clean));
        let name = Template::parse(&self.filename).interpolate(&Interpolation {
            group: path::stem(clean),
            ext: path::extension(clean).unwrap_or(""),
            path: &dir,
            ..Interpolation::default()
        });
        path::normalize(&format!("{}/{}", self.output_path, name))
    }

    pub fn should_inline(&self, size: u64) -> bool {
        self.inline_limit.is_some_and(|limit| size <= limit)
    }
}

fn strip_query(resource_path: &str) -> &str {
    resource_path
        .split_once('?')
        .map_or(resource_path, |(p, _)| p)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub mode: Mode,
    pub source_maps: bool,
    pub watch: bool,
    pub entry: String,
    pub output: OutputConfig,
    pub resolve_extensions: Vec<String>,
    pub split_chunks: ChunkScope,
    pub dev_server: DevServerConfig,
    pub html: HtmlConfig,
    pub scripts: ScriptConfig,
    pub styles: StyleConfig,
    pub assets: Vec<AssetRule>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::for_mode(Mode::default())
    }
}

impl BuildConfig {
    pub fn for_mode(mode: Mode) -> Self {
        let production = mode.is_production();
        Self {
            mode,
            source_maps: !production,
            watch: !production,
            entry: "./src/index.ts".to_string(),
            output: OutputConfig {
                filename: "[name].js".to_string(),
                path: "dist".to_string(),
                clean: true,
            },
            resolve_extensions: vec![".ts".into(), ".js".into()],
            split_chunks: ChunkScope::All,
            dev_server: DevServerConfig { port: 3000 },
            html: HtmlConfig {
                template: "./src/index.html".to_string(),
                collapse_whitespace: production,
            },
            scripts: ScriptConfig {
                lint: !production,
                exclude: vec!["node_modules".into()],
            },
            styles: StyleConfig {
                filename: "style.css".to_string(),
                source_maps: true,
                css_modules: LocalIdentConfig::default(),
            },
            assets: vec![AssetRule::fonts(), AssetRule::images()],
        }
    }

    /// Parse a JSON config. Missing fields, at any depth, take the defaults
    /// of the file's `mode` (development when absent).
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let mut overrides: Value = serde_json::from_str(json)?;
        let mode = match overrides.get("mode").and_then(Value::as_str) {
            Some(m) => m.parse()?,
            None => Mode::default(),
        };
        // Store the mode in its canonical spelling so it deserializes below.
        if let Value::Object(fields) = &mut overrides {
            fields.insert("mode".to_string(), serde_json::to_value(mode)?);
        }

        let mut merged = serde_json::to_value(Self::for_mode(mode))?;
        merge(&mut merged, overrides);

        let config: Self = serde_json::from_value(merged)?;
        config.styles.css_modules.validate()?;
        tracing::debug!(mode = %config.mode, "loaded build config");
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// First asset rule that handles `resource_path`.
    pub fn rule_for(&self, resource_path: &str) -> Option<&AssetRule> {
        self.assets.iter().find(|rule| rule.matches(resource_path))
    }
}

/// Objects merge key by key; anything else in `patch` replaces `base`.
fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}
