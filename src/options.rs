use std::fmt;
use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::paths;

// ── Output style ─────────────────────────────────────────────────

/// CSS output style accepted by `compass --output-style`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    #[default]
    Nested,
    Expanded,
    Compact,
    Compressed,
}

impl OutputStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputStyle::Nested => "nested",
            OutputStyle::Expanded => "expanded",
            OutputStyle::Compact => "compact",
            OutputStyle::Compressed => "compressed",
        }
    }

    pub fn all() -> [OutputStyle; 4] {
        [
            OutputStyle::Nested,
            OutputStyle::Expanded,
            OutputStyle::Compact,
            OutputStyle::Compressed,
        ]
    }
}

impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputStyle::all()
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| {
                format!("unknown output style '{s}' (expected nested, expanded, compact or compressed)")
            })
    }
}

// ── String-or-list fields ────────────────────────────────────────

/// Wire shape of `import_path` and `require`: a single entry or a list.
#[derive(Deserialize, JsonSchema)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value: Option<OneOrMany> = Option::deserialize(deserializer)?;
    Ok(value.map(Vec::from).unwrap_or_default())
}

// ── Defaults ─────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_css() -> String {
    paths::DEFAULT_CSS_DIR.to_string()
}

fn default_sass() -> String {
    paths::DEFAULT_SASS_DIR.to_string()
}

fn default_image() -> String {
    paths::DEFAULT_IMAGES_DIR.to_string()
}

fn default_javascript() -> String {
    paths::DEFAULT_JAVASCRIPTS_DIR.to_string()
}

fn default_font() -> String {
    paths::DEFAULT_FONTS_DIR.to_string()
}

fn default_project() -> PathBuf {
    PathBuf::from(".")
}

// ── Invocation options ───────────────────────────────────────────

/// Everything that shapes one compass run.
///
/// Missing fields in a JSON options file take the documented defaults, so
/// `{}` deserializes to [`InvocationOptions::default`]. `project` defaults to
/// `.`; callers that know their working directory should set it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InvocationOptions {
    /// Output style passed to `--output-style`.
    #[serde(default)]
    pub style: OutputStyle,
    /// Emit line comments. `false` adds `--no-line-comments`.
    #[serde(default = "default_true")]
    pub comments: bool,
    /// Link assets relatively (`--relative-assets`).
    #[serde(default = "default_true")]
    pub relative: bool,
    /// Directory for generated CSS, relative to the project.
    #[serde(default = "default_css")]
    pub css: String,
    /// Directory holding the Sass sources, relative to the project.
    #[serde(default = "default_sass")]
    pub sass: String,
    #[serde(default = "default_image")]
    pub image: String,
    #[serde(default = "default_javascript")]
    pub javascript: String,
    #[serde(default = "default_font")]
    pub font: String,
    /// Extra import search paths, one `-I` pair each, in order.
    #[serde(default, deserialize_with = "one_or_many")]
    #[schemars(with = "Option<OneOrMany>")]
    pub import_path: Vec<String>,
    /// Explicit compass config file. When set, the discrete directory and
    /// style flags are not passed.
    #[serde(default)]
    pub config_file: Option<PathBuf>,
    /// Libraries passed as `--require`, in order.
    #[serde(default, deserialize_with = "one_or_many")]
    #[schemars(with = "Option<OneOrMany>")]
    pub require: Vec<String>,
    /// Echo compiler output and capture stdout into the result.
    #[serde(default = "default_true")]
    pub logging: bool,
    /// Value for `--load-all`.
    #[serde(default)]
    pub load_all: Option<String>,
    /// Project root; also the working directory of the child process.
    #[serde(default = "default_project")]
    pub project: PathBuf,
    /// Run `compass watch` detached instead of `compass compile`.
    #[serde(default)]
    pub watch: bool,
    /// Run through `bundle exec compass`.
    #[serde(default)]
    pub bundle_exec: bool,
}

impl Default for InvocationOptions {
    fn default() -> Self {
        Self {
            style: OutputStyle::default(),
            comments: true,
            relative: true,
            css: default_css(),
            sass: default_sass(),
            image: default_image(),
            javascript: default_javascript(),
            font: default_font(),
            import_path: Vec::new(),
            config_file: None,
            require: Vec::new(),
            logging: true,
            load_all: None,
            project: default_project(),
            watch: false,
            bundle_exec: false,
        }
    }
}

impl InvocationOptions {
    /// Defaults rooted at `project`.
    pub fn for_project(project: impl Into<PathBuf>) -> Self {
        Self {
            project: project.into(),
            ..Self::default()
        }
    }

    /// Absolute directory the compiled CSS lands in.
    pub fn css_dir(&self) -> PathBuf {
        paths::normalize(&self.project.join(&self.css))
    }
}
