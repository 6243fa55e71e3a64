//! Layered configuration: an optional `unionize.{toml,json,yaml}` file overlaid by
//! `UNIONIZE_*` environment variables.

use std::path::{Path, PathBuf};

use config::File;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use validator::Validate;

use crate::{Error, default};

pub trait NewForConfig
where
    Self: Sized + DeserializeOwned + Validate, {
    const NAME: &'static str;
    const ENV_PREFIX: &'static str;

    fn new<S: AsRef<str>>(dir: Option<S>) -> crate::Result<Self> {
        let file_name = format!(
            "{}",
            PathBuf::from(
                dir.map(|s| String::from(s.as_ref()))
                    .unwrap_or("./".into())
            )
            .join(Self::NAME)
            .display()
        );

        let this: Self = config::ConfigBuilder::<config::builder::DefaultState>::default()
            .add_source(File::with_name(&file_name).required(false))
            .add_source(
                config::Environment::with_prefix(Self::ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(Error::from_with_source_init(file_name.clone()))?
            .try_deserialize()
            .map_err(Error::from_with_source_init(file_name.clone()))?;

        this.validate()
            .map_err(Error::from_with_source_init(file_name.clone()))?;

        tracing::debug!(config = %file_name, "loaded configuration");
        Ok(this)
    }
}

default! {
    String: {
        marker = "DiscriminatedUnion".into(),
        case_list = "Cases".into(),
        generated_suffix = ".g.cs".into(),
        diagnostic_id = "CS7036".into(),
    },
    usize: { indent_width = 4 },
    PathBuf: { output_dir = "./generated".into() },
}

#[derive(Deserialize, Serialize, PartialEq, Debug, Clone, Default, Validate)]
pub struct Sources {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Sources {
    /// Resolves the include globs, minus anything matching an exclude glob, sorted.
    pub fn paths(&self) -> crate::Result<Vec<PathBuf>> {
        crate::generate::sources::match_paths(&self.include, &self.exclude)
    }
}

#[derive(Deserialize, Serialize, PartialEq, Debug, Clone, Validate)]
#[serde(rename_all = "kebab-case")]
pub struct AssistConfig {
    /// Host diagnostic id for a missing required argument.
    #[serde(default = "default_diagnostic_id", alias = "diagnostic_id")]
    #[validate(length(min = 1))]
    pub diagnostic_id: String,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            diagnostic_id: default_diagnostic_id(),
        }
    }
}

#[derive(Deserialize, Serialize, PartialEq, Debug, Clone, Validate)]
#[serde(rename_all = "kebab-case")]
pub struct UnionizeConfig {
    /// Name of the marker attribute, with or without the `Attribute` suffix.
    #[serde(default = "default_marker")]
    #[validate(length(min = 1))]
    pub marker: String,

    /// Name of the nested interface listing the cases.
    #[serde(default = "default_case_list", alias = "case_list")]
    #[validate(length(min = 1))]
    pub case_list: String,

    #[serde(default = "default_generated_suffix", alias = "generated_suffix")]
    #[validate(length(min = 1))]
    pub generated_suffix: String,

    #[serde(default = "default_indent_width", alias = "indent_width")]
    #[validate(range(min = 1, max = 8))]
    pub indent_width: usize,

    #[serde(default = "default_output_dir", alias = "output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub mem: bool,

    #[serde(default)]
    #[validate(nested)]
    pub sources: Sources,

    #[serde(default)]
    #[validate(nested)]
    pub assist: AssistConfig,
}

impl Default for UnionizeConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            case_list: default_case_list(),
            generated_suffix: default_generated_suffix(),
            indent_width: default_indent_width(),
            output_dir: default_output_dir(),
            mem: false,
            sources: Sources::default(),
            assist: AssistConfig::default(),
        }
    }
}

impl NewForConfig for UnionizeConfig {
    const NAME: &'static str = "unionize";
    const ENV_PREFIX: &'static str = "UNIONIZE";
}

impl UnionizeConfig {
    /// True when `path` names generated output.
    pub fn is_generated(
        &self,
        path: impl AsRef<Path>,
    ) -> bool {
        path.as_ref()
            .to_string_lossy()
            .ends_with(&self.generated_suffix)
    }

    pub fn set_mem(
        &mut self,
        mem: bool,
    ) {
        self.mem = mem;
    }
}
