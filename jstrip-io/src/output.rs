//! Output path selection

use std::path::{Path, PathBuf};

/// Suffix carried by derived output names
pub const FILTERED_SUFFIX: &str = ".filtered.json";

/// How a derived output name is built from the input path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamingRule {
    /// `<dir>/<file stem>.filtered.json` (last extension replaced)
    #[default]
    Stem,
    /// `<input path>.filtered.json` (suffix appended to the full name)
    Append,
}

/// Where the filtered document goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Derive the path from the input with the given rule
    Derived(NamingRule),
    /// Write to an explicit path
    Path(PathBuf),
}

impl Default for OutputTarget {
    fn default() -> Self {
        OutputTarget::Derived(NamingRule::default())
    }
}

impl OutputTarget {
    /// Resolve the concrete output path for `input`
    pub fn resolve(&self, input: &Path) -> PathBuf {
        match self {
            OutputTarget::Derived(rule) => derive_output_path(input, *rule),
            OutputTarget::Path(path) => path.clone(),
        }
    }
}

/// Derive the output path for `input` under `rule`
pub fn derive_output_path(input: &Path, rule: NamingRule) -> PathBuf {
    match rule {
        NamingRule::Stem => {
            let mut name = input.file_stem().unwrap_or_default().to_os_string();
            name.push(FILTERED_SUFFIX);
            input.with_file_name(name)
        }
        NamingRule::Append => {
            let mut raw = input.as_os_str().to_os_string();
            raw.push(FILTERED_SUFFIX);
            PathBuf::from(raw)
        }
    }
}

/// Directory the output (and its temporary sibling) lives in
pub(crate) fn output_dir(output: &Path) -> &Path {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
