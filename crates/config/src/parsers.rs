//! YAML and INI parsers producing nested configuration trees

use indexmap::IndexMap;
use ini::{Ini, ParseOption};
use serde_yaml::{Mapping, Value};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;
use types::{ConfigNode, ConfigTable, EnvflatError, Result};

/// INI section whose options are inherited by every other section
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Label used in errors for content that did not come from a file
const STRING_ORIGIN: &str = "<string>";

/// Read a `.yaml`/`.yml` file into a nested tree
pub fn parse_yaml(path: &Path) -> Result<ConfigTable> {
    let content = read_source(path)?;
    yaml_tree(&content).map_err(|message| parse_error(path, message))
}

/// Parse YAML content (for testing and embedding)
pub fn parse_yaml_str(content: &str) -> Result<ConfigTable> {
    yaml_tree(content).map_err(|message| parse_error(Path::new(STRING_ORIGIN), message))
}

/// Read a `.conf`/`.cfg`/`.ini` file into a two-level tree
///
/// The top level is keyed by section name, the second by lower-cased option
/// name. Values are kept as raw strings.
pub fn parse_ini(path: &Path) -> Result<ConfigTable> {
    let content = read_source(path)?;
    ini_tree(&content).map_err(|message| parse_error(path, message))
}

/// Parse INI content (for testing and embedding)
pub fn parse_ini_str(content: &str) -> Result<ConfigTable> {
    ini_tree(content).map_err(|message| parse_error(Path::new(STRING_ORIGIN), message))
}

fn read_source(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "Reading configuration source");
    std::fs::read_to_string(path)
        .map_err(|e| parse_error(path, format!("cannot read file: {}", e)))
}

fn parse_error(path: &Path, message: String) -> EnvflatError {
    EnvflatError::Parse {
        path: path.display().to_string(),
        message,
    }
}

fn yaml_tree(content: &str) -> std::result::Result<ConfigTable, String> {
    let mut value: Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
    value.apply_merge().map_err(|e| e.to_string())?;

    match untag(value) {
        Value::Null => Ok(ConfigTable::new()),
        Value::Mapping(mapping) => yaml_table(mapping),
        other => Err(format!(
            "top-level value must be a mapping, found {}",
            yaml_kind(&other)
        )),
    }
}

fn yaml_table(mapping: Mapping) -> std::result::Result<ConfigTable, String> {
    let mut table = ConfigTable::with_capacity(mapping.len());
    for (key, value) in mapping {
        let key = yaml_key(untag(key))?;
        let node = match untag(value) {
            Value::Mapping(child) => ConfigNode::Table(yaml_table(child)?),
            scalar => ConfigNode::Value(yaml_scalar(scalar)?),
        };
        table.insert(key, node);
    }
    Ok(table)
}

fn yaml_key(key: Value) -> std::result::Result<String, String> {
    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok("null".to_string()),
        other => Err(format!("unsupported mapping key of type {}", yaml_kind(&other))),
    }
}

fn yaml_scalar(value: Value) -> std::result::Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        // Sequences stay leaves, rendered as compact JSON
        sequence @ Value::Sequence(_) => serde_json::to_string(&sequence).map_err(|e| e.to_string()),
        Value::Mapping(_) | Value::Tagged(_) => Err("unexpected nested value".to_string()),
    }
}

fn untag(value: Value) -> Value {
    match value {
        Value::Tagged(tagged) => untag(tagged.value),
        other => other,
    }
}

fn yaml_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Line-level view of an INI document taken before rust-ini parses it
struct IniLayout {
    /// Content with continuation lines blanked out
    content: String,
    /// Continuation text keyed by (section, lower-cased option)
    continuations: HashMap<(String, String), String>,
}

/// Fold indented continuation lines and reject repeated sections or options
///
/// A non-blank, non-comment line indented deeper than the option above it
/// continues that option's value and is joined with `\n`. A blank line ends
/// the value.
fn scan_ini(content: &str) -> std::result::Result<IniLayout, String> {
    let mut layout = IniLayout {
        content: String::with_capacity(content.len()),
        continuations: HashMap::new(),
    };
    let mut section: Option<String> = None;
    let mut seen_sections = HashSet::new();
    let mut seen_options = HashSet::new();
    // Option whose value may continue, with the indent of its line
    let mut current: Option<(String, usize)> = None;

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();
        let indent = line.len() - line.trim_start().len();

        if trimmed.is_empty() {
            current = None;
            layout.content.push('\n');
            continue;
        }

        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            layout.content.push_str(line);
            layout.content.push('\n');
            continue;
        }

        if let Some((option, option_indent)) = &current {
            if indent > *option_indent {
                let key = (section.clone().unwrap_or_default(), option.clone());
                let value = layout.continuations.entry(key).or_default();
                value.push('\n');
                value.push_str(trimmed);
                layout.content.push('\n');
                continue;
            }
        }

        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            let name = trimmed[1..trimmed.len() - 1].trim().to_string();
            if !seen_sections.insert(name.clone()) {
                return Err(format!(
                    "line {}: section '{}' already exists",
                    line_number, name
                ));
            }
            seen_options.clear();
            section = Some(name);
            current = None;
        } else if let Some(split) = trimmed.find(|c: char| c == '=' || c == ':') {
            let option = trimmed[..split].trim().to_lowercase();
            if let Some(section) = &section {
                if !seen_options.insert(option.clone()) {
                    return Err(format!(
                        "line {}: option '{}' in section '{}' already exists",
                        line_number, option, section
                    ));
                }
            }
            current = Some((option, indent));
        } else {
            current = None;
        }

        layout.content.push_str(line);
        layout.content.push('\n');
    }

    Ok(layout)
}

fn ini_tree(content: &str) -> std::result::Result<ConfigTable, String> {
    let layout = scan_ini(content)?;
    let option = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    };
    let ini = Ini::load_from_str_opt(&layout.content, option).map_err(|e| e.to_string())?;

    let mut sections: IndexMap<String, ConfigTable> = IndexMap::new();
    let mut defaults = ConfigTable::new();

    for (section, properties) in ini.iter() {
        let Some(section) = section else {
            if let Some((key, _)) = properties.iter().next() {
                return Err(format!(
                    "file contains no section headers: option '{}' appears before any [section]",
                    key
                ));
            }
            continue;
        };

        let options = if section == DEFAULT_SECTION {
            &mut defaults
        } else {
            sections.entry(section.to_string()).or_default()
        };
        for (key, value) in properties.iter() {
            let key = key.to_lowercase();
            let mut value = value.to_string();
            if let Some(rest) = layout
                .continuations
                .get(&(section.to_string(), key.clone()))
            {
                value.push_str(rest);
            }
            options.insert(key, ConfigNode::Value(value));
        }
    }

    let mut tree = ConfigTable::with_capacity(sections.len());
    for (name, mut options) in sections {
        for (key, value) in &defaults {
            options
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        tree.insert(name, ConfigNode::Table(options));
    }
    Ok(tree)
}
