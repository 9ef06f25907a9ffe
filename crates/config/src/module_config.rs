// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `.updmod` config file parser: `[NativeModule]` / `[DerivedModule]`,
//! `[Arguments]`, `[Defaults]`, continuation lines, `#` comments.

use std::path::Path;

use indexmap::IndexMap;
use uprocd_core::config::{
    ArgumentType, ConfigScalar, ConfigValue, DerivedModuleConfig, ModuleKind, NativeModuleConfig,
    ScalarKind,
};
use uprocd_core::{ConfigError, ModuleConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KindTag {
    Native,
    Derived,
}

/// A line-oriented cursor over a config file's raw lines, mirroring the
/// original's `readline`-plus-one-character-of-lookahead parser.
struct Lines<'a> {
    lines: Vec<&'a str>,
    pos: usize,
    lineno: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        // A trailing newline produces a final empty slice; drop it so it
        // isn't mistaken for a blank content line.
        let mut lines: Vec<&str> = text.split('\n').collect();
        if lines.last() == Some(&"") {
            lines.pop();
        }
        Self { lines, pos: 0, lineno: 0 }
    }

    fn next_line(&mut self) -> Option<&'a str> {
        let line = self.lines.get(self.pos).copied()?;
        self.pos += 1;
        self.lineno += 1;
        Some(line)
    }

    fn peek_line(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }
}

pub fn parse_module_config(path: &Path) -> Result<ModuleConfig, ConfigError> {
    let path_str = path.display().to_string();
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io { path: path_str.clone(), source: std::sync::Arc::new(e) })?;
    parse_module_config_str(&text, &path_str)
}

fn parse_module_config_str(text: &str, path: &str) -> Result<ModuleConfig, ConfigError> {
    let mut lines = Lines::new(text);

    let mut kind_tag: Option<KindTag> = None;
    let mut section: Option<String> = None;

    let mut process_name: Option<String> = None;
    let mut description: Option<String> = None;

    let mut native_lib: Option<String> = None;
    let mut arguments: IndexMap<String, ArgumentType> = IndexMap::new();
    let mut values: IndexMap<String, ConfigValue> = IndexMap::new();

    let mut base: Option<String> = None;
    let mut value_overlay: IndexMap<String, String> = IndexMap::new();

    while let Some(raw) = lines.next_line() {
        let line = raw.trim_matches(|c| c == '\t' || c == ' ');
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let Some(name) = rest.strip_suffix(']') else {
                return Err(ConfigError::UnterminatedSection {
                    path: path.to_string(),
                    line: lines.lineno,
                });
            };

            match name {
                "NativeModule" | "DerivedModule" => {
                    if kind_tag.is_some() {
                        return Err(ConfigError::DuplicateModuleDeclaration {
                            path: path.to_string(),
                            line: lines.lineno,
                        });
                    }
                    kind_tag = Some(if name == "NativeModule" { KindTag::Native } else { KindTag::Derived });
                }
                "Arguments" | "Defaults" => {
                    if kind_tag != Some(KindTag::Native) {
                        return Err(ConfigError::SectionRequiresNative {
                            path: path.to_string(),
                            line: lines.lineno,
                            section: name.to_string(),
                        });
                    }
                }
                _ => {
                    return Err(ConfigError::InvalidSection {
                        path: path.to_string(),
                        line: lines.lineno,
                        section: name.to_string(),
                    })
                }
            }

            section = Some(name.to_string());
            continue;
        }

        let Some(eq) = line.find('=') else {
            return Err(ConfigError::MissingEquals { path: path.to_string(), line: lines.lineno });
        };
        let key = line[..eq].trim().to_string();
        let mut value = line[eq + 1..].trim().to_string();

        value.push_str(&read_continuation(&mut lines));

        let Some(section_name) = section.as_deref() else {
            return Err(ConfigError::KeyOutsideSection { path: path.to_string(), line: lines.lineno, key });
        };

        match section_name {
            "NativeModule" | "DerivedModule" => match key.as_str() {
                "ProcessName" => process_name = Some(value),
                "Description" => description = Some(value),
                "NativeLib" if kind_tag == Some(KindTag::Native) => native_lib = Some(value),
                "Base" if kind_tag == Some(KindTag::Derived) => base = Some(value),
                _ if kind_tag == Some(KindTag::Derived) => {
                    value_overlay.insert(key, value);
                }
                _ => {
                    return Err(ConfigError::InvalidKey {
                        path: path.to_string(),
                        line: lines.lineno,
                        key,
                        section: section_name.to_string(),
                    })
                }
            },
            "Arguments" => {
                let ty = parse_argument_type(&value).ok_or_else(|| ConfigError::InvalidArgumentType {
                    path: path.to_string(),
                    line: lines.lineno,
                    type_name: value.clone(),
                })?;
                arguments.insert(key, ty);
            }
            "Defaults" => {
                let Some(&ty) = arguments.get(&key) else {
                    return Err(ConfigError::UnknownArgument { path: path.to_string(), line: lines.lineno, key });
                };
                let parsed = parse_default_value(&value, ty).ok_or_else(|| ConfigError::TypeMismatch {
                    path: path.to_string(),
                    line: lines.lineno,
                    key: key.clone(),
                })?;
                values.insert(key, parsed);
            }
            _ => unreachable!("section names are validated when a '[...]' line is parsed"),
        }
    }

    let kind = match kind_tag {
        Some(KindTag::Native) => {
            let native_lib = native_lib.ok_or_else(|| ConfigError::InvalidKey {
                path: path.to_string(),
                line: 0,
                key: "NativeLib".to_string(),
                section: "NativeModule".to_string(),
            })?;
            ModuleKind::Native(NativeModuleConfig { native_lib, arguments, values })
        }
        Some(KindTag::Derived) => {
            let base = base.ok_or_else(|| ConfigError::DerivedModuleMissingBase { path: path.to_string() })?;
            ModuleKind::Derived(DerivedModuleConfig { base, value_overlay })
        }
        None => {
            return Err(ConfigError::InvalidSection { path: path.to_string(), line: 0, section: String::new() })
        }
    };

    Ok(ModuleConfig { process_name, description, kind })
}

/// Reads zero or more indentation-continued lines following a `key =
/// value` line. A line is a continuation only if its very first
/// character is a literal space; blank lines inside a continuation run
/// are silently skipped. The indentation of the *first* continuation
/// line is the normalization baseline; later lines are stripped by
/// `min(line_indent, baseline)`, so a shallower-indented later line is
/// clamped rather than over-stripped.
fn read_continuation(lines: &mut Lines<'_>) -> String {
    let mut out = String::new();
    let mut baseline: Option<usize> = None;

    loop {
        match lines.peek_line() {
            None => break,
            Some(next) if next.is_empty() => {
                lines.next_line();
            }
            Some(next) => {
                if !next.starts_with(' ') {
                    break;
                }
                #[allow(clippy::expect_used)]
                let line = lines.next_line().expect("peeked line must exist");
                let indent = line.chars().take_while(|c| c.is_whitespace()).count();
                let base = *baseline.get_or_insert(indent);
                let strip = indent.min(base);
                out.push('\n');
                out.push_str(&line[strip.min(line.len())..]);
            }
        }
    }

    out
}

fn parse_argument_type(value: &str) -> Option<ArgumentType> {
    if let Some(rest) = value.strip_prefix("list ") {
        if rest.starts_with("list ") {
            return None;
        }
        let scalar = parse_scalar_kind(rest)?;
        return Some(ArgumentType::List(scalar));
    }
    parse_scalar_kind(value).map(ArgumentType::Scalar)
}

fn parse_scalar_kind(value: &str) -> Option<ScalarKind> {
    match value {
        "string" => Some(ScalarKind::String),
        "number" => Some(ScalarKind::Number),
        _ => None,
    }
}

fn parse_default_value(value: &str, ty: ArgumentType) -> Option<ConfigValue> {
    match ty {
        ArgumentType::Scalar(scalar) => parse_scalar_value(value, scalar).map(ConfigValue::Scalar),
        ArgumentType::List(scalar) => {
            let items = value
                .split_whitespace()
                .map(|tok| parse_scalar_value(tok, scalar))
                .collect::<Option<Vec<_>>>()?;
            Some(ConfigValue::List(items))
        }
    }
}

fn parse_scalar_value(value: &str, kind: ScalarKind) -> Option<ConfigScalar> {
    match kind {
        ScalarKind::String => Some(ConfigScalar::String(value.to_string())),
        ScalarKind::Number => value.parse::<f64>().ok().map(ConfigScalar::Number),
    }
}

#[cfg(test)]
#[path = "module_config_tests.rs"]
mod tests;
