//! Minimal CalculiX input deck reader
//!
//! Round-trips the subset of the deck format the writer produces that
//! matters for meshing workflows: nodes, elements, node sets, element sets
//! and `*Include` recursion. Every other keyword block is skipped without
//! error, so decks with materials, sections and steps still load their
//! mesh.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::element::{Element, ElementKind};
use crate::error::{CalxError, CalxResult};
use crate::model::Model;

enum ReadMode {
    None,
    Node,
    /// Data lines belong to elements of this kind; `None` for an element
    /// type we do not model, whose data lines are skipped.
    Element(Option<ElementKind>),
    NodeSet(String),
    ElementSet(String),
}

/// Read a deck into a fresh model named after the file stem.
pub fn read(path: impl AsRef<Path>) -> CalxResult<Model> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    let mut model = Model::new(name);
    read_into(&mut model, path)?;
    info!(
        path = %path.display(),
        nodes = model.node_count(),
        elements = model.element_count(),
        "read input deck"
    );
    Ok(model)
}

/// Read a deck into an existing model; called recursively for `*Include`.
pub fn read_into(model: &mut Model, path: impl AsRef<Path>) -> CalxResult<()> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let parse_err = |line: usize, message: String| CalxError::Parse {
        path: path.display().to_string(),
        line,
        message,
    };

    let mut mode = ReadMode::None;

    for (index, line) in text.lines().enumerate() {
        let lineno = index + 1;
        if line.starts_with("**") {
            continue;
        }

        if let Some(keyword_line) = line.strip_prefix('*') {
            let tokens: Vec<&str> = keyword_line.split(',').map(str::trim).collect();
            let keyword = tokens[0];

            if keyword.eq_ignore_ascii_case("Node") {
                mode = ReadMode::Node;
            } else if keyword.eq_ignore_ascii_case("Element") {
                let type_name = option_value(&tokens, "Type")
                    .ok_or_else(|| parse_err(lineno, "*Element without Type option".into()))?;
                let kind = ElementKind::from_keyword(type_name);
                if kind.is_none() {
                    debug!(r#type = type_name, "skipping unsupported element block");
                }
                mode = ReadMode::Element(kind);
            } else if keyword.eq_ignore_ascii_case("Nset") {
                let name = option_value(&tokens, "Nset")
                    .ok_or_else(|| parse_err(lineno, "*Nset without Nset option".into()))?;
                model.node_sets.replace(name, Vec::new());
                mode = ReadMode::NodeSet(name.to_string());
            } else if keyword.eq_ignore_ascii_case("Elset") {
                let name = option_value(&tokens, "Elset")
                    .ok_or_else(|| parse_err(lineno, "*Elset without Elset option".into()))?;
                model.element_sets.replace(name, Vec::new());
                mode = ReadMode::ElementSet(name.to_string());
            } else if keyword.eq_ignore_ascii_case("Include") {
                let input = option_value(&tokens, "Input")
                    .ok_or_else(|| parse_err(lineno, "*Include without Input option".into()))?;
                let directory = path.parent().unwrap_or_else(|| Path::new("."));
                read_into(model, directory.join(input))?;
            } else {
                mode = ReadMode::None;
            }
            continue;
        }

        let fields: Vec<&str> = line
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect();
        if fields.is_empty() {
            continue;
        }

        match &mode {
            ReadMode::None | ReadMode::Element(None) => {}
            ReadMode::Node => {
                if fields.len() < 4 {
                    return Err(parse_err(lineno, format!("node line '{}' too short", line)));
                }
                let tag = parse_usize(fields[0]).map_err(|m| parse_err(lineno, m))?;
                let x = parse_f64(fields[1]).map_err(|m| parse_err(lineno, m))?;
                let y = parse_f64(fields[2]).map_err(|m| parse_err(lineno, m))?;
                let z = parse_f64(fields[3]).map_err(|m| parse_err(lineno, m))?;
                model.add_node(tag, nalgebra::Point3::new(x, y, z))?;
            }
            ReadMode::Element(Some(kind)) => {
                let tag = parse_usize(fields[0]).map_err(|m| parse_err(lineno, m))?;
                let nodes: Vec<usize> = fields[1..]
                    .iter()
                    .map(|f| parse_usize(f))
                    .collect::<Result<_, _>>()
                    .map_err(|m| parse_err(lineno, m))?;
                model.add_element(Element::new(tag, *kind, nodes)?)?;
            }
            ReadMode::NodeSet(name) => {
                let tags: Vec<usize> = fields
                    .iter()
                    .map(|f| parse_usize(f))
                    .collect::<Result<_, _>>()
                    .map_err(|m| parse_err(lineno, m))?;
                model.node_sets.append(name, tags);
            }
            ReadMode::ElementSet(name) => {
                let tags: Vec<usize> = fields
                    .iter()
                    .map(|f| parse_usize(f))
                    .collect::<Result<_, _>>()
                    .map_err(|m| parse_err(lineno, m))?;
                model.element_sets.append(name, tags);
            }
        }
    }

    Ok(())
}

/// Value of a `Key=Value` option among keyword tokens, case-insensitive on
/// the key.
fn option_value<'a>(tokens: &[&'a str], key: &str) -> Option<&'a str> {
    tokens.iter().skip(1).find_map(|token| {
        let (k, v) = token.split_once('=')?;
        if k.trim().eq_ignore_ascii_case(key) {
            Some(v.trim())
        } else {
            None
        }
    })
}

fn parse_usize(field: &str) -> Result<usize, String> {
    field
        .parse()
        .map_err(|_| format!("invalid integer '{}'", field))
}

fn parse_f64(field: &str) -> Result<f64, String> {
    field
        .parse()
        .map_err(|_| format!("invalid number '{}'", field))
}
