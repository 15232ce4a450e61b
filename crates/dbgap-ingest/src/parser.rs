//! dbGaP XML parsing.
//!
//! One document describes one study: a root element (its name does not
//! matter) carrying the study attributes, with a flat list of
//! `<variable>` children. Parsing is a pure function over the document
//! text; `repository` and `filepath` come from the caller because the XML
//! itself records neither.
//!
//! Whitespace in text content is preserved exactly as written. Absent
//! optional attributes and children become empty strings, never holes in
//! the record.

use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesStart, Event};

use dbgap_model::{Section, Study, UNSECTIONED, Value, Variable};

use crate::error::ParseError;

/// Parse one dbGaP XML document into a [`Study`].
///
/// The root element must carry a `study_id` attribute, and every direct
/// child of the root must be a `<variable>`; anything else is a fatal
/// structural error. See [`ParseError`] for the full taxonomy.
pub fn parse_study(repository: &str, filepath: &str, text: &str) -> Result<Study, ParseError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().expand_empty_elements = true;

    let root = read_root(&mut reader)?;
    let attributes = read_attributes(&root)?;
    let study_id = attributes
        .get("study_id")
        .cloned()
        .ok_or(ParseError::MissingStudyId)?;

    // Grouping key -> variables in first-seen document order. The map's
    // natural key order decides section order in the output.
    let mut groups: BTreeMap<String, Vec<Variable>> = BTreeMap::new();
    loop {
        match reader.read_event()? {
            Event::Start(child) => {
                let tag = element_name(&child);
                if tag == "variable" {
                    let (key, variable) = read_variable(&mut reader, &child)?;
                    groups.entry(key).or_default().push(variable);
                } else {
                    return Err(ParseError::UnexpectedTag { tag });
                }
            }
            Event::End(_) => break,
            Event::Eof => return Err(ParseError::UnexpectedEof),
            _ => {}
        }
    }

    let sections = groups
        .into_iter()
        .map(|(section_name, variables)| Section {
            section_name,
            variables,
        })
        .collect();

    Ok(Study {
        repository: repository.to_string(),
        filepath: filepath.to_string(),
        study_id,
        study_name: attribute_or_default(&attributes, "study_name"),
        study_description: attribute_or_default(&attributes, "study_description"),
        appl_id: attribute_or_default(&attributes, "appl_id"),
        study_version: attribute_or_default(&attributes, "study_version"),
        sections,
    })
}

/// Skip the prolog and return the root start tag.
fn read_root<'a>(reader: &mut Reader<&'a [u8]>) -> Result<BytesStart<'a>, ParseError> {
    loop {
        match reader.read_event()? {
            Event::Start(start) => return Ok(start),
            Event::Eof => return Err(ParseError::MissingRoot),
            _ => {}
        }
    }
}

/// Read one `<variable>` element, returning its section grouping key and
/// the extracted record.
fn read_variable(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
) -> Result<(String, Variable), ParseError> {
    let attributes = read_attributes(start)?;
    let id = attribute_or_default(&attributes, "id");
    // The generators disagree on the attribute name for the dictionary id.
    let dictionary_attribute = attributes
        .get("dd_id")
        .or_else(|| attributes.get("dictionary_id"));
    let dictionary_id = dictionary_attribute.cloned().unwrap_or_default();

    // Grouping priority: section, then module, then the dictionary id.
    // A variable with none of the three lands in the sentinel section.
    let section_key = attributes
        .get("section")
        .or_else(|| attributes.get("module"))
        .or(dictionary_attribute)
        .cloned()
        .unwrap_or_else(|| UNSECTIONED.to_string());

    let mut name: Option<String> = None;
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut data_type: Option<String> = None;
    let mut values = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(child) => {
                let tag = element_name(&child);
                match tag.as_str() {
                    "name" => assign_text_child(&mut name, reader, &tag, &id)?,
                    "title" => assign_text_child(&mut title, reader, &tag, &id)?,
                    "description" => assign_text_child(&mut description, reader, &tag, &id)?,
                    "type" => assign_text_child(&mut data_type, reader, &tag, &id)?,
                    "value" => values.push(read_value(reader, &child, &id)?),
                    // The generators attach odd extras below variables;
                    // only the known children carry meaning here.
                    _ => {
                        reader.read_to_end(child.name())?;
                    }
                }
            }
            Event::End(_) => break,
            Event::Eof => return Err(ParseError::UnexpectedEof),
            _ => {}
        }
    }

    let variable = Variable {
        dictionary_id,
        id,
        name: name.unwrap_or_default(),
        title: title.unwrap_or_default(),
        description: description.unwrap_or_default(),
        data_type: data_type.unwrap_or_default(),
        values,
    };
    Ok((section_key, variable))
}

/// Read one `<value code="…">label</value>` element.
fn read_value(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    variable_id: &str,
) -> Result<Value, ParseError> {
    let attributes = read_attributes(start)?;
    let code = attributes
        .get("code")
        .cloned()
        .ok_or_else(|| ParseError::MissingValueCode {
            variable_id: variable_id.to_string(),
        })?;
    let label = read_text_content(reader)?;
    Ok(Value { code, label })
}

/// Capture a single-occurrence text child; a second occurrence of the
/// same tag under one variable is a structural error.
fn assign_text_child(
    slot: &mut Option<String>,
    reader: &mut Reader<&[u8]>,
    tag: &str,
    variable_id: &str,
) -> Result<(), ParseError> {
    let text = read_text_content(reader)?;
    if slot.is_some() {
        return Err(ParseError::DuplicateChild {
            variable_id: variable_id.to_string(),
            tag: tag.to_string(),
        });
    }
    *slot = Some(text);
    Ok(())
}

/// Accumulate the text of the current element up to its end tag.
///
/// Nested elements are skipped wholesale; their text does not leak into
/// the parent, matching how the upstream consumers read these documents.
fn read_text_content(reader: &mut Reader<&[u8]>) -> Result<String, ParseError> {
    let mut out = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(text) => out.push_str(&text.decode().map_err(quick_xml::Error::from)?),
            Event::CData(cdata) => out.push_str(&String::from_utf8_lossy(&cdata)),
            Event::GeneralRef(reference) => out.push_str(&resolve_reference(&reference)?),
            Event::Start(nested) => {
                reader.read_to_end(nested.name())?;
            }
            Event::End(_) => break,
            Event::Eof => return Err(ParseError::UnexpectedEof),
            _ => {}
        }
    }
    Ok(out)
}

/// Resolve a character or predefined entity reference.
///
/// The dbGaP format has no DTD, so anything beyond the predefined five
/// and numeric character references is malformed.
fn resolve_reference(reference: &BytesRef<'_>) -> Result<String, ParseError> {
    let name = String::from_utf8_lossy(reference);
    let resolved = match name.as_ref() {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => char_reference(&name),
    };
    match resolved {
        Some(ch) => Ok(ch.to_string()),
        None => Err(ParseError::UnknownEntity {
            name: name.into_owned(),
        }),
    }
}

fn char_reference(name: &str) -> Option<char> {
    let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        name.strip_prefix('#')?.parse().ok()?
    };
    char::from_u32(code)
}

fn read_attributes(start: &BytesStart<'_>) -> Result<BTreeMap<String, String>, ParseError> {
    let mut out = BTreeMap::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        out.insert(key, value);
    }
    Ok(out)
}

fn attribute_or_default(attributes: &BTreeMap<String, String>, key: &str) -> String {
    attributes.get(key).cloned().unwrap_or_default()
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}
