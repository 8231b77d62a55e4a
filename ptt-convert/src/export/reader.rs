use super::{interchange_error, InterchangeRecord};
use ptt_common::{Error, GeneratedId, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldValue {
    Text(String),
    Ids(Vec<GeneratedId>),
    Empty,
}

/// Child elements of one record, keyed by tag name
#[derive(Debug, Clone, Default)]
pub struct Fields {
    values: HashMap<String, FieldValue>,
}

impl Fields {
    fn get(&self, name: &str) -> Result<&FieldValue> {
        self.values
            .get(name)
            .ok_or_else(|| Error::Interchange(format!("Missing element <{}>", name)))
    }

    pub fn text(&self, name: &str) -> Result<&str> {
        match self.get(name)? {
            FieldValue::Text(text) => Ok(text),
            FieldValue::Empty => Ok(""),
            FieldValue::Ids(_) => Err(Error::Interchange(format!(
                "Element <{}> holds ids, expected text",
                name
            ))),
        }
    }

    pub fn number<N: FromStr>(&self, name: &str) -> Result<N> {
        let text = self.text(name)?;
        text.trim()
            .parse()
            .map_err(|_| Error::Interchange(format!("<{}> is not a number: {:?}", name, text)))
    }

    pub fn ids(&self, name: &str) -> Result<Vec<GeneratedId>> {
        match self.get(name)? {
            FieldValue::Ids(ids) => Ok(ids.clone()),
            FieldValue::Empty => Ok(Vec::new()),
            FieldValue::Text(text) if text.trim().is_empty() => Ok(Vec::new()),
            FieldValue::Text(_) => Err(Error::Interchange(format!(
                "Element <{}> holds text, expected ids",
                name
            ))),
        }
    }
}

/// Parse a document produced by [`super::write_document`]
pub fn read_document<T: InterchangeRecord>(xml: &str) -> Result<Vec<T>> {
    // No trimming: text fields keep edge whitespace. Whitespace-only text
    // between elements falls through the `_` arms below.
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event().map_err(interchange_error)? {
            Event::Start(e) => {
                expect_tag(&e, T::ROOT)?;
                break;
            }
            Event::Empty(e) => {
                expect_tag(&e, T::ROOT)?;
                return Ok(Vec::new());
            }
            Event::Eof => {
                return Err(Error::Interchange(format!("Missing <{}> root", T::ROOT)));
            }
            _ => {}
        }
    }

    let mut records = Vec::new();
    loop {
        match reader.read_event().map_err(interchange_error)? {
            Event::Start(e) => {
                expect_tag(&e, T::ELEMENT)?;
                let id = id_attribute(&e)?;
                let fields = read_fields(&mut reader, T::ELEMENT)?;
                records.push(T::from_fields(id, &fields)?);
            }
            Event::Empty(e) => {
                expect_tag(&e, T::ELEMENT)?;
                records.push(T::from_fields(id_attribute(&e)?, &Fields::default())?);
            }
            Event::End(e) if e.name().as_ref() == T::ROOT.as_bytes() => break,
            Event::Eof => {
                return Err(Error::Interchange(format!("Unclosed <{}> root", T::ROOT)));
            }
            _ => {}
        }
    }

    Ok(records)
}

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn expect_tag(e: &BytesStart<'_>, expected: &str) -> Result<()> {
    if e.name().as_ref() == expected.as_bytes() {
        Ok(())
    } else {
        Err(Error::Interchange(format!(
            "Expected <{}>, found <{}>",
            expected,
            tag_name(e)
        )))
    }
}

fn id_attribute(e: &BytesStart<'_>) -> Result<GeneratedId> {
    let attribute = e
        .try_get_attribute("id")
        .map_err(interchange_error)?
        .ok_or_else(|| Error::Interchange(format!("<{}> has no id attribute", tag_name(e))))?;
    let value = attribute.unescape_value().map_err(interchange_error)?;
    parse_id(&value)
}

fn parse_id(text: &str) -> Result<GeneratedId> {
    text.trim()
        .parse()
        .map_err(|_| Error::Interchange(format!("Invalid id {:?}", text)))
}

fn read_fields(reader: &mut Reader<&[u8]>, element: &str) -> Result<Fields> {
    let mut fields = Fields::default();
    loop {
        match reader.read_event().map_err(interchange_error)? {
            Event::Start(e) => {
                let name = tag_name(&e);
                let value = read_field(reader, &name)?;
                fields.values.insert(name, value);
            }
            Event::Empty(e) => {
                fields.values.insert(tag_name(&e), FieldValue::Empty);
            }
            Event::End(e) if e.name().as_ref() == element.as_bytes() => return Ok(fields),
            Event::Eof => {
                return Err(Error::Interchange(format!("Unclosed <{}>", element)));
            }
            _ => {}
        }
    }
}

fn read_field(reader: &mut Reader<&[u8]>, name: &str) -> Result<FieldValue> {
    let mut text = String::new();
    let mut ids = Vec::new();
    let mut is_list = false;
    loop {
        match reader.read_event().map_err(interchange_error)? {
            Event::Text(t) => {
                text.push_str(&t.unescape().map_err(interchange_error)?);
            }
            Event::Start(e) if e.name().as_ref() == b"id" => {
                is_list = true;
                let value = reader.read_text(e.name()).map_err(interchange_error)?;
                ids.push(parse_id(&value)?);
            }
            Event::Start(e) => {
                return Err(Error::Interchange(format!(
                    "Unexpected <{}> inside <{}>",
                    tag_name(&e),
                    name
                )));
            }
            Event::End(e) if e.name().as_ref() == name.as_bytes() => break,
            Event::Eof => {
                return Err(Error::Interchange(format!("Unclosed <{}>", name)));
            }
            _ => {}
        }
    }

    Ok(if is_list {
        FieldValue::Ids(ids)
    } else {
        FieldValue::Text(text)
    })
}
