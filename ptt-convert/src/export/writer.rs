use super::{interchange_error, InterchangeRecord, XSI_NAMESPACE};
use ptt_common::{GeneratedId, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

const INDENT_SIZE: usize = 4;

/// Indenting XML writer with the handful of shapes the documents use
pub struct XmlWriter<W: Write> {
    inner: Writer<W>,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Writer::new_with_indent(inner, b' ', INDENT_SIZE),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.inner.write_event(event).map_err(interchange_error)
    }

    pub fn declaration(&mut self) -> Result<()> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    /// Root element with the namespace and schema location attributes
    pub fn start_root(&mut self, root: &str, namespace: &str) -> Result<()> {
        let schema_location = format!("{} {}.xsd", namespace, root);
        let mut start = BytesStart::new(root);
        start.push_attribute(("xmlns", namespace));
        start.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
        start.push_attribute(("xsi:schemaLocation", schema_location.as_str()));
        self.write(Event::Start(start))
    }

    pub fn start_record(&mut self, element: &str, id: GeneratedId) -> Result<()> {
        let id = id.to_string();
        let mut start = BytesStart::new(element);
        start.push_attribute(("id", id.as_str()));
        self.write(Event::Start(start))
    }

    pub fn end(&mut self, element: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(element)))
    }

    /// `<name>value</name>`
    pub fn text_element(&mut self, name: &str, value: &str) -> Result<()> {
        self.write(Event::Start(BytesStart::new(name)))?;
        self.write(Event::Text(BytesText::new(value)))?;
        self.end(name)
    }

    /// `<name><id>..</id>..</name>`, or `<name/>` when `ids` is empty
    pub fn id_list(&mut self, name: &str, ids: &[GeneratedId]) -> Result<()> {
        if ids.is_empty() {
            return self.write(Event::Empty(BytesStart::new(name)));
        }
        self.write(Event::Start(BytesStart::new(name)))?;
        for id in ids {
            self.text_element("id", &id.to_string())?;
        }
        self.end(name)
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

/// Serialize `records` as a complete document
pub fn write_document<T: InterchangeRecord>(records: &[T], namespace: &str) -> Result<String> {
    let mut xml = XmlWriter::new(Vec::new());
    xml.declaration()?;
    xml.start_root(T::ROOT, namespace)?;
    for record in records {
        xml.start_record(T::ELEMENT, record.id())?;
        record.write_fields(&mut xml)?;
        xml.end(T::ELEMENT)?;
    }
    xml.end(T::ROOT)?;

    let mut bytes = xml.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(interchange_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{ClassroomDoc, ProfessorDoc, StudentDoc};

    #[test]
    fn test_root_carries_namespace_and_schema_location() {
        let xml = write_document::<ClassroomDoc>(&[], "urn:ptt").unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("xmlns=\"urn:ptt\""));
        assert!(xml.contains(&format!("xmlns:xsi=\"{}\"", XSI_NAMESPACE)));
        assert!(xml.contains("xsi:schemaLocation=\"urn:ptt classrooms.xsd\""));
    }

    #[test]
    fn test_records_are_indented_by_four_spaces() {
        let rooms = [ClassroomDoc {
            id: 0,
            lecture_capacity: 45,
            tutorial_capacity: 30,
        }];
        let xml = write_document(&rooms, "urn:ptt").unwrap();
        assert!(xml.contains("\n    <classroom id=\"0\">"), "{}", xml);
        assert!(xml.contains("\n        <lecture_capacity>45</lecture_capacity>"), "{}", xml);
        assert!(xml.contains("\n        <tutorial_capacity>30</tutorial_capacity>"), "{}", xml);
    }

    #[test]
    fn test_text_is_escaped() {
        let professors = [ProfessorDoc {
            id: 0,
            name: "Kovač & <Novak>".to_string(),
            available_hours: 100,
        }];
        let xml = write_document(&professors, "urn:ptt").unwrap();
        assert!(xml.contains("<name>Kovač &amp; &lt;Novak&gt;</name>"), "{}", xml);
    }

    #[test]
    fn test_empty_list_is_self_closing() {
        let students = [StudentDoc { id: 7, subjects: vec![] }];
        let xml = write_document(&students, "urn:ptt").unwrap();
        assert!(xml.contains("<subjects/>"), "{}", xml);
    }
}
