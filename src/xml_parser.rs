//! JaCoCo XML report parser.
//!
//! JaCoCo XML structure:
//!   <report name="...">
//!     <sessioninfo id="..." start="..." dump="..."/>
//!     <group name="...">                       (multi-module reports only)
//!       <package name="com/example">
//!         <class name="com/example/Foo" sourcefilename="Foo.java">
//!           <method name="run" desc="()V" line="10">
//!             <counter type="INSTRUCTION" missed="0" covered="5"/>
//!           </method>
//!           <counter type="INSTRUCTION" missed="2" covered="10"/>
//!         </class>
//!         <sourcefile name="Foo.java">...</sourcefile>
//!         <counter type="INSTRUCTION" missed="2" covered="10"/>
//!       </package>
//!     </group>
//!     <counter type="INSTRUCTION" missed="2" covered="10"/>
//!   </report>
//!
//! The document is first read into a small owned element tree, then walked
//! with explicit attribute extraction. Only `<counter>` elements that are
//! direct children of an element count towards that element, so method
//! counters never leak into their class.
//!
//! DOCTYPE declarations are skipped. Entities are never resolved; anything
//! beyond the predefined XML entities is reported as malformed input.

use crate::aggregate::aggregate;
use crate::counter::{self, Counter, CounterMap};
use crate::error::{CoverageError, Result};
use crate::file_utils;
use crate::model::{CoverageClass, CoveragePackage, CoverageReport};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::path::Path;
use tracing::instrument;

/// Parse the XML report at `path`.
///
/// The file must exist, be readable and carry an `.xml` extension.
#[instrument(level = "debug", fields(path = %path.display()))]
pub fn parse_xml_report(path: &Path) -> Result<CoverageReport> {
    file_utils::ensure_readable_file(path)?;
    if !file_utils::has_extension(path, "xml") {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        return Err(CoverageError::invalid_format_in(
            path,
            format!("Expected XML file, got: {}", name),
        ));
    }

    let content = file_utils::read_report(path)?;
    let report = parse_xml_str(&content, path)?;
    tracing::debug!(
        "Parsed XML report '{}' with {} packages",
        report.name,
        report.packages.len()
    );
    Ok(report)
}

/// Parse XML report `content`. `path` is only used in error messages.
pub fn parse_xml_str(content: &str, path: &Path) -> Result<CoverageReport> {
    let root = read_tree(content, path)?;
    build_report(&root, content, path)
}

/// An element with its attributes and child elements. Text is dropped.
#[derive(Debug)]
struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    /// Byte offset just past the start tag, for line numbers.
    offset: usize,
}

impl XmlElement {
    fn from_start(start: &BytesStart<'_>, offset: usize) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(XmlElement {
            name,
            attributes,
            children: Vec::new(),
            offset,
        })
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// 1-based line of byte `offset` in `content`.
fn line_at(content: &str, offset: usize) -> u64 {
    let end = offset.min(content.len());
    let newlines = content.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count();
    newlines as u64 + 1
}

fn malformed(content: &str, path: &Path, offset: usize, context: impl Into<String>) -> CoverageError {
    CoverageError::invalid_format_at_line(path, line_at(content, offset), context)
}

/// Attach file and line to an error raised by the XML reader.
fn locate(err: CoverageError, content: &str, path: &Path, offset: usize) -> CoverageError {
    match err {
        CoverageError::InvalidFormat {
            context, source, ..
        } => CoverageError::InvalidFormat {
            file: Some(path.to_path_buf()),
            line: Some(line_at(content, offset)),
            context,
            source,
        },
        other => other,
    }
}

/// Read `content` into an element tree and return its root.
fn read_tree(content: &str, path: &Path) -> Result<XmlElement> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event_into(&mut buf);
        let offset = reader.buffer_position();
        let event = event.map_err(|e| locate(e.into(), content, path, offset))?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                if stack.is_empty() && root.is_some() {
                    return Err(malformed(
                        content,
                        path,
                        offset,
                        "Content after the root element",
                    ));
                }
                let element = XmlElement::from_start(e, offset)
                    .map_err(|err| locate(err, content, path, offset))?;
                if matches!(event, Event::Start(_)) {
                    stack.push(element);
                } else {
                    close(element, &mut stack, &mut root);
                }
            }
            Event::End(ref e) => match stack.pop() {
                Some(element) => close(element, &mut stack, &mut root),
                None => {
                    return Err(malformed(
                        content,
                        path,
                        offset,
                        format!(
                            "Unexpected closing tag '{}'",
                            String::from_utf8_lossy(e.name().as_ref())
                        ),
                    ));
                }
            },
            Event::Text(_) | Event::CData(_) if stack.is_empty() => {
                return Err(malformed(
                    content,
                    path,
                    offset,
                    "Text outside the root element",
                ));
            }
            Event::Eof => break,
            // Text inside elements, comments, processing instructions, the
            // XML declaration and DOCTYPE carry nothing we read.
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(malformed(
            content,
            path,
            content.len(),
            format!("Unexpected end of input: element '{}' is not closed", open.name),
        ));
    }
    root.ok_or_else(|| CoverageError::invalid_format_in(path, "Document has no root element"))
}

fn close(element: XmlElement, stack: &mut [XmlElement], root: &mut Option<XmlElement>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn build_report(root: &XmlElement, content: &str, path: &Path) -> Result<CoverageReport> {
    if root.name != "report" {
        return Err(CoverageError::invalid_format_in(
            path,
            format!(
                "Invalid JaCoCo XML format: root element should be 'report', found '{}'",
                root.name
            ),
        ));
    }

    let mut packages = Vec::new();
    collect_packages(root, content, path, &mut packages)?;

    let mut counters = direct_counters(root, content, path)?;
    if counters.is_empty() {
        counters = aggregate(packages.iter().map(|p| &p.counters));
    }

    Ok(CoverageReport {
        name: root.attr("name").unwrap_or_default().to_string(),
        packages,
        counters,
    })
}

/// Collect `<package>` children of `parent`, descending into `<group>`s.
fn collect_packages(
    parent: &XmlElement,
    content: &str,
    path: &Path,
    packages: &mut Vec<CoveragePackage>,
) -> Result<()> {
    for child in &parent.children {
        match child.name.as_str() {
            "package" => packages.push(build_package(child, content, path)?),
            "group" => collect_packages(child, content, path, packages)?,
            _ => {}
        }
    }
    Ok(())
}

fn build_package(element: &XmlElement, content: &str, path: &Path) -> Result<CoveragePackage> {
    let classes = element
        .children_named("class")
        .map(|c| build_class(c, content, path))
        .collect::<Result<Vec<_>>>()?;

    let mut counters = direct_counters(element, content, path)?;
    if counters.is_empty() {
        counters = aggregate(classes.iter().map(|c| &c.counters));
    }

    Ok(CoveragePackage {
        name: element.attr("name").unwrap_or_default().to_string(),
        classes,
        counters,
    })
}

fn build_class(element: &XmlElement, content: &str, path: &Path) -> Result<CoverageClass> {
    let name = required_attr(element, "name", content, path)?;
    let source_filename = element
        .attr("sourcefilename")
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(CoverageClass {
        name: name.to_string(),
        source_filename,
        counters: direct_counters(element, content, path)?,
    })
}

/// Counters declared as direct children of `element`.
fn direct_counters(element: &XmlElement, content: &str, path: &Path) -> Result<CounterMap> {
    let mut counters = CounterMap::new();
    for child in element.children_named("counter") {
        counter::insert_counter(&mut counters, build_counter(child, content, path)?);
    }
    Ok(counters)
}

fn build_counter(element: &XmlElement, content: &str, path: &Path) -> Result<Counter> {
    let kind = required_attr(element, "type", content, path)?;
    let missed = count_attr(element, "missed", content, path)?;
    let covered = count_attr(element, "covered", content, path)?;
    Ok(Counter::new(kind, missed, covered))
}

fn count_attr(element: &XmlElement, key: &str, content: &str, path: &Path) -> Result<u64> {
    let raw = required_attr(element, key, content, path)?;
    raw.trim().parse::<u64>().map_err(|_| {
        malformed(
            content,
            path,
            element.offset,
            format!("Invalid {} value in counter: '{}'", key, raw),
        )
    })
}

fn required_attr<'a>(
    element: &'a XmlElement,
    key: &str,
    content: &str,
    path: &Path,
) -> Result<&'a str> {
    element.attr(key).ok_or_else(|| {
        malformed(
            content,
            path,
            element.offset,
            format!(
                "Missing required attribute '{}' on <{}>",
                key, element.name
            ),
        )
    })
}
