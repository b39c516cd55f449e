use crate::foundation::core::{BoxGeometry, EMU_PER_INCH, SlideSize};
use crate::foundation::error::{DeckError, DeckResult};
use crate::template::Template;
use crate::template::capability::{
    Placeholder, PlaceholderCapabilitySet, PlaceholderRole, TemplateLayout,
};
use crate::theme::scheme::resolve_theme;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const LAYOUT_PREFIX: &str = "ppt/slideLayouts/slideLayout";
const MASTER_PREFIX: &str = "ppt/slideMasters/slideMaster";

/// A `p:ph` shape as declared in a layout or master part.
#[derive(Clone, Debug, Default, PartialEq)]
struct RawPlaceholder {
    ph_type: Option<String>,
    idx: Option<u32>,
    bounds: Option<BoxGeometry>,
}

impl RawPlaceholder {
    /// Master slot kind a layout placeholder inherits geometry from.
    fn master_kind(&self) -> &'static str {
        match self.ph_type.as_deref() {
            Some("title" | "ctrTitle") => "title",
            _ => "body",
        }
    }
}

/// Shapes and name of one layout or master part.
#[derive(Debug, Default)]
struct PartShapes {
    name: Option<String>,
    placeholders: Vec<RawPlaceholder>,
}

pub(crate) fn load_package(path: &Path) -> DeckResult<Template> {
    let file = File::open(path).map_err(|e| {
        DeckError::template(format!("failed to open template {}: {e}", path.display()))
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| {
        DeckError::template(format!("{} is not a presentation package: {e}", path.display()))
    })?;

    let presentation = read_part(&mut archive, PRESENTATION_PART)?
        .ok_or_else(|| DeckError::template(format!("{PRESENTATION_PART} is missing")))?;
    let slide_size = parse_slide_size(&presentation).unwrap_or_default();

    let master_name = first_numbered_part(&archive, MASTER_PREFIX);
    let master = match &master_name {
        Some(name) => match read_part(&mut archive, name)? {
            Some(xml) => Some((name.clone(), xml)),
            None => None,
        },
        None => None,
    };

    let master_shapes = master
        .as_ref()
        .map(|(_, xml)| parse_shapes(xml))
        .unwrap_or_default();

    let layout_parts = match &master {
        Some((name, xml)) => ordered_layouts(&mut archive, name, xml)?,
        None => Vec::new(),
    };
    let layout_parts = if layout_parts.is_empty() {
        numbered_parts(&archive, LAYOUT_PREFIX)
    } else {
        layout_parts
    };
    if layout_parts.is_empty() {
        return Err(DeckError::template(format!(
            "{} declares no slide layouts",
            path.display()
        )));
    }

    let mut layouts = Vec::with_capacity(layout_parts.len());
    for (index, part) in layout_parts.iter().enumerate() {
        let Some(xml) = read_part(&mut archive, part)? else {
            tracing::warn!(part = %part, "layout part referenced but missing; skipping");
            continue;
        };
        let shapes = parse_shapes(&xml);
        let placeholders = shapes
            .placeholders
            .iter()
            .filter_map(|raw| {
                let role = PlaceholderRole::from_ooxml(raw.ph_type.as_deref())?;
                let bounds = inherit_bounds(raw, &master_shapes.placeholders)
                    .unwrap_or_else(|| slide_size.bounds());
                Some(Placeholder::new(role, bounds, slide_size))
            })
            .collect();
        layouts.push(TemplateLayout {
            index,
            name: shapes.name.unwrap_or_default(),
            capabilities: PlaceholderCapabilitySet::new(placeholders),
        });
    }

    Ok(Template {
        source: path.to_path_buf(),
        slide_size,
        layouts,
        theme: resolve_theme(path),
    })
}

fn read_part(archive: &mut ZipArchive<File>, name: &str) -> DeckResult<Option<Vec<u8>>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(DeckError::template(format!("failed to read {name}: {e}"))),
    };
    let mut buf = Vec::new();
    entry
        .read_to_end(&mut buf)
        .map_err(|e| DeckError::template(format!("failed to read {name}: {e}")))?;
    Ok(Some(buf))
}

/// Parts named `<prefix><n>.xml`, sorted by `n`.
fn numbered_parts(archive: &ZipArchive<File>, prefix: &str) -> Vec<String> {
    let mut parts: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let n = name.strip_prefix(prefix)?.strip_suffix(".xml")?;
            Some((n.parse().ok()?, name.to_owned()))
        })
        .collect();
    parts.sort();
    parts.into_iter().map(|(_, name)| name).collect()
}

fn first_numbered_part(archive: &ZipArchive<File>, prefix: &str) -> Option<String> {
    numbered_parts(archive, prefix).into_iter().next()
}

/// Layout parts in the master's `sldLayoutIdLst` order.
fn ordered_layouts(
    archive: &mut ZipArchive<File>,
    master_part: &str,
    master_xml: &[u8],
) -> DeckResult<Vec<String>> {
    let Some((dir, file)) = master_part.rsplit_once('/') else {
        return Ok(Vec::new());
    };
    let rels_part = format!("{dir}/_rels/{file}.rels");
    let Some(rels_xml) = read_part(archive, &rels_part)? else {
        return Ok(Vec::new());
    };
    let targets = parse_relationships(&rels_xml);

    let mut out = Vec::new();
    for rid in layout_rel_ids(master_xml) {
        if let Some(target) = targets.get(&rid) {
            out.push(resolve_target(dir, target));
        }
    }
    Ok(out)
}

fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(abs) = target.strip_prefix('/') {
        return abs.to_owned();
    }
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for seg in target.split('/') {
        match seg {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            s => segments.push(s),
        }
    }
    segments.join("/")
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| std::str::from_utf8(&a.value).ok().map(str::to_owned))
}

fn attr_i64(e: &BytesStart<'_>, key: &[u8]) -> Option<i64> {
    attr(e, key).and_then(|v| v.trim().parse().ok())
}

fn local_tag(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn parse_slide_size(xml: &[u8]) -> Option<SlideSize> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) if local_tag(e) == "sldSz" => {
                let cx = attr_i64(e, b"cx")?;
                let cy = attr_i64(e, b"cy")?;
                return (cx > 0 && cy > 0).then(|| SlideSize::from_emu(cx, cy));
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

fn parse_relationships(xml: &[u8]) -> HashMap<String, String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut out = HashMap::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if local_tag(e) == "Relationship" =>
            {
                if let (Some(id), Some(target)) = (attr(e, b"Id"), attr(e, b"Target")) {
                    out.insert(id, target);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
    out
}

/// Relationship ids of `p:sldLayoutId` entries, in order.
fn layout_rel_ids(master_xml: &[u8]) -> Vec<String> {
    let mut reader = Reader::from_reader(master_xml);
    reader.config_mut().trim_text(true);
    let mut out = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) if local_tag(e) == "sldLayoutId" => {
                // The relationship id is the prefixed `r:id`; the bare `id` is numeric.
                let rid = e
                    .attributes()
                    .flatten()
                    .find(|a| a.key.prefix().is_some() && a.key.local_name().as_ref() == b"id")
                    .and_then(|a| std::str::from_utf8(&a.value).ok().map(str::to_owned));
                if let Some(rid) = rid {
                    out.push(rid);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
    out
}

/// Collect the part's `cSld@name` and every placeholder shape with its own transform.
fn parse_shapes(xml: &[u8]) -> PartShapes {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut out = PartShapes::default();
    let mut current: Option<(RawPlaceholder, bool)> = None;
    let mut in_xfrm = false;
    let mut off: Option<(i64, i64)> = None;
    let mut ext: Option<(i64, i64)> = None;

    loop {
        let event = reader.read_event();
        match event {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let tag = local_tag(e);
                match tag.as_str() {
                    "cSld" => out.name = attr(e, b"name"),
                    "sp" | "pic" | "graphicFrame" if current.is_none() => {
                        current = Some((RawPlaceholder::default(), false));
                        off = None;
                        ext = None;
                    }
                    "ph" => {
                        if let Some((raw, seen)) = current.as_mut() {
                            raw.ph_type = attr(e, b"type");
                            raw.idx = attr(e, b"idx").and_then(|v| v.parse().ok());
                            *seen = true;
                        }
                    }
                    "xfrm" if current.is_some() => in_xfrm = matches!(event, Ok(Event::Start(_))),
                    "off" if in_xfrm => off = attr_i64(e, b"x").zip(attr_i64(e, b"y")),
                    "ext" if in_xfrm => ext = attr_i64(e, b"cx").zip(attr_i64(e, b"cy")),
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"xfrm" => in_xfrm = false,
                    b"sp" | b"pic" | b"graphicFrame" => {
                        if let Some((mut raw, true)) = current.take() {
                            raw.bounds = off.zip(ext).map(|((x, y), (cx, cy))| {
                                BoxGeometry::new(
                                    x as f64 / EMU_PER_INCH,
                                    y as f64 / EMU_PER_INCH,
                                    cx as f64 / EMU_PER_INCH,
                                    cy as f64 / EMU_PER_INCH,
                                )
                            });
                            out.placeholders.push(raw);
                        }
                        current = None;
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                tracing::warn!(error = %err, "malformed layout xml; keeping shapes read so far");
                break;
            }
            _ => {}
        }
    }
    out
}

/// Own transform first, then the master slot with the same `idx`, then the master slot of
/// the same kind.
fn inherit_bounds(raw: &RawPlaceholder, master: &[RawPlaceholder]) -> Option<BoxGeometry> {
    if raw.bounds.is_some() {
        return raw.bounds;
    }
    if let Some(idx) = raw.idx
        && let Some(b) = master
            .iter()
            .find(|m| m.idx == Some(idx) && m.bounds.is_some())
            .and_then(|m| m.bounds)
    {
        return Some(b);
    }
    let kind = raw.master_kind();
    master
        .iter()
        .filter(|m| m.ph_type.as_deref().is_some_and(|t| matches!(t, "title" | "body")))
        .find(|m| m.master_kind() == kind)
        .and_then(|m| m.bounds)
}

#[cfg(test)]
#[path = "../../tests/unit/template/package.rs"]
mod tests;
