use crate::deck::normalize_newlines;
use crate::qa::capacity::{column_lines, kept_bullets};
use crate::spec::model::{SlideContent, SlideSpec};

/// Result of splitting one overloaded slide.
#[derive(Clone, Debug, PartialEq)]
pub struct SlideSplit {
    /// Replacement slides, in order.
    pub slides: Vec<SlideSpec>,
    /// Human-readable summary.
    pub change: String,
}

/// Copy of `slide` for part `index` (0-based) of `total`.
///
/// Every part loses its layout pins so it re-resolves on its own; parts after the first also
/// lose the identifier and get an `(i/total)` title suffix.
fn part_of(slide: &SlideSpec, content: SlideContent, index: usize, total: usize) -> SlideSpec {
    let mut part = SlideSpec {
        common: slide.common.clone(),
        content,
    };
    part.common.template_layout = None;
    part.common.template_layout_index = None;
    if index > 0 {
        part.common.id = None;
        part.append_to_title(&format!(" ({}/{total})", index + 1));
    }
    part
}

fn change_line(kind: &str, slide: &SlideSpec, total: usize) -> String {
    format!(
        "Split {kind} slide '{}' into {total} slides",
        slide.title_text().unwrap_or("")
    )
}

/// Split `slide` so no part holds more than `capacity` items.
///
/// Returns `None` when the slide already fits or its kind is never split.
pub fn split_slide(slide: &SlideSpec, capacity: usize) -> Option<SlideSplit> {
    let capacity = capacity.max(1);
    match &slide.content {
        SlideContent::Bullets { title, bullets } => {
            let kept = kept_bullets(bullets);
            if kept.len() <= capacity {
                return None;
            }
            let parts: Vec<_> = kept.chunks(capacity).collect();
            let total = parts.len();
            let slides = parts
                .into_iter()
                .enumerate()
                .map(|(i, chunk)| {
                    let content = SlideContent::Bullets {
                        title: title.clone(),
                        bullets: chunk.iter().map(|b| (*b).to_owned()).collect(),
                    };
                    part_of(slide, content, i, total)
                })
                .collect();
            Some(SlideSplit {
                slides,
                change: change_line("bullets", slide, total),
            })
        }
        SlideContent::TwoColumn { title, left, right } => {
            let (left, right) = (normalize_newlines(left), normalize_newlines(right));
            let (l, r) = (column_lines(&left), column_lines(&right));
            if l.len().max(r.len()) <= capacity {
                return None;
            }
            // Each part repeats the column headers.
            let body_chunk = capacity.max(2) - 1;
            let (l_head, l_body) = l.split_first().map_or(("", &[][..]), |(h, b)| (*h, b));
            let (r_head, r_body) = r.split_first().map_or(("", &[][..]), |(h, b)| (*h, b));
            let total = l_body
                .len()
                .div_ceil(body_chunk)
                .max(r_body.len().div_ceil(body_chunk))
                .max(1);

            let column = |head: &str, body: &[&str], i: usize| -> String {
                let start = (i * body_chunk).min(body.len());
                let end = ((i + 1) * body_chunk).min(body.len());
                std::iter::once(head)
                    .chain(body[start..end].iter().copied())
                    .collect::<Vec<_>>()
                    .join("\n")
                    .trim()
                    .to_owned()
            };
            let slides = (0..total)
                .map(|i| {
                    let content = SlideContent::TwoColumn {
                        title: title.clone(),
                        left: column(l_head, l_body, i),
                        right: column(r_head, r_body, i),
                    };
                    part_of(slide, content, i, total)
                })
                .collect();
            Some(SlideSplit {
                slides,
                change: change_line("two-column", slide, total),
            })
        }
        SlideContent::Workflow {
            title,
            steps,
            orientation,
            show_numbers,
        } => {
            if steps.len() <= capacity {
                return None;
            }
            let parts: Vec<_> = steps.chunks(capacity).collect();
            let total = parts.len();
            let slides = parts
                .into_iter()
                .enumerate()
                .map(|(i, chunk)| {
                    let content = SlideContent::Workflow {
                        title: title.clone(),
                        steps: chunk.to_vec(),
                        orientation: *orientation,
                        show_numbers: *show_numbers,
                    };
                    part_of(slide, content, i, total)
                })
                .collect();
            Some(SlideSplit {
                slides,
                change: change_line("workflow", slide, total),
            })
        }
        SlideContent::KpiCards {
            title,
            cards,
            cards_key,
            columns,
        } => {
            if cards.len() <= capacity {
                return None;
            }
            let parts: Vec<_> = cards.chunks(capacity).collect();
            let total = parts.len();
            let slides = parts
                .into_iter()
                .enumerate()
                .map(|(i, chunk)| {
                    let content = SlideContent::KpiCards {
                        title: title.clone(),
                        cards: chunk.to_vec(),
                        cards_key: *cards_key,
                        columns: *columns,
                    };
                    part_of(slide, content, i, total)
                })
                .collect();
            Some(SlideSplit {
                slides,
                change: change_line("kpi-cards", slide, total),
            })
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/qa/split.rs"]
mod tests;
