use super::*;
use crate::spec::model::AgendaConfig;

fn deck(slides: Vec<SlideSpec>, agenda: Option<AgendaSetting>) -> PresentationSpec {
    let mut spec = PresentationSpec::new(slides);
    spec.agenda = agenda;
    spec
}

fn sections(n: usize) -> Vec<SlideSpec> {
    let mut v = vec![SlideSpec::title("Deck", None)];
    v.extend((1..=n).map(|i| SlideSpec::bullets(format!("Section {i}"), ["x"])));
    v
}

#[test]
fn agenda_is_opt_in() {
    assert!(plan_agenda(&deck(sections(3), None)).is_none());
    assert!(plan_agenda(&deck(sections(3), Some(AgendaSetting::Enabled(false)))).is_none());
    let disabled = AgendaConfig {
        enabled: Some(false),
        ..AgendaConfig::default()
    };
    assert!(plan_agenda(&deck(sections(3), Some(AgendaSetting::Config(disabled)))).is_none());
}

#[test]
fn agenda_follows_leading_title_slide() {
    let plan = plan_agenda(&deck(sections(3), Some(AgendaSetting::Enabled(true)))).unwrap();
    assert_eq!(plan.insert_at, 1);
    assert_eq!(plan.entries, vec!["Section 1", "Section 2", "Section 3"]);
    assert_eq!(plan.slide.kind(), SlideKind::Bullets);
    assert_eq!(plan.slide.title_text(), Some("Agenda"));

    let no_cover = vec![
        SlideSpec::bullets("A", ["x"]),
        SlideSpec::bullets("B", ["y"]),
    ];
    let plan = plan_agenda(&deck(no_cover, Some(AgendaSetting::Enabled(true)))).unwrap();
    assert_eq!(plan.insert_at, 0);
}

#[test]
fn exclusions_and_agenda_titles() {
    let mut slides = sections(3);
    slides[1].common.agenda_exclude = Some(true);
    slides[2].common.agenda_title = Some("Short name".into());
    let cfg = AgendaConfig {
        title: Some("Contents".into()),
        template_layout_index: Some(2),
        ..AgendaConfig::default()
    };
    let plan = plan_agenda(&deck(slides, Some(AgendaSetting::Config(cfg)))).unwrap();
    assert_eq!(plan.entries, vec!["Short name", "Section 3"]);
    assert_eq!(plan.slide.title_text(), Some("Contents"));
    assert_eq!(plan.pins().index, Some(2));
}

#[test]
fn long_agendas_split_into_two_columns() {
    let plan = plan_agenda(&deck(sections(11), Some(AgendaSetting::Enabled(true)))).unwrap();
    match &plan.slide.content {
        SlideContent::TwoColumn { left, right, .. } => {
            assert_eq!(left.lines().count(), 6);
            assert_eq!(right.lines().count(), 5);
            assert!(left.starts_with("• Section 1"));
            assert!(right.starts_with("• Section 7"));
        }
        other => panic!("unexpected agenda content {other:?}"),
    }
}

#[test]
fn nothing_to_list_means_no_agenda() {
    let only_title = vec![SlideSpec::title("Deck", None)];
    assert!(plan_agenda(&deck(only_title, Some(AgendaSetting::Enabled(true)))).is_none());
    let titles = vec![SlideSpec::title("A", None), SlideSpec::title("B", None)];
    assert!(plan_agenda(&deck(titles, Some(AgendaSetting::Enabled(true)))).is_none());
}
