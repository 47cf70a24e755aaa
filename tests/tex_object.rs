mod common;

use std::path::PathBuf;

use common::{GlyphBoxRenderer, approx, builder};
use locus_tex::scene::{LEFT, RIGHT, Rgba, UP};
use locus_tex::tex::{
    ColorMap, MatchOptions, ShapeBuilder, TexConfig, TexError, TexKind, TexObject, TexRenderer,
};

fn leaf_counts(object: &TexObject) -> Vec<usize> {
    object.groups().iter().map(|g| g.leaves().len()).collect()
}

#[test]
fn isolated_substrings_and_color_keys_become_parts() {
    let b = builder();
    let config = TexConfig::formula()
        .isolate(["x", "y"])
        .color("=", Rgba::YELLOW)
        .unwrap();
    let object = TexObject::new(&b, &["x^2 + y^2 = 1"], config).unwrap();

    assert_eq!(object.tex_strings(), ["x", "^2 +", "y", "^2", "=", "1"]);
    assert_eq!(object.tex_string(), "x ^2 + y ^2 = 1");
    assert_eq!(leaf_counts(&object), [1, 2, 1, 1, 1, 1]);

    let equals = object.part_by_tex("=", MatchOptions::exact()).unwrap();
    assert!(equals.leaves().iter().all(|l| l.fill == Rgba::YELLOW));
    let x = object.part_by_tex("x", MatchOptions::exact()).unwrap();
    assert!(x.leaves().iter().all(|l| l.fill == Rgba::WHITE));
}

#[test]
fn every_substring_is_measured_after_one_whole_render() {
    let b = builder();
    let config = TexConfig::prose();
    TexObject::new(&b, &["Hello ", "world"], config).unwrap();

    assert_eq!(
        b.renderer().rendered(),
        [
            ("\\centering Hello world".to_string(), TexKind::Prose),
            ("Hello".to_string(), TexKind::Prose),
            ("world".to_string(), TexKind::Prose),
        ]
    );
}

#[test]
fn invisible_substring_gets_placeholder_next_to_previous_part() {
    let b = builder();
    let object = TexObject::new(&b, &["a", "\\quad", "b"], TexConfig::formula()).unwrap();

    assert_eq!(object.len(), 3);
    let [a, gap, bee] = object.groups() else {
        panic!("expected three parts");
    };
    assert!(!a.is_placeholder());
    assert!(gap.is_placeholder());
    assert!(!bee.is_placeholder());
    assert_eq!(gap.leaves().len(), 1);

    let at = gap.bounds().center();
    let expected = a.bounds().critical_point(RIGHT);
    assert!(approx(at[0], expected[0]) && approx(at[1], expected[1]));
}

#[test]
fn disagreeing_renders_are_a_count_mismatch() {
    let b = ShapeBuilder::new(GlyphBoxRenderer::new().with_extra("b", 1));
    let err = TexObject::new(&b, &["a", "b"], TexConfig::formula()).unwrap_err();

    match err {
        TexError::ShapeCountMismatch {
            tex,
            flat,
            measured,
        } => {
            assert_eq!(tex, "a b");
            assert_eq!(flat, 2);
            assert_eq!(measured, 3);
        }
        other => panic!("expected ShapeCountMismatch, got {other:?}"),
    }
}

struct BrokenRenderer;

impl TexRenderer for BrokenRenderer {
    fn render(&self, _markup: &str, _kind: TexKind) -> Result<PathBuf, TexError> {
        Err(TexError::ToolFailed {
            tool: "latex".to_string(),
            status: "exit status: 1".to_string(),
            input: PathBuf::from("broken.tex"),
            log: "! Undefined control sequence.".to_string(),
        })
    }
}

#[test]
fn renderer_failures_propagate() {
    let b = ShapeBuilder::new(BrokenRenderer);
    let err = TexObject::new(&b, &["\\nope"], TexConfig::formula()).unwrap_err();
    assert!(matches!(err, TexError::ToolFailed { ref tool, .. } if tool == "latex"));
}

#[test]
fn invalid_config_is_rejected_before_rendering() {
    let b = builder();
    let config = TexConfig {
        fill_opacity: -1.0,
        ..TexConfig::formula()
    };
    assert!(matches!(
        TexObject::new(&b, &["x"], config),
        Err(TexError::InvalidConfig(_))
    ));
    assert!(b.renderer().rendered().is_empty());
}

#[test]
fn query_facade_finds_indexes_and_sorts() {
    let b = builder();
    let config = TexConfig::formula().isolate(["b", "a", "c"]);
    let mut object = TexObject::new(&b, &["c", "a", "b"], config).unwrap();

    assert_eq!(object.get_parts_by_tex("a", MatchOptions::default()).len(), 1);
    assert!(object.get_part_by_tex("z", MatchOptions::default()).is_none());
    assert!(matches!(
        object.part_by_tex("z", MatchOptions::default()),
        Err(TexError::PartNotFound { .. })
    ));

    let a = object.part_by_tex("a", MatchOptions::default()).unwrap().id();
    assert_eq!(object.tree().index_of(a).unwrap(), 1);

    object.sort_alphabetically();
    let order: Vec<&str> = object.groups().iter().map(|g| g.tex()).collect();
    assert_eq!(order, ["a", "b", "c"]);
    assert_eq!(object.tree().index_of(a).unwrap(), 0);
    assert_eq!(object.index_of_part(&object.groups()[0]).unwrap(), 0);
    assert_eq!(
        object
            .index_of_part_by_tex("C", MatchOptions::ignore_case())
            .unwrap(),
        2
    );
}

#[test]
fn color_map_can_be_applied_after_construction() {
    let b = builder();
    let mut object = TexObject::new(&b, &["a", "b", "c"], TexConfig::formula()).unwrap();
    let map = ColorMap::new().with(["a", "c"], Rgba::TEAL).unwrap();

    object
        .set_color_by_tex_to_color_map(&map, MatchOptions::exact())
        .set_color_by_tex("b", Rgba::PINK, MatchOptions::exact());

    let fills: Vec<Rgba> = object.groups().iter().map(|g| g.leaves()[0].fill).collect();
    assert_eq!(fills, [Rgba::TEAL, Rgba::PINK, Rgba::TEAL]);
}

#[test]
fn layout_moves_all_parts_together() {
    let b = builder();
    let mut object = TexObject::new(&b, &["a", "b"], TexConfig::formula()).unwrap();
    let before = object.bounds();

    object.shift([1.0, 2.0]);
    let after = object.bounds();
    assert!(approx(after.min[0], before.min[0] + 1.0));
    assert!(approx(after.min[1], before.min[1] + 2.0));

    object.scale(2.0);
    assert!(approx(object.bounds().width(), 2.0 * before.width()));

    object.move_to([0.0, 0.0], LEFT);
    assert!(approx(object.bounds().min[0], 0.0));

    object.to_edge(UP, 0.5);
    assert!(approx(object.bounds().max[1], 3.5));

    object.center();
    assert!(approx(object.bounds().center()[0], 0.0));
    assert!(approx(object.bounds().center()[1], 0.0));
}

#[test]
fn into_mobject_nests_parts_under_a_root() {
    let b = builder();
    let config = TexConfig::formula().isolate(["+"]);
    let object = TexObject::new(&b, &["a+bc"], config).unwrap();
    let mobject = object.into_mobject();

    assert_eq!(mobject.name, "a + bc");
    assert_eq!(mobject.children.len(), 3);
    assert_eq!(mobject.children[2].children.len(), 2);
    assert_eq!(mobject.leaf_count(), 4);
}

#[test]
fn height_option_sets_total_height() {
    let b = builder();
    let config = TexConfig {
        height: Some(1.5),
        ..TexConfig::formula()
    };
    let object = TexObject::new(&b, &["x"], config).unwrap();
    assert!(approx(object.bounds().height(), 1.5));
}

#[test]
fn parts_of_a_cloned_object_are_not_found_in_the_source() {
    let b = builder();
    let config = TexConfig::formula().isolate(["a", "b"]);
    let object = TexObject::new(&b, &["a", "b"], config).unwrap();
    let copy = object.clone();

    assert_eq!(copy.index_of_part(&copy.groups()[1]).unwrap(), 1);
    assert!(matches!(
        object.index_of_part(&copy.groups()[1]),
        Err(TexError::GroupNotFound(_))
    ));
}
