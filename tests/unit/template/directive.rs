use super::*;

fn text(name: &str) -> TextDirective {
    match Directive::parse(name).map(|d| d.kind) {
        Some(DirectiveKind::Text(t)) => t,
        other => panic!("expected text directive for {name:?}, got {other:?}"),
    }
}

fn image(name: &str) -> ImageDirective {
    match Directive::parse(name).map(|d| d.kind) {
        Some(DirectiveKind::Image(i)) => i,
        other => panic!("expected image directive for {name:?}, got {other:?}"),
    }
}

#[test]
fn centered_single_line_text() {
    let d = Directive::parse("@x#t_c").unwrap();
    assert_eq!(d.field, "x");
    let DirectiveKind::Text(t) = d.kind else {
        panic!("expected text");
    };
    assert_eq!(t.align, HAlign::Center);
    assert_eq!(t.valign, VAlign::Top);
    assert!(!t.paragraph);
    assert_eq!(t.rotation_deg, None);
    assert!(!t.is_wrapped());
}

#[test]
fn right_and_default_left_alignment() {
    assert_eq!(text("@x#t_r").align, HAlign::Right);
    assert_eq!(text("@x#t").align, HAlign::Left);
    assert_eq!(text("@x#t_c_r").align, HAlign::Center);
}

#[test]
fn bare_p_sets_paragraph() {
    let t = text("@body#t_p");
    assert!(t.paragraph);
    assert_eq!(t.valign, VAlign::Top);
    assert!(t.is_wrapped());
}

#[test]
fn pm_sets_middle_and_clears_paragraph() {
    let t = text("@x#t_pm");
    assert!(!t.paragraph);
    assert_eq!(t.valign, VAlign::Middle);
    assert!(t.is_wrapped());
}

#[test]
fn pb_overrides_bare_p() {
    let t = text("@x#t_p_pb");
    assert!(!t.paragraph);
    assert_eq!(t.valign, VAlign::Bottom);
}

#[test]
fn rotation_tokens() {
    assert_eq!(text("@x#t_c_a15").rotation_deg, Some(15.0));
    assert_eq!(text("@x#t_a-22.5").rotation_deg, Some(-22.5));
    assert_eq!(text("@x#t_a0").rotation_deg, Some(0.0));
    assert_eq!(text("@x#t_a").rotation_deg, None);
    assert_eq!(text("@x#t_abc").rotation_deg, None);
}

#[test]
fn non_directives() {
    for name in ["plain", "@x", "@x#", "@x#z", "@#t", "x#t", "@x#t#c", ""] {
        assert_eq!(Directive::parse(name), None, "{name:?}");
    }
}

#[test]
fn visibility_directive() {
    let d = Directive::parse("@tag#v").unwrap();
    assert_eq!(d.field, "tag");
    assert_eq!(d.kind, DirectiveKind::Visibility);
    assert!(!d.is_image());
}

#[test]
fn image_modifiers() {
    let i = image("@x#i_contain_lt");
    assert_eq!(i.fit, FitMode::Contain);
    assert_eq!(i.anchor.code(), "lt");

    let i = image("@x#i");
    assert_eq!(i.fit, FitMode::Cover);
    assert_eq!(i.anchor, Anchor::CENTER);
    assert_eq!(i.anchor.code(), "cm");

    let i = image("@x#i_cover_rb");
    assert_eq!(i.fit, FitMode::Cover);
    assert_eq!(i.anchor.code(), "rb");
}

#[test]
fn unknown_image_tokens_fall_back_to_defaults() {
    let i = image("@x#i_stretch_zz");
    assert_eq!(i, ImageDirective::default());
}

#[test]
fn every_anchor_code_round_trips() {
    let codes: Vec<&str> = Anchor::ALL.iter().map(|a| a.code()).collect();
    assert_eq!(
        codes,
        vec!["lt", "ct", "rt", "lm", "cm", "rm", "lb", "cb", "rb"]
    );
    for a in Anchor::ALL {
        assert_eq!(Anchor::parse(a.code()), Some(a));
        assert_eq!(a.to_string(), a.code());
    }
    assert_eq!(Anchor::parse("cmx"), None);
    assert_eq!(Anchor::parse("x"), None);
}

#[test]
fn fields_may_contain_non_ascii_and_underscores() {
    let d = Directive::parse("@产品_图#i_cover_cm").unwrap();
    assert_eq!(d.field, "产品_图");
    assert!(d.is_image());
}
