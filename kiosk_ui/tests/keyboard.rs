use kiosk_ui::{Key, Keyboard, LayoutName, TextField};
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case::from_default(LayoutName::Default, LayoutName::Shift)]
#[case::from_shift(LayoutName::Shift, LayoutName::Default)]
#[case::from_numeric(LayoutName::Numeric, LayoutName::Default)]
fn shift_toggles_layout(#[case] from: LayoutName, #[case] to: LayoutName) {
    let mut kb = Keyboard::new();
    let mut f = TextField::default();
    if from == LayoutName::Numeric {
        kb.press(&Key::Numeric, &mut f);
    } else if from == LayoutName::Shift {
        kb.press(&Key::Shift, &mut f);
    }
    assert_eq!(kb.layout(), from);
    kb.press(&Key::Shift, &mut f);
    assert_eq!(kb.layout(), to);
    assert_eq!(f.value(), "");
}

#[rstest]
fn abc_returns_to_default() {
    let mut kb = Keyboard::new();
    let mut f = TextField::default();
    kb.press_token("{numeric}", &mut f);
    assert_eq!(kb.layout(), LayoutName::Numeric);
    kb.press_token("{abc}", &mut f);
    assert_eq!(kb.layout(), LayoutName::Default);
}

#[rstest]
fn typing_a_name_with_corrections() {
    let mut kb = Keyboard::new();
    let mut f = TextField::default();
    for t in ["J", "o", "n", "{space}", "D", "x", "{bksp}", "o", "e"] {
        kb.press_token(t, &mut f);
    }
    assert_eq!(f.value(), "Jon Doe");
    f.set_caret(3);
    kb.press_token("h", &mut f);
    assert_eq!(f.value(), "John Doe");
    f.set_caret(0);
    kb.press_token("{del}", &mut f);
    assert_eq!(f.value(), "ohn Doe");
    kb.press_token("{enter}", &mut f);
    assert_eq!(f.value(), "\nohn Doe");
}

#[rstest]
#[case::bksp("{bksp}")]
#[case::del("{del}")]
fn deleting_a_selection_removes_exactly_it(#[case] token: &str) {
    let mut kb = Keyboard::new();
    let mut f = TextField::new("abcdef");
    f.set_selection(4, 1);
    kb.press_token(token, &mut f);
    assert_eq!(f.value(), "aef");
    assert_eq!(f.selection(), (1, 1));
}

#[rstest]
fn unsupported_tokens_are_ignored() {
    let mut kb = Keyboard::new();
    let mut f = TextField::new("x");
    kb.press_token("{lock}", &mut f);
    assert_eq!(f.value(), "x");
    assert_eq!(kb.layout(), LayoutName::Default);
}

#[rstest]
fn every_layout_key_parses() {
    for layout in [LayoutName::Default, LayoutName::Shift, LayoutName::Numeric] {
        let keys: Vec<Key> = layout.keys().into_iter().flatten().collect();
        assert!(!keys.iter().any(|k| matches!(k, Key::Unsupported(_))));
    }
    assert!(LayoutName::Default.keys()[1].contains(&Key::Char("{".into())));
}

#[rstest]
fn visibility_toggles() {
    let mut kb = Keyboard::new();
    assert!(!kb.is_visible());
    kb.toggle();
    assert!(kb.is_visible());
    kb.hide();
    assert!(!kb.is_visible());
    kb.show();
    assert!(kb.is_visible());
}

proptest! {
    #[test]
    fn edits_keep_the_caret_inside_the_text(
        init in "\\PC{0,12}",
        ops in prop::collection::vec((0u8..4, 0usize..16, 0usize..16, "\\PC{0,2}"), 0..20),
    ) {
        let mut f = TextField::new(init);
        for (op, a, b, text) in ops {
            f.set_selection(a, b);
            match op {
                0 => f.insert(&text),
                1 => f.backspace(),
                2 => f.delete(),
                _ => f.set_caret(a),
            }
            let (s, e) = f.selection();
            prop_assert!(s <= e);
            prop_assert!(e <= f.char_len());
        }
    }
}
