//! Input parsing tests

use rankwise_types::{InputError, Item, ItemKind, ItemList, sanitize_item_text};

fn texts(list: &ItemList) -> Vec<&str> {
    list.iter().map(Item::as_str).collect()
}

#[test]
fn pasted_text_becomes_items_in_order() {
    let list = ItemList::parse("Dune\r\nHyperion<br>Foundation\n\n  Solaris  \n").unwrap();
    assert_eq!(texts(&list), ["Dune", "Hyperion", "Foundation", "Solaris"]);
}

#[test]
fn empty_input_is_reported() {
    let err = ItemList::parse("\n   \n<br>").unwrap_err();
    assert_eq!(err, InputError::Empty);
    assert_eq!(err.to_string(), "No input detected, please enter some text");
}

#[test]
fn one_item_is_not_enough() {
    let err = ItemList::parse("only").unwrap_err();
    assert_eq!(err.to_string(), "Enter at least two items");
}

#[test]
fn duplicates_are_named() {
    let err = ItemList::parse("tea\ncoffee\ntea").unwrap_err();
    assert_eq!(
        err,
        InputError::Duplicate {
            item: "tea".to_string()
        }
    );
    assert!(err.to_string().contains("tea"));
}

#[test]
fn image_items_are_recognised() {
    let list = ItemList::parse("https://img.example/a.jpg\nhttps://img.example/b.gif\nnot an image.png")
        .unwrap();
    let kinds: Vec<ItemKind> = list.iter().map(Item::kind).collect();
    assert_eq!(kinds, [ItemKind::Image, ItemKind::Image, ItemKind::Text]);
}

#[test]
fn item_text_is_made_safe_for_the_terminal() {
    assert_eq!(sanitize_item_text("\x1b[31mred\x1b[0m"), "red");
    assert_eq!(sanitize_item_text("plain"), "plain");
}
