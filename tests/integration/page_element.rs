//! Integration tests for the page element test doubles

use galen_config::page::{PageElement, Rect};

use crate::integration::{MockedInvisiblePageElement, MockedPageElement};

fn visible_areas(elements: &[&dyn PageElement]) -> Vec<Rect> {
    elements
        .iter()
        .filter(|element| element.is_visible())
        .map(|element| element.area())
        .collect()
}

#[test]
fn test_invisible_element_keeps_its_geometry() {
    let element = MockedInvisiblePageElement::new(10, 20, 300, 40);
    assert!(!element.is_visible());
    assert_eq!(element.left(), 10);
    assert_eq!(element.top(), 20);
    assert_eq!(element.width(), 300);
    assert_eq!(element.height(), 40);
}

#[test]
fn test_invisible_elements_are_filtered_out() {
    let shown = MockedPageElement::new(0, 0, 100, 100);
    let hidden = MockedInvisiblePageElement::new(0, 0, 100, 100);

    let elements: [&dyn PageElement; 2] = [&shown, &hidden];
    let areas = visible_areas(&elements);
    assert_eq!(areas, vec![Rect::new(0, 0, 100, 100)]);
}
