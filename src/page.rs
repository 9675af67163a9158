//! Page element capability
//!
//! The contract the rest of the framework expects from anything that stands
//! for an element on a page. The configuration resolver does not depend on it.

use serde::{Deserialize, Serialize};

/// Position and size of an element, in page pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge, clamped to the `i32` range.
    pub fn right(&self) -> i32 {
        self.left.saturating_add(self.width)
    }

    /// Bottom edge, clamped to the `i32` range.
    pub fn bottom(&self) -> i32 {
        self.top.saturating_add(self.height)
    }
}

/// An element on a page.
pub trait PageElement {
    fn is_visible(&self) -> bool;

    fn area(&self) -> Rect;

    fn left(&self) -> i32 {
        self.area().left
    }

    fn top(&self) -> i32 {
        self.area().top
    }

    fn width(&self) -> i32 {
        self.area().width
    }

    fn height(&self) -> i32 {
        self.area().height
    }
}
