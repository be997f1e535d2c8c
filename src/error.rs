//! Error type.

use core::fmt;

use crate::geometry::{Rect, Size};

/// Errors reported by the toolkit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The backend could not create the window or a surface.
    Backend(String),
    /// A font could not be loaded.
    Font(String),
    /// No widget class is registered under this name.
    UnknownClass(String),
    /// Source and destination rectangles of a copy differ in size.
    CopySizeMismatch { src: Size, dst: Size },
    /// A copy rectangle extends past its surface.
    CopyOutOfBounds(Rect),
    /// A class-specific operation was applied to a widget of another class.
    WrongClass {
        expected: &'static str,
        found: &'static str,
    },
    /// The widget handle refers to a destroyed widget.
    NoSuchWidget,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Backend(msg) => write!(f, "backend error: {}", msg),
            Error::Font(msg) => write!(f, "font error: {}", msg),
            Error::UnknownClass(name) => write!(f, "unknown widget class '{}'", name),
            Error::CopySizeMismatch { src, dst } => write!(
                f,
                "copy size mismatch: source {}x{}, destination {}x{}",
                src.width, src.height, dst.width, dst.height
            ),
            Error::CopyOutOfBounds(r) => write!(
                f,
                "copy rectangle ({}, {}) {}x{} is outside its surface",
                r.x(),
                r.y(),
                r.width(),
                r.height()
            ),
            Error::WrongClass { expected, found } => {
                write!(f, "expected a '{}' widget, found '{}'", expected, found)
            }
            Error::NoSuchWidget => write!(f, "widget does not exist"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = Error::CopySizeMismatch {
            src: Size::new(2, 3),
            dst: Size::new(4, 5),
        };
        assert_eq!(e.to_string(), "copy size mismatch: source 2x3, destination 4x5");
        assert_eq!(
            Error::UnknownClass("slider".into()).to_string(),
            "unknown widget class 'slider'"
        );
    }
}
