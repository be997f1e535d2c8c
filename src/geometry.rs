//! Geometry primitives.
//!
//! Integer points, sizes and half-open rectangles in screen coordinates
//! (x grows to the right, y grows downward), plus the anchor type shared by
//! the placer and the text/image alignment of frames.

// ============================================================================
// Point / Size
// ============================================================================

/// Integer screen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl core::ops::Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl core::ops::Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height. A zero size means "not yet known" or empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Component-wise maximum.
    pub fn max(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Grow both dimensions by `2 * border`.
    pub fn expand(self, border: i32) -> Size {
        Size::new(self.width + 2 * border, self.height + 2 * border)
    }
}

// ============================================================================
// Rect
// ============================================================================

/// Half-open rectangle: covers `x..x + width` by `y..y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub top_left: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            top_left: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub const fn from_parts(top_left: Point, size: Size) -> Self {
        Self { top_left, size }
    }

    /// Rectangle at the origin with the given size.
    pub const fn sized(size: Size) -> Self {
        Self {
            top_left: Point::new(0, 0),
            size,
        }
    }

    pub fn x(&self) -> i32 {
        self.top_left.x
    }

    pub fn y(&self) -> i32 {
        self.top_left.y
    }

    pub fn width(&self) -> i32 {
        self.size.width
    }

    pub fn height(&self) -> i32 {
        self.size.height
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.top_left.x + self.size.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.top_left.y + self.size.height
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x() && p.x < self.right() && p.y >= self.y() && p.y < self.bottom()
    }

    /// `true` if `other` lies entirely inside `self`.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x() >= self.x()
            && other.y() >= self.y()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Shrink by `amount` on all four sides. The result may be empty.
    pub fn inset(&self, amount: i32) -> Rect {
        Rect::new(
            self.x() + amount,
            self.y() + amount,
            self.width() - 2 * amount,
            self.height() - 2 * amount,
        )
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect::from_parts(self.top_left.offset(dx, dy), self.size)
    }

    /// Center point (rounded toward the top-left).
    pub fn center(&self) -> Point {
        Point::new(self.x() + self.width() / 2, self.y() + self.height() / 2)
    }
}

/// Maximal common rectangle of `a` and `b`, or `None` when they do not
/// overlap on both axes.
pub fn intersect(a: &Rect, b: &Rect) -> Option<Rect> {
    let x1 = a.x().max(b.x());
    let y1 = a.y().max(b.y());
    let x2 = a.right().min(b.right());
    let y2 = a.bottom().min(b.bottom());
    if x2 <= x1 || y2 <= y1 {
        return None;
    }
    Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
}

/// Intersect with an optional clipper (no clipper means no restriction).
pub fn clip(rect: &Rect, clipper: Option<&Rect>) -> Option<Rect> {
    match clipper {
        Some(c) => intersect(rect, c),
        None if rect.is_empty() => None,
        None => Some(*rect),
    }
}

/// Bounding box of `a` and `b`.
pub fn union(a: &Rect, b: &Rect) -> Rect {
    let x1 = a.x().min(b.x());
    let y1 = a.y().min(b.y());
    let x2 = a.right().max(b.right());
    let y2 = a.bottom().max(b.bottom());
    Rect::new(x1, y1, x2 - x1, y2 - y1)
}

/// `true` when `a` and `b` overlap or share an edge: the gap between them is
/// non-positive on both axes.
pub fn touches(a: &Rect, b: &Rect) -> bool {
    let dx = a.x().max(b.x()) - a.right().min(b.right());
    let dy = a.y().max(b.y()) - a.bottom().min(b.bottom());
    dx <= 0 && dy <= 0
}

// ============================================================================
// Anchor
// ============================================================================

/// Reference point of a box: the nine compass positions plus center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Anchor {
    Center,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    #[default]
    NorthWest,
}

impl Anchor {
    /// Offset of the anchor point from the top-left corner of a box of
    /// the given size.
    pub fn offset(self, size: Size) -> Point {
        let (w, h) = (size.width, size.height);
        match self {
            Anchor::Center => Point::new(w / 2, h / 2),
            Anchor::North => Point::new(w / 2, 0),
            Anchor::NorthEast => Point::new(w, 0),
            Anchor::East => Point::new(w, h / 2),
            Anchor::SouthEast => Point::new(w, h),
            Anchor::South => Point::new(w / 2, h),
            Anchor::SouthWest => Point::new(0, h),
            Anchor::West => Point::new(0, h / 2),
            Anchor::NorthWest => Point::new(0, 0),
        }
    }

    /// Top-left position of a box of size `inner` aligned inside `outer`
    /// so that both anchor points coincide.
    pub fn align(self, outer: &Rect, inner: Size) -> Point {
        let free_w = outer.width() - inner.width;
        let free_h = outer.height() - inner.height;
        let (fx, fy) = match self {
            Anchor::Center => (free_w / 2, free_h / 2),
            Anchor::North => (free_w / 2, 0),
            Anchor::NorthEast => (free_w, 0),
            Anchor::East => (free_w, free_h / 2),
            Anchor::SouthEast => (free_w, free_h),
            Anchor::South => (free_w / 2, free_h),
            Anchor::SouthWest => (0, free_h),
            Anchor::West => (0, free_h / 2),
            Anchor::NorthWest => (0, 0),
        };
        outer.top_left.offset(fx, fy)
    }
}
