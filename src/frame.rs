//! The `frame` class: a rectangle with optional border, relief and either a
//! text label or an image.

use std::any::Any;
use std::rc::Rc;

use crate::app::{App, AppConfig};
use crate::color::Color;
use crate::draw::{blit, draw_text, fill};
use crate::error::{Error, Result};
use crate::geometry::{clip, intersect, Anchor, Point, Rect, Size};
use crate::relief::{draw_button, Relief};
use crate::surface::{Surface, SurfaceLock};
use crate::text::Font;
use crate::widget::WidgetId;
use crate::widgetclass::{DrawContext, WidgetClass};

pub const FRAME_CLASS: &str = "frame";

/// Appearance shared by frames and buttons.
#[derive(Debug, Clone)]
pub struct FrameData {
    pub color: Color,
    pub border_width: i32,
    pub relief: Relief,
    pub text: Option<String>,
    /// `None` uses the application's default font.
    pub font: Option<Font>,
    pub text_color: Color,
    pub text_anchor: Anchor,
    pub image: Option<Rc<Surface>>,
    /// Part of `image` to show; the whole image when `None`.
    pub image_rect: Option<Rect>,
    pub image_anchor: Anchor,
}

impl FrameData {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            color: config.background,
            border_width: 0,
            relief: Relief::None,
            text: None,
            font: None,
            text_color: config.text_color,
            text_anchor: Anchor::Center,
            image: None,
            image_rect: None,
            image_anchor: Anchor::Center,
        }
    }

    /// Apply the set fields of `config`. Returns `true` when the natural
    /// size may have changed.
    pub(crate) fn apply(&mut self, config: &FrameConfig) -> bool {
        let mut geometry = false;
        if let Some(color) = config.color {
            self.color = color;
        }
        if let Some(border) = config.border_width {
            self.border_width = border.max(0);
            geometry = true;
        }
        if let Some(relief) = config.relief {
            self.relief = relief;
        }
        if let Some(text) = &config.text {
            self.text = (!text.is_empty()).then(|| text.clone());
            self.image = None;
            self.image_rect = None;
            geometry = true;
        }
        if let Some(font) = &config.font {
            self.font = Some(font.clone());
            geometry = true;
        }
        if let Some(color) = config.text_color {
            self.text_color = color;
        }
        if let Some(anchor) = config.text_anchor {
            self.text_anchor = anchor;
        }
        if let Some(image) = &config.image {
            self.image = Some(image.clone());
            self.text = None;
            geometry = true;
        }
        if let Some(rect) = config.image_rect {
            self.image_rect = Some(rect);
            geometry = true;
        }
        if let Some(anchor) = config.image_anchor {
            self.image_anchor = anchor;
        }
        geometry
    }

    /// Size of the text or image, if there is one.
    pub fn content_size(&self, default_font: &Font) -> Option<Size> {
        if let Some(text) = &self.text {
            return Some(self.font.as_ref().unwrap_or(default_font).measure(text));
        }
        self.image_source().map(|(_, r)| r.size)
    }

    /// Content size plus the border on both sides.
    pub fn natural_size(&self, default_font: &Font) -> Option<Size> {
        self.content_size(default_font)
            .map(|s| s.expand(self.border_width))
    }

    fn image_source(&self) -> Option<(&Surface, Rect)> {
        let image = self.image.as_deref()?;
        let rect = self.image_rect.unwrap_or_else(|| image.rect());
        Some((image, rect))
    }

    /// Draw the text or image anchored in `area`, shifted by `shift` and
    /// clipped to `clipper`.
    pub(crate) fn draw_content(
        &self,
        dst: &mut SurfaceLock<'_>,
        area: &Rect,
        shift: Point,
        default_font: &Font,
        clipper: &Rect,
    ) {
        if let Some(text) = &self.text {
            let font = self.font.as_ref().unwrap_or(default_font);
            let origin = self.text_anchor.align(area, font.measure(text)) + shift;
            draw_text(dst, origin, text, font, self.text_color, Some(clipper));
        } else if let Some((image, src_rect)) = self.image_source() {
            let origin = self.image_anchor.align(area, src_rect.size) + shift;
            let src = image.lock_read();
            blit(dst, origin, &src, Some(&src_rect), Some(clipper), image.has_alpha());
        }
    }
}

/// Frame attributes to change; `None` fields are left as they are.
///
/// Setting a text removes the image and setting an image removes the
/// text. An empty text clears it.
#[derive(Debug, Clone, Default)]
pub struct FrameConfig {
    pub requested_size: Option<Size>,
    pub color: Option<Color>,
    pub border_width: Option<i32>,
    pub relief: Option<Relief>,
    pub text: Option<String>,
    pub font: Option<Font>,
    pub text_color: Option<Color>,
    pub text_anchor: Option<Anchor>,
    pub image: Option<Rc<Surface>>,
    pub image_rect: Option<Rect>,
    pub image_anchor: Option<Anchor>,
}

impl FrameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requested_size(mut self, size: Size) -> Self {
        self.requested_size = Some(size);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn border_width(mut self, border: i32) -> Self {
        self.border_width = Some(border);
        self
    }

    pub fn relief(mut self, relief: Relief) -> Self {
        self.relief = Some(relief);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }

    pub fn text_color(mut self, color: Color) -> Self {
        self.text_color = Some(color);
        self
    }

    pub fn text_anchor(mut self, anchor: Anchor) -> Self {
        self.text_anchor = Some(anchor);
        self
    }

    pub fn image(mut self, image: Rc<Surface>) -> Self {
        self.image = Some(image);
        self
    }

    pub fn image_rect(mut self, rect: Rect) -> Self {
        self.image_rect = Some(rect);
        self
    }

    pub fn image_anchor(mut self, anchor: Anchor) -> Self {
        self.image_anchor = Some(anchor);
        self
    }
}

/// Class object for frames.
pub struct FrameClass;

impl WidgetClass for FrameClass {
    fn name(&self) -> &'static str {
        FRAME_CLASS
    }

    fn allocate(&self) -> Box<dyn Any> {
        Box::new(FrameData::new(&AppConfig::default()))
    }

    fn set_defaults(&self, app: &mut App, id: WidgetId) {
        let data = FrameData::new(&app.config);
        if let Some(w) = app.widgets.get_mut(id) {
            w.requested_size = Size::default();
            w.data = Box::new(data);
        }
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, id: WidgetId, clipper: Option<&Rect>) {
        let widgets = ctx.widgets;
        let Some(w) = widgets.get(id) else {
            return;
        };
        let Some(data) = w.data::<FrameData>() else {
            return;
        };
        let screen = w.screen_location;
        let Some(draw_rect) = clip(&screen, clipper) else {
            return;
        };

        fill(&mut ctx.pick, w.pick_color, Some(&draw_rect));
        if data.relief == Relief::None && data.border_width == 0 {
            fill(&mut ctx.surface, data.color, Some(&draw_rect));
        } else {
            draw_button(
                &mut ctx.surface,
                &screen,
                0,
                data.color,
                data.border_width,
                data.relief,
                Some(&draw_rect),
            );
        }

        let content = screen.inset(data.border_width);
        let Some(content_clip) = intersect(&content, &draw_rect) else {
            return;
        };
        data.draw_content(
            &mut ctx.surface,
            &content,
            Point::default(),
            ctx.default_font,
            &content_clip,
        );
        ctx.draw_children(id, Some(&content_clip));
    }
}

impl App {
    /// Change the attributes of frame `id`.
    ///
    /// The requested size grows to fit the text or image plus the border.
    /// A placed frame is laid out again when its size may have changed.
    pub fn frame_configure(&mut self, id: WidgetId, config: &FrameConfig) -> Result<()> {
        let w = self.widgets.get_mut(id).ok_or(Error::NoSuchWidget)?;
        let data = w.data_as_mut::<FrameData>(FRAME_CLASS)?;
        let mut geometry = data.apply(config);
        let natural = data.natural_size(&self.default_font);

        if let Some(size) = config.requested_size {
            w.requested_size = size;
            geometry = true;
        }
        if geometry {
            if let Some(natural) = natural {
                w.requested_size = w.requested_size.max(natural);
            }
        }
        let placed = w.placement.is_some();
        let area = w.screen_location;

        if geometry && placed {
            self.placer_run(id);
        } else {
            self.invalidate_rect(&area);
        }
        Ok(())
    }

    /// Attributes of frame `id`.
    pub fn frame_data(&self, id: WidgetId) -> Result<&FrameData> {
        self.widgets
            .get(id)
            .ok_or(Error::NoSuchWidget)?
            .data_as::<FrameData>(FRAME_CLASS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use crate::color::ChannelOrder;
    use crate::placer::PlaceOptions;
    use crate::surface::PixelRead;

    fn app() -> App {
        App::new(
            HeadlessBackend::new(),
            AppConfig::default()
                .with_window_size(200, 150)
                .with_background(Color::WHITE),
        )
        .unwrap()
    }

    fn pixel(app: &App, x: i32, y: i32) -> Color {
        app.root_surface()
            .lock_read()
            .pixel(Point::new(x, y))
            .unwrap_or(Color::TRANSPARENT)
    }

    #[test]
    fn test_defaults() {
        let mut app = app();
        let root = app.root_widget();
        let f = app.create_widget(FRAME_CLASS, root, None, None).unwrap();
        let data = app.frame_data(f).unwrap();
        assert_eq!(data.color, Color::WHITE);
        assert_eq!(data.border_width, 0);
        assert_eq!(data.relief, Relief::None);
        assert_eq!(data.text_anchor, Anchor::Center);
        assert!(data.text.is_none());
        assert_eq!(app.widget(f).unwrap().requested_size(), Size::default());
    }

    #[test]
    fn test_text_sets_natural_size() {
        let mut app = app();
        let root = app.root_widget();
        let f = app.create_widget(FRAME_CLASS, root, None, None).unwrap();
        app.frame_configure(f, &FrameConfig::new().text("Hello").border_width(3))
            .unwrap();
        let text = app.default_font().measure("Hello");
        assert_eq!(app.widget(f).unwrap().requested_size(), text.expand(3));

        // An explicit size larger than the natural one wins.
        app.frame_configure(f, &FrameConfig::new().requested_size(Size::new(500, 10)))
            .unwrap();
        let req = app.widget(f).unwrap().requested_size();
        assert_eq!(req.width, 500);
        assert_eq!(req.height, text.height + 6);
    }

    #[test]
    fn test_text_and_image_are_exclusive() {
        let mut app = app();
        let root = app.root_widget();
        let f = app.create_widget(FRAME_CLASS, root, None, None).unwrap();
        let img = Rc::new(Surface::new(Size::new(8, 4), ChannelOrder::RGBA, false));
        app.frame_configure(f, &FrameConfig::new().text("x")).unwrap();
        app.frame_configure(f, &FrameConfig::new().image(img)).unwrap();
        let data = app.frame_data(f).unwrap();
        assert!(data.text.is_none());
        assert!(data.image.is_some());

        app.frame_configure(f, &FrameConfig::new().text("y")).unwrap();
        assert!(app.frame_data(f).unwrap().image.is_none());
    }

    #[test]
    fn test_wrong_class() {
        let mut app = app();
        let root = app.root_widget();
        let b = app.create_widget("button", root, None, None).unwrap();
        assert_eq!(
            app.frame_configure(b, &FrameConfig::new().color(Color::BLACK)),
            Err(Error::WrongClass {
                expected: "frame",
                found: "button"
            })
        );
    }

    #[test]
    fn test_draw_flat_and_pick() {
        let mut app = app();
        let root = app.root_widget();
        let f = app.create_widget(FRAME_CLASS, root, None, None).unwrap();
        let red = Color::rgb(200, 0, 0);
        app.frame_configure(f, &FrameConfig::new().color(red)).unwrap();
        app.place(f, &PlaceOptions::new().x(20).y(20).width(40).height(30));
        app.redraw();

        assert_eq!(pixel(&app, 20, 20), red);
        assert_eq!(pixel(&app, 59, 49), red);
        assert_eq!(pixel(&app, 60, 50), Color::WHITE);
        assert_eq!(app.pick_widget(Point::new(30, 30)), Some(f));
    }

    #[test]
    fn test_draw_border_relief() {
        let mut app = app();
        let root = app.root_widget();
        let f = app.create_widget(FRAME_CLASS, root, None, None).unwrap();
        let base = Color::rgb(100, 100, 100);
        app.frame_configure(
            f,
            &FrameConfig::new()
                .color(base)
                .border_width(4)
                .relief(Relief::Raised),
        )
        .unwrap();
        app.place(f, &PlaceOptions::new().x(10).y(10).width(60).height(40));
        app.redraw();

        assert_eq!(pixel(&app, 11, 11), base.shade(40));
        assert_eq!(pixel(&app, 68, 48), base.shade(-40));
        assert_eq!(pixel(&app, 40, 30), base);
    }

    #[test]
    fn test_children_clipped_to_content() {
        let mut app = app();
        let root = app.root_widget();
        let parent = app.create_widget(FRAME_CLASS, root, None, None).unwrap();
        let child = app.create_widget(FRAME_CLASS, parent, None, None).unwrap();
        let blue = Color::rgb(0, 0, 200);
        app.frame_configure(parent, &FrameConfig::new().border_width(5).relief(Relief::Sunken))
            .unwrap();
        app.frame_configure(child, &FrameConfig::new().color(blue)).unwrap();
        app.place(parent, &PlaceOptions::new().x(10).y(10).width(50).height(50));
        // Overflows the parent on every side.
        app.place(child, &PlaceOptions::new().x(-10).y(-10).width(100).height(100));
        app.redraw();

        assert_eq!(pixel(&app, 15, 15), blue);
        assert_eq!(pixel(&app, 54, 54), blue);
        assert_ne!(pixel(&app, 12, 12), blue);
        assert_ne!(pixel(&app, 57, 57), blue);
        assert_eq!(pixel(&app, 80, 80), Color::WHITE);
    }

    #[test]
    fn test_image_drawn_centered() {
        let mut app = app();
        let root = app.root_widget();
        let f = app.create_widget(FRAME_CLASS, root, None, None).unwrap();
        let green = Color::rgb(0, 180, 0);
        let mut img = Surface::new(Size::new(4, 4), ChannelOrder::RGBA, false);
        fill(&mut img.lock(), green, None);
        app.frame_configure(f, &FrameConfig::new().image(Rc::new(img))).unwrap();
        app.place(f, &PlaceOptions::new().x(0).y(0).width(20).height(20));
        app.redraw();

        assert_eq!(pixel(&app, 8, 8), green);
        assert_eq!(pixel(&app, 11, 11), green);
        assert_eq!(pixel(&app, 7, 7), Color::WHITE);
        assert_eq!(pixel(&app, 12, 12), Color::WHITE);
    }
}
