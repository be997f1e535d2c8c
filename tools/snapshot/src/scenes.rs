//! Named scenes rendered headlessly for visual regression.

use anyhow::{anyhow, Result};
use log::info;

use ei_toolkit::button::ButtonConfig;
use ei_toolkit::draw::{draw_polygon, draw_polyline, draw_text, fill};
use ei_toolkit::frame::FrameConfig;
use ei_toolkit::placer::PlaceOptions;
use ei_toolkit::relief::draw_button;
use ei_toolkit::text::Font;
use ei_toolkit::toplevel::{Resizable, ToplevelConfig};
use ei_toolkit::{
    Anchor, App, AppConfig, ChannelOrder, Color, HeadlessBackend, Point, Rect, Relief, Size,
    Surface,
};

use crate::PixelBuffer;

pub const SCENES: &[&str] = &["relief", "polygon", "widgets"];

/// Render scene `name` at `width` × `height`.
pub fn render(name: &str, width: u32, height: u32) -> Result<PixelBuffer> {
    let size = Size::new(width as i32, height as i32);
    if size.is_empty() {
        return Err(anyhow!("empty scene size {}x{}", width, height));
    }
    info!("rendering scene {:?} at {}x{}", name, width, height);
    match name {
        "relief" => Ok(relief(size)),
        "polygon" => Ok(polygon(size)),
        "widgets" => widgets(size),
        _ => Err(anyhow!("unknown scene {:?} (try `snapshot list`)", name)),
    }
}

/// Raised and sunken beveled buttons centred on a white background.
fn relief(size: Size) -> PixelBuffer {
    let mut surface = Surface::new(size, ChannelOrder::RGBA, false);
    {
        let mut dst = surface.lock();
        fill(&mut dst, Color::WHITE, None);
        let w = size.width * 3 / 4;
        let h = size.height / 4;
        let x = (size.width - w) / 2;
        let base = Color::new(0x80, 0x30, 0x30, 0xff);
        let raised = Rect::new(x, size.height / 8, w, h);
        let sunken = Rect::new(x, size.height * 5 / 8, w, h);
        draw_button(&mut dst, &raised, 20, base, 8, Relief::Raised, None);
        draw_button(&mut dst, &sunken, 20, base, 8, Relief::Sunken, None);
    }
    PixelBuffer::from_surface(&surface)
}

/// A filled triangle, an outlined star and a caption.
fn polygon(size: Size) -> PixelBuffer {
    let mut surface = Surface::new(size, ChannelOrder::BGRA, false);
    {
        let mut dst = surface.lock();
        fill(&mut dst, Color::rgb(0xe0, 0xe0, 0xe0), None);
        let triangle = [
            Point::new(size.width / 10, size.height * 9 / 10),
            Point::new(size.width / 2, size.height / 10),
            Point::new(size.width * 9 / 10, size.height * 9 / 10),
        ];
        draw_polygon(&mut dst, &triangle, Color::rgb(0x30, 0x60, 0xc0), None);

        let c = Point::new(size.width / 2, size.height * 6 / 10);
        let r = (size.width.min(size.height) / 5) as f64;
        let mut star: Vec<Point> = (0..=5)
            .map(|i| {
                let a = -std::f64::consts::FRAC_PI_2 + i as f64 * 4.0 * std::f64::consts::PI / 5.0;
                Point::new(c.x + (r * a.cos()).round() as i32, c.y + (r * a.sin()).round() as i32)
            })
            .collect();
        star.dedup();
        draw_polyline(&mut dst, &star, Color::BLACK, None);

        let font = Font::builtin(16.0);
        draw_text(&mut dst, Point::new(4, 4), "polygon", &font, Color::BLACK, None);
    }
    PixelBuffer::from_surface(&surface)
}

/// A labelled frame, a button and a toplevel holding a button of its own.
fn widgets(size: Size) -> Result<PixelBuffer> {
    let hw = HeadlessBackend::new();
    let config = AppConfig::default().with_window_size(size.width, size.height);
    let mut app = App::new(hw, config)?;
    let root = app.root_widget();

    let banner = app.create_widget("frame", root, None, None)?;
    app.frame_configure(
        banner,
        &FrameConfig::new()
            .color(Color::rgb(0x40, 0x80, 0x40))
            .border_width(3)
            .relief(Relief::Raised)
            .text("ei-toolkit")
            .text_color(Color::WHITE)
            .text_anchor(Anchor::Center),
    )?;
    app.place(banner, &PlaceOptions::new().x(10).y(10).rel_width(1.0).width(-20));

    let button = app.create_widget("button", root, None, None)?;
    app.button_configure(
        button,
        &ButtonConfig::with_frame(
            FrameConfig::new()
                .requested_size(Size::new(160, 60))
                .color(Color::rgb(0x60, 0x60, 0xc0))
                .text("Press"),
        )
        .corner_radius(15),
    )?;
    app.place(
        button,
        &PlaceOptions::new().anchor(Anchor::South).rel_x(0.5).rel_y(1.0).y(-20),
    );

    let top = app.create_widget("toplevel", root, None, None)?;
    app.toplevel_configure(
        top,
        &ToplevelConfig::new()
            .requested_size(Size::new(200, 120))
            .title("Window")
            .resizable(Resizable::Both),
    )?;
    app.place(top, &PlaceOptions::new().x(30).y(80));

    let inner = app.create_widget("button", top, None, None)?;
    app.button_configure(inner, &ButtonConfig::with_frame(FrameConfig::new().text("OK")))?;
    app.place(inner, &PlaceOptions::new().anchor(Anchor::Center).rel_x(0.5).rel_y(0.5));

    app.redraw();
    Ok(PixelBuffer::from_surface(app.root_surface()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_scene_renders() {
        for name in SCENES {
            let buf = render(name, 320, 240).unwrap();
            assert_eq!((buf.width, buf.height), (320, 240));
        }
    }

    #[test]
    fn test_unknown_scene_and_empty_size() {
        assert!(render("nope", 10, 10).is_err());
        assert!(render("relief", 0, 10).is_err());
    }

    #[test]
    fn test_relief_corners_stay_white() {
        let buf = render("relief", 400, 400).unwrap();
        // Top-left corner of the raised button's bounding box, outside the rounding.
        assert_eq!(buf.pixel(50, 50), [255, 255, 255, 255]);
        assert_eq!(buf.pixel(200, 100), [0x80, 0x30, 0x30, 0xff]);
    }

    #[test]
    fn test_scenes_are_deterministic() {
        let a = render("widgets", 320, 240).unwrap();
        let b = render("widgets", 320, 240).unwrap();
        assert_eq!(a, b);
    }
}
