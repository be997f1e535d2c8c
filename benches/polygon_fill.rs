use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ei_toolkit::draw::fill;
use ei_toolkit::raster::fill_polygon;
use ei_toolkit::relief::draw_button;
use ei_toolkit::{ChannelOrder, Color, Point, Rect, Relief, Size, Surface};

fn bench_triangle(c: &mut Criterion) {
    let mut surface = Surface::new(Size::new(320, 240), ChannelOrder::RGBA, false);
    let triangle = [Point::new(2, 5), Point::new(100, 200), Point::new(0, 102)];
    let color = Color::rgb(0x30, 0x60, 0xc0);

    c.bench_function("fill_polygon triangle 320x240", |b| {
        b.iter(|| {
            let mut dst = surface.lock();
            fill_polygon(&mut dst, black_box(&triangle), color, None);
        })
    });
}

fn bench_relief_button(c: &mut Criterion) {
    let mut surface = Surface::new(Size::new(320, 240), ChannelOrder::BGRA, false);
    let rect = Rect::new(10, 20, 300, 150);
    let color = Color::rgb(0x80, 0x30, 0x30);

    c.bench_function("draw_button raised 300x150", |b| {
        b.iter(|| {
            let mut dst = surface.lock();
            fill(&mut dst, Color::WHITE, None);
            draw_button(&mut dst, black_box(&rect), 20, color, 8, Relief::Raised, None);
        })
    });
}

criterion_group!(benches, bench_triangle, bench_relief_button);
criterion_main!(benches);
