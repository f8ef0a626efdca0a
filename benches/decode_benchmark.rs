use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rgb_png::{filter, header::PngHeader, writer, Image};

const WIDTH: u32 = 1024;
const HEIGHT: u32 = 768;

fn test_image() -> Image {
    let rows = (0..HEIGHT)
        .map(|y| (0..WIDTH).map(|x| [(x ^ y) as u8, (x + y) as u8, (x * 3) as u8]).collect())
        .collect();

    Image { rows }
}

// Paeth exercises the slowest reconstruction path.
fn paeth_png(image: &Image) -> Vec<u8> {
    let rows: Vec<Vec<u8>> =
        image.rows.iter().map(|row| row.iter().flatten().copied().collect()).collect();
    let scanline_data = filter::filter_scanlines(&rows, filter::FilterType::Paeth);
    let compressed_data = miniz_oxide::deflate::compress_to_vec_zlib(&scanline_data, 6);
    writer::write_png(&PngHeader::rgb8(WIDTH, HEIGHT), &compressed_data).unwrap()
}

fn decode_benchmark(c: &mut Criterion) {
    let image = test_image();
    let plain_png = rgb_png::encode_channel(&image, 1).unwrap();
    let paeth_png = paeth_png(&image);

    c.bench_function("decode unfiltered", |b| b.iter(|| rgb_png::decode(black_box(&plain_png))));
    c.bench_function("decode paeth", |b| b.iter(|| rgb_png::decode(black_box(&paeth_png))));
    c.bench_function("encode red channel", |b| {
        b.iter(|| rgb_png::encode_channel(black_box(&image), 1))
    });
}

criterion_group!(benches, decode_benchmark);
criterion_main!(benches);
