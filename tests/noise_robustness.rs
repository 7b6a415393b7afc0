use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use patmatch::{ImageView, MatchConfig, Matcher};

fn make_template(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
            data.push(value as u8);
        }
    }
    data
}

// Normalized correlation is insensitive to moderate additive noise; the
// embedded occurrence must survive with a degraded but clearly passing score.
#[test]
fn match_survives_additive_noise() {
    let tpl_width = 48;
    let tpl_height = 48;
    let tpl = make_template(tpl_width, tpl_height);
    let tpl_view = ImageView::from_slice(&tpl, tpl_width, tpl_height).unwrap();

    let img_width = 256;
    let img_height = 192;
    let (x0, y0) = (90, 70);
    let mut image = vec![128u8; img_width * img_height];
    for y in 0..tpl_height {
        let start = (y0 + y) * img_width + x0;
        image[start..start + tpl_width]
            .copy_from_slice(&tpl[y * tpl_width..(y + 1) * tpl_width]);
    }

    let mut rng = StdRng::seed_from_u64(42);
    for px in image.iter_mut() {
        let noise: i16 = rng.random_range(-10..=10);
        *px = (*px as i16 + noise).clamp(0, 255) as u8;
    }
    let image_view = ImageView::from_slice(&image, img_width, img_height).unwrap();

    let mut matcher = Matcher::new();
    matcher.learn(tpl_view).unwrap();

    let cfg = MatchConfig {
        score: 0.6,
        max_pos: 3,
        ..MatchConfig::default()
    };
    let result = matcher.match_image(image_view, &cfg).unwrap();

    assert!(result.success);
    let m = &result.matches[0];
    assert!(m.score > 0.7, "score {}", m.score);
    assert!((m.center.x - (x0 as f32 + 23.5)).abs() <= 1.0);
    assert!((m.center.y - (y0 as f32 + 23.5)).abs() <= 1.0);
}

// Global brightness and contrast changes cancel out of the zero-normalized
// score entirely.
#[test]
fn match_is_invariant_to_linear_intensity_change() {
    let tpl_width = 40;
    let tpl_height = 40;
    let tpl = make_template(tpl_width, tpl_height);
    let tpl_view = ImageView::from_slice(&tpl, tpl_width, tpl_height).unwrap();

    let img_width = 200;
    let img_height = 160;
    let (x0, y0) = (60, 50);
    let mut image = vec![0u8; img_width * img_height];
    for y in 0..tpl_height {
        for x in 0..tpl_width {
            let value = tpl[y * tpl_width + x] as f32;
            // Halve the contrast and lift the brightness.
            image[(y0 + y) * img_width + (x0 + x)] = (value * 0.5 + 60.0) as u8;
        }
    }
    let image_view = ImageView::from_slice(&image, img_width, img_height).unwrap();

    let mut matcher = Matcher::new();
    matcher.learn(tpl_view).unwrap();

    let result = matcher
        .match_image(
            image_view,
            &MatchConfig {
                score: 0.8,
                ..MatchConfig::default()
            },
        )
        .unwrap();

    assert!(result.success);
    let m = &result.matches[0];
    assert!(m.score > 0.95, "score {}", m.score);
    assert!((m.center.x - (x0 as f32 + 19.5)).abs() <= 1.0);
    assert!((m.center.y - (y0 as f32 + 19.5)).abs() <= 1.0);
}
