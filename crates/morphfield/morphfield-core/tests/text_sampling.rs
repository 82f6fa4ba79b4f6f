use morphfield_core::{
    generate_text_points, Easing, FillerStrategy, MorphError, MorphScheduler, MorphState,
    PixelBuffer, PointSet, PointSetKind, TextSampling, FILLER_COLOR,
};
use rand::{rngs::StdRng, SeedableRng};

/// Stand-in for a canvas: every visible character is a solid block
/// 0.6em wide and 1em tall, laid out left to right and centered.
fn block_raster(text: &str, font_px: u32, w: u32, h: u32) -> Result<PixelBuffer, MorphError> {
    let mut buf = PixelBuffer::new(w, h)?;
    let advance = font_px as i32;
    let glyph_w = (font_px as f32 * 0.6) as i32;
    let count = text.chars().count() as i32;
    let left = (w as i32 - count * advance) / 2;
    let top = (h as i32 - font_px as i32) / 2;
    for (i, ch) in text.chars().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        let x0 = left + i as i32 * advance;
        for y in top..top + font_px as i32 {
            for x in x0..x0 + glyph_w {
                buf.blend_max(x, y, 1.0);
            }
        }
    }
    Ok(buf)
}

fn sampling(max_points: usize, keep: f32) -> TextSampling {
    TextSampling {
        max_points,
        font_size_px: 48,
        canvas_width: 512,
        canvas_height: 128,
        brightness_threshold: 0.5,
        keep_probability: keep,
        world_scale: 0.05,
        sample_step: 1,
    }
}

#[test]
fn empty_text_yields_no_points_and_full_filler() {
    let mut rng = StdRng::seed_from_u64(0);
    for text in ["", "   ", "\t\n"] {
        let ps = generate_text_points(&block_raster, text, &sampling(12_000, 0.3), &mut rng)
            .expect("blank text is valid");
        assert_eq!(ps.len(), 0);
        assert_eq!(ps.kind, PointSetKind::Text);
    }

    let initial = PointSet::new(PointSetKind::Sphere, vec![[1.0, 0.0, 0.0]; 12_000], vec![]);
    let mut s = MorphScheduler::new(&initial).unwrap();
    let empty = generate_text_points(&block_raster, "", &sampling(12_000, 0.3), &mut rng).unwrap();
    s.set_target(
        &empty,
        FillerStrategy::Scatter { radius: 5.0 },
        0.0,
        Easing::Linear,
        &mut rng,
    );
    assert_eq!(s.state(), MorphState::AtText);
    assert_eq!(s.shape_len(), 0);
    assert!(s.colors().iter().all(|c| *c == FILLER_COLOR));
    assert!(s.positions().iter().all(|p| p.iter().all(|c| c.is_finite())));
}

#[test]
fn full_probability_is_reproducible() {
    let a = generate_text_points(
        &block_raster,
        "HI",
        &sampling(12_000, 1.0),
        &mut StdRng::seed_from_u64(1),
    )
    .unwrap();
    let b = generate_text_points(
        &block_raster,
        "HI",
        &sampling(12_000, 1.0),
        &mut StdRng::seed_from_u64(2),
    )
    .unwrap();
    // two 28x48 blocks
    assert_eq!(a.len(), 2 * 28 * 48);
    assert_eq!(a, b);
    assert!(a.positions().iter().all(|p| p[2] == 0.0));
}

#[test]
fn thinning_follows_the_seed() {
    let params = sampling(12_000, 0.3);
    let a = generate_text_points(&block_raster, "HI", &params, &mut StdRng::seed_from_u64(7))
        .unwrap();
    let b = generate_text_points(&block_raster, "HI", &params, &mut StdRng::seed_from_u64(7))
        .unwrap();
    let c = generate_text_points(&block_raster, "HI", &params, &mut StdRng::seed_from_u64(8))
        .unwrap();
    assert_eq!(a, b);
    assert_ne!(a.positions(), c.positions());

    let total = 2 * 28 * 48;
    let expected = total as f32 * 0.3;
    assert!((a.len() as f32 - expected).abs() < expected * 0.25, "kept {}", a.len());
}

#[test]
fn points_are_centered_in_world_space() {
    let ps = generate_text_points(
        &block_raster,
        "HI",
        &sampling(12_000, 1.0),
        &mut StdRng::seed_from_u64(0),
    )
    .unwrap();
    let n = ps.len() as f32;
    let cx: f32 = ps.positions().iter().map(|p| p[0]).sum::<f32>() / n;
    let cy: f32 = ps.positions().iter().map(|p| p[1]).sum::<f32>() / n;
    // block layout is centered to within a few pixels
    assert!(cx.abs() < 1.0, "cx={cx}");
    assert!(cy.abs() < 0.1, "cy={cy}");
}

#[test]
fn cap_truncates_to_max_points() {
    let ps = generate_text_points(
        &block_raster,
        "HELLO WORLD",
        &sampling(100, 1.0),
        &mut StdRng::seed_from_u64(0),
    )
    .unwrap();
    assert_eq!(ps.len(), 100);
    assert_eq!(ps.colors().len(), 100);
}

#[test]
fn sample_step_thins_the_grid() {
    let mut params = sampling(12_000, 1.0);
    params.sample_step = 2;
    let ps = generate_text_points(&block_raster, "I", &params, &mut StdRng::seed_from_u64(0))
        .unwrap();
    let dense = generate_text_points(
        &block_raster,
        "I",
        &sampling(12_000, 1.0),
        &mut StdRng::seed_from_u64(0),
    )
    .unwrap();
    assert!(ps.len() * 3 < dense.len());
    assert!(!ps.is_empty());
}

#[test]
fn rasterizer_errors_propagate() {
    let failing = |_: &str, _: u32, _: u32, _: u32| -> Result<PixelBuffer, MorphError> {
        Err(MorphError::Raster("no canvas".into()))
    };
    let err = generate_text_points(
        &failing,
        "HI",
        &sampling(10, 1.0),
        &mut StdRng::seed_from_u64(0),
    )
    .unwrap_err();
    assert!(matches!(err, MorphError::Raster(_)));
}
