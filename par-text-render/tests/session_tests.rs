//! Font session and static text behaviour against a recording backend.

use std::rc::Rc;

mod common;

use common::{
    BlockRasterizer, RecordingBackend, WHITE, assert_near, clip_to_pixels, context, window,
};
use par_text_fonts::{Bbox, CoordRange, Vec2};
use par_text_render::transform::{IDENTITY, transform_point};
use par_text_render::{
    Align, FontSession, HorizontalAlign, RenderError, StaticText, TextContext, VerticalAlign,
    start_offset,
};

fn session(ctx: &TextContext<RecordingBackend>) -> FontSession<RecordingBackend> {
    FontSession::with_rasterizer(ctx, BlockRasterizer::boxed(), 32).expect("block rasterizer at 32px")
}

/// Where the layout point `point` ends up on screen for the last draw.
fn drawn_at(ctx: &TextContext<RecordingBackend>, point: Vec2<f32>) -> Vec2<f32> {
    let backend = ctx.backend();
    let draw = backend.draws.last().expect("a draw was recorded");
    clip_to_pixels(transform_point(&draw.uniforms.transform, point), window())
}

#[test]
fn test_hi_draws_one_batch_of_twelve_vertices() {
    let ctx = context();
    let mut font = session(&ctx);

    font.render("Hi", WHITE, window(), Vec2::new(10.0, 40.0), Align::default());

    let backend = ctx.backend();
    assert_eq!(backend.uploads.len(), 1);
    assert_eq!(backend.uploads[0].1, 12);
    assert_eq!(backend.draws.len(), 1);
    assert_eq!(backend.draws[0].batches, vec![(0, 0, 12)]);
    assert_eq!(backend.draws[0].uniforms.color, WHITE);
    assert_eq!(backend.atlas.upload_count(), 1);
}

#[test]
fn test_left_top_places_upper_left_corner() {
    let ctx = context();
    let mut font = session(&ctx);
    let bbox = font.build("A").extent();
    // 16px wide, 24px tall, sitting on the baseline
    assert_eq!(bbox, Bbox::new(Vec2::new(0.0, -24.0), Vec2::new(16.0, 0.0)));
    assert_eq!(start_offset(&bbox, Align::TOP_LEFT), bbox.upper_left);

    let position = Vec2::new(100.0, 50.0);
    font.render("A", WHITE, window(), position, Align::TOP_LEFT);
    assert_near(drawn_at(&ctx, bbox.upper_left), position);
}

#[test]
fn test_right_bottom_places_lower_right_corner() {
    let ctx = context();
    let mut font = session(&ctx);
    let bbox = font.build("A").extent();
    let align = Align::new(HorizontalAlign::Right, VerticalAlign::Bottom);
    assert_eq!(start_offset(&bbox, align), bbox.lower_right);

    let position = Vec2::new(640.0, 480.0);
    font.render("A", WHITE, window(), position, align);
    assert_near(drawn_at(&ctx, bbox.lower_right), position);
}

#[test]
fn test_rotation_pivots_on_aligned_point() {
    let ctx = context();
    let mut font = session(&ctx);
    let position = Vec2::new(400.0, 300.0);

    font.render_rotated(
        "A",
        WHITE,
        window(),
        position,
        Align::CENTER,
        std::f32::consts::FRAC_PI_2,
    );
    // center of the (0,-24)-(16,0) box stays put
    assert_near(drawn_at(&ctx, Vec2::new(8.0, -12.0)), position);
    // the upper-left corner swings a quarter turn about it
    assert_near(drawn_at(&ctx, Vec2::new(0.0, -24.0)), Vec2::new(412.0, 292.0));
}

#[test]
fn test_baseline_alignment_uses_pen_origin() {
    let ctx = context();
    let mut font = session(&ctx);
    let position = Vec2::new(20.0, 200.0);

    font.render("Hi", WHITE, window(), position, Align::default());
    assert_near(drawn_at(&ctx, Vec2::new(0.0, 0.0)), position);
}

#[test]
fn test_empty_text_draws_nothing() {
    let ctx = context();
    let mut font = session(&ctx);

    font.render("", WHITE, window(), Vec2::new(0.0, 0.0), Align::CENTER);
    font.render("\n\n", WHITE, window(), Vec2::new(0.0, 0.0), Align::CENTER);
    font.render_with_matrix("", WHITE, &IDENTITY);

    let backend = ctx.backend();
    assert!(backend.uploads.is_empty());
    assert!(backend.draws.is_empty());
}

#[test]
fn test_matrix_render_uploads_and_uses_matrix_verbatim() {
    let ctx = context();
    let mut font = session(&ctx);
    let mut matrix = IDENTITY;
    matrix[0][0] = 0.01;
    matrix[1][1] = -0.01;

    font.render_with_matrix("Hi", WHITE, &matrix);
    font.render_with_matrix("Hi there", WHITE, &matrix);

    let backend = ctx.backend();
    assert_eq!(backend.uploads.len(), 2);
    assert_eq!(backend.uploads[1].1, 8 * 6);
    assert_eq!(backend.draws.len(), 2);
    assert_eq!(backend.draws[0].uniforms.transform, matrix);
    assert_eq!(backend.draws[1].vertices.len(), 48);
}

#[test]
fn test_batches_follow_page_order() {
    let ctx = context();
    let mut font = session(&ctx);

    font.render("αa", WHITE, window(), Vec2::new(0.0, 0.0), Align::default());

    let backend = ctx.backend();
    // Greek page built first gets texture 0
    assert_eq!(backend.draws[0].batches, vec![(0, 0, 6), (1, 6, 6)]);
}

#[test]
fn test_missing_page_is_skipped() {
    let ctx = context();
    let font = session(&ctx);
    let mut buffer = font.create_vertex_buffer();
    font.upload(&mut buffer, &[Default::default(); 6]);

    let ranges = [CoordRange {
        page_no: 5,
        start: 0,
        count: 6,
    }];
    font.render_batch(&buffer, &ranges, &IDENTITY, WHITE);

    assert!(ctx.backend().draws.is_empty());
}

#[test]
fn test_session_count_tracks_live_sessions() {
    let ctx = context();
    assert_eq!(ctx.session_count(), 0);

    let first = session(&ctx);
    let second = session(&ctx);
    assert_eq!(ctx.session_count(), 2);
    assert!(first.context().ptr_eq(second.context()));

    drop(first);
    assert_eq!(ctx.session_count(), 1);
    drop(second);
    assert_eq!(ctx.session_count(), 0);
}

#[test]
fn test_failed_creation_leaves_no_session() {
    let ctx = context();
    let result = FontSession::with_rasterizer(&ctx, BlockRasterizer::boxed(), 0);
    assert!(matches!(result, Err(RenderError::Font(_))));
    assert_eq!(ctx.session_count(), 0);

    let result = FontSession::new(
        &ctx,
        &par_text_render::FontSource::Memory(b"not a font".to_vec()),
        32,
    );
    assert!(result.is_err());
    assert_eq!(ctx.session_count(), 0);
}

#[test]
fn test_resize_rejects_oversized_atlas() {
    let ctx = TextContext::new(RecordingBackend::with_max_dimension(1024));
    let mut font = session(&ctx);
    font.build("A");

    // 16 cells of (64 + 4) px exceed 1024
    assert!(font.resize(128).is_err());
    assert_eq!(font.pixel_size(), 32);
    assert_eq!(font.generation(), 0);
    assert_eq!(font.page_count(), 1);
}

#[test]
fn test_sessions_share_one_backend() {
    let ctx = context();
    let mut small = session(&ctx);
    let mut large = FontSession::with_rasterizer(&ctx, BlockRasterizer::boxed(), 48)
        .expect("block rasterizer at 48px");

    small.build("1");
    large.build("1");

    assert_eq!(ctx.backend().atlas.upload_count(), 2);
    assert_eq!(large.line_height(), 60);
    assert_eq!(small.line_height(), 40);
}

#[test]
fn test_static_text_uploads_once() {
    let ctx = context();
    let font = session(&ctx).into_shared();
    let mut label = StaticText::new(font, "Hi", WHITE);

    label.render(window(), Vec2::new(10.0, 10.0), Align::TOP_LEFT);
    label.render(window(), Vec2::new(20.0, 20.0), Align::TOP_LEFT);

    let backend = ctx.backend();
    assert_eq!(backend.uploads.len(), 1);
    assert_eq!(backend.draws.len(), 2);
    assert_eq!(backend.draws[1].batches, vec![(0, 0, 12)]);
}

#[test]
fn test_static_text_rebuilds_after_resize() {
    let ctx = context();
    let font = session(&ctx).into_shared();
    let mut label = StaticText::new(font.clone(), "Hi", WHITE);
    assert_eq!(
        label.bbox(),
        Some(Bbox::new(Vec2::new(0.0, -24.0), Vec2::new(34.0, 0.0)))
    );

    font.borrow_mut().resize(16).expect("resize to 16px");
    assert_eq!(font.borrow().page_count(), 0);

    label.render(window(), Vec2::new(0.0, 0.0), Align::TOP_LEFT);
    assert_eq!(
        label.bbox(),
        Some(Bbox::new(Vec2::new(0.0, -12.0), Vec2::new(18.0, 0.0)))
    );

    let backend = ctx.backend();
    assert_eq!(backend.uploads.len(), 2);
    assert_eq!(backend.draws.len(), 1);
    // page 0 rebuilt at the new size
    assert_eq!(backend.draws[0].batches, vec![(1, 0, 12)]);
}

#[test]
fn test_static_text_set_text_and_color() {
    let ctx = context();
    let font = session(&ctx).into_shared();
    let mut label = StaticText::new(font, "Hi", WHITE);

    label.set_text("Hi");
    assert_eq!(ctx.backend().uploads.len(), 1);

    label.set_text("");
    assert_eq!(label.bbox(), None);
    label.render(window(), Vec2::new(0.0, 0.0), Align::CENTER);
    assert!(ctx.backend().draws.is_empty());

    let red = [1.0, 0.0, 0.0, 1.0];
    label.set_text("Hey");
    label.set_color(red);
    label.render_with_matrix(&IDENTITY);

    let backend = ctx.backend();
    assert_eq!(backend.draws.len(), 1);
    assert_eq!(backend.draws[0].uniforms.color, red);
    assert_eq!(backend.draws[0].batches, vec![(0, 0, 18)]);
}

#[test]
fn test_static_text_switches_font() {
    let ctx = context();
    let small = session(&ctx).into_shared();
    let large = FontSession::with_rasterizer(&ctx, BlockRasterizer::boxed(), 64)
        .expect("block rasterizer at 64px")
        .into_shared();
    let mut label = StaticText::new(Rc::clone(&small), "A", WHITE);

    label.set_font(large);
    assert_eq!(
        label.bbox(),
        Some(Bbox::new(Vec2::new(0.0, -48.0), Vec2::new(32.0, 0.0)))
    );
    assert_eq!(ctx.session_count(), 2);

    // the label no longer holds the old session
    assert_eq!(Rc::strong_count(&small), 1);
    drop(small);
    assert_eq!(ctx.session_count(), 1);
}

#[test]
fn test_static_text_keeps_session_alive() {
    let ctx = context();
    let label = {
        let font = session(&ctx).into_shared();
        StaticText::new(font, "Hi", WHITE)
    };
    assert_eq!(ctx.session_count(), 1);
    drop(label);
    assert_eq!(ctx.session_count(), 0);
}
