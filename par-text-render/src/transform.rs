//! 4×4 transforms from pixel space to clip space.
//!
//! Matrices are column-major (`m[column][row]`), matching WGSL's
//! `mat4x4<f32>` memory layout, so a [`Mat4`] can be copied into a uniform
//! buffer as-is.

use par_text_fonts::Vec2;

pub type Mat4 = [[f32; 4]; 4];

pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Pixel coordinates (origin top-left, y down) to clip space.
pub fn orthographic(win_size: Vec2<f32>) -> Mat4 {
    [
        [2.0 / win_size.x, 0.0, 0.0, 0.0],
        [0.0, -2.0 / win_size.y, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0, 1.0],
    ]
}

pub fn translation(offset: Vec2<f32>) -> Mat4 {
    let mut m = IDENTITY;
    m[3][0] = offset.x;
    m[3][1] = offset.y;
    m
}

/// Rotation about the z axis by `angle` radians.
pub fn rotation_z(angle: f32) -> Mat4 {
    let (sin, cos) = angle.sin_cos();
    let mut m = IDENTITY;
    m[0][0] = cos;
    m[0][1] = sin;
    m[1][0] = -sin;
    m[1][1] = cos;
    m
}

/// `a * b`: applies `b` first.
pub fn mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [[0.0; 4]; 4];
    for (col, out_col) in out.iter_mut().enumerate() {
        for (row, cell) in out_col.iter_mut().enumerate() {
            *cell = (0..4).map(|k| a[k][row] * b[col][k]).sum();
        }
    }
    out
}

/// Transform a 2D point (z = 0, w = 1), returning clip-space x and y.
pub fn transform_point(m: &Mat4, point: Vec2<f32>) -> Vec2<f32> {
    Vec2::new(
        m[0][0] * point.x + m[1][0] * point.y + m[3][0],
        m[0][1] * point.x + m[1][1] * point.y + m[3][1],
    )
}

/// Place layout geometry on screen.
///
/// Equivalent to `orthographic(win_size) * translation(pos) *
/// rotation_z(rotation) * translation(-offset)`, computed directly: the
/// layout point `offset` lands on pixel `pos` and the block rotates about it.
pub fn screen_transform(
    win_size: Vec2<f32>,
    pos: Vec2<f32>,
    rotation: f32,
    offset: Vec2<f32>,
) -> Mat4 {
    let (sin, cos) = rotation.sin_cos();
    let (w, h) = (win_size.x, win_size.y);
    [
        [2.0 * cos / w, -2.0 * sin / h, 0.0, 0.0],
        [-2.0 * sin / w, -2.0 * cos / h, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [
            -1.0 + 2.0 * (pos.x - cos * offset.x + sin * offset.y) / w,
            1.0 - 2.0 * (pos.y - sin * offset.x - cos * offset.y) / h,
            0.0,
            1.0,
        ],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_close(a: &Mat4, b: &Mat4) {
        for col in 0..4 {
            for row in 0..4 {
                assert!(
                    (a[col][row] - b[col][row]).abs() < EPS,
                    "m[{col}][{row}]: {} vs {}",
                    a[col][row],
                    b[col][row]
                );
            }
        }
    }

    fn composed(win: Vec2<f32>, pos: Vec2<f32>, rotation: f32, offset: Vec2<f32>) -> Mat4 {
        let ortho = orthographic(win);
        let moved = mul(&ortho, &translation(pos));
        let rotated = mul(&moved, &rotation_z(rotation));
        mul(&rotated, &translation(Vec2::new(-offset.x, -offset.y)))
    }

    #[test]
    fn closed_form_matches_composition() {
        let win = Vec2::new(800.0, 600.0);
        for &rotation in &[0.0, 0.3, -1.2, std::f32::consts::FRAC_PI_2, 3.0] {
            let pos = Vec2::new(123.0, 456.0);
            let offset = Vec2::new(-7.5, 30.25);
            assert_close(
                &screen_transform(win, pos, rotation, offset),
                &composed(win, pos, rotation, offset),
            );
        }
    }

    #[test]
    fn ortho_maps_window_corners() {
        let m = orthographic(Vec2::new(640.0, 480.0));
        assert_eq!(transform_point(&m, Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        let corner = transform_point(&m, Vec2::new(640.0, 480.0));
        assert!((corner.x - 1.0).abs() < EPS);
        assert!((corner.y + 1.0).abs() < EPS);
    }

    #[test]
    fn offset_point_lands_on_position() {
        let win = Vec2::new(200.0, 100.0);
        let pos = Vec2::new(50.0, 25.0);
        let offset = Vec2::new(12.0, -8.0);
        let expected = transform_point(&orthographic(win), pos);
        for &rotation in &[0.0, 0.7, 2.5] {
            let m = screen_transform(win, pos, rotation, offset);
            let got = transform_point(&m, offset);
            assert!((got.x - expected.x).abs() < EPS);
            assert!((got.y - expected.y).abs() < EPS);
        }
    }

    #[test]
    fn identity_is_neutral() {
        let m = rotation_z(0.4);
        assert_close(&mul(&IDENTITY, &m), &m);
        assert_close(&mul(&m, &IDENTITY), &m);
    }
}
