// Copyright 2026 the Graphic Tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform variants and their ordered composition.
//!
//! All matrices are 2-D affine [`kurbo::Affine`] values. A [`Transform`] is
//! one of four variants; a [`TransformCollection`] combines an ordered list
//! of them into forward, inverse, and non-native matrices plus an SVG
//! `transform` attribute string.

mod collection;
mod variant;

pub use collection::TransformCollection;
pub use variant::{
    MatrixTransform, NativeRotateTransform, NativeScaleTransform, NativeTranslateTransform,
    Transform,
};

use kurbo::Affine;

/// Inverts `matrix`, or returns `None` if it is singular or not finite.
#[must_use]
pub fn invert(matrix: Affine) -> Option<Affine> {
    let det = matrix.determinant();
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let inverse = matrix.inverse();
    inverse.is_finite().then_some(inverse)
}

#[cfg(test)]
mod tests {
    use kurbo::Vec2;

    use super::*;

    #[test]
    fn invert_regular_matrix() {
        let m = Affine::translate(Vec2::new(3.0, -4.0));
        assert_eq!(invert(m), Some(Affine::translate(Vec2::new(-3.0, 4.0))));
    }

    #[test]
    fn invert_rejects_singular_and_non_finite() {
        assert_eq!(invert(Affine::scale_non_uniform(0.0, 1.0)), None);
        assert_eq!(invert(Affine::new([f64::NAN, 0.0, 0.0, 1.0, 0.0, 0.0])), None);
        assert_eq!(invert(Affine::scale(1e-200)), None, "determinant underflows");
    }
}
