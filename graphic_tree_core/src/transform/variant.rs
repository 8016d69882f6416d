// Copyright 2026 the Graphic Tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The four transform variants.
//!
//! Native variants (rotate, scale, translate) can be expressed as an SVG
//! `transform` command and therefore contribute the identity to the
//! non-native matrix. The matrix variant is opaque to the renderer and
//! contributes its full matrix to both.

use alloc::format;
use alloc::string::String;

use kurbo::{Affine, Point, Vec2};

/// A raw affine matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MatrixTransform {
    /// The matrix, identity by default.
    pub matrix: Affine,
}

impl MatrixTransform {
    /// Creates a matrix transform.
    #[must_use]
    pub const fn new(matrix: Affine) -> Self {
        Self { matrix }
    }

    /// Replaces the matrix.
    pub fn set_matrix(&mut self, matrix: Affine) {
        self.matrix = matrix;
    }
}

/// A rotation about a center point, expressible as `rotate(...)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NativeRotateTransform {
    /// Rotation angle in degrees.
    pub degrees: f64,
    /// Rotation center.
    pub center: Point,
}

impl Default for NativeRotateTransform {
    fn default() -> Self {
        Self::new(0.0, Point::ORIGIN)
    }
}

impl NativeRotateTransform {
    /// Creates a rotation of `degrees` about `center`.
    #[must_use]
    pub const fn new(degrees: f64, center: Point) -> Self {
        Self { degrees, center }
    }

    /// The rotation matrix.
    #[must_use]
    pub fn matrix(&self) -> Affine {
        Affine::rotate_about(self.degrees.to_radians(), self.center)
    }

    /// The `rotate` command, or `None` for a full-turn multiple.
    ///
    /// The center is only written when it differs from the origin.
    #[must_use]
    pub fn native_svg_transform(&self) -> Option<String> {
        if self.degrees % 360.0 == 0.0 {
            return None;
        }
        if self.center.to_vec2().length() == 0.0 {
            Some(format!("rotate({})", self.degrees))
        } else {
            Some(format!(
                "rotate({}, {}, {})",
                self.degrees, self.center.x, self.center.y
            ))
        }
    }
}

/// A non-uniform scaling, expressible as `scale(...)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NativeScaleTransform {
    /// Scale factors along x and y.
    pub scaling: Vec2,
}

impl Default for NativeScaleTransform {
    fn default() -> Self {
        Self::new(Vec2::new(1.0, 1.0))
    }
}

impl NativeScaleTransform {
    /// Creates a scaling by `scaling.x` and `scaling.y`.
    #[must_use]
    pub const fn new(scaling: Vec2) -> Self {
        Self { scaling }
    }

    /// The scaling matrix.
    #[must_use]
    pub fn matrix(&self) -> Affine {
        Affine::scale_non_uniform(self.scaling.x, self.scaling.y)
    }

    /// The `scale` command, or `None` for the unit scaling.
    #[must_use]
    pub fn native_svg_transform(&self) -> Option<String> {
        if self.scaling == Vec2::new(1.0, 1.0) {
            None
        } else {
            Some(format!("scale({}, {})", self.scaling.x, self.scaling.y))
        }
    }
}

/// A translation, expressible as `translate(...)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NativeTranslateTransform {
    /// Translation vector.
    pub translation: Vec2,
}

impl NativeTranslateTransform {
    /// Creates a translation by `translation`.
    #[must_use]
    pub const fn new(translation: Vec2) -> Self {
        Self { translation }
    }

    /// The translation matrix.
    #[must_use]
    pub fn matrix(&self) -> Affine {
        Affine::translate(self.translation)
    }

    /// The `translate` command, or `None` for the zero vector.
    #[must_use]
    pub fn native_svg_transform(&self) -> Option<String> {
        if self.translation.length() == 0.0 {
            None
        } else {
            Some(format!(
                "translate({}, {})",
                self.translation.x, self.translation.y
            ))
        }
    }
}

/// One member of a [`TransformCollection`](super::TransformCollection).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transform {
    /// An opaque affine matrix.
    Matrix(MatrixTransform),
    /// A native rotation.
    Rotate(NativeRotateTransform),
    /// A native scaling.
    Scale(NativeScaleTransform),
    /// A native translation.
    Translate(NativeTranslateTransform),
}

impl Default for Transform {
    fn default() -> Self {
        Self::Matrix(MatrixTransform::default())
    }
}

impl Transform {
    /// Wraps a raw matrix.
    #[must_use]
    pub const fn from_affine(matrix: Affine) -> Self {
        Self::Matrix(MatrixTransform::new(matrix))
    }

    /// A native rotation of `degrees` about `center`.
    #[must_use]
    pub const fn rotation(degrees: f64, center: Point) -> Self {
        Self::Rotate(NativeRotateTransform::new(degrees, center))
    }

    /// A native scaling by `(sx, sy)`.
    #[must_use]
    pub const fn scaling(sx: f64, sy: f64) -> Self {
        Self::Scale(NativeScaleTransform::new(Vec2::new(sx, sy)))
    }

    /// A native translation by `(tx, ty)`.
    #[must_use]
    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self::Translate(NativeTranslateTransform::new(Vec2::new(tx, ty)))
    }

    /// Whether this variant renders as an SVG command.
    #[must_use]
    pub const fn is_native(&self) -> bool {
        !matches!(self, Self::Matrix(_))
    }

    /// The full matrix of this transform.
    #[must_use]
    pub fn matrix(&self) -> Affine {
        match self {
            Self::Matrix(m) => m.matrix,
            Self::Rotate(r) => r.matrix(),
            Self::Scale(s) => s.matrix(),
            Self::Translate(t) => t.matrix(),
        }
    }

    /// The part of the matrix a renderer cannot express natively.
    ///
    /// Identity for native variants.
    #[must_use]
    pub fn matrix_non_native(&self) -> Affine {
        match self {
            Self::Matrix(m) => m.matrix,
            Self::Rotate(_) | Self::Scale(_) | Self::Translate(_) => Affine::IDENTITY,
        }
    }

    /// The SVG command for this transform, if it is native and not a no-op.
    #[must_use]
    pub fn native_svg_transform(&self) -> Option<String> {
        match self {
            Self::Matrix(_) => None,
            Self::Rotate(r) => r.native_svg_transform(),
            Self::Scale(s) => s.native_svg_transform(),
            Self::Translate(t) => t.native_svg_transform(),
        }
    }
}

impl From<MatrixTransform> for Transform {
    fn from(t: MatrixTransform) -> Self {
        Self::Matrix(t)
    }
}

impl From<NativeRotateTransform> for Transform {
    fn from(t: NativeRotateTransform) -> Self {
        Self::Rotate(t)
    }
}

impl From<NativeScaleTransform> for Transform {
    fn from(t: NativeScaleTransform) -> Self {
        Self::Scale(t)
    }
}

impl From<NativeTranslateTransform> for Transform {
    fn from(t: NativeTranslateTransform) -> Self {
        Self::Translate(t)
    }
}

impl From<Affine> for Transform {
    fn from(matrix: Affine) -> Self {
        Self::from_affine(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    fn approx_point(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
    }

    #[test]
    fn every_variant_defaults_to_identity() {
        assert_eq!(MatrixTransform::default().matrix, Affine::IDENTITY);
        assert_eq!(NativeRotateTransform::default().matrix(), Affine::IDENTITY);
        assert_eq!(NativeScaleTransform::default().matrix(), Affine::IDENTITY);
        assert_eq!(NativeTranslateTransform::default().matrix(), Affine::IDENTITY);
    }

    #[test]
    fn matrix_variant_is_non_native() {
        let m = Affine::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut t = MatrixTransform::default();
        t.set_matrix(m);
        let t = Transform::from(t);

        assert_eq!(t.matrix(), m);
        assert_eq!(t.matrix_non_native(), m);
        assert_eq!(t.native_svg_transform(), None);
        assert!(!t.is_native());
    }

    #[test]
    fn native_variants_have_identity_non_native_matrix() {
        for t in [
            Transform::rotation(45.0, Point::new(1.0, 1.0)),
            Transform::scaling(2.0, 3.0),
            Transform::translation(4.0, 5.0),
        ] {
            assert!(t.is_native());
            assert_eq!(t.matrix_non_native(), Affine::IDENTITY, "{t:?}");
        }
    }

    #[test]
    fn rotate_about_center() {
        let t = NativeRotateTransform::new(90.0, Point::new(1.0, 1.0));
        let p = t.matrix() * Point::new(2.0, 1.0);
        assert!(approx_point(p, Point::new(1.0, 2.0)), "got {p:?}");
    }

    #[test]
    fn rotate_command_omits_origin_center() {
        let t = NativeRotateTransform::new(30.0, Point::ORIGIN);
        assert_eq!(t.native_svg_transform().as_deref(), Some("rotate(30)"));

        let t = NativeRotateTransform::new(30.0, Point::new(4.0, 5.0));
        assert_eq!(
            t.native_svg_transform().as_deref(),
            Some("rotate(30, 4, 5)")
        );

        let t = NativeRotateTransform::new(12.5, Point::new(-1.0, 0.0));
        assert_eq!(
            t.native_svg_transform().as_deref(),
            Some("rotate(12.5, -1, 0)")
        );
    }

    #[test]
    fn rotate_full_turns_have_no_command() {
        for degrees in [0.0, 360.0, -720.0] {
            let t = NativeRotateTransform::new(degrees, Point::new(4.0, 5.0));
            assert_eq!(t.native_svg_transform(), None, "{degrees} degrees");
        }
        let t = NativeRotateTransform::new(370.0, Point::ORIGIN);
        assert_eq!(t.native_svg_transform().as_deref(), Some("rotate(370)"));
    }

    #[test]
    fn scale_command() {
        let t = NativeScaleTransform::new(Vec2::new(2.0, 1.5));
        assert_eq!(t.native_svg_transform().as_deref(), Some("scale(2, 1.5)"));
        assert_eq!(t.matrix() * Point::new(1.0, 2.0), Point::new(2.0, 3.0));

        assert_eq!(NativeScaleTransform::default().native_svg_transform(), None);
        let t = NativeScaleTransform::new(Vec2::new(1.0, 2.0));
        assert_eq!(t.native_svg_transform().as_deref(), Some("scale(1, 2)"));
    }

    #[test]
    fn translate_command() {
        let t = NativeTranslateTransform::new(Vec2::new(1.0, -3.0));
        assert_eq!(
            t.native_svg_transform().as_deref(),
            Some("translate(1, -3)")
        );
        assert_eq!(t.matrix() * Point::new(1.0, 1.0), Point::new(2.0, -2.0));

        assert_eq!(
            NativeTranslateTransform::default().native_svg_transform(),
            None
        );
    }
}
