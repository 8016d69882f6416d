// Copyright 2026 the Graphic Tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered, composable transform sequences.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Affine;

use super::{Transform, invert};
use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq)]
struct Member {
    transform: Transform,
    name: Option<String>,
}

/// An ordered sequence of [`Transform`]s combined into a single placement.
///
/// Every mutation recombines the members synchronously, so the derived
/// values are always consistent with the current members:
///
/// - [`transform_matrix`](Self::transform_matrix) is `M[n-1] * ... * M[0]`.
///   Applied to a point, member 0 acts first.
/// - [`inverse_transform_matrix`](Self::inverse_transform_matrix) is its
///   inverse. When the combined matrix is singular the previous inverse is
///   kept and [`inverse_retained`](Self::inverse_retained) reports it.
/// - [`transform_matrix_non_native`](Self::transform_matrix_non_native)
///   combines only what a renderer cannot express as SVG commands.
/// - [`native_svg_transform`](Self::native_svg_transform) lists the native
///   commands in reverse member order, which is the order SVG applies a
///   `transform` attribute from right to left.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformCollection {
    members: Vec<Member>,
    transform_matrix: Affine,
    inverse_transform_matrix: Affine,
    transform_matrix_non_native: Affine,
    native_svg_transform: Option<String>,
    inverse_retained: bool,
    revision: u64,
}

impl Default for TransformCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformCollection {
    /// Creates an empty collection with identity matrices.
    #[must_use]
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            transform_matrix: Affine::IDENTITY,
            inverse_transform_matrix: Affine::IDENTITY,
            transform_matrix_non_native: Affine::IDENTITY,
            native_svg_transform: None,
            inverse_retained: false,
            revision: 0,
        }
    }

    // -- Members --

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the collection has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the member at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Transform> {
        self.members.get(index).map(|m| &m.transform)
    }

    /// Iterates over the members in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Transform> + '_ {
        self.members.iter().map(|m| &m.transform)
    }

    /// Appends an unnamed member.
    pub fn push(&mut self, transform: impl Into<Transform>) {
        self.members.push(Member {
            transform: transform.into(),
            name: None,
        });
        self.combine();
    }

    /// Appends a member, optionally bound to a name, and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] if `name` is already bound in this
    /// collection. The collection is left unchanged.
    pub fn append(&mut self, transform: impl Into<Transform>, name: Option<&str>) -> Result<usize> {
        if let Some(name) = name {
            if self.index_of(name).is_some() {
                return Err(Error::duplicate(name));
            }
        }
        self.members.push(Member {
            transform: transform.into(),
            name: name.map(String::from),
        });
        self.combine();
        Ok(self.members.len() - 1)
    }

    /// Inserts an unnamed member at `index`, shifting later members.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[track_caller]
    pub fn insert(&mut self, index: usize, transform: impl Into<Transform>) {
        assert!(
            index <= self.members.len(),
            "insertion index {index} out of range for {} members",
            self.members.len()
        );
        self.members.insert(
            index,
            Member {
                transform: transform.into(),
                name: None,
            },
        );
        self.combine();
    }

    /// Removes and returns the member at `index`.
    ///
    /// Returns `None` and leaves the collection untouched if `index` is out
    /// of range.
    pub fn remove(&mut self, index: usize) -> Option<Transform> {
        if index >= self.members.len() {
            return None;
        }
        let member = self.members.remove(index);
        self.combine();
        Some(member.transform)
    }

    /// Removes every member.
    pub fn clear(&mut self) {
        self.members.clear();
        self.combine();
    }

    /// Looks up a member by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NameNotFound`] if no member is bound to `name`.
    pub fn by_name(&self, name: &str) -> Result<&Transform> {
        self.index_of(name)
            .map(|index| &self.members[index].transform)
            .ok_or_else(|| Error::not_found(name))
    }

    /// Returns the index of the member bound to `name`.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.members
            .iter()
            .position(|m| m.name.as_deref() == Some(name))
    }

    /// Returns the name of the member at `index`, if it has one.
    #[must_use]
    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.members.get(index).and_then(|m| m.name.as_deref())
    }

    /// Mutates the member at `index` and recombines.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[track_caller]
    pub fn update<R>(&mut self, index: usize, f: impl FnOnce(&mut Transform) -> R) -> R {
        let len = self.members.len();
        let Some(member) = self.members.get_mut(index) else {
            panic!("member index {index} out of range for {len} members");
        };
        let result = f(&mut member.transform);
        self.combine();
        result
    }

    /// Mutates the member bound to `name` and recombines.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NameNotFound`] if no member is bound to `name`.
    pub fn update_by_name<R>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Transform) -> R,
    ) -> Result<R> {
        let index = self.index_of(name).ok_or_else(|| Error::not_found(name))?;
        Ok(self.update(index, f))
    }

    // -- Derived values --

    /// The combined matrix of all members.
    #[must_use]
    pub fn transform_matrix(&self) -> Affine {
        self.transform_matrix
    }

    /// The inverse of [`transform_matrix`](Self::transform_matrix), or the
    /// last invertible state's inverse.
    #[must_use]
    pub fn inverse_transform_matrix(&self) -> Affine {
        self.inverse_transform_matrix
    }

    /// The combined matrix of the non-native parts of all members.
    #[must_use]
    pub fn transform_matrix_non_native(&self) -> Affine {
        self.transform_matrix_non_native
    }

    /// The SVG `transform` attribute value for the native members.
    #[must_use]
    pub fn native_svg_transform(&self) -> Option<&str> {
        self.native_svg_transform.as_deref()
    }

    /// Whether the last recombination produced a singular matrix, so that
    /// the inverse is stale.
    #[must_use]
    pub fn inverse_retained(&self) -> bool {
        self.inverse_retained
    }

    /// Counter bumped on every recombination.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn combine(&mut self) {
        let mut matrix = Affine::IDENTITY;
        let mut non_native = Affine::IDENTITY;
        let mut commands: Vec<String> = Vec::new();
        for member in &self.members {
            matrix = member.transform.matrix() * matrix;
            non_native = member.transform.matrix_non_native() * non_native;
            if let Some(command) = member.transform.native_svg_transform() {
                commands.insert(0, command);
            }
        }

        self.transform_matrix = matrix;
        self.transform_matrix_non_native = non_native;
        self.native_svg_transform = (!commands.is_empty()).then(|| commands.join(", "));
        match invert(matrix) {
            Some(inverse) => {
                self.inverse_transform_matrix = inverse;
                self.inverse_retained = false;
            }
            None => self.inverse_retained = true,
        }
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Vec2};

    use super::*;
    use crate::transform::{MatrixTransform, NativeScaleTransform};

    fn approx_point(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-10 && (a.y - b.y).abs() < 1e-10
    }

    fn translate(x: f64, y: f64) -> Transform {
        Transform::from_affine(Affine::translate(Vec2::new(x, y)))
    }

    fn scale(x: f64, y: f64) -> Transform {
        Transform::from_affine(Affine::scale_non_uniform(x, y))
    }

    #[test]
    fn starts_with_identity_matrices() {
        let c = TransformCollection::new();
        assert_eq!(c.transform_matrix(), Affine::IDENTITY);
        assert_eq!(c.inverse_transform_matrix(), Affine::IDENTITY);
        assert_eq!(c.transform_matrix_non_native(), Affine::IDENTITY);
        assert_eq!(c.native_svg_transform(), None);
        assert_eq!(c.revision(), 0);
    }

    #[test]
    fn first_member_acts_first_on_points() {
        let mut c = TransformCollection::new();
        c.push(scale(2.0, 3.0));
        c.push(translate(1.0, 2.0));

        let m = c.transform_matrix();
        assert_eq!(m * Point::new(0.0, 0.0), Point::new(1.0, 2.0));
        assert_eq!(m * Point::new(1.0, 1.0), Point::new(3.0, 5.0));
    }

    #[test]
    fn order_of_append_matters() {
        let mut c = TransformCollection::new();
        c.push(translate(1.0, 2.0));
        c.push(scale(2.0, 3.0));

        assert_eq!(
            c.transform_matrix(),
            Affine::new([2.0, 0.0, 0.0, 3.0, 2.0, 6.0])
        );
        assert_eq!(
            c.transform_matrix() * Point::new(0.0, 0.0),
            Point::new(2.0, 6.0)
        );
        let back = c.inverse_transform_matrix() * Point::new(2.0, 6.0);
        assert!(approx_point(back, Point::ORIGIN), "got {back:?}");
    }

    #[test]
    fn recombines_when_members_change() {
        let mut c = TransformCollection::new();
        c.push(MatrixTransform::default());
        c.push(MatrixTransform::default());

        // Order of modification is irrelevant.
        c.update(1, |t| *t = scale(2.0, 3.0));
        c.update(0, |t| *t = translate(1.0, 2.0));

        assert_eq!(
            c.transform_matrix(),
            Affine::new([2.0, 0.0, 0.0, 3.0, 2.0, 6.0])
        );
        assert_eq!(c.revision(), 4);
    }

    #[test]
    fn singular_matrix_keeps_previous_inverse() {
        let mut c = TransformCollection::new();
        c.push(translate(1.0, 2.0));
        assert!(!c.inverse_retained());

        let singular = Affine::new([1.0, 2.0, 2.0, 4.0, 3.0, 4.0]);
        c.update(0, |t| *t = Transform::from_affine(singular));

        assert_eq!(c.transform_matrix(), singular);
        assert_eq!(
            c.inverse_transform_matrix(),
            Affine::translate(Vec2::new(-1.0, -2.0))
        );
        assert!(c.inverse_retained());

        c.update(0, |t| *t = translate(5.0, 0.0));
        assert!(!c.inverse_retained(), "recovers on the next invertible state");
        assert_eq!(
            c.inverse_transform_matrix(),
            Affine::translate(Vec2::new(-5.0, 0.0))
        );
    }

    #[test]
    fn native_commands_are_joined_in_reverse() {
        let mut c = TransformCollection::new();
        c.push(Transform::translation(1.0, 2.0));
        c.push(Transform::rotation(30.0, Point::new(4.0, 5.0)));

        assert_eq!(
            c.native_svg_transform(),
            Some("rotate(30, 4, 5), translate(1, 2)")
        );
    }

    #[test]
    fn no_op_and_matrix_members_contribute_no_command() {
        let mut c = TransformCollection::new();
        c.push(NativeScaleTransform::default());
        c.push(scale(2.0, 2.0));
        assert_eq!(c.native_svg_transform(), None);

        c.push(Transform::scaling(3.0, 1.0));
        assert_eq!(c.native_svg_transform(), Some("scale(3, 1)"));
    }

    #[test]
    fn non_native_matrix_skips_native_members() {
        let mut c = TransformCollection::new();
        c.push(Transform::translation(10.0, 10.0));
        c.push(scale(2.0, 2.0));
        c.push(Transform::rotation(90.0, Point::ORIGIN));

        assert_eq!(c.transform_matrix_non_native(), Affine::scale(2.0));
        // (0,0) -> translate -> (10,10) -> scale -> (20,20) -> rotate -> (-20,20)
        let p = c.transform_matrix() * Point::ORIGIN;
        assert!(approx_point(p, Point::new(-20.0, 20.0)), "got {p:?}");
    }

    #[test]
    fn named_members() {
        let mut c = TransformCollection::new();
        assert_eq!(c.append(Transform::translation(1.0, 0.0), Some("offset")), Ok(0));
        assert_eq!(c.append(Transform::scaling(2.0, 2.0), None), Ok(1));

        let err = c
            .append(Transform::translation(5.0, 5.0), Some("offset"))
            .unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateName {
                name: String::from("offset")
            }
        );
        assert_eq!(c.len(), 2, "rejected member is not added");

        assert_eq!(
            c.by_name("offset"),
            Ok(&Transform::translation(1.0, 0.0))
        );
        assert_eq!(c.name_of(0), Some("offset"));
        assert!(matches!(
            c.by_name("missing"),
            Err(Error::NameNotFound { .. })
        ));

        c.update_by_name("offset", |t| *t = Transform::translation(3.0, 0.0))
            .unwrap();
        assert_eq!(
            c.native_svg_transform(),
            Some("scale(2, 2), translate(3, 0)")
        );
        assert!(c.update_by_name("missing", |_| ()).is_err());
    }

    #[test]
    fn insert_remove_and_clear() {
        let mut c = TransformCollection::new();
        c.push(translate(1.0, 0.0));
        c.insert(0, scale(2.0, 2.0));
        assert_eq!(c.transform_matrix() * Point::new(1.0, 1.0), Point::new(3.0, 2.0));

        assert_eq!(c.remove(5), None);
        let removed = c.remove(0);
        assert_eq!(removed, Some(scale(2.0, 2.0)));
        assert_eq!(c.transform_matrix(), Affine::translate(Vec2::new(1.0, 0.0)));

        let before = c.revision();
        c.clear();
        assert!(c.is_empty());
        assert_eq!(c.transform_matrix(), Affine::IDENTITY);
        assert!(c.revision() > before);
    }

    #[test]
    #[should_panic(expected = "member index 3 out of range")]
    fn update_out_of_range_panics() {
        let mut c = TransformCollection::new();
        c.update(3, |_| ());
    }
}
