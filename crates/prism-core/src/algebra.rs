//! 3x3 matrix and 3-vector arithmetic for the color-correction chain.
//!
//! # Convention
//!
//! Coefficients are addressed **row-major** (`[row * 3 + col]`) to match the
//! hardware register order, and matrices act on **column vectors**:
//!
//! ```text
//! | c0 c1 c2 |   | x |   | c0*x + c1*y + c2*z |
//! | c3 c4 c5 | * | y | = | c3*x + c4*y + c5*z |
//! | c6 c7 c8 |   | z |   | c6*x + c7*y + c8*z |
//! ```
//!
//! Storage is `glam`'s column-major `DMat3`; the row-major constructors and
//! accessors below do the index translation.

use std::ops::{Add, Index, Mul, Sub};

use glam::{DMat3, DVec3};

/// Number of rows (and columns) in a color-correction matrix.
pub const DIM: usize = 3;

/// Number of coefficients in a color-correction matrix.
pub const COEFF_COUNT: usize = DIM * DIM;

/// A 3x3 double-precision color matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix(DMat3);

impl Matrix {
    /// Identity matrix.
    pub const IDENTITY: Self = Self(DMat3::IDENTITY);

    /// All-zero matrix.
    pub const ZERO: Self = Self(DMat3::ZERO);

    /// Creates a matrix from 9 row-major coefficients.
    pub const fn from_row_major(c: [f64; COEFF_COUNT]) -> Self {
        Self(DMat3::from_cols(
            DVec3::new(c[0], c[3], c[6]),
            DVec3::new(c[1], c[4], c[7]),
            DVec3::new(c[2], c[5], c[8]),
        ))
    }

    /// Creates a diagonal matrix.
    pub const fn diagonal(d0: f64, d1: f64, d2: f64) -> Self {
        Self::from_row_major([d0, 0.0, 0.0, 0.0, d1, 0.0, 0.0, 0.0, d2])
    }

    /// Returns the coefficients in row-major order.
    pub fn to_row_major(&self) -> [f64; COEFF_COUNT] {
        self.0.transpose().to_cols_array()
    }

    /// Coefficient at `row`, `col`.
    pub fn coeff(&self, row: usize, col: usize) -> f64 {
        self.0.col(col)[row]
    }

    /// Row `row` as a vector.
    pub fn row(&self, row: usize) -> Vector {
        Vector(self.0.row(row))
    }

    /// Returns a copy with column `col` multiplied by `factor`.
    pub fn scale_column(&self, col: usize, factor: f64) -> Self {
        let mut m = self.0;
        *m.col_mut(col) *= factor;
        Self(m)
    }

    /// Matrix product `self × rhs`. Order matters.
    pub fn multiply(&self, rhs: &Matrix) -> Matrix {
        Self(self.0 * rhs.0)
    }

    /// Matrix-vector product `self × v`.
    pub fn apply(&self, v: Vector) -> Vector {
        Vector(self.0 * v.0)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Matrix {
        self.multiply(&rhs)
    }
}

impl Mul<Vector> for Matrix {
    type Output = Vector;

    fn mul(self, rhs: Vector) -> Vector {
        self.apply(rhs)
    }
}

/// A 3-element double-precision offset vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector(DVec3);

impl Vector {
    /// All-zero vector.
    pub const ZERO: Self = Self(DVec3::ZERO);

    /// Creates a vector from its three components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self(DVec3::new(x, y, z))
    }

    /// Creates a vector with all components equal to `v`.
    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    /// Components as an array.
    pub fn to_array(&self) -> [f64; DIM] {
        self.0.to_array()
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

/// Element-wise sum.
impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector(self.0 + rhs.0)
    }
}

/// Element-wise difference.
impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector(self.0 - rhs.0)
    }
}
