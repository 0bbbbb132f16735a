//! Polynomial type for NewHope.
//!
//! A [`Poly`] is an element of R_q = Z_q\[X\]/(X^1024 + 1) tagged with the
//! domain it lives in. Coefficient-domain and NTT-domain elements are
//! different types, so feeding one where the other is expected does not
//! compile.
//!
//! Coefficients are kept loosely reduced (below 2^16, usually below 2q)
//! and are only frozen to `[0, q)` at encoding and comparison points.
//! Every polynomial is zeroized when dropped.

use core::marker::PhantomData;

use crate::ntt::{inv_ntt, ntt};
use crate::params::common::{N, Q};
use crate::reduce::{barrett_reduce, freeze, montgomery_reduce, LAZY_OFFSET, MONT_R2};
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

mod sealed {
    pub trait Sealed {}
}

/// Representation domain of a [`Poly`].
pub trait Domain: sealed::Sealed {}

/// Coefficient domain.
#[derive(Debug, Clone, Copy)]
pub struct Normal;

/// NTT (evaluation) domain.
#[derive(Debug, Clone, Copy)]
pub struct Ntt;

impl sealed::Sealed for Normal {}
impl sealed::Sealed for Ntt {}
impl Domain for Normal {}
impl Domain for Ntt {}

/// A polynomial in R_q, in domain `D`.
pub struct Poly<D: Domain> {
    pub(crate) coeffs: [u16; N],
    _domain: PhantomData<D>,
}

impl<D: Domain> Poly<D> {
    /// The zero polynomial.
    pub fn zero() -> Self {
        Self::from_coeffs([0u16; N])
    }

    /// Wrap a coefficient array.
    ///
    /// Coefficients need not be reduced.
    pub fn from_coeffs(coeffs: [u16; N]) -> Self {
        Self {
            coeffs,
            _domain: PhantomData,
        }
    }

    /// Raw, possibly unreduced coefficients.
    pub fn coeffs(&self) -> &[u16; N] {
        &self.coeffs
    }

    /// Canonical coefficient at `i`, in `[0, q)`.
    pub fn frozen(&self, i: usize) -> u16 {
        freeze(self.coeffs[i])
    }

    /// Zero all coefficients.
    pub fn reset(&mut self) {
        self.coeffs.zeroize();
    }

    /// Coefficientwise `a + b`, Barrett-reduced.
    pub fn add(&self, other: &Self) -> Self {
        let mut r = Self::zero();
        for i in 0..N {
            r.coeffs[i] = barrett_reduce(self.coeffs[i].wrapping_add(other.coeffs[i]));
        }
        r
    }

    /// Coefficientwise `a - b`, computed as `a + 3q - b` then Barrett-reduced.
    ///
    /// Requires `b < 3q`.
    pub fn sub(&self, other: &Self) -> Self {
        let mut r = Self::zero();
        for i in 0..N {
            let t = self.coeffs[i]
                .wrapping_add(LAZY_OFFSET)
                .wrapping_sub(other.coeffs[i]);
            r.coeffs[i] = barrett_reduce(t);
        }
        r
    }

    /// Move the coefficients into a polynomial of another domain, leaving
    /// zeros behind in `self`.
    fn take_as<E: Domain>(&mut self) -> Poly<E> {
        let mut out = Poly::<E>::zero();
        core::mem::swap(&mut self.coeffs, &mut out.coeffs);
        out
    }
}

impl Poly<Normal> {
    /// Forward transform.
    pub fn into_ntt(mut self) -> Poly<Ntt> {
        let mut out = self.take_as::<Ntt>();
        ntt(&mut out.coeffs);
        out
    }
}

impl Poly<Ntt> {
    /// Inverse transform.
    pub fn into_normal(mut self) -> Poly<Normal> {
        let mut out = self.take_as::<Normal>();
        inv_ntt(&mut out.coeffs);
        out
    }

    /// Pointwise product in the NTT domain.
    ///
    /// Computes `mont(a * mont(R^2 * b))`, which equals `a * b mod q`
    /// without leaving Montgomery residue in the result.
    pub fn pointwise(&self, other: &Self) -> Self {
        let mut r = Self::zero();
        for i in 0..N {
            let t = montgomery_reduce(MONT_R2 * other.coeffs[i] as u32);
            r.coeffs[i] = montgomery_reduce((self.coeffs[i] as u32).wrapping_mul(t as u32));
        }
        r
    }
}

impl<D: Domain> Clone for Poly<D> {
    fn clone(&self) -> Self {
        Self::from_coeffs(self.coeffs)
    }
}

impl<D: Domain> Default for Poly<D> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<D: Domain> Zeroize for Poly<D> {
    fn zeroize(&mut self) {
        self.coeffs.zeroize();
    }
}

impl<D: Domain> Drop for Poly<D> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<D: Domain> ZeroizeOnDrop for Poly<D> {}

/// Equality of canonical representatives, in constant time.
impl<D: Domain> ConstantTimeEq for Poly<D> {
    fn ct_eq(&self, other: &Self) -> Choice {
        let mut eq = Choice::from(1u8);
        for i in 0..N {
            eq &= freeze(self.coeffs[i]).ct_eq(&freeze(other.coeffs[i]));
        }
        eq
    }
}

/// `|freeze(x) - q/2|`, branchless.
#[inline]
pub(crate) fn distance_to_half_q(x: u16) -> u32 {
    let t = freeze(x) as i32 - (Q / 2) as i32;
    let mask = t >> 31;
    ((t ^ mask) - mask) as u32
}
