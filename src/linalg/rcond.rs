use nalgebra::{allocator::Allocator, DefaultAllocator, Dim, MatrixMN, RealField};

use crate::error::FilterError;

/**
 * Numerical comparison of reciprocal condition numbers
 *  Used to validate covariance matrices handed to the estimators
 */

/* Estimate the reciprocal condition number of a symmetric matrix from its diagonal.
 *
 * The Condition Number is defined from a matrix norm.
 *  Choose max diagonal element as the norm of the original matrix.
 *  Assume this norm for inverse matrix is min diagonal element.
 *  Therefore rcond = min/max
 *
 * Note:
 *  Defined to be 0 for semi-definite and 0 for an empty matrix
 *  Defined to be <0 for negative matrix (diagonal element < 0)
 *  Defined to be <0 with any NaN element
 *  By definition rcond <= 1 as min<=max
 */
pub fn rcond_symmetric<N: RealField, R: Dim, C: Dim>(sm: &MatrixMN<N, R, C>) -> N
where
    DefaultAllocator: Allocator<N, R, C>,
{
    // Special case an empty matrix
    let n = sm.nrows().min(sm.ncols());
    if n == 0 {
        N::zero()
    } else {
        let mut mind = sm[(0, 0)];
        let mut maxd = mind;

        for i in 0..n {
            let d = sm[(i, i)];
            if d != d {
                // NaN
                mind = N::one().neg();
                break;
            }
            if d < mind {
                mind = d;
            }
            if d > maxd {
                maxd = d;
            }
        }

        rcond_min_max(mind, maxd)
    }
}

fn rcond_min_max<N: RealField>(mind: N, maxd: N) -> N {
    if mind < N::zero() {
        // matrix is negative
        mind // mind < 0 but does not represent a rcond
    } else {
        debug_assert!(mind <= maxd);

        let rcond = mind / maxd;
        if rcond != rcond {
            // NaN, singular due to (mind == maxd) == (zero or infinity)
            N::zero()
        } else {
            rcond
        }
    }
}

/// Checks a the reciprocal condition number is >= 0 .
///
/// IEC 559 NaN values are never true
pub fn check_non_negative<N: RealField>(rcond: N, message: &'static str) -> Result<N, FilterError> {
    if rcond >= N::zero() {
        Ok(rcond)
    } else {
        Err(FilterError::NotPositiveSemiDefinite(message))
    }
}
