use ndarray::{Array1, ArrayView1, LinalgScalar};
use num_traits::Float;

/// Compute the arithmetic mean of a one-dimensional series
///
/// Returns `None` for an empty series, where the mean is undefined.
///
/// # Examples
///
/// ```
/// use viscometry::math::mean;
/// use ndarray::arr1;
///
/// let x = arr1(&[1., 2., 6.]);
/// assert_eq!(mean(x.view()), Some(3.));
/// assert_eq!(mean(arr1(&[] as &[f64]).view()), None);
/// ```
pub fn mean<T: Float>(x: ArrayView1<T>) -> Option<T> {
    if x.is_empty() {
        return None;
    }
    let n: T = num_traits::cast(x.len())?;
    Some(x.fold(T::zero(), |acc, &xi| acc + xi) / n)
}

/// Centre a series on its mean
///
/// Returns the mean alongside the deviations $x_i - \bar{x}$. Working with centred data keeps the
/// sums of squares well conditioned when the series carries a large offset, as the reciprocal
/// pressure of a decay run does.
///
/// # Examples
///
/// ```
/// use viscometry::math::centred;
/// use ndarray::arr1;
///
/// let (mean, deviations) = centred(arr1(&[1., 2., 3.]).view()).unwrap();
/// assert_eq!(mean, 2.);
/// assert_eq!(deviations, arr1(&[-1., 0., 1.]));
/// ```
pub fn centred<T: Float>(x: ArrayView1<T>) -> Option<(T, Array1<T>)> {
    let mean = mean(x)?;
    Some((mean, x.mapv(|xi| xi - mean)))
}

/// Sum of the elementwise products of two equal-length series, $\sum_i u_i v_i$
///
/// Applied to centred series this is $n$ times their covariance, and applied to a centred series
/// and itself it is the sum of squared deviations.
pub fn sum_of_products<T: LinalgScalar>(u: &Array1<T>, v: &Array1<T>) -> T {
    u.dot(v)
}
