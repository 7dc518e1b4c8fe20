use ndarray::{ArrayView1, LinalgScalar};
use num_traits::Float;

use crate::math::{centred, sum_of_products};
use crate::{Error, Result};

/// Result of an ordinary least squares fit of a straight line $y = m x + b$
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegressionResult<E> {
    /// Gradient $m$ of the fitted line
    pub slope: E,
    /// Ordinate $b$ at $x = 0$
    pub intercept: E,
    /// Pearson correlation coefficient between $x$ and $y$
    pub r: E,
    /// Coefficient of determination, the square of `r`
    pub r_squared: E,
    /// Standard error of the slope estimate
    pub stderr: E,
    /// Standard error of the intercept estimate
    pub intercept_stderr: E,
    /// Number of paired samples in the fit
    pub num_samples: usize,
}

impl<E: Float> RegressionResult<E> {
    /// Evaluate the fitted line at `x`
    pub fn predict(&self, x: E) -> E {
        self.slope.mul_add(x, self.intercept)
    }
}

/// Fit a straight line to paired samples by ordinary least squares
///
/// The slope and intercept minimise the sum of squared vertical residuals
///
/// $$
///     m = \frac{S_{xy}}{S_{xx}}, \qquad b = \bar{y} - m \bar{x}
/// $$
///
/// where $S_{xx} = \sum_i (x_i - \bar{x})^2$ and $S_{xy} = \sum_i (x_i - \bar{x})(y_i - \bar{y})$.
/// The coefficient of determination is the squared Pearson correlation
/// $r = S_{xy} / \sqrt{S_{xx} S_{yy}}$. When every $y_i$ is identical the fit is the flat line
/// through them, with zero slope, zero $r$ and zero standard errors.
///
/// The slope standard error is $\sqrt{(1 - r^2) S_{yy} / S_{xx} / (n - 2)}$, zero for a two point
/// fit which is always exact.
///
/// # Errors
/// - [`Error::InputShape`] if `x` and `y` differ in length
/// - [`Error::DegenerateInput`] if fewer than two samples are given, or all `x` are identical
///
/// # Examples
///
/// ```
/// use viscometry::regression::linear_regression;
/// use ndarray::arr1;
///
/// let x = arr1(&[0., 1., 2., 3.]);
/// let y = arr1(&[1., 3., 5., 7.]);
/// let fit = linear_regression(x.view(), y.view()).unwrap();
///
/// approx::assert_relative_eq!(fit.slope, 2.);
/// approx::assert_relative_eq!(fit.intercept, 1.);
/// ```
pub fn linear_regression<E: Float + LinalgScalar>(
    x: ArrayView1<E>,
    y: ArrayView1<E>,
) -> Result<RegressionResult<E>> {
    if x.len() != y.len() {
        return Err(Error::InputShape(format!(
            "cannot pair {} abscissae with {} ordinates",
            x.len(),
            y.len()
        )));
    }
    let num_samples = x.len();
    if num_samples < 2 {
        return Err(Error::DegenerateInput(format!(
            "a line needs at least two samples, got {num_samples}"
        )));
    }

    // Compared exactly, as the mean of a constant column need not round back to its value
    let x_first = x[0];
    if x.iter().all(|&xi| xi == x_first) {
        return Err(Error::DegenerateInput(
            "abscissae have zero variance so the slope is undefined".into(),
        ));
    }
    let y_first = y[0];
    if y.iter().all(|&yi| yi == y_first) {
        return Ok(RegressionResult {
            slope: E::zero(),
            intercept: y_first,
            r: E::zero(),
            r_squared: E::zero(),
            stderr: E::zero(),
            intercept_stderr: E::zero(),
            num_samples,
        });
    }

    let unrepresentable =
        || Error::InputShape(format!("{num_samples} samples overflow the float type"));
    let n: E = num_traits::cast(num_samples).ok_or_else(unrepresentable)?;
    let degrees_of_freedom: E = num_traits::cast(num_samples - 2).ok_or_else(unrepresentable)?;

    let (x_mean, dx) = centred(x).ok_or_else(unrepresentable)?;
    let (y_mean, dy) = centred(y).ok_or_else(unrepresentable)?;

    let ss_xx = sum_of_products(&dx, &dx);
    let ss_yy = sum_of_products(&dy, &dy);
    let ss_xy = sum_of_products(&dx, &dy);

    if !(ss_xx.is_finite() && ss_xx > E::zero()) {
        return Err(Error::DegenerateInput(
            "abscissae have zero variance so the slope is undefined".into(),
        ));
    }

    let slope = ss_xy / ss_xx;
    let intercept = y_mean - slope * x_mean;

    let r = if ss_yy > E::zero() {
        (ss_xy / (ss_xx * ss_yy).sqrt()).max(-E::one()).min(E::one())
    } else {
        E::zero()
    };
    let r_squared = r * r;

    let stderr = if num_samples == 2 {
        E::zero()
    } else {
        ((E::one() - r_squared) * ss_yy / ss_xx / degrees_of_freedom).sqrt()
    };
    let intercept_stderr = stderr * (ss_xx / n + x_mean * x_mean).sqrt();

    Ok(RegressionResult {
        slope,
        intercept,
        r,
        r_squared,
        stderr,
        intercept_stderr,
        num_samples,
    })
}
