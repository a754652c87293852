use super::Point2;

/// An axis-aligned bounding box in the flattening plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    /// Minimum corner of the bounding box.
    pub min: Point2,
    /// Maximum corner of the bounding box.
    pub max: Point2,
}

impl Aabb2 {
    /// Computes the componentwise min/max over `points`.
    ///
    /// Returns `None` when `points` is empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point2>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(
            Self {
                min: first,
                max: first,
            },
            |acc, p| Self {
                min: Point2::new(acc.min.x.min(p.x), acc.min.y.min(p.y)),
                max: Point2::new(acc.max.x.max(p.x), acc.max.y.max(p.y)),
            },
        ))
    }

    /// Returns the box as `[xmin, ymin, xmax, ymax]`.
    #[must_use]
    pub fn to_array(&self) -> [f64; 4] {
        [self.min.x, self.min.y, self.max.x, self.max.y]
    }

    /// Width along X.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height along Y.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Whether `p` lies inside the box, expanded by `tol` on every side.
    #[must_use]
    pub fn contains(&self, p: &Point2, tol: f64) -> bool {
        p.x >= self.min.x - tol
            && p.x <= self.max.x + tol
            && p.y >= self.min.y - tol
            && p.y <= self.max.y + tol
    }
}

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Cumulative point-to-point distance along a polyline.
///
/// The first entry is always `0.0`; the last is the total length.
#[must_use]
pub fn cumulative_lengths(points: &[Point2]) -> Vec<f64> {
    if points.is_empty() {
        return Vec::new();
    }
    let mut lengths = Vec::with_capacity(points.len());
    let mut total = 0.0;
    lengths.push(total);
    for pair in points.windows(2) {
        total += (pair[1] - pair[0]).norm();
        lengths.push(total);
    }
    lengths
}

/// Angle of the principal (major) axis of a point cloud, in `[-pi/2, pi/2]`.
///
/// Uses the centered second moments `Sxx`, `Syy`, `Sxy`:
/// `theta = atan2(2 Sxy, Sxx - Syy) / 2`. Returns `None` for an empty cloud.
pub fn principal_axis_angle<'a, I>(points: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a Point2> + Clone,
{
    let mut n = 0usize;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for p in points.clone() {
        n += 1;
        sum_x += p.x;
        sum_y += p.y;
    }
    if n == 0 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = n as f64;
    let (mean_x, mean_y) = (sum_x / count, sum_y / count);

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for p in points {
        let dx = p.x - mean_x;
        let dy = p.y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    Some(0.5 * (2.0 * sxy).atan2(sxx - syy))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn signed_area_ccw_square() {
        let pts = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        assert_relative_eq!(signed_area_2d(&pts), 1.0);
    }

    #[test]
    fn signed_area_cw_square() {
        let pts = [p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)];
        assert_relative_eq!(signed_area_2d(&pts), -1.0);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area_2d(&[p(0.0, 0.0)]).abs() < 1e-15);
        assert!(signed_area_2d(&[]).abs() < 1e-15);
    }

    #[test]
    fn aabb_encloses_points() {
        let pts = [p(1.0, -2.0), p(-3.0, 4.0), p(0.5, 0.5)];
        let bb = Aabb2::from_points(&pts).unwrap();
        assert_eq!(bb.to_array(), [-3.0, -2.0, 1.0, 4.0]);
        assert!(pts.iter().all(|q| bb.contains(q, 0.0)));
        assert_relative_eq!(bb.width(), 4.0);
        assert_relative_eq!(bb.height(), 6.0);
    }

    #[test]
    fn aabb_of_nothing_is_none() {
        assert!(Aabb2::from_points(&[]).is_none());
    }

    #[test]
    fn cumulative_lengths_of_3_4_5() {
        let l = cumulative_lengths(&[p(0.0, 0.0), p(3.0, 4.0), p(3.0, 5.0)]);
        assert_eq!(l, vec![0.0, 5.0, 6.0]);
        assert!(cumulative_lengths(&[]).is_empty());
    }

    #[test]
    fn principal_axis_of_horizontal_cloud_is_zero() {
        let pts = [p(-2.0, 0.1), p(0.0, -0.1), p(2.0, 0.1), p(0.0, 0.1)];
        assert_relative_eq!(principal_axis_angle(&pts).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn principal_axis_of_vertical_cloud_is_half_pi() {
        let pts = [p(0.0, 0.0), p(0.0, 1.0), p(0.0, 2.0), p(0.1, 1.0)];
        let theta = principal_axis_angle(&pts).unwrap();
        assert_relative_eq!(theta.abs(), FRAC_PI_2, epsilon = 1e-2);
    }

    #[test]
    fn principal_axis_of_diagonal_cloud() {
        let pts = [p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)];
        assert_relative_eq!(principal_axis_angle(&pts).unwrap(), FRAC_PI_4, epsilon = 1e-12);
    }
}
