//! Bridges between `ndarray` storage and `nalgebra` decompositions.

use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2, Axis};

fn to_nalgebra(matrix: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(matrix.nrows(), matrix.ncols(), |i, j| matrix[[i, j]])
}

/// Eigenpairs of a symmetric matrix, eigenvalues descending.
///
/// Each eigenvector is signed so its largest-magnitude entry is positive,
/// which keeps projections stable across runs.
pub fn symmetric_eigen(matrix: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = matrix.nrows();
    let eig = SymmetricEigen::new(to_nalgebra(matrix));

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eig.eigenvalues[b].total_cmp(&eig.eigenvalues[a]));

    let values = Array1::from_iter(order.iter().map(|&i| eig.eigenvalues[i]));
    let mut vectors = Array2::zeros((n, n));
    for (col, &src) in order.iter().enumerate() {
        let v = eig.eigenvectors.column(src);
        let pivot = v.iter().copied().fold(0.0f64, |acc, x| if x.abs() > acc.abs() { x } else { acc });
        let sign = if pivot < 0.0 { -1.0 } else { 1.0 };
        for row in 0..n {
            vectors[[row, col]] = sign * v[row];
        }
    }
    (values, vectors)
}

/// Singular values of `matrix`, descending.
///
/// Computed from the Gram matrix of the shorter side, which is k x k for a
/// topic-term matrix however large the vocabulary.
pub fn singular_values(matrix: &Array2<f64>) -> Array1<f64> {
    let gram = if matrix.nrows() <= matrix.ncols() {
        matrix.dot(&matrix.t())
    } else {
        matrix.t().dot(matrix)
    };
    let (values, _) = symmetric_eigen(&gram);
    values.mapv(|v| v.max(0.0).sqrt())
}

/// Principal component scores, observations in rows.
///
/// Columns are centred but not scaled. Returns the first `components`
/// scores per row and the variance each component explains.
pub fn pca(data: &Array2<f64>, components: usize) -> (Array2<f64>, Array1<f64>) {
    let (n, p) = data.dim();
    let components = components.min(p);
    if n == 0 {
        return (Array2::zeros((0, components)), Array1::zeros(components));
    }

    let mean = data.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(p));
    let centered = data - &mean;
    let denom = if n > 1 { (n - 1) as f64 } else { 1.0 };
    let covariance = centered.t().dot(&centered) / denom;

    let (values, vectors) = symmetric_eigen(&covariance);
    let basis = vectors.slice(ndarray::s![.., ..components]).to_owned();
    let scores = centered.dot(&basis);
    let explained = values.slice(ndarray::s![..components]).mapv(|v| v.max(0.0));
    (scores, explained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn eigenvalues_sorted_descending() {
        let m = array![[2.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 1.0]];
        let (values, vectors) = symmetric_eigen(&m);
        assert!((values[0] - 5.0).abs() < 1e-10);
        assert!((values[2] - 1.0).abs() < 1e-10);
        assert!((vectors[[1, 0]] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn singular_values_of_wide_matrix() {
        let m = array![[3.0, 0.0, 0.0, 0.0], [0.0, 4.0, 0.0, 0.0]];
        let sv = singular_values(&m);
        assert_eq!(sv.len(), 2);
        assert!((sv[0] - 4.0).abs() < 1e-10);
        assert!((sv[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn pca_finds_dominant_axis() {
        let data = array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let (scores, explained) = pca(&data, 2);
        assert_eq!(scores.dim(), (4, 2));
        assert!(explained[0] > 1.0);
        assert!(explained[1].abs() < 1e-10);
        for row in scores.rows() {
            assert!(row[1].abs() < 1e-10);
        }
        assert!(scores[[3, 0]] > scores[[0, 0]]);
        let total: f64 = scores.column(0).sum();
        assert!(total.abs() < 1e-10);
    }

    #[test]
    fn pca_is_deterministic() {
        let data = array![[0.7, 0.2, 0.1], [0.1, 0.8, 0.1], [0.2, 0.2, 0.6], [0.5, 0.4, 0.1]];
        let (a, _) = pca(&data, 2);
        let (b, _) = pca(&data, 2);
        assert_eq!(a, b);
    }
}
