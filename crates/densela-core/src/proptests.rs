//! Property-based tests for the factorizations and solvers.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::linalg::{self, HouseholderScratch};
    use crate::matrix::{Matrix, NoRender};
    use crate::pool::ScratchPool;
    use crate::precision::{identity_deviation, pairwise_deviation};

    const TOL: f64 = 1e-9;

    // Strictly diagonally dominant, hence invertible and well conditioned
    fn dominant_matrix() -> impl Strategy<Value = Matrix> {
        (1usize..=6).prop_flat_map(|n| {
            proptest::collection::vec(-1.0f64..1.0, n * n).prop_map(move |mut data| {
                for i in 0..n {
                    data[i * n + i] += if data[i * n + i] >= 0.0 { n as f64 } else { -(n as f64) };
                }
                Matrix::from_vec(n, n, data).unwrap()
            })
        })
    }

    // Tall matrix with a dominant leading square block
    fn tall_matrix() -> impl Strategy<Value = Matrix> {
        (1usize..=4, 0usize..=3).prop_flat_map(|(m, extra)| {
            let n = m + extra;
            proptest::collection::vec(-1.0f64..1.0, n * m).prop_map(move |mut data| {
                for i in 0..m {
                    data[i * m + i] += if data[i * m + i] >= 0.0 { m as f64 } else { -(m as f64) };
                }
                Matrix::from_vec(n, m, data).unwrap()
            })
        })
    }

    fn column(n: usize) -> impl Strategy<Value = Matrix> {
        proptest::collection::vec(-10.0f64..10.0, n).prop_map(move |v| Matrix::from_vec(n, 1, v).unwrap())
    }

    proptest! {
        // QR

        #[test]
        fn householder_reconstructs(a in tall_matrix()) {
            let (n, m) = a.shape();
            let mut q = Matrix::zeros(n, n);
            let mut r = Matrix::zeros(n, m);
            linalg::householder_qr(&a, &mut q, &mut r).unwrap();
            let qtq = q.transposed().matmul(&q).unwrap();
            prop_assert!(identity_deviation(&qtq).within(TOL));
            prop_assert!(pairwise_deviation(&a, &q.matmul(&r).unwrap()).unwrap().within(TOL));
        }

        #[test]
        fn gram_schmidt_reconstructs(a in dominant_matrix()) {
            let n = a.rows();
            let mut q = Matrix::zeros(n, n);
            let mut r = Matrix::zeros(n, n);
            linalg::gram_schmidt_qr(&a, &mut q, &mut r).unwrap();
            let qtq = q.transposed().matmul(&q).unwrap();
            prop_assert!(identity_deviation(&qtq).within(TOL));
            prop_assert!(pairwise_deviation(&a, &q.matmul(&r).unwrap()).unwrap().within(TOL));
        }

        #[test]
        fn householder_scratch_is_balanced(a in dominant_matrix()) {
            let n = a.rows();
            let scratch = HouseholderScratch::new(n).unwrap();
            let mut q = Matrix::zeros(n, n);
            let mut r = Matrix::zeros(n, n);
            linalg::householder_qr_with(&a, &mut q, &mut r, &scratch, &mut NoRender).unwrap();
            linalg::householder_qr_with(&a, &mut q, &mut r, &scratch, &mut NoRender).unwrap();
            prop_assert!(pairwise_deviation(&a, &q.matmul(&r).unwrap()).unwrap().within(TOL));
        }

        // LU family

        #[test]
        fn plu_reconstructs(a in dominant_matrix()) {
            let n = a.rows();
            let (mut p, mut l, mut u) = (Matrix::zeros(n, n), Matrix::zeros(n, n), Matrix::zeros(n, n));
            linalg::plu(&a, &mut p, &mut l, &mut u).unwrap();
            let pa = p.matmul(&a).unwrap();
            prop_assert!(pairwise_deviation(&pa, &l.matmul(&u).unwrap()).unwrap().within(TOL));
        }

        #[test]
        fn lu_reconstructs_dominant(a in dominant_matrix()) {
            let n = a.rows();
            let (mut l, mut u) = (Matrix::zeros(n, n), Matrix::zeros(n, n));
            linalg::lu(&a, &mut l, &mut u).unwrap();
            prop_assert!(pairwise_deviation(&a, &l.matmul(&u).unwrap()).unwrap().within(TOL));
        }

        #[test]
        fn gauss_jordan_inverts(a in dominant_matrix()) {
            let n = a.rows();
            let (mut ra, mut rb) = (Matrix::zeros(n, n), Matrix::zeros(n, n));
            linalg::gauss_jordan(&a, &Matrix::identity(n), &mut ra, &mut rb).unwrap();
            prop_assert!(identity_deviation(&a.matmul(&rb).unwrap()).within(TOL));
        }

        // Solvers

        #[test]
        fn solve_matches_product((a, x) in dominant_matrix().prop_flat_map(|a| {
            let n = a.rows();
            (Just(a), column(n))
        })) {
            let b = a.matmul(&x).unwrap();
            let solved = linalg::solve(&a, &b).unwrap();
            prop_assert!(pairwise_deviation(&x, &solved).unwrap().within(TOL));
        }

        #[test]
        fn least_squares_recovers_exact_fit((a, x) in tall_matrix().prop_flat_map(|a| {
            let m = a.cols();
            (Just(a), column(m))
        })) {
            let b = a.matmul(&x).unwrap();
            let mut fitted = Matrix::zeros(a.cols(), 1);
            linalg::least_squares(&a, &b, &mut fitted).unwrap();
            prop_assert!(pairwise_deviation(&x, &fitted).unwrap().within(TOL));
        }

        // Scratch pool

        #[test]
        fn pool_lifo_round_trip(depth in 1usize..8) {
            let pool = ScratchPool::new(2, 3, depth).unwrap();
            let taken: Vec<Matrix> = (0..depth).map(|_| pool.acquire().unwrap()).collect();
            let ptrs: Vec<*const f64> = taken.iter().map(|m| m.as_slice().as_ptr()).collect();
            prop_assert!(pool.acquire().is_err());
            for m in taken.into_iter().rev() {
                pool.release(m).unwrap();
            }
            for &ptr in &ptrs {
                let m = pool.acquire().unwrap();
                prop_assert_eq!(m.shape(), (2, 3));
                prop_assert_eq!(m.as_slice().as_ptr(), ptr);
            }
        }
    }
}
