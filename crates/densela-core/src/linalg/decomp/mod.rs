//! Matrix decompositions.
//!
//! | Decomposition         | Function             | Factorization | Output shapes (`A` is `n x m`) |
//! |-----------------------|----------------------|---------------|--------------------------------|
//! | Gram-Schmidt QR       | [`gram_schmidt_qr`]  | `A = QR`      | `Q: n x m`, `R: m x m`         |
//! | Householder QR        | [`householder_qr`]   | `A = QR`      | `Q: n x n`, `R: n x m`         |
//! | LU                    | [`lu`]               | `A = LU`      | `L, U: n x n`                  |
//! | LU, partial pivoting  | [`plu`]              | `PA = LU`     | `P, L, U: n x n`               |

pub mod lu;
pub mod qr;

pub use lu::{lu, lu_with, plu, plu_with};
pub use qr::{
    HouseholderScratch, gram_schmidt_qr, gram_schmidt_qr_with, householder_qr,
    householder_qr_with,
};
