//! Small numeric helpers shared by the curve code
use crate::{EPSILON, Scalar};

/// Solve quadratic equation `a * t ^ 2 + b * t + c = 0` for `t`
pub(crate) fn quadratic_solve(a: Scalar, b: Scalar, c: Scalar) -> impl Iterator<Item = Scalar> {
    let mut roots = [None; 2];
    if a.abs() < EPSILON {
        if b.abs() > EPSILON {
            roots[0] = Some(-c / b);
        }
        return roots.into_iter().flatten();
    }
    let disc = b * b - 4.0 * a * c;
    if disc.abs() < EPSILON {
        roots[0] = Some(-b / (2.0 * a));
    } else if disc > 0.0 {
        let sq = disc.sqrt();
        // branch on the sign of b to avoid catastrophic cancellation
        // https://people.csail.mit.edu/bkph/articles/Quadratics.pdf
        if b >= 0.0 {
            let mul = -b - sq;
            roots[0] = Some(mul / (2.0 * a));
            roots[1] = Some(2.0 * c / mul);
        } else {
            let mul = -b + sq;
            roots[0] = Some(2.0 * c / mul);
            roots[1] = Some(mul / (2.0 * a));
        }
    }
    roots.into_iter().flatten()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[macro_export]
    macro_rules! assert_approx_eq {
        ( $v0:expr, $v1: expr ) => {{
            assert!(($v0 - $v1).abs() < $crate::EPSILON, "{} != {}", $v0, $v1);
        }};
        ( $v0:expr, $v1: expr, $e: expr ) => {{
            assert!(($v0 - $v1).abs() < $e, "{} != {}", $v0, $v1);
        }};
    }

    #[test]
    fn test_quadratic_solve() {
        fn solve_check(a: Scalar, b: Scalar, c: Scalar, roots: &[Scalar]) {
            const PREC: Scalar = 0.00001;
            let mut index = 0;
            for root in quadratic_solve(a, b, c) {
                let value = a * root * root + b * root + c;
                if value.abs() > PREC {
                    panic!("f(x = {}) = {} != 0", root, value);
                }
                match roots.get(index) {
                    Some(root_ref) => assert_approx_eq!(root, *root_ref, PREC),
                    None => panic!("result is longer than expected: {:?}", roots),
                }
                index += 1;
            }
            if index != roots.len() {
                panic!("result is shorter than expected: {:?}", roots)
            }
        }

        solve_check(1.0, -5.0, 6.0, &[2.0, 3.0]);
        solve_check(1.0, -6.0, 9.0, &[3.0]);
        solve_check(1.0, 3.0, 5.0, &[]);
        solve_check(0.0, 5.0, 10.0, &[-2.0]);
    }
}
