//! Tests de propriétés (`proptest`) sur le moteur et les dérivés.
//!
//! 1. **Aller-retour add/sub** — sub(add(a, b, s), b, s) == a tronqué à s.
//! 2. **Antisymétrie** — compare(a, b, s) == inverse de compare(b, a, s).
//! 3. **Normalisation idempotente** — trim(trim(x)) == trim(x).
//! 4. **Encadrement** — floor(x, p) <= x <= ceil(x, p), égalités sur la grille.
//! 5. **Puissances triviales** — pow(x, 0) == 1, pow(x, 1) == x.

use std::cmp::Ordering;

use num_bigint::BigInt;
use proptest::prelude::*;

use super::decimal::Decimal;
use super::derive::{ceil, floor, pow};
use super::format::trim_trailing_zeroes;
use super::moteur::{add, compare, sub};

// ---------------------------------------------------------------------------
// Stratégies
// ---------------------------------------------------------------------------

fn decimal_strategy() -> impl Strategy<Value = Decimal> {
    (any::<i64>(), 0u32..18).prop_map(|(m, e)| Decimal::new(BigInt::from(m), e))
}

fn positif_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..i64::MAX, 0u32..18).prop_map(|(m, e)| Decimal::new(BigInt::from(m), e))
}

fn d(s: &str) -> Decimal {
    let Ok(v) = s.parse() else {
        panic!("décimal valide: {s:?}");
    };
    v
}

// ---------------------------------------------------------------------------
// Moteur
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_aller_retour_add_sub(
        a in positif_strategy(),
        b in positif_strategy(),
        s in 0u32..14,
    ) {
        // b sur la grille de s, et pas de changement de signe : la troncature
        // de a + b est alors celle de a, décalée de b
        let b = b.tronquer(s);
        let somme = add(&a, &b, s);
        let retour = sub(&somme, &b, s);
        prop_assert_eq!(
            compare(&retour, &a.tronquer(s), s),
            Ordering::Equal,
            "a={} b={} s={} retour={}", a, b, s, retour
        );
    }

    #[test]
    fn prop_compare_antisymetrique(
        a in decimal_strategy(),
        b in decimal_strategy(),
        s in 0u32..20,
    ) {
        prop_assert_eq!(compare(&a, &b, s), compare(&b, &a, s).reverse());
        prop_assert_eq!(compare(&a, &a, s), Ordering::Equal);
    }

    #[test]
    fn prop_trim_idempotent(x in "-?[0-9]{1,8}(\\.[0-9]{0,8})?0{0,4}") {
        let une = trim_trailing_zeroes(&x);
        prop_assert_eq!(trim_trailing_zeroes(&une), une.clone());
        // même valeur
        prop_assert_eq!(d(&une), d(&x));
    }
}

// ---------------------------------------------------------------------------
// Dérivés
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_floor_ceil_encadrent(x in decimal_strategy(), p in -6i64..12) {
        let Ok(f) = floor(&x, p) else {
            return Err(TestCaseError::fail("floor"));
        };
        let Ok(c) = ceil(&x, p) else {
            return Err(TestCaseError::fail("ceil"));
        };
        prop_assert!(f <= x, "floor({}, {}) = {} > x", x, p, f);
        prop_assert!(x <= c, "ceil({}, {}) = {} < x", x, p, c);
    }

    #[test]
    fn prop_floor_ceil_exacts_sur_la_grille(k in any::<i32>(), p in -6i64..12) {
        // x = k · 10^-p
        let Ok(x) = Decimal::from(k).decaler(-p) else {
            return Err(TestCaseError::fail("decaler"));
        };
        prop_assert_eq!(floor(&x, p), Ok(x.clone()));
        prop_assert_eq!(ceil(&x, p), Ok(x));
    }

    #[test]
    fn prop_pow_triviales(m in -1_000_000i64..1_000_000, e in 0u32..8, extra in 0u32..6) {
        let x = Decimal::new(BigInt::from(m), e);
        let s = e + extra;
        prop_assert_eq!(pow(&x, &Decimal::zero(), s), Ok(Decimal::un()));
        prop_assert_eq!(pow(&x, &Decimal::un(), s), Ok(x.normaliser()));
    }
}
