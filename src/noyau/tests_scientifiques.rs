//! Tests scientifiques (campagne) : propriétés publiques + stress contrôlé.
//!
//! But : fixer les résultats attendus de l’API publique et trouver les limites
//! sans faire chauffer la machine.
//! - budget temps global par test de stress
//! - tailles bornées (exposants, longueur des sommes, imbrication)
//!
//! Notes (aligné avec l’état actuel du noyau) :
//! - add/sub/mul/div tronquent vers zéro ; seule la sortie publique est normalisée.
//! - compare tronque AVANT de comparer : à l’échelle 1, 3.61 et 3.62 sont égaux.
//! - pow est itératif (O(|exposant|)) : on borne les exposants du stress.

use std::cmp::Ordering;
use std::time::{Duration, Instant};

use crate::{
    add, ceil, chain, compare, div, evaluate, floor, is_big_int, is_safe_big_int, max, min, mul,
    pi, pow, round, sqrt, sub, trim_trailing_zeroes, Erreur, Liaisons, Reglages,
};

fn eval_ok(expr: &str, liaisons: &Liaisons) -> String {
    evaluate(expr, liaisons, Reglages::default())
        .unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn eval0(expr: &str) -> String {
    eval_ok(expr, &Liaisons::new())
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Moteur : exactitude décimale ------------------------ */

#[test]
fn sci_pas_de_derive_binaire() {
    assert_eq!(add("0.1", "0.2", 10).unwrap(), "0.3");
    assert_eq!(sub("0.3", "0.1", 10).unwrap(), "0.2");
    assert_eq!(mul("1.1", "1.1", 10).unwrap(), "1.21");
    assert_eq!(div("1", "8", 10).unwrap(), "0.125");

    // 10 × 0.1 = 1 exactement
    let mut c = chain(0, 10);
    for _ in 0..10 {
        c = c.add("0.1");
    }
    assert_eq!(c.done().unwrap(), "1");
}

#[test]
fn sci_troncature_vers_zero() {
    assert_eq!(div("2", "3", 4).unwrap(), "0.6666");
    assert_eq!(div("-2", "3", 4).unwrap(), "-0.6666");
    assert_eq!(mul("-1.99", "1", 1).unwrap(), "-1.9");
    assert_eq!(add("0.99", "0", 0).unwrap(), "0");
}

#[test]
fn sci_compare_a_l_echelle() {
    assert_eq!(compare("3.61", "3.62", 1).unwrap(), Ordering::Equal);
    assert_eq!(compare("3.61", "3.62", 2).unwrap(), Ordering::Less);
    assert_eq!(compare("-1", "1", 0).unwrap(), Ordering::Less);
    assert_eq!(compare("2.50", "2.5", 10).unwrap(), Ordering::Equal);
}

#[test]
fn sci_lecture_stricte() {
    for mauvais in ["", " 1", "1e5", ".", "1.2.3", "abc", "--1", "1,5"] {
        assert!(
            matches!(add(mauvais, 1, 10), Err(Erreur::Lecture(_))),
            "{mauvais:?} devrait être refusé"
        );
    }
    for bon in ["1", "+1.5", "-.5", "7."] {
        assert!(add(bon, 0, 10).is_ok(), "{bon:?} devrait être accepté");
    }
}

/* ------------------------ Dérivés ------------------------ */

#[test]
fn sci_max_min_tronquent_a_l_echelle() {
    // 3.62 ne bat pas strictement 3.61 à l’échelle 1 ; le gagnant est tronqué
    assert_eq!(max(["1", "2", "3.61", "3.62"], 1).unwrap(), "3.6");
    assert_eq!(min(["1.55", "1.57", "2"], 1).unwrap(), "1.5");
    assert!(matches!(max(Vec::<&str>::new(), 1), Err(Erreur::NonSupportee(_))));
}

#[test]
fn sci_arrondis_precision_signee() {
    assert_eq!(round("2.5", 0).unwrap(), "3");
    assert_eq!(round("-2.5", 0).unwrap(), "-3");
    assert_eq!(round("1.005", 2).unwrap(), "1.01");
    assert_eq!(round("1250", -2).unwrap(), "1300");
    assert_eq!(floor("-0.5", 0).unwrap(), "-1");
    assert_eq!(ceil("0.01", 1).unwrap(), "0.1");
    assert_eq!(floor("1999", -3).unwrap(), "1000");
}

#[test]
fn sci_bornes_entieres() {
    assert!(is_big_int("9223372036854775807").unwrap());
    assert!(!is_big_int("9223372036854775808").unwrap());
    assert!(is_big_int("-9223372036854775807").unwrap());
    assert!(is_safe_big_int("9007199254740991").unwrap());
    assert!(!is_safe_big_int("9007199254740992").unwrap());
}

#[test]
fn sci_pow_et_sqrt() {
    assert_eq!(pow("1.5", 0, 10).unwrap(), "1");
    assert_eq!(pow("1.5", 2, 10).unwrap(), "2.25");
    assert_eq!(pow(10, -3, 10).unwrap(), "0.001");
    assert!(matches!(pow(2, "1.5", 10), Err(Erreur::NonSupportee(_))));
    assert_eq!(sqrt(9, 10).unwrap(), "3");
}

#[test]
fn sci_normalisation_idempotente() {
    for s in ["1.2300", "5.000", "100", "0.0", "-3.10", "42."] {
        let une = trim_trailing_zeroes(s);
        assert_eq!(trim_trailing_zeroes(&une), une, "s={s:?}");
    }
    assert_eq!(trim_trailing_zeroes("100"), "100");
    assert_eq!(trim_trailing_zeroes("5.000"), "5");
}

/* ------------------------ Formules ------------------------ */

#[test]
fn sci_formules_de_reference() {
    let x = Liaisons::new().avec("x", 2).avec("y", 3);
    assert_eq!(eval_ok("x ^ (y + 5)", &x), "256");
    assert_eq!(eval0("2 + 3 * 4"), "14");
    assert_eq!(eval0("(2 + 3) * 4"), "20");
    assert_eq!(pi(10), "3.1415926535");
    assert_eq!(chain("0.1", 10).add("0.2").add("0.3").done().unwrap(), "0.6");

    let r = evaluate("1 / 0", &Liaisons::new(), Reglages::default());
    assert_eq!(r, Err(Erreur::DivisionParZero));
    let r = evaluate("x + 1", &Liaisons::new(), Reglages::default());
    assert_eq!(r, Err(Erreur::VariableInconnue("x".into())));
}

#[test]
fn sci_modulo_signe_du_diviseur() {
    // a % b = a - b·floor(a/b) : le reste a le signe de b
    for (a, b, attendu) in [("7", "3", "1"), ("-7", "3", "2"), ("7", "-3", "-2"), ("-7", "-3", "-1")] {
        let expr = format!("({a}) % ({b})");
        assert_eq!(eval0(&expr), attendu, "expr={expr:?}");
    }
}

#[test]
fn sci_moins_unaire_et_puissance() {
    assert_eq!(eval0("-2 ^ 2"), "-4");
    assert_eq!(eval0("(-2) ^ 2"), "4");
    assert_eq!(eval0("2 ^ -1"), "0.5");
    assert_eq!(eval0("2 ^ 3 ^ 2"), "512");
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_pow_grand_exposant() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let r = pow(2, 2000, 10).unwrap();
    budget(t0, max);

    // 2^2000 a 603 chiffres
    assert_eq!(r.len(), 603);
    assert!(r.starts_with("114813069527425452423283320117768198402"));
}

#[test]
fn sci_stress_somme_longue() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    // chaîne gauche de 3000 termes : évaluation itérative, pas de débordement de pile
    let expr = vec!["0.001"; 3000].join(" + ");
    budget(t0, max);
    assert_eq!(eval0(&expr), "3");
    budget(t0, max);
}

#[test]
fn sci_stress_imbrication_limite() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // 200 parenthèses : sous la limite
    let expr = format!("{}2{}", "(".repeat(200), ")".repeat(200));
    assert_eq!(eval0(&expr), "2");
    budget(t0, max);

    // 1000 parenthèses : refusé proprement
    let trop = format!("{}2{}", "(".repeat(1000), ")".repeat(1000));
    let r = evaluate(&trop, &Liaisons::new(), Reglages::default());
    assert!(matches!(r, Err(Erreur::Syntaxe(_))));
    budget(t0, max);
}

#[test]
fn sci_stress_grand_nombre() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // grand numérateur contrôlé (100 chiffres)
    let big = "9".repeat(100);
    let expr = format!("{big} / 7 + 1 / 7");
    let r = eval0(&expr);
    budget(t0, max);

    // (10^100 - 1)/7 + 1/7 = 10^100/7, tronqué à 10 décimales (somme de deux troncatures)
    assert!(r.starts_with("142857142857"), "r={r}");
    assert!(!r.contains('e'));
}

#[test]
fn sci_stress_pi_mille_decimales() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let p = pi(1000);
    budget(t0, max);

    assert!(p.len() <= 1002);
    assert!(p.starts_with(&pi(100)));
    // point de Feynman : décimales 762..767 = 999999
    assert_eq!(&p[763..769], "999999");
}
