//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée, exposants bornés (pow est itératif)
//! - budget temps global
//! - on accepte certaines erreurs attendues (division par zéro, exposant non entier, etc.)
//! - invariant clé : l’affichage entièrement parenthésé se relit en le même arbre

use std::time::{Duration, Instant};

use super::decimal::Decimal;
use super::erreur::Erreur;
use super::eval::{eval_expression, Liaisons};
use super::reglages::{MethodePuissance, Reglages};
use super::syntaxe::analyser;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers fuzz ------------------------ */

fn is_erreur_attendue(e: &Erreur) -> bool {
    // Liste blanche : erreurs *normales* pour des formules bien formées
    matches!(
        e,
        Erreur::DivisionParZero | Erreur::NonSupportee(_) | Erreur::VariableInconnue(_)
    )
}

fn d(s: &str) -> Decimal {
    s.parse().unwrap_or_else(|e| panic!("{s:?}: {e}"))
}

fn liaisons() -> Liaisons {
    Liaisons::new().avec("x", 2).avec("y", d("-1.5")).avec("taux", d("0.05"))
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    // inclut 0 (division / modulo par zéro) et des décimaux
    match rng.pick(7) {
        0 => "0".to_string(),
        1 => format!("{}", rng.pick(10)),
        2 => format!("{}", rng.pick(1000)),
        3 => format!("{}.{}", rng.pick(100), rng.pick(100)),
        4 => format!(".{}", rng.pick(10)),
        5 => "0.1".to_string(),
        _ => format!("{}.", rng.pick(50)),
    }
}

fn gen_atome(rng: &mut Rng) -> String {
    match rng.pick(8) {
        0 => "x".to_string(),
        1 => "y".to_string(),
        2 => "taux".to_string(),
        // non liée : VariableInconnue
        3 if rng.pick(4) == 0 => "z".to_string(),
        _ => gen_nombre(rng),
    }
}

fn gen_exposant(rng: &mut Rng) -> String {
    // petits entiers, parfois négatifs, parfois non entiers (NonSupportee)
    match rng.pick(6) {
        0 => "0".to_string(),
        1 => format!("-{}", 1 + rng.pick(3)),
        2 => "0.5".to_string(),
        _ => format!("{}", 1 + rng.pick(4)),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atome(rng);
    }

    let op = match rng.pick(8) {
        0 => return gen_atome(rng),
        1 => "+",
        2 => "-",
        3 => "*",
        4 => "/",
        5 => "%",
        6 => {
            let base = gen_expr(rng, depth - 1);
            return format!("({base})^({})", gen_exposant(rng));
        }
        _ => return format!("-({})", gen_expr(rng, depth - 1)),
    };

    let a = gen_expr(rng, depth - 1);
    let b = gen_expr(rng, depth - 1);
    if rng.coin() {
        format!("({a}{op}{b})")
    } else {
        format!("{a} {op} {b}")
    }
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_erreurs_attendues() {
    let t0 = Instant::now();
    let max = Duration::from_secs(3);

    let lancer = |seed: u64| {
        let mut rng = Rng::new(seed);
        let l = liaisons();
        let mut sorties = Vec::new();
        for _ in 0..150 {
            budget(t0, max);
            let expr = gen_expr(&mut rng, 4);
            sorties.push((expr.clone(), eval_expression(&expr, &l, Reglages::default())));
        }
        sorties
    };

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let premier = lancer(0xC0FFEE_u64);
    let second = lancer(0xC0FFEE_u64);
    assert_eq!(premier, second);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;
    for (expr, r) in &premier {
        match r {
            Ok(v) => {
                assert!(!v.is_empty(), "sortie vide: expr={expr:?}");
                // sortie normalisée : pas de zéro de queue après la virgule
                assert!(!(v.contains('.') && v.ends_with('0')), "expr={expr:?} v={v}");
                assert!(!v.ends_with('.'), "expr={expr:?} v={v}");
                seen_ok += 1;
            }
            Err(e) => {
                assert!(is_erreur_attendue(e), "erreur non attendue: expr={expr:?} err={e}");
                seen_err += 1;
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 10, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_affichage_relu_identique() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let mut rng = Rng::new(0xBADC0DE_u64);
    for _ in 0..200 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 5);
        let arbre = analyser(&expr).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"));
        let relu = analyser(&arbre.to_string())
            .unwrap_or_else(|e| panic!("relecture de {arbre}: {e}"));
        assert_eq!(arbre, relu, "expr={expr:?}");
    }
}

#[test]
fn fuzz_safe_puissance_methodes_coherentes() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // Sur des entiers, les deux méthodes de puissance donnent le même résultat exact
    let mut rng = Rng::new(0x5EED_u64);
    let rapide = Reglages::default().avec_puissance(MethodePuissance::ParCarres);
    for _ in 0..60 {
        budget(t0, max);

        let expr = format!("{} ^ {}", rng.pick(40), rng.pick(30));
        let a = eval_expression(&expr, &Liaisons::new(), Reglages::default());
        let b = eval_expression(&expr, &Liaisons::new(), rapide);
        assert_eq!(a, b, "expr={expr:?}");
    }
}

#[test]
fn fuzz_safe_soupe_de_caracteres() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // Texte arbitraire (sans '^' : pas d’exposant géant) : jamais de panique,
    // seulement un résultat ou une erreur de lecture / syntaxe / domaine.
    const ALPHABET: &[u8] = b"0123456789.+-*/%() xz#";
    let mut rng = Rng::new(0xFEED_u64);
    let l = liaisons();
    for _ in 0..500 {
        budget(t0, max);

        let n = 1 + rng.pick(10) as usize;
        let s: String = (0..n)
            .map(|_| char::from(ALPHABET[rng.pick(ALPHABET.len() as u32) as usize]))
            .collect();

        if let Err(e) = eval_expression(&s, &l, Reglages::default()) {
            assert!(
                is_erreur_attendue(&e) || matches!(e, Erreur::Syntaxe(_) | Erreur::Lecture(_)),
                "s={s:?} err={e}"
            );
        }
    }
}
