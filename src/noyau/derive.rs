// src/noyau/derive.rs
//
// Algorithmes dérivés, exprimés UNIQUEMENT via le moteur décimal :
// floor / ceil / round (précision signée), pow, sqrt, abs, max / min, bornes entières.
//
// Les résultats publics sont normalisés (pas de zéros de queue).

use std::cmp::Ordering;

use num_integer::Integer;
use tracing::trace;

use super::decimal::{pow10, Decimal};
use super::erreur::{Erreur, Result};
use super::moteur::{add, compare, div, est_nul_a, mul, round_at_scale, sub};
use super::reglages::{MethodePuissance, ECHELLE_DEFAUT};

/// Plus grand entier signé 64 bits.
pub const BIG_INT_MAX: &str = "9223372036854775807";

/// Plus grand entier représentable sans perte par un flottant double (2^53 - 1).
pub const SAFE_BIG_INT_MAX: &str = "9007199254740991";

/// Chiffres de garde des divisions intermédiaires de `pow`.
const GARDE_PUISSANCE: u32 = 5;

/* ------------------------ floor / ceil / round ------------------------ */

/// Plancher (vers −∞) sur la grille 10^-precision.
/// precision < 0 : grille plus grossière que l’unité (dizaines, centaines…).
pub fn floor(x: &Decimal, precision: i64) -> Result<Decimal> {
    let decale = x.decaler(precision)?;
    let entier = decale.mantisse().div_floor(&pow10(decale.echelle()));
    Ok(Decimal::from(entier).decaler(-precision)?.normaliser())
}

/// Plafond (vers +∞) : floor, puis + une unité de la grille s’il reste quelque chose.
pub fn ceil(x: &Decimal, precision: i64) -> Result<Decimal> {
    let f = floor(x, precision)?;
    if *x > f {
        let unite = Decimal::un().decaler(-precision)?;
        let e = f.echelle().max(unite.echelle());
        Ok(add(&f, &unite, e).normaliser())
    } else {
        Ok(x.normaliser())
    }
}

/// Arrondi demi loin de zéro.
/// precision < 0 : passe par floor, puis arrondi sur la grille 10^|precision|.
pub fn round(x: &Decimal, precision: i64) -> Result<Decimal> {
    if precision >= 0 {
        let p = u32::try_from(precision)
            .map_err(|_| Erreur::NonSupportee(format!("précision hors bornes: {precision}")))?;
        return Ok(round_at_scale(x, p).normaliser());
    }

    let k = precision
        .checked_neg()
        .ok_or_else(|| Erreur::NonSupportee(format!("précision hors bornes: {precision}")))?;
    let quotient = floor(x, 0)?.decaler(precision)?;
    Ok(round_at_scale(&quotient, 0).decaler(k)?.normaliser())
}

/* ------------------------ puissance ------------------------ */

fn verifier_exposant_entier(exposant: &Decimal) -> Result<()> {
    if exposant.est_entier() {
        Ok(())
    } else {
        Err(Erreur::NonSupportee(format!(
            "exposant non entier: {}",
            exposant.normaliser()
        )))
    }
}

/// Puissance entière ITÉRATIVE (une opération par unité d’exposant).
///
/// - exposant nul à `echelle` => 1
/// - exposant > 0 : multiplications tronquées à `echelle`
/// - exposant < 0 : divisions tronquées à `echelle + 5` (chiffres de garde)
/// - arrondi final demi loin de zéro à `echelle`
///
/// Exposant non entier => `NonSupportee`.
pub fn pow(base: &Decimal, exposant: &Decimal, echelle: u32) -> Result<Decimal> {
    if est_nul_a(exposant, echelle) {
        return Ok(Decimal::un());
    }
    verifier_exposant_entier(exposant)?;

    let un = Decimal::un();
    let garde = echelle.saturating_add(GARDE_PUISSANCE);
    let mut puissance = exposant.clone();
    // on part de base^1 : la boucle négative “traverse” base^0 avant d’atteindre base^exposant
    let mut resultat = base.clone();
    let mut iterations: u64 = 0;

    if exposant.is_negative() {
        while compare(&puissance, &un, echelle) == Ordering::Less {
            puissance = add(&puissance, &un, echelle);
            resultat = div(&resultat, base, garde)?;
            iterations += 1;
        }
    } else {
        while compare(&puissance, &un, echelle) == Ordering::Greater {
            puissance = sub(&puissance, &un, garde);
            resultat = mul(&resultat, base, echelle);
            iterations += 1;
        }
    }

    trace!(iterations, echelle, "puissance itérative");
    Ok(round_at_scale(&resultat, echelle).normaliser())
}

/// Opt-in : exponentiation par carrés, O(log |exposant|).
/// Tous les produits intermédiaires gardent `echelle + 5` chiffres ; arrondi final à `echelle`.
/// Les derniers chiffres peuvent différer de `pow`.
pub fn pow_par_carres(base: &Decimal, exposant: &Decimal, echelle: u32) -> Result<Decimal> {
    if est_nul_a(exposant, echelle) {
        return Ok(Decimal::un());
    }
    verifier_exposant_entier(exposant)?;

    let garde = echelle.saturating_add(GARDE_PUISSANCE);
    let n = exposant.aligner(0);
    let bits = n.magnitude();

    let mut acc = Decimal::un();
    let mut carre = base.clone();
    for i in 0..bits.bits() {
        if bits.bit(i) {
            acc = mul(&acc, &carre, garde);
        }
        if i + 1 < bits.bits() {
            carre = mul(&carre, &carre, garde);
        }
    }

    if exposant.is_negative() {
        acc = div(&Decimal::un(), &acc, garde)?;
    }
    Ok(round_at_scale(&acc, echelle).normaliser())
}

/// Dispatch selon la méthode configurée.
pub fn pow_avec(
    base: &Decimal,
    exposant: &Decimal,
    echelle: u32,
    methode: MethodePuissance,
) -> Result<Decimal> {
    match methode {
        MethodePuissance::Iterative => pow(base, exposant, echelle),
        MethodePuissance::ParCarres => pow_par_carres(base, exposant, echelle),
    }
}

/* ------------------------ racine carrée ------------------------ */

fn pas_newton(x: &Decimal, g: &Decimal, echelle: u32) -> Result<Decimal> {
    let somme = add(&div(x, g, echelle)?, g, echelle);
    div(&somme, &Decimal::from(2), echelle)
}

fn verifier_racine(x: &Decimal) -> Result<()> {
    if x.is_negative() {
        Err(Erreur::NonSupportee(format!(
            "racine carrée d’un nombre négatif: {}",
            x.normaliser()
        )))
    } else {
        Ok(())
    }
}

/// Newton–Raphson depuis 1 ; nombre d’itérations borné par la GRANDEUR de `x`
/// (compteur 0, 1, 2… tant que compteur < x), pas par un test de convergence.
pub fn sqrt(x: &Decimal, echelle: u32) -> Result<Decimal> {
    verifier_racine(x)?;
    if x.is_zero() {
        return Ok(Decimal::zero());
    }

    let un = Decimal::un();
    let mut g = Decimal::un();
    let mut compteur = Decimal::zero();
    let mut iterations: u64 = 0;

    while compare(&compteur, x, echelle) == Ordering::Less {
        if g.is_zero() {
            break;
        }
        g = pas_newton(x, &g, echelle)?;
        compteur = add(&compteur, &un, 0);
        iterations += 1;
    }

    trace!(iterations, echelle, "racine bornée");
    Ok(g.normaliser())
}

/// Opt-in : Newton depuis 1 jusqu’à stabilisation de l’itéré à `echelle`
/// (point fixe, ou cycle de longueur 2 dû à la troncature).
pub fn sqrt_convergee(x: &Decimal, echelle: u32) -> Result<Decimal> {
    verifier_racine(x)?;
    if x.is_zero() {
        return Ok(Decimal::zero());
    }

    let mut g = Decimal::un();
    let mut precedent: Option<Decimal> = None;
    let mut iterations: u64 = 0;

    loop {
        let suivant = pas_newton(x, &g, echelle)?;
        iterations += 1;
        // racine plus petite que 10^-echelle : l’itéré tronqué s’annule
        if suivant.is_zero() {
            trace!(iterations, echelle, "racine sous l’échelle");
            return Ok(Decimal::zero());
        }
        if suivant == g || precedent.as_ref() == Some(&suivant) {
            trace!(iterations, echelle, "racine convergée");
            return Ok(suivant.normaliser());
        }
        precedent = Some(g);
        g = suivant;
    }
}

/* ------------------------ abs / max / min ------------------------ */

pub fn abs(x: &Decimal) -> Decimal {
    x.abs().normaliser()
}

/// Garde le premier, remplacé seulement si `compare(gagnant, n)` vaut `remplacer_si`.
fn extremum(nombres: &[Decimal], echelle: u32, remplacer_si: Ordering) -> Result<Decimal> {
    let (premier, reste) = nombres
        .split_first()
        .ok_or_else(|| Erreur::NonSupportee("extremum d’une liste vide".into()))?;

    let mut gagnant = premier;
    for n in reste {
        if compare(gagnant, n, echelle) == remplacer_si {
            gagnant = n;
        }
    }
    Ok(gagnant.tronquer(echelle).normaliser())
}

/// Plus grand élément (comparaisons à `echelle`), tronqué à `echelle`.
pub fn max(nombres: &[Decimal], echelle: u32) -> Result<Decimal> {
    extremum(nombres, echelle, Ordering::Less)
}

/// Plus petit élément (comparaisons à `echelle`), tronqué à `echelle`.
pub fn min(nombres: &[Decimal], echelle: u32) -> Result<Decimal> {
    extremum(nombres, echelle, Ordering::Greater)
}

/* ------------------------ bornes entières ------------------------ */

fn sous_borne(x: &Decimal, borne: &str) -> Result<bool> {
    let borne: Decimal = borne.parse()?;
    Ok(compare(&x.abs(), &borne, ECHELLE_DEFAUT) != Ordering::Greater)
}

/// |x| <= 9223372036854775807
pub fn is_big_int(x: &Decimal) -> Result<bool> {
    sous_borne(x, BIG_INT_MAX)
}

/// |x| <= 9007199254740991
pub fn is_safe_big_int(x: &Decimal) -> Result<bool> {
    sous_borne(x, SAFE_BIG_INT_MAX)
}
