// src/noyau/moteur.rs
//
// Moteur décimal : opérations primitives à échelle imposée.
//
// Règles (toutes pures, sans état partagé):
// - add/sub/mul/div : résultat EXACT puis tronqué vers zéro à `echelle` chiffres,
//   et complété par des zéros jusqu’à exactement `echelle` chiffres (forme brute).
// - compare : les deux opérandes sont tronqués à `echelle` AVANT comparaison.
// - round_at_scale : seul arrondi du moteur (demi loin de zéro).

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use super::decimal::{pow10, Decimal};
use super::erreur::{Erreur, Result};

pub fn add(a: &Decimal, b: &Decimal, echelle: u32) -> Decimal {
    let e = a.echelle().max(b.echelle());
    Decimal::new(a.aligner(e) + b.aligner(e), e).tronquer(echelle)
}

pub fn sub(a: &Decimal, b: &Decimal, echelle: u32) -> Decimal {
    let e = a.echelle().max(b.echelle());
    Decimal::new(a.aligner(e) - b.aligner(e), e).tronquer(echelle)
}

pub fn mul(a: &Decimal, b: &Decimal, echelle: u32) -> Decimal {
    // l’échelle du produit exact est la somme des échelles
    Decimal::new(a.mantisse() * b.mantisse(), a.echelle() + b.echelle()).tronquer(echelle)
}

/// a / b tronqué à `echelle` chiffres. `DivisionParZero` si b vaut exactement 0.
pub fn div(a: &Decimal, b: &Decimal, echelle: u32) -> Result<Decimal> {
    if b.is_zero() {
        return Err(Erreur::DivisionParZero);
    }

    // rationnel exact, puis r -> trunc(r * 10^echelle)
    let q = a.to_rational() / b.to_rational();
    Ok(Decimal::new(rational_scaled(&q, echelle), echelle))
}

/// r -> entier “scalé” = trunc(r * 10^echelle) (dénominateur toujours > 0).
fn rational_scaled(r: &BigRational, echelle: u32) -> BigInt {
    (r.numer() * pow10(echelle)) / r.denom()
}

pub fn compare(a: &Decimal, b: &Decimal, echelle: u32) -> Ordering {
    a.aligner(echelle).cmp(&b.aligner(echelle))
}

/// Arrondi demi loin de zéro à `precision` chiffres (forme brute : exactement `precision` chiffres).
pub fn round_at_scale(a: &Decimal, precision: u32) -> Decimal {
    if a.echelle() <= precision {
        return a.tronquer(precision);
    }

    let d = pow10(a.echelle() - precision);
    let (mut q, r) = a.mantisse().div_rem(&d);

    // r porte le signe de la mantisse ; |r| >= d/2 => on s’éloigne de zéro
    if (r.abs() * 2u32) >= d {
        if a.is_negative() {
            q -= 1u32;
        } else {
            q += 1u32;
        }
    }
    Decimal::new(q, precision)
}

/// Vrai si `a` est nul une fois tronqué à `echelle`.
pub fn est_nul_a(a: &Decimal, echelle: u32) -> bool {
    a.aligner(echelle).is_zero()
}
