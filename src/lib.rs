//! decimal_qpur — arithmétique décimale exacte, à échelle contrôlée.
//!
//! Aucun flottant binaire : chaque résultat passe par le moteur décimal
//! (`noyau::moteur`) puis par la normalisation (zéros de queue retirés).
//!
//! ```
//! use decimal_qpur::{add, chain, evaluate, Liaisons, Reglages, ECHELLE_DEFAUT};
//!
//! assert_eq!(add("0.1", "0.2", ECHELLE_DEFAUT)?, "0.3");
//! assert_eq!(chain("0.1", 10).add("0.2").add("0.3").done()?, "0.6");
//!
//! let x = Liaisons::new().avec("x", 2);
//! assert_eq!(evaluate("x ^ (1 + 2) % 5", &x, Reglages::default())?, "3");
//! # Ok::<(), decimal_qpur::Erreur>(())
//! ```

use std::cmp::Ordering;

pub mod chaine;
pub mod noyau;

pub use chaine::{Chain, OptionsFin};
pub use noyau::derive::{BIG_INT_MAX, SAFE_BIG_INT_MAX};
pub use noyau::format::LARGEUR_LIGNE;
pub use noyau::reglages::{ECHELLE_DEFAUT, ECHELLE_PI_FORMATE};
pub use noyau::{
    Decimal, Erreur, Formule, GenerateurPi, Liaisons, MethodePuissance, Nombre, Reglages, Result,
};

use noyau::{derive, eval, format, moteur, pi as spigot};

fn texte(d: Decimal) -> String {
    d.normaliser().to_string()
}

fn decimaux<I>(nombres: I) -> Result<Vec<Decimal>>
where
    I: IntoIterator,
    I::Item: Nombre,
{
    nombres.into_iter().map(Nombre::en_decimal).collect()
}

/* ------------------------ moteur ------------------------ */

/// Compare `a` et `b` tronqués à `echelle`.
pub fn compare(a: impl Nombre, b: impl Nombre, echelle: u32) -> Result<Ordering> {
    Ok(moteur::compare(&a.en_decimal()?, &b.en_decimal()?, echelle))
}

pub fn add(a: impl Nombre, b: impl Nombre, echelle: u32) -> Result<String> {
    Ok(texte(moteur::add(&a.en_decimal()?, &b.en_decimal()?, echelle)))
}

pub fn sub(a: impl Nombre, b: impl Nombre, echelle: u32) -> Result<String> {
    Ok(texte(moteur::sub(&a.en_decimal()?, &b.en_decimal()?, echelle)))
}

pub fn mul(a: impl Nombre, b: impl Nombre, echelle: u32) -> Result<String> {
    Ok(texte(moteur::mul(&a.en_decimal()?, &b.en_decimal()?, echelle)))
}

/// Quotient tronqué vers zéro à `echelle`. Diviseur nul => `Erreur::DivisionParZero`.
pub fn div(a: impl Nombre, b: impl Nombre, echelle: u32) -> Result<String> {
    Ok(texte(moteur::div(&a.en_decimal()?, &b.en_decimal()?, echelle)?))
}

/* ------------------------ dérivés ------------------------ */

/// Arrondi demi loin de zéro ; `precision` négative : dizaines, centaines…
pub fn round(nombre: impl Nombre, precision: i64) -> Result<String> {
    Ok(texte(derive::round(&nombre.en_decimal()?, precision)?))
}

pub fn floor(nombre: impl Nombre, precision: i64) -> Result<String> {
    Ok(texte(derive::floor(&nombre.en_decimal()?, precision)?))
}

pub fn ceil(nombre: impl Nombre, precision: i64) -> Result<String> {
    Ok(texte(derive::ceil(&nombre.en_decimal()?, precision)?))
}

/// Puissance entière itérative (exposant non entier => `Erreur::NonSupportee`).
pub fn pow(base: impl Nombre, exposant: impl Nombre, echelle: u32) -> Result<String> {
    Ok(texte(derive::pow(&base.en_decimal()?, &exposant.en_decimal()?, echelle)?))
}

/// Variante O(log n) ; peut différer de `pow` sur le dernier chiffre.
pub fn pow_by_squaring(base: impl Nombre, exposant: impl Nombre, echelle: u32) -> Result<String> {
    Ok(texte(derive::pow_par_carres(
        &base.en_decimal()?,
        &exposant.en_decimal()?,
        echelle,
    )?))
}

/// Newton borné par la grandeur du nombre (voir `noyau::derive::sqrt`).
pub fn sqrt(nombre: impl Nombre, echelle: u32) -> Result<String> {
    Ok(texte(derive::sqrt(&nombre.en_decimal()?, echelle)?))
}

/// Newton jusqu’à stabilisation à `echelle`.
pub fn sqrt_converged(nombre: impl Nombre, echelle: u32) -> Result<String> {
    Ok(texte(derive::sqrt_convergee(&nombre.en_decimal()?, echelle)?))
}

pub fn abs(nombre: impl Nombre) -> Result<String> {
    Ok(texte(derive::abs(&nombre.en_decimal()?)))
}

pub fn max<I>(nombres: I, echelle: u32) -> Result<String>
where
    I: IntoIterator,
    I::Item: Nombre,
{
    Ok(texte(derive::max(&decimaux(nombres)?, echelle)?))
}

pub fn min<I>(nombres: I, echelle: u32) -> Result<String>
where
    I: IntoIterator,
    I::Item: Nombre,
{
    Ok(texte(derive::min(&decimaux(nombres)?, echelle)?))
}

pub fn is_big_int(nombre: impl Nombre) -> Result<bool> {
    derive::is_big_int(&nombre.en_decimal()?)
}

pub fn is_safe_big_int(nombre: impl Nombre) -> Result<bool> {
    derive::is_safe_big_int(&nombre.en_decimal()?)
}

/* ------------------------ π ------------------------ */

/// π avec `echelle` décimales (normalisé).
pub fn pi(echelle: u32) -> String {
    spigot::pi(echelle)
}

/// π en lignes de `LARGEUR_LIGNE` caractères (`ECHELLE_PI_FORMATE` par défaut côté CLI).
pub fn pi_formatted(echelle: u32) -> String {
    spigot::pi_formate(echelle)
}

/* ------------------------ formules ------------------------ */

pub fn evaluate(source: &str, liaisons: &Liaisons, reglages: Reglages) -> Result<String> {
    eval::eval_expression(source, liaisons, reglages)
}

/// Analyse une fois ; la fermeture rendue peut être appelée avec d’autres liaisons.
pub fn compile(
    source: &str,
    reglages: Reglages,
) -> Result<impl Fn(&Liaisons) -> Result<String> + Clone + Send + Sync> {
    eval::compile_expression(source, reglages)
}

/* ------------------------ divers ------------------------ */

pub fn chain(nombre: impl Nombre, echelle: u32) -> Chain {
    Chain::new(nombre, Reglages::default().avec_echelle(echelle))
}

/// "1.2300" -> "1.23" ; "5.000" -> "5" ; "100" -> "100".
pub fn trim_trailing_zeroes(texte: &str) -> String {
    format::trim_trailing_zeroes(texte)
}
