//! Noyau décimal Q-pur
//!
//! Organisation interne :
//! - decimal.rs  : type `Decimal` (mantisse entière + échelle), lecture, serde
//! - moteur.rs   : add / sub / mul / div / compare / arrondi à l’échelle
//! - format.rs   : normalisation (zéros de queue) + découpage en lignes
//! - derive.rs   : floor / ceil / round, pow, sqrt, abs, max / min, bornes entières
//! - pi.rs       : générateur de chiffres de π (goutte à goutte)
//! - jetons.rs   : tokenisation
//! - syntaxe.rs  : montée de précédence + construction Expr
//! - eval.rs     : évaluation itérative + formules compilées
//! - reglages.rs : échelle + méthode de puissance

pub mod decimal;
pub mod derive;
pub mod erreur;
pub mod eval;
pub mod expr;
pub mod format;
pub mod jetons;
pub mod moteur;
pub mod pi;
pub mod reglages;
pub mod syntaxe;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

#[cfg(test)]
mod tests_proprietes;

pub use decimal::{Decimal, Nombre};
pub use erreur::{Erreur, Result};
pub use eval::{compile_expression, eval_expression, Formule, Liaisons};
pub use pi::GenerateurPi;
pub use reglages::{MethodePuissance, Reglages};
