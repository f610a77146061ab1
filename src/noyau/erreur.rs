// src/noyau/erreur.rs
//
// Erreurs du noyau : une seule énumération, remontée telle quelle à l’appelant.
// Aucune erreur n’est “rattrapée” en interne (pas de valeur par défaut inventée).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Erreur {
    /// Chaîne numérique mal formée (ex: "1.2.3", "abc", "").
    #[error("nombre invalide: {0:?}")]
    Lecture(String),

    /// Formule mal formée (parenthèses, opérande manquant, caractère inconnu…).
    #[error("erreur de syntaxe: {0}")]
    Syntaxe(String),

    #[error("division par zéro")]
    DivisionParZero,

    /// Variable absente des liaisons au moment de l’évaluation.
    #[error("variable non liée: {0}")]
    VariableInconnue(String),

    /// Hors domaine (exposant non entier, racine d’un négatif, liste vide…).
    #[error("opération non supportée: {0}")]
    NonSupportee(String),
}

pub type Result<T> = std::result::Result<T, Erreur>;
