// src/noyau/reglages.rs
//
// Réglages possédés par l’appelant (aucun état global, aucun cache par échelle).
// Passés par valeur aux constructeurs (Evaluateur, Chain).

/// Échelle par défaut des opérations arithmétiques.
pub const ECHELLE_DEFAUT: u32 = 10;

/// Échelle par défaut de `pi_formatted`.
pub const ECHELLE_PI_FORMATE: u32 = 1000;

/// Algorithme de puissance utilisé par l’évaluateur et la Chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MethodePuissance {
    /// O(|exposant|) : une multiplication (ou division) tronquée par unité d’exposant.
    #[default]
    Iterative,
    /// Opt-in : exponentiation par carrés, chiffres de garde sur chaque produit.
    /// Peut différer de `Iterative` sur les derniers chiffres.
    ParCarres,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reglages {
    pub echelle: u32,
    pub puissance: MethodePuissance,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            echelle: ECHELLE_DEFAUT,
            puissance: MethodePuissance::default(),
        }
    }
}

impl Reglages {
    pub fn avec_echelle(mut self, echelle: u32) -> Self {
        self.echelle = echelle;
        self
    }

    pub fn avec_puissance(mut self, puissance: MethodePuissance) -> Self {
        self.puissance = puissance;
        self
    }
}
