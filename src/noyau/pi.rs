// src/noyau/pi.rs
//
// π par robinet (spigot, Rabinowitz–Wagon) : suite paresseuse, infinie, non redémarrable.
// Indépendant du moteur décimal : entiers non bornés seulement.
//
// État (q, r, t, i) = (1, 180, 60, 2) au départ ; chaque pas produit un chiffre.

use num_bigint::BigInt;
use num_traits::{One, ToPrimitive};

use super::format::{envelopper, trim_trailing_zeroes, LARGEUR_LIGNE};

#[derive(Clone, Debug)]
pub struct GenerateurPi {
    q: BigInt,
    r: BigInt,
    t: BigInt,
    i: BigInt,
}

impl Default for GenerateurPi {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerateurPi {
    /// Nouveau générateur : le premier chiffre produit est 3.
    pub fn new() -> Self {
        Self {
            q: BigInt::one(),
            r: BigInt::from(180),
            t: BigInt::from(60),
            i: BigInt::from(2),
        }
    }

    /// Produit le chiffre suivant et avance l’état.
    pub fn chiffre_suivant(&mut self) -> u8 {
        let i = &self.i;

        // y = ((27i - 12)q + 5r) / (5t)
        let y: BigInt = ((i * 27u32 - 12u32) * &self.q + &self.r * 5u32) / (&self.t * 5u32);

        // u = 3(3i + 1)(3i + 2)
        let trois_i: BigInt = i * 3u32;
        let u: BigInt = (&trois_i + 1u32) * 3u32 * (&trois_i + 2u32);

        // r utilise l’ancien q : calculé avant la mise à jour de q
        let r = &u * 10u32 * (&self.q * (i * 5u32 - 2u32) + &self.r - &self.t * &y);
        let q = &self.q * 10u32 * i * (i * 2u32 - 1u32);

        self.r = r;
        self.q = q;
        self.t *= &u;
        self.i += 1u32;

        // y ∈ [0, 9] par construction de l’algorithme
        y.to_u8().unwrap_or_default()
    }
}

impl Iterator for GenerateurPi {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        Some(self.chiffre_suivant())
    }
}

/// π avec `echelle` décimales (tronqué, puis normalisé).
/// pi(0) = "3" ; pi(10) = "3.1415926535".
pub fn pi(echelle: u32) -> String {
    let mut generateur = GenerateurPi::new();
    let mut texte = String::with_capacity(echelle as usize + 2);

    texte.push(char::from(b'0' + generateur.chiffre_suivant()));
    if echelle > 0 {
        texte.push('.');
        for chiffre in generateur.take(echelle as usize) {
            texte.push(char::from(b'0' + chiffre));
        }
    }
    trim_trailing_zeroes(&texte)
}

/// Même texte que `pi`, en lignes de 50 caractères.
pub fn pi_formate(echelle: u32) -> String {
    envelopper(&pi(echelle), LARGEUR_LIGNE)
}
