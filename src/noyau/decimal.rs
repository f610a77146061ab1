// src/noyau/decimal.rs
//
// Décimal exact : mantisse entière (BigInt) + échelle (nombre de chiffres après la virgule).
// valeur = mantisse / 10^echelle
//
// Règles:
// - construit depuis une chaîne SANS perte (les zéros de queue sont conservés tels quels)
// - construit depuis un entier (toutes largeurs + BigInt)
// - flottant hôte : seulement via `from_f64_lossy` (opt-in explicite)
// - égalité = égalité de valeur ("1.50" == "1.5")

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::erreur::{Erreur, Result};

pub(crate) fn pow10(n: u32) -> BigInt {
    BigInt::from(10u32).pow(n)
}

#[derive(Clone, Debug)]
pub struct Decimal {
    mantisse: BigInt,
    echelle: u32,
}

impl Decimal {
    pub fn new(mantisse: BigInt, echelle: u32) -> Self {
        Self { mantisse, echelle }
    }

    pub fn zero() -> Self {
        Self::new(BigInt::zero(), 0)
    }

    pub fn un() -> Self {
        Self::new(BigInt::one(), 0)
    }

    pub fn mantisse(&self) -> &BigInt {
        &self.mantisse
    }

    /// Nombre de chiffres après la virgule dans la forme brute.
    pub fn echelle(&self) -> u32 {
        self.echelle
    }

    pub fn is_zero(&self) -> bool {
        self.mantisse.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.mantisse.is_negative()
    }

    /// Vrai si la partie fractionnaire est nulle (quelle que soit l’échelle brute).
    pub fn est_entier(&self) -> bool {
        self.echelle == 0 || (&self.mantisse % pow10(self.echelle)).is_zero()
    }

    /// Conversion opt-in depuis un flottant hôte : passe par son écriture décimale
    /// la plus courte (`0.1_f64` -> "0.1"), pas par sa valeur binaire exacte.
    pub fn from_f64_lossy(x: f64) -> Result<Self> {
        if !x.is_finite() {
            return Err(Erreur::Lecture(x.to_string()));
        }
        x.to_string().parse()
    }

    /// Mantisse ramenée à `echelle` chiffres : complétée par des zéros,
    /// ou tronquée vers zéro.
    pub(crate) fn aligner(&self, echelle: u32) -> BigInt {
        match echelle.cmp(&self.echelle) {
            Ordering::Equal => self.mantisse.clone(),
            Ordering::Greater => &self.mantisse * pow10(echelle - self.echelle),
            // BigInt: division tronquée vers zéro
            Ordering::Less => &self.mantisse / pow10(self.echelle - echelle),
        }
    }

    /// Même valeur tronquée vers zéro, écrite avec exactement `echelle` chiffres.
    pub fn tronquer(&self, echelle: u32) -> Self {
        Self::new(self.aligner(echelle), echelle)
    }

    /// Multiplication EXACTE par 10^p (p signé) : simple déplacement de la virgule.
    pub fn decaler(&self, p: i64) -> Result<Self> {
        let hors_bornes = || Erreur::NonSupportee(format!("précision hors bornes: {p}"));

        let nouvelle = i64::from(self.echelle)
            .checked_sub(p)
            .ok_or_else(hors_bornes)?;
        if nouvelle >= 0 {
            let e = u32::try_from(nouvelle).map_err(|_| hors_bornes())?;
            Ok(Self::new(self.mantisse.clone(), e))
        } else {
            let k = u32::try_from(-nouvelle).map_err(|_| hors_bornes())?;
            Ok(Self::new(&self.mantisse * pow10(k), 0))
        }
    }

    /// Forme canonique : zéros de queue fractionnaires supprimés.
    pub fn normaliser(&self) -> Self {
        if self.mantisse.is_zero() {
            return Self::zero();
        }
        let dix = BigInt::from(10u32);
        let mut m = self.mantisse.clone();
        let mut e = self.echelle;
        while e > 0 {
            let (q, r) = m.div_rem(&dix);
            if !r.is_zero() {
                break;
            }
            m = q;
            e -= 1;
        }
        Self::new(m, e)
    }

    pub fn abs(&self) -> Self {
        Self::new(self.mantisse.abs(), self.echelle)
    }

    pub fn to_rational(&self) -> BigRational {
        BigRational::new(self.mantisse.clone(), pow10(self.echelle))
    }
}

/* ------------------------ Lecture (chaîne -> Decimal) ------------------------ */

impl FromStr for Decimal {
    type Err = Erreur;

    /// Grammaire : [+-] chiffres [ '.' chiffres ] — au moins un chiffre au total.
    fn from_str(s: &str) -> Result<Self> {
        let invalide = || Erreur::Lecture(s.to_string());

        let (negatif, corps) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (entier, frac) = corps.split_once('.').unwrap_or((corps, ""));
        if entier.is_empty() && frac.is_empty() {
            return Err(invalide());
        }
        let chiffres_ok = |t: &str| t.bytes().all(|b| b.is_ascii_digit());
        if !chiffres_ok(entier) || !chiffres_ok(frac) {
            return Err(invalide());
        }

        let echelle = u32::try_from(frac.len()).map_err(|_| invalide())?;
        let tout = format!("{entier}{frac}");
        let mut mantisse = BigInt::parse_bytes(tout.as_bytes(), 10).ok_or_else(invalide)?;
        if negatif {
            mantisse = -mantisse;
        }
        Ok(Self::new(mantisse, echelle))
    }
}

/* ------------------------ Entiers (sans perte) ------------------------ */

impl From<BigInt> for Decimal {
    fn from(n: BigInt) -> Self {
        Self::new(n, 0)
    }
}

macro_rules! decimal_depuis_entier {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Decimal {
                fn from(n: $t) -> Self {
                    Self::new(BigInt::from(n), 0)
                }
            }
        )*
    };
}

decimal_depuis_entier!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/* ------------------------ Entrées “constructibles en décimal” ------------------------ */

/// Tout ce qui peut devenir un `Decimal` à l’entrée d’une opération publique :
/// chaînes (analysées), entiers, `BigInt`, `Decimal`.
///
/// Les flottants n’implémentent PAS ce trait : passer par une chaîne
/// ou par `Decimal::from_f64_lossy`.
pub trait Nombre {
    fn en_decimal(self) -> Result<Decimal>;
}

impl Nombre for Decimal {
    fn en_decimal(self) -> Result<Decimal> {
        Ok(self)
    }
}

impl Nombre for &Decimal {
    fn en_decimal(self) -> Result<Decimal> {
        Ok(self.clone())
    }
}

impl Nombre for &str {
    fn en_decimal(self) -> Result<Decimal> {
        self.parse()
    }
}

impl Nombre for String {
    fn en_decimal(self) -> Result<Decimal> {
        self.parse()
    }
}

impl Nombre for &String {
    fn en_decimal(self) -> Result<Decimal> {
        self.parse()
    }
}

impl Nombre for BigInt {
    fn en_decimal(self) -> Result<Decimal> {
        Ok(Decimal::from(self))
    }
}

macro_rules! nombre_entier {
    ($($t:ty),*) => {
        $(
            impl Nombre for $t {
                fn en_decimal(self) -> Result<Decimal> {
                    Ok(Decimal::from(self))
                }
            }
        )*
    };
}

nombre_entier!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/* ------------------------ Comparaison / égalité (par valeur) ------------------------ */

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let e = self.echelle.max(other.echelle);
        self.aligner(e).cmp(&other.aligner(e))
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl Hash for Decimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let n = self.normaliser();
        n.mantisse.hash(state);
        n.echelle.hash(state);
    }
}

/* ------------------------ Affichage brut (échelle conservée) ------------------------ */

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let signe = if self.mantisse.is_negative() { "-" } else { "" };
        let chiffres = self.mantisse.magnitude().to_str_radix(10);

        if self.echelle == 0 {
            return write!(f, "{signe}{chiffres}");
        }

        let e = self.echelle as usize;
        let complet = if chiffres.len() <= e {
            format!("{}{chiffres}", "0".repeat(e + 1 - chiffres.len()))
        } else {
            chiffres
        };
        let (ent, frac) = complet.split_at(complet.len() - e);
        write!(f, "{signe}{ent}.{frac}")
    }
}

/* ------------------------ serde : toujours sous forme de chaîne ------------------------ */

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct VisiteurDecimal;

impl Visitor<'_> for VisiteurDecimal {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("une chaîne décimale ou un entier")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Decimal, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Decimal, E> {
        Err(E::custom(format!(
            "flottant refusé ({v}) : écrire le nombre entre guillemets"
        )))
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(VisiteurDecimal)
    }
}
